//! Identity construction tokens.
//!
//! ID newtypes live in `flowprov-core` and accept only these tokens at
//! their public constructors, so every id records where it came from.

/// Identifier assigned by a collaborator outside this workspace
/// (the pipeline engine, configuration).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalId(String);

impl ExternalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Freshly generated (or parsed) UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UuidId(uuid::Uuid);

impl UuidId {
    pub fn new(id: uuid::Uuid) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    pub fn parse_str(raw: &str) -> Result<Self, uuid::Error> {
        uuid::Uuid::parse_str(raw).map(Self)
    }

    pub fn into_uuid(self) -> uuid::Uuid {
        self.0
    }
}

impl std::fmt::Display for UuidId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_external_ids_are_detected() {
        assert!(ExternalId::new("").is_blank());
        assert!(ExternalId::new("  \t").is_blank());
        assert!(!ExternalId::new("ff-1").is_blank());
    }

    #[test]
    fn generated_uuids_are_lowercase_hyphenated() {
        let id = UuidId::generate().to_string();
        assert_eq!(id.len(), 36);
        assert_eq!(id, id.to_lowercase());
        assert!(UuidId::parse_str(&id).is_ok());
    }
}
