//! Strongly-typed ID wrappers.
//!
//! These newtypes keep record, event and component identities from being
//! mixed up at compile time.

pub use flowprov_id::{ExternalId, UuidId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }

            /// True when the id is empty or whitespace only.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id_type!(
    /// Identity of a record (flow file) as assigned by the pipeline engine.
    RecordId
);
define_id_type!(
    /// Provenance event identifier.
    EventId
);
define_id_type!(
    /// Pipeline component that owns a reporter.
    ComponentId
);

impl RecordId {
    pub fn from_external(id: ExternalId) -> Self {
        Self(id.into_string())
    }
}

impl EventId {
    pub fn from_uuid(id: UuidId) -> Self {
        Self(id.to_string())
    }

    pub fn generate() -> Self {
        Self::from_uuid(UuidId::generate())
    }
}

impl ComponentId {
    pub fn from_external(id: ExternalId) -> Self {
        Self(id.into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_event_ids_are_unique() {
        let a = EventId::generate();
        let b = EventId::generate();
        assert_ne!(a, b);
        assert!(UuidId::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn record_ids_serialize_as_plain_strings() {
        let id = RecordId::from_external(ExternalId::new("ff-7"));
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("ff-7"));
        assert!(RecordId::from_external(ExternalId::new(" ")).is_blank());
    }
}
