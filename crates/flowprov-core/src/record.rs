//! Record references and routing relationships.
//!
//! A record is owned by the pipeline engine. The reporter only sees a
//! `RecordRef`: the record's identity plus an optional snapshot of its
//! attributes, size, entry date and lineage start taken when the event is
//! reported.

use crate::ids::{ExternalId, RecordId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordRef {
    id: RecordId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
    /// When the record entered this pipeline, epoch millis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entry_date_ms: Option<u64>,
    /// When the record's oldest ancestor entered the pipeline, epoch millis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lineage_start_ms: Option<u64>,
}

impl RecordRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self::from_id(RecordId::from_external(ExternalId::new(id)))
    }

    pub fn from_id(id: RecordId) -> Self {
        Self {
            id,
            attributes: BTreeMap::new(),
            size_bytes: None,
            entry_date_ms: None,
            lineage_start_ms: None,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_attributes<K, V>(mut self, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes
            .extend(attributes.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    pub fn with_entry_date_ms(mut self, entry_date_ms: u64) -> Self {
        self.entry_date_ms = Some(entry_date_ms);
        self
    }

    pub fn with_lineage_start_ms(mut self, lineage_start_ms: u64) -> Self {
        self.lineage_start_ms = Some(lineage_start_ms);
        self
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn size_bytes(&self) -> Option<u64> {
        self.size_bytes
    }

    pub fn entry_date_ms(&self) -> Option<u64> {
        self.entry_date_ms
    }

    pub fn lineage_start_ms(&self) -> Option<u64> {
        self.lineage_start_ms
    }
}

/// Named outcome branch a record is routed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Relationship(String);

impl Relationship {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Relationship {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
