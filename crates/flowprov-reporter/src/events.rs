//! Provenance event taxonomy.
//!
//! A `ProvenanceEvent` is a write-once fact: fields are private and only the
//! reporter constructs events, so every event leaving this crate has the
//! fields its kind calls for and nothing else. Events read back from a sink
//! can be checked with [`ProvenanceEvent::validate`].

use crate::error::{ProvenanceError, Result};
use crate::options::{DetailOptions, ReceiveOptions, SendOptions, TimedOptions};
use flowprov_core::{ComponentId, EventDuration, EventId, RecordId, RecordRef, Relationship};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Data entered the pipeline from an external source.
    Receive,
    /// Contents of an existing record were replaced from an external source.
    Fetch,
    /// Data left the pipeline for an external destination.
    Send,
    /// One record was split into zero or more children.
    Fork,
    /// Zero or more records were merged into one child.
    Join,
    /// A record was duplicated exactly.
    Clone,
    ModifyContent,
    ModifyAttributes,
    /// A record was transferred to a named relationship.
    Route,
    /// A record originated inside the pipeline.
    Create,
}

impl EventKind {
    pub const ALL: [EventKind; 10] = [
        EventKind::Receive,
        EventKind::Fetch,
        EventKind::Send,
        EventKind::Fork,
        EventKind::Join,
        EventKind::Clone,
        EventKind::ModifyContent,
        EventKind::ModifyAttributes,
        EventKind::Route,
        EventKind::Create,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Receive => "RECEIVE",
            EventKind::Fetch => "FETCH",
            EventKind::Send => "SEND",
            EventKind::Fork => "FORK",
            EventKind::Join => "JOIN",
            EventKind::Clone => "CLONE",
            EventKind::ModifyContent => "MODIFY_CONTENT",
            EventKind::ModifyAttributes => "MODIFY_ATTRIBUTES",
            EventKind::Route => "ROUTE",
            EventKind::Create => "CREATE",
        }
    }

    pub fn has_transit_uri(&self) -> bool {
        matches!(self, EventKind::Receive | EventKind::Fetch | EventKind::Send)
    }

    pub fn accepts_duration(&self) -> bool {
        !matches!(self, EventKind::Clone | EventKind::ModifyAttributes | EventKind::Create)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records an event is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum EventSubjects {
    Single { record: RecordRef },
    Fork { parent: RecordRef, children: Vec<RecordRef> },
    Join { parents: Vec<RecordRef>, child: RecordRef },
    Clone { parent: RecordRef, child: RecordRef },
}

impl EventSubjects {
    /// Every referenced record, parents before children.
    pub fn records(&self) -> Vec<&RecordRef> {
        match self {
            EventSubjects::Single { record } => vec![record],
            EventSubjects::Fork { parent, children } => {
                std::iter::once(parent).chain(children.iter()).collect()
            }
            EventSubjects::Join { parents, child } => {
                parents.iter().chain(std::iter::once(child)).collect()
            }
            EventSubjects::Clone { parent, child } => vec![parent, child],
        }
    }

    pub fn parent_ids(&self) -> Vec<&RecordId> {
        match self {
            EventSubjects::Single { .. } => Vec::new(),
            EventSubjects::Fork { parent, .. } | EventSubjects::Clone { parent, .. } => {
                vec![parent.id()]
            }
            EventSubjects::Join { parents, .. } => parents.iter().map(RecordRef::id).collect(),
        }
    }

    pub fn child_ids(&self) -> Vec<&RecordId> {
        match self {
            EventSubjects::Single { .. } => Vec::new(),
            EventSubjects::Fork { children, .. } => children.iter().map(RecordRef::id).collect(),
            EventSubjects::Join { child, .. } | EventSubjects::Clone { child, .. } => {
                vec![child.id()]
            }
        }
    }

    fn shape_matches(&self, kind: EventKind) -> bool {
        match self {
            EventSubjects::Single { .. } => {
                !matches!(kind, EventKind::Fork | EventKind::Join | EventKind::Clone)
            }
            EventSubjects::Fork { .. } => kind == EventKind::Fork,
            EventSubjects::Join { .. } => kind == EventKind::Join,
            EventSubjects::Clone { .. } => kind == EventKind::Clone,
        }
    }
}

/// Component on whose behalf events are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOrigin {
    pub component_id: ComponentId,
    pub component_type: String,
}

impl EventOrigin {
    pub fn new(component_id: ComponentId, component_type: impl Into<String>) -> Self {
        Self { component_id, component_type: component_type.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceEvent {
    event_id: EventId,
    kind: EventKind,
    timestamp_ms: u64,
    component_id: ComponentId,
    component_type: String,
    subjects: EventSubjects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transit_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_system_flow_file_identifier: Option<String>,
    #[serde(default)]
    details: String,
    #[serde(default)]
    duration_millis: EventDuration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    relationship: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    force: Option<bool>,
}

impl ProvenanceEvent {
    fn base(
        origin: &EventOrigin,
        kind: EventKind,
        subjects: EventSubjects,
        details: String,
        duration_millis: EventDuration,
    ) -> Self {
        Self {
            event_id: EventId::generate(),
            kind,
            timestamp_ms: now_millis(),
            component_id: origin.component_id.clone(),
            component_type: origin.component_type.clone(),
            subjects,
            transit_uri: None,
            source_system_flow_file_identifier: None,
            details,
            duration_millis,
            relationship: None,
            force: None,
        }
    }

    pub(crate) fn receive(
        origin: &EventOrigin,
        record: RecordRef,
        transit_uri: String,
        options: ReceiveOptions,
    ) -> Self {
        let mut event = Self::base(
            origin,
            EventKind::Receive,
            EventSubjects::Single { record },
            options.details,
            options.duration,
        );
        event.transit_uri = Some(transit_uri);
        event.source_system_flow_file_identifier = Some(options.source_system_flow_file_identifier);
        event
    }

    pub(crate) fn fetch(
        origin: &EventOrigin,
        record: RecordRef,
        transit_uri: String,
        options: TimedOptions,
    ) -> Self {
        let mut event = Self::base(
            origin,
            EventKind::Fetch,
            EventSubjects::Single { record },
            options.details,
            options.duration,
        );
        event.transit_uri = Some(transit_uri);
        event
    }

    pub(crate) fn send(
        origin: &EventOrigin,
        record: RecordRef,
        transit_uri: String,
        options: SendOptions,
    ) -> Self {
        let mut event = Self::base(
            origin,
            EventKind::Send,
            EventSubjects::Single { record },
            options.details,
            options.duration,
        );
        event.transit_uri = Some(transit_uri);
        event.force = Some(options.force);
        event
    }

    pub(crate) fn fork(
        origin: &EventOrigin,
        parent: RecordRef,
        children: Vec<RecordRef>,
        options: TimedOptions,
    ) -> Self {
        Self::base(
            origin,
            EventKind::Fork,
            EventSubjects::Fork { parent, children: dedup_records(children) },
            options.details,
            options.duration,
        )
    }

    pub(crate) fn join(
        origin: &EventOrigin,
        parents: Vec<RecordRef>,
        child: RecordRef,
        options: TimedOptions,
    ) -> Self {
        Self::base(
            origin,
            EventKind::Join,
            EventSubjects::Join { parents: dedup_records(parents), child },
            options.details,
            options.duration,
        )
    }

    pub(crate) fn clone_of(origin: &EventOrigin, parent: RecordRef, child: RecordRef) -> Self {
        Self::base(
            origin,
            EventKind::Clone,
            EventSubjects::Clone { parent, child },
            String::new(),
            EventDuration::UNKNOWN,
        )
    }

    pub(crate) fn modify_content(
        origin: &EventOrigin,
        record: RecordRef,
        options: TimedOptions,
    ) -> Self {
        Self::base(
            origin,
            EventKind::ModifyContent,
            EventSubjects::Single { record },
            options.details,
            options.duration,
        )
    }

    pub(crate) fn modify_attributes(
        origin: &EventOrigin,
        record: RecordRef,
        options: DetailOptions,
    ) -> Self {
        Self::base(
            origin,
            EventKind::ModifyAttributes,
            EventSubjects::Single { record },
            options.details,
            EventDuration::UNKNOWN,
        )
    }

    pub(crate) fn route(
        origin: &EventOrigin,
        record: RecordRef,
        relationship: Relationship,
        options: TimedOptions,
    ) -> Self {
        let mut event = Self::base(
            origin,
            EventKind::Route,
            EventSubjects::Single { record },
            options.details,
            options.duration,
        );
        event.relationship = Some(relationship);
        event
    }

    pub(crate) fn create(origin: &EventOrigin, record: RecordRef, options: DetailOptions) -> Self {
        Self::base(
            origin,
            EventKind::Create,
            EventSubjects::Single { record },
            options.details,
            EventDuration::UNKNOWN,
        )
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    pub fn component_id(&self) -> &ComponentId {
        &self.component_id
    }

    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    pub fn subjects(&self) -> &EventSubjects {
        &self.subjects
    }

    pub fn transit_uri(&self) -> Option<&str> {
        self.transit_uri.as_deref()
    }

    pub fn source_system_flow_file_identifier(&self) -> Option<&str> {
        self.source_system_flow_file_identifier.as_deref()
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn duration(&self) -> EventDuration {
        self.duration_millis
    }

    pub fn relationship(&self) -> Option<&Relationship> {
        self.relationship.as_ref()
    }

    pub fn force(&self) -> Option<bool> {
        self.force
    }

    /// Check that a deserialized event has the shape its kind requires.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| ProvenanceError::InvalidEvent {
            event_id: self.event_id.to_string(),
            reason,
        };

        if self.event_id.is_blank() {
            return Err(invalid("event id is empty".to_string()));
        }
        if self.component_id.is_blank() {
            return Err(invalid("component id is empty".to_string()));
        }
        if !self.subjects.shape_matches(self.kind) {
            return Err(invalid(format!("subjects do not match kind {}", self.kind)));
        }
        if self.subjects.records().iter().any(|record| record.id().is_blank()) {
            return Err(invalid("subject record id is empty".to_string()));
        }

        let has_uri = self.transit_uri.as_deref().is_some_and(|uri| !uri.trim().is_empty());
        if has_uri != self.kind.has_transit_uri() {
            return Err(invalid(format!("transitUri is not valid for kind {}", self.kind)));
        }
        if self.source_system_flow_file_identifier.is_some() != (self.kind == EventKind::Receive) {
            return Err(invalid("sourceSystemFlowFileIdentifier is only valid for RECEIVE".into()));
        }
        let has_relationship = self.relationship.as_ref().is_some_and(|rel| !rel.is_blank());
        if has_relationship != (self.kind == EventKind::Route) {
            return Err(invalid("relationship is required for ROUTE and only ROUTE".into()));
        }
        if self.force.is_some() != (self.kind == EventKind::Send) {
            return Err(invalid("force is only valid for SEND".into()));
        }
        if !self.kind.accepts_duration() && !self.duration_millis.is_unknown() {
            return Err(invalid(format!("kind {} does not carry a duration", self.kind)));
        }
        Ok(())
    }
}

/// Drop repeated record ids, keeping the first occurrence and the order.
fn dedup_records(records: Vec<RecordRef>) -> Vec<RecordRef> {
    let mut seen = HashSet::new();
    records.into_iter().filter(|record| seen.insert(record.id().clone())).collect()
}

/// JSON Schema describing the serialized form of [`ProvenanceEvent`].
pub fn event_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(ProvenanceEvent)).unwrap_or(Value::Null)
}
