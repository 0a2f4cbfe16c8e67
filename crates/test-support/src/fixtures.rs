use flowprov_core::{ComponentId, ExternalId, RecordRef};
use flowprov_reporter::{EventSink, ProvenanceEvent, ProvenanceReporter};
use serde_json::Value;
use std::sync::Arc;

pub const TEST_COMPONENT_ID: &str = "proc-test";
pub const TEST_COMPONENT_TYPE: &str = "TestProcessor";

pub fn record(id: &str) -> RecordRef {
    RecordRef::new(id)
}

pub fn reporter_with(sink: Arc<dyn EventSink>) -> ProvenanceReporter {
    ProvenanceReporter::new(
        sink,
        ComponentId::from_external(ExternalId::new(TEST_COMPONENT_ID)),
        TEST_COMPONENT_TYPE,
    )
}

/// Serialized event without the per-event identity (`eventId`, `timestampMs`),
/// so two reports of the same fact compare equal.
pub fn strip_identity(event: &ProvenanceEvent) -> Value {
    let mut value = serde_json::to_value(event).expect("serialize event");
    if let Some(object) = value.as_object_mut() {
        object.remove("eventId");
        object.remove("timestampMs");
    }
    value
}
