//! Event sink interface and in-process sinks.
//!
//! The reporter hands every event to exactly one `EventSink`. Sinks own
//! persistence, transport, batching and any deduplication, and must accept
//! concurrent `emit` calls.

use crate::error::SinkError;
use crate::events::ProvenanceEvent;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

#[async_trait]
pub trait EventSink: Send + Sync {
    /// Accept one event. Ownership of the event passes to the sink.
    async fn emit(&self, event: ProvenanceEvent) -> Result<(), SinkError>;
}

#[async_trait]
impl<S> EventSink for Arc<S>
where
    S: EventSink + ?Sized,
{
    async fn emit(&self, event: ProvenanceEvent) -> Result<(), SinkError> {
        (**self).emit(event).await
    }
}

/// Keeps events in memory, in emission order.
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    events: Mutex<Vec<ProvenanceEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<ProvenanceEvent> {
        self.events.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.events.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.lock().await.is_empty()
    }

    /// Remove and return everything recorded so far.
    pub async fn drain(&self) -> Vec<ProvenanceEvent> {
        std::mem::take(&mut *self.events.lock().await)
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn emit(&self, event: ProvenanceEvent) -> Result<(), SinkError> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// Writes each event as a structured `info` log record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: ProvenanceEvent) -> Result<(), SinkError> {
        let records: Vec<&str> =
            event.subjects().records().into_iter().map(|record| record.id().as_str()).collect();
        tracing::info!(
            event_id = %event.event_id(),
            kind = %event.kind(),
            component_id = %event.component_id(),
            component_type = event.component_type(),
            records = ?records,
            parents = event.subjects().parent_ids().len(),
            transit_uri = event.transit_uri(),
            relationship = event.relationship().map(|rel| rel.as_str()),
            details = event.details(),
            duration_ms = event.duration().as_millis(),
            force = event.force(),
            "provenance event"
        );
        Ok(())
    }
}

/// Forwards events into a bounded channel for a consumer task.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: mpsc::Sender<ProvenanceEvent>,
}

impl ChannelEventSink {
    pub fn new(sender: mpsc::Sender<ProvenanceEvent>) -> Self {
        Self { sender }
    }

    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ProvenanceEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(sender), receiver)
    }
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn emit(&self, event: ProvenanceEvent) -> Result<(), SinkError> {
        self.sender.send(event).await.map_err(|_| SinkError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventOrigin;
    use crate::options::{DetailOptions, SendOptions};
    use flowprov_core::{ComponentId, ExternalId, RecordRef};
    use tracing_test::traced_test;

    fn origin() -> EventOrigin {
        EventOrigin::new(ComponentId::from_external(ExternalId::new("proc-1")), "PutSFTP")
    }

    #[tokio::test]
    async fn in_memory_sink_keeps_emission_order() {
        let sink = InMemoryEventSink::new();
        for id in ["a", "b", "c"] {
            let event =
                ProvenanceEvent::create(&origin(), RecordRef::new(id), DetailOptions::new());
            sink.emit(event).await.unwrap();
        }
        let ids: Vec<String> = sink
            .events()
            .await
            .iter()
            .map(|event| event.subjects().records()[0].id().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(sink.drain().await.len(), 3);
        assert!(sink.is_empty().await);
    }

    #[tokio::test]
    async fn channel_sink_reports_closed_receiver() {
        let (sink, mut receiver) = ChannelEventSink::channel(4);
        let event = ProvenanceEvent::create(&origin(), RecordRef::new("a"), DetailOptions::new());
        sink.emit(event.clone()).await.unwrap();
        assert_eq!(receiver.recv().await, Some(event.clone()));

        drop(receiver);
        assert!(matches!(sink.emit(event).await, Err(SinkError::Closed)));
    }

    #[tokio::test]
    #[traced_test]
    async fn tracing_sink_logs_structured_fields() {
        let event = ProvenanceEvent::send(
            &origin(),
            RecordRef::new("ff-9"),
            "sftp://example.com/out".to_string(),
            SendOptions::new().force(true),
        );
        TracingEventSink::new().emit(event).await.unwrap();
        assert!(logs_contain("provenance event"));
        assert!(logs_contain("kind=SEND"));
        assert!(logs_contain("sftp://example.com/out"));
    }
}
