//! Fake sinks that count `emit` calls.

use async_trait::async_trait;
use flowprov_reporter::{EventSink, ProvenanceEvent, SinkError};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Records every event and how many times `emit` was called.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: AtomicUsize,
    events: Mutex<Vec<ProvenanceEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn events(&self) -> Vec<ProvenanceEvent> {
        self.events.lock().await.clone()
    }

    /// The only event recorded; panics if there is not exactly one.
    pub async fn single(&self) -> ProvenanceEvent {
        let events = self.events.lock().await;
        assert_eq!(events.len(), 1, "expected exactly one event, got {}", events.len());
        events[0].clone()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn emit(&self, event: ProvenanceEvent) -> Result<(), SinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// Rejects events with `SinkError::Unavailable`, optionally after accepting
/// a fixed number of them.
#[derive(Debug)]
pub struct FailingSink {
    message: String,
    accept_first: usize,
    calls: AtomicUsize,
}

impl FailingSink {
    pub fn new(message: impl Into<String>) -> Self {
        Self::after(0, message)
    }

    /// Accept the first `accepted` events, then fail every call.
    pub fn after(accepted: usize, message: impl Into<String>) -> Self {
        Self { message: message.into(), accept_first: accepted, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSink for FailingSink {
    async fn emit(&self, _event: ProvenanceEvent) -> Result<(), SinkError> {
        let previous = self.calls.fetch_add(1, Ordering::SeqCst);
        if previous < self.accept_first {
            return Ok(());
        }
        Err(SinkError::Unavailable(self.message.clone()))
    }
}
