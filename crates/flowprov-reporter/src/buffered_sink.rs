//! Session-style buffering in front of another sink.
//!
//! Events are held until `commit` and dropped on `rollback`. A `SEND` with
//! `force = true` goes straight to the inner sink, so it is recorded even if
//! the session is rolled back.

use crate::error::SinkError;
use crate::events::ProvenanceEvent;
use crate::sink::EventSink;
use async_trait::async_trait;
use flowprov_observability::spans;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::Instrument;

pub struct BufferedSink {
    inner: Arc<dyn EventSink>,
    pending: Mutex<Vec<ProvenanceEvent>>,
}

impl BufferedSink {
    pub fn new(inner: Arc<dyn EventSink>) -> Self {
        Self { inner, pending: Mutex::new(Vec::new()) }
    }

    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Forward buffered events to the inner sink in order.
    ///
    /// Stops at the first failure; the failed event and everything after it
    /// stay buffered for a later commit. Returns the number delivered.
    pub async fn commit(&self) -> Result<usize, SinkError> {
        let mut pending = self.pending.lock().await;
        let span = spans::commit_buffer(pending.len());
        async {
            let mut delivered = 0;
            while delivered < pending.len() {
                let event = pending[delivered].clone();
                if let Err(err) = self.inner.emit(event).await {
                    pending.drain(..delivered);
                    return Err(err);
                }
                delivered += 1;
            }
            pending.clear();
            Ok(delivered)
        }
        .instrument(span)
        .await
    }

    /// Discard buffered events, returning how many were dropped.
    pub async fn rollback(&self) -> usize {
        let mut pending = self.pending.lock().await;
        let discarded = pending.len();
        pending.clear();
        tracing::debug!(discarded, "rolled back buffered provenance events");
        discarded
    }
}

#[async_trait]
impl EventSink for BufferedSink {
    async fn emit(&self, event: ProvenanceEvent) -> Result<(), SinkError> {
        if event.force() == Some(true) {
            return self.inner.emit(event).await;
        }
        self.pending.lock().await.push(event);
        Ok(())
    }
}
