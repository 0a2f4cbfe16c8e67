//! The provenance reporter.
//!
//! One canonical `*_with` operation per event kind takes a fully populated
//! options struct; the short forms delegate to it with `Default` options.
//! Every accepted call builds exactly one event and hands it to the sink
//! once. Nothing is buffered, retried or suppressed here.

use crate::capability::Capability;
use crate::error::{ProvenanceError, Result, UnsupportedOperation};
use crate::events::{EventOrigin, ProvenanceEvent};
use crate::options::{DetailOptions, ReceiveOptions, SendOptions, TimedOptions};
use crate::sink::EventSink;
use flowprov_core::{ComponentId, RecordRef, Relationship, ReporterConfig};
use flowprov_observability::spans;
use std::sync::Arc;
use tracing::Instrument;

/// Reports provenance events for one pipeline component.
///
/// Cheap to clone and safe to share across tasks; all shared state lives in
/// the sink.
///
/// ```
/// use flowprov_core::{ComponentId, ExternalId, RecordRef};
/// use flowprov_reporter::{InMemoryEventSink, ProvenanceReporter, SendOptions};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let sink = Arc::new(InMemoryEventSink::new());
/// let reporter = ProvenanceReporter::new(
///     sink.clone(),
///     ComponentId::from_external(ExternalId::new("put-sftp-1")),
///     "PutSFTP",
/// );
/// let record = RecordRef::new("ff-1");
/// reporter.send(&record, "sftp://example.com/in").await?;
/// reporter
///     .send_with(&record, "sftp://example.com/in", SendOptions::new().duration_millis(12))
///     .await?;
/// assert_eq!(sink.len().await, 2);
/// # Ok::<(), flowprov_reporter::ProvenanceError>(())
/// # }).unwrap();
/// ```
#[derive(Clone)]
pub struct ProvenanceReporter {
    sink: Arc<dyn EventSink>,
    origin: EventOrigin,
}

impl ProvenanceReporter {
    pub fn new(
        sink: Arc<dyn EventSink>,
        component_id: ComponentId,
        component_type: impl Into<String>,
    ) -> Self {
        Self { sink, origin: EventOrigin::new(component_id, component_type) }
    }

    pub fn from_config(config: &ReporterConfig, sink: Arc<dyn EventSink>) -> Self {
        Self::new(sink, config.component_id.clone(), config.component_type.clone())
    }

    pub fn origin(&self) -> &EventOrigin {
        &self.origin
    }

    /// Every operation this reporter declares, supported or not.
    pub fn capabilities() -> &'static [Capability] {
        &Capability::ALL
    }

    pub async fn receive(&self, record: &RecordRef, transit_uri: &str) -> Result<()> {
        self.receive_with(record, transit_uri, ReceiveOptions::default()).await
    }

    pub async fn receive_with(
        &self,
        record: &RecordRef,
        transit_uri: &str,
        options: ReceiveOptions,
    ) -> Result<()> {
        require_record(Capability::Receive, "record", record)?;
        require_transit_uri(Capability::Receive, transit_uri)?;
        let transit_uri = transit_uri.to_string();
        let event = ProvenanceEvent::receive(&self.origin, record.clone(), transit_uri, options);
        self.dispatch(event).await
    }

    pub async fn fetch(&self, record: &RecordRef, transit_uri: &str) -> Result<()> {
        self.fetch_with(record, transit_uri, TimedOptions::default()).await
    }

    pub async fn fetch_with(
        &self,
        record: &RecordRef,
        transit_uri: &str,
        options: TimedOptions,
    ) -> Result<()> {
        require_record(Capability::Fetch, "record", record)?;
        require_transit_uri(Capability::Fetch, transit_uri)?;
        let event =
            ProvenanceEvent::fetch(&self.origin, record.clone(), transit_uri.to_string(), options);
        self.dispatch(event).await
    }

    pub async fn send(&self, record: &RecordRef, transit_uri: &str) -> Result<()> {
        self.send_with(record, transit_uri, SendOptions::default()).await
    }

    /// `force` is passed through to the sink untouched.
    pub async fn send_with(
        &self,
        record: &RecordRef,
        transit_uri: &str,
        options: SendOptions,
    ) -> Result<()> {
        require_record(Capability::Send, "record", record)?;
        require_transit_uri(Capability::Send, transit_uri)?;
        let event =
            ProvenanceEvent::send(&self.origin, record.clone(), transit_uri.to_string(), options);
        self.dispatch(event).await
    }

    pub async fn fork(&self, parent: &RecordRef, children: &[RecordRef]) -> Result<()> {
        self.fork_with(parent, children, TimedOptions::default()).await
    }

    /// Children keep the order given; repeated ids are reported once.
    pub async fn fork_with(
        &self,
        parent: &RecordRef,
        children: &[RecordRef],
        options: TimedOptions,
    ) -> Result<()> {
        require_record(Capability::Fork, "parent", parent)?;
        for child in children {
            require_record(Capability::Fork, "child", child)?;
        }
        let event =
            ProvenanceEvent::fork(&self.origin, parent.clone(), children.to_vec(), options);
        self.dispatch(event).await
    }

    pub async fn join(&self, parents: &[RecordRef], child: &RecordRef) -> Result<()> {
        self.join_with(parents, child, TimedOptions::default()).await
    }

    pub async fn join_with(
        &self,
        parents: &[RecordRef],
        child: &RecordRef,
        options: TimedOptions,
    ) -> Result<()> {
        for parent in parents {
            require_record(Capability::Join, "parent", parent)?;
        }
        require_record(Capability::Join, "child", child)?;
        let event = ProvenanceEvent::join(&self.origin, parents.to_vec(), child.clone(), options);
        self.dispatch(event).await
    }

    /// Report `child` as an exact copy of `parent`. Takes no details or
    /// duration.
    pub async fn clone_record(&self, parent: &RecordRef, child: &RecordRef) -> Result<()> {
        require_record(Capability::Clone, "parent", parent)?;
        require_record(Capability::Clone, "child", child)?;
        let event = ProvenanceEvent::clone_of(&self.origin, parent.clone(), child.clone());
        self.dispatch(event).await
    }

    pub async fn modify_content(&self, record: &RecordRef) -> Result<()> {
        self.modify_content_with(record, TimedOptions::default()).await
    }

    pub async fn modify_content_with(
        &self,
        record: &RecordRef,
        options: TimedOptions,
    ) -> Result<()> {
        require_record(Capability::ModifyContent, "record", record)?;
        let event = ProvenanceEvent::modify_content(&self.origin, record.clone(), options);
        self.dispatch(event).await
    }

    pub async fn modify_attributes(&self, record: &RecordRef) -> Result<()> {
        self.modify_attributes_with(record, DetailOptions::default()).await
    }

    pub async fn modify_attributes_with(
        &self,
        record: &RecordRef,
        options: DetailOptions,
    ) -> Result<()> {
        require_record(Capability::ModifyAttributes, "record", record)?;
        let event = ProvenanceEvent::modify_attributes(&self.origin, record.clone(), options);
        self.dispatch(event).await
    }

    pub async fn route(&self, record: &RecordRef, relationship: &Relationship) -> Result<()> {
        self.route_with(record, relationship, TimedOptions::default()).await
    }

    pub async fn route_with(
        &self,
        record: &RecordRef,
        relationship: &Relationship,
        options: TimedOptions,
    ) -> Result<()> {
        require_record(Capability::Route, "record", record)?;
        if relationship.is_blank() {
            return Err(reject(Capability::Route, "relationship name is empty"));
        }
        let event =
            ProvenanceEvent::route(&self.origin, record.clone(), relationship.clone(), options);
        self.dispatch(event).await
    }

    pub async fn create(&self, record: &RecordRef) -> Result<()> {
        self.create_with(record, DetailOptions::default()).await
    }

    pub async fn create_with(&self, record: &RecordRef, options: DetailOptions) -> Result<()> {
        require_record(Capability::Create, "record", record)?;
        let event = ProvenanceEvent::create(&self.origin, record.clone(), options);
        self.dispatch(event).await
    }

    /// Declared for completeness; always fails.
    pub fn invoke_remote_process(
        &self,
        _record: &RecordRef,
        _transit_uri: &str,
        _details: Option<&str>,
    ) -> std::result::Result<(), UnsupportedOperation> {
        Err(UnsupportedOperation::new(Capability::InvokeRemoteProcess))
    }

    /// Declared for completeness; always fails.
    pub fn associate(
        &self,
        _record: &RecordRef,
        _alternate_identifier_namespace: &str,
        _alternate_identifier: &str,
    ) -> std::result::Result<(), UnsupportedOperation> {
        Err(UnsupportedOperation::new(Capability::Associate))
    }

    async fn dispatch(&self, event: ProvenanceEvent) -> Result<()> {
        let span = spans::report_event(event.kind().as_str(), self.origin.component_id.as_str());
        async move {
            tracing::debug!(event_id = %event.event_id(), "emitting provenance event");
            // Returned unchanged and never retried.
            self.sink.emit(event).await.map_err(ProvenanceError::SinkUnavailable)
        }
        .instrument(span)
        .await
    }
}

fn reject(capability: Capability, reason: &str) -> ProvenanceError {
    tracing::debug!(operation = %capability, reason, "rejected provenance report");
    ProvenanceError::InvalidArgument(format!("{capability}: {reason}"))
}

fn require_record(capability: Capability, role: &str, record: &RecordRef) -> Result<()> {
    if record.id().is_blank() {
        return Err(reject(capability, &format!("{role} record id is empty")));
    }
    Ok(())
}

fn require_transit_uri(capability: Capability, transit_uri: &str) -> Result<()> {
    if transit_uri.trim().is_empty() {
        return Err(reject(capability, "transit uri is empty"));
    }
    Ok(())
}
