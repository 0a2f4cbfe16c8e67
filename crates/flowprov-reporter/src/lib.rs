//! Provenance event reporting.
//!
//! This crate provides the event taxonomy, the reporter that validates and
//! normalizes report calls into events, the sink interface events are handed
//! to, and a handful of reference sinks.

pub mod buffered_sink;
pub mod capability;
pub mod error;
pub mod events;
pub mod jsonl_sink;
pub mod options;
pub mod reporter;
pub mod sink;

pub use buffered_sink::BufferedSink;
pub use capability::Capability;
pub use error::{ProvenanceError, Result, SinkError, UnsupportedOperation};
pub use events::{EventKind, EventOrigin, EventSubjects, ProvenanceEvent, event_schema};
pub use jsonl_sink::{JsonLinesSink, read_events};
pub use options::{DetailOptions, ReceiveOptions, SendOptions, TimedOptions};
pub use reporter::ProvenanceReporter;
pub use sink::{ChannelEventSink, EventSink, InMemoryEventSink, TracingEventSink};
