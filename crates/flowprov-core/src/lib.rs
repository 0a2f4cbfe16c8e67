//! Shared types for the provenance reporting workspace.
//!
//! Identifiers, record references, durations and configuration used by the
//! reporter, its sinks and the runner.

pub mod config;
pub mod duration;
pub mod error;
pub mod ids;
pub mod record;

pub use config::{ReporterConfig, SinkConfig};
pub use duration::{DurationError, EventDuration};
pub use error::{FlowProvError, Result};
pub use ids::{ComponentId, EventId, ExternalId, RecordId, UuidId};
pub use record::{RecordRef, Relationship};
