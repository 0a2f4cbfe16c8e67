use crate::capability::Capability;
use thiserror::Error;

/// Failure reported by an `EventSink`.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink unavailable: {0}")]
    Unavailable(String),
    #[error("sink closed")]
    Closed,
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode provenance event: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("corrupt provenance event at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },
}

/// A capability that is declared but deliberately not implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("provenance operation '{capability}' is not supported")]
pub struct UnsupportedOperation {
    capability: Capability,
}

impl UnsupportedOperation {
    pub fn new(capability: Capability) -> Self {
        Self { capability }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }
}

#[derive(Debug, Error)]
pub enum ProvenanceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    UnsupportedOperation(#[from] UnsupportedOperation),
    #[error("provenance sink unavailable: {0}")]
    SinkUnavailable(#[from] SinkError),
    #[error("invalid provenance event {event_id}: {reason}")]
    InvalidEvent { event_id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ProvenanceError>;
