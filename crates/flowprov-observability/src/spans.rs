//! Span constructors shared by the reporter and the runner.
//!
//! Field names stay stable so log queries keep working across releases.

use std::path::Path;
use tracing::Span;

/// Span wrapping a single provenance report call.
pub fn report_event(kind: &'static str, component_id: &str) -> Span {
    tracing::debug_span!("provenance.report", kind, component_id = %component_id)
}

/// Span wrapping a sink commit of buffered events.
pub fn commit_buffer(pending: usize) -> Span {
    tracing::debug_span!("provenance.commit", pending)
}

/// Span wrapping the replay of a report script.
pub fn replay_script(source: Option<&Path>) -> Span {
    let source = source
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "stdin".to_string());
    tracing::info_span!("provenance.replay", source = %source)
}
