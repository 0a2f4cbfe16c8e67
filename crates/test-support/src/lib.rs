//! Shared fixtures and fake sinks for integration tests.

pub mod fixtures;
pub mod sinks;

pub use fixtures::{record, reporter_with, strip_identity};
pub use sinks::{FailingSink, RecordingSink};
