//! Error types shared across the workspace
//!
//! Reporting failures have their own taxonomy in `flowprov-reporter`; this
//! type covers loading configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowProvError {
    /// Setting missing, blank or out of range
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not a valid `ReporterConfig` document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FlowProvError>;
