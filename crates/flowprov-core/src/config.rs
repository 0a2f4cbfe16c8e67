//! Reporter configuration.
//!
//! Values come from the environment (optionally seeded from a `.env` file)
//! or from any key lookup, so callers and tests never need to mutate the
//! process environment.

use crate::error::{FlowProvError, Result};
use crate::ids::{ComponentId, ExternalId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_COMPONENT_ID: &str = "FLOWPROV_COMPONENT_ID";
pub const ENV_COMPONENT_TYPE: &str = "FLOWPROV_COMPONENT_TYPE";
pub const ENV_SINK: &str = "FLOWPROV_SINK";
pub const ENV_JSONL_PATH: &str = "FLOWPROV_JSONL_PATH";

pub const DEFAULT_COMPONENT_ID: &str = "flowprov";
pub const DEFAULT_COMPONENT_TYPE: &str = "Reporter";

/// Where reported events go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkConfig {
    Memory,
    Tracing,
    JsonLines { path: PathBuf },
}

impl SinkConfig {
    pub fn name(&self) -> &'static str {
        match self {
            SinkConfig::Memory => "memory",
            SinkConfig::Tracing => "tracing",
            SinkConfig::JsonLines { .. } => "jsonl",
        }
    }

    /// Parse a sink name as accepted by `FLOWPROV_SINK`.
    pub fn parse(name: &str, jsonl_path: Option<PathBuf>) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(SinkConfig::Memory),
            "tracing" => Ok(SinkConfig::Tracing),
            "jsonl" | "json_lines" => {
                let path = jsonl_path.ok_or_else(|| {
                    FlowProvError::Configuration(format!(
                        "{ENV_JSONL_PATH} is required for the jsonl sink"
                    ))
                })?;
                Ok(SinkConfig::JsonLines { path })
            }
            other => Err(FlowProvError::Configuration(format!(
                "unknown sink '{other}' (expected memory, tracing or jsonl)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Component the reporter reports on behalf of.
    pub component_id: ComponentId,
    /// Kind of component, e.g. the processor type name.
    pub component_type: String,
    #[serde(default = "default_sink")]
    pub sink: SinkConfig,
}

fn default_sink() -> SinkConfig {
    SinkConfig::Memory
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            component_id: ComponentId::from_external(ExternalId::new(DEFAULT_COMPONENT_ID)),
            component_type: DEFAULT_COMPONENT_TYPE.to_string(),
            sink: default_sink(),
        }
    }
}

impl ReporterConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
            Err(err) if err.not_found() => {}
            Err(err) => {
                return Err(FlowProvError::Configuration(format!(
                    "failed to read .env file: {err}"
                )));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load a JSON document such as
    /// `{"component_id":"put-sftp-1","component_type":"PutSFTP","sink":{"kind":"tracing"}}`.
    /// A missing `sink` means the in-memory sink.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded reporter config file");
        Ok(config)
    }

    /// Build from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(id) = lookup(ENV_COMPONENT_ID) {
            config.component_id = ComponentId::from_external(ExternalId::new(id));
        }
        if let Some(component_type) = lookup(ENV_COMPONENT_TYPE) {
            config.component_type = component_type;
        }
        if let Some(sink) = lookup(ENV_SINK) {
            config.sink = SinkConfig::parse(&sink, lookup(ENV_JSONL_PATH).map(PathBuf::from))?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.component_id.is_blank() {
            return Err(FlowProvError::Configuration("component id must not be empty".to_string()));
        }
        if self.component_type.trim().is_empty() {
            return Err(FlowProvError::Configuration(
                "component type must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
