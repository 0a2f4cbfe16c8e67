//! Append-only JSON-lines sink.
//!
//! One serialized event per line. Lines are written under a lock so
//! concurrent emitters never interleave partial lines.

use crate::error::SinkError;
use crate::events::ProvenanceEvent;
use crate::sink::EventSink;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesSink {
    /// Open `path` for appending, creating it and its parent directory.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path).await?;
        tracing::debug!(path = %path.display(), "opened provenance journal");
        Ok(Self { path, file: Mutex::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventSink for JsonLinesSink {
    async fn emit(&self, event: ProvenanceEvent) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Read every event from a journal, validating each one.
pub async fn read_events(path: impl AsRef<Path>) -> Result<Vec<ProvenanceEvent>, SinkError> {
    let contents = tokio::fs::read_to_string(path.as_ref()).await?;
    let mut events = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let corrupt = |reason: String| SinkError::Corrupt { line: index + 1, reason };
        let event: ProvenanceEvent =
            serde_json::from_str(line).map_err(|err| corrupt(err.to_string()))?;
        event.validate().map_err(|err| corrupt(err.to_string()))?;
        events.push(event);
    }
    Ok(events)
}
