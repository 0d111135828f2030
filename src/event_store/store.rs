//! JSONL-backed event store
//!
//! Loads an events.jsonl export (one event object per line) into a
//! [`MemoryEventStore`] at startup.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::memory::{MemoryEventStore, StoredEvent};
use crate::error::SourceError;

/// Configuration for the JSONL event store
#[derive(Debug, Clone)]
pub struct EventStoreConfig {
    /// Path to the events file
    pub events_path: PathBuf,
}

impl EventStoreConfig {
    /// Create config with a custom events file
    pub fn new<P: AsRef<Path>>(events_path: P) -> Self {
        Self {
            events_path: events_path.as_ref().to_path_buf(),
        }
    }

    /// Get path to the events file
    pub fn events_path(&self) -> &Path {
        &self.events_path
    }
}

/// Loader for events.jsonl exports
pub struct JsonlEventStore {
    config: EventStoreConfig,
}

impl JsonlEventStore {
    pub fn with_config(config: EventStoreConfig) -> Self {
        Self { config }
    }

    /// Parse one line of the export
    pub fn parse_line(line: &str) -> Result<StoredEvent, SourceError> {
        Ok(serde_json::from_str(line)?)
    }

    /// Load every event in the file
    ///
    /// A missing file yields an empty store. Lines that fail to parse are
    /// skipped with a warning.
    pub fn load(&self) -> Result<MemoryEventStore, SourceError> {
        let events_path = self.config.events_path();

        if !events_path.exists() {
            warn!(path = %events_path.display(), "events file not found, serving an empty store");
            return Ok(MemoryEventStore::new());
        }

        let file = File::open(events_path)?;
        let reader = BufReader::new(file);
        let mut store = MemoryEventStore::new();
        let mut skipped = 0usize;

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            match Self::parse_line(&line) {
                Ok(event) => store.insert(event),
                Err(e) => {
                    skipped += 1;
                    warn!(line = line_num + 1, error = %e, "failed to parse event, skipping");
                }
            }
        }

        info!(
            path = %events_path.display(),
            events = store.len(),
            skipped,
            "loaded events"
        );
        Ok(store)
    }
}
