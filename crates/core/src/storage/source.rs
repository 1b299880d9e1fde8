use std::path::PathBuf;

use crate::errors::CoreError;
use crate::models::snapshot::RawSnapshot;

/// Where a snapshot is read from.
///
/// The store owns caching and fallback; a source only reads and parses.
pub trait SnapshotSource: Send + Sync {
    /// Read and parse the full snapshot.
    fn read(&self) -> Result<RawSnapshot, CoreError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Result of one attempt to read a source.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(RawSnapshot),
    LoadFailed(CoreError),
}

impl LoadOutcome {
    /// Read `source`, folding any failure into `LoadFailed(SourceUnavailable)`.
    pub fn from_source(source: &dyn SnapshotSource) -> Self {
        match source.read() {
            Ok(snapshot) => LoadOutcome::Loaded(snapshot),
            Err(CoreError::SourceUnavailable(msg)) => {
                LoadOutcome::LoadFailed(CoreError::SourceUnavailable(msg))
            }
            Err(e) => LoadOutcome::LoadFailed(CoreError::SourceUnavailable(format!(
                "{}: {e}",
                source.describe()
            ))),
        }
    }
}

/// Parse a snapshot from its JSON text.
pub fn parse_snapshot(json: &str) -> Result<RawSnapshot, CoreError> {
    serde_json::from_str(json)
        .map_err(|e| CoreError::Deserialization(format!("Failed to parse snapshot: {e}")))
}

/// The JSON file written by the spreadsheet import (native only).
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for JsonFileSource {
    fn read(&self) -> Result<RawSnapshot, CoreError> {
        if !self.path.exists() {
            return Err(CoreError::SourceUnavailable(format!(
                "Portfolio data file not found: {}",
                self.path.display()
            )));
        }
        let json = std::fs::read_to_string(&self.path)?;
        parse_snapshot(&json)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Snapshot JSON already held in memory (e.g. handed over by a frontend).
#[derive(Debug, Clone)]
pub struct InMemorySource {
    json: String,
}

impl InMemorySource {
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl SnapshotSource for InMemorySource {
    fn read(&self) -> Result<RawSnapshot, CoreError> {
        parse_snapshot(&self.json)
    }

    fn describe(&self) -> String {
        format!("in-memory snapshot ({} bytes)", self.json.len())
    }
}
