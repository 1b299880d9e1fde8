use thiserror::Error;

/// Unified error type for the entire portfolio-analytics-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Source / File ───────────────────────────────────────────────
    #[error("Snapshot source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Data / Computation ──────────────────────────────────────────
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Portfolio has no holdings")]
    EmptyPortfolio,
}

impl CoreError {
    /// Shorthand for a missing required field on a raw record.
    pub fn missing_field(record: &str, index: usize, field: &str) -> Self {
        CoreError::MalformedRecord(format!("{record} #{index} is missing '{field}'"))
    }

    /// A field present on a raw record but holding the wrong JSON type.
    pub fn invalid_field(record: &str, index: usize, field: &str, value: &serde_json::Value) -> Self {
        CoreError::MalformedRecord(format!("{record} #{index} has invalid '{field}': {value}"))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

// ── View-level failures ─────────────────────────────────────────────

/// The four reporting views computed from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Holdings,
    Allocation,
    Performance,
    Summary,
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Holdings => write!(f, "holdings"),
            View::Allocation => write!(f, "allocation"),
            View::Performance => write!(f, "performance"),
            View::Summary => write!(f, "summary"),
        }
    }
}

/// A failed view computation, as handed to the transport layer.
///
/// Each view fails on its own; a `ViewError` from one view says nothing
/// about the others.
#[derive(Debug, Error)]
#[error("Failed to compute {view}: {source}")]
pub struct ViewError {
    pub view: View,
    #[source]
    pub source: CoreError,
}

impl ViewError {
    pub fn new(view: View, source: CoreError) -> Self {
        Self { view, source }
    }
}
