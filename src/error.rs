//! Error types for the export pipeline

use thiserror::Error;

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that end an export
#[derive(Debug, Error)]
pub enum ExportError {
    /// Malformed or out-of-range request parameter; raised before any fetch
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A page or detail fetch failed
    #[error("upstream fetch failed: {0}")]
    UpstreamFetchFailure(#[source] SourceError),

    /// A listed event could no longer be fetched
    #[error("event {event_id} in project {project_id} vanished before it could be rendered")]
    RecordVanished { project_id: u64, event_id: String },
}

impl ExportError {
    /// Whether the caller can fix the request and retry
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExportError::InvalidParameter(_))
    }
}

/// Errors reported by page and detail sources
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("event {event_id} not found in project {project_id}")]
    NotFound { project_id: u64, event_id: String },

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SourceError> for ExportError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::NotFound {
                project_id,
                event_id,
            } => ExportError::RecordVanished {
                project_id,
                event_id,
            },
            other => ExportError::UpstreamFetchFailure(other),
        }
    }
}

/// Failure while decoding a diagnostic payload into a stacktrace
///
/// Never leaves the formatter; the line is rendered without a stacktrace.
#[derive(Debug, Error)]
pub enum StacktraceError {
    #[error("malformed diagnostic payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
