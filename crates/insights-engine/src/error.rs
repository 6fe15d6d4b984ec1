use insights_core::ParseStatusError;
use thiserror::Error;

/// Malformed caller input. Engine transforms themselves never fail.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid date \"{value}\": expected yyyy-MM-dd")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("unknown sort direction: {0}")]
    UnknownSortDirection(String),

    #[error(transparent)]
    InvalidStatus(#[from] ParseStatusError),
}

/// Failure reported by an export adapter. Engine state is never affected.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export target not found: {0}")]
    MissingTarget(String),

    #[error("unknown export region: {0}")]
    UnknownRegion(String),

    #[error("rasterization failed for {target}: {reason}")]
    Rasterize { target: String, reason: String },

    #[error("captured image for {0} is empty")]
    EmptyCapture(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] std::fmt::Error),
}
