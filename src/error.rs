//! Error types for the summary service.

use thiserror::Error;

/// Errors surfaced by the loader and aggregator.
///
/// Record-level malformation is not represented here: a bad row is dropped
/// during loading and never escalates. These variants cover file-level and
/// input-validation failures, which propagate to the HTTP boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// No recognized snapshot file exists at any candidate location.
    #[error("no telemetry snapshot found under {0}")]
    DataSourceNotFound(String),

    /// A JSON snapshot's top-level shape is neither an array of records nor
    /// an object with a `records` array.
    #[error("unsupported telemetry JSON format: {0}")]
    UnsupportedFormat(String),

    /// The caller's region list contains no usable entries after
    /// normalization.
    #[error("regions cannot be empty")]
    EmptyRegionSet,

    /// Snapshot file could not be read.
    #[error("failed to read snapshot: {0}")]
    Read(#[from] std::io::Error),

    /// Snapshot file could not be parsed as JSON.
    #[error("failed to parse snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the failure is the caller's fault.
    ///
    /// The HTTP layer maps client errors to 400 and everything else to 500.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::EmptyRegionSet)
    }
}
