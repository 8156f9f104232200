//! Error types for the exporter.

use thiserror::Error;

use crate::auth::AuthError;

/// Primary error type for every stage of the export pipeline.
#[derive(Error, Debug)]
pub enum ExporterError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Authentication(#[from] AuthError),

    #[error("API Error: {status}")]
    Fetch { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed repository record: {0}")]
    MalformedRecord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<reqwest::Error> for ExporterError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl ExporterError {
    /// Whether this error is a transient transport failure worth retrying.
    ///
    /// Only listing requests are retried; HTTP statuses and every
    /// authentication failure are final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ExporterError>;
