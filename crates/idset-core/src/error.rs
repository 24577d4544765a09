//! Error types for interactive datasets.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Lookup errors
    #[error("Interactive dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Query of interactive dataset is not specified: {0}")]
    QueryNotConfigured(String),

    #[error("Chart template of interactive dataset is not specified: {0}")]
    ChartNotConfigured(String),

    // Execution errors
    #[error("Query execution failed: {0}")]
    Execution(String),

    // Registry errors
    #[error("Registry refresh failed: {0}")]
    Refresh(String),

    #[error("Invalid query params of dataset {id}: {reason}")]
    InvalidParams { id: String, reason: String },

    // Rendering errors
    #[error("Render failed: {0}")]
    Render(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl Error {
    /// Whether the error names a dataset the registry does not know.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::DatasetNotFound(_))
    }

    /// Whether the dataset exists but cannot serve the requested output.
    pub fn is_unconfigured(&self) -> bool {
        matches!(
            self,
            Error::QueryNotConfigured(_) | Error::ChartNotConfigured(_)
        )
    }
}
