//! Error types for the pv-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for every frontend.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Workers still busy after {waited_ms} ms")]
    Timeout { waited_ms: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pv-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<pv_project::ProjectError> for AppError {
    fn from(err: pv_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<pv_results::ResultsError> for AppError {
    fn from(err: pv_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

impl From<pv_core::PvError> for AppError {
    fn from(err: pv_core::PvError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
