//! Shared application service layer for parview.
//!
//! Frontends go through this crate to load projects, open a results session
//! on them and turn result snapshots into presentation rows.

pub mod config;
pub mod error;
pub mod project_service;
pub mod query;
pub mod session;

// Re-export key types for convenience
pub use config::{ViewerConfig, load_config};
pub use error::{AppError, AppResult};
pub use project_service::{
    ProjectSummary, VariableKind, VariableSummary, list_variables, load_project, save_project,
    summarize, validate_project,
};
pub use query::{CaseRow, DoeRow, SparkSeries, case_row, case_rows, doe_rows};
pub use session::ResultsSession;
