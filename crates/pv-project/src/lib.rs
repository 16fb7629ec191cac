//! pv-project: the simulation project as seen by the results viewer.
//!
//! Defines the [`Project`]/[`CaseSource`] interface the result model consumes,
//! the project file schema, and [`MemoryProject`], an in-memory implementation
//! that fires the same notifications a live engine does.

pub mod memory;
pub mod params;
pub mod schema;
pub mod source;
pub mod validate;

pub use memory::{CaseState, MemoryCase, MemoryProject};
pub use params::{
    continuous_variables_ungrouped, discrete_variables_ungrouped, result_name, ungroup,
};
pub use schema::*;
pub use source::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_project};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Case not found: {index}")]
    CaseNotFound { index: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<ProjectDef> {
    let content = std::fs::read_to_string(path)?;
    let project: ProjectDef = serde_yaml::from_str(&content)?;
    validate_project(&project)?;
    tracing::debug!(path = %path.display(), cases = project.cases.len(), "loaded project");
    Ok(project)
}

pub fn save_yaml(path: &std::path::Path, project: &ProjectDef) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<ProjectDef> {
    let content = std::fs::read_to_string(path)?;
    let project: ProjectDef = serde_json::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_json(path: &std::path::Path, project: &ProjectDef) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_json::to_string_pretty(project)?;
    std::fs::write(path, content)?;
    Ok(())
}
