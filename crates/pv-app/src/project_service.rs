//! Project loading, saving, validation, and introspection.

use pv_project::{ParameterDef, ProjectDef, ungroup};
use serde::Serialize;
use std::path::Path;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Discrete,
    Continuous,
}

/// One ungrouped variable of a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSummary {
    pub name: String,
    pub kind: VariableKind,
    /// Name of the enclosing group, if any.
    pub group: Option<String>,
    pub values: Vec<String>,
}

/// Summary of a project for listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub case_count: usize,
    pub finished_cases: usize,
    pub variable_count: usize,
    pub outputs: Vec<String>,
    pub main_output: Option<String>,
    pub design_sessions: usize,
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load a project from a YAML file, or JSON when the extension says so.
pub fn load_project(path: &Path) -> AppResult<ProjectDef> {
    if !path.exists() {
        return Err(AppError::InvalidInput(format!(
            "Project file not found: {}",
            path.display()
        )));
    }
    let project = if is_json(path) {
        pv_project::load_json(path)?
    } else {
        pv_project::load_yaml(path)?
    };
    Ok(project)
}

/// Save a project, choosing the format from the file extension.
pub fn save_project(path: &Path, project: &ProjectDef) -> AppResult<()> {
    if is_json(path) {
        pv_project::save_json(path, project)?;
    } else {
        pv_project::save_yaml(path, project)?;
    }
    Ok(())
}

/// Validate project structure.
pub fn validate_project(project: &ProjectDef) -> AppResult<()> {
    pv_project::validate_project(project)
        .map_err(|e| AppError::Project(format!("Validation failed: {}", e)))
}

pub fn summarize(project: &ProjectDef) -> ProjectSummary {
    ProjectSummary {
        name: project.name.clone(),
        case_count: project.cases.len(),
        finished_cases: project
            .cases
            .iter()
            .filter(|case| case.result.is_some())
            .count(),
        variable_count: ungroup(&project.discrete).len() + ungroup(&project.continuous).len(),
        outputs: project.outputs.clone(),
        main_output: project.main_output.as_ref().map(|out| out.name.clone()),
        design_sessions: project.design_sessions.len(),
    }
}

/// List every variable of the project, groups flattened in declaration order.
pub fn list_variables(project: &ProjectDef) -> Vec<VariableSummary> {
    let mut vars = Vec::new();
    collect_variables(&project.discrete, VariableKind::Discrete, &mut vars);
    collect_variables(&project.continuous, VariableKind::Continuous, &mut vars);
    vars
}

fn collect_variables(
    parameters: &[ParameterDef],
    kind: VariableKind,
    out: &mut Vec<VariableSummary>,
) {
    for parameter in parameters {
        match parameter {
            ParameterDef::Group { group, variables } => {
                out.extend(variables.iter().map(|var| VariableSummary {
                    name: var.name.clone(),
                    kind,
                    group: Some(group.clone()),
                    values: var.values.clone(),
                }));
            }
            ParameterDef::Variable(var) => out.push(VariableSummary {
                name: var.name.clone(),
                kind,
                group: None,
                values: var.values.clone(),
            }),
        }
    }
}
