//! Structural validation of project definitions.

use std::collections::BTreeSet;

use crate::params::ungroup;
use crate::schema::ProjectDef;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unsupported project version {found} (latest is {latest})")]
    UnsupportedVersion { found: u32, latest: u32 },

    #[error("Variable name must not be empty")]
    EmptyVariableName,

    #[error("Variable '{name}' is declared more than once")]
    DuplicateVariable { name: String },

    #[error("Case {case} sets unknown variable '{name}'")]
    UnknownInput { case: usize, name: String },

    #[error("Main output '{name}' is not a declared output")]
    MainOutputNotDeclared { name: String },
}

pub fn validate_project(project: &ProjectDef) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            found: project.version,
            latest: LATEST_VERSION,
        });
    }

    let mut names = BTreeSet::new();
    for var in ungroup(&project.discrete)
        .into_iter()
        .chain(ungroup(&project.continuous))
    {
        if var.name.trim().is_empty() {
            return Err(ValidationError::EmptyVariableName);
        }
        if !names.insert(var.name.clone()) {
            return Err(ValidationError::DuplicateVariable { name: var.name });
        }
    }

    if !names.is_empty() {
        for (case, def) in project.cases.iter().enumerate() {
            if let Some(name) = def.inputs.keys().find(|name| !names.contains(*name)) {
                return Err(ValidationError::UnknownInput {
                    case,
                    name: name.clone(),
                });
            }
        }
    }

    if let Some(main) = &project.main_output
        && !project.outputs.is_empty()
        && !project.outputs.contains(&main.name)
    {
        return Err(ValidationError::MainOutputNotDeclared {
            name: main.name.clone(),
        });
    }

    Ok(())
}
