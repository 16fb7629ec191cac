//! Parameter helpers shared by every project implementation.

use crate::schema::{ParameterDef, VariableDef};
use crate::source::Project;

/// Flatten groups into their member variables, preserving declaration order.
pub fn ungroup(parameters: &[ParameterDef]) -> Vec<VariableDef> {
    let mut vars = Vec::new();
    for parameter in parameters {
        match parameter {
            ParameterDef::Group { variables, .. } => vars.extend(variables.iter().cloned()),
            ParameterDef::Variable(var) => vars.push(var.clone()),
        }
    }
    vars
}

pub fn discrete_variables_ungrouped(project: &dyn Project) -> Vec<VariableDef> {
    ungroup(&project.discrete_parameters())
}

pub fn continuous_variables_ungrouped(project: &dyn Project) -> Vec<VariableDef> {
    ungroup(&project.continuous_parameters())
}

/// Title of the displayed result.
///
/// Without a designer this is the main output function (its symbolic form when
/// available); with a designer it is the designer's output title.
pub fn result_name(project: &dyn Project) -> String {
    match project.designer_id() {
        None => project
            .main_output_expression()
            .or_else(|| project.main_output_function_name())
            .unwrap_or_default(),
        Some(_) => project.design_output_title().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ungroup_flattens_groups_in_order() {
        let params = vec![
            ParameterDef::Variable(VariableDef::new("a")),
            ParameterDef::Group {
                group: "g".to_string(),
                variables: vec![VariableDef::new("b"), VariableDef::new("c")],
            },
            ParameterDef::Variable(VariableDef::new("d")),
        ];
        let names: Vec<String> = ungroup(&params).into_iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }
}
