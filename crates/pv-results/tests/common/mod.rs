#![allow(dead_code)]

use pv_core::Value;
use pv_project::{
    CaseDef, MemoryProject, OutputFunctionDef, ParameterDef, ProjectDef, ValueDef, VariableDef,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Project with discrete variables `a`, `b`, `c` and `cases` pending cases.
///
/// Case `i` has `a = i % 2`, `b = i % 3`, `c = i`.
pub fn three_variable_project(cases: usize) -> Arc<MemoryProject> {
    Arc::new(MemoryProject::from_def(three_variable_def(cases)))
}

pub fn three_variable_def(cases: usize) -> ProjectDef {
    let cases = (0..cases)
        .map(|i| CaseDef {
            inputs: [
                ("a".to_string(), ValueDef::Integer((i % 2) as i64)),
                ("b".to_string(), ValueDef::Integer((i % 3) as i64)),
                ("c".to_string(), ValueDef::Integer(i as i64)),
            ]
            .into_iter()
            .collect(),
            status: String::new(),
            result: None,
        })
        .collect();

    ProjectDef {
        version: 1,
        name: "three".to_string(),
        designer: None,
        main_output: Some(OutputFunctionDef {
            name: "Y".to_string(),
            expression: None,
        }),
        outputs: vec!["Y".to_string()],
        discrete: vec![
            ParameterDef::Variable(VariableDef::new("a")),
            ParameterDef::Variable(VariableDef::new("b")),
            ParameterDef::Variable(VariableDef::new("c")),
        ],
        continuous: Vec::new(),
        cases,
        design_sessions: Vec::new(),
    }
}

pub fn outputs(entries: &[(&str, Value)]) -> BTreeMap<String, Value> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}
