use pv_project::*;
use std::collections::BTreeMap;

fn sample_project() -> ProjectDef {
    let mut inputs = BTreeMap::new();
    inputs.insert("x".to_string(), ValueDef::Integer(2));
    inputs.insert("mode".to_string(), ValueDef::Text("fast".to_string()));

    let mut result = BTreeMap::new();
    result.insert("Y".to_string(), ValueDef::Real(4.5));
    result.insert("trace".to_string(), ValueDef::Reals(vec![1.0, 2.0, 3.0]));
    result.insert("steps".to_string(), ValueDef::Ints { ints: vec![1, 2, 3] });
    result.insert("note".to_string(), ValueDef::Null);

    ProjectDef {
        version: LATEST_VERSION,
        name: "Roundtrip".to_string(),
        designer: None,
        main_output: Some(OutputFunctionDef {
            name: "Y".to_string(),
            expression: Some("max(Y)".to_string()),
        }),
        outputs: vec!["Y".to_string(), "trace".to_string()],
        discrete: vec![
            ParameterDef::Variable(VariableDef {
                name: "x".to_string(),
                values: vec!["1".to_string(), "2".to_string()],
            }),
            ParameterDef::Group {
                group: "settings".to_string(),
                variables: vec![VariableDef::new("mode")],
            },
        ],
        continuous: vec![],
        cases: vec![
            CaseDef {
                inputs: inputs.clone(),
                status: String::new(),
                result: Some(result),
            },
            CaseDef {
                inputs,
                status: "12% 1/8".to_string(),
                result: None,
            },
        ],
        design_sessions: vec![DesignSessionDef {
            fixed: [("x".to_string(), ValueDef::Integer(1))].into_iter().collect(),
            analysis: Some("<mean>1.0</mean>".to_string()),
        }],
    }
}

#[test]
fn roundtrip_yaml_empty_project() {
    let project = ProjectDef {
        version: LATEST_VERSION,
        name: "Empty".to_string(),
        designer: None,
        main_output: None,
        outputs: vec![],
        discrete: vec![],
        continuous: vec![],
        cases: vec![],
        design_sessions: vec![],
    };

    let path = std::env::temp_dir().join("pv_project_roundtrip_empty.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_yaml_cases_and_sessions() {
    let project = sample_project();
    let path = std::env::temp_dir().join("pv_project_roundtrip_cases.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json_cases_and_sessions() {
    let project = sample_project();
    let path = std::env::temp_dir().join("pv_project_roundtrip_cases.json");
    save_json(&path, &project).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(project, loaded);
}

#[test]
fn memory_project_exports_its_definition() {
    let project = sample_project();
    let memory = MemoryProject::from_def(project.clone());
    assert_eq!(memory.to_def(), project);
}

#[test]
fn save_rejects_invalid_project() {
    let mut project = sample_project();
    project.version = 99;
    let path = std::env::temp_dir().join("pv_project_invalid.yaml");
    let err = save_yaml(&path, &project).unwrap_err();
    assert!(matches!(
        err,
        ProjectError::Validation(ValidationError::UnsupportedVersion { found: 99, .. })
    ));
}
