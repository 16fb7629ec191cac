use pv_project::*;
use std::path::PathBuf;

fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

#[test]
fn load_all_demos() {
    let entries = std::fs::read_dir(demos_dir()).unwrap();
    let mut loaded = 0;
    for entry in entries {
        let path = entry.unwrap().path();
        if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
            let project = load_yaml(&path)
                .unwrap_or_else(|e| panic!("failed to load {}: {}", path.display(), e));
            assert!(!project.cases.is_empty(), "{} has no cases", path.display());
            loaded += 1;
        }
    }
    assert!(loaded > 0);
}

#[test]
fn nozzle_sweep_shape() {
    let def = load_yaml(&demos_dir().join("nozzle_sweep.yaml")).unwrap();
    let project = MemoryProject::from_def(def);

    let names: Vec<String> = discrete_variables_ungrouped(&project)
        .into_iter()
        .map(|var| var.name)
        .collect();
    assert_eq!(names, vec!["throat", "ratio", "fuel"]);
    assert_eq!(result_name(&project), "mean(thrust)");
    assert_eq!(project.case_count(), Some(4));

    let first = project.case(0).unwrap();
    assert!(first.has_run());
    assert_eq!(first.input_values()["throat"], "0.8");

    let third = project.case(2).unwrap();
    assert!(!third.has_run());
    assert!(third.status_information().starts_with("40%"));

    let sessions = project.design_sessions().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].fixed_parameters["fuel"].to_string(), "A");
}
