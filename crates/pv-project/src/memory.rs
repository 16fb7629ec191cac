//! In-memory project backed by a [`ProjectDef`].
//!
//! Mutations behave like a live engine: each state change is stored first and
//! the matching notification is fired afterwards, on the calling thread.

use parking_lot::RwLock;
use pv_core::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::schema::{
    CaseDef, DesignSessionDef, DesignerDef, OutputFunctionDef, ParameterDef, ProjectDef,
    to_def_map, to_value_map,
};
use crate::source::{
    CaseChangeKind, CaseModified, CaseSource, DesignSession, Project, ProjectEvents, ProjectStatus,
};
use crate::{LATEST_VERSION, ProjectError, ProjectResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseState {
    pub has_run: bool,
    pub status: String,
    pub result: Option<BTreeMap<String, Value>>,
}

#[derive(Debug)]
pub struct MemoryCase {
    index: usize,
    inputs: BTreeMap<String, Value>,
    state: RwLock<CaseState>,
}

impl MemoryCase {
    pub fn new(index: usize, inputs: BTreeMap<String, Value>, state: CaseState) -> Self {
        Self {
            index,
            inputs,
            state: RwLock::new(state),
        }
    }

    pub fn state(&self) -> CaseState {
        self.state.read().clone()
    }

    pub fn inputs(&self) -> &BTreeMap<String, Value> {
        &self.inputs
    }

    fn replace_state(&self, state: CaseState) {
        *self.state.write() = state;
    }

    fn to_def(&self) -> CaseDef {
        let state = self.state.read();
        CaseDef {
            inputs: to_def_map(&self.inputs),
            status: state.status.clone(),
            result: state.result.as_ref().map(|result| {
                let outputs: BTreeMap<String, Value> = result
                    .iter()
                    .filter(|(k, _)| !self.inputs.contains_key(*k))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                to_def_map(&outputs)
            }),
        }
    }
}

impl CaseSource for MemoryCase {
    fn index(&self) -> usize {
        self.index
    }

    fn has_run(&self) -> bool {
        self.state.read().has_run
    }

    fn result(&self) -> Option<BTreeMap<String, Value>> {
        self.state.read().result.clone()
    }

    fn status_information(&self) -> String {
        self.state.read().status.clone()
    }

    fn input_values(&self) -> BTreeMap<String, String> {
        self.inputs
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

#[derive(Debug)]
pub struct MemoryProject {
    name: String,
    designer: Option<DesignerDef>,
    main_output: Option<OutputFunctionDef>,
    outputs: Vec<String>,
    discrete: Vec<ParameterDef>,
    continuous: Vec<ParameterDef>,
    cases: RwLock<Vec<Arc<MemoryCase>>>,
    design_sessions: RwLock<Vec<DesignSession>>,
    status: RwLock<ProjectStatus>,
    events: ProjectEvents,
}

impl MemoryProject {
    pub fn from_def(def: ProjectDef) -> Self {
        let cases = def
            .cases
            .iter()
            .enumerate()
            .map(|(index, case)| {
                let inputs = to_value_map(&case.inputs);
                let state = match &case.result {
                    Some(outputs) => CaseState {
                        has_run: true,
                        status: String::new(),
                        result: Some(engine_result(&inputs, to_value_map(outputs))),
                    },
                    None => CaseState {
                        has_run: false,
                        status: case.status.clone(),
                        result: None,
                    },
                };
                Arc::new(MemoryCase::new(index, inputs, state))
            })
            .collect();

        let design_sessions = def
            .design_sessions
            .iter()
            .map(|session| DesignSession {
                fixed_parameters: to_value_map(&session.fixed),
                analysis: session.analysis.clone(),
            })
            .collect();

        Self {
            name: def.name,
            designer: def.designer,
            main_output: def.main_output,
            outputs: def.outputs,
            discrete: def.discrete,
            continuous: def.continuous,
            cases: RwLock::new(cases),
            design_sessions: RwLock::new(design_sessions),
            status: RwLock::new(ProjectStatus::Initial),
            events: ProjectEvents::default(),
        }
    }

    pub fn to_def(&self) -> ProjectDef {
        ProjectDef {
            version: LATEST_VERSION,
            name: self.name.clone(),
            designer: self.designer.clone(),
            main_output: self.main_output.clone(),
            outputs: self.outputs.clone(),
            discrete: self.discrete.clone(),
            continuous: self.continuous.clone(),
            cases: self.cases.read().iter().map(|case| case.to_def()).collect(),
            design_sessions: self
                .design_sessions
                .read()
                .iter()
                .map(|session| DesignSessionDef {
                    fixed: to_def_map(&session.fixed_parameters),
                    analysis: session.analysis.clone(),
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn case(&self, index: usize) -> Option<Arc<MemoryCase>> {
        self.cases.read().get(index).cloned()
    }

    fn require_case(&self, index: usize) -> ProjectResult<Arc<MemoryCase>> {
        self.case(index)
            .ok_or(ProjectError::CaseNotFound { index })
    }

    pub fn set_status(&self, status: ProjectStatus) {
        *self.status.write() = status;
        self.events.status.fire(&status);
    }

    /// Mark a case as pending with the given engine status text.
    pub fn set_case_status(&self, index: usize, status: impl Into<String>) -> ProjectResult<()> {
        let case = self.require_case(index)?;
        case.replace_state(CaseState {
            has_run: false,
            status: status.into(),
            result: None,
        });
        self.notify_case(index, CaseChangeKind::State);
        Ok(())
    }

    /// Mark a case as finished with the given outputs.
    ///
    /// Like the engine, the stored result map also echoes the case inputs.
    pub fn finish_case(&self, index: usize, outputs: BTreeMap<String, Value>) -> ProjectResult<()> {
        let case = self.require_case(index)?;
        case.replace_state(CaseState {
            has_run: true,
            status: String::new(),
            result: Some(engine_result(case.inputs(), outputs)),
        });
        self.notify_case(index, CaseChangeKind::Calc);
        Ok(())
    }

    /// Append a new pending case and return its index.
    pub fn add_case(&self, inputs: BTreeMap<String, Value>) -> usize {
        let index = {
            let mut cases = self.cases.write();
            let index = cases.len();
            cases.push(Arc::new(MemoryCase::new(
                index,
                inputs,
                CaseState::default(),
            )));
            index
        };
        self.notify_case(index, CaseChangeKind::State);
        index
    }

    pub fn notify_case(&self, index: usize, kind: CaseChangeKind) {
        self.events.case_modified.fire(&CaseModified { index, kind });
    }

    pub fn set_design_sessions(&self, sessions: Vec<DesignSession>) {
        *self.design_sessions.write() = sessions;
    }

    pub fn notify_design_updated(&self, index: usize) {
        self.events.design_updated.fire(&index);
    }
}

fn engine_result(
    inputs: &BTreeMap<String, Value>,
    outputs: BTreeMap<String, Value>,
) -> BTreeMap<String, Value> {
    let mut result: BTreeMap<String, Value> = inputs.clone();
    result.extend(outputs);
    result
}

impl Project for MemoryProject {
    fn events(&self) -> &ProjectEvents {
        &self.events
    }

    fn status(&self) -> ProjectStatus {
        *self.status.read()
    }

    fn cases(&self) -> Option<Vec<Arc<dyn CaseSource>>> {
        Some(
            self.cases
                .read()
                .iter()
                .map(|case| Arc::clone(case) as Arc<dyn CaseSource>)
                .collect(),
        )
    }

    fn case_count(&self) -> Option<usize> {
        Some(self.cases.read().len())
    }

    fn case_parameters(&self, index: usize) -> Option<BTreeMap<String, String>> {
        self.case(index).map(|case| case.input_values())
    }

    fn discrete_parameters(&self) -> Vec<ParameterDef> {
        self.discrete.clone()
    }

    fn continuous_parameters(&self) -> Vec<ParameterDef> {
        self.continuous.clone()
    }

    fn main_output_function_name(&self) -> Option<String> {
        self.main_output.as_ref().map(|out| out.name.clone())
    }

    fn main_output_expression(&self) -> Option<String> {
        self.main_output
            .as_ref()
            .and_then(|out| out.expression.clone())
    }

    fn output_function_names(&self) -> Vec<String> {
        self.outputs.clone()
    }

    fn designer_id(&self) -> Option<String> {
        self.designer.as_ref().map(|d| d.id.clone())
    }

    fn design_output_title(&self) -> Option<String> {
        self.designer
            .as_ref()
            .and_then(|d| d.output_title.clone())
    }

    fn design_sessions(&self) -> Option<Vec<DesignSession>> {
        let sessions = self.design_sessions.read();
        if sessions.is_empty() {
            None
        } else {
            Some(sessions.clone())
        }
    }
}
