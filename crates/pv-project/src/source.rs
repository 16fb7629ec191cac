//! Interface of the simulation project as seen by the results viewer.
//!
//! The project engine owns case execution, parameters and persistence. The
//! viewer only reads through [`Project`] and [`CaseSource`] and reacts to the
//! notifications published on [`ProjectEvents`].

use pv_core::{ListenerSet, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::schema::ParameterDef;

/// Variable name used when a project declares no variable at all.
pub const SINGLE_PARAM_NAME: &str = "all-in-one";

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectStatus {
    Initial,
    Running,
    Failed,
    Results,
}

/// What changed on a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseChangeKind {
    /// Computed value changed.
    Calc,
    /// Run state changed.
    State,
    /// Informational text changed.
    Info,
    /// Timing changed.
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseModified {
    pub index: usize,
    pub kind: CaseChangeKind,
}

/// Notification channel of a project.
#[derive(Debug, Default)]
pub struct ProjectEvents {
    pub status: ListenerSet<ProjectStatus>,
    pub case_modified: ListenerSet<CaseModified>,
    /// Carries the design (case) index that was updated.
    pub design_updated: ListenerSet<usize>,
}

/// One parameterized computation tracked by the project.
pub trait CaseSource: Send + Sync {
    fn index(&self) -> usize;

    fn has_run(&self) -> bool;

    /// Structured outputs, available once the case has run.
    fn result(&self) -> Option<BTreeMap<String, Value>>;

    /// Free-form engine status, meaningful while the case is pending.
    fn status_information(&self) -> String;

    /// Input variable values keyed by variable name.
    fn input_values(&self) -> BTreeMap<String, String>;
}

/// An analysis session of a design of experiments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesignSession {
    pub fixed_parameters: BTreeMap<String, Value>,
    pub analysis: Option<String>,
}

pub trait Project: Send + Sync {
    fn events(&self) -> &ProjectEvents;

    fn status(&self) -> ProjectStatus;

    /// Case collection in index order, `None` before the project has cases.
    fn cases(&self) -> Option<Vec<Arc<dyn CaseSource>>>;

    fn case_count(&self) -> Option<usize> {
        self.cases().map(|cases| cases.len())
    }

    /// Parameter strings of the case at `index`.
    fn case_parameters(&self, index: usize) -> Option<BTreeMap<String, String>>;

    fn discrete_parameters(&self) -> Vec<ParameterDef>;

    fn continuous_parameters(&self) -> Vec<ParameterDef>;

    fn main_output_function_name(&self) -> Option<String>;

    /// Symbolic form of the main output function, if it has one.
    fn main_output_expression(&self) -> Option<String>;

    fn output_function_names(&self) -> Vec<String>;

    /// `None` when the project does not use a design of experiments.
    fn designer_id(&self) -> Option<String>;

    fn design_output_title(&self) -> Option<String>;

    fn design_sessions(&self) -> Option<Vec<DesignSession>>;
}
