//! The result model: every case result of a project, kept in sync with the
//! project's notifications.
//!
//! Readers work on an immutable [`ResultsSnapshot`]. Every observable change
//! publishes a new snapshot (with a new `cases` map instance and a higher
//! version) and then fires [`ModelChanged`]. Per-case work runs on ad hoc
//! worker threads so notifications never block the project.

use parking_lot::{Condvar, Mutex, RwLock};
use pv_core::{ListenerId, ListenerSet};
use pv_project::{
    CaseChangeKind, CaseModified, CaseSource, Project, ProjectStatus, SINGLE_PARAM_NAME,
    continuous_variables_ungrouped, discrete_variables_ungrouped, result_name,
};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::{Duration, Instant};

use crate::case_result::CaseResult;
use crate::doe::DoeCaseResult;
use crate::extractor::CaseExtractor;
use crate::merge::MergedCaseResult;
use crate::{ResultsError, ResultsResult};

/// Grouping selector that shows every case on its own row.
pub const NO_GROUPING: &str = crate::i18n::NO_GROUPING_LABEL;

/// Delimiter between variable values in a grouping key.
const GROUP_KEY_DELIMITER: &str = "-";

/// Fired after a new snapshot has been published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelChanged {
    pub version: u64,
}

/// Immutable view of the model at one version.
#[derive(Debug, Clone, Default)]
pub struct ResultsSnapshot {
    pub version: u64,
    pub variables: BTreeSet<String>,
    pub discrete_variables: BTreeSet<String>,
    /// Rows by index: live cases, or merged groups re-indexed from 0.
    pub cases: Arc<BTreeMap<usize, CaseResult>>,
    pub doe_results: Arc<Vec<Arc<DoeCaseResult>>>,
    pub doe_outputs: Vec<String>,
    pub result_name: String,
    pub has_design: bool,
    /// Selected grouping variable, `None` when ungrouped.
    pub grouping: Option<String>,
}

impl ResultsSnapshot {
    pub fn discrete_results(&self) -> Vec<CaseResult> {
        self.cases.values().cloned().collect()
    }

    pub fn doe_case_results(&self) -> Vec<CaseResult> {
        self.doe_results
            .iter()
            .map(|doe| CaseResult::Doe(Arc::clone(doe)))
            .collect()
    }

    /// Whether `other` was published with the same `cases` map instance.
    pub fn same_cases(&self, other: &ResultsSnapshot) -> bool {
        Arc::ptr_eq(&self.cases, &other.cases)
    }
}

#[derive(Debug, Default)]
struct WorkerTracker {
    pending: Mutex<usize>,
    idle: Condvar,
}

impl WorkerTracker {
    fn begin(&self) {
        *self.pending.lock() += 1;
    }

    fn end(&self) {
        let mut pending = self.pending.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.idle.notify_all();
        }
    }

    fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut pending = self.pending.lock();
        while *pending > 0 {
            match deadline {
                Some(deadline) => {
                    if self.idle.wait_until(&mut pending, deadline).timed_out() {
                        return *pending == 0;
                    }
                }
                // unrepresentable deadline
                None => self.idle.wait(&mut pending),
            }
        }
        true
    }
}

struct WorkerGuard<'a>(&'a WorkerTracker);

impl Drop for WorkerGuard<'_> {
    fn drop(&mut self) {
        self.0.end();
    }
}

#[derive(Debug, Default)]
struct Subscriptions {
    status: Option<ListenerId>,
    case_modified: Option<ListenerId>,
    design_updated: Option<ListenerId>,
}

pub struct ResultModel {
    project: Arc<dyn Project>,
    published: RwLock<Arc<ResultsSnapshot>>,
    /// Serialises structural changes: variable sets, extractor creation,
    /// grouping. Never held while an extractor updates.
    structure: Mutex<()>,
    /// Ungrouped extractors by case index; entries are never replaced.
    original_cases: RwLock<BTreeMap<usize, Arc<CaseExtractor>>>,
    listeners: ListenerSet<ModelChanged>,
    workers: WorkerTracker,
    subscriptions: Mutex<Subscriptions>,
}

impl ResultModel {
    /// Create a model that is not connected to the project's notifications.
    pub fn new(project: Arc<dyn Project>) -> Self {
        Self {
            project,
            published: RwLock::new(Arc::new(ResultsSnapshot::default())),
            structure: Mutex::new(()),
            original_cases: RwLock::new(BTreeMap::new()),
            listeners: ListenerSet::new(),
            workers: WorkerTracker::default(),
            subscriptions: Mutex::new(Subscriptions::default()),
        }
    }

    /// Create a model and subscribe it to the project's notifications.
    pub fn attach(project: Arc<dyn Project>) -> Arc<Self> {
        let model = Arc::new(Self::new(project));
        model.subscribe();
        model
    }

    fn subscribe(self: &Arc<Self>) {
        let events = self.project.events();

        let weak: Weak<Self> = Arc::downgrade(self);
        let status = events.status.add(move |status| {
            if let Some(model) = weak.upgrade() {
                model.on_status(*status);
            }
        });

        let weak: Weak<Self> = Arc::downgrade(self);
        let case_modified = events.case_modified.add(move |event| {
            if let Some(model) = weak.upgrade() {
                model.on_case_modified(*event);
            }
        });

        let weak: Weak<Self> = Arc::downgrade(self);
        let design_updated = events.design_updated.add(move |index| {
            if let Some(model) = weak.upgrade() {
                model.dispatch_refresh(*index);
            }
        });

        *self.subscriptions.lock() = Subscriptions {
            status: Some(status),
            case_modified: Some(case_modified),
            design_updated: Some(design_updated),
        };
    }

    /// Stop reacting to project notifications.
    pub fn detach(&self) {
        let mut subscriptions = self.subscriptions.lock();
        let events = self.project.events();
        if let Some(id) = subscriptions.status.take() {
            events.status.remove(id);
        }
        if let Some(id) = subscriptions.case_modified.take() {
            events.case_modified.remove(id);
        }
        if let Some(id) = subscriptions.design_updated.take() {
            events.design_updated.remove(id);
        }
    }

    pub fn project(&self) -> &Arc<dyn Project> {
        &self.project
    }

    pub fn listeners(&self) -> &ListenerSet<ModelChanged> {
        &self.listeners
    }

    /// Current published snapshot.
    pub fn snapshot(&self) -> Arc<ResultsSnapshot> {
        Arc::clone(&self.published.read())
    }

    pub fn version(&self) -> u64 {
        self.published.read().version
    }

    pub fn variables(&self) -> BTreeSet<String> {
        self.snapshot().variables.clone()
    }

    pub fn discrete_variables(&self) -> BTreeSet<String> {
        self.snapshot().discrete_variables.clone()
    }

    pub fn discrete_results(&self) -> Vec<CaseResult> {
        self.snapshot().discrete_results()
    }

    pub fn doe_results(&self) -> Vec<CaseResult> {
        self.snapshot().doe_case_results()
    }

    pub fn doe_outputs(&self) -> Vec<String> {
        self.snapshot().doe_outputs.clone()
    }

    pub fn result_name(&self) -> String {
        self.snapshot().result_name.clone()
    }

    pub fn has_design(&self) -> bool {
        self.snapshot().has_design
    }

    /// Ungrouped extractors by case index.
    pub fn original_cases(&self) -> BTreeMap<usize, Arc<CaseExtractor>> {
        self.original_cases.read().clone()
    }

    /// Block until every dispatched worker has finished, up to `timeout`.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.workers.wait_idle(timeout)
    }

    fn on_status(self: &Arc<Self>, status: ProjectStatus) {
        tracing::debug!(?status, "project status changed");
        match status {
            ProjectStatus::Running => {
                self.clear_model();
                self.dispatch_fill();
            }
            ProjectStatus::Results => self.dispatch_fill(),
            ProjectStatus::Initial => self.clear_model(),
            ProjectStatus::Failed => {}
        }
    }

    fn on_case_modified(self: &Arc<Self>, event: CaseModified) {
        match event.kind {
            CaseChangeKind::Calc | CaseChangeKind::State => self.dispatch_refresh(event.index),
            CaseChangeKind::Info | CaseChangeKind::Time => {
                self.fire_value_changed();
            }
        }
    }

    fn dispatch_fill(self: &Arc<Self>) {
        self.dispatch("fill", |model| model.fill_model());
    }

    fn dispatch_refresh(self: &Arc<Self>, index: usize) {
        self.dispatch("refresh", move |model| {
            model.refresh_case(index);
        });
    }

    /// Run `job` on a fresh worker thread.
    fn dispatch<F>(self: &Arc<Self>, name: &'static str, job: F)
    where
        F: FnOnce(&ResultModel) + Send + 'static,
    {
        self.workers.begin();
        let model = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name(format!("pv-{}", name))
            .spawn(move || {
                let _done = WorkerGuard(&model.workers);
                job(&model);
            });
        if let Err(err) = spawned {
            tracing::warn!(worker = name, error = %err, "failed to spawn model worker");
            self.workers.end();
        }
    }

    /// Publish a new snapshot built by `mutate` without notifying.
    fn publish(&self, mutate: impl FnOnce(&mut ResultsSnapshot)) -> u64 {
        let mut published = self.published.write();
        let mut next = ResultsSnapshot::clone(&published);
        mutate(&mut next);
        next.cases = Arc::new(BTreeMap::clone(&next.cases));
        next.version += 1;
        let version = next.version;
        *published = Arc::new(next);
        version
    }

    /// Publish a new snapshot built by `mutate` and notify listeners.
    fn commit(&self, mutate: impl FnOnce(&mut ResultsSnapshot)) -> u64 {
        let version = self.publish(mutate);
        self.listeners.fire(&ModelChanged { version });
        version
    }

    /// Republish the current state so observers see a new version.
    pub fn fire_value_changed(&self) -> u64 {
        self.commit(|_| {})
    }

    /// Empty every published collection.
    ///
    /// Extractors already created stay available for reuse by index.
    pub fn clear_model(&self) {
        let structure = self.structure.lock();
        tracing::info!("clearing result model");
        let version = self.publish(|snapshot| {
            snapshot.variables.clear();
            snapshot.discrete_variables.clear();
            snapshot.cases = Arc::new(BTreeMap::new());
            snapshot.doe_results = Arc::new(Vec::new());
            snapshot.doe_outputs.clear();
            snapshot.has_design = false;
            snapshot.grouping = None;
        });
        drop(structure);
        self.listeners.fire(&ModelChanged { version });
    }

    /// Rebuild the whole model from the project.
    pub fn fill_model(&self) {
        let name = result_name(self.project.as_ref());
        let (variables, discrete_variables) = self.collect_variables();
        {
            let _structure = self.structure.lock();
            self.publish(|snapshot| {
                snapshot.result_name = name;
                snapshot.variables = variables;
                snapshot.discrete_variables = discrete_variables;
            });
        }

        if let Some(count) = self.project.case_count() {
            (0..count).into_par_iter().for_each(|index| {
                self.refresh_case_silently(index);
            });
            let has_design = !self.project.continuous_parameters().is_empty();
            self.publish(|snapshot| snapshot.has_design = has_design);
        }

        let mut doe_outputs = Vec::new();
        let mut doe_results = Vec::new();
        if let Some(sessions) = self.project.design_sessions() {
            for session in &sessions {
                let doe = DoeCaseResult::from_session(session);
                for name in doe.outputs().keys() {
                    if !doe_outputs.contains(name) {
                        doe_outputs.push(name.clone());
                    }
                }
                doe_results.push(Arc::new(doe));
            }
        }
        self.publish(|snapshot| {
            snapshot.doe_outputs = doe_outputs;
            snapshot.doe_results = Arc::new(doe_results);
        });

        let version = self.fire_value_changed();
        tracing::info!(version, "result model filled");
    }

    /// Bring the row of case `index` up to date.
    ///
    /// Returns `true` when something observable changed.
    pub fn refresh_case(&self, index: usize) -> bool {
        let changed = self.refresh_case_silently(index);
        if changed {
            self.fire_value_changed();
        }
        changed
    }

    fn refresh_case_silently(&self, index: usize) -> bool {
        let (extractor, rebuilt) = {
            let _structure = self.structure.lock();
            if self.published.read().variables.is_empty() {
                self.fill_variables();
            }

            let Some(project_cases) = self.project.cases() else {
                return false;
            };
            if index >= project_cases.len() {
                tracing::debug!(index, "refresh for a case the project does not have");
                return false;
            }

            let stale = self.original_cases.read().len() != project_cases.len()
                || self.published.read().cases.is_empty();
            if stale {
                self.create_extractors(&project_cases);
            }
            (self.original_cases.read().get(&index).cloned(), stale)
        };

        let updated = extractor.is_some_and(|extractor| extractor.update());
        updated || rebuilt
    }

    fn collect_variables(&self) -> (BTreeSet<String>, BTreeSet<String>) {
        let discrete: BTreeSet<String> = discrete_variables_ungrouped(self.project.as_ref())
            .into_iter()
            .map(|var| var.name)
            .collect();
        let mut variables = discrete.clone();
        variables.extend(
            continuous_variables_ungrouped(self.project.as_ref())
                .into_iter()
                .map(|var| var.name),
        );

        let mut discrete = discrete;
        if variables.is_empty() {
            variables.insert(SINGLE_PARAM_NAME.to_string());
        }
        if discrete.is_empty() {
            discrete.insert(SINGLE_PARAM_NAME.to_string());
        }
        (variables, discrete)
    }

    /// Caller holds the structure lock.
    fn fill_variables(&self) {
        let (variables, discrete_variables) = self.collect_variables();
        self.publish(|snapshot| {
            snapshot.variables = variables;
            snapshot.discrete_variables = discrete_variables;
        });
    }

    /// Create the missing extractors and re-derive the rows.
    ///
    /// Caller holds the structure lock.
    fn create_extractors(&self, project_cases: &[Arc<dyn CaseSource>]) {
        let created = {
            let mut originals = self.original_cases.write();
            let before = originals.len();
            for (index, case) in project_cases.iter().enumerate() {
                originals.entry(index).or_insert_with(|| {
                    Arc::new(CaseExtractor::new(
                        Arc::clone(&self.project),
                        Arc::clone(case),
                    ))
                });
            }
            originals.len() - before
        };
        tracing::debug!(created, total = project_cases.len(), "case extractors created");

        let snapshot = self.snapshot();
        let cases = {
            let originals = self.original_cases.read();
            derive_cases(
                &originals,
                snapshot.grouping.as_deref(),
                &snapshot.discrete_variables,
            )
        };
        self.publish(|snapshot| snapshot.cases = Arc::new(cases));
    }

    /// Group rows by every discrete variable except `selector`.
    ///
    /// [`NO_GROUPING`] restores one row per case.
    pub fn group_variable(&self, selector: &str) -> ResultsResult<()> {
        let structure = self.structure.lock();
        let snapshot = self.snapshot();
        let grouping = if selector == NO_GROUPING {
            None
        } else if snapshot.discrete_variables.contains(selector) {
            Some(selector.to_string())
        } else {
            return Err(ResultsError::UnknownGroupingVariable {
                name: selector.to_string(),
            });
        };

        let cases = {
            let originals = self.original_cases.read();
            derive_cases(
                &originals,
                grouping.as_deref(),
                &snapshot.discrete_variables,
            )
        };
        tracing::info!(grouping = ?grouping, rows = cases.len(), "regrouped cases");
        let version = self.publish(|snapshot| {
            snapshot.cases = Arc::new(cases);
            snapshot.grouping = grouping;
        });
        drop(structure);
        self.listeners.fire(&ModelChanged { version });
        Ok(())
    }
}

impl Drop for ResultModel {
    fn drop(&mut self) {
        self.detach();
    }
}

impl core::fmt::Debug for ResultModel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResultModel")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

/// Rows for the given grouping selection.
fn derive_cases(
    originals: &BTreeMap<usize, Arc<CaseExtractor>>,
    grouping: Option<&str>,
    discrete_variables: &BTreeSet<String>,
) -> BTreeMap<usize, CaseResult> {
    let Some(selector) = grouping else {
        return originals
            .iter()
            .map(|(index, extractor)| (*index, CaseResult::Live(Arc::clone(extractor))))
            .collect();
    };

    let key_variables: Vec<&String> = discrete_variables
        .iter()
        .filter(|name| name.as_str() != selector)
        .collect();

    let mut bucket_of_key: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<Vec<Arc<CaseExtractor>>> = Vec::new();
    for extractor in originals.values() {
        let key = key_variables
            .iter()
            .map(|name| extractor.value_for_variable(name))
            .collect::<Vec<_>>()
            .join(GROUP_KEY_DELIMITER);
        let bucket = *bucket_of_key.entry(key).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[bucket].push(Arc::clone(extractor));
    }

    buckets
        .into_iter()
        .enumerate()
        .map(|(index, siblings)| {
            let merged =
                MergedCaseResult::with_default_mergers(siblings, discrete_variables.clone());
            (index, CaseResult::Merged(Arc::new(merged)))
        })
        .collect()
}
