//! Result extraction for a single case.

use core::fmt;
use parking_lot::{Mutex, RwLock};
use pv_core::{ListenerSet, Value};
use pv_project::{CaseSource, Project};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::i18n::ResultsText;
use crate::scrape::ProgressSignals;
use crate::sparkline::{OutputFunctionResult, Sparkline};

/// Fired by a [`CaseExtractor`] after an update that changed its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseUpdated {
    pub index: usize,
    pub revision: u64,
}

#[derive(Debug, Clone, Default)]
struct ExtractorState {
    /// Engine status as reported, before scraping.
    raw_status: String,
    /// Engine status with the progress signals removed.
    status: String,
    output: BTreeMap<String, Value>,
    progress: ProgressSignals,
    output_functions: BTreeMap<String, OutputFunctionResult>,
    revision: u64,
}

/// Wraps one case and keeps its status, outputs and progress up to date.
///
/// Updates of one extractor are serialised; different extractors update
/// independently.
pub struct CaseExtractor {
    project: Arc<dyn Project>,
    case: Arc<dyn CaseSource>,
    update_lock: Mutex<()>,
    parsing: AtomicBool,
    state: RwLock<ExtractorState>,
    listeners: ListenerSet<CaseUpdated>,
}

struct ParsingGuard<'a>(&'a AtomicBool);

impl<'a> ParsingGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for ParsingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl CaseExtractor {
    /// Wrap `case` and run a first extraction.
    pub fn new(project: Arc<dyn Project>, case: Arc<dyn CaseSource>) -> Self {
        let extractor = Self {
            project,
            case,
            update_lock: Mutex::new(()),
            parsing: AtomicBool::new(false),
            state: RwLock::new(ExtractorState::default()),
            listeners: ListenerSet::new(),
        };
        extractor.update();
        extractor
    }

    pub fn case(&self) -> &Arc<dyn CaseSource> {
        &self.case
    }

    pub fn index(&self) -> usize {
        self.case.index()
    }

    pub fn listeners(&self) -> &ListenerSet<CaseUpdated> {
        &self.listeners
    }

    /// Number of state changes committed so far.
    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    pub fn is_parsing(&self) -> bool {
        self.parsing.load(Ordering::SeqCst)
    }

    /// Re-derive the whole state from the wrapped case.
    ///
    /// Returns `true` and notifies listeners when the case reported something
    /// new.
    pub fn update(&self) -> bool {
        let serial = self.update_lock.lock();
        let revision = {
            let _parsing = ParsingGuard::enter(&self.parsing);
            let main_output = self.project.main_output_function_name();
            let current = self.state.read().clone();
            match self.extract(current, main_output.as_deref()) {
                Some(next) => {
                    let revision = next.revision;
                    *self.state.write() = next;
                    Some(revision)
                }
                None => None,
            }
        };
        drop(serial);

        match revision {
            Some(revision) => {
                tracing::debug!(case = self.index(), revision, "case results updated");
                self.listeners.fire(&CaseUpdated {
                    index: self.index(),
                    revision,
                });
                true
            }
            None => false,
        }
    }

    fn extract(
        &self,
        mut state: ExtractorState,
        main_output: Option<&str>,
    ) -> Option<ExtractorState> {
        let (raw_status, output) = match self.case.result() {
            Some(content) if self.case.has_run() => {
                let inputs = self.case.input_values();
                let output: BTreeMap<String, Value> = content
                    .into_iter()
                    .filter(|(name, _)| !inputs.contains_key(name))
                    .collect();
                (String::new(), output)
            }
            _ => (self.case.status_information(), BTreeMap::new()),
        };

        if raw_status == state.raw_status && same_outputs(&output, &state.output) {
            return None;
        }

        state.status = raw_status.clone();
        state.raw_status = raw_status;
        state.output = output;

        if state.status.is_empty() && state.output.is_empty() {
            state.progress = ProgressSignals::default();
        } else {
            state.progress.scrape(&mut state.status);
        }

        let ExtractorState {
            status,
            output,
            output_functions,
            ..
        } = &mut state;
        output_functions.retain(|name, _| output.contains_key(name));
        for name in output.keys() {
            output_functions
                .entry(name.clone())
                .or_insert_with(|| OutputFunctionResult::new(name.clone()));
        }
        for function in output_functions.values_mut() {
            let raw = resolve_raw(status, output, main_output, function.output());
            function.update(status, !output.is_empty(), &raw);
        }

        state.revision += 1;
        Some(state)
    }

    /// Parameter string of this case for `variable`, `""` when unknown.
    pub fn value_for_variable(&self, variable: &str) -> String {
        self.project
            .case_parameters(self.index())
            .and_then(|params| params.get(variable).cloned())
            .unwrap_or_default()
    }

    /// Result shown for `output`.
    ///
    /// While an update is running this is the "parsing" placeholder.
    pub fn result(&self, output: &str) -> Value {
        if self.is_parsing() {
            return Value::text(ResultsText::ParsingResults.as_str());
        }
        self.raw_result(output)
    }

    pub fn string_result(&self, output: &str) -> String {
        self.result(output).to_string()
    }

    /// Result for `output`, ignoring any update in progress.
    ///
    /// A case without outputs (or a project without main output) yields its
    /// status text; an unknown output yields `"?"`.
    pub fn raw_result(&self, output: &str) -> Value {
        let main_output = self.project.main_output_function_name();
        let state = self.state.read();
        resolve_raw(&state.status, &state.output, main_output.as_deref(), output)
    }

    /// Every non-null output except `output`.
    pub fn other_results(&self, output: &str) -> BTreeMap<String, Value> {
        self.state
            .read()
            .output
            .iter()
            .filter(|(name, value)| name.as_str() != output && !value.is_null())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn status(&self) -> String {
        self.state.read().status.clone()
    }

    pub fn raw_output(&self) -> BTreeMap<String, Value> {
        self.state.read().output.clone()
    }

    pub fn progress(&self) -> ProgressSignals {
        self.state.read().progress.clone()
    }

    pub fn has_ftp(&self) -> bool {
        self.state.read().progress.has_ftp()
    }

    pub fn ftp_address(&self) -> String {
        self.state.read().progress.ftp.clone()
    }

    pub fn has_percent_progress(&self) -> bool {
        self.state.read().progress.has_percent()
    }

    pub fn percent_progress(&self) -> f64 {
        self.state.read().progress.percent
    }

    pub fn has_count_progress(&self) -> bool {
        self.state.read().progress.has_count()
    }

    pub fn count_progress(&self) -> f64 {
        self.state.read().progress.count
    }

    /// Names of the outputs that currently carry series data.
    pub fn output_function_names(&self) -> Vec<String> {
        self.state.read().output_functions.keys().cloned().collect()
    }

    pub fn sparkline(&self, output: &str) -> Option<Sparkline> {
        let main_output = self.project.main_output_function_name();
        let name = clean_output_name(output, main_output.as_deref());
        self.state
            .read()
            .output_functions
            .get(&name)
            .and_then(OutputFunctionResult::sparkline)
    }

    pub fn has_spark_line(&self, output: &str) -> bool {
        self.sparkline(output).is_some()
    }

    pub fn spark_abscissa(&self, output: &str) -> Vec<f64> {
        self.sparkline(output)
            .and_then(|s| s.abscissa)
            .unwrap_or_default()
    }

    pub fn spark_values(&self, output: &str) -> Vec<Vec<f64>> {
        self.sparkline(output).map(|s| s.values).unwrap_or_default()
    }
}

impl fmt::Debug for CaseExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("CaseExtractor")
            .field("index", &self.index())
            .field("revision", &state.revision)
            .field("status", &state.status)
            .field("outputs", &state.output.len())
            .finish()
    }
}

/// Strip quote/bracket decoration; an empty name means the main output.
pub fn clean_output_name(output: &str, main_output: Option<&str>) -> String {
    let name = if output.is_empty() {
        main_output.unwrap_or_default()
    } else {
        output
    };
    name.replace(['\'', '[', ']'], "")
}

fn same_outputs(a: &BTreeMap<String, Value>, b: &BTreeMap<String, Value>) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|((k1, v1), (k2, v2))| k1 == k2 && v1.same_as(v2))
}

fn resolve_raw(
    status: &str,
    output: &BTreeMap<String, Value>,
    main_output: Option<&str>,
    requested: &str,
) -> Value {
    if output.is_empty() || main_output.is_none() {
        return Value::text(status);
    }
    let name = clean_output_name(requested, main_output);
    match output.get(&name) {
        Some(value) if !value.is_null() => value.clone(),
        _ => Value::missing(),
    }
}
