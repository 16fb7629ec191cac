//! Merged case results used when cases are grouped.

use pv_core::{MISSING, Value, format_real, parse_real};
use pv_project::CaseSource;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::extractor::CaseExtractor;

/// Combines two values of the same field across sibling cases.
pub type MergeFn = fn(&str, &str) -> String;

/// Identical values are kept, different ones are listed as `"v1,v2"`.
pub fn merge_variable_values(v1: &str, v2: &str) -> String {
    if v1 == v2 {
        v1.to_string()
    } else {
        format!("{},{}", v1, v2)
    }
}

/// Mean of two numbers, `"?"` when either side is not a number.
pub fn merge_output_values(v1: &str, v2: &str) -> String {
    match (parse_real(v1), parse_real(v2)) {
        (Some(d1), Some(d2)) => format_real((d1 + d2) / 2.0),
        _ => MISSING.to_string(),
    }
}

/// A synthetic case standing for sibling cases that share the values of every
/// grouping-key variable.
///
/// Values are merged on demand from the live siblings, so the merged row
/// follows their updates. Merged rows never report progress, FTP address or
/// series data.
#[derive(Debug)]
pub struct MergedCaseResult {
    siblings: Vec<Arc<CaseExtractor>>,
    /// Keys of output maps that name a variable use the variable merger.
    variables: BTreeSet<String>,
    variable_merger: MergeFn,
    value_merger: MergeFn,
}

impl MergedCaseResult {
    pub fn new(
        siblings: Vec<Arc<CaseExtractor>>,
        variables: BTreeSet<String>,
        variable_merger: MergeFn,
        value_merger: MergeFn,
    ) -> Self {
        Self {
            siblings,
            variables,
            variable_merger,
            value_merger,
        }
    }

    /// Merge with [`merge_variable_values`] and [`merge_output_values`].
    pub fn with_default_mergers(
        siblings: Vec<Arc<CaseExtractor>>,
        variables: BTreeSet<String>,
    ) -> Self {
        Self::new(
            siblings,
            variables,
            merge_variable_values,
            merge_output_values,
        )
    }

    pub fn siblings(&self) -> &[Arc<CaseExtractor>] {
        &self.siblings
    }

    /// Case of the first sibling.
    pub fn case(&self) -> Option<&Arc<dyn CaseSource>> {
        self.siblings.first().map(|sibling| sibling.case())
    }

    pub fn value_for_variable(&self, variable: &str) -> String {
        self.siblings
            .iter()
            .map(|sibling| sibling.value_for_variable(variable))
            .reduce(|v1, v2| (self.variable_merger)(&v1, &v2))
            .unwrap_or_default()
    }

    pub fn result(&self, output: &str) -> Value {
        self.raw_result(output)
    }

    pub fn string_result(&self, output: &str) -> String {
        self.result(output).to_string()
    }

    /// Siblings' raw results folded with the value merger; `Null` without
    /// siblings.
    pub fn raw_result(&self, output: &str) -> Value {
        self.siblings
            .iter()
            .map(|sibling| sibling.raw_result(output).to_string())
            .reduce(|v1, v2| (self.value_merger)(&v1, &v2))
            .map(Value::Text)
            .unwrap_or(Value::Null)
    }

    pub fn other_results(&self, output: &str) -> BTreeMap<String, Value> {
        self.siblings
            .iter()
            .map(|sibling| sibling.other_results(output))
            .reduce(|m1, m2| self.merge_maps(&m1, &m2))
            .unwrap_or_default()
    }

    pub fn raw_output(&self) -> BTreeMap<String, Value> {
        self.siblings
            .iter()
            .map(|sibling| sibling.raw_output())
            .reduce(|m1, m2| self.merge_maps(&m1, &m2))
            .unwrap_or_default()
    }

    /// Merge two output maps key by key.
    ///
    /// Siblings of a group are expected to share their output keys. A key
    /// missing on one side is dropped from the merged map.
    fn merge_maps(
        &self,
        m1: &BTreeMap<String, Value>,
        m2: &BTreeMap<String, Value>,
    ) -> BTreeMap<String, Value> {
        let mut merged = BTreeMap::new();
        for (key, v1) in m1 {
            let Some(v2) = m2.get(key) else {
                tracing::warn!(key = %key, "output missing from a grouped sibling, dropped");
                continue;
            };
            let merger = if self.variables.contains(key) {
                self.variable_merger
            } else {
                self.value_merger
            };
            merged.insert(
                key.clone(),
                Value::Text(merger(&v1.to_string(), &v2.to_string())),
            );
        }
        merged
    }
}
