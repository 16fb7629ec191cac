//! One row of results, whatever produced it.

use pv_core::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::doe::DoeCaseResult;
use crate::extractor::CaseExtractor;
use crate::merge::MergedCaseResult;
use crate::scrape::ABSENT_PROGRESS;
use crate::sparkline::Sparkline;

#[derive(Debug, Clone)]
pub enum CaseResult {
    /// A single case, extracted live from the project.
    Live(Arc<CaseExtractor>),
    /// Several grouped cases merged into one row.
    Merged(Arc<MergedCaseResult>),
    /// A design-of-experiments analysis session.
    Doe(Arc<DoeCaseResult>),
}

impl CaseResult {
    pub fn is_discrete(&self) -> bool {
        !matches!(self, Self::Doe(_))
    }

    pub fn as_live(&self) -> Option<&Arc<CaseExtractor>> {
        match self {
            Self::Live(extractor) => Some(extractor),
            _ => None,
        }
    }

    /// Index of the underlying case (first sibling for merged rows).
    pub fn case_index(&self) -> Option<usize> {
        match self {
            Self::Live(extractor) => Some(extractor.index()),
            Self::Merged(merged) => merged.case().map(|case| case.index()),
            Self::Doe(_) => None,
        }
    }

    /// Whether both rows wrap the very same underlying object.
    pub fn same_entity(&self, other: &CaseResult) -> bool {
        match (self, other) {
            (Self::Live(a), Self::Live(b)) => Arc::ptr_eq(a, b),
            (Self::Merged(a), Self::Merged(b)) => Arc::ptr_eq(a, b),
            (Self::Doe(a), Self::Doe(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn value_for_variable(&self, variable: &str) -> String {
        match self {
            Self::Live(extractor) => extractor.value_for_variable(variable),
            Self::Merged(merged) => merged.value_for_variable(variable),
            Self::Doe(doe) => doe.value_for_variable(variable),
        }
    }

    pub fn result(&self, output: &str) -> Value {
        match self {
            Self::Live(extractor) => extractor.result(output),
            Self::Merged(merged) => merged.result(output),
            Self::Doe(doe) => doe.result(output),
        }
    }

    pub fn string_result(&self, output: &str) -> String {
        self.result(output).to_string()
    }

    pub fn other_results(&self, output: &str) -> BTreeMap<String, Value> {
        match self {
            Self::Live(extractor) => extractor.other_results(output),
            Self::Merged(merged) => merged.other_results(output),
            Self::Doe(doe) => doe
                .outputs()
                .iter()
                .filter(|(name, _)| name.as_str() != output)
                .map(|(name, content)| (name.clone(), Value::text(content.clone())))
                .collect(),
        }
    }

    pub fn has_ftp(&self) -> bool {
        match self {
            Self::Live(extractor) => extractor.has_ftp(),
            _ => false,
        }
    }

    pub fn ftp_address(&self) -> String {
        match self {
            Self::Live(extractor) => extractor.ftp_address(),
            _ => String::new(),
        }
    }

    pub fn has_percent_progress(&self) -> bool {
        match self {
            Self::Live(extractor) => extractor.has_percent_progress(),
            _ => false,
        }
    }

    pub fn percent_progress(&self) -> f64 {
        match self {
            Self::Live(extractor) => extractor.percent_progress(),
            _ => ABSENT_PROGRESS,
        }
    }

    pub fn has_count_progress(&self) -> bool {
        match self {
            Self::Live(extractor) => extractor.has_count_progress(),
            _ => false,
        }
    }

    pub fn count_progress(&self) -> f64 {
        match self {
            Self::Live(extractor) => extractor.count_progress(),
            _ => ABSENT_PROGRESS,
        }
    }

    pub fn sparkline(&self, output: &str) -> Option<Sparkline> {
        match self {
            Self::Live(extractor) => extractor.sparkline(output),
            _ => None,
        }
    }

    pub fn has_spark_line(&self, output: &str) -> bool {
        self.sparkline(output).is_some()
    }

    /// HTML report of a DOE row, `None` for discrete rows.
    pub fn html(&self) -> Option<String> {
        match self {
            Self::Doe(doe) => Some(doe.html()),
            _ => None,
        }
    }
}
