//! pv-results: the result model of the viewer.
//!
//! [`CaseExtractor`] turns one case's engine state into displayable results,
//! [`MergedCaseResult`] folds grouped cases together, and [`ResultModel`]
//! keeps all of them in sync with the project's notifications.

pub mod case_result;
pub mod doe;
pub mod extractor;
pub mod i18n;
pub mod merge;
pub mod model;
pub mod scrape;
pub mod sparkline;

pub use case_result::CaseResult;
pub use doe::{DoeCaseResult, parse_analysis_markup};
pub use extractor::{CaseExtractor, CaseUpdated, clean_output_name};
pub use i18n::ResultsText;
pub use merge::{MergeFn, MergedCaseResult, merge_output_values, merge_variable_values};
pub use model::{ModelChanged, NO_GROUPING, ResultModel, ResultsSnapshot};
pub use scrape::{ABSENT_PROGRESS, FTP_PREFIX, ProgressSignals};
pub use sparkline::{MIN_SPARK_POINTS, OutputFunctionResult, Sparkline, derive_series};

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("Unknown grouping variable: {name}")]
    UnknownGroupingVariable { name: String },
}
