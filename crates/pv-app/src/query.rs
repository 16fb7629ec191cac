//! Presentation rows built from a result snapshot.

use pv_core::PvError;
use pv_results::{CaseResult, ResultsSnapshot};
use serde::Serialize;

use crate::error::AppResult;

/// Series data of one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SparkSeries {
    pub abscissa: Option<Vec<f64>>,
    pub values: Vec<Vec<f64>>,
}

/// One row of the case table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRow {
    pub index: usize,
    /// Underlying case; the first sibling for grouped rows.
    pub case: Option<usize>,
    /// Variable values in the snapshot's discrete-variable order.
    pub values: Vec<String>,
    pub result: String,
    pub percent: Option<f64>,
    pub count: Option<f64>,
    pub ftp: Option<String>,
    pub sparkline: Option<SparkSeries>,
}

/// One row of the design-of-experiments table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoeRow {
    pub index: usize,
    /// Fixed parameter values in the snapshot's variable order.
    pub values: Vec<String>,
    /// Values of the snapshot's DOE outputs, in order.
    pub outputs: Vec<String>,
    pub html: String,
}

fn to_row(snapshot: &ResultsSnapshot, index: usize, row: &CaseResult, output: &str) -> CaseRow {
    CaseRow {
        index,
        case: row.case_index(),
        values: snapshot
            .discrete_variables
            .iter()
            .map(|name| row.value_for_variable(name))
            .collect(),
        result: row.string_result(output),
        percent: row
            .has_percent_progress()
            .then(|| row.percent_progress()),
        count: row.has_count_progress().then(|| row.count_progress()),
        ftp: row.has_ftp().then(|| row.ftp_address()),
        sparkline: row.sparkline(output).map(|spark| SparkSeries {
            abscissa: spark.abscissa,
            values: spark.values,
        }),
    }
}

pub fn case_rows(snapshot: &ResultsSnapshot, output: &str) -> Vec<CaseRow> {
    snapshot
        .cases
        .iter()
        .map(|(index, row)| to_row(snapshot, *index, row, output))
        .collect()
}

pub fn case_row(snapshot: &ResultsSnapshot, index: usize, output: &str) -> AppResult<CaseRow> {
    let row = snapshot.cases.get(&index).ok_or(PvError::IndexOob {
        what: "case row",
        index,
        len: snapshot.cases.len(),
    })?;
    Ok(to_row(snapshot, index, row, output))
}

pub fn doe_rows(snapshot: &ResultsSnapshot) -> Vec<DoeRow> {
    snapshot
        .doe_results
        .iter()
        .enumerate()
        .map(|(index, doe)| DoeRow {
            index,
            values: snapshot
                .variables
                .iter()
                .map(|name| doe.value_for_variable(name))
                .collect(),
            outputs: snapshot
                .doe_outputs
                .iter()
                .map(|name| doe.string_result(name))
                .collect(),
            html: doe.html(),
        })
        .collect()
}
