//! Sparkline series derived from one output of one case.

use pv_core::{Value, parse_real};
use regex::Regex;
use std::sync::LazyLock;

/// Fewer points than this are not considered a trend.
pub const MIN_SPARK_POINTS: usize = 3;

/// `(x,y)` pairs, tolerating one word character around the parentheses and
/// the comma (e.g. `p(1.0,2.5)`).
static PAIR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    const NUMBER: &str = r"-?\d+(?:\.\d+)?(?:[eE]-?\d+)?";
    Regex::new(&format!(
        r"\w?\(\w??(?P<x>{NUMBER})\w?,\w??(?P<y>{NUMBER})\w?\)\w?"
    ))
    .expect("pair pattern is valid")
});

/// Data feeding a sparkline.
#[derive(Debug, Clone, PartialEq)]
pub struct Sparkline {
    /// `None` for a plain 1-D series.
    pub abscissa: Option<Vec<f64>>,
    pub values: Vec<Vec<f64>>,
}

/// Series data of one output, recomputed on every update of its case.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFunctionResult {
    output: String,
    abscissa: Option<Vec<f64>>,
    values: Option<Vec<Vec<f64>>>,
}

impl OutputFunctionResult {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            abscissa: None,
            values: None,
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Re-derive the series from the case state.
    ///
    /// A pending case (non-empty `status`) keeps the previous series.
    pub fn update(&mut self, status: &str, has_output: bool, raw_result: &Value) {
        if status.is_empty() && !has_output {
            self.abscissa = None;
            self.values = None;
        } else if status.is_empty() {
            let (abscissa, values) = derive_series(raw_result);
            self.abscissa = abscissa;
            self.values = values;
        }
    }

    pub fn has_spark_line(&self) -> bool {
        self.values.is_some()
    }

    pub fn abscissa(&self) -> Option<&[f64]> {
        self.abscissa.as_deref()
    }

    pub fn values(&self) -> Option<&[Vec<f64>]> {
        self.values.as_deref()
    }

    pub fn sparkline(&self) -> Option<Sparkline> {
        self.values.as_ref().map(|values| Sparkline {
            abscissa: self.abscissa.clone(),
            values: values.clone(),
        })
    }
}

/// Decide whether `raw` is plottable and extract `(abscissa, values)`.
///
/// - primitive numeric arrays are one series
/// - generic arrays are scanned element by element for `(x,y)` pairs
/// - anything else, or fewer than [`MIN_SPARK_POINTS`] points, is not plottable
pub fn derive_series(raw: &Value) -> (Option<Vec<f64>>, Option<Vec<Vec<f64>>>) {
    let mut simple = Vec::new();
    let mut pairs = Vec::new();

    if let Some(series) = raw.primitive_series() {
        simple = series;
    } else if let Value::List(items) = raw {
        for item in items {
            let text = item.to_string();
            if let Some(caps) = PAIR_PATTERN.captures(&text)
                && let (Some(x), Some(y)) = (parse_real(&caps["x"]), parse_real(&caps["y"]))
            {
                pairs.push((x, y));
            }
        }
    } else {
        return (None, None);
    }

    if pairs.len() >= MIN_SPARK_POINTS {
        let (abscissa, ordinates): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        (Some(abscissa), Some(vec![ordinates]))
    } else if simple.len() >= MIN_SPARK_POINTS {
        (None, Some(vec![simple]))
    } else {
        (None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[&str]) -> Value {
        Value::List(items.iter().map(|s| Value::text(*s)).collect())
    }

    #[test]
    fn two_points_are_not_a_sparkline() {
        assert_eq!(derive_series(&Value::RealArray(vec![1.0, 2.0])), (None, None));
    }

    #[test]
    fn three_reals_make_a_plain_series() {
        let (abscissa, values) = derive_series(&Value::RealArray(vec![1.0, 2.0, 3.0]));
        assert_eq!(abscissa, None);
        assert_eq!(values, Some(vec![vec![1.0, 2.0, 3.0]]));
    }

    #[test]
    fn int_and_long_arrays_are_widened() {
        let (_, values) = derive_series(&Value::IntArray(vec![4, 5, 6]));
        assert_eq!(values, Some(vec![vec![4.0, 5.0, 6.0]]));
        let (_, values) = derive_series(&Value::LongArray(vec![7, 8, 9, 10]));
        assert_eq!(values, Some(vec![vec![7.0, 8.0, 9.0, 10.0]]));
    }

    #[test]
    fn pairs_make_a_two_dimensional_series() {
        let (abscissa, values) = derive_series(&pairs(&["(0,1.5)", "(1,2.5)", "(2,-3e1)"]));
        assert_eq!(abscissa, Some(vec![0.0, 1.0, 2.0]));
        assert_eq!(values, Some(vec![vec![1.5, 2.5, -30.0]]));
    }

    #[test]
    fn pair_markers_are_tolerated() {
        let (abscissa, values) = derive_series(&pairs(&["p(10,1)", "(11,2)x", "(a12,3)"]));
        assert_eq!(abscissa, Some(vec![10.0, 11.0, 12.0]));
        assert_eq!(values, Some(vec![vec![1.0, 2.0, 3.0]]));
    }

    #[test]
    fn boxed_numbers_in_a_list_are_not_a_series() {
        let list = Value::List(vec![Value::Real(1.0), Value::Real(2.0), Value::Real(3.0)]);
        assert_eq!(derive_series(&list), (None, None));
    }

    #[test]
    fn scalars_are_not_plottable() {
        assert_eq!(derive_series(&Value::Real(12.5)), (None, None));
        assert_eq!(derive_series(&Value::text("(1,2) (3,4) (5,6)")), (None, None));
    }

    #[test]
    fn pending_case_keeps_previous_series() {
        let mut ofr = OutputFunctionResult::new("Y");
        ofr.update("", true, &Value::RealArray(vec![1.0, 2.0, 3.0]));
        assert!(ofr.has_spark_line());

        ofr.update("running", false, &Value::text("running"));
        assert!(ofr.has_spark_line());

        ofr.update("", false, &Value::text(""));
        assert!(!ofr.has_spark_line());
        assert_eq!(ofr.abscissa(), None);
    }
}
