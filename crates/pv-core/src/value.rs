//! Opaque case result values.
//!
//! A finished case reports a map of output name to [`Value`]. The viewer never
//! interprets values beyond display formatting and series detection.

use core::fmt;

use crate::numeric::format_real;

/// Sentinel shown when a requested result does not exist.
pub const MISSING: &str = "?";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    /// Primitive `double` array.
    RealArray(Vec<f64>),
    /// Primitive `int` array.
    IntArray(Vec<i32>),
    /// Primitive `long` array.
    LongArray(Vec<i64>),
    /// Generic object array.
    List(Vec<Value>),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// The `"?"` sentinel.
    pub fn missing() -> Self {
        Self::Text(MISSING.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Text(s) if s == MISSING)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Equality for change detection: `NaN` equals itself, `0.0` and `-0.0`
    /// differ.
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => same_real(*a, *b),
            (Self::RealArray(a), Self::RealArray(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_real(*x, *y))
            }
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_as(y))
            }
            _ => self == other,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Self::RealArray(_) | Self::IntArray(_) | Self::LongArray(_) | Self::List(_)
        )
    }

    /// Primitive numeric arrays widened to `f64`; `None` for anything else.
    pub fn primitive_series(&self) -> Option<Vec<f64>> {
        match self {
            Self::RealArray(v) => Some(v.clone()),
            Self::IntArray(v) => Some(v.iter().map(|&i| f64::from(i)).collect()),
            Self::LongArray(v) => Some(v.iter().map(|&i| i as f64).collect()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Real(r) => f.write_str(&format_real(*r)),
            Self::Text(s) => f.write_str(s),
            Self::RealArray(v) => write_joined(f, v.iter().map(|r| format_real(*r))),
            Self::IntArray(v) => write_joined(f, v.iter().map(|i| i.to_string())),
            Self::LongArray(v) => write_joined(f, v.iter().map(|i| i.to_string())),
            Self::List(v) => write_joined(f, v.iter().map(|item| item.to_string())),
        }
    }
}

fn same_real(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: impl Iterator<Item = String>) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        f.write_str(&item)?;
    }
    f.write_str("]")
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Self::RealArray(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(Value::Real(12.5).to_string(), "12.5");
        assert_eq!(Value::Real(4.0).to_string(), "4.0");
        assert_eq!(Value::Integer(7).to_string(), "7");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::RealArray(vec![1.0, 2.5]).to_string(), "[1.0,2.5]");
        assert_eq!(
            Value::List(vec![Value::text("(1,2)"), Value::Integer(3)]).to_string(),
            "[(1,2),3]"
        );
    }

    #[test]
    fn primitive_series_only_for_primitive_arrays() {
        assert_eq!(
            Value::IntArray(vec![1, 2]).primitive_series(),
            Some(vec![1.0, 2.0])
        );
        assert_eq!(
            Value::LongArray(vec![5]).primitive_series(),
            Some(vec![5.0])
        );
        assert_eq!(Value::List(vec![Value::Real(1.0)]).primitive_series(), None);
        assert_eq!(Value::Real(1.0).primitive_series(), None);
    }

    #[test]
    fn same_as_treats_nan_as_itself() {
        assert!(Value::Real(f64::NAN).same_as(&Value::Real(f64::NAN)));
        let series = Value::RealArray(vec![1.0, f64::NAN]);
        assert!(series.same_as(&series.clone()));
        let list = Value::List(vec![Value::Real(f64::NAN)]);
        assert!(list.same_as(&list.clone()));
        assert!(!Value::Real(0.0).same_as(&Value::Real(-0.0)));
        assert!(!Value::Real(1.0).same_as(&Value::Integer(1)));
        assert!(Value::text("a").same_as(&Value::text("a")));
    }

    #[test]
    fn missing_sentinel() {
        assert!(Value::missing().is_missing());
        assert!(!Value::text("x").is_missing());
    }
}
