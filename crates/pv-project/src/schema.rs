//! Project schema definitions.

use pv_core::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectDef {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designer: Option<DesignerDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_output: Option<OutputFunctionDef>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub discrete: Vec<ParameterDef>,
    #[serde(default)]
    pub continuous: Vec<ParameterDef>,
    #[serde(default)]
    pub cases: Vec<CaseDef>,
    #[serde(default)]
    pub design_sessions: Vec<DesignSessionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesignerDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputFunctionDef {
    pub name: String,
    /// Symbolic form shown as the result title, e.g. `mean(Y)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

/// A parameter is either a single variable or a named group of variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ParameterDef {
    Group {
        group: String,
        variables: Vec<VariableDef>,
    },
    Variable(VariableDef),
}

impl ParameterDef {
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariableDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl VariableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CaseDef {
    #[serde(default)]
    pub inputs: BTreeMap<String, ValueDef>,
    /// Free-form engine status while the case is pending.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    /// Structured outputs once the case has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<BTreeMap<String, ValueDef>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DesignSessionDef {
    #[serde(default)]
    pub fixed: BTreeMap<String, ValueDef>,
    /// Tag-delimited analysis markup, e.g. `<HTML>...</HTML><mean>1.2</mean>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

/// Serialized form of a [`Value`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ValueDef {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Reals(Vec<f64>),
    Ints { ints: Vec<i32> },
    Longs { longs: Vec<i64> },
    Items(Vec<ValueDef>),
}

impl From<ValueDef> for Value {
    fn from(def: ValueDef) -> Self {
        match def {
            ValueDef::Null => Value::Null,
            ValueDef::Bool(b) => Value::Bool(b),
            ValueDef::Integer(i) => Value::Integer(i),
            ValueDef::Real(r) => Value::Real(r),
            ValueDef::Text(s) => Value::Text(s),
            ValueDef::Reals(v) => Value::RealArray(v),
            ValueDef::Ints { ints } => Value::IntArray(ints),
            ValueDef::Longs { longs } => Value::LongArray(longs),
            ValueDef::Items(items) => Value::List(items.into_iter().map(Value::from).collect()),
        }
    }
}

impl From<&Value> for ValueDef {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => ValueDef::Null,
            Value::Bool(b) => ValueDef::Bool(*b),
            Value::Integer(i) => ValueDef::Integer(*i),
            Value::Real(r) => ValueDef::Real(*r),
            Value::Text(s) => ValueDef::Text(s.clone()),
            Value::RealArray(v) => ValueDef::Reals(v.clone()),
            Value::IntArray(v) => ValueDef::Ints { ints: v.clone() },
            Value::LongArray(v) => ValueDef::Longs { longs: v.clone() },
            Value::List(items) => ValueDef::Items(items.iter().map(ValueDef::from).collect()),
        }
    }
}

pub(crate) fn to_value_map(defs: &BTreeMap<String, ValueDef>) -> BTreeMap<String, Value> {
    defs.iter()
        .map(|(k, v)| (k.clone(), Value::from(v.clone())))
        .collect()
}

pub(crate) fn to_def_map(values: &BTreeMap<String, Value>) -> BTreeMap<String, ValueDef> {
    values
        .iter()
        .map(|(k, v)| (k.clone(), ValueDef::from(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_defs_pick_the_narrowest_variant() {
        let yaml = "a: 3\nb: 2.5\nc: text\nd: [1.0, 2.0]\ne: ['(1,2)', '(2,3)']\nf: { ints: [1, 2] }\n";
        let parsed: BTreeMap<String, ValueDef> = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(parsed["a"], ValueDef::Integer(3));
        assert_eq!(parsed["b"], ValueDef::Real(2.5));
        assert_eq!(parsed["c"], ValueDef::Text("text".to_string()));
        assert_eq!(parsed["d"], ValueDef::Reals(vec![1.0, 2.0]));
        assert!(matches!(parsed["e"], ValueDef::Items(_)));
        assert_eq!(parsed["f"], ValueDef::Ints { ints: vec![1, 2] });
    }

    #[test]
    fn parameters_parse_as_group_or_variable() {
        let yaml = "- name: a\n  values: ['1', '2']\n- group: g\n  variables:\n    - name: b\n    - name: c\n";
        let parsed: Vec<ParameterDef> = serde_yaml::from_str(yaml).expect("parse");
        assert!(!parsed[0].is_group());
        assert!(parsed[1].is_group());
    }
}
