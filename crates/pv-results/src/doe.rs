//! Results of a design-of-experiments analysis session.

use pv_core::{MISSING, Value};
use pv_project::DesignSession;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static CLOSING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</\w+>").expect("closing tag pattern is valid"));

static TAGGED_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<(.+?)>(.+)$").expect("tagged content pattern is valid"));

/// Parse `<TAG>content</TAG>` segments into a tag to content map.
///
/// Line breaks are ignored. Segments that do not look like `<tag>content` are
/// skipped.
pub fn parse_analysis_markup(markup: &str) -> BTreeMap<String, String> {
    let mut results = BTreeMap::new();
    if markup.is_empty() {
        return results;
    }

    let flattened = markup.replace('\n', "");
    for segment in CLOSING_TAG.split(&flattened) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        match TAGGED_CONTENT.captures(segment) {
            Some(caps) => {
                results.insert(caps[1].to_string(), caps[2].to_string());
            }
            None => tracing::warn!(segment, "skipping malformed analysis segment"),
        }
    }
    results
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoeCaseResult {
    fixed_parameters: BTreeMap<String, Value>,
    outputs: BTreeMap<String, String>,
}

impl DoeCaseResult {
    pub fn from_session(session: &DesignSession) -> Self {
        Self {
            fixed_parameters: session.fixed_parameters.clone(),
            outputs: session
                .analysis
                .as_deref()
                .map(parse_analysis_markup)
                .unwrap_or_default(),
        }
    }

    pub fn outputs(&self) -> &BTreeMap<String, String> {
        &self.outputs
    }

    /// Fixed parameter value of the session, `"?"` when not fixed.
    pub fn value_for_variable(&self, variable: &str) -> String {
        match self.fixed_parameters.get(variable) {
            Some(value) if !value.is_null() => value.to_string(),
            _ => MISSING.to_string(),
        }
    }

    /// Content of the last `HTML...` tag, `""` when there is none.
    pub fn html(&self) -> String {
        self.outputs
            .iter()
            .filter(|(tag, _)| tag.starts_with("HTML"))
            .map(|(_, content)| content.clone())
            .next_back()
            .unwrap_or_default()
    }

    pub fn result(&self, output: &str) -> Value {
        self.outputs
            .get(output)
            .map(|content| Value::text(content.clone()))
            .unwrap_or(Value::Null)
    }

    pub fn string_result(&self, output: &str) -> String {
        self.result(output).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tag_segments() {
        let markup = "<HTML name='report'><p>ok</p></HTML>\n<mean>1.25</mean><sd>0.5</sd>";
        let parsed = parse_analysis_markup(markup);
        assert_eq!(parsed.get("mean").map(String::as_str), Some("1.25"));
        assert_eq!(parsed.get("sd").map(String::as_str), Some("0.5"));
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn skips_malformed_segments() {
        let parsed = parse_analysis_markup("garbage</x><ok>1</ok>");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["ok"], "1");
    }

    #[test]
    fn empty_markup_has_no_outputs() {
        assert!(parse_analysis_markup("").is_empty());
    }

    #[test]
    fn doe_case_accessors() {
        let mut fixed = BTreeMap::new();
        fixed.insert("a".to_string(), Value::Integer(2));
        let doe = DoeCaseResult::from_session(&DesignSession {
            fixed_parameters: fixed,
            analysis: Some("<HTML>report</HTML><mean>3.5</mean>".to_string()),
        });

        assert_eq!(doe.value_for_variable("a"), "2");
        assert_eq!(doe.value_for_variable("b"), "?");
        assert_eq!(doe.html(), "report");
        assert_eq!(doe.result("mean"), Value::text("3.5"));
        assert_eq!(doe.result("median"), Value::Null);
        assert_eq!(doe.string_result("median"), "");
    }
}
