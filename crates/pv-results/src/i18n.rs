//! User-facing texts produced by the result model.

pub(crate) const NO_GROUPING_LABEL: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsText {
    /// Placeholder returned while a case is being re-parsed.
    ParsingResults,
    /// Label of the grouping selector entry that disables grouping.
    NoGrouping,
}

impl ResultsText {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParsingResults => "Parsing results...",
            Self::NoGrouping => NO_GROUPING_LABEL,
        }
    }
}
