//! Progress signals scraped out of free-form engine status text.
//!
//! The engine reports progress inside its status line, e.g.
//! `"42% 7/10 ftp://host/path done"`. Three scrapers run in a fixed order
//! (ftp, percent, count), each removing what it recognised so the next one
//! sees only the remaining text.

use pv_core::parse_real;
use regex::Regex;
use std::sync::LazyLock;

pub const FTP_PREFIX: &str = "ftp://";

/// Value of a progress fraction that was not reported.
pub const ABSENT_PROGRESS: f64 = -1.0;

static COUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+/[0-9]+").expect("count pattern is valid"));

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSignals {
    /// `""` when no address was reported.
    pub ftp: String,
    /// Fraction in `0..=1`, or [`ABSENT_PROGRESS`].
    pub percent: f64,
    /// Fraction in `0..=1`, or [`ABSENT_PROGRESS`].
    pub count: f64,
}

impl Default for ProgressSignals {
    fn default() -> Self {
        Self {
            ftp: String::new(),
            percent: ABSENT_PROGRESS,
            count: ABSENT_PROGRESS,
        }
    }
}

impl ProgressSignals {
    pub fn has_ftp(&self) -> bool {
        !self.ftp.is_empty()
    }

    pub fn has_percent(&self) -> bool {
        self.percent > -0.5
    }

    pub fn has_count(&self) -> bool {
        self.count > -0.5
    }

    /// Run every scraper over `status`.
    ///
    /// Signals that are not found keep their previous value.
    pub fn scrape(&mut self, status: &mut String) {
        if let Some(ftp) = scrape_ftp(status) {
            self.ftp = ftp;
        }
        if let Some(percent) = scrape_percent(status) {
            self.percent = percent;
        }
        if let Some(count) = scrape_count(status) {
            self.count = count;
        }
    }
}

/// Extract the first `ftp://` address and remove it from `status`.
pub fn scrape_ftp(status: &mut String) -> Option<String> {
    if status.is_empty() {
        return None;
    }
    let start = status.find(FTP_PREFIX)?;
    let rest = &status[start + FTP_PREFIX.len()..];
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let address = format!("{}{}", FTP_PREFIX, &rest[..end]);
    *status = status.replace(&address, "");
    Some(address)
}

/// Parse the text before the first `%` as a percentage.
///
/// The text after the `%` becomes the new status.
pub fn scrape_percent(status: &mut String) -> Option<f64> {
    if status.is_empty() {
        return None;
    }
    let (quantity, remainder) = status.split_once('%')?;
    let Some(value) = parse_real(quantity) else {
        tracing::warn!(status = %status, "unparsable percent progress");
        return None;
    };
    *status = remainder.to_string();
    Some(value / 100.0)
}

/// Parse the first `num/den` pair as a fraction and remove it from `status`.
pub fn scrape_count(status: &mut String) -> Option<f64> {
    let matched = COUNT_PATTERN.find(status)?.as_str().to_string();
    let (quantity, total) = matched.split_once('/')?;
    let total = total.split(' ').next().unwrap_or(total);
    let (Some(quantity), Some(total)) = (parse_real(quantity), parse_real(total)) else {
        return None;
    };
    if total == 0.0 {
        tracing::warn!(status = %status, "count progress with zero total");
        return None;
    }
    *status = status.replace(&matched, "");
    Some(quantity / total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrapes_in_order_and_strips_text() {
        let mut status = "42% 7/10 ftp://host/path done".to_string();
        let mut signals = ProgressSignals::default();
        signals.scrape(&mut status);

        assert_eq!(signals.ftp, "ftp://host/path");
        assert!((signals.percent - 0.42).abs() < 1e-12);
        assert!((signals.count - 0.7).abs() < 1e-12);
        assert!(!status.contains("ftp://"));
        assert!(!status.contains('%'));
        assert!(!status.contains("7/10"));
        assert_eq!(status.trim(), "done");
    }

    #[test]
    fn percent_keeps_only_the_remainder() {
        let mut status = "50%".to_string();
        assert_eq!(scrape_percent(&mut status), Some(0.5));
        assert_eq!(status, "");
    }

    #[test]
    fn unparsable_percent_leaves_status_untouched() {
        let mut status = "running at 50%".to_string();
        assert_eq!(scrape_percent(&mut status), None);
        assert_eq!(status, "running at 50%");
    }

    #[test]
    fn count_without_percent() {
        let mut status = "step 3/4 of solver".to_string();
        assert_eq!(scrape_count(&mut status), Some(0.75));
        assert_eq!(status, "step  of solver");
    }

    #[test]
    fn count_only_matches_ascii_digits() {
        let mut status = "١/٢ 3/4".to_string();
        assert_eq!(scrape_count(&mut status), Some(0.75));
        assert_eq!(status, "١/٢ ");
    }

    #[test]
    fn count_with_zero_total_is_ignored() {
        let mut status = "0/0".to_string();
        assert_eq!(scrape_count(&mut status), None);
        assert_eq!(status, "0/0");
    }

    #[test]
    fn ftp_needs_a_non_empty_address() {
        let mut status = "upload to ftp:// later".to_string();
        assert_eq!(scrape_ftp(&mut status), None);

        let mut status = "see ftp://server/out".to_string();
        assert_eq!(scrape_ftp(&mut status).as_deref(), Some("ftp://server/out"));
        assert_eq!(status, "see ");
    }

    #[test]
    fn missing_signals_keep_previous_values() {
        let mut signals = ProgressSignals {
            ftp: "ftp://old".to_string(),
            percent: 0.1,
            count: ABSENT_PROGRESS,
        };
        let mut status = "queued".to_string();
        signals.scrape(&mut status);
        assert_eq!(signals.ftp, "ftp://old");
        assert_eq!(signals.percent, 0.1);
        assert!(!signals.has_count());
        assert_eq!(status, "queued");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn count_fraction_matches_numbers(num in 0u32..1000, den in 1u32..1000) {
            let mut status = format!("iter {}/{} ok", num, den);
            let fraction = scrape_count(&mut status);
            prop_assert_eq!(fraction, Some(f64::from(num) / f64::from(den)));
            prop_assert_eq!(status, "iter  ok".to_string());
        }

        #[test]
        fn percent_fraction_is_value_over_hundred(pct in 0u32..=100) {
            let mut status = format!("{}% left", pct);
            let fraction = scrape_percent(&mut status);
            prop_assert_eq!(fraction, Some(f64::from(pct) / 100.0));
            prop_assert_eq!(status, " left".to_string());
        }
    }
}
