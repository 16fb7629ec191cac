/// Floating point type used throughout the viewer.
pub type Real = f64;

/// Parse a real number out of free text, tolerating surrounding whitespace.
///
/// Returns `None` instead of an error: callers turn unparsable text into
/// sentinel values. Of the non-numeric literals only the engine's own
/// spellings `NaN` and `Infinity` (optionally signed) are accepted.
pub fn parse_real(text: &str) -> Option<Real> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let has_digit = trimmed.bytes().any(|b| b.is_ascii_digit());
    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if !has_digit && unsigned != "NaN" && unsigned != "Infinity" {
        return None;
    }
    trimmed.parse::<Real>().ok()
}

/// Format a real the way the simulation engine prints doubles.
///
/// - integral values keep one decimal (`4.0`)
/// - magnitudes outside `[1e-3, 1e7)` use `E` notation (`1.0E-5`)
pub fn format_real(v: Real) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let magnitude = v.abs();
    if (1e-3..1e7).contains(&magnitude) {
        let plain = format!("{}", v);
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    } else {
        let sci = format!("{:e}", v);
        match sci.split_once('e') {
            Some((mantissa, exponent)) if mantissa.contains('.') => {
                format!("{}E{}", mantissa, exponent)
            }
            Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
            None => sci,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_real_trims_and_rejects_garbage() {
        assert_eq!(parse_real(" 42 "), Some(42.0));
        assert_eq!(parse_real("3.5e2"), Some(350.0));
        assert_eq!(parse_real(""), None);
        assert_eq!(parse_real("abc"), None);
        assert_eq!(parse_real("12 done"), None);
    }

    #[test]
    fn parse_real_accepts_only_engine_spellings_of_special_values() {
        assert_eq!(parse_real("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_real("-Infinity"), Some(f64::NEG_INFINITY));
        assert!(parse_real("NaN").is_some_and(f64::is_nan));
        assert_eq!(parse_real("inf"), None);
        assert_eq!(parse_real("infinity"), None);
        assert_eq!(parse_real("nan"), None);
        assert_eq!(parse_real("-INF"), None);
    }

    #[test]
    fn format_real_matches_engine_output() {
        assert_eq!(format_real(4.0), "4.0");
        assert_eq!(format_real(12.5), "12.5");
        assert_eq!(format_real(-3.0), "-3.0");
        assert_eq!(format_real(0.0), "0.0");
        assert_eq!(format_real(0.001), "0.001");
        assert_eq!(format_real(1e-5), "1.0E-5");
        assert_eq!(format_real(1.5e7), "1.5E7");
        assert_eq!(format_real(f64::NAN), "NaN");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn formatted_reals_parse_back(v in -1.0e12_f64..1.0e12_f64) {
            let text = format_real(v);
            let parsed = parse_real(&text);
            prop_assert_eq!(parsed, Some(v));
        }
    }
}
