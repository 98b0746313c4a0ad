//! Parsing and normalization of free-text form input.
//!
//! Converts duration strings, delimited number lists, and currency amounts
//! into canonical numeric values. Malformed tokens are reported back as the
//! literal text the user typed, never coerced or silently dropped.

/// Result of parsing a comma/newline-delimited list of numbers.
///
/// Valid tokens land in `values` in input order; tokens that failed to parse
/// are collected verbatim in `invalid_tokens`. Callers reject the whole
/// submission when `invalid_tokens` is non-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedList {
    pub values: Vec<f64>,
    pub invalid_tokens: Vec<String>,
}

impl ParsedList {
    /// True when every token parsed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.invalid_tokens.is_empty()
    }
}

/// Parses a duration string into seconds.
///
/// Accepts a bare non-negative number of seconds (fractional part and a
/// trailing `s` unit suffix allowed), or colon-separated `mm:ss` /
/// `hh:mm:ss` where every segment is a non-negative number. Anything else,
/// including negative values, yields `None`.
#[must_use]
pub fn parse_duration(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(seconds) = parse_bare_seconds(trimmed) {
        return Some(seconds);
    }

    let segments: Vec<&str> = trimmed.split(':').map(str::trim).collect();
    let mut numbers = Vec::with_capacity(segments.len());
    for segment in segments {
        if segment.is_empty() {
            return None;
        }
        let value: f64 = segment.parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        numbers.push(value);
    }

    match numbers.as_slice() {
        [minutes, seconds] => Some(minutes * 60.0 + seconds),
        [hours, minutes, seconds] => Some(hours * 3600.0 + minutes * 60.0 + seconds),
        _ => None,
    }
}

fn parse_bare_seconds(text: &str) -> Option<f64> {
    let digits = text.strip_suffix(['s', 'S']).unwrap_or(text).trim_end();
    if digits.is_empty() {
        return None;
    }
    let value: f64 = digits.parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Parses a delimited list of rep times.
///
/// Each token goes through [`parse_duration`]; valid values are rounded to
/// tenths of a second before storage so displayed and stored precision agree.
#[must_use]
pub fn parse_duration_list(text: &str) -> ParsedList {
    let mut parsed = ParsedList::default();
    for token in tokens(text) {
        match parse_duration(token) {
            Some(seconds) => parsed.values.push(round_to_tenths(seconds)),
            None => parsed.invalid_tokens.push(token.to_string()),
        }
    }
    parsed
}

/// Parses a delimited list of per-rep distances.
///
/// Each token must be a positive finite decimal in the session's unit.
#[must_use]
pub fn parse_distance_list(text: &str) -> ParsedList {
    let mut parsed = ParsedList::default();
    for token in tokens(text) {
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => parsed.values.push(value),
            _ => parsed.invalid_tokens.push(token.to_string()),
        }
    }
    parsed
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Parses an optional positive integer field. Empty input means absent.
#[must_use]
pub fn parse_positive_int(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<u32>() {
        Ok(value) if value > 0 => Some(value),
        _ => None,
    }
}

/// Parses an optional positive decimal field. Empty input means absent.
#[must_use]
pub fn parse_positive_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Some(value),
        _ => None,
    }
}

/// Parses an expense amount: a finite, non-negative decimal.
#[must_use]
pub fn parse_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => None,
    }
}

/// Rounds to one decimal place (tenths of a second).
#[must_use]
pub fn round_to_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_accepts_bare_seconds() {
        assert_eq!(parse_duration("45"), Some(45.0));
        assert_eq!(parse_duration("45.67"), Some(45.67));
        assert_eq!(parse_duration("  12 "), Some(12.0));
        assert_eq!(parse_duration("0"), Some(0.0));
    }

    #[test]
    fn duration_accepts_seconds_suffix() {
        assert_eq!(parse_duration("29s"), Some(29.0));
        assert_eq!(parse_duration("30S"), Some(30.0));
        assert_eq!(parse_duration("s"), None);
    }

    #[test]
    fn duration_accepts_colon_forms() {
        assert_eq!(parse_duration("1:30"), Some(90.0));
        assert_eq!(parse_duration("0:29.5"), Some(29.5));
        assert_eq!(parse_duration("1:02:03"), Some(3723.0));
    }

    #[test]
    fn duration_rejects_malformed_input() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("   "), None);
        assert_eq!(parse_duration("bad"), None);
        assert_eq!(parse_duration("-5"), None);
        assert_eq!(parse_duration("1:-30"), None);
        assert_eq!(parse_duration("1::30"), None);
        assert_eq!(parse_duration("1:2:3:4"), None);
        assert_eq!(parse_duration("1:xx"), None);
        assert_eq!(parse_duration("inf"), None);
        assert_eq!(parse_duration("NaN"), None);
    }

    #[test]
    fn duration_list_collects_invalid_tokens() {
        let parsed = parse_duration_list("29s, 30s, bad");
        assert_eq!(parsed.values, vec![29.0, 30.0]);
        assert_eq!(parsed.invalid_tokens, vec!["bad".to_string()]);
        assert!(!parsed.is_clean());
    }

    #[test]
    fn duration_list_rounds_to_tenths() {
        let parsed = parse_duration_list("29.94\n30.06");
        assert_eq!(parsed.values, vec![29.9, 30.1]);
        assert!(parsed.is_clean());
    }

    #[test]
    fn duration_list_drops_empty_tokens() {
        let parsed = parse_duration_list(" , 29,\n\n30 ,");
        assert_eq!(parsed.values, vec![29.0, 30.0]);
        assert!(parsed.is_clean());
    }

    #[test]
    fn distance_list_requires_positive_decimals() {
        let parsed = parse_distance_list("600, 400, 300");
        assert_eq!(parsed.values, vec![600.0, 400.0, 300.0]);
        assert!(parsed.is_clean());

        let parsed = parse_distance_list("600, -400, zero");
        assert_eq!(parsed.values, vec![600.0]);
        assert_eq!(
            parsed.invalid_tokens,
            vec!["-400".to_string(), "zero".to_string()]
        );
    }

    #[test]
    fn positive_int_rejects_zero_and_garbage() {
        assert_eq!(parse_positive_int("3"), Some(3));
        assert_eq!(parse_positive_int(""), None);
        assert_eq!(parse_positive_int("0"), None);
        assert_eq!(parse_positive_int("-2"), None);
        assert_eq!(parse_positive_int("2.5"), None);
    }

    #[test]
    fn positive_decimal_rejects_zero_and_garbage() {
        assert_eq!(parse_positive_decimal("80.5"), Some(80.5));
        assert_eq!(parse_positive_decimal(""), None);
        assert_eq!(parse_positive_decimal("0"), None);
        assert_eq!(parse_positive_decimal("-1"), None);
        assert_eq!(parse_positive_decimal("many"), None);
    }

    #[test]
    fn amount_allows_zero_but_not_negative() {
        assert_eq!(parse_amount("12.5"), Some(12.5));
        assert_eq!(parse_amount("0"), Some(0.0));
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }
}
