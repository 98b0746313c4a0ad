//! Presentation adapters.
//!
//! Pure formatting of durations, currency, distances, and weights. Given
//! the same numeric input these functions always return the same string.

/// Placeholder for values that have no meaningful rendering.
pub const EM_DASH: &str = "\u{2014}";

/// Formats seconds as `M:SS.t`, or `H:MM:SS.t` from one hour up.
///
/// This is the round-trip inverse of duration parsing for values the parser
/// produces, up to the tenths rounding applied at storage time. Non-finite
/// input renders as the placeholder dash.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        return EM_DASH.to_string();
    }

    let total_tenths = (seconds * 10.0).round().max(0.0) as i64;
    let total_seconds = total_tenths / 10;
    let tenths = total_tenths % 10;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}.{tenths}")
    } else {
        format!("{minutes}:{secs:02}.{tenths}")
    }
}

/// Formats an optional duration, rendering `None` as the placeholder dash.
#[must_use]
pub fn format_optional_duration(seconds: Option<f64>) -> String {
    seconds.map_or_else(|| EM_DASH.to_string(), format_duration)
}

/// Formats an amount as euros with thousands grouping: `1.234,56 €`.
#[must_use]
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let cents = format!("{:.2}", value.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-{grouped},{dec_part} \u{20ac}")
    } else {
        format!("{grouped},{dec_part} \u{20ac}")
    }
}

/// Formats a distance in kilometers with two decimals.
#[must_use]
pub fn format_distance_km(value: f64) -> String {
    format!("{value:.2} km")
}

/// Formats a weight in kilograms with one decimal.
#[must_use]
pub fn format_weight_kg(value: f64) -> String {
    format!("{value:.1} kg")
}
