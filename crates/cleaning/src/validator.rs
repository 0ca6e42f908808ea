//! Pure, per-field validation rules. Each function either returns the typed
//! value or `None` for an invalid marker; none of them fail loudly.

use chrono::NaiveDateTime;
use core_types::Action;

/// The only timestamp layout accepted by the cleaning stage.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a timestamp that must match `YYYY-MM-DD HH:MM:SS` exactly:
/// zero-padded fields, a single space, no surrounding whitespace.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if !has_timestamp_shape(raw.as_bytes()) {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

fn has_timestamp_shape(bytes: &[u8]) -> bool {
    const SHAPE: &[u8; 19] = b"dddd-dd-dd dd:dd:dd";
    bytes.len() == SHAPE.len()
        && bytes.iter().zip(SHAPE.iter()).all(|(b, s)| match s {
            b'd' => b.is_ascii_digit(),
            sep => b == sep,
        })
}

/// Trims and upper-cases a text field. Blank input is a missing value.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Coerces a numeric field. Anything that does not parse as a finite number
/// becomes an invalid marker.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Maps a normalized action onto the closed BUY/SELL set.
pub fn parse_action(normalized: &str) -> Option<Action> {
    normalized.parse().ok()
}

pub fn is_strictly_positive(value: f64) -> bool {
    value > 0.0
}
