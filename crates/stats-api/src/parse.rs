//! Total conversions from loosely typed JSON cells.
//!
//! The stats API mixes numbers, numeric strings, and nulls in the same
//! column. None of these functions fail: anything that is missing or not
//! cleanly convertible becomes `None`, never zero.

use serde_json::Value;

/// Parses a float from a number or numeric string. Non-finite values are rejected.
#[must_use]
pub fn parse_float(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Parses a 64-bit integer. Floats are accepted only when they are integral.
#[must_use]
pub fn parse_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_f64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_f64))
        }
        _ => None,
    }
}

/// Parses a 32-bit integer, rejecting values out of range.
#[must_use]
pub fn parse_int(value: Option<&Value>) -> Option<i32> {
    parse_i64(value).and_then(|n| i32::try_from(n).ok())
}

/// Returns a non-empty string. Numbers are rendered in their JSON form.
///
/// Blank strings and the placeholders `nan`/`None`/`null` count as missing.
#[must_use]
pub fn parse_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            let missing = s.is_empty()
                || s.eq_ignore_ascii_case("nan")
                || s.eq_ignore_ascii_case("none")
                || s.eq_ignore_ascii_case("null");
            (!missing).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integral_f64(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
