//! Textual duration codec.
//!
//! `tracing-subscriber` reports span timings as a float followed by a unit
//! suffix (`"1.52ms"`, `"830µs"`). Reports use the same notation with two
//! decimal digits, so the conversion is lossy in the rendering direction.

use crate::utils::config::{FORMAT_DURATION_UNITS, PARSE_DURATION_UNITS};
use crate::utils::error::DurationError;
use std::time::Duration;

/// Parse a duration such as `"100ms"` or `"3.5µs"`.
///
/// A missing or blank value is the zero duration: close events are allowed
/// to omit their busy time.
///
/// # Errors
/// * `DurationError::UnrecognizedUnit` - no known suffix, or garbage before one
/// * `DurationError::InvalidDurationValue` - negative, non-finite or unparsable number
pub fn parse_duration(text: Option<&str>) -> Result<Duration, DurationError> {
    let text = match text.map(str::trim) {
        None | Some("") => return Ok(Duration::ZERO),
        Some(text) => text,
    };

    let (value, scale) = PARSE_DURATION_UNITS
        .iter()
        .find_map(|(suffix, scale)| text.strip_suffix(*suffix).map(|value| (value, *scale)))
        .ok_or_else(|| DurationError::UnrecognizedUnit(text.to_string()))?;

    let value: f64 = value.trim().parse().map_err(|_| {
        // "10xs" strips to "10x": the real unit was "xs"
        if value.ends_with(|c: char| c.is_alphabetic()) {
            DurationError::UnrecognizedUnit(text.to_string())
        } else {
            DurationError::InvalidDurationValue(text.to_string())
        }
    })?;

    let nanos = (value * scale).round();
    if !nanos.is_finite() || nanos < 0.0 || nanos > u64::MAX as f64 {
        return Err(DurationError::InvalidDurationValue(text.to_string()));
    }

    Ok(Duration::from_nanos(nanos as u64))
}

/// Render a duration with the largest unit not exceeding it, e.g. `"100.00ms"`.
///
/// Anything below one nanosecond (including zero) is still rendered in `ns`.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos() as f64;

    let (suffix, scale) = FORMAT_DURATION_UNITS
        .iter()
        .find(|(_, scale)| *scale <= nanos)
        .or_else(|| FORMAT_DURATION_UNITS.last())
        .copied()
        .unwrap_or(("ns", 1.0));

    format!("{:.2}{}", nanos / scale, suffix)
}
