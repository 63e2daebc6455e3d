use chrono::{DateTime, Utc};

use crate::errors::SlaError;

/// Parses an RFC 3339 timestamp or an epoch-millisecond count.
///
/// Ticket rows from the booking API carry RFC 3339 strings, while browser
/// clients report `Date.now()` style milliseconds, possibly fractional.
pub fn parse_timestamp(field: &'static str, raw: &str) -> Result<DateTime<Utc>, SlaError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SlaError::InvalidTimestamp { field, reason: "empty value".to_owned() });
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    match trimmed.parse::<f64>() {
        Ok(millis) => timestamp_from_millis(field, millis),
        Err(_) => Err(SlaError::InvalidTimestamp {
            field,
            reason: format!("`{trimmed}` is neither RFC 3339 nor epoch milliseconds"),
        }),
    }
}

pub fn timestamp_from_millis(field: &'static str, millis: f64) -> Result<DateTime<Utc>, SlaError> {
    if !millis.is_finite() {
        return Err(SlaError::InvalidTimestamp {
            field,
            reason: format!("non-finite value {millis}"),
        });
    }

    let rounded = millis.round();
    let out_of_range =
        || SlaError::InvalidTimestamp { field, reason: format!("{millis} ms is out of range") };
    if rounded.abs() >= i64::MAX as f64 {
        return Err(out_of_range());
    }

    DateTime::<Utc>::from_timestamp_millis(rounded as i64).ok_or_else(out_of_range)
}
