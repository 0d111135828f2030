//! Time and timestamp utilities

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::error::{ExportError, ExportResult};

/// Accepted request timestamp layout (fraction optional, literal `Z`)
pub const QUERY_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Layout of the timestamp column in rendered lines, at microsecond precision
const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Number of trailing microsecond digits dropped from the rendered timestamp
const DROPPED_FRACTION_DIGITS: usize = 4;

/// Parse a request timestamp such as `2023-01-01T00:00:00.000Z` as UTC
pub fn parse_query_timestamp(name: &str, value: &str) -> ExportResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, QUERY_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            ExportError::InvalidParameter(format!(
                "Invalid {} timestamp '{}': {}",
                name, value, e
            ))
        })
}

/// Render an event timestamp for an output line
///
/// Shifts by `offset` when given, then prints seconds plus the first two
/// digits of the microsecond fraction (truncated, not rounded). A shift
/// that would leave the representable range is not applied.
pub fn format_line_timestamp(datetime: DateTime<Utc>, offset: Option<Duration>) -> String {
    let shifted = offset
        .and_then(|offset| datetime.checked_add_signed(offset))
        .unwrap_or(datetime);
    let mut text = shifted.format(LINE_TIMESTAMP_FORMAT).to_string();
    text.truncate(text.len() - DROPPED_FRACTION_DIGITS);
    text
}
