//! Value parsers for date-times and UTC offsets.

use chrono::{FixedOffset, NaiveDateTime};

use crate::rfc::ical::core::Offset;
use crate::rfc::ical::expand::ConversionError;

const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";
const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// ## Summary
/// Parses a naive local timestamp (`YYYYMMDDTHHMMSS`).
///
/// ## Errors
/// Returns `InvalidDateTime` if the value does not match the format.
pub fn parse_local_datetime(value: &str) -> Result<NaiveDateTime, ConversionError> {
    NaiveDateTime::parse_from_str(value, LOCAL_FORMAT)
        .map_err(|e| ConversionError::InvalidDateTime(format!("{value}: {e}")))
}

/// ## Summary
/// Parses a creation timestamp, accepting `YYYYMMDDTHHMMSSZ` first and the
/// zone-less `YYYYMMDDTHHMMSS` as a fallback.
///
/// ## Errors
/// Returns `InvalidDateTime` if neither format matches.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ConversionError> {
    NaiveDateTime::parse_from_str(value, UTC_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, LOCAL_FORMAT))
        .map_err(|e| ConversionError::InvalidDateTime(format!("{value}: {e}")))
}

/// Formats a UTC instant as `YYYYMMDDTHHMMSSZ`.
#[must_use]
pub fn format_utc(utc: NaiveDateTime) -> String {
    utc.format(UTC_FORMAT).to_string()
}

/// Parses a `[+|-]HHMM` offset. Anything else yields [`Offset::Unknown`].
#[must_use]
pub fn parse_utc_offset(value: &str) -> Offset {
    let trimmed = value.trim();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };

    let known = (digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()))
        .then(|| {
            let hours: i32 = digits[..2].parse().ok()?;
            let minutes: i32 = digits[2..].parse().ok()?;
            FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        })
        .flatten();

    match known {
        Some(offset) => Offset::Known(offset),
        None => {
            tracing::debug!(value, "Unparseable UTC offset");
            Offset::Unknown(value.to_string())
        }
    }
}
