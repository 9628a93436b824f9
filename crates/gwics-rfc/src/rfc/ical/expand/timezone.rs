//! Offset resolution and UTC conversion for local date-times.
//!
//! Only the VTIMEZONE definitions found in the document are consulted; there is no
//! timezone database lookup. Values without a TZID are read in the caller-supplied
//! local zone.

use chrono::{NaiveDateTime, TimeDelta, TimeZone};

use crate::rfc::ical::core::{Offset, OffsetChange, ParametrizedValue, Timezone, TimezoneMap};
use crate::rfc::ical::parse::values::{format_utc, parse_local_datetime};

/// Error during UTC conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// TZID not defined by any VTIMEZONE seen so far.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Invalid datetime format.
    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),

    /// Local time that stays in a DST gap even after shifting it forward one hour.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),

    /// The timezone table has no offset-change records.
    #[error("No offset available in timezone {0}")]
    NoOffset(String),

    /// The applicable offset-change record carries an unparseable offset.
    #[error("Unknown offset '{offset}' in timezone {tzid}")]
    UnknownOffset { tzid: String, offset: String },
}

impl Timezone {
    /// ## Summary
    /// Returns the offset applicable at a local instant.
    ///
    /// Scans the changes in ascending order, tracking the latest one that started at
    /// or before `instant`. An instant before every change falls back to the first
    /// change's `offset_from`. Returns `None` when the table has no changes.
    #[must_use]
    pub fn resolve_offset(&self, instant: NaiveDateTime) -> Option<&Offset> {
        self.resolve_change(instant).map(|change| {
            if instant < change.start {
                &change.offset_from
            } else {
                &change.offset_to
            }
        })
    }

    /// Returns the offset change [`Timezone::resolve_offset`] reads its offset from.
    #[must_use]
    pub fn resolve_change(&self, instant: NaiveDateTime) -> Option<&OffsetChange> {
        let mut found = None;
        for change in self.changes() {
            if instant >= change.start {
                found = Some(change);
            } else {
                found = found.or(Some(change));
                break;
            }
        }

        found
    }

    /// Offset in seconds used when the applicable offset is unusable: the other side
    /// of the same change when that one parsed, UTC otherwise.
    fn fallback_offset(&self, instant: NaiveDateTime) -> i32 {
        self.resolve_change(instant)
            .and_then(|change| {
                let other = if instant < change.start {
                    &change.offset_to
                } else {
                    &change.offset_from
                };
                other.known()
            })
            .map_or(0, |offset| offset.local_minus_utc())
    }
}

/// ## Summary
/// Converts a local instant to UTC using a document timezone table.
///
/// ## Errors
/// Returns `NoOffset` when the table is empty and `UnknownOffset` when the
/// applicable record has an unparseable offset.
pub fn convert_to_utc(
    local_time: NaiveDateTime,
    timezone: &Timezone,
) -> Result<NaiveDateTime, ConversionError> {
    match timezone.resolve_offset(local_time) {
        None => Err(ConversionError::NoOffset(timezone.tzid.clone())),
        Some(Offset::Unknown(raw)) => Err(ConversionError::UnknownOffset {
            tzid: timezone.tzid.clone(),
            offset: raw.clone(),
        }),
        Some(Offset::Known(offset)) => Ok(local_time - seconds(offset.local_minus_utc())),
    }
}

/// ## Summary
/// Converts a wall-clock instant in `zone` to UTC.
///
/// Ambiguous times (DST fold) take the earliest mapping. Times skipped by a DST gap
/// are shifted forward one hour, the way `mktime` normalizes them.
///
/// ## Errors
/// Returns `NonExistentTime` if the shifted time is still not a valid local time.
pub fn convert_local_to_utc<Tz: TimeZone>(
    local_time: NaiveDateTime,
    zone: &Tz,
) -> Result<NaiveDateTime, ConversionError> {
    let to_utc = |local: &NaiveDateTime| {
        zone.from_local_datetime(local)
            .earliest()
            .map(|dt| dt.naive_utc())
    };

    if let Some(utc) = to_utc(&local_time) {
        return Ok(utc);
    }

    let shifted = local_time + TimeDelta::hours(1);
    tracing::warn!(%local_time, %shifted, "Local time falls in a DST gap, shifting forward");
    to_utc(&shifted).ok_or_else(|| ConversionError::NonExistentTime(local_time.to_string()))
}

fn seconds(offset: i32) -> TimeDelta {
    TimeDelta::seconds(i64::from(offset))
}

/// Strips quoting and a `3D` artifact (a stray `=` URL encoding) from a TZID.
#[must_use]
pub fn clean_tzid(tzid: &str) -> &str {
    let unquoted = if tzid.starts_with(['"', '\'']) {
        let mut inner = tzid[1..].chars();
        inner.next_back();
        inner.as_str()
    } else {
        tzid
    };
    unquoted.strip_prefix("3D").unwrap_or(unquoted)
}

/// ## Summary
/// Normalizes a date-time property fragment (`[;PARAM=VAL]*:VALUE`) to UTC.
///
/// - With a `TZID` parameter, the value is converted with the matching table from
///   `timezones` and the parameter is dropped. When the table has no usable offset a
///   warning is logged and the other side of the applicable change is used, or UTC
///   when there is none, so the result never refers to the table.
/// - Without `TZID`, a value with a time part and no `Z` suffix is read in `local`.
/// - Anything else (UTC or date-only) is returned unchanged.
///
/// ## Errors
/// Returns `UnknownTimezone` for a TZID missing from `timezones`, `InvalidDateTime`
/// for an unparseable value and `NonExistentTime` for a floating time the local zone
/// cannot represent.
pub fn normalize_to_utc<Tz: TimeZone>(
    fragment: &str,
    timezones: &TimezoneMap,
    local: &Tz,
) -> Result<ParametrizedValue, ConversionError> {
    let mut value = ParametrizedValue::parse(fragment);

    if let Some(raw_tzid) = value.get("TZID") {
        let tzid = clean_tzid(raw_tzid).to_lowercase();
        let timezone = timezones
            .get(&tzid)
            .ok_or_else(|| ConversionError::UnknownTimezone(tzid.clone()))?;
        let local_time = parse_local_datetime(value.value().unwrap_or_default())?;

        let utc = match convert_to_utc(local_time, timezone) {
            Ok(utc) => utc,
            Err(err @ (ConversionError::NoOffset(_) | ConversionError::UnknownOffset { .. })) => {
                let fallback = timezone.fallback_offset(local_time);
                tracing::warn!(error = %err, fragment, fallback, "Converting with fallback offset");
                local_time - seconds(fallback)
            }
            Err(err) => return Err(err),
        };
        value.value = Some(format_utc(utc));
        value.remove("TZID");
    } else if let Some(raw) = value.value()
        && !raw.ends_with('Z')
        && raw.contains('T')
    {
        let utc = convert_local_to_utc(parse_local_datetime(raw)?, local)?;
        value.value = Some(format_utc(utc));
    }

    Ok(value)
}
