//! VTIMEZONE model: a timezone id and its offset-change records.

use std::collections::HashMap;
use std::fmt;

use chrono::{FixedOffset, NaiveDateTime};

/// Timezone tables keyed by lowercase TZID.
pub type TimezoneMap = HashMap<String, Timezone>;

/// A UTC offset as read from `TZOFFSETFROM` / `TZOFFSETTO`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Offset {
    Known(FixedOffset),
    /// The offset text could not be parsed (or was missing); holds the raw text.
    Unknown(String),
}

impl Offset {
    #[must_use]
    pub fn known(&self) -> Option<FixedOffset> {
        match self {
            Self::Known(offset) => Some(*offset),
            Self::Unknown(_) => None,
        }
    }
}

impl Default for Offset {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(offset) => {
                let seconds = offset.local_minus_utc();
                let sign = if seconds < 0 { '-' } else { '+' };
                let minutes = seconds.abs() / 60;
                write!(f, "{sign}{:02}{:02}", minutes / 60, minutes % 60)
            }
            Self::Unknown(raw) => write!(f, "unknown({raw})"),
        }
    }
}

/// Kind of an offset-change sub-block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OffsetKind {
    Standard,
    Daylight,
    Other(String),
}

impl OffsetKind {
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "STANDARD" => Self::Standard,
            "DAYLIGHT" => Self::Daylight,
            _ => Self::Other(name.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Standard => "STANDARD",
            Self::Daylight => "DAYLIGHT",
            Self::Other(name) => name,
        }
    }
}

/// A UTC-offset transition at a local instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OffsetChange {
    pub kind: OffsetKind,
    /// `TZNAME`, when present.
    pub name: Option<String>,
    /// Offset in effect before the transition.
    pub offset_from: Offset,
    /// Offset in effect from the transition on.
    pub offset_to: Offset,
    /// Local wall-clock instant of the transition.
    pub start: NaiveDateTime,
}

/// A parsed VTIMEZONE block.
///
/// Changes are kept ascending by `start`; resolution relies on that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timezone {
    /// Lowercase TZID.
    pub tzid: String,
    changes: Vec<OffsetChange>,
}

impl Timezone {
    /// Creates a table, sorting the changes by start instant.
    #[must_use]
    pub fn new(tzid: &str, mut changes: Vec<OffsetChange>) -> Self {
        changes.sort_by_key(|change| change.start);
        Self {
            tzid: tzid.to_lowercase(),
            changes,
        }
    }

    #[must_use]
    pub fn changes(&self) -> &[OffsetChange] {
        &self.changes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(start: &str) -> OffsetChange {
        OffsetChange {
            kind: OffsetKind::Standard,
            name: None,
            offset_from: Offset::default(),
            offset_to: Offset::default(),
            start: NaiveDateTime::parse_from_str(start, "%Y%m%dT%H%M%S").unwrap(),
        }
    }

    #[test]
    fn new_sorts_changes_and_lowercases_id() {
        let tz = Timezone::new(
            "Europe/Paris",
            vec![change("20131027T030000"), change("20130331T020000")],
        );

        assert_eq!(tz.tzid, "europe/paris");
        assert!(tz.changes()[0].start < tz.changes()[1].start);
    }

    #[test]
    fn offset_display() {
        let east = Offset::Known(FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap());
        let west = Offset::Known(FixedOffset::west_opt(3 * 3600).unwrap());

        assert_eq!(east.to_string(), "+0530");
        assert_eq!(west.to_string(), "-0300");
        assert_eq!(Offset::Unknown("+1x00".into()).to_string(), "unknown(+1x00)");
    }

    #[test]
    fn offset_kind_parse() {
        assert_eq!(OffsetKind::parse("daylight"), OffsetKind::Daylight);
        assert_eq!(OffsetKind::parse("STANDARD"), OffsetKind::Standard);
        assert_eq!(
            OffsetKind::parse("X-CUSTOM"),
            OffsetKind::Other("X-CUSTOM".into())
        );
    }
}
