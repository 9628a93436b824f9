//! Identity-keyed comparison of two calendars.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::rfc::ical::core::{Calendar, Event};
use crate::rfc::ical::expand::ConversionError;

/// An event present on both sides with different content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventChange<'a> {
    pub old: &'a Event,
    pub new: &'a Event,
}

/// Differences between an origin calendar and a destination calendar.
///
/// Every identity found on either side lands in exactly one of the four maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarDiff<'a> {
    /// In both, not equal.
    pub changed: BTreeMap<&'a str, EventChange<'a>>,
    /// Only in the origin.
    pub removed: BTreeMap<&'a str, &'a Event>,
    /// Only in the destination.
    pub added: BTreeMap<&'a str, &'a Event>,
    /// In both, equal.
    pub unchanged: BTreeMap<&'a str, &'a Event>,
}

impl CalendarDiff<'_> {
    /// True when the destination holds exactly the origin's events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty() && self.added.is_empty()
    }

    /// Number of identities in each section, as `(changed, removed, added, unchanged)`.
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.changed.len(),
            self.removed.len(),
            self.added.len(),
            self.unchanged.len(),
        )
    }
}

impl Calendar {
    /// Maps each identity to its event. A later event with the same identity replaces
    /// an earlier one; events without identity are skipped.
    #[must_use]
    pub fn by_identity(&self) -> BTreeMap<&str, &Event> {
        self.identified_events().collect()
    }

    /// ## Summary
    /// Compares this calendar (origin) with `destination`, matching events by identity.
    #[must_use]
    pub fn diff<'a>(&'a self, destination: &'a Calendar) -> CalendarDiff<'a> {
        let origin = self.by_identity();
        let mut destination = destination.by_identity();
        let mut diff = CalendarDiff::default();

        for (key, old) in origin {
            match destination.remove(key) {
                Some(new) if old == new => {
                    diff.unchanged.insert(key, old);
                }
                Some(new) => {
                    diff.changed.insert(key, EventChange { old, new });
                }
                None => {
                    diff.removed.insert(key, old);
                }
            }
        }
        diff.added = destination;

        tracing::debug!(
            changed = diff.changed.len(),
            removed = diff.removed.len(),
            added = diff.added.len(),
            unchanged = diff.unchanged.len(),
            "Computed calendar diff"
        );

        diff
    }

    /// ## Summary
    /// Keeps one event per identity: the one with the newest DTSTAMP. On equal
    /// timestamps the event appearing later in the document wins.
    ///
    /// ## Errors
    /// Returns `InvalidDateTime` if an identified event has a missing or malformed
    /// DTSTAMP.
    pub fn latest_by_identity(&self) -> Result<BTreeMap<&str, &Event>, ConversionError> {
        let mut latest: BTreeMap<&str, (NaiveDateTime, &Event)> = BTreeMap::new();

        for (key, event) in self.identified_events() {
            let stamp = event.dtstamp_instant()?;
            if latest.get(key).is_none_or(|(kept, _)| stamp >= *kept) {
                latest.insert(key, (stamp, event));
            } else {
                tracing::debug!(identity = key, "Dropping older duplicate");
            }
        }

        Ok(latest
            .into_iter()
            .map(|(key, (_, event))| (key, event))
            .collect())
    }
}
