//! Parsed calendar: events in document order plus the timezone tables they used.

use super::{Event, Timezone, TimezoneMap};

#[derive(Debug, Clone, Default)]
pub struct Calendar {
    pub events: Vec<Event>,
    timezones: TimezoneMap,
}

impl Calendar {
    #[must_use]
    pub fn new(events: Vec<Event>, timezones: TimezoneMap) -> Self {
        Self { events, timezones }
    }

    /// Returns the timezone table registered under `tzid` (case-insensitive).
    #[must_use]
    pub fn timezone(&self, tzid: &str) -> Option<&Timezone> {
        self.timezones.get(&tzid.to_lowercase())
    }

    #[must_use]
    pub fn timezones(&self) -> &TimezoneMap {
        &self.timezones
    }

    /// Events that carry an identity key.
    pub fn identified_events(&self) -> impl Iterator<Item = (&str, &Event)> {
        self.events.iter().filter_map(|event| {
            let identity = event.identity();
            if identity.is_none() {
                tracing::warn!(
                    summary = event.summary().unwrap_or_default(),
                    "Skipping event without UID or record id"
                );
            }
            identity.map(|key| (key, event))
        })
    }
}
