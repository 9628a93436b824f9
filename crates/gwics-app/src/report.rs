//! Human and machine readable summaries of a calendar diff.

use std::collections::BTreeMap;
use std::fmt;

use gwics_core::config::ReportFormat;
use gwics_rfc::rfc::ical::core::{Event, PropertyKey};
use gwics_rfc::rfc::ical::diff::CalendarDiff;
use serde::Serialize;

/// Identifying fields of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub identity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtstart: Option<String>,
}

impl EventSummary {
    fn new(identity: &str, event: &Event) -> Self {
        Self {
            identity: identity.to_string(),
            summary: event.summary().map(str::to_string),
            dtstart: event
                .dtstart()
                .and_then(|value| value.value())
                .map(str::to_string),
        }
    }
}

/// An event whose content differs, with the names of the differing properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedEvent {
    #[serde(flatten)]
    pub event: EventSummary,
    pub properties: Vec<&'static str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    pub changed: Vec<ChangedEvent>,
    pub removed: Vec<EventSummary>,
    pub added: Vec<EventSummary>,
    pub unchanged: usize,
}

impl DiffReport {
    /// ## Summary
    /// Renders the report in the configured format.
    ///
    /// ## Errors
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, format: ReportFormat) -> serde_json::Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => serde_json::to_string_pretty(self),
        }
    }
}

impl From<&CalendarDiff<'_>> for DiffReport {
    fn from(diff: &CalendarDiff<'_>) -> Self {
        Self {
            changed: diff
                .changed
                .iter()
                .map(|(identity, change)| ChangedEvent {
                    event: EventSummary::new(identity, change.new),
                    properties: changed_properties(change.old, change.new),
                })
                .collect(),
            removed: summarize(&diff.removed),
            added: summarize(&diff.added),
            unchanged: diff.unchanged.len(),
        }
    }
}

fn summarize(events: &BTreeMap<&str, &Event>) -> Vec<EventSummary> {
    events
        .iter()
        .map(|(identity, event)| EventSummary::new(identity, event))
        .collect()
}

fn changed_properties(old: &Event, new: &Event) -> Vec<&'static str> {
    let mut names: Vec<_> = PropertyKey::ALL
        .iter()
        .filter(|&&key| old.get(key) != new.get(key))
        .map(|key| key.name())
        .collect();

    let same_attendees = old.attendees().len() == new.attendees().len()
        && old.attendees().iter().all(|a| new.attendees().contains(a))
        && new.attendees().iter().all(|a| old.attendees().contains(a));
    if !same_attendees {
        names.push("ATTENDEE");
    }

    names
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for changed in &self.changed {
            writeln!(
                f,
                "changed   {} [{}]",
                changed.event,
                changed.properties.join(", ")
            )?;
        }
        for removed in &self.removed {
            writeln!(f, "removed   {removed}")?;
        }
        for added in &self.added {
            writeln!(f, "added     {added}")?;
        }
        writeln!(
            f,
            "{} changed, {} removed, {} added, {} unchanged",
            self.changed.len(),
            self.removed.len(),
            self.added.len(),
            self.unchanged
        )
    }
}

impl fmt::Display for EventSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity)?;
        if let Some(dtstart) = &self.dtstart {
            write!(f, " {dtstart}")?;
        }
        if let Some(summary) = &self.summary {
            write!(f, " \"{summary}\"")?;
        }
        Ok(())
    }
}
