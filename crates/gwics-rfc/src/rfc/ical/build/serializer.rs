//! VEVENT serializer.

use std::fmt::Write as _;

use crate::rfc::ical::core::{Event, Line, PropertyKey, PropertyValue};

const CRLF: &str = "\r\n";

/// Serializes an event to a `BEGIN:VEVENT` ... `END:VEVENT` block.
///
/// Known properties are written at the slot where they first appeared, unmodeled
/// lines verbatim, then every attendee. Each line ends with CRLF.
#[must_use]
pub fn serialize_event(event: &Event) -> String {
    let mut output = String::new();
    write_event(&mut output, event);
    output
}

/// Serializes events back to back, in iteration order.
#[must_use]
pub fn serialize_events<'a>(events: impl IntoIterator<Item = &'a Event>) -> String {
    let mut output = String::new();
    for event in events {
        write_event(&mut output, event);
    }
    output
}

fn write_event(output: &mut String, event: &Event) {
    push_line(output, "BEGIN:VEVENT");

    for line in event.lines() {
        match line {
            Line::Property(key) => write_property(output, event, *key),
            Line::Raw(raw) if raw.is_empty() => {}
            Line::Raw(raw) => push_line(output, raw),
        }
    }

    for attendee in event.attendees() {
        write!(output, "ATTENDEE{attendee}{CRLF}").ok();
    }

    push_line(output, "END:VEVENT");
}

fn write_property(output: &mut String, event: &Event, key: PropertyKey) {
    let name = key.name();
    match event.get(key) {
        Some(PropertyValue::Text(text)) => {
            write!(output, "{name}:{text}{CRLF}").ok();
        }
        Some(PropertyValue::Parametrized(value)) => {
            write!(output, "{name}{value}{CRLF}").ok();
        }
        None => {}
    }
}

fn push_line(output: &mut String, line: &str) {
    output.push_str(line);
    output.push_str(CRLF);
}

impl Event {
    /// Serializes the event. See [`serialize_event`].
    #[must_use]
    pub fn to_ical(&self) -> String {
        serialize_event(self)
    }
}
