//! Parse, serialize and re-parse tests.

use chrono::Utc;

use super::fixtures::{groupwise_export, vevent};
use crate::rfc::ical::build::serialize_events;
use crate::rfc::ical::core::{Calendar, Event, Line};
use crate::rfc::ical::parse::{ParseErrorKind, parse_in};

fn parse_utc(input: &str) -> Calendar {
    parse_in(input, &Utc).expect("fixture should parse")
}

/// Serializes an event and parses it back as a lone VEVENT block.
fn reparse(event: &Event) -> Event {
    let calendar = parse_utc(&event.to_ical());
    assert_eq!(calendar.events.len(), 1, "{}", event.to_ical());
    calendar.events.into_iter().next().expect("one event")
}

#[test_log::test]
fn export_parses_and_normalizes() {
    let calendar = parse_utc(&groupwise_export());
    let [planning, review] = calendar.events.as_slice() else {
        panic!("expected two events, got {}", calendar.events.len());
    };

    assert_eq!(planning.identity(), Some("gw-1"));
    assert_eq!(planning.dtstart().unwrap().to_ical(), ":20130615T080000Z");
    assert_eq!(planning.dtend().unwrap().to_ical(), ":20130615T093000Z");
    assert_eq!(planning.organizer().unwrap().value(), Some("mailto:jane@example.com"));
    assert_eq!(planning.attendees().len(), 2);

    assert_eq!(review.identity(), Some("uid-review"));
    assert_eq!(review.summary(), Some("Quarterlyreview"));
    assert_eq!(review.description(), Some("Agenda athttps://example.com/agenda"));
    assert_eq!(review.dtstart().unwrap().value(), Some("20130101T090000Z"));
}

#[test]
fn every_event_round_trips() {
    let calendar = parse_utc(&groupwise_export());

    for event in &calendar.events {
        assert_eq!(&reparse(event), event);
    }
}

#[test]
fn serialization_is_idempotent() {
    let calendar = parse_utc(&groupwise_export());
    let first = serialize_events(&calendar.events);
    let second = serialize_events(&parse_utc(&first).events);

    assert_eq!(first, second);
}

#[test]
fn unknown_lines_keep_their_position_and_folding() {
    let calendar = parse_utc(&groupwise_export());
    let review = &calendar.events[1];

    assert!(review.lines().contains(&Line::Raw("X-GWSHOW-AS:BUSY".into())));
    assert!(review.to_ical().contains(
        "X-GWSHOW-AS:BUSY\r\nBEGIN:VALARM\r\nACTION:DISPLAY\r\nTRIGGER:-PT15M\r\nEND:VALARM\r\n"
    ));

    let folded = parse_utc(&vevent(&["UID:f", "X-NOTE:first", "  second", "SUMMARY:s"]));
    assert_eq!(
        folded.events[0].to_ical(),
        "BEGIN:VEVENT\r\nUID:f\r\nX-NOTE:first\r\n  second\r\nSUMMARY:s\r\nEND:VEVENT\r\n"
    );
}

#[test]
fn attendees_follow_the_line_buffer() {
    let calendar = parse_utc(&vevent(&[
        "ATTENDEE;CN=Bob:mailto:bob@example.com",
        "UID:a",
        "X-AFTER:1",
    ]));

    assert_eq!(
        calendar.events[0].to_ical(),
        "BEGIN:VEVENT\r\nUID:a\r\nX-AFTER:1\r\nATTENDEE;CN=Bob:mailto:bob@example.com\r\nEND:VEVENT\r\n"
    );
}

#[test]
fn parameter_order_does_not_affect_equality() {
    let left = parse_utc(&vevent(&["UID:p", "ORGANIZER;TZID=X;LANG=en:foo"]));
    let right = parse_utc(&vevent(&["UID:p", "ORGANIZER;LANG=en;TZID=X:foo"]));

    assert_eq!(left.events[0], right.events[0]);
}

#[test]
fn attendee_order_does_not_affect_equality() {
    let left = parse_utc(&vevent(&["UID:p", "ATTENDEE:mailto:a", "ATTENDEE:mailto:b"]));
    let right = parse_utc(&vevent(&["UID:p", "ATTENDEE:mailto:b", "ATTENDEE:mailto:a"]));

    assert_eq!(left.events[0], right.events[0]);
}

#[test]
fn unknown_tzid_aborts_whole_document() {
    let input = format!(
        "{}{}",
        vevent(&["UID:ok"]),
        vevent(&["UID:bad", "DTSTART;TZID=Atlantis:20130101T090000"])
    );
    let err = parse_in(&input, &Utc).unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::Conversion);
    assert_eq!(err.line, 6);
}

#[test_log::test]
fn malformed_offset_still_round_trips() {
    let broken_zone = "BEGIN:VTIMEZONE\r\n\
        TZID:Broken\r\n\
        BEGIN:STANDARD\r\n\
        DTSTART:20000101T000000\r\n\
        TZOFFSETFROM:+0100\r\n\
        TZOFFSETTO:+01h0\r\n\
        END:STANDARD\r\n\
        END:VTIMEZONE\r\n";
    let input = format!(
        "{broken_zone}{}",
        vevent(&["UID:broken", "DTSTART;TZID=Broken:20130615T120000"])
    );
    let calendar = parse_utc(&input);
    let event = &calendar.events[0];

    assert_eq!(event.dtstart().unwrap().to_ical(), ":20130615T110000Z");
    assert!(!event.to_ical().contains("TZID"));
    assert_eq!(&reparse(event), event);
}
