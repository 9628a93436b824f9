//! Calendar document parser.
//!
//! Drives a three-state machine over the unfolded lines: outside any block, inside a
//! VTIMEZONE, inside a VEVENT. Only `VTIMEZONE` and `VEVENT` boundaries change state;
//! everything else is routed to the open block or ignored.

use chrono::{Local, TimeZone};

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::lexer::Unfolder;
use super::timezone::TimezoneBuilder;
use crate::rfc::ical::core::{Calendar, Event, TimezoneMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Timezone,
    Event,
}

impl Block {
    const fn name(self) -> &'static str {
        match self {
            Self::Timezone => "VTIMEZONE",
            Self::Event => "VEVENT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Begin(Block),
    End(Block),
}

impl Boundary {
    fn classify(text: &str) -> Option<Self> {
        let (marker, name) = text.split_once(':')?;
        let block = if name.eq_ignore_ascii_case(Block::Event.name()) {
            Block::Event
        } else if name.eq_ignore_ascii_case(Block::Timezone.name()) {
            Block::Timezone
        } else {
            return None;
        };

        if marker.eq_ignore_ascii_case("BEGIN") {
            Some(Self::Begin(block))
        } else if marker.eq_ignore_ascii_case("END") {
            Some(Self::End(block))
        } else {
            None
        }
    }
}

#[derive(Debug)]
enum State {
    Idle,
    InTimezone(TimezoneBuilder),
    InEvent(Box<Event>),
}

/// Parses a calendar document, reading floating date-times in the system's local
/// timezone.
///
/// ## Errors
///
/// Returns an error on invalid block nesting, an unterminated block, a malformed
/// VTIMEZONE or a date-time that cannot be normalized to UTC.
pub fn parse(input: &str) -> ParseResult<Calendar> {
    parse_in(input, &Local)
}

/// Parses a calendar document, reading floating date-times in `local`.
///
/// ## Errors
///
/// See [`parse`].
#[tracing::instrument(skip(input, local), fields(input_len = input.len()))]
pub fn parse_in<Tz: TimeZone>(input: &str, local: &Tz) -> ParseResult<Calendar> {
    tracing::debug!("Parsing calendar document");

    let mut state = State::Idle;
    let mut timezones = TimezoneMap::new();
    let mut events = Vec::new();
    let mut last_line = 0;

    for line in Unfolder::new(input) {
        last_line = line.line_num + line.physical.len().saturating_sub(1);

        state = match (state, Boundary::classify(&line.text)) {
            (State::Idle, Some(Boundary::Begin(Block::Timezone))) => {
                tracing::trace!(line = line.line_num, "BEGIN:VTIMEZONE");
                State::InTimezone(TimezoneBuilder::default())
            }
            (State::Idle, Some(Boundary::Begin(Block::Event))) => {
                tracing::trace!(line = line.line_num, "BEGIN:VEVENT");
                State::InEvent(Box::default())
            }
            (State::Idle, _) => {
                tracing::trace!(line = line.line_num, text = %line.text, "Ignoring line outside blocks");
                State::Idle
            }
            (State::InTimezone(_) | State::InEvent(_), Some(Boundary::Begin(_))) => {
                return Err(ParseError::new(ParseErrorKind::NestedBlock, line.line_num)
                    .with_context(line.text));
            }
            (State::InTimezone(builder), Some(Boundary::End(Block::Timezone))) => {
                let timezone = builder.finish(line.line_num)?;
                tracing::debug!(
                    tzid = %timezone.tzid,
                    changes = timezone.changes().len(),
                    "Registered timezone"
                );
                if let Some(previous) = timezones.insert(timezone.tzid.clone(), timezone) {
                    tracing::debug!(tzid = %previous.tzid, "Replaced earlier timezone definition");
                }
                State::Idle
            }
            (State::InTimezone(mut builder), _) => {
                builder.parse_line(&line.text, line.line_num)?;
                State::InTimezone(builder)
            }
            (State::InEvent(event), Some(Boundary::End(Block::Event))) => {
                tracing::trace!(identity = event.identity(), "END:VEVENT");
                events.push(*event);
                State::Idle
            }
            (State::InEvent(mut event), _) => {
                event.parse_line(&line, &timezones, local)?;
                State::InEvent(event)
            }
        };
    }

    let open = match state {
        State::Idle => None,
        State::InTimezone(_) => Some(Block::Timezone),
        State::InEvent(_) => Some(Block::Event),
    };
    if let Some(block) = open {
        tracing::warn!(block = block.name(), "Input ended inside a block");
        return Err(ParseError::new(ParseErrorKind::MissingEnd, last_line)
            .with_context(format!("missing END:{}", block.name())));
    }

    tracing::debug!(
        events = events.len(),
        timezones = timezones.len(),
        "Calendar document parsed"
    );

    Ok(Calendar::new(events, timezones))
}
