//! VTIMEZONE block parsing.

use chrono::NaiveDateTime;

use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::values::{parse_local_datetime, parse_utc_offset};
use crate::rfc::ical::core::{Offset, OffsetChange, OffsetKind, Timezone};

/// Accumulates the lines of a VTIMEZONE block.
#[derive(Debug, Default)]
pub(crate) struct TimezoneBuilder {
    tzid: Option<String>,
    changes: Vec<OffsetChange>,
    current: Option<ChangeBuilder>,
}

#[derive(Debug)]
struct ChangeBuilder {
    kind: OffsetKind,
    begin_line: usize,
    name: Option<String>,
    start: Option<NaiveDateTime>,
    offset_from: Offset,
    offset_to: Offset,
}

impl TimezoneBuilder {
    /// Feeds one logical line found between `BEGIN:VTIMEZONE` and `END:VTIMEZONE`.
    pub(crate) fn parse_line(&mut self, line: &str, line_num: usize) -> ParseResult<()> {
        let Some(change) = self.current.as_mut() else {
            if let Some(tzid) = line.strip_prefix("TZID:") {
                self.tzid = Some(tzid.to_lowercase());
            } else if let Some(kind) = line.strip_prefix("BEGIN:") {
                self.current = Some(ChangeBuilder {
                    kind: OffsetKind::parse(kind),
                    begin_line: line_num,
                    name: None,
                    start: None,
                    offset_from: Offset::default(),
                    offset_to: Offset::default(),
                });
            } else {
                tracing::trace!(line, "Ignoring VTIMEZONE line");
            }
            return Ok(());
        };

        if line.starts_with("END:") {
            let change = self.current.take().map(ChangeBuilder::build).transpose()?;
            self.changes.extend(change);
        } else if line.starts_with("BEGIN:") {
            return Err(ParseError::new(ParseErrorKind::NestedBlock, line_num)
                .with_context(format!("{line} inside {}", change.kind.as_str())));
        } else if let Some(name) = line.strip_prefix("TZNAME:") {
            change.name = Some(name.to_string());
        } else if let Some(start) = line.strip_prefix("DTSTART:") {
            let start = parse_local_datetime(start).map_err(|e| {
                ParseError::new(ParseErrorKind::InvalidDateTime, line_num).with_context(e.to_string())
            })?;
            change.start = Some(start);
        } else if let Some(offset) = line.strip_prefix("TZOFFSETFROM:") {
            change.offset_from = parse_utc_offset(offset);
        } else if let Some(offset) = line.strip_prefix("TZOFFSETTO:") {
            change.offset_to = parse_utc_offset(offset);
        } else {
            // RRULE and friends: recurrence expansion is not supported
            tracing::trace!(line, "Ignoring offset-change line");
        }

        Ok(())
    }

    /// Closes the block on `END:VTIMEZONE`.
    pub(crate) fn finish(self, line_num: usize) -> ParseResult<Timezone> {
        if let Some(change) = &self.current {
            return Err(ParseError::new(ParseErrorKind::MissingEnd, line_num)
                .with_context(format!("END:{} before END:VTIMEZONE", change.kind.as_str())));
        }
        let tzid = self.tzid.ok_or_else(|| {
            ParseError::new(ParseErrorKind::MissingProperty, line_num).with_context("TZID")
        })?;

        if !self.changes.is_sorted_by_key(|change| change.start) {
            tracing::debug!(tzid = %tzid, "Sorting offset changes by start");
        }

        Ok(Timezone::new(&tzid, self.changes))
    }
}

impl ChangeBuilder {
    fn build(self) -> ParseResult<OffsetChange> {
        let start = self.start.ok_or_else(|| {
            ParseError::new(ParseErrorKind::MissingProperty, self.begin_line)
                .with_context(format!("DTSTART in {}", self.kind.as_str()))
        })?;

        Ok(OffsetChange {
            kind: self.kind,
            name: self.name,
            offset_from: self.offset_from,
            offset_to: self.offset_to,
            start,
        })
    }
}
