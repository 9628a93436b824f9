//! VEVENT line dispatch.

use chrono::{NaiveDateTime, TimeZone};

use super::error::{ParseError, ParseResult};
use super::lexer::LogicalLine;
use super::values::parse_timestamp;
use crate::rfc::ical::core::{Event, ParametrizedValue, TimezoneMap};
use crate::rfc::ical::expand::{ConversionError, normalize_to_utc};

impl Event {
    /// ## Summary
    /// Applies one logical line of a VEVENT block.
    ///
    /// Dispatch is prefix based on the unfolded text. Lines that do not map to a
    /// known property are kept verbatim, still folded.
    ///
    /// ## Errors
    /// Returns a `Conversion` error when a date-time cannot be normalized to UTC.
    pub(crate) fn parse_line<Tz: TimeZone>(
        &mut self,
        line: &LogicalLine<'_>,
        timezones: &TimezoneMap,
        local: &Tz,
    ) -> ParseResult<()> {
        let text = line.text.as_str();
        let to_utc = |fragment: &str| {
            normalize_to_utc(fragment, timezones, local)
                .map_err(|e| ParseError::conversion(line.line_num, e))
        };

        if let Some(fragment) = text.strip_prefix("DTSTART") {
            self.set_dtstart(to_utc(fragment)?);
        } else if let Some(fragment) = text.strip_prefix("DTEND") {
            self.set_dtend(to_utc(fragment)?);
        } else if let Some(uid) = text.strip_prefix("UID:") {
            self.set_uid(uid);
        } else if let Some(record_id) = text.strip_prefix("X-GWRECORDID:") {
            self.set_record_id(record_id);
        } else if text.starts_with("DTSTAMP:") {
            let stamp = to_utc(&text["DTSTAMP".len()..])?.to_ical();
            self.set_dtstamp(stamp.strip_prefix(':').unwrap_or(&stamp));
        } else if let Some(summary) = text.strip_prefix("SUMMARY:") {
            self.set_summary(summary);
        } else if let Some(location) = text.strip_prefix("LOCATION:") {
            self.set_location(location);
        } else if let Some(description) = text.strip_prefix("DESCRIPTION:") {
            self.set_description(description);
        } else if let Some(status) = text.strip_prefix("STATUS:") {
            self.set_status(status);
        } else if let Some(fragment) = text.strip_prefix("ORGANIZER") {
            self.set_organizer(ParametrizedValue::parse(fragment));
        } else if let Some(fragment) = text.strip_prefix("ATTENDEE") {
            self.add_attendee(ParametrizedValue::parse(fragment));
        } else {
            for physical in &line.physical {
                self.push_raw_line(*physical);
            }
        }

        Ok(())
    }

    /// ## Summary
    /// Parses the creation timestamp, with or without the trailing `Z`.
    ///
    /// ## Errors
    /// Returns `InvalidDateTime` when DTSTAMP is missing or matches neither format.
    pub fn dtstamp_instant(&self) -> Result<NaiveDateTime, ConversionError> {
        let stamp = self
            .dtstamp()
            .ok_or_else(|| ConversionError::InvalidDateTime("missing DTSTAMP".to_string()))?;
        parse_timestamp(stamp)
    }
}
