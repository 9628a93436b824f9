//! VEVENT model.
//!
//! Known properties are explicit fields. The line buffer records where each known
//! property first appeared, interleaved with the raw lines of every property that is
//! not modeled, so serialization reproduces the original line order.

use super::ParametrizedValue;

/// Known VEVENT properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Uid,
    RecordId,
    DtStamp,
    DtStart,
    DtEnd,
    Summary,
    Location,
    Description,
    Status,
    Organizer,
}

impl PropertyKey {
    pub const ALL: [Self; 10] = [
        Self::Uid,
        Self::RecordId,
        Self::DtStamp,
        Self::DtStart,
        Self::DtEnd,
        Self::Summary,
        Self::Location,
        Self::Description,
        Self::Status,
        Self::Organizer,
    ];

    /// Property name as written in the document.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uid => "UID",
            Self::RecordId => "X-GWRECORDID",
            Self::DtStamp => "DTSTAMP",
            Self::DtStart => "DTSTART",
            Self::DtEnd => "DTEND",
            Self::Summary => "SUMMARY",
            Self::Location => "LOCATION",
            Self::Description => "DESCRIPTION",
            Self::Status => "STATUS",
            Self::Organizer => "ORGANIZER",
        }
    }
}

/// One entry of the event line buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Slot of a known property, rendered from its current value.
    Property(PropertyKey),
    /// Verbatim physical line of an unmodeled property.
    Raw(String),
}

/// A property value: plain text or a parametrized value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue<'a> {
    Text(&'a str),
    Parametrized(&'a ParametrizedValue),
}

#[derive(Debug, Clone, Default)]
pub struct Event {
    uid: Option<String>,
    record_id: Option<String>,
    dtstamp: Option<String>,
    dtstart: Option<ParametrizedValue>,
    dtend: Option<ParametrizedValue>,
    summary: Option<String>,
    location: Option<String>,
    description: Option<String>,
    status: Option<String>,
    organizer: Option<ParametrizedValue>,
    attendees: Vec<ParametrizedValue>,
    lines: Vec<Line>,
}

impl Event {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity used to match the same event across calendars: the `GroupWise` record
    /// id when present, the UID otherwise.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.record_id().or_else(|| self.uid())
    }

    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    pub fn set_uid(&mut self, value: impl Into<String>) {
        self.uid = Some(value.into());
        self.touch(PropertyKey::Uid);
    }

    #[must_use]
    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn set_record_id(&mut self, value: impl Into<String>) {
        self.record_id = Some(value.into());
        self.touch(PropertyKey::RecordId);
    }

    /// Creation timestamp, as normalized during parsing.
    #[must_use]
    pub fn dtstamp(&self) -> Option<&str> {
        self.dtstamp.as_deref()
    }

    pub fn set_dtstamp(&mut self, value: impl Into<String>) {
        self.dtstamp = Some(value.into());
        self.touch(PropertyKey::DtStamp);
    }

    #[must_use]
    pub fn dtstart(&self) -> Option<&ParametrizedValue> {
        self.dtstart.as_ref()
    }

    pub fn set_dtstart(&mut self, value: ParametrizedValue) {
        self.dtstart = Some(value);
        self.touch(PropertyKey::DtStart);
    }

    #[must_use]
    pub fn dtend(&self) -> Option<&ParametrizedValue> {
        self.dtend.as_ref()
    }

    pub fn set_dtend(&mut self, value: ParametrizedValue) {
        self.dtend = Some(value);
        self.touch(PropertyKey::DtEnd);
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn set_summary(&mut self, value: impl Into<String>) {
        self.summary = Some(value.into());
        self.touch(PropertyKey::Summary);
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn set_location(&mut self, value: impl Into<String>) {
        self.location = Some(value.into());
        self.touch(PropertyKey::Location);
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = Some(value.into());
        self.touch(PropertyKey::Description);
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, value: impl Into<String>) {
        self.status = Some(value.into());
        self.touch(PropertyKey::Status);
    }

    #[must_use]
    pub fn organizer(&self) -> Option<&ParametrizedValue> {
        self.organizer.as_ref()
    }

    pub fn set_organizer(&mut self, value: ParametrizedValue) {
        self.organizer = Some(value);
        self.touch(PropertyKey::Organizer);
    }

    #[must_use]
    pub fn attendees(&self) -> &[ParametrizedValue] {
        &self.attendees
    }

    pub fn add_attendee(&mut self, attendee: ParametrizedValue) {
        self.attendees.push(attendee);
    }

    /// Appends a verbatim line for a property that is not modeled.
    pub fn push_raw_line(&mut self, line: impl Into<String>) {
        self.lines.push(Line::Raw(line.into()));
    }

    /// The ordered line buffer.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Returns the value of a known property.
    #[must_use]
    pub fn get(&self, key: PropertyKey) -> Option<PropertyValue<'_>> {
        match key {
            PropertyKey::Uid => self.uid.as_deref().map(PropertyValue::Text),
            PropertyKey::RecordId => self.record_id.as_deref().map(PropertyValue::Text),
            PropertyKey::DtStamp => self.dtstamp.as_deref().map(PropertyValue::Text),
            PropertyKey::DtStart => self.dtstart.as_ref().map(PropertyValue::Parametrized),
            PropertyKey::DtEnd => self.dtend.as_ref().map(PropertyValue::Parametrized),
            PropertyKey::Summary => self.summary.as_deref().map(PropertyValue::Text),
            PropertyKey::Location => self.location.as_deref().map(PropertyValue::Text),
            PropertyKey::Description => self.description.as_deref().map(PropertyValue::Text),
            PropertyKey::Status => self.status.as_deref().map(PropertyValue::Text),
            PropertyKey::Organizer => self.organizer.as_ref().map(PropertyValue::Parametrized),
        }
    }

    /// Records the line slot of a known property the first time it is set.
    fn touch(&mut self, key: PropertyKey) {
        if !self.lines.contains(&Line::Property(key)) {
            self.lines.push(Line::Property(key));
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        PropertyKey::ALL
            .iter()
            .all(|&key| self.get(key) == other.get(key))
            && same_members(&self.attendees, &other.attendees)
            && same_members(&other.attendees, &self.attendees)
    }
}

impl Eq for Event {}

fn same_members(left: &[ParametrizedValue], right: &[ParametrizedValue]) -> bool {
    left.iter().all(|item| right.contains(item))
}
