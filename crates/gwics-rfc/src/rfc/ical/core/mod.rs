//! Calendar data model.
//!
//! These types hold what the parser extracts from a document:
//! - known VEVENT properties as typed fields, everything else as raw lines
//! - VTIMEZONE offset-change records used to normalize local times to UTC
//! - parametrized values shared by several property kinds

mod calendar;
mod event;
mod parameter;
mod timezone;

pub use calendar::Calendar;
pub use event::{Event, Line, PropertyKey, PropertyValue};
pub use parameter::ParametrizedValue;
pub use timezone::{Offset, OffsetChange, OffsetKind, Timezone, TimezoneMap};
