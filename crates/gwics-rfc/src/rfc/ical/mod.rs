//! iCalendar-style calendar handling: VEVENT and VTIMEZONE blocks.

pub mod build;
pub mod core;
pub mod diff;
pub mod expand;
pub mod parse;

#[cfg(test)]
mod tests;
