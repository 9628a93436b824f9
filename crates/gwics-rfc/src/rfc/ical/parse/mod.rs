//! Calendar document parsing.
//!
//! - Lexer: line unfolding with physical-line tracking
//! - Parser: block state machine producing a [`Calendar`](crate::rfc::ical::core::Calendar)
//! - Values: date-time and UTC offset parsers

mod error;
mod event;
mod lexer;
mod parser;
mod timezone;
pub mod values;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{LogicalLine, Unfolder, unfold};
pub use parser::{parse, parse_in};
