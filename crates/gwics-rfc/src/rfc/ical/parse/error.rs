//! Parse error types.

use std::fmt;

use crate::rfc::ical::expand::ConversionError;

/// Result type for calendar parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// An error that aborted a document parse.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Line number where the error occurred (1-based, physical lines).
    pub line: usize,
    /// Additional context.
    pub context: Option<String>,
    /// Underlying conversion failure for [`ParseErrorKind::Conversion`].
    pub conversion: Option<ConversionError>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, line: usize) -> Self {
        Self {
            kind,
            line,
            context: None,
            conversion: None,
        }
    }

    /// Adds context to the error.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Wraps a date-time conversion failure raised while normalizing a property.
    #[must_use]
    pub fn conversion(line: usize, err: ConversionError) -> Self {
        Self {
            kind: ParseErrorKind::Conversion,
            line,
            context: None,
            conversion: Some(err),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)?;
        if let Some(conversion) = &self.conversion {
            write!(f, ": {conversion}")?;
        }
        if let Some(context) = &self.context {
            write!(f, " ({context})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.conversion
            .as_ref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A block was opened while another block was still open.
    NestedBlock,
    /// End of input reached with a block still open.
    MissingEnd,
    /// A property required to build a block is missing.
    MissingProperty,
    /// A date-time value could not be parsed.
    InvalidDateTime,
    /// A date-time could not be normalized to UTC.
    Conversion,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NestedBlock => write!(f, "nested block"),
            Self::MissingEnd => write!(f, "missing END"),
            Self::MissingProperty => write!(f, "missing property"),
            Self::InvalidDateTime => write!(f, "invalid date/time"),
            Self::Conversion => write!(f, "UTC conversion failed"),
        }
    }
}
