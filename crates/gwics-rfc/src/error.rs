use thiserror::Error;

use crate::rfc::ical::expand::ConversionError;
use crate::rfc::ical::parse::ParseError;

/// Calendar processing errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
