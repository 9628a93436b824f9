//! UTC normalization of local date-times.

mod timezone;

pub use timezone::{
    ConversionError, clean_tzid, convert_local_to_utc, convert_to_utc, normalize_to_utc,
};
