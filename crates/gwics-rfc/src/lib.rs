//! Parser, UTC normalizer and diff engine for `GroupWise` calendar exports.

pub mod error;
pub mod rfc;
