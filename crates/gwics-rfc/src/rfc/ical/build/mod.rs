//! Calendar serialization.
//!
//! Emits VEVENT blocks only; the document wrapper is left to the caller.

mod serializer;

pub use serializer::{serialize_event, serialize_events};
