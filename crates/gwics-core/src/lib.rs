//! Shared configuration, constants and errors for the gwics workspace.

pub mod config;
pub mod constants;
pub mod error;
