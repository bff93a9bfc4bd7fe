//! Shared types, constants and error taxonomy

pub mod constants;
pub mod error;
pub mod types;
