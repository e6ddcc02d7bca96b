//! Shared identifiers, seams and configuration loading

pub mod types;
pub mod config;
pub mod traits;
