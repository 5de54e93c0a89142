//! Core types and constants for the dead-reckoning navigator

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
