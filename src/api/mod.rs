//! Command surface for the presentation layer
//!
//! The service API, command and status types, event callbacks and output
//! formatting.

pub mod callback;
pub mod formatting;
pub mod nonblocking;
pub mod types;

// Re-export commonly used API types
pub use types::{
    Command, CommandResponse, Evaluation, NavError, NavResult, NavigationSnapshot,
};
pub use nonblocking::{spawn_feed_pump, NavigationHandle, NavigationService};
pub use callback::{CallbackHandle, EventCallback, EventDispatcher, NavigationEvent};
pub use formatting::{CsvFormatter, EstimateFormatter, JsonFormatter};
