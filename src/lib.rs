//! Dead-Reckoning Position Fusion
//!
//! Holds a live position estimate sourced either from an absolute position
//! provider or, once an anchor is frozen and dead reckoning is enabled, from
//! integrating motion samples with a flat-earth projection.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod utils;
pub mod hardware;
pub mod api;

// Re-export commonly used types
pub use crate::core::{ArmState, Estimate, GeoPoint, MotionSample, METERS_PER_DEGREE_LAT};
pub use algorithms::{DeadReckoningIntegrator, MotionAccumulator};
pub use processing::{AnchorManager, Navigator};
pub use hardware::{
    MockPositionProvider, MotionFeed, PositionProvider, ProviderError, ProviderResult,
    ScriptedMotionFeed,
};
pub use api::{
    spawn_feed_pump, Command, CommandResponse, EstimateFormatter, Evaluation, JsonFormatter,
    NavError, NavResult, NavigationEvent, NavigationHandle, NavigationService,
    NavigationSnapshot,
};
pub use utils::config::{ConfigError, LogLevel, NavigatorConfig};
