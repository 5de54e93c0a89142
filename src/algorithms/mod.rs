//! Positioning algorithms

pub mod flat_earth;
pub mod dead_reckoning;

pub use dead_reckoning::{DeadReckoningIntegrator, MotionAccumulator};
