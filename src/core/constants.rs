//! Physical constants and system parameters

/// Meters per degree of latitude used by the flat-earth projection
pub const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// Assumed time between acceleration samples (seconds)
pub const DEFAULT_SAMPLE_INTERVAL_S: f64 = 1.0;
