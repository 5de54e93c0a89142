//! Core data types for the navigator

use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees
///
/// Values are not range-checked: a latitude of 95° is carried as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Position currently shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimate {
    /// No fix has been requested yet
    Pending,
    /// A real position, from the provider or from dead reckoning
    Position(GeoPoint),
    /// The provider answered but had no fix to give
    Unavailable,
}

impl Estimate {
    /// The point behind this estimate, if there is one
    pub fn point(&self) -> Option<GeoPoint> {
        match self {
            Estimate::Position(point) => Some(*point),
            Estimate::Pending | Estimate::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Estimate::Unavailable)
    }
}

impl Default for Estimate {
    fn default() -> Self {
        Estimate::Pending
    }
}

/// Whether motion samples drive the live estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmState {
    /// Live estimate follows absolute fixes
    Disarmed,
    /// Live estimate follows dead reckoning
    Armed,
}

impl ArmState {
    pub fn is_armed(&self) -> bool {
        matches!(self, ArmState::Armed)
    }
}

impl Default for ArmState {
    fn default() -> Self {
        ArmState::Disarmed
    }
}

/// One reading from the motion feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionSample {
    /// Linear acceleration magnitude
    Acceleration { magnitude: f64 },
    /// Heading in degrees, passed through without normalization
    Heading { degrees: f64 },
}

impl MotionSample {
    pub fn acceleration(magnitude: f64) -> Self {
        MotionSample::Acceleration { magnitude }
    }

    pub fn heading(degrees: f64) -> Self {
        MotionSample::Heading { degrees }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_point() {
        let point = GeoPoint::new(10.0, 20.0);
        assert_eq!(Estimate::Position(point).point(), Some(point));
        assert_eq!(Estimate::Unavailable.point(), None);
        assert_eq!(Estimate::Pending.point(), None);
    }

    #[test]
    fn test_unavailable_is_not_origin() {
        let origin = Estimate::Position(GeoPoint::new(0.0, 0.0));
        assert_ne!(origin, Estimate::Unavailable);
        assert!(!origin.is_unavailable());
    }

    #[test]
    fn test_out_of_range_point_is_kept() {
        let point = GeoPoint::new(95.0, -200.0);
        assert!(point.is_finite());
        assert_eq!(point.latitude, 95.0);
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_finite());
    }

    #[test]
    fn test_estimate_json_tagging() {
        let json = serde_json::to_string(&Estimate::Unavailable).unwrap();
        assert_eq!(json, r#"{"kind":"unavailable"}"#);
    }
}
