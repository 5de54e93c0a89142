//! Scalar dead-reckoning integrator
//!
//! Acceleration magnitude times a fixed interval is summed into a unitless
//! distance proxy. On every accepted sample the whole accumulated distance is
//! projected from the current anchor along the last heading, and the result
//! becomes the new anchor. The origin therefore compounds: each step starts
//! from the previous step's output, not from the frozen fix.

use crate::algorithms::flat_earth;
use crate::api::types::{NavError, NavResult};
use crate::core::{
    ArmState, GeoPoint, MotionSample, DEFAULT_SAMPLE_INTERVAL_S, METERS_PER_DEGREE_LAT,
};
use crate::processing::anchor_manager::AnchorManager;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Accumulated motion; never reset during a session
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionAccumulator {
    /// Sum of magnitude × interval over accepted acceleration samples
    pub cumulative_displacement: f64,
    /// Raw heading of the last accepted heading sample (degrees)
    pub last_heading_deg: f64,
}

/// Converts motion samples into movement of the live estimate while armed
#[derive(Debug, Clone)]
pub struct DeadReckoningIntegrator {
    arm_state: ArmState,
    accumulator: MotionAccumulator,
    sample_interval_s: f64,
    meters_per_degree: f64,
    samples_applied: u64,
}

impl DeadReckoningIntegrator {
    pub fn new() -> Self {
        Self::with_params(DEFAULT_SAMPLE_INTERVAL_S, METERS_PER_DEGREE_LAT)
    }

    /// Integrator with a custom sample interval and meters-per-degree figure
    pub fn with_params(sample_interval_s: f64, meters_per_degree: f64) -> Self {
        Self {
            arm_state: ArmState::Disarmed,
            accumulator: MotionAccumulator::default(),
            sample_interval_s,
            meters_per_degree,
            samples_applied: 0,
        }
    }

    /// Start integrating; requires a frozen anchor
    pub fn arm(&mut self, anchors: &AnchorManager) -> NavResult<ArmState> {
        if !anchors.has_anchor() {
            warn!("Dead reckoning rejected: no anchor captured");
            return Err(NavError::CannotArm {
                reason: "no anchor captured".to_string(),
            });
        }

        if !self.arm_state.is_armed() {
            info!("Dead reckoning enabled");
            self.arm_state = ArmState::Armed;
        }
        Ok(self.arm_state)
    }

    /// Stop integrating; the accumulator is kept
    pub fn disarm(&mut self) -> ArmState {
        if self.arm_state.is_armed() {
            info!("Dead reckoning disabled");
            self.arm_state = ArmState::Disarmed;
        }
        self.arm_state
    }

    /// Route a motion sample, using the configured interval for acceleration
    pub fn apply_sample(
        &mut self,
        sample: MotionSample,
        anchors: &mut AnchorManager,
    ) -> NavResult<Option<GeoPoint>> {
        match sample {
            MotionSample::Acceleration { magnitude } => {
                self.on_acceleration_sample(magnitude, self.sample_interval_s, anchors)
            }
            MotionSample::Heading { degrees } => self.on_heading_sample(degrees, anchors),
        }
    }

    /// Accumulate `magnitude * interval_s` and advance the estimate
    ///
    /// Ignored (Ok(None)) while disarmed.
    pub fn on_acceleration_sample(
        &mut self,
        magnitude: f64,
        interval_s: f64,
        anchors: &mut AnchorManager,
    ) -> NavResult<Option<GeoPoint>> {
        if !magnitude.is_finite() || !interval_s.is_finite() {
            return Err(NavError::InvalidSample {
                reason: format!("acceleration {} over {}s", magnitude, interval_s),
            });
        }
        if !self.arm_state.is_armed() {
            return Ok(None);
        }

        self.accumulator.cumulative_displacement += magnitude * interval_s;
        debug!(
            "Acceleration {} -> displacement {}",
            magnitude, self.accumulator.cumulative_displacement
        );
        Ok(self.recompute_estimate(anchors))
    }

    /// Overwrite the heading and advance the estimate
    ///
    /// Ignored (Ok(None)) while disarmed.
    pub fn on_heading_sample(
        &mut self,
        degrees: f64,
        anchors: &mut AnchorManager,
    ) -> NavResult<Option<GeoPoint>> {
        if !degrees.is_finite() {
            return Err(NavError::InvalidSample {
                reason: format!("heading {}", degrees),
            });
        }
        if !self.arm_state.is_armed() {
            return Ok(None);
        }

        self.accumulator.last_heading_deg = degrees;
        debug!("Heading -> {}°", degrees);
        Ok(self.recompute_estimate(anchors))
    }

    /// Project the accumulated displacement from the anchor and make the
    /// result both the live estimate and the next origin
    pub fn recompute_estimate(&mut self, anchors: &mut AnchorManager) -> Option<GeoPoint> {
        let Some(origin) = anchors.current_anchor() else {
            warn!("Recompute skipped: no anchor");
            return None;
        };

        let point = self.project(origin);
        anchors.advance(point);
        self.samples_applied += 1;
        debug!(
            "Dead reckoning estimate: latitude {} longitude {}",
            point.latitude, point.longitude
        );
        Some(point)
    }

    /// Where the current accumulator would place `origin`
    pub fn project(&self, origin: GeoPoint) -> GeoPoint {
        flat_earth::offset_point(
            origin,
            self.accumulator.cumulative_displacement,
            self.accumulator.last_heading_deg,
            self.meters_per_degree,
        )
    }

    pub fn arm_state(&self) -> ArmState {
        self.arm_state
    }

    pub fn is_armed(&self) -> bool {
        self.arm_state.is_armed()
    }

    pub fn accumulator(&self) -> MotionAccumulator {
        self.accumulator
    }

    pub fn sample_interval_s(&self) -> f64 {
        self.sample_interval_s
    }

    pub fn samples_applied(&self) -> u64 {
        self.samples_applied
    }
}

impl Default for DeadReckoningIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Estimate;

    fn anchored_at(lat: f64, lon: f64) -> AnchorManager {
        let mut anchors = AnchorManager::new();
        anchors.apply_fix_outcome(Ok(Some(GeoPoint::new(lat, lon)))).unwrap();
        anchors.freeze_anchor();
        anchors
    }

    #[test]
    fn test_arm_requires_anchor() {
        let mut integrator = DeadReckoningIntegrator::new();
        let result = integrator.arm(&AnchorManager::new());
        assert!(matches!(result, Err(NavError::CannotArm { .. })));
        assert_eq!(integrator.arm_state(), ArmState::Disarmed);

        assert_eq!(integrator.arm(&anchored_at(1.0, 1.0)), Ok(ArmState::Armed));
    }

    #[test]
    fn test_literal_integration_case() {
        let mut anchors = anchored_at(10.0, 20.0);
        let mut integrator = DeadReckoningIntegrator::new();
        integrator.arm(&anchors).unwrap();

        // heading 0: first step moves north by 5 / 111000 degrees
        let first = integrator.on_acceleration_sample(5.0, 1.0, &mut anchors).unwrap().unwrap();
        let lat_after_first = 10.0 + 5.0 / 111_000.0;
        assert!((first.latitude - lat_after_first).abs() < 1e-12);
        assert_eq!(first.longitude, 20.0);

        let second = integrator.on_heading_sample(90.0, &mut anchors).unwrap().unwrap();
        assert_eq!(integrator.accumulator().cumulative_displacement, 5.0);

        let expected_dlon = 5.0 / (111_000.0 * lat_after_first.to_radians().cos());
        assert!((second.longitude - 20.0 - expected_dlon).abs() < 1e-12);
        assert!((second.longitude - 20.0000457).abs() < 1e-6);
        assert!((second.latitude - 10.0).abs() < 1e-4);
        assert_eq!(anchors.current_estimate(), Estimate::Position(second));
    }

    #[test]
    fn test_origin_compounds() {
        let mut anchors = anchored_at(10.0, 20.0);
        let mut integrator = DeadReckoningIntegrator::new();
        integrator.arm(&anchors).unwrap();
        integrator.on_acceleration_sample(5.0, 1.0, &mut anchors).unwrap();
        let advanced = integrator.on_heading_sample(90.0, &mut anchors).unwrap().unwrap();

        let third = integrator.on_acceleration_sample(5.0, 1.0, &mut anchors).unwrap().unwrap();
        assert_eq!(integrator.accumulator().cumulative_displacement, 10.0);

        // projected from the advanced point, not from (10, 20)
        let expected_dlon = 10.0 / (111_000.0 * advanced.latitude.to_radians().cos());
        assert!((third.longitude - advanced.longitude - expected_dlon).abs() < 1e-12);
        assert_eq!(anchors.current_anchor(), Some(third));
    }

    #[test]
    fn test_disarmed_samples_ignored() {
        let mut anchors = anchored_at(10.0, 20.0);
        let mut integrator = DeadReckoningIntegrator::new();

        assert_eq!(integrator.on_acceleration_sample(3.0, 1.0, &mut anchors), Ok(None));
        assert_eq!(integrator.on_heading_sample(45.0, &mut anchors), Ok(None));
        assert_eq!(integrator.accumulator(), MotionAccumulator::default());
        assert_eq!(anchors.current_estimate(), Estimate::Position(GeoPoint::new(10.0, 20.0)));
        assert_eq!(integrator.samples_applied(), 0);
    }

    #[test]
    fn test_accumulator_survives_disarm() {
        let mut anchors = anchored_at(0.5, 0.5);
        let mut integrator = DeadReckoningIntegrator::new();
        integrator.arm(&anchors).unwrap();
        integrator.on_acceleration_sample(2.0, 1.0, &mut anchors).unwrap();
        integrator.disarm();
        integrator.arm(&anchors).unwrap();
        integrator.on_acceleration_sample(2.0, 1.0, &mut anchors).unwrap();
        assert_eq!(integrator.accumulator().cumulative_displacement, 4.0);
    }

    #[test]
    fn test_heading_stored_raw() {
        let mut anchors = anchored_at(0.5, 0.5);
        let mut integrator = DeadReckoningIntegrator::new();
        integrator.arm(&anchors).unwrap();
        integrator.on_heading_sample(370.0, &mut anchors).unwrap();
        assert_eq!(integrator.accumulator().last_heading_deg, 370.0);
    }

    #[test]
    fn test_configured_interval() {
        let mut anchors = anchored_at(0.5, 0.5);
        let mut integrator = DeadReckoningIntegrator::with_params(0.5, METERS_PER_DEGREE_LAT);
        assert_eq!(integrator.sample_interval_s(), 0.5);
        assert_eq!(DeadReckoningIntegrator::new().sample_interval_s(), 1.0);
        integrator.arm(&anchors).unwrap();
        integrator.apply_sample(MotionSample::acceleration(4.0), &mut anchors).unwrap();
        assert_eq!(integrator.accumulator().cumulative_displacement, 2.0);
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let mut anchors = anchored_at(0.5, 0.5);
        let mut integrator = DeadReckoningIntegrator::new();
        integrator.arm(&anchors).unwrap();

        let result = integrator.on_acceleration_sample(f64::NAN, 1.0, &mut anchors);
        assert!(matches!(result, Err(NavError::InvalidSample { .. })));
        let result = integrator.on_heading_sample(f64::INFINITY, &mut anchors);
        assert!(matches!(result, Err(NavError::InvalidSample { .. })));
        assert_eq!(integrator.accumulator(), MotionAccumulator::default());
        assert_eq!(anchors.current_anchor(), Some(GeoPoint::new(0.5, 0.5)));
    }
}
