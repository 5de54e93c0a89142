//! Combined fix/dead-reckoning state machine
//!
//! `Disarmed` follows absolute fixes; `Armed` follows motion samples. The
//! only guarded transition is arming, which needs a frozen anchor. There is
//! no terminal state.

use crate::algorithms::dead_reckoning::{DeadReckoningIntegrator, MotionAccumulator};
use crate::algorithms::flat_earth;
use crate::api::types::{
    Command, CommandResponse, Evaluation, NavError, NavResult, NavigationSnapshot,
};
use crate::core::{ArmState, Estimate, GeoPoint, MotionSample};
use crate::hardware::{PositionProvider, ProviderResult};
use crate::processing::anchor_manager::AnchorManager;
use crate::utils::config::NavigatorConfig;
use log::warn;

/// Single owner of all navigation state
#[derive(Debug, Clone)]
pub struct Navigator {
    anchors: AnchorManager,
    integrator: DeadReckoningIntegrator,
    meters_per_degree: f64,
}

impl Navigator {
    pub fn new() -> Self {
        Self::from_config(&NavigatorConfig::default())
    }

    pub fn from_config(config: &NavigatorConfig) -> Self {
        Self {
            anchors: AnchorManager::new(),
            integrator: DeadReckoningIntegrator::with_params(
                config.sample_interval_s,
                config.meters_per_degree_lat,
            ),
            meters_per_degree: config.meters_per_degree_lat,
        }
    }

    /// Fetch a fix and apply it, all under one exclusive borrow
    pub async fn request_fix<P: PositionProvider>(&mut self, provider: &P) -> NavResult<GeoPoint> {
        let armed = self.integrator.is_armed();
        self.anchors.request_fix(provider, armed).await
    }

    /// Check whether a fetch may start now
    pub fn begin_fix_request(&self) -> NavResult<()> {
        if self.integrator.is_armed() {
            warn!("Fix request suppressed: dead reckoning is enabled");
            return Err(NavError::FixRequestSuppressed);
        }
        Ok(())
    }

    /// Apply a provider answer that arrived after `begin_fix_request`
    ///
    /// If dead reckoning was enabled in the meantime the answer is dropped.
    pub fn complete_fix_request(
        &mut self,
        outcome: ProviderResult<Option<GeoPoint>>,
    ) -> NavResult<GeoPoint> {
        if self.integrator.is_armed() {
            warn!("Late fix ignored: dead reckoning is enabled");
            return Err(NavError::FixRequestSuppressed);
        }
        self.anchors.apply_fix_outcome(outcome)
    }

    pub fn freeze_anchor(&mut self) -> Option<GeoPoint> {
        self.anchors.freeze_anchor()
    }

    pub fn arm(&mut self) -> NavResult<ArmState> {
        self.integrator.arm(&self.anchors)
    }

    pub fn disarm(&mut self) -> ArmState {
        self.integrator.disarm()
    }

    /// Feed one motion sample; returns the new estimate when it moved
    pub fn on_sample(&mut self, sample: MotionSample) -> NavResult<Option<GeoPoint>> {
        self.integrator.apply_sample(sample, &mut self.anchors)
    }

    pub fn on_acceleration_sample(
        &mut self,
        magnitude: f64,
        interval_s: f64,
    ) -> NavResult<Option<GeoPoint>> {
        self.integrator
            .on_acceleration_sample(magnitude, interval_s, &mut self.anchors)
    }

    pub fn on_heading_sample(&mut self, degrees: f64) -> NavResult<Option<GeoPoint>> {
        self.integrator.on_heading_sample(degrees, &mut self.anchors)
    }

    /// Run one projection step; `None` until an anchor exists
    pub fn recompute_estimate(&mut self) -> Option<GeoPoint> {
        self.integrator.recompute_estimate(&mut self.anchors)
    }

    /// Run a presentation command to completion
    pub async fn execute<P: PositionProvider>(
        &mut self,
        command: Command,
        provider: &P,
    ) -> NavResult<CommandResponse> {
        match command {
            Command::FetchFix => self.request_fix(provider).await.map(CommandResponse::FixAcquired),
            Command::FreezeAnchor => Ok(CommandResponse::AnchorFrozen(self.freeze_anchor())),
            Command::EnableDeadReckoning => self.arm().map(|_| CommandResponse::Armed),
            Command::DisableDeadReckoning => {
                self.disarm();
                Ok(CommandResponse::Disarmed)
            }
            Command::Evaluate => Ok(CommandResponse::Evaluation(self.evaluate())),
        }
    }

    /// Compare the last absolute fix with the live estimate
    pub fn evaluate(&self) -> Evaluation {
        let fix = self.anchors.last_fix();
        let estimate = self.anchors.current_estimate();
        let separation_m = match (fix, estimate.point()) {
            (Some(fix), Some(point)) => {
                Some(flat_earth::separation_m(fix, point, self.meters_per_degree))
            }
            _ => None,
        };
        Evaluation {
            fix,
            estimate,
            separation_m,
            arm_state: self.integrator.arm_state(),
        }
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        let accumulator = self.integrator.accumulator();
        NavigationSnapshot {
            arm_state: self.integrator.arm_state(),
            anchor: self.anchors.current_anchor(),
            estimate: self.anchors.current_estimate(),
            last_fix: self.anchors.last_fix(),
            cumulative_displacement: accumulator.cumulative_displacement,
            heading_deg: accumulator.last_heading_deg,
            samples_applied: self.integrator.samples_applied(),
        }
    }

    pub fn current_anchor(&self) -> Option<GeoPoint> {
        self.anchors.current_anchor()
    }

    pub fn current_estimate(&self) -> Estimate {
        self.anchors.current_estimate()
    }

    pub fn arm_state(&self) -> ArmState {
        self.integrator.arm_state()
    }

    pub fn accumulator(&self) -> MotionAccumulator {
        self.integrator.accumulator()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::{MockPositionProvider, ProviderError};

    async fn anchored_navigator(lat: f64, lon: f64) -> Navigator {
        let mut navigator = Navigator::new();
        let provider = MockPositionProvider::with_fix(GeoPoint::new(lat, lon));
        navigator.request_fix(&provider).await.unwrap();
        navigator.freeze_anchor();
        navigator
    }

    #[test]
    fn test_disarm_is_idempotent() {
        let mut navigator = Navigator::new();
        let before = navigator.snapshot();
        assert_eq!(navigator.disarm(), ArmState::Disarmed);
        assert_eq!(navigator.disarm(), ArmState::Disarmed);
        assert_eq!(navigator.snapshot(), before);
    }

    #[tokio::test]
    async fn test_arm_precondition() {
        let mut navigator = Navigator::new();
        assert!(matches!(navigator.arm(), Err(NavError::CannotArm { .. })));

        // a fetched but unfrozen fix is not enough
        let provider = MockPositionProvider::with_fix(GeoPoint::new(10.0, 20.0));
        navigator.request_fix(&provider).await.unwrap();
        assert!(matches!(navigator.arm(), Err(NavError::CannotArm { .. })));

        navigator.freeze_anchor();
        assert_eq!(navigator.arm(), Ok(ArmState::Armed));
    }

    #[tokio::test]
    async fn test_fetch_suppressed_while_armed() {
        let mut navigator = anchored_navigator(10.0, 20.0).await;
        navigator.arm().unwrap();
        let before = navigator.snapshot();

        let provider = MockPositionProvider::with_fix(GeoPoint::new(50.0, 60.0));
        let result = navigator.request_fix(&provider).await;
        assert_eq!(result, Err(NavError::FixRequestSuppressed));
        assert_eq!(provider.request_count(), 0);
        assert_eq!(navigator.snapshot(), before);
    }

    #[tokio::test]
    async fn test_integration_and_compounding() {
        let mut navigator = anchored_navigator(10.0, 20.0).await;
        navigator.arm().unwrap();

        navigator.on_sample(MotionSample::acceleration(5.0)).unwrap();
        let estimate = navigator.on_sample(MotionSample::heading(90.0)).unwrap().unwrap();
        assert_eq!(navigator.accumulator().cumulative_displacement, 5.0);
        assert!((estimate.longitude - 20.0000457).abs() < 1e-6);
        assert!((estimate.latitude - 10.0).abs() < 1e-4);

        let next = navigator.on_sample(MotionSample::acceleration(5.0)).unwrap().unwrap();
        assert_eq!(navigator.accumulator().cumulative_displacement, 10.0);
        let expected_dlon = 10.0 / (111_000.0 * estimate.latitude.to_radians().cos());
        assert!((next.longitude - estimate.longitude - expected_dlon).abs() < 1e-12);
        assert_eq!(navigator.current_anchor(), Some(next));
    }

    #[tokio::test]
    async fn test_direct_sample_entry_points() {
        assert_eq!(Navigator::new().recompute_estimate(), None);

        let mut navigator = anchored_navigator(10.0, 20.0).await;
        navigator.arm().unwrap();

        let moved = navigator.on_acceleration_sample(3.0, 2.0).unwrap().unwrap();
        assert_eq!(navigator.accumulator().cumulative_displacement, 6.0);
        assert!((moved.latitude - (10.0 + 6.0 / 111_000.0)).abs() < 1e-12);

        let south = navigator.on_heading_sample(180.0).unwrap().unwrap();
        assert!((south.latitude - (moved.latitude - 6.0 / 111_000.0)).abs() < 1e-12);

        // every recompute steps again from the advanced origin
        let again = navigator.recompute_estimate().unwrap();
        assert!((again.latitude - (south.latitude - 6.0 / 111_000.0)).abs() < 1e-12);
        assert_eq!(navigator.current_anchor(), Some(again));
        assert_eq!(navigator.accumulator().last_heading_deg, 180.0);

        assert!(matches!(
            navigator.on_heading_sample(f64::INFINITY),
            Err(NavError::InvalidSample { .. })
        ));
    }

    #[tokio::test]
    async fn test_disarmed_samples_ignored() {
        let mut navigator = anchored_navigator(10.0, 20.0).await;
        let before = navigator.snapshot();

        assert_eq!(navigator.on_sample(MotionSample::acceleration(5.0)), Ok(None));
        assert_eq!(navigator.on_sample(MotionSample::heading(90.0)), Ok(None));
        assert_eq!(navigator.snapshot(), before);
    }

    #[tokio::test]
    async fn test_no_fix_marker() {
        let mut navigator = Navigator::new();
        let provider = MockPositionProvider::new();
        assert_eq!(navigator.request_fix(&provider).await, Err(NavError::NoFixAvailable));
        assert_eq!(navigator.current_estimate(), Estimate::Unavailable);
        assert_ne!(navigator.current_estimate(), Estimate::Position(GeoPoint::new(0.0, 0.0)));
    }

    #[tokio::test]
    async fn test_provider_error_leaves_state() {
        let mut navigator = anchored_navigator(10.0, 20.0).await;
        let before = navigator.snapshot();

        let provider = MockPositionProvider::failing(ProviderError::PermissionDenied);
        let result = navigator.request_fix(&provider).await;
        assert_eq!(result, Err(NavError::Provider(ProviderError::PermissionDenied)));
        assert_eq!(navigator.snapshot(), before);
    }

    #[tokio::test]
    async fn test_freeze_while_armed_rebaselines() {
        let mut navigator = anchored_navigator(10.0, 20.0).await;
        navigator.arm().unwrap();
        let moved = navigator.on_sample(MotionSample::acceleration(100.0)).unwrap().unwrap();
        assert_eq!(navigator.freeze_anchor(), Some(moved));
        assert_eq!(navigator.current_anchor(), Some(moved));
    }

    #[tokio::test]
    async fn test_late_fix_dropped_after_arming() {
        let mut navigator = anchored_navigator(10.0, 20.0).await;
        navigator.begin_fix_request().unwrap();
        navigator.arm().unwrap();
        let before = navigator.snapshot();

        let result = navigator.complete_fix_request(Ok(Some(GeoPoint::new(1.0, 1.0))));
        assert_eq!(result, Err(NavError::FixRequestSuppressed));
        assert_eq!(navigator.snapshot(), before);
    }

    #[tokio::test]
    async fn test_evaluate() {
        let mut navigator = anchored_navigator(10.0, 20.0).await;
        let evaluation = navigator.evaluate();
        assert_eq!(evaluation.separation_m, Some(0.0));

        navigator.arm().unwrap();
        navigator.on_sample(MotionSample::acceleration(111.0)).unwrap();
        let evaluation = navigator.evaluate();
        assert_eq!(evaluation.fix, Some(GeoPoint::new(10.0, 20.0)));
        assert_eq!(evaluation.arm_state, ArmState::Armed);
        let separation = evaluation.separation_m.unwrap();
        assert!((separation - 111.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_execute_commands() {
        let mut navigator = Navigator::new();
        let provider = MockPositionProvider::with_fix(GeoPoint::new(1.0, 2.0));

        let response = navigator.execute(Command::EnableDeadReckoning, &provider).await;
        assert!(matches!(response, Err(NavError::CannotArm { .. })));

        let response = navigator.execute(Command::FetchFix, &provider).await.unwrap();
        assert_eq!(response, CommandResponse::FixAcquired(GeoPoint::new(1.0, 2.0)));
        let response = navigator.execute(Command::FreezeAnchor, &provider).await.unwrap();
        assert_eq!(response, CommandResponse::AnchorFrozen(Some(GeoPoint::new(1.0, 2.0))));
        let response = navigator.execute(Command::EnableDeadReckoning, &provider).await.unwrap();
        assert_eq!(response, CommandResponse::Armed);
        let response = navigator.execute(Command::FetchFix, &provider).await;
        assert_eq!(response, Err(NavError::FixRequestSuppressed));
        let response = navigator.execute(Command::DisableDeadReckoning, &provider).await.unwrap();
        assert_eq!(response, CommandResponse::Disarmed);
    }
}
