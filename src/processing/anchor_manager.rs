//! Anchor management: the dead-reckoning origin and the live estimate
//!
//! Fetching a fix only updates the live estimate. The anchor moves on an
//! explicit freeze, or when dead reckoning advances it sample by sample.

use crate::api::types::{NavError, NavResult};
use crate::core::{Estimate, GeoPoint};
use crate::hardware::{PositionProvider, ProviderError, ProviderResult};
use log::{debug, info, warn};

/// Holds the trusted origin and the externally visible estimate
#[derive(Debug, Clone, Default)]
pub struct AnchorManager {
    /// Dead-reckoning origin, `None` until the first freeze
    anchor: Option<GeoPoint>,
    /// Position shown to the user
    estimate: Estimate,
    /// Last real fix returned by the provider
    last_fix: Option<GeoPoint>,
}

impl AnchorManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the provider's last known fix into the live estimate
    ///
    /// `armed` is the integrator state at call time; a fetch while armed is
    /// rejected without contacting the provider.
    pub async fn request_fix<P: PositionProvider>(
        &mut self,
        provider: &P,
        armed: bool,
    ) -> NavResult<GeoPoint> {
        if armed {
            warn!("Fix request suppressed: dead reckoning is enabled");
            return Err(NavError::FixRequestSuppressed);
        }

        let outcome = provider.last_known_fix().await;
        self.apply_fix_outcome(outcome)
    }

    /// Apply a completed provider call to the live estimate
    ///
    /// A real point replaces the estimate and is remembered as the last fix.
    /// An empty answer sets the estimate to `Unavailable`. A failure leaves
    /// everything untouched.
    pub fn apply_fix_outcome(
        &mut self,
        outcome: ProviderResult<Option<GeoPoint>>,
    ) -> NavResult<GeoPoint> {
        match outcome {
            Ok(Some(point)) if point.is_finite() => {
                info!(
                    "Fix acquired: latitude {} longitude {}",
                    point.latitude, point.longitude
                );
                self.estimate = Estimate::Position(point);
                self.last_fix = Some(point);
                Ok(point)
            }
            Ok(Some(point)) => {
                warn!("Provider returned a non-finite fix: {:?}", point);
                Err(NavError::Provider(ProviderError::Internal {
                    details: format!(
                        "non-finite coordinate ({}, {})",
                        point.latitude, point.longitude
                    ),
                }))
            }
            Ok(None) => {
                info!("Provider has no last known fix");
                self.estimate = Estimate::Unavailable;
                Err(NavError::NoFixAvailable)
            }
            Err(error) => {
                warn!("Cannot fetch fix: {}", error);
                Err(NavError::Provider(error))
            }
        }
    }

    /// Copy the live estimate into the anchor
    ///
    /// Returns the new anchor, or `None` (without error) when the estimate
    /// holds no point.
    pub fn freeze_anchor(&mut self) -> Option<GeoPoint> {
        match self.estimate.point() {
            Some(point) => {
                info!(
                    "Anchor frozen at latitude {} longitude {}",
                    point.latitude, point.longitude
                );
                self.anchor = Some(point);
                Some(point)
            }
            None => {
                debug!("Freeze skipped: estimate is {:?}", self.estimate);
                None
            }
        }
    }

    /// Move both the anchor and the live estimate to `point`
    pub(crate) fn advance(&mut self, point: GeoPoint) {
        self.anchor = Some(point);
        self.estimate = Estimate::Position(point);
    }

    pub fn current_anchor(&self) -> Option<GeoPoint> {
        self.anchor
    }

    pub fn current_estimate(&self) -> Estimate {
        self.estimate
    }

    pub fn last_fix(&self) -> Option<GeoPoint> {
        self.last_fix
    }

    pub fn has_anchor(&self) -> bool {
        self.anchor.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::MockPositionProvider;

    #[tokio::test]
    async fn test_fetch_updates_estimate_not_anchor() {
        let mut manager = AnchorManager::new();
        let provider = MockPositionProvider::with_fix(GeoPoint::new(10.0, 20.0));

        let point = manager.request_fix(&provider, false).await.unwrap();
        assert_eq!(point, GeoPoint::new(10.0, 20.0));
        assert_eq!(manager.current_estimate(), Estimate::Position(point));
        assert_eq!(manager.last_fix(), Some(point));
        assert_eq!(manager.current_anchor(), None);
    }

    #[tokio::test]
    async fn test_armed_fetch_is_suppressed() {
        let mut manager = AnchorManager::new();
        let provider = MockPositionProvider::with_fix(GeoPoint::new(10.0, 20.0));

        let result = manager.request_fix(&provider, true).await;
        assert_eq!(result, Err(NavError::FixRequestSuppressed));
        assert_eq!(provider.request_count(), 0);
        assert_eq!(manager.current_estimate(), Estimate::Pending);
    }

    #[test]
    fn test_no_fix_sets_unavailable_marker() {
        let mut manager = AnchorManager::new();
        manager.apply_fix_outcome(Ok(Some(GeoPoint::new(1.0, 1.0)))).unwrap();

        let result = manager.apply_fix_outcome(Ok(None));
        assert_eq!(result, Err(NavError::NoFixAvailable));
        assert_eq!(manager.current_estimate(), Estimate::Unavailable);
        // the last real fix survives
        assert_eq!(manager.last_fix(), Some(GeoPoint::new(1.0, 1.0)));
    }

    #[test]
    fn test_provider_failure_leaves_state() {
        let mut manager = AnchorManager::new();
        manager.apply_fix_outcome(Ok(Some(GeoPoint::new(3.0, 4.0)))).unwrap();
        manager.freeze_anchor();

        let result = manager.apply_fix_outcome(Err(ProviderError::PermissionDenied));
        assert_eq!(result, Err(NavError::Provider(ProviderError::PermissionDenied)));
        assert_eq!(manager.current_estimate(), Estimate::Position(GeoPoint::new(3.0, 4.0)));
        assert_eq!(manager.current_anchor(), Some(GeoPoint::new(3.0, 4.0)));
    }

    #[test]
    fn test_non_finite_fix_rejected() {
        let mut manager = AnchorManager::new();
        let result = manager.apply_fix_outcome(Ok(Some(GeoPoint::new(f64::NAN, 1.0))));
        assert!(matches!(result, Err(NavError::Provider(ProviderError::Internal { .. }))));
        assert_eq!(manager.current_estimate(), Estimate::Pending);
    }

    #[test]
    fn test_freeze_anchor() {
        let mut manager = AnchorManager::new();
        assert_eq!(manager.freeze_anchor(), None);
        assert!(!manager.has_anchor());

        manager.apply_fix_outcome(Ok(None)).unwrap_err();
        assert_eq!(manager.freeze_anchor(), None);
        assert!(!manager.has_anchor());

        manager.apply_fix_outcome(Ok(Some(GeoPoint::new(0.0, 0.0)))).unwrap();
        // the origin is a real fix once the provider reports it
        assert_eq!(manager.freeze_anchor(), Some(GeoPoint::new(0.0, 0.0)));
        assert!(manager.has_anchor());
    }
}
