//! Collaborator contracts for absolute fixes and motion samples

use crate::core::{GeoPoint, MotionSample};
use crate::hardware::ProviderResult;
use std::future::Future;

/// Source of absolute position fixes
///
/// The caller is expected to hold location authorization; a provider that
/// lacks it answers with `ProviderError::PermissionDenied`.
pub trait PositionProvider: Send + Sync {
    /// Last known fix
    /// Returns Ok(Some(point)) when a fix is cached
    /// Returns Ok(None) when the provider has never had a fix
    /// Returns Err(error) if the request fails
    fn last_known_fix(&self) -> impl Future<Output = ProviderResult<Option<GeoPoint>>> + Send;
}

/// Stream of motion samples delivered at a best-effort cadence
pub trait MotionFeed {
    /// Next pending sample, if any (non-blocking)
    fn next_sample(&mut self) -> Option<MotionSample>;

    /// The feed will never produce another sample
    fn is_exhausted(&self) -> bool {
        false
    }
}
