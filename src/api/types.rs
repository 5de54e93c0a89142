//! Common API types and data structures

use crate::core::{ArmState, Estimate, GeoPoint};
use crate::hardware::ProviderError;
use crate::utils::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Result type for navigator operations
pub type NavResult<T> = Result<T, NavError>;

/// Navigator error types
///
/// Every error is local to the operation that raised it; none leaves the
/// navigator in an unusable state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NavError {
    /// Provider answered without a fix
    #[error("No position fix available")]
    NoFixAvailable,
    /// Provider failed (permission, timeout, internal failure)
    #[error("Position provider error: {0}")]
    Provider(#[from] ProviderError),
    /// Fix requested while dead reckoning is enabled
    #[error("Fix request suppressed while dead reckoning is enabled")]
    FixRequestSuppressed,
    /// Dead reckoning cannot start
    #[error("Cannot enable dead reckoning: {reason}")]
    CannotArm { reason: String },
    /// Motion sample carried a non-finite value
    #[error("Invalid motion sample: {reason}")]
    InvalidSample { reason: String },
    /// The navigation service task is gone
    #[error("Navigation service stopped")]
    ServiceStopped,
    /// Service answered a command with the wrong response kind
    #[error("Internal error: {details}")]
    Internal { details: String },
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl NavError {
    /// Short cause suitable for a status line
    pub fn cause(&self) -> String {
        match self {
            NavError::Provider(error) => error.to_string(),
            other => other.to_string(),
        }
    }
}

/// Commands issued by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Ask the provider for its last known fix
    FetchFix,
    /// Copy the live estimate into the anchor
    FreezeAnchor,
    /// Start dead reckoning from the anchor
    EnableDeadReckoning,
    /// Return to absolute-fix mode
    DisableDeadReckoning,
    /// Compare the last absolute fix with the live estimate
    Evaluate,
}

/// Successful outcome of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandResponse {
    /// New live estimate from the provider
    FixAcquired(GeoPoint),
    /// Anchor after a freeze; `None` when there was nothing to freeze
    AnchorFrozen(Option<GeoPoint>),
    /// Dead reckoning is active
    Armed,
    /// Dead reckoning is inactive
    Disarmed,
    /// Fix-versus-estimate comparison
    Evaluation(Evaluation),
}

/// Comparison of the last absolute fix against the live estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Last real fix returned by the provider
    pub fix: Option<GeoPoint>,
    /// Current live estimate
    pub estimate: Estimate,
    /// Flat-earth distance between the two (meters), when both are points
    pub separation_m: Option<f64>,
    /// Mode at evaluation time
    pub arm_state: ArmState,
}

/// Read-only view of the navigator state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationSnapshot {
    /// Current mode
    pub arm_state: ArmState,
    /// Dead-reckoning origin, once one has been frozen
    pub anchor: Option<GeoPoint>,
    /// Position shown to the user
    pub estimate: Estimate,
    /// Last real fix from the provider
    pub last_fix: Option<GeoPoint>,
    /// Accumulated distance proxy
    pub cumulative_displacement: f64,
    /// Last heading applied (degrees)
    pub heading_deg: f64,
    /// Motion samples that advanced the estimate
    pub samples_applied: u64,
}

impl Default for NavigationSnapshot {
    fn default() -> Self {
        Self {
            arm_state: ArmState::Disarmed,
            anchor: None,
            estimate: Estimate::Pending,
            last_fix: None,
            cumulative_displacement: 0.0,
            heading_deg: 0.0,
            samples_applied: 0,
        }
    }
}
