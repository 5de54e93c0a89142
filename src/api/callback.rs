//! Status notifications for the presentation layer
//!
//! Every command and every fix completion produces a `NavigationEvent`.
//! Registered callbacks receive them in the order they occur.

use crate::api::types::NavError;
use crate::core::GeoPoint;
use std::collections::HashMap;

/// Callback function type for navigation events
pub type EventCallback = Box<dyn Fn(&NavigationEvent) + Send>;

/// Notifications the presentation layer may render
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    /// Provider delivered a fix
    FixAcquired(GeoPoint),
    /// Provider had no fix; estimate shows the unavailable marker
    FixUnavailable,
    /// Provider failed; estimate unchanged
    FixFailed { cause: String },
    /// Fetch rejected (or late answer dropped) while dead reckoning is enabled
    FixRequestSuppressed,
    /// Anchor set from the live estimate
    AnchorFrozen(GeoPoint),
    /// Freeze requested with nothing to freeze
    AnchorFreezeSkipped,
    /// Dead reckoning started
    DeadReckoningEnabled,
    /// Dead reckoning stopped
    DeadReckoningDisabled,
    /// Dead reckoning could not start
    ArmRejected { reason: String },
    /// A motion sample moved the estimate
    EstimateAdvanced(GeoPoint),
}

impl NavigationEvent {
    /// Event describing a fix request outcome
    pub fn from_fix_result(result: &Result<GeoPoint, NavError>) -> Self {
        match result {
            Ok(point) => NavigationEvent::FixAcquired(*point),
            Err(NavError::NoFixAvailable) => NavigationEvent::FixUnavailable,
            Err(NavError::FixRequestSuppressed) => NavigationEvent::FixRequestSuppressed,
            Err(error) => NavigationEvent::FixFailed {
                cause: error.cause(),
            },
        }
    }

    /// Short user-facing message
    pub fn message(&self) -> String {
        match self {
            NavigationEvent::FixAcquired(point) => {
                format!("Fix acquired: {:.6}, {:.6}", point.latitude, point.longitude)
            }
            NavigationEvent::FixUnavailable => "No fix available".to_string(),
            NavigationEvent::FixFailed { cause } => format!("Cannot fetch fix: {}", cause),
            NavigationEvent::FixRequestSuppressed => {
                "Fix requests are disabled during dead reckoning".to_string()
            }
            NavigationEvent::AnchorFrozen(point) => {
                format!("Anchor saved: {:.6}, {:.6}", point.latitude, point.longitude)
            }
            NavigationEvent::AnchorFreezeSkipped => "No fix to save".to_string(),
            NavigationEvent::DeadReckoningEnabled => "Dead reckoning enabled".to_string(),
            NavigationEvent::DeadReckoningDisabled => "Dead reckoning disabled".to_string(),
            NavigationEvent::ArmRejected { reason } => {
                format!("Cannot enable dead reckoning: {}", reason)
            }
            NavigationEvent::EstimateAdvanced(point) => {
                format!("Estimate: {:.6}, {:.6}", point.latitude, point.longitude)
            }
        }
    }

    /// Events that signal a failed user action
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            NavigationEvent::FixUnavailable
                | NavigationEvent::FixFailed { .. }
                | NavigationEvent::FixRequestSuppressed
                | NavigationEvent::ArmRejected { .. }
        )
    }
}

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u64);

impl CallbackHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Fan-out of navigation events to registered callbacks
#[derive(Default)]
pub struct EventDispatcher {
    callback_counter: u64,
    callbacks: HashMap<CallbackHandle, EventCallback>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event callback
    pub fn register(&mut self, callback: EventCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle(self.callback_counter);
        self.callbacks.insert(handle, callback);
        handle
    }

    /// Unregister a callback; returns false for an unknown handle
    pub fn unregister(&mut self, handle: CallbackHandle) -> bool {
        self.callbacks.remove(&handle).is_some()
    }

    /// Trigger all event callbacks
    pub fn dispatch(&self, event: &NavigationEvent) {
        for callback in self.callbacks.values() {
            callback(event);
        }
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
