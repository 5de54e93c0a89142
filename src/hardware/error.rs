//! Position provider error types and handling

/// Failure reported by an absolute position provider
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// Caller lacks location authorization
    #[error("Location permission denied")]
    PermissionDenied,
    /// Provider is switched off or unreachable
    #[error("Provider unavailable: {details}")]
    Unavailable { details: String },
    /// No answer within the deadline
    #[error("Provider timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    /// Provider returned something unusable or threw
    #[error("Provider failure: {details}")]
    Internal { details: String },
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// What the user can do about a provider failure
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecoveryStrategy {
    /// Re-issue the fetch later
    Retry,
    /// Grant location permission first
    RequestPermission,
}

impl ProviderError {
    /// Get the recommended recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            ProviderError::PermissionDenied => RecoveryStrategy::RequestPermission,
            ProviderError::Unavailable { .. } => RecoveryStrategy::Retry,
            ProviderError::Timeout { .. } => RecoveryStrategy::Retry,
            ProviderError::Internal { .. } => RecoveryStrategy::Retry,
        }
    }

    /// A plain retry may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self.recovery_strategy(), RecoveryStrategy::Retry)
    }
}
