//! Collaborator abstraction layer
//! 
//! This module describes the external feeds the navigator consumes: an
//! absolute position provider and a motion sample feed, plus mock versions.

pub mod provider;
pub mod mock;
pub mod error;

pub use provider::{PositionProvider, MotionFeed};
pub use mock::{MockPositionProvider, ScriptedMotionFeed};
pub use error::{ProviderError, ProviderResult, RecoveryStrategy};
