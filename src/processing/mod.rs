//! Anchor management and the navigation state machine

pub mod anchor_manager;
pub mod navigator;

pub use anchor_manager::AnchorManager;
pub use navigator::Navigator;
