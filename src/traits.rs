//! Collaborator traits
//!
//! Seams to the outside world: provider adapters and state persistence.

pub mod moderation;
pub mod storage;

pub use moderation::ModerationProvider;
pub use storage::ModerationStore;
