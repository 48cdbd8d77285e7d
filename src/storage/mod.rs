//! Analysis state stores
//!
//! Implementations of [`ModerationStore`](crate::traits::ModerationStore).

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;
