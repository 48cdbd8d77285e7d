//! Result analysis
//!
//! Pure, synchronous building blocks applied after provider responses
//! have been normalized:
//! - `labels`: category name canonicalization, matching and display labels
//! - `associator`: maps categories to the time-coded observations behind them
//! - `consensus`: agreement across providers and the merged per-item result
//! - `flags`: the per-category flag list and item indicator consumed by the UI

pub mod associator;
pub mod consensus;
pub mod flags;
pub mod labels;

pub use associator::{associate, attach_timestamps};
pub use consensus::{build_consensus, merge_results};
pub use flags::{
    FlagStatus, FlagView, ItemIndicator, build_flags, item_indicator, provider_display_name,
};
pub use labels::{canonical_category, humanize_category, labels_match, normalize_label};
