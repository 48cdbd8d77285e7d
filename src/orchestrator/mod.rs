//! Analysis orchestration
//!
//! The [`AnalysisController`] owns every item's [`ModerationState`](crate::types::ModerationState),
//! decides when provider calls are dispatched and persists each transition:
//!
//! ```text
//! pending --auto/rerun--> analyzing --+--> completed --rerun--+
//!                            ^        |                       |
//!                            |        +--> failed ----rerun---+
//!                            +--------------------------------+
//! ```

mod controller;
mod outcome;

pub use controller::AnalysisController;
pub use outcome::{AnalysisOutcome, SkipReason, TriggerOutcome};
