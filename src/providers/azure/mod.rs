//! Azure Content Safety
//!
//! Severities on the 0-6 scale become `severity / 6` scores. Categories at
//! or above the configured severity are flagged.

mod transformers;
mod types;

pub use transformers::AzureResponseTransformer;
pub use types::{AzureAnalyzeResponse, AzureCategoryAnalysis};

/// Highest severity Azure reports.
pub const MAX_SEVERITY: i64 = 6;
