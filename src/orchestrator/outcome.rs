//! Results of trigger calls

use crate::error::{ModerationError, ProviderFailure, Result};
use crate::types::{AnalysisStatus, ContentId, ModerationResult};

/// Settled analysis of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub item_id: ContentId,
    /// `Completed` or `Failed`
    pub status: AnalysisStatus,
    pub result: Option<ModerationResult>,
    /// Providers that did not contribute, in dispatch order
    pub failures: Vec<ProviderFailure>,
    /// Why the item failed, when it did
    pub error: Option<ModerationError>,
}

impl AnalysisOutcome {
    pub(crate) fn completed(
        item_id: ContentId,
        result: ModerationResult,
        failures: Vec<ProviderFailure>,
    ) -> Self {
        Self {
            item_id,
            status: AnalysisStatus::Completed,
            result: Some(result),
            failures,
            error: None,
        }
    }

    pub(crate) fn failed(
        item_id: ContentId,
        failures: Vec<ProviderFailure>,
        error: ModerationError,
    ) -> Self {
        Self {
            item_id,
            status: AnalysisStatus::Failed,
            result: None,
            failures,
            error: Some(error),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == AnalysisStatus::Completed
    }

    /// The merged result, or the error that failed the item.
    pub fn into_result(self) -> Result<ModerationResult> {
        match (self.result, self.error) {
            (Some(result), _) => Ok(result),
            (None, Some(error)) => Err(error),
            (None, None) => Err(ModerationError::AllProvidersFailed {
                item_id: self.item_id.to_string(),
                failures: self.failures,
            }),
        }
    }
}

/// Why a trigger did not dispatch anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The item has no media or URL to analyze
    NoSource,
    /// Another analysis of this item is in flight
    AlreadyAnalyzing,
    /// The item already settled; only an explicit re-run analyzes it again
    AlreadySettled(AnalysisStatus),
}

/// What a trigger call did.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    Skipped(SkipReason),
    Analyzed(AnalysisOutcome),
}

impl TriggerOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        match self {
            Self::Analyzed(outcome) => Some(outcome),
            Self::Skipped(_) => None,
        }
    }
}
