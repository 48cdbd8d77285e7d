//! Per-item analysis state

use std::fmt;

use serde::{Deserialize, Serialize};

use super::moderation::ModerationResult;

/// Analysis lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Analyzing,
    Completed,
    Failed,
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Analysis state of one content item.
///
/// Serialized as `{ "status": ..., "result": ... }`; only `completed`
/// carries a result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ModerationState {
    #[default]
    Pending,
    Analyzing,
    Completed {
        result: ModerationResult,
    },
    Failed,
}

impl ModerationState {
    pub fn status(&self) -> AnalysisStatus {
        match self {
            Self::Pending => AnalysisStatus::Pending,
            Self::Analyzing => AnalysisStatus::Analyzing,
            Self::Completed { .. } => AnalysisStatus::Completed,
            Self::Failed => AnalysisStatus::Failed,
        }
    }

    pub fn result(&self) -> Option<&ModerationResult> {
        match self {
            Self::Completed { result } => Some(result),
            _ => None,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self, Self::Analyzing)
    }
}
