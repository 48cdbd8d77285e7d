//! Cross-provider agreement types

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Agreement tier across providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusConfidence {
    /// Every provider flagged the item
    High,
    /// At least one, but not every, provider flagged the item
    Medium,
    /// No provider flagged the item
    Low,
}

impl fmt::Display for ConsensusConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(s)
    }
}

/// Categorical summary of several provider results for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub flagged: bool,
    pub categories: BTreeSet<String>,
    pub confidence: ConsensusConfidence,
}

impl Default for ConsensusResult {
    fn default() -> Self {
        Self {
            flagged: false,
            categories: BTreeSet::new(),
            confidence: ConsensusConfidence::Low,
        }
    }
}
