//! OpenAI Moderation response shapes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Either the API envelope or one bare result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpenAiModerationResponse {
    Envelope {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        results: Vec<OpenAiModerationEntry>,
    },
    Entry(OpenAiModerationEntry),
}

impl OpenAiModerationResponse {
    /// The result that is normalized: the first one of an envelope.
    pub fn entry(&self) -> Option<&OpenAiModerationEntry> {
        match self {
            Self::Envelope { results, .. } => results.first(),
            Self::Entry(entry) => Some(entry),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpenAiModerationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<OpenAiCategories>,
    #[serde(
        default,
        alias = "categoryScores",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_scores: Option<BTreeMap<String, f64>>,
}

/// Per-category flags as sent by the API, or an already filtered list of
/// flagged names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpenAiCategories {
    Flags(BTreeMap<String, bool>),
    Names(Vec<String>),
}

impl OpenAiCategories {
    /// Names of the categories marked as flagged.
    pub fn flagged(&self) -> Vec<&str> {
        match self {
            Self::Flags(flags) => flags
                .iter()
                .filter(|(_, on)| **on)
                .map(|(name, _)| name.as_str())
                .collect(),
            Self::Names(names) => names.iter().map(String::as_str).collect(),
        }
    }
}
