//! Content moderation types

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::consensus::ConsensusResult;

/// Provider id for OpenAI Moderation.
pub const PROVIDER_OPENAI: &str = "openai";
/// Provider id for Azure Content Safety.
pub const PROVIDER_AZURE: &str = "azure";
/// Provider id for Google Video Intelligence.
pub const PROVIDER_GOOGLE_VIDEO: &str = "google_video_intelligence";
/// Provider id used for results merged across providers.
pub const PROVIDER_CONSENSUS: &str = "consensus";

/// One localized detection inside a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeMarker {
    /// Offset from the start of the video, in seconds
    #[serde(rename = "timeOffset", alias = "timeOffsetSeconds")]
    pub time_offset_seconds: f64,
    /// Categories observed at this offset
    pub categories: BTreeSet<String>,
    /// Detection confidence in `[0, 1]`
    pub confidence: f64,
}

impl TimeMarker {
    /// Create a marker. Negative offsets are pinned to zero and the
    /// confidence is clamped into `[0, 1]`.
    pub fn new<I, S>(time_offset_seconds: f64, categories: I, confidence: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            time_offset_seconds: time_offset_seconds.max(0.0),
            categories: categories.into_iter().map(Into::into).collect(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Normalized output of one provider, or of the consensus across providers.
///
/// Categories and scores are only added through [`ModerationResult::admit`]
/// and [`ModerationResult::record_score`], which keep two invariants:
/// every admitted category has a score, and `flagged` is true exactly when
/// at least one category was admitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationResult {
    pub flagged: bool,
    pub categories: BTreeSet<String>,
    pub category_scores: BTreeMap<String, f64>,
    pub provider: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<Vec<TimeMarker>>,
    /// Agreement summary, only present on merged results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus: Option<ConsensusResult>,
    /// Per-provider results a merged result was built from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<ModerationResult>,
}

impl ModerationResult {
    /// Create an empty (clean) result for `provider`.
    pub fn new(provider: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            flagged: false,
            categories: BTreeSet::new(),
            category_scores: BTreeMap::new(),
            provider: provider.into(),
            timestamp,
            timestamps: None,
            consensus: None,
            sources: Vec::new(),
        }
    }

    /// Record a score without admitting the category. Repeated scores for
    /// the same category keep the maximum.
    pub fn record_score(&mut self, category: impl Into<String>, score: f64) {
        let score = score.clamp(0.0, 1.0);
        self.category_scores
            .entry(category.into())
            .and_modify(|existing| *existing = existing.max(score))
            .or_insert(score);
    }

    /// Record a score and admit the category into the flagged set.
    pub fn admit(&mut self, category: impl Into<String>, score: f64) {
        let category = category.into();
        self.record_score(category.clone(), score);
        self.categories.insert(category);
        self.flagged = true;
    }

    /// Attach time markers. An empty list is stored as absent.
    pub fn with_timestamps(mut self, markers: Vec<TimeMarker>) -> Self {
        self.set_timestamps(markers);
        self
    }

    pub fn set_timestamps(&mut self, markers: Vec<TimeMarker>) {
        self.timestamps = if markers.is_empty() {
            None
        } else {
            Some(markers)
        };
    }

    /// Time markers, or an empty slice when the provider had none.
    pub fn markers(&self) -> &[TimeMarker] {
        self.timestamps.as_deref().unwrap_or(&[])
    }

    /// Score for `category`, if one was recorded.
    pub fn score(&self, category: &str) -> Option<f64> {
        self.category_scores.get(category).copied()
    }

    /// Check the structural invariants. Useful after deserializing a
    /// record written by another process.
    pub fn is_consistent(&self) -> bool {
        let scored = self
            .categories
            .iter()
            .all(|c| self.category_scores.contains_key(c));
        let in_range = self
            .category_scores
            .values()
            .all(|s| (0.0..=1.0).contains(s));
        scored && in_range && self.flagged == !self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        "2024-12-15T10:31:00Z".parse().unwrap()
    }

    #[test]
    fn admit_sets_flagged_and_score() {
        let mut result = ModerationResult::new(PROVIDER_OPENAI, at());
        assert!(!result.flagged);
        result.admit("hate", 0.82);
        assert!(result.flagged);
        assert_eq!(result.score("hate"), Some(0.82));
        assert!(result.is_consistent());
    }

    #[test]
    fn record_score_keeps_maximum_and_clamps() {
        let mut result = ModerationResult::new(PROVIDER_GOOGLE_VIDEO, at());
        result.record_score("violence", 0.4);
        result.record_score("violence", 0.9);
        result.record_score("violence", 0.2);
        result.record_score("weapons", 1.7);
        assert_eq!(result.score("violence"), Some(0.9));
        assert_eq!(result.score("weapons"), Some(1.0));
        assert!(!result.flagged);
    }

    #[test]
    fn empty_timestamps_are_stored_as_absent() {
        let result = ModerationResult::new(PROVIDER_OPENAI, at()).with_timestamps(Vec::new());
        assert!(result.timestamps.is_none());
        assert!(result.markers().is_empty());

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("timestamps").is_none());
        assert!(json.get("consensus").is_none());
        assert!(json.get("sources").is_none());
    }

    #[test]
    fn serializes_with_dashboard_field_names() {
        let mut result = ModerationResult::new(PROVIDER_GOOGLE_VIDEO, at());
        result.admit("violence", 0.92);
        let result = result.with_timestamps(vec![TimeMarker::new(30.0, ["violence"], 0.92)]);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["categoryScores"]["violence"], 0.92);
        assert_eq!(json["timestamps"][0]["timeOffset"], 30.0);
        assert_eq!(json["provider"], "google_video_intelligence");
    }

    #[test]
    fn time_marker_accepts_long_offset_name() {
        let marker: TimeMarker = serde_json::from_value(serde_json::json!({
            "timeOffsetSeconds": 12.5,
            "categories": ["violence"],
            "confidence": 0.8
        }))
        .unwrap();
        assert_eq!(marker.time_offset_seconds, 12.5);
    }

    #[test]
    fn time_marker_new_pins_ranges() {
        let marker = TimeMarker::new(-3.0, ["violence"], 1.4);
        assert_eq!(marker.time_offset_seconds, 0.0);
        assert_eq!(marker.confidence, 1.0);
    }

    #[test]
    fn inconsistent_record_is_detected() {
        let mut result = ModerationResult::new(PROVIDER_AZURE, at());
        result.categories.insert("hate".into());
        assert!(!result.is_consistent());
    }
}
