//! Flag list and item indicator
//!
//! Projections of the analysis state into what a review screen renders.
//! Nothing here mutates state.

use serde::{Deserialize, Serialize};

use crate::error::ProviderFailure;
use crate::types::{
    ModerationResult, ModerationState, PROVIDER_AZURE, PROVIDER_CONSENSUS, PROVIDER_GOOGLE_VIDEO,
    PROVIDER_OPENAI, TimeMarker,
};

use super::associator::associate;
use super::labels::humanize_category;

/// Whether a flag still needs reviewer attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagStatus {
    Active,
    Dismissed,
}

/// One row of the flag list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagView {
    pub id: String,
    /// Canonical category name, empty for failure rows
    pub category: String,
    pub label: String,
    pub score: f64,
    /// `score` as a rounded percentage
    pub confidence_pct: u8,
    pub status: FlagStatus,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<TimeMarker>,
}

/// Coarse per-item badge shown in content lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemIndicator {
    Pending,
    Analyzing,
    AnalysisFailed,
    Flagged { count: usize },
    Clean,
}

/// Human readable provider name.
pub fn provider_display_name(provider: &str) -> &str {
    match provider {
        PROVIDER_OPENAI => "OpenAI",
        PROVIDER_AZURE => "Azure",
        PROVIDER_GOOGLE_VIDEO => "Google Video Intelligence",
        PROVIDER_CONSENSUS => "Consensus",
        other => other,
    }
}

fn confidence_pct(score: f64) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

fn push_result_flags(flags: &mut Vec<FlagView>, result: &ModerationResult) {
    for (index, category) in result.categories.iter().enumerate() {
        let score = result.score(category).unwrap_or(0.0);
        flags.push(FlagView {
            id: format!("{}-{}-{}", result.provider, category, index),
            category: category.clone(),
            label: humanize_category(category),
            score,
            confidence_pct: confidence_pct(score),
            status: FlagStatus::Active,
            provider: result.provider.clone(),
            markers: associate(category, result.markers()),
        });
    }
}

/// Build the flag list for an item.
///
/// A merged result is expanded into its per-provider sources so each
/// provider's own score is shown. Every failed provider adds a dismissed
/// "<Provider> Analysis Failed" row.
pub fn build_flags(result: Option<&ModerationResult>, failures: &[ProviderFailure]) -> Vec<FlagView> {
    let mut flags = Vec::new();

    if let Some(result) = result {
        if result.sources.is_empty() {
            push_result_flags(&mut flags, result);
        } else {
            for source in &result.sources {
                push_result_flags(&mut flags, source);
            }
        }
    }

    for failure in failures {
        flags.push(FlagView {
            id: format!("{}-failed", failure.provider),
            category: String::new(),
            label: format!("{} Analysis Failed", provider_display_name(&failure.provider)),
            score: 0.0,
            confidence_pct: 0,
            status: FlagStatus::Dismissed,
            provider: failure.provider.clone(),
            markers: Vec::new(),
        });
    }

    flags
}

/// Indicator for an item in its current state.
pub fn item_indicator(state: &ModerationState) -> ItemIndicator {
    match state {
        ModerationState::Pending => ItemIndicator::Pending,
        ModerationState::Analyzing => ItemIndicator::Analyzing,
        ModerationState::Failed => ItemIndicator::AnalysisFailed,
        ModerationState::Completed { result } if result.flagged => ItemIndicator::Flagged {
            count: result.categories.len(),
        },
        ModerationState::Completed { .. } => ItemIndicator::Clean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::merge_results;
    use crate::error::ModerationError;
    use chrono::{DateTime, Utc};

    fn at() -> DateTime<Utc> {
        "2024-12-15T10:31:00Z".parse().unwrap()
    }

    #[test]
    fn single_result_produces_active_flags() {
        let mut result = ModerationResult::new(PROVIDER_OPENAI, at());
        result.admit("self-harm/intent", 0.876);
        result.record_score("violence", 0.01);

        let flags = build_flags(Some(&result), &[]);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].label, "Self-Harm Intent");
        assert_eq!(flags[0].confidence_pct, 88);
        assert_eq!(flags[0].status, FlagStatus::Active);
        assert_eq!(flags[0].id, "openai-self-harm/intent-0");
    }

    #[test]
    fn merged_result_expands_sources() {
        let mut openai = ModerationResult::new(PROVIDER_OPENAI, at());
        openai.admit("hate", 0.82);
        let mut azure = ModerationResult::new(PROVIDER_AZURE, at());
        azure.admit("hate", 0.5);
        let merged = merge_results(vec![openai, azure], at()).unwrap();

        let flags = build_flags(Some(&merged), &[]);
        let providers: Vec<&str> = flags.iter().map(|f| f.provider.as_str()).collect();
        assert_eq!(providers, vec![PROVIDER_OPENAI, PROVIDER_AZURE]);
        assert_eq!(flags[1].confidence_pct, 50);
    }

    #[test]
    fn failures_become_dismissed_rows() {
        let err = ModerationError::provider_call(PROVIDER_AZURE, "503", true);
        let failures = vec![ProviderFailure::new(PROVIDER_AZURE, &err)];

        let flags = build_flags(None, &failures);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].label, "Azure Analysis Failed");
        assert_eq!(flags[0].status, FlagStatus::Dismissed);
        assert_eq!(flags[0].confidence_pct, 0);
    }

    #[test]
    fn video_flags_carry_their_markers() {
        let mut result = ModerationResult::new(PROVIDER_GOOGLE_VIDEO, at());
        result.admit("violence", 0.9);
        let result = result.with_timestamps(vec![
            TimeMarker::new(42.0, ["violence"], 0.9),
            TimeMarker::new(5.0, ["weapons"], 0.8),
        ]);

        let flags = build_flags(Some(&result), &[]);
        assert_eq!(flags[0].markers.len(), 1);
        assert_eq!(flags[0].markers[0].time_offset_seconds, 42.0);
    }

    #[test]
    fn indicator_distinguishes_failed_clean_and_flagged() {
        assert_eq!(item_indicator(&ModerationState::Pending), ItemIndicator::Pending);
        assert_eq!(item_indicator(&ModerationState::Analyzing), ItemIndicator::Analyzing);
        assert_eq!(item_indicator(&ModerationState::Failed), ItemIndicator::AnalysisFailed);

        let clean = ModerationResult::new(PROVIDER_AZURE, at());
        assert_eq!(
            item_indicator(&ModerationState::Completed { result: clean.clone() }),
            ItemIndicator::Clean
        );

        let mut flagged = clean;
        flagged.admit("hate", 0.5);
        flagged.admit("violence", 0.67);
        assert_eq!(
            item_indicator(&ModerationState::Completed { result: flagged }),
            ItemIndicator::Flagged { count: 2 }
        );
    }
}
