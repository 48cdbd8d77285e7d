//! OpenAI response transformer

use chrono::{DateTime, Utc};

use crate::analysis::canonical_category;
use crate::error::{ModerationError, Result};
use crate::providers::checked_score;
use crate::transformers::ResponseTransformer;
use crate::types::{ModerationResult, PROVIDER_OPENAI};

use super::types::OpenAiModerationResponse;

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiResponseTransformer;

impl ResponseTransformer for OpenAiResponseTransformer {
    type Raw = OpenAiModerationResponse;

    fn provider_id(&self) -> &'static str {
        PROVIDER_OPENAI
    }

    fn transform_moderation_response(
        &self,
        raw: &OpenAiModerationResponse,
        timestamp: DateTime<Utc>,
    ) -> Result<ModerationResult> {
        let entry = raw
            .entry()
            .ok_or_else(|| ModerationError::missing_field(PROVIDER_OPENAI, "results[0]"))?;
        let categories = entry
            .categories
            .as_ref()
            .ok_or_else(|| ModerationError::missing_field(PROVIDER_OPENAI, "categories"))?;
        let scores = entry
            .category_scores
            .as_ref()
            .ok_or_else(|| ModerationError::missing_field(PROVIDER_OPENAI, "category_scores"))?;

        let mut result = ModerationResult::new(PROVIDER_OPENAI, timestamp);
        for (name, score) in scores {
            let field = format!("category_scores.{name}");
            let score = checked_score(PROVIDER_OPENAI, &field, *score)?;
            result.record_score(canonical_category(name), score);
        }
        for name in categories.flagged() {
            let field = format!("category_scores.{name}");
            let score = scores
                .get(name)
                .ok_or_else(|| ModerationError::missing_field(PROVIDER_OPENAI, field.as_str()))?;
            let score = checked_score(PROVIDER_OPENAI, &field, *score)?;
            result.admit(canonical_category(name), score);
        }

        if entry.flagged.is_some_and(|f| f != result.flagged) {
            tracing::debug!(
                provider = PROVIDER_OPENAI,
                reported = ?entry.flagged,
                derived = result.flagged,
                "flagged field disagrees with categories, using categories"
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::decode;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn at() -> DateTime<Utc> {
        "2024-12-15T10:31:00Z".parse().unwrap()
    }

    fn normalize(raw: serde_json::Value) -> Result<ModerationResult> {
        let response: OpenAiModerationResponse = decode(PROVIDER_OPENAI, &raw)?;
        OpenAiResponseTransformer.transform_moderation_response(&response, at())
    }

    #[test]
    fn envelope_uses_first_result() {
        let result = normalize(json!({
            "id": "modr-123",
            "model": "omni-moderation-latest",
            "results": [{
                "flagged": true,
                "categories": { "hate": true, "violence": false },
                "category_scores": { "hate": 0.82, "violence": 0.01 }
            }]
        }))
        .unwrap();

        assert!(result.flagged);
        assert_eq!(result.categories, BTreeSet::from(["hate".to_string()]));
        assert_eq!(result.score("hate"), Some(0.82));
        assert_eq!(result.score("violence"), Some(0.01));
        assert_eq!(result.provider, "openai");
        assert_eq!(result.timestamp, at());
    }

    #[test]
    fn bare_result_with_category_list() {
        let result = normalize(json!({
            "flagged": true,
            "categories": ["self-harm/intent"],
            "categoryScores": { "self-harm/intent": 0.91, "hate": 0.02 }
        }))
        .unwrap();
        assert_eq!(
            result.categories,
            BTreeSet::from(["self-harm/intent".to_string()])
        );
        assert!(result.is_consistent());
    }

    #[test]
    fn nothing_flagged_is_clean() {
        let result = normalize(json!({
            "results": [{
                "flagged": false,
                "categories": { "hate": false },
                "category_scores": { "hate": 0.001 }
            }]
        }))
        .unwrap();
        assert!(!result.flagged);
        assert!(result.categories.is_empty());
        assert_eq!(result.score("hate"), Some(0.001));
    }

    #[test]
    fn flagged_field_is_derived_from_categories() {
        let result = normalize(json!({
            "flagged": true,
            "categories": { "hate": false },
            "category_scores": { "hate": 0.3 }
        }))
        .unwrap();
        assert!(!result.flagged);
    }

    #[test]
    fn missing_scores_is_a_normalization_error() {
        let err = normalize(json!({ "results": [{ "categories": { "hate": true } }] })).unwrap_err();
        assert_eq!(
            err,
            ModerationError::missing_field(PROVIDER_OPENAI, "category_scores")
        );
    }

    #[test]
    fn flagged_category_without_score_is_an_error() {
        let err = normalize(json!({
            "categories": ["harassment"],
            "category_scores": { "hate": 0.2 }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ModerationError::missing_field(PROVIDER_OPENAI, "category_scores.harassment")
        );
    }

    #[test]
    fn empty_envelope_is_an_error() {
        let err = normalize(json!({ "results": [] })).unwrap_err();
        assert_eq!(err, ModerationError::missing_field(PROVIDER_OPENAI, "results[0]"));
    }
}
