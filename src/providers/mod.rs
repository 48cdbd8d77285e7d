//! Provider response normalization
//!
//! Each provider module holds the serde shapes of its native moderation
//! response and a pure normalizer into [`ModerationResult`]. The
//! [`RawProviderResponse`] union is what provider adapters hand to the
//! analysis controller.

pub mod azure;
pub mod google_video;
pub mod openai;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Thresholds;
use crate::error::{ModerationError, Result};
use crate::transformers::ResponseTransformer;
use crate::types::{ModerationResult, PROVIDER_AZURE, PROVIDER_GOOGLE_VIDEO, PROVIDER_OPENAI};

use azure::{AzureAnalyzeResponse, AzureResponseTransformer};
use google_video::{GoogleVideoResponseTransformer, VideoAnnotationResponse};
use openai::{OpenAiModerationResponse, OpenAiResponseTransformer};

/// A decoded, not yet normalized, provider response.
#[derive(Debug, Clone, PartialEq)]
pub enum RawProviderResponse {
    OpenAi(OpenAiModerationResponse),
    Azure(AzureAnalyzeResponse),
    GoogleVideo(VideoAnnotationResponse),
}

impl RawProviderResponse {
    /// Decode the native JSON body of `provider_id`.
    pub fn from_json(provider_id: &str, raw: &Value) -> Result<Self> {
        match provider_id {
            PROVIDER_OPENAI => decode(PROVIDER_OPENAI, raw).map(Self::OpenAi),
            PROVIDER_AZURE => decode(PROVIDER_AZURE, raw).map(Self::Azure),
            PROVIDER_GOOGLE_VIDEO => decode(PROVIDER_GOOGLE_VIDEO, raw).map(Self::GoogleVideo),
            other => Err(ModerationError::Config(format!(
                "unknown moderation provider: {other}"
            ))),
        }
    }

    pub fn provider_id(&self) -> &'static str {
        match self {
            Self::OpenAi(_) => PROVIDER_OPENAI,
            Self::Azure(_) => PROVIDER_AZURE,
            Self::GoogleVideo(_) => PROVIDER_GOOGLE_VIDEO,
        }
    }

    /// Normalize into a [`ModerationResult`] stamped with `timestamp`.
    pub fn normalize(
        &self,
        thresholds: &Thresholds,
        timestamp: DateTime<Utc>,
    ) -> Result<ModerationResult> {
        match self {
            Self::OpenAi(response) => {
                OpenAiResponseTransformer.transform_moderation_response(response, timestamp)
            }
            Self::Azure(response) => AzureResponseTransformer::new(thresholds.azure_severity)
                .transform_moderation_response(response, timestamp),
            Self::GoogleVideo(response) => GoogleVideoResponseTransformer::new(
                thresholds.google_explicit,
                thresholds.google_label,
            )
            .transform_moderation_response(response, timestamp),
        }
    }
}

/// Decode and normalize a native provider body in one step.
pub fn normalize_json(
    provider_id: &str,
    raw: &Value,
    thresholds: &Thresholds,
    timestamp: DateTime<Utc>,
) -> Result<ModerationResult> {
    RawProviderResponse::from_json(provider_id, raw)?.normalize(thresholds, timestamp)
}

pub(crate) fn decode<T: DeserializeOwned>(provider: &str, raw: &Value) -> Result<T> {
    T::deserialize(raw).map_err(|e| ModerationError::Normalization {
        provider: provider.to_string(),
        field: e.to_string(),
    })
}

/// Reject scores that cannot be placed on the `[0, 1]` scale.
pub(crate) fn checked_score(provider: &str, field: &str, score: f64) -> Result<f64> {
    if score.is_finite() {
        Ok(score.clamp(0.0, 1.0))
    } else {
        Err(ModerationError::Normalization {
            provider: provider.to_string(),
            field: format!("{field} is not a finite number"),
        })
    }
}

/// Round to three decimals, as scores are displayed and persisted.
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
