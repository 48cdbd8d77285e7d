//! Azure response transformer

use chrono::{DateTime, Utc};

use crate::analysis::canonical_category;
use crate::error::{ModerationError, Result};
use crate::transformers::ResponseTransformer;
use crate::types::{ModerationResult, PROVIDER_AZURE};

use super::MAX_SEVERITY;
use super::types::AzureAnalyzeResponse;

#[derive(Debug, Clone, Copy)]
pub struct AzureResponseTransformer {
    severity_threshold: u8,
}

impl AzureResponseTransformer {
    pub fn new(severity_threshold: u8) -> Self {
        Self { severity_threshold }
    }
}

impl Default for AzureResponseTransformer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_AZURE_SEVERITY_THRESHOLD)
    }
}

impl ResponseTransformer for AzureResponseTransformer {
    type Raw = AzureAnalyzeResponse;

    fn provider_id(&self) -> &'static str {
        PROVIDER_AZURE
    }

    fn transform_moderation_response(
        &self,
        raw: &AzureAnalyzeResponse,
        timestamp: DateTime<Utc>,
    ) -> Result<ModerationResult> {
        let analyses = raw
            .categories_analysis
            .as_ref()
            .ok_or_else(|| ModerationError::missing_field(PROVIDER_AZURE, "categoriesAnalysis"))?;

        let mut result = ModerationResult::new(PROVIDER_AZURE, timestamp);
        for (i, analysis) in analyses.iter().enumerate() {
            let category = analysis.category.as_deref().ok_or_else(|| {
                ModerationError::missing_field(PROVIDER_AZURE, format!("categoriesAnalysis[{i}].category"))
            })?;
            let severity = analysis.severity.ok_or_else(|| {
                ModerationError::missing_field(PROVIDER_AZURE, format!("categoriesAnalysis[{i}].severity"))
            })?;
            if !(0..=MAX_SEVERITY).contains(&severity) {
                return Err(ModerationError::missing_field(
                    PROVIDER_AZURE,
                    format!("categoriesAnalysis[{i}].severity out of range: {severity}"),
                ));
            }

            let category = canonical_category(category);
            let score = severity as f64 / MAX_SEVERITY as f64;
            if severity >= i64::from(self.severity_threshold) {
                result.admit(category, score);
            } else {
                result.record_score(category, score);
            }
        }
        Ok(result)
    }
}
