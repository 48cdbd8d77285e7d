//! Google Video Intelligence response transformer

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::analysis::attach_timestamps;
use crate::config::{DEFAULT_GOOGLE_EXPLICIT_THRESHOLD, DEFAULT_GOOGLE_LABEL_THRESHOLD};
use crate::error::{ModerationError, Result};
use crate::providers::{checked_score, round3};
use crate::transformers::ResponseTransformer;
use crate::types::{ModerationResult, PROVIDER_GOOGLE_VIDEO, TimeMarker};

use super::types::{LabelAnnotation, VideoAnnotationResponse, VideoAnnotationResults};
use super::{
    EXPLICIT_CATEGORY, LABEL_SIGNALS, ON_SCREEN_TEXT_CATEGORY, ON_SCREEN_TEXT_SCORE,
    likelihood_score,
};

#[derive(Debug, Clone, Copy)]
pub struct GoogleVideoResponseTransformer {
    explicit_threshold: f64,
    label_threshold: f64,
}

impl GoogleVideoResponseTransformer {
    pub fn new(explicit_threshold: f64, label_threshold: f64) -> Self {
        Self {
            explicit_threshold,
            label_threshold,
        }
    }

    fn explicit_signals(
        &self,
        annotation: &VideoAnnotationResults,
        result: &mut ModerationResult,
        observations: &mut Vec<TimeMarker>,
    ) {
        let Some(frames) = annotation
            .explicit_annotation
            .as_ref()
            .map(|a| &a.frames)
            .filter(|f| !f.is_empty())
        else {
            return;
        };

        let mut peak = 0.0_f64;
        for frame in frames {
            let score = likelihood_score(frame.pornography_likelihood.as_deref());
            peak = peak.max(score);
            if score >= self.explicit_threshold
                && let Some(offset) = frame.time_offset.as_ref().and_then(|d| d.as_secs_f64())
            {
                observations.push(TimeMarker::new(offset, [EXPLICIT_CATEGORY], score));
            }
        }

        if peak >= self.explicit_threshold {
            result.admit(EXPLICIT_CATEGORY, round3(peak));
        } else {
            result.record_score(EXPLICIT_CATEGORY, round3(peak));
        }
    }

    fn label_signals(
        &self,
        label: &LabelAnnotation,
        result: &mut ModerationResult,
        observations: &mut Vec<TimeMarker>,
    ) -> Result<()> {
        let name = label.description().to_lowercase();
        let matched: BTreeSet<&str> = LABEL_SIGNALS
            .iter()
            .filter(|(needle, _)| name.contains(needle))
            .map(|(_, category)| *category)
            .collect();
        if matched.is_empty() {
            return Ok(());
        }

        let mut peak = 0.0_f64;
        for segment in &label.segments {
            let confidence = checked_score(
                PROVIDER_GOOGLE_VIDEO,
                "segments.confidence",
                segment.confidence.unwrap_or(0.0),
            )?;
            peak = peak.max(confidence);
            if confidence >= self.label_threshold
                && let Some(start) = segment
                    .segment
                    .as_ref()
                    .and_then(|s| s.start_time_offset.as_ref())
                    .and_then(|d| d.as_secs_f64())
            {
                observations.push(TimeMarker::new(start, matched.iter().copied(), confidence));
            }
        }

        // Admission uses the raw confidence; only the reported score is rounded.
        let score = round3(peak);
        for category in matched {
            if peak >= self.label_threshold {
                result.admit(category, score);
            } else {
                result.record_score(category, score);
            }
        }
        Ok(())
    }
}

impl Default for GoogleVideoResponseTransformer {
    fn default() -> Self {
        Self::new(
            DEFAULT_GOOGLE_EXPLICIT_THRESHOLD,
            DEFAULT_GOOGLE_LABEL_THRESHOLD,
        )
    }
}

impl ResponseTransformer for GoogleVideoResponseTransformer {
    type Raw = VideoAnnotationResponse;

    fn provider_id(&self) -> &'static str {
        PROVIDER_GOOGLE_VIDEO
    }

    fn transform_moderation_response(
        &self,
        raw: &VideoAnnotationResponse,
        timestamp: DateTime<Utc>,
    ) -> Result<ModerationResult> {
        let annotation = raw.annotation().ok_or_else(|| {
            ModerationError::missing_field(PROVIDER_GOOGLE_VIDEO, "annotationResults[0]")
        })?;
        if let Some(status) = &annotation.error {
            return Err(ModerationError::provider_call(
                PROVIDER_GOOGLE_VIDEO,
                format!("annotation error {}: {}", status.code, status.message),
                false,
            ));
        }
        if annotation.explicit_annotation.is_none()
            && annotation.segment_label_annotations.is_none()
            && annotation.shot_label_annotations.is_none()
            && annotation.text_annotations.is_none()
        {
            return Err(ModerationError::missing_field(
                PROVIDER_GOOGLE_VIDEO,
                "explicitAnnotation",
            ));
        }

        let mut result = ModerationResult::new(PROVIDER_GOOGLE_VIDEO, timestamp);
        let mut observations = Vec::new();

        self.explicit_signals(annotation, &mut result, &mut observations);

        let labels = annotation
            .segment_label_annotations
            .iter()
            .chain(annotation.shot_label_annotations.iter())
            .flatten();
        for label in labels {
            self.label_signals(label, &mut result, &mut observations)?;
        }

        if annotation
            .text_annotations
            .as_ref()
            .is_some_and(|t| !t.is_empty())
        {
            result.record_score(ON_SCREEN_TEXT_CATEGORY, ON_SCREEN_TEXT_SCORE);
        }

        attach_timestamps(&mut result, &observations);
        Ok(result)
    }
}
