//! Google Video Intelligence annotation shapes

use serde::{Deserialize, Serialize};

/// Finished `videos:annotate` operation response, or one bare annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VideoAnnotationResponse {
    Operation {
        #[serde(rename = "annotationResults")]
        annotation_results: Vec<VideoAnnotationResults>,
    },
    Annotation(VideoAnnotationResults),
}

impl VideoAnnotationResponse {
    /// The annotation that is normalized: the first one of an operation.
    pub fn annotation(&self) -> Option<&VideoAnnotationResults> {
        match self {
            Self::Operation { annotation_results } => annotation_results.first(),
            Self::Annotation(annotation) => Some(annotation),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnnotationResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_annotation: Option<ExplicitContentAnnotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_label_annotations: Option<Vec<LabelAnnotation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_label_annotations: Option<Vec<LabelAnnotation>>,
    /// Only the presence of text is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_annotations: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<GoogleStatus>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExplicitContentAnnotation {
    #[serde(default)]
    pub frames: Vec<ExplicitContentFrame>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitContentFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_offset: Option<GoogleDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pornography_likelihood: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
    #[serde(default)]
    pub segments: Vec<LabelSegment>,
}

impl LabelAnnotation {
    pub fn description(&self) -> &str {
        self.entity
            .as_ref()
            .and_then(|e| e.description.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<VideoSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_offset: Option<GoogleDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_offset: Option<GoogleDuration>,
}

/// Per-annotation failure reported inside an otherwise finished operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GoogleStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Protobuf duration in either of its JSON encodings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GoogleDuration {
    /// `"12.500s"`
    Text(String),
    /// `{ "seconds": "12", "nanos": 500000000 }`
    Parts {
        #[serde(default)]
        seconds: Option<DurationSeconds>,
        #[serde(default)]
        nanos: Option<i64>,
    },
}

/// int64 seconds, which proto3 JSON may encode as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationSeconds {
    Int(i64),
    Text(String),
}

impl GoogleDuration {
    /// Offset in seconds, `None` if the value cannot be read.
    pub fn as_secs_f64(&self) -> Option<f64> {
        let secs = match self {
            Self::Text(text) => text.trim().strip_suffix('s')?.parse::<f64>().ok()?,
            Self::Parts { seconds, nanos } => {
                let whole = match seconds {
                    Some(DurationSeconds::Int(s)) => *s as f64,
                    Some(DurationSeconds::Text(s)) => s.trim().parse::<i64>().ok()? as f64,
                    None => 0.0,
                };
                whole + nanos.unwrap_or(0) as f64 / 1e9
            }
        };
        secs.is_finite().then_some(secs)
    }
}
