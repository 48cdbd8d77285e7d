//! Google Video Intelligence
//!
//! Two signal families are read from an annotation:
//! - explicit-content frames, whose likelihood enum maps onto a score for
//!   `sexual_explicit`
//! - segment and shot labels, matched by substring against [`LABEL_SIGNALS`]
//!
//! Frames and label segments carry time offsets; the ones that clear the
//! admission thresholds become time markers on the result.

mod transformers;
mod types;

pub use transformers::GoogleVideoResponseTransformer;
pub use types::{
    DurationSeconds, Entity, ExplicitContentAnnotation, ExplicitContentFrame, GoogleDuration,
    GoogleStatus, LabelAnnotation, LabelSegment, VideoAnnotationResponse, VideoAnnotationResults,
    VideoSegment,
};

/// Category for explicit-content frames.
pub const EXPLICIT_CATEGORY: &str = "sexual_explicit";
/// Informational score recorded when on-screen text is present.
pub const ON_SCREEN_TEXT_CATEGORY: &str = "on_screen_text";
pub const ON_SCREEN_TEXT_SCORE: f64 = 0.5;

/// Label substrings and the category they map to.
pub const LABEL_SIGNALS: &[(&str, &str)] = &[
    ("violence", "violence"),
    ("weapon", "weapons"),
    ("blood", "graphic_content"),
    ("fight", "violence"),
];

/// Score for a likelihood enum value. Missing or unrecognized values
/// count as `UNKNOWN`.
pub fn likelihood_score(likelihood: Option<&str>) -> f64 {
    match likelihood.unwrap_or("UNKNOWN") {
        "VERY_UNLIKELY" => 0.05,
        "UNLIKELY" => 0.15,
        "POSSIBLE" => 0.4,
        "LIKELY" => 0.75,
        "VERY_LIKELY" => 0.95,
        _ => 0.5,
    }
}
