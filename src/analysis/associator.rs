//! Category to timestamp association
//!
//! Providers that localize detections (video label and frame signals)
//! report raw time-coded observations. These helpers select the
//! observations behind each detected category.

use crate::types::{ModerationResult, TimeMarker};

use super::labels::normalize_label;

/// Observations whose labels match `category`, ordered by offset.
///
/// The sort is stable, so observations at the same offset keep their
/// source order. No match yields an empty vector.
pub fn associate(category: &str, observations: &[TimeMarker]) -> Vec<TimeMarker> {
    let target = normalize_label(category);
    let mut matched: Vec<TimeMarker> = observations
        .iter()
        .filter(|obs| obs.categories.iter().any(|l| normalize_label(l) == target))
        .cloned()
        .collect();
    sort_by_offset(&mut matched);
    matched
}

/// Attach the observations behind every flagged category of `result`.
///
/// The stored markers are the time-ordered union over all flagged
/// categories; an observation matching several categories appears once.
/// Observations matching no flagged category are dropped.
pub fn attach_timestamps(result: &mut ModerationResult, observations: &[TimeMarker]) {
    let targets: Vec<String> = result
        .categories
        .iter()
        .map(|c| normalize_label(c))
        .collect();

    let mut markers: Vec<TimeMarker> = observations
        .iter()
        .filter(|obs| {
            obs.categories
                .iter()
                .any(|label| targets.contains(&normalize_label(label)))
        })
        .cloned()
        .collect();
    sort_by_offset(&mut markers);
    result.set_timestamps(markers);
}

pub(crate) fn sort_by_offset(markers: &mut [TimeMarker]) {
    markers.sort_by(|a, b| a.time_offset_seconds.total_cmp(&b.time_offset_seconds));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PROVIDER_GOOGLE_VIDEO;

    fn observations() -> Vec<TimeMarker> {
        vec![
            TimeMarker::new(10.0, ["violence"], 0.9),
            TimeMarker::new(45.0, ["weapons"], 0.8),
        ]
    }

    #[test]
    fn returns_only_matching_observation() {
        let matched = associate("Violence", &observations());
        assert_eq!(matched, vec![TimeMarker::new(10.0, ["violence"], 0.9)]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        assert!(associate("sexual_explicit", &observations()).is_empty());
        assert!(associate("violence", &[]).is_empty());
    }

    #[test]
    fn output_is_sorted_by_offset() {
        let obs = vec![
            TimeMarker::new(120.0, ["Graphic_Content"], 0.7),
            TimeMarker::new(5.5, ["graphic content"], 0.9),
            TimeMarker::new(60.0, ["GRAPHIC/CONTENT"], 0.8),
        ];
        let offsets: Vec<f64> = associate("graphic_content", &obs)
            .iter()
            .map(|m| m.time_offset_seconds)
            .collect();
        assert_eq!(offsets, vec![5.5, 60.0, 120.0]);
    }

    #[test]
    fn equal_offsets_keep_source_order() {
        let obs = vec![
            TimeMarker::new(30.0, ["violence"], 0.71),
            TimeMarker::new(30.0, ["violence"], 0.95),
        ];
        let matched = associate("violence", &obs);
        assert_eq!(matched[0].confidence, 0.71);
        assert_eq!(matched[1].confidence, 0.95);
    }

    #[test]
    fn attach_keeps_flagged_categories_only() {
        let mut result = ModerationResult::new(PROVIDER_GOOGLE_VIDEO, chrono::Utc::now());
        result.admit("weapons", 0.8);
        let obs = vec![
            TimeMarker::new(45.0, ["weapons"], 0.8),
            TimeMarker::new(10.0, ["violence"], 0.9),
            TimeMarker::new(2.0, ["Weapons", "violence"], 0.75),
        ];

        attach_timestamps(&mut result, &obs);

        let offsets: Vec<f64> = result.markers().iter().map(|m| m.time_offset_seconds).collect();
        assert_eq!(offsets, vec![2.0, 45.0]);
    }

    #[test]
    fn attach_with_nothing_flagged_leaves_timestamps_absent() {
        let mut result = ModerationResult::new(PROVIDER_GOOGLE_VIDEO, chrono::Utc::now());
        attach_timestamps(&mut result, &observations());
        assert!(result.timestamps.is_none());
    }
}
