//! Consensus across providers
//!
//! Providers score on incompatible scales, so agreement is summarized
//! categorically (union of categories, any/all flagged) instead of by
//! averaging scores.

use chrono::{DateTime, Utc};

use crate::types::{
    ConsensusConfidence, ConsensusResult, ModerationResult, PROVIDER_CONSENSUS, TimeMarker,
};

use super::associator::sort_by_offset;

/// Summarize the results of every provider that answered for one item.
///
/// With no inputs the summary is unflagged with `low` confidence.
pub fn build_consensus(results: &[ModerationResult]) -> ConsensusResult {
    let flagged_count = results.iter().filter(|r| r.flagged).count();

    let confidence = if !results.is_empty() && flagged_count == results.len() {
        ConsensusConfidence::High
    } else if flagged_count > 0 {
        ConsensusConfidence::Medium
    } else {
        ConsensusConfidence::Low
    };

    ConsensusResult {
        flagged: flagged_count > 0,
        categories: results
            .iter()
            .flat_map(|r| r.categories.iter().cloned())
            .collect(),
        confidence,
    }
}

/// Build the result stored for an item from its provider results.
///
/// A single result is returned unchanged. Several results produce a
/// `consensus` result: categories are the consensus union, each score is
/// the highest any provider reported for that category, markers are the
/// time-ordered union, and the source results are embedded.
pub fn merge_results(
    results: Vec<ModerationResult>,
    timestamp: DateTime<Utc>,
) -> Option<ModerationResult> {
    match results.len() {
        0 => None,
        1 => results.into_iter().next(),
        _ => {
            let consensus = build_consensus(&results);
            let mut merged = ModerationResult::new(PROVIDER_CONSENSUS, timestamp);

            for source in &results {
                for (category, score) in &source.category_scores {
                    merged.record_score(category.clone(), *score);
                }
            }
            for category in &consensus.categories {
                let score = merged.score(category).unwrap_or(0.0);
                merged.admit(category.clone(), score);
            }

            let mut markers: Vec<TimeMarker> = results
                .iter()
                .flat_map(|r| r.markers().iter().cloned())
                .collect();
            sort_by_offset(&mut markers);
            markers.dedup();
            merged.set_timestamps(markers);

            merged.consensus = Some(consensus);
            merged.sources = results;
            Some(merged)
        }
    }
}
