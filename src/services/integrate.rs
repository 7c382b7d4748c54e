//! Source integration: provenance tagging and id assignment.
//!
//! Claim sets are integrated in a fixed source order (video analysis, counter
//! search, press releases), independent of the order they were added in. No
//! deduplication happens here; the same assertion arriving through two channels is
//! two independent pieces of evidence.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{CandidateClaim, Claim, ClaimSet, SourceType};
use crate::utils::timestamp::DEFAULT_TIMESTAMP;

fn integrate_one(candidate: &CandidateClaim, source: SourceType, index: usize) -> Claim {
    Claim {
        claim_text: candidate.claim_text.clone(),
        timestamp: candidate
            .timestamp
            .clone()
            .unwrap_or_else(|| DEFAULT_TIMESTAMP.to_string()),
        speaker: candidate
            .speaker
            .clone()
            .unwrap_or_else(|| source.default_speaker().to_string()),
        initial_assessment: candidate
            .initial_assessment
            .clone()
            .unwrap_or_else(|| source.default_assessment().to_string()),
        source_type: source,
        source_priority: source.priority(),
        global_id: format!("{}_{}", source.short_name(), index),
    }
}

/// Combine claim sets into one ordered list with run-unique `global_id`s.
///
/// Multiple sets from the same source share one index sequence.
pub fn integrate_sources(sets: &[ClaimSet]) -> Vec<Claim> {
    let mut integrated = Vec::with_capacity(sets.iter().map(ClaimSet::len).sum());

    for source in SourceType::ALL {
        let mut index = 0;
        for set in sets.iter().filter(|s| s.source() == source) {
            for candidate in set.claims() {
                integrated.push(integrate_one(candidate, source, index));
                index += 1;
            }
        }
        if index > 0 {
            debug!(source = %source, claims = index, "Integrated claim source");
        }
    }

    integrated
}

/// Claim counts per source type, for reporting.
pub fn count_by_source(claims: &[Claim]) -> BTreeMap<SourceType, usize> {
    let mut counts = BTreeMap::new();
    for claim in claims {
        *counts.entry(claim.source_type).or_insert(0) += 1;
    }
    counts
}
