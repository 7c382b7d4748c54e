//! Response fusion: merge per-segment extraction results into one claim pool.
//!
//! Long videos are analyzed in segments, each producing its own claim list.
//! Extractors occasionally degenerate into emitting the same claim over and over,
//! so every segment is guarded before the pool is deduplicated in two phases:
//!
//! 1. exact match on the trimmed, case-folded text
//! 2. near-duplicate match (substring or high token overlap)
//!
//! The first-seen claim always wins, which makes [`deduplicate`] idempotent.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::DedupConfig;
use crate::models::RawClaim;
use crate::services::normalize::raw_claim_text;
use crate::utils::text::{dedup_key, whitespace_tokens};

/// One segment's extraction output, already parsed from the model response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentExtraction {
    /// Free-text report the extractor wrote for this segment.
    #[serde(default, alias = "initial_report", alias = "summary")]
    pub report: String,
    #[serde(default)]
    pub claims: Vec<RawClaim>,
}

impl SegmentExtraction {
    pub fn new(report: impl Into<String>, claims: Vec<RawClaim>) -> Self {
        Self {
            report: report.into(),
            claims,
        }
    }
}

/// What the segment guard did to a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentGuard {
    Passed,
    /// Over the ceiling: deduplicated within the segment, then truncated.
    Truncated { original: usize },
    /// Leading claims repeat the first one; only the first survives.
    RepetitionLoop { original: usize },
}

/// Claim counts removed at each fusion step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusionStats {
    pub segments: usize,
    pub raw_claims: usize,
    pub truncated_segments: usize,
    pub repetition_segments: usize,
    pub after_guards: usize,
    pub exact_removed: usize,
    pub near_removed: usize,
    pub final_claims: usize,
}

impl FusionStats {
    /// Accumulate counts from another fusion pass over the same video.
    pub fn merge(&mut self, other: &FusionStats) {
        self.segments += other.segments;
        self.raw_claims += other.raw_claims;
        self.truncated_segments += other.truncated_segments;
        self.repetition_segments += other.repetition_segments;
        self.after_guards += other.after_guards;
        self.exact_removed += other.exact_removed;
        self.near_removed += other.near_removed;
        self.final_claims += other.final_claims;
    }
}

/// Output of [`fuse_segments`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FusedResponse {
    pub initial_report: String,
    pub claims: Vec<RawClaim>,
    pub analysis_summary: String,
    pub stats: FusionStats,
}

/// Counts removed by each dedup phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupCounts {
    pub exact_removed: usize,
    pub near_removed: usize,
}

fn exact_dedup(claims: Vec<RawClaim>) -> Vec<RawClaim> {
    let mut seen = HashSet::new();
    claims
        .into_iter()
        .filter(|claim| match raw_claim_text(claim) {
            Some(text) => seen.insert(dedup_key(&text)),
            None => true,
        })
        .collect()
}

/// Apply the ceiling and repetition-loop guards to one segment's claims.
pub fn guard_segment(claims: Vec<RawClaim>, config: &DedupConfig) -> (Vec<RawClaim>, SegmentGuard) {
    let original = claims.len();
    let mut guard = SegmentGuard::Passed;

    let mut claims = if original > config.segment_claim_ceiling {
        guard = SegmentGuard::Truncated { original };
        let mut unique = exact_dedup(claims);
        unique.truncate(config.segment_claim_ceiling);
        unique
    } else {
        claims
    };

    let first_text = claims.first().and_then(raw_claim_text).map(|t| dedup_key(&t));
    if let Some(first) = first_text {
        let repeats = claims
            .iter()
            .take(config.repetition_window)
            .filter_map(raw_claim_text)
            .filter(|t| dedup_key(t) == first)
            .count();
        if repeats >= config.repetition_threshold {
            claims.truncate(1);
            guard = SegmentGuard::RepetitionLoop { original };
        }
    }

    (claims, guard)
}

/// Whether two texts are near duplicates.
///
/// Both must be longer than `min_chars`. One being a substring of the other, or
/// token overlap above `overlap_threshold` of the shorter token set, counts.
pub fn is_near_duplicate(a: &str, b: &str, config: &DedupConfig) -> bool {
    if a.chars().count() <= config.near_duplicate_min_chars
        || b.chars().count() <= config.near_duplicate_min_chars
    {
        return false;
    }

    let a_key = dedup_key(a);
    let b_key = dedup_key(b);
    if a_key.contains(&b_key) || b_key.contains(&a_key) {
        return true;
    }

    let a_tokens = whitespace_tokens(&a_key);
    let b_tokens = whitespace_tokens(&b_key);
    let shorter = a_tokens.len().min(b_tokens.len());
    if shorter == 0 {
        return false;
    }
    let shared = a_tokens.intersection(&b_tokens).count();
    shared as f64 > config.near_duplicate_overlap * shorter as f64
}

/// Two-phase deduplication of a claim pool. First occurrence wins.
///
/// Records without any claim text pass through untouched; the normalizer drops them.
pub fn deduplicate(claims: Vec<RawClaim>, config: &DedupConfig) -> (Vec<RawClaim>, DedupCounts) {
    let before = claims.len();
    let exact = exact_dedup(claims);
    let exact_removed = before - exact.len();

    let after_exact = exact.len();
    let mut kept: Vec<RawClaim> = Vec::with_capacity(after_exact);
    let mut kept_texts: Vec<String> = Vec::with_capacity(after_exact);
    for claim in exact {
        match raw_claim_text(&claim) {
            Some(text) => {
                if kept_texts
                    .iter()
                    .any(|existing| is_near_duplicate(existing, &text, config))
                {
                    continue;
                }
                kept_texts.push(text);
                kept.push(claim);
            }
            None => kept.push(claim),
        }
    }
    let near_removed = after_exact - kept.len();

    (
        kept,
        DedupCounts {
            exact_removed,
            near_removed,
        },
    )
}

/// Guard every segment, pool the survivors, and deduplicate the pool.
pub fn fuse_segments(segments: Vec<SegmentExtraction>, config: &DedupConfig) -> FusedResponse {
    let mut stats = FusionStats {
        segments: segments.len(),
        ..Default::default()
    };
    let mut reports = Vec::new();
    let mut pool = Vec::new();

    for (idx, segment) in segments.into_iter().enumerate() {
        stats.raw_claims += segment.claims.len();
        if !segment.report.trim().is_empty() {
            reports.push(format!("[Segment {}]\n{}", idx + 1, segment.report.trim()));
        }

        let (claims, guard) = guard_segment(segment.claims, config);
        match guard {
            SegmentGuard::Passed => {}
            SegmentGuard::Truncated { original } => {
                stats.truncated_segments += 1;
                warn!(
                    segment = idx + 1,
                    original,
                    kept = claims.len(),
                    "Segment exceeded claim ceiling, truncated"
                );
            }
            SegmentGuard::RepetitionLoop { original } => {
                stats.repetition_segments += 1;
                warn!(
                    segment = idx + 1,
                    original, "Repetition loop detected, keeping first claim only"
                );
            }
        }
        pool.extend(claims);
    }
    stats.after_guards = pool.len();

    let (claims, counts) = deduplicate(pool, config);
    stats.exact_removed = counts.exact_removed;
    stats.near_removed = counts.near_removed;
    stats.final_claims = claims.len();

    info!(
        segments = stats.segments,
        raw = stats.raw_claims,
        exact_removed = stats.exact_removed,
        near_removed = stats.near_removed,
        kept = stats.final_claims,
        "Fused segment responses"
    );

    let analysis_summary = format!(
        "Fused {} segment(s): {} raw claims, {} after repetition guards, {} after deduplication \
         ({} exact and {} near duplicates removed).",
        stats.segments,
        stats.raw_claims,
        stats.after_guards,
        stats.final_claims,
        stats.exact_removed,
        stats.near_removed
    );

    FusedResponse {
        initial_report: reports.join("\n\n"),
        claims,
        analysis_summary,
        stats,
    }
}
