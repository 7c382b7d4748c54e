//! Processing report for one pipeline run.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::models::{RankedClaim, SourceType};
use crate::services::fusion::FusionStats;
use crate::utils::math::{mean, median};

/// Summary statistics over candidate ranking scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl ScoreStats {
    /// All zeros for an empty slice.
    pub fn from_claims(claims: &[RankedClaim]) -> Self {
        if claims.is_empty() {
            return Self::default();
        }
        let scores: Vec<f64> = claims.iter().map(|c| c.ranking_score()).collect();
        Self {
            count: scores.len(),
            min: scores.iter().copied().fold(f64::INFINITY, f64::min),
            max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean: mean(&scores),
            median: median(&scores),
        }
    }
}

/// How the candidate pool was partitioned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterSummary {
    /// `singleton`, `kmeans` or `keyword_buckets`.
    pub strategy: String,
    pub requested_clusters: usize,
    /// Member counts, in cluster order.
    pub sizes: Vec<usize>,
}

/// Full diagnostics of a run, persisted as `<video_id>_claims_report.json`.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub video_id: String,
    pub duration_minutes: f64,
    pub max_claims: usize,
    pub config: PipelineConfig,
    /// Integrated candidates per source.
    pub source_counts: BTreeMap<SourceType, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fusion: Option<FusionStats>,
    /// Raw records dropped by the normalizer, across all sources.
    pub rejected_claims: usize,
    pub total_candidates: usize,
    pub score_stats: ScoreStats,
    pub candidate_quartiles: [usize; 4],
    pub final_quartiles: [usize; 4],
    pub clustering: ClusterSummary,
    pub representatives: usize,
    pub temporal_reconciliation: bool,
    pub final_claims: Vec<RankedClaim>,
}

impl ProcessingReport {
    /// A report with zero counts and no claims.
    pub fn empty(
        video_id: impl Into<String>,
        duration_minutes: f64,
        max_claims: usize,
        config: PipelineConfig,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            video_id: video_id.into(),
            duration_minutes,
            max_claims,
            config,
            source_counts: BTreeMap::new(),
            fusion: None,
            rejected_claims: 0,
            total_candidates: 0,
            score_stats: ScoreStats::default(),
            candidate_quartiles: [0; 4],
            final_quartiles: [0; 4],
            clustering: ClusterSummary::default(),
            representatives: 0,
            temporal_reconciliation: false,
            final_claims: Vec::new(),
        }
    }

    pub fn final_count(&self) -> usize {
        self.final_claims.len()
    }
}
