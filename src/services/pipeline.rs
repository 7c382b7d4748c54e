//! Claim pipeline orchestration.
//!
//! [`ClaimPipeline`] only collects inputs. [`ClaimPipeline::run`] threads them
//! through the stage functions (integrate, score, cluster, select) and assembles
//! the [`ProcessingReport`] once at the end. Running twice on the same inputs gives
//! identical claims and scores.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::models::report::{ClusterSummary, ProcessingReport, ScoreStats};
use crate::models::{ClaimSet, RankedClaim, RawClaim, SourceType};
use crate::services::budget::calculate_max_claims;
use crate::services::clustering::ClusterEngine;
use crate::services::fusion::{fuse_segments, FusedResponse, FusionStats, SegmentExtraction};
use crate::services::integrate::{count_by_source, integrate_sources};
use crate::services::normalize::normalize_claims;
use crate::services::scoring::RelevanceScorer;
use crate::services::selection::{quartile_counts, RepresentativeSelector};

/// Final claims and diagnostics of one run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub final_claims: Vec<RankedClaim>,
    pub report: ProcessingReport,
}

/// Collects claim sets for one video and turns them into a verification shortlist.
pub struct ClaimPipeline {
    video_id: String,
    duration_minutes: f64,
    config: PipelineConfig,
    max_claims: usize,
    claim_sets: Vec<ClaimSet>,
    rejected: usize,
    fusion: Option<FusionStats>,
    engine: ClusterEngine,
}

impl ClaimPipeline {
    pub fn new(video_id: impl Into<String>, duration_minutes: f64, config: PipelineConfig) -> Self {
        let max_claims = calculate_max_claims(
            duration_minutes,
            config.claims_per_minute,
            config.min_claims,
            config.max_claims_override,
        );
        let engine = ClusterEngine::new(&config.clustering);
        Self {
            video_id: video_id.into(),
            duration_minutes,
            config,
            max_claims,
            claim_sets: Vec::new(),
            rejected: 0,
            fusion: None,
            engine,
        }
    }

    /// Replace the clustering engine, e.g. to force a strategy.
    pub fn with_cluster_engine(mut self, engine: ClusterEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn max_claims(&self) -> usize {
        self.max_claims
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalized candidates collected so far, across all sources.
    pub fn candidate_count(&self) -> usize {
        self.claim_sets.iter().map(ClaimSet::len).sum()
    }

    /// Normalize raw records from one source and queue them. Returns the accepted count.
    pub fn add_claims(&mut self, source: SourceType, raw: &[RawClaim]) -> usize {
        let result = normalize_claims(raw, &self.config.normalize);
        let accepted = result.accepted.len();
        self.rejected += result.rejected;
        info!(
            source = %source,
            accepted,
            rejected = result.rejected,
            "Added claims"
        );
        self.claim_sets.push(ClaimSet::new(source, result.accepted));
        accepted
    }

    /// Queue the claims of an already fused video analysis.
    pub fn add_fused_video_analysis(&mut self, fused: &FusedResponse) -> usize {
        match &mut self.fusion {
            Some(stats) => stats.merge(&fused.stats),
            None => self.fusion = Some(fused.stats.clone()),
        }
        self.add_claims(SourceType::VideoAnalysis, &fused.claims)
    }

    /// Fuse per-segment extraction results and queue them as video analysis claims.
    pub fn add_segments(&mut self, segments: Vec<SegmentExtraction>) -> FusedResponse {
        let fused = fuse_segments(segments, &self.config.dedup);
        self.add_fused_video_analysis(&fused);
        fused
    }

    /// Run every stage over the collected claims.
    pub fn run(&self) -> PipelineRun {
        let integrated = integrate_sources(&self.claim_sets);
        if integrated.is_empty() {
            warn!(video_id = %self.video_id, "No claims to process");
            let report = ProcessingReport {
                fusion: self.fusion.clone(),
                rejected_claims: self.rejected,
                ..ProcessingReport::empty(
                    self.video_id.clone(),
                    self.duration_minutes,
                    self.max_claims,
                    self.config.clone(),
                )
            };
            return PipelineRun {
                final_claims: Vec::new(),
                report,
            };
        }
        let source_counts = count_by_source(&integrated);
        let total_candidates = integrated.len();

        let ranked = RelevanceScorer::new(self.duration_minutes).rank(integrated);
        let score_stats = ScoreStats::from_claims(&ranked);
        let candidate_quartiles = quartile_counts(&ranked, self.duration_minutes);

        let clustering = self.engine.cluster(&ranked, self.max_claims);
        let cluster_summary = ClusterSummary {
            strategy: clustering.strategy.clone(),
            requested_clusters: clustering.requested_clusters,
            sizes: clustering.cluster_sizes(),
        };

        let selector = RepresentativeSelector::new(
            self.max_claims,
            self.duration_minutes,
            self.config.selection.clone(),
        );
        let selection = selector.select(&clustering, &ranked);
        let final_quartiles = quartile_counts(&selection.final_claims, self.duration_minutes);

        info!(
            video_id = %self.video_id,
            candidates = total_candidates,
            selected = selection.final_claims.len(),
            budget = self.max_claims,
            strategy = %cluster_summary.strategy,
            "Pipeline complete"
        );

        let report = ProcessingReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            video_id: self.video_id.clone(),
            duration_minutes: self.duration_minutes,
            max_claims: self.max_claims,
            config: self.config.clone(),
            source_counts,
            fusion: self.fusion.clone(),
            rejected_claims: self.rejected,
            total_candidates,
            score_stats,
            candidate_quartiles,
            final_quartiles,
            clustering: cluster_summary,
            representatives: selection.representatives,
            temporal_reconciliation: selection.reconciled,
            final_claims: selection.final_claims.clone(),
        };

        PipelineRun {
            final_claims: selection.final_claims,
            report,
        }
    }
}
