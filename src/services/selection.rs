//! Representative selection and temporal reconciliation.
//!
//! One claim per cluster is promoted, best clusters first, until the budget is
//! spent. Extractors favor the opening minutes of a video, so the selection is then
//! reconciled against the video's time quartiles: every quartile that has
//! candidates gets at least one claim before anything else fills the budget.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::SelectionConfig;
use crate::models::RankedClaim;
use crate::services::clustering::ClusteringResult;
use crate::utils::timestamp::quartile_of;

pub const QUARTILES: usize = 4;

/// Outcome of selection for one run.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionResult {
    pub final_claims: Vec<RankedClaim>,
    /// Representatives chosen before temporal reconciliation.
    pub representatives: usize,
    pub reconciled: bool,
}

/// Count claims per time quartile.
pub fn quartile_counts(claims: &[RankedClaim], duration_minutes: f64) -> [usize; QUARTILES] {
    let mut counts = [0; QUARTILES];
    for claim in claims {
        counts[quartile_of(claim.timestamp(), duration_minutes)] += 1;
    }
    counts
}

/// Highest-scoring member of each cluster, in cluster order, up to `budget`.
pub fn select_representatives(clustering: &ClusteringResult, budget: usize) -> Vec<RankedClaim> {
    clustering
        .clusters
        .iter()
        .filter_map(|cluster| cluster.representative().cloned())
        .take(budget)
        .collect()
}

fn sort_by_score(claims: &mut [RankedClaim]) {
    claims.sort_by(|a, b| b.ranking_score().total_cmp(&a.ranking_score()));
}

/// Picks the final claim list for one video.
#[derive(Debug, Clone)]
pub struct RepresentativeSelector {
    budget: usize,
    duration_minutes: f64,
    config: SelectionConfig,
}

impl RepresentativeSelector {
    pub fn new(budget: usize, duration_minutes: f64, config: SelectionConfig) -> Self {
        Self {
            budget,
            duration_minutes,
            config,
        }
    }

    /// Whether the representative set must be reconciled against time quartiles.
    ///
    /// Always above the configured representative count; below it only when a
    /// quartile with candidates is unrepresented and the budget can hold one claim
    /// per quartile.
    fn needs_reconciliation(
        &self,
        representatives: &[RankedClaim],
        candidates: &[RankedClaim],
    ) -> bool {
        if representatives.len() > self.config.reconcile_min_representatives {
            return true;
        }
        if self.budget < QUARTILES {
            return false;
        }
        let have = quartile_counts(representatives, self.duration_minutes);
        let want = quartile_counts(candidates, self.duration_minutes);
        have.iter().zip(want.iter()).any(|(h, w)| *w > 0 && *h == 0)
    }

    /// Rebuild the selection: best candidate per non-empty quartile first, then
    /// leftover representatives, then leftover candidates, all by score.
    ///
    /// `candidates` must be in ranked order.
    pub fn reconcile(
        &self,
        representatives: &[RankedClaim],
        candidates: &[RankedClaim],
    ) -> Vec<RankedClaim> {
        let mut chosen: Vec<RankedClaim> = Vec::with_capacity(self.budget);
        let mut chosen_ids: HashSet<String> = HashSet::new();

        for quartile in 0..QUARTILES {
            if chosen.len() >= self.budget {
                break;
            }
            let best = candidates
                .iter()
                .find(|c| quartile_of(c.timestamp(), self.duration_minutes) == quartile);
            if let Some(best) = best {
                if chosen_ids.insert(best.global_id().to_string()) {
                    chosen.push(best.clone());
                }
            }
        }

        let mut leftover_reps: Vec<RankedClaim> = representatives.to_vec();
        sort_by_score(&mut leftover_reps);
        for claim in leftover_reps.iter().chain(candidates.iter()) {
            if chosen.len() >= self.budget {
                break;
            }
            if chosen_ids.insert(claim.global_id().to_string()) {
                chosen.push(claim.clone());
            }
        }

        sort_by_score(&mut chosen);
        chosen
    }

    /// Select representatives from `clustering` and reconcile them with time coverage.
    ///
    /// `ranked` is the full candidate list in ranked order.
    pub fn select(&self, clustering: &ClusteringResult, ranked: &[RankedClaim]) -> SelectionResult {
        if self.budget == 0 || ranked.is_empty() {
            return SelectionResult {
                final_claims: Vec::new(),
                representatives: 0,
                reconciled: false,
            };
        }

        let mut representatives = select_representatives(clustering, self.budget);
        sort_by_score(&mut representatives);
        let representative_count = representatives.len();

        // Candidates carry their cluster annotations, in the original ranked order
        let annotated: HashMap<&str, &RankedClaim> = clustering
            .clusters
            .iter()
            .flat_map(|c| c.members.iter())
            .map(|m| (m.global_id(), m))
            .collect();
        let candidates: Vec<RankedClaim> = ranked
            .iter()
            .map(|r| annotated.get(r.global_id()).map_or_else(|| r.clone(), |m| (*m).clone()))
            .collect();

        let reconciled = self.needs_reconciliation(&representatives, &candidates);
        let final_claims = if reconciled {
            let before = quartile_counts(&representatives, self.duration_minutes);
            let claims = self.reconcile(&representatives, &candidates);
            debug!(
                ?before,
                after = ?quartile_counts(&claims, self.duration_minutes),
                "Temporal reconciliation"
            );
            claims
        } else {
            representatives
        };

        info!(
            representatives = representative_count,
            selected = final_claims.len(),
            budget = self.budget,
            reconciled,
            "Selected claims"
        );

        SelectionResult {
            final_claims,
            representatives: representative_count,
            reconciled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClusteringConfig;
    use crate::models::{Claim, ScoreBreakdown, SourceType};
    use crate::services::clustering::{ClusterEngine, KeywordBucketStrategy};

    fn ranked(id: usize, timestamp: &str, score: f64) -> RankedClaim {
        let claim = Claim {
            claim_text: format!("Claim number {id} about the product"),
            timestamp: timestamp.to_string(),
            speaker: "Unknown".to_string(),
            initial_assessment: "Requires verification".to_string(),
            source_type: SourceType::VideoAnalysis,
            source_priority: 3,
            global_id: format!("video_{id}"),
        };
        RankedClaim::new(
            claim,
            ScoreBreakdown {
                source_priority: score,
                ..Default::default()
            },
        )
    }

    fn ranked_pool(specs: &[(&str, f64)]) -> Vec<RankedClaim> {
        let mut pool: Vec<RankedClaim> = specs
            .iter()
            .enumerate()
            .map(|(i, (ts, score))| ranked(i, ts, *score))
            .collect();
        sort_by_score(&mut pool);
        pool
    }

    fn singleton_clusters(pool: &[RankedClaim]) -> ClusteringResult {
        ClusterEngine::with_strategy(Box::new(KeywordBucketStrategy), &ClusteringConfig::default())
            .cluster(pool, pool.len())
    }

    #[test]
    fn test_quartile_counts() {
        // Quartile boundaries in a 10 minute video fall at 02:30, 05:00 and 07:30
        let pool = ranked_pool(&[
            ("00:10", 1.0),
            ("02:29", 1.0),
            ("02:30", 1.0),
            ("05:00", 1.0),
            ("09:00", 1.0),
        ]);
        assert_eq!(quartile_counts(&pool, 10.0), [2, 1, 1, 1]);
    }

    #[test]
    fn test_reconcile_covers_every_quartile() {
        // Early claims dominate the scores; one late claim per quartile scores low
        let mut specs: Vec<(&str, f64)> = vec![("00:30", 90.0); 8];
        specs.push(("16:00", 10.0));
        specs.push(("31:00", 9.0));
        specs.push(("50:00", 8.0));
        let pool = ranked_pool(&specs);
        let selector = RepresentativeSelector::new(6, 60.0, SelectionConfig::default());
        let reps: Vec<RankedClaim> = pool.iter().take(6).cloned().collect();
        let chosen = selector.reconcile(&reps, &pool);
        assert_eq!(chosen.len(), 6);
        assert_eq!(quartile_counts(&chosen, 60.0), [3, 1, 1, 1]);
    }

    #[test]
    fn test_select_within_budget_returns_everything() {
        let pool = ranked_pool(&[("00:10", 5.0), ("04:00", 7.0), ("08:00", 6.0)]);
        let clustering = singleton_clusters(&pool);
        let selector = RepresentativeSelector::new(20, 10.0, SelectionConfig::default());
        let result = selector.select(&clustering, &pool);
        assert_eq!(result.final_claims.len(), 3);
        let scores: Vec<f64> = result.final_claims.iter().map(|c| c.ranking_score()).collect();
        assert_eq!(scores, vec![7.0, 6.0, 5.0]);
        assert!(result.final_claims.iter().all(|c| c.cluster_size() == Some(1)));
    }

    #[test]
    fn test_small_budget_without_gaps_is_not_reconciled() {
        let pool = ranked_pool(&[("00:10", 5.0), ("03:00", 7.0), ("06:00", 6.0), ("09:00", 4.0)]);
        let clustering = singleton_clusters(&pool);
        let selector = RepresentativeSelector::new(4, 10.0, SelectionConfig::default());
        let result = selector.select(&clustering, &pool);
        assert!(!result.reconciled);
        assert_eq!(result.final_claims.len(), 4);
    }

    #[test]
    fn test_budget_respected_when_reconciling() {
        let specs: Vec<(&str, f64)> = (0..12)
            .map(|i| (["01:00", "20:00", "35:00", "55:00"][i % 4], 100.0 - i as f64))
            .collect();
        let pool = ranked_pool(&specs);
        let clustering = singleton_clusters(&pool);
        let selector = RepresentativeSelector::new(7, 60.0, SelectionConfig::default());
        let result = selector.select(&clustering, &pool);
        assert!(result.reconciled);
        assert_eq!(result.final_claims.len(), 7);
        assert!(quartile_counts(&result.final_claims, 60.0).iter().all(|&c| c >= 1));
    }

    #[test]
    fn test_zero_budget() {
        let pool = ranked_pool(&[("00:10", 5.0)]);
        let clustering = singleton_clusters(&pool);
        let selector = RepresentativeSelector::new(0, 10.0, SelectionConfig::default());
        assert!(selector.select(&clustering, &pool).final_claims.is_empty());
    }
}
