//! Topical clustering of ranked claims.
//!
//! Groups claims by topic so a single heavily discussed subject cannot take over
//! the whole verification budget. The primary strategy vectorizes claim texts with
//! TF-IDF and partitions them with seeded K-means; when that capability is compiled
//! out, or the vocabulary collapses, claims are bucketed by topic keywords instead.

#[cfg(feature = "kmeans")]
use linfa::prelude::*;
#[cfg(feature = "kmeans")]
use linfa_clustering::KMeans;
#[cfg(feature = "kmeans")]
use ndarray::{Array1, Array2};
#[cfg(feature = "kmeans")]
use rand_xoshiro::rand_core::SeedableRng;
#[cfg(feature = "kmeans")]
use rand_xoshiro::Xoshiro256Plus;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::config::ClusteringConfig;
use crate::models::RankedClaim;
#[cfg(feature = "kmeans")]
use crate::services::vectorize::TfidfVectorizer;
use crate::utils::math::mean;
use crate::utils::text::contains_any;
use crate::SiftError;

/// A group of topically similar claims. Never empty.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimCluster {
    pub cluster_id: usize,
    pub label: String,
    pub members: Vec<RankedClaim>,
}

impl ClaimCluster {
    pub fn mean_score(&self) -> f64 {
        let scores: Vec<f64> = self.members.iter().map(|m| m.ranking_score()).collect();
        mean(&scores)
    }

    /// Highest-scoring member. Members keep ranked order, so this is the first.
    pub fn representative(&self) -> Option<&RankedClaim> {
        self.members
            .iter()
            .reduce(|best, m| if m.ranking_score() > best.ranking_score() { m } else { best })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of one clustering pass.
#[derive(Debug, Clone, Serialize)]
pub struct ClusteringResult {
    /// Clusters sorted by mean member score, descending.
    pub clusters: Vec<ClaimCluster>,
    /// Strategy that produced the partition (`singleton`, `kmeans`, `keyword_buckets`).
    pub strategy: String,
    pub requested_clusters: usize,
}

impl ClusteringResult {
    pub fn cluster_sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(ClaimCluster::len).collect()
    }
}

// ---------------------------------------------------------------------------
// Strategy trait
// ---------------------------------------------------------------------------

/// A partitioning capability.
///
/// Returns groups of indices into `claims`; every index appears exactly once and
/// no group is empty.
pub trait ClusterStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Partition `claims` into at most `k` groups.
    fn partition(&self, claims: &[RankedClaim], k: usize) -> Result<Vec<Vec<usize>>, SiftError>;

    /// Whether the strategy can run in this build.
    fn is_available(&self) -> bool;
}

// ---------------------------------------------------------------------------
// K-means strategy
// ---------------------------------------------------------------------------

/// TF-IDF vectors partitioned by seeded K-means.
#[cfg(feature = "kmeans")]
pub struct KMeansStrategy {
    config: ClusteringConfig,
}

#[cfg(feature = "kmeans")]
impl KMeansStrategy {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }
}

#[cfg(feature = "kmeans")]
impl ClusterStrategy for KMeansStrategy {
    fn name(&self) -> &'static str {
        "kmeans"
    }

    fn partition(&self, claims: &[RankedClaim], k: usize) -> Result<Vec<Vec<usize>>, SiftError> {
        let texts: Vec<&str> = claims.iter().map(|c| c.claim_text()).collect();
        let matrix = TfidfVectorizer::from_config(&self.config).fit_transform(&texts)?;

        let num_docs = matrix.rows.len();
        let num_dims = matrix.dimensions();
        // K-means++ cannot seed more centroids than there are distinct points
        let num_clusters = k.min(matrix.distinct_rows()).max(1);

        let mut matrix_data = Vec::with_capacity(num_docs * num_dims);
        for row in &matrix.rows {
            matrix_data.extend_from_slice(row);
        }
        let records = Array2::from_shape_vec((num_docs, num_dims), matrix_data).map_err(|e| {
            SiftError::clustering(format!("Failed to create TF-IDF matrix: {}", e))
        })?;
        let dataset = DatasetBase::new(records, Array1::from_elem(num_docs, ()));

        let rng = Xoshiro256Plus::seed_from_u64(self.config.seed);
        let model = KMeans::params_with_rng(num_clusters, rng)
            .max_n_iterations(self.config.max_iterations)
            .tolerance(self.config.tolerance)
            .fit(&dataset)
            .map_err(|e| SiftError::clustering(format!("K-means clustering failed: {}", e)))?;

        let predictions = model.predict(&dataset);
        let assignments: Vec<usize> = predictions.iter().cloned().collect();

        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (idx, label) in assignments.into_iter().enumerate() {
            groups.entry(label).or_default().push(idx);
        }
        Ok(groups.into_values().collect())
    }

    fn is_available(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Keyword bucket fallback
// ---------------------------------------------------------------------------

const BODY_TERMS: &[&str] = &[
    "weight", "fat", "body", "belly", "metabolism", "calorie", "diet", "pounds", "lbs", "slim",
];
const RESEARCH_TERMS: &[&str] = &[
    "study", "research", "clinical", "trial", "scientist", "evidence", "journal", "published",
];
const AUTHORITY_TERMS: &[&str] = &[
    "doctor", "dr.", "fda", "government", "expert", "professor", "university", "official",
];
const PRODUCT_TERMS: &[&str] = &[
    "product", "supplement", "pill", "formula", "price", "buy", "ingredient", "order",
];

/// Dependency-free partition by topic keywords.
///
/// Buckets are checked in order and a claim lands in the first that matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordBucketStrategy;

impl KeywordBucketStrategy {
    const BUCKETS: [(&'static str, &'static [&'static str]); 4] = [
        ("body_weight", BODY_TERMS),
        ("research", RESEARCH_TERMS),
        ("authority", AUTHORITY_TERMS),
        ("product", PRODUCT_TERMS),
    ];

    /// Bucket index for a text; `BUCKETS.len()` is the catch-all.
    pub fn bucket_of(text: &str) -> usize {
        let lowered = text.to_lowercase();
        Self::BUCKETS
            .iter()
            .position(|(_, terms)| contains_any(&lowered, terms))
            .unwrap_or(Self::BUCKETS.len())
    }

    pub fn bucket_label(bucket: usize) -> &'static str {
        Self::BUCKETS.get(bucket).map(|(name, _)| *name).unwrap_or("other")
    }
}

impl ClusterStrategy for KeywordBucketStrategy {
    fn name(&self) -> &'static str {
        "keyword_buckets"
    }

    fn partition(&self, claims: &[RankedClaim], _k: usize) -> Result<Vec<Vec<usize>>, SiftError> {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (idx, claim) in claims.iter().enumerate() {
            groups
                .entry(Self::bucket_of(claim.claim_text()))
                .or_default()
                .push(idx);
        }
        Ok(groups.into_values().collect())
    }

    fn is_available(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// ClusterEngine
// ---------------------------------------------------------------------------

/// Number of clusters to request: `max(budget, n / 2, min_clusters)`.
pub fn target_cluster_count(candidates: usize, budget: usize, min_clusters: usize) -> usize {
    budget.max(candidates / 2).max(min_clusters)
}

/// Runs a primary strategy with the keyword fallback behind it.
pub struct ClusterEngine {
    primary: Box<dyn ClusterStrategy>,
    fallback: KeywordBucketStrategy,
    min_clusters: usize,
}

impl ClusterEngine {
    /// Pick the best strategy this build supports.
    pub fn new(config: &ClusteringConfig) -> Self {
        #[cfg(feature = "kmeans")]
        let primary: Box<dyn ClusterStrategy> = Box::new(KMeansStrategy::new(config.clone()));
        #[cfg(not(feature = "kmeans"))]
        let primary: Box<dyn ClusterStrategy> = Box::new(KeywordBucketStrategy);

        Self::with_strategy(primary, config)
    }

    pub fn with_strategy(primary: Box<dyn ClusterStrategy>, config: &ClusteringConfig) -> Self {
        Self {
            primary,
            fallback: KeywordBucketStrategy,
            min_clusters: config.min_clusters,
        }
    }

    pub fn primary_strategy(&self) -> &'static str {
        self.primary.name()
    }

    /// Cluster ranked claims under the given budget.
    ///
    /// At or under budget every claim is its own cluster. Otherwise the primary
    /// strategy runs and any failure falls back to keyword buckets.
    pub fn cluster(&self, ranked: &[RankedClaim], budget: usize) -> ClusteringResult {
        if ranked.len() <= budget {
            info!(
                candidates = ranked.len(),
                budget, "Candidates within budget, skipping clustering"
            );
            let groups = (0..ranked.len()).map(|i| vec![i]).collect();
            return build_result(ranked, groups, "singleton", ranked.len());
        }

        let k = target_cluster_count(ranked.len(), budget, self.min_clusters).min(ranked.len());

        let outcome = if self.primary.is_available() {
            self.primary.partition(ranked, k).map(|g| (g, self.primary.name()))
        } else {
            Err(SiftError::clustering(format!(
                "{} strategy unavailable",
                self.primary.name()
            )))
        };

        let (groups, strategy) = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!("Clustering with {} failed: {}. Using keyword buckets.", self.primary.name(), e);
                let groups = self.fallback.partition(ranked, k).unwrap_or_else(|_| {
                    (0..ranked.len()).map(|i| vec![i]).collect()
                });
                (groups, self.fallback.name())
            }
        };

        let result = build_result(ranked, groups, strategy, k);
        info!(
            strategy = %result.strategy,
            requested = k,
            clusters = result.clusters.len(),
            "Clustered claims"
        );
        result
    }
}

fn build_result(
    ranked: &[RankedClaim],
    groups: Vec<Vec<usize>>,
    strategy: &str,
    requested_clusters: usize,
) -> ClusteringResult {
    let mut clusters: Vec<ClaimCluster> = groups
        .into_iter()
        .filter(|g| !g.is_empty())
        .map(|mut indices| {
            indices.sort_unstable();
            let label = if strategy == "keyword_buckets" {
                KeywordBucketStrategy::bucket_label(KeywordBucketStrategy::bucket_of(
                    ranked[indices[0]].claim_text(),
                ))
                .to_string()
            } else {
                ranked[indices[0]].global_id().to_string()
            };
            ClaimCluster {
                cluster_id: 0,
                label,
                members: indices.iter().map(|&i| ranked[i].clone()).collect(),
            }
        })
        .collect();

    clusters.sort_by(|a, b| b.mean_score().total_cmp(&a.mean_score()));

    for (cluster_id, cluster) in clusters.iter_mut().enumerate() {
        let size = cluster.members.len();
        cluster.cluster_id = cluster_id;
        cluster.members = std::mem::take(&mut cluster.members)
            .into_iter()
            .map(|m| m.with_cluster(cluster_id, size))
            .collect();
    }

    ClusteringResult {
        clusters,
        strategy: strategy.to_string(),
        requested_clusters,
    }
}
