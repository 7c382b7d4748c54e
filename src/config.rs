//! Pipeline configuration and loading.
//!
//! Every tunable threshold of the pipeline lives in [`PipelineConfig`], which is
//! passed by value into [`crate::services::pipeline::ClaimPipeline::new`]. There is
//! no process-wide config cache.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::SiftError;

/// Top-level pipeline configuration.
///
/// Loaded from `{data_path}/verisift.toml`, the `VERISIFT_CONFIG` env var (JSON),
/// or defaults. Missing fields always fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Target claims per minute of video.
    pub claims_per_minute: f64,
    /// Lower bound of the duration-derived budget.
    pub min_claims: usize,
    /// Replaces the duration-derived budget outright when set.
    pub max_claims_override: Option<usize>,
    pub dedup: DedupConfig,
    pub normalize: NormalizeConfig,
    pub clustering: ClusteringConfig,
    pub selection: SelectionConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            claims_per_minute: 1.0,
            min_claims: 20,
            max_claims_override: None,
            dedup: DedupConfig::default(),
            normalize: NormalizeConfig::default(),
            clustering: ClusteringConfig::default(),
            selection: SelectionConfig::default(),
        }
    }
}

/// Response fuser thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Per-segment claim ceiling; longer segments are treated as runaway output.
    pub segment_claim_ceiling: usize,
    /// How many leading claims are inspected for a repetition loop.
    pub repetition_window: usize,
    /// Copies of the first claim inside the window that mark a repetition loop.
    pub repetition_threshold: usize,
    /// Token overlap (fraction of the shorter text) above which two claims are duplicates.
    pub near_duplicate_overlap: f64,
    /// Texts this short or shorter skip near-duplicate matching.
    pub near_duplicate_min_chars: usize,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            segment_claim_ceiling: 50,
            repetition_window: 10,
            repetition_threshold: 3,
            near_duplicate_overlap: 0.8,
            near_duplicate_min_chars: 10,
        }
    }
}

/// Candidate normalizer bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub min_claim_chars: usize,
    pub max_claim_chars: usize,
    pub max_speaker_chars: usize,
    pub max_assessment_chars: usize,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            min_claim_chars: 15,
            max_claim_chars: 300,
            max_speaker_chars: 50,
            max_assessment_chars: 200,
        }
    }
}

/// Vectorization and K-means parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Seed for K-means initialization.
    pub seed: u64,
    /// Lower bound on the number of clusters.
    pub min_clusters: usize,
    /// Vocabulary size cap, keeping the most frequent terms.
    pub max_features: usize,
    /// Terms must appear in at least this many documents.
    pub min_df: usize,
    /// Terms appearing in more than this fraction of documents are dropped.
    pub max_df: f64,
    pub max_iterations: u64,
    pub tolerance: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            min_clusters: 5,
            max_features: 100,
            min_df: 2,
            max_df: 0.8,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }
}

/// Representative selection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Temporal reconciliation always runs above this many representatives.
    pub reconcile_min_representatives: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            reconcile_min_representatives: 5,
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document into a config.
    pub fn from_toml_str(contents: &str) -> Result<Self, SiftError> {
        Ok(toml::from_str(contents)?)
    }

    /// Read a config file, failing loudly. Used for an explicit `--config` path.
    pub fn from_file(path: &Path) -> Result<Self, SiftError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SiftError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Load pipeline config with priority:
/// 1. `{data_path}/verisift.toml` file
/// 2. `VERISIFT_CONFIG` env var (JSON)
/// 3. Default
pub fn load_pipeline_config(data_path: &Path) -> PipelineConfig {
    let config_path = data_path.join("verisift.toml");
    if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match PipelineConfig::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded pipeline config from {}", config_path.display());
                    return config;
                }
                Err(e) => {
                    warn!(
                        "Failed to parse {}: {}. Using default.",
                        config_path.display(),
                        e
                    );
                }
            },
            Err(e) => {
                warn!(
                    "Failed to read {}: {}. Using default.",
                    config_path.display(),
                    e
                );
            }
        }
    }

    if let Ok(json) = std::env::var("VERISIFT_CONFIG") {
        match serde_json::from_str::<PipelineConfig>(&json) {
            Ok(config) => {
                info!("Loaded pipeline config from VERISIFT_CONFIG env");
                return config;
            }
            Err(e) => {
                warn!("Failed to parse VERISIFT_CONFIG: {}. Using default.", e);
            }
        }
    }

    PipelineConfig::default()
}

/// Resolve the data directory.
///
/// Priority: explicit path > ./.verisift (if exists) > ~/.verisift
pub fn resolve_data_path(explicit_path: Option<PathBuf>) -> PathBuf {
    explicit_path
        .or_else(|| {
            let local_path = Path::new(".verisift");
            if local_path.is_dir() {
                Some(local_path.to_path_buf())
            } else {
                None
            }
        })
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".verisift"))
                .unwrap_or_else(|| PathBuf::from(".verisift"))
        })
}
