pub mod budget;
pub mod clustering;
pub mod fusion;
pub mod integrate;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod selection;
pub mod vectorize;

pub use budget::calculate_max_claims;
#[cfg(feature = "kmeans")]
pub use clustering::KMeansStrategy;
pub use clustering::{
    ClaimCluster, ClusterEngine, ClusterStrategy, ClusteringResult, KeywordBucketStrategy,
};
pub use fusion::{fuse_segments, FusedResponse, FusionStats, SegmentExtraction};
pub use integrate::integrate_sources;
pub use normalize::{normalize_claim, normalize_claims, NormalizeResult};
pub use pipeline::{ClaimPipeline, PipelineRun};
pub use report::{write_reports, ReportPaths};
pub use scoring::RelevanceScorer;
pub use selection::{RepresentativeSelector, SelectionResult};
pub use vectorize::{TfidfMatrix, TfidfVectorizer};
