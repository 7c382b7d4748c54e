pub mod claim;
pub mod report;

pub use claim::{CandidateClaim, Claim, ClaimSet, RankedClaim, RawClaim, ScoreBreakdown, SourceType};
pub use report::{ClusterSummary, ProcessingReport, ScoreStats};
