pub mod builders;

// Re-export commonly used test utilities
pub use builders::{keyword_pipeline, segment, spread_claims, RawClaimBuilder};
