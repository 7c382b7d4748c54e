//! Test data builders for claim construction.
//!
//! Provides fluent API for creating raw claim records with sensible defaults.

#![allow(dead_code)]

use serde_json::{Map, Value};
use verisift::config::{ClusteringConfig, PipelineConfig};
use verisift::models::RawClaim;
use verisift::services::clustering::{ClusterEngine, KeywordBucketStrategy};
use verisift::services::fusion::SegmentExtraction;
use verisift::services::pipeline::ClaimPipeline;

/// Builder for raw claim records as an extractor would emit them.
pub struct RawClaimBuilder {
    text: String,
    timestamp: Option<String>,
    speaker: Option<String>,
    assessment: Option<String>,
}

impl RawClaimBuilder {
    /// Create a new builder with the given claim text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: None,
            speaker: None,
            assessment: None,
        }
    }

    pub fn at(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn by(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    pub fn assessed(mut self, assessment: impl Into<String>) -> Self {
        self.assessment = Some(assessment.into());
        self
    }

    /// Build the record.
    pub fn build(self) -> RawClaim {
        let mut map = Map::new();
        map.insert("claim_text".to_string(), Value::String(self.text));
        if let Some(ts) = self.timestamp {
            map.insert("timestamp".to_string(), Value::String(ts));
        }
        if let Some(speaker) = self.speaker {
            map.insert("speaker".to_string(), Value::String(speaker));
        }
        if let Some(assessment) = self.assessment {
            map.insert("initial_assessment".to_string(), Value::String(assessment));
        }
        RawClaim::Record(map)
    }
}

/// A segment whose claims are bare strings.
pub fn segment(report: &str, claims: &[&str]) -> SegmentExtraction {
    SegmentExtraction::new(report, claims.iter().map(|c| RawClaim::from(*c)).collect())
}

const SUBJECTS: &[&str] = &[
    "green tea extract",
    "the keto pill",
    "apple cider vinegar",
    "the detox cleanse",
    "collagen powder",
    "the vaccine booster",
    "raw milk",
    "the miracle serum",
];

const PREDICATES: &[&str] = &[
    "burns belly fat while you sleep",
    "was approved by the FDA last year",
    "cures type 2 diabetes in weeks",
    "doubles your metabolism overnight",
    "is banned in Europe for hidden side effects",
    "costs $49 but saves thousands in doctor bills",
];

/// `count` distinct-looking claims spread evenly over a video of `duration_minutes`.
pub fn spread_claims(count: usize, duration_minutes: f64) -> Vec<RawClaim> {
    let total_seconds = (duration_minutes * 60.0) as usize;
    (0..count)
        .map(|i| {
            let subject = SUBJECTS[i % SUBJECTS.len()];
            let predicate = PREDICATES[(i / SUBJECTS.len()) % PREDICATES.len()];
            let seconds = total_seconds * i / count;
            RawClaimBuilder::new(format!("Claim {}: {} {}", i, subject, predicate))
                .at(format!("{:02}:{:02}", seconds / 60, seconds % 60))
                .by(if i % 3 == 0 { "Dr. Mark Hyman" } else { "Host" })
                .build()
        })
        .collect()
}

/// A pipeline that clusters with keyword buckets only.
pub fn keyword_pipeline(video_id: &str, duration_minutes: f64, config: PipelineConfig) -> ClaimPipeline {
    let engine =
        ClusterEngine::with_strategy(Box::new(KeywordBucketStrategy), &ClusteringConfig::default());
    ClaimPipeline::new(video_id, duration_minutes, config).with_cluster_engine(engine)
}
