//! Claim lifecycle types.
//!
//! A claim moves through four shapes, each produced by exactly one stage:
//!
//! - [`RawClaim`]: whatever the upstream extractor emitted (string or loose object)
//! - [`CandidateClaim`]: normalized text with optional metadata
//! - [`Claim`]: integrated, with provenance and a unique `global_id`
//! - [`RankedClaim`]: scored; the score is fixed at construction

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Source types
// ============================================================================

/// The channel that produced a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Primary multimodal analysis of the video itself.
    VideoAnalysis,
    /// Counter-narrative search results.
    YoutubeCounter,
    /// Auxiliary text sources such as press releases.
    PressRelease,
}

impl SourceType {
    /// Integration order.
    pub const ALL: [SourceType; 3] = [
        SourceType::VideoAnalysis,
        SourceType::YoutubeCounter,
        SourceType::PressRelease,
    ];

    /// Trust weight of the extraction channel (not of the claim's truth).
    pub fn priority(self) -> u8 {
        match self {
            SourceType::VideoAnalysis => 3,
            SourceType::YoutubeCounter => 2,
            SourceType::PressRelease => 1,
        }
    }

    /// Prefix used in `global_id`.
    pub fn short_name(self) -> &'static str {
        match self {
            SourceType::VideoAnalysis => "video",
            SourceType::YoutubeCounter => "counter",
            SourceType::PressRelease => "press",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::VideoAnalysis => "video_analysis",
            SourceType::YoutubeCounter => "youtube_counter",
            SourceType::PressRelease => "press_release",
        }
    }

    pub fn default_speaker(self) -> &'static str {
        match self {
            SourceType::VideoAnalysis => "Unknown",
            SourceType::YoutubeCounter => "Counter-Intelligence Source",
            SourceType::PressRelease => "Press Release",
        }
    }

    pub fn default_assessment(self) -> &'static str {
        match self {
            SourceType::VideoAnalysis => "Requires verification",
            SourceType::YoutubeCounter => "Counter-narrative claim, requires verification",
            SourceType::PressRelease => "Official statement, requires verification",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "video_analysis" | "video" => Ok(SourceType::VideoAnalysis),
            "youtube_counter" | "counter" => Ok(SourceType::YoutubeCounter),
            "press_release" | "press" => Ok(SourceType::PressRelease),
            other => Err(format!("Unknown source type: {}", other)),
        }
    }
}

// ============================================================================
// Raw and candidate claims
// ============================================================================

/// A claim record as emitted upstream: a bare string or a loosely keyed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawClaim {
    Text(String),
    Record(Map<String, Value>),
}

impl RawClaim {
    /// Build a record from `(key, value)` string pairs.
    pub fn record<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        RawClaim::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect(),
        )
    }

    /// First non-empty string value among `keys`, in priority order.
    ///
    /// Bare strings carry no fields.
    pub fn field(&self, keys: &[&str]) -> Option<String> {
        match self {
            RawClaim::Text(_) => None,
            RawClaim::Record(map) => keys.iter().find_map(|key| {
                match map.get(*key)? {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                }
                .filter(|s| !s.is_empty())
            }),
        }
    }
}

impl From<&str> for RawClaim {
    fn from(text: &str) -> Self {
        RawClaim::Text(text.to_string())
    }
}

/// A normalized claim that has not yet been assigned provenance.
///
/// Metadata stays optional so the integrator can backfill source-specific defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateClaim {
    pub claim_text: String,
    pub timestamp: Option<String>,
    pub speaker: Option<String>,
    pub initial_assessment: Option<String>,
}

impl CandidateClaim {
    pub fn new(claim_text: impl Into<String>) -> Self {
        Self {
            claim_text: claim_text.into(),
            timestamp: None,
            speaker: None,
            initial_assessment: None,
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
        self.initial_assessment = Some(assessment.into());
        self
    }
}

/// Ordered candidates contributed by exactly one source within one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimSet {
    source: SourceType,
    claims: Vec<CandidateClaim>,
}

impl ClaimSet {
    pub fn new(source: SourceType, claims: Vec<CandidateClaim>) -> Self {
        Self { source, claims }
    }

    pub fn source(&self) -> SourceType {
        self.source
    }

    pub fn claims(&self) -> &[CandidateClaim] {
        &self.claims
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

// ============================================================================
// Integrated and ranked claims
// ============================================================================

/// A claim with provenance and a run-unique identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_text: String,
    pub timestamp: String,
    pub speaker: String,
    pub initial_assessment: String,
    pub source_type: SourceType,
    pub source_priority: u8,
    pub global_id: String,
}

/// Per-factor contributions to a claim's ranking score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub source_priority: f64,
    pub temporal_position: f64,
    pub content_signals: f64,
    pub speaker_authority: f64,
    pub assessment_severity: f64,
    pub complexity: f64,
    pub uniqueness: f64,
}

impl ScoreBreakdown {
    /// Factor name and contribution pairs, in a stable order.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("source_priority", self.source_priority),
            ("temporal_position", self.temporal_position),
            ("content_signals", self.content_signals),
            ("speaker_authority", self.speaker_authority),
            ("assessment_severity", self.assessment_severity),
            ("complexity", self.complexity),
            ("uniqueness", self.uniqueness),
        ]
    }

    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, v)| v).sum()
    }
}

/// A scored claim. `ranking_score` always equals the breakdown total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedClaim {
    #[serde(flatten)]
    claim: Claim,
    ranking_score: f64,
    scoring_breakdown: ScoreBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_id: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_size: Option<usize>,
}

impl RankedClaim {
    pub fn new(claim: Claim, breakdown: ScoreBreakdown) -> Self {
        Self {
            claim,
            ranking_score: breakdown.total(),
            scoring_breakdown: breakdown,
            cluster_id: None,
            cluster_size: None,
        }
    }

    /// Annotate with cluster membership.
    pub fn with_cluster(mut self, cluster_id: usize, cluster_size: usize) -> Self {
        self.cluster_id = Some(cluster_id);
        self.cluster_size = Some(cluster_size);
        self
    }

    pub fn claim(&self) -> &Claim {
        &self.claim
    }

    pub fn global_id(&self) -> &str {
        &self.claim.global_id
    }

    pub fn claim_text(&self) -> &str {
        &self.claim.claim_text
    }

    pub fn timestamp(&self) -> &str {
        &self.claim.timestamp
    }

    pub fn ranking_score(&self) -> f64 {
        self.ranking_score
    }

    pub fn scoring_breakdown(&self) -> &ScoreBreakdown {
        &self.scoring_breakdown
    }

    pub fn cluster_id(&self) -> Option<usize> {
        self.cluster_id
    }

    pub fn cluster_size(&self) -> Option<usize> {
        self.cluster_size
    }
}
