//! Relevance scoring.
//!
//! Each claim's score is the sum of seven independent, pure string-pattern factors:
//!
//! | factor              | range | basis                                        |
//! |---------------------|-------|----------------------------------------------|
//! | source_priority     | 10-30 | source priority x 10                         |
//! | temporal_position   | 8-18  | time quartile, later quartiles score higher  |
//! | content_signals     | 0-71  | keyword classes and quantitative patterns    |
//! | speaker_authority   | 3-15  | tiered match on the speaker                  |
//! | assessment_severity | 5-15  | tiered match on the initial assessment       |
//! | complexity          | 2-15  | length and sentence count                    |
//! | uniqueness          | 0-13  | years, proper names, currency amounts        |
//!
//! Later quartiles are boosted because extractors over-sample the opening minutes.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{Claim, RankedClaim, ScoreBreakdown};
use crate::utils::text::contains_any;
use crate::utils::timestamp::quartile_of;

const QUARTILE_SCORES: [f64; 4] = [8.0, 12.0, 15.0, 18.0];

const RESEARCH_TERMS: &[&str] = &[
    "study",
    "studies",
    "research",
    "researcher",
    "clinical",
    "trial",
    "peer-reviewed",
    "scientific",
    "journal",
    "published",
    "experiment",
    "placebo",
];
const AUTHORITY_TERMS: &[&str] = &[
    "fda",
    "cdc",
    "nih",
    "harvard",
    "stanford",
    "university",
    "government",
    "approved",
    "certified",
    "endorsed",
    "doctor",
    "official",
];
const HEALTH_TERMS: &[&str] = &[
    "health",
    "disease",
    "cure",
    "cancer",
    "diabetes",
    "heart",
    "blood",
    "immune",
    "weight",
    "fat",
    "metabolism",
    "symptom",
    "treatment",
    "medication",
    "vitamin",
];
const COMMERCIAL_TERMS: &[&str] = &[
    "product",
    "supplement",
    "buy",
    "price",
    "discount",
    "offer",
    "order now",
    "brand",
    "formula",
    "guarantee",
    "money-back",
];
const SECRECY_TERMS: &[&str] = &[
    "secret",
    "hidden",
    "don't want you",
    "suppressed",
    "cover-up",
    "cover up",
    "big pharma",
    "banned",
    "conspiracy",
    "exposed",
];

const HIGH_SEVERITY_TERMS: &[&str] = &[
    "fabricated",
    "false",
    "fake",
    "misleading",
    "debunked",
    "fraud",
    "scam",
    "dangerous",
];
const VERIFY_TERMS: &[&str] = &[
    "requires verification",
    "verif",
    "unproven",
    "questionable",
    "dubious",
    "unsubstantiated",
];

/// Defaults assigned by the integrator; they say nothing about the speaker.
const UNSPECIFIED_SPEAKERS: &[&str] = &[
    "unknown",
    "unspecified",
    "counter-intelligence source",
    "press release",
];

static QUANTITATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+(?:\.\d+)?\s*(?:%|percent\b)|[$€£]\s?\d|\b\d[\d,]*(?:\.\d+)?\s*(?:dollars|usd|euros?|mg|kg|lbs|pounds)\b")
        .expect("valid quantitative regex")
});
static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[$€£]\s?\d[\d,]*(?:\.\d+)?|\b\d[\d,]*(?:\.\d+)?\s*(?:dollars|usd|euros?)\b")
        .expect("valid currency regex")
});
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:1[89]\d{2}|20\d{2})\b").expect("valid year regex"));
static PROPER_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+\s+[A-Z][a-z]+\b").expect("valid name regex"));
static SPEAKER_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-zA-Z'\-]+)+$").expect("valid speaker name regex")
});
static TITLED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:dr|doctor|prof|professor|md|phd|ph\.d|physician|surgeon|scientist|researcher)\b")
        .expect("valid titled regex")
});
static EXPERT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:expert|specialist|nutritionist|dietitian|pharmacist|author|founder|ceo|official|spokesperson|analyst)\b")
        .expect("valid expert regex")
});
static HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:host|presenter|narrator|anchor|interviewer|youtuber|creator|influencer)\b")
        .expect("valid host regex")
});
static TESTIMONIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:customer|user|reviewer|testimonial|patient|viewer|buyer|client)s?\b")
        .expect("valid testimonial regex")
});

/// Whole-word, case-insensitive alternation over `terms`, allowing a plural suffix.
fn term_class(terms: &[&str]) -> Regex {
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})(?:s|es)?\b")).expect("valid term class regex")
}

static RESEARCH_RE: LazyLock<Regex> = LazyLock::new(|| term_class(RESEARCH_TERMS));
static AUTHORITY_RE: LazyLock<Regex> = LazyLock::new(|| term_class(AUTHORITY_TERMS));
static HEALTH_RE: LazyLock<Regex> = LazyLock::new(|| term_class(HEALTH_TERMS));
static COMMERCIAL_RE: LazyLock<Regex> = LazyLock::new(|| term_class(COMMERCIAL_TERMS));
static SECRECY_RE: LazyLock<Regex> = LazyLock::new(|| term_class(SECRECY_TERMS));

pub fn source_priority_score(claim: &Claim) -> f64 {
    f64::from(claim.source_priority) * 10.0
}

pub fn temporal_score(timestamp: &str, duration_minutes: f64) -> f64 {
    QUARTILE_SCORES[quartile_of(timestamp, duration_minutes)]
}

pub fn content_signal_score(text: &str) -> f64 {
    let mut score = 0.0;
    if RESEARCH_RE.is_match(text) {
        score += 20.0;
    }
    if AUTHORITY_RE.is_match(text) {
        score += 15.0;
    }
    if QUANTITATIVE_RE.is_match(text) {
        score += 12.0;
    }
    if HEALTH_RE.is_match(text) {
        score += 10.0;
    }
    if COMMERCIAL_RE.is_match(text) {
        score += 8.0;
    }
    if SECRECY_RE.is_match(text) {
        score += 6.0;
    }
    score
}

/// Titled professional > named expert > host > testimonial > unspecified.
pub fn speaker_authority_score(speaker: &str) -> f64 {
    let trimmed = speaker.trim();
    if trimmed.is_empty() || UNSPECIFIED_SPEAKERS.contains(&trimmed.to_lowercase().as_str()) {
        return 3.0;
    }
    if TITLED_RE.is_match(trimmed) {
        15.0
    } else if EXPERT_RE.is_match(trimmed) {
        12.0
    } else if HOST_RE.is_match(trimmed) {
        8.0
    } else if TESTIMONIAL_RE.is_match(trimmed) {
        5.0
    } else if SPEAKER_NAME_RE.is_match(trimmed) {
        12.0
    } else {
        3.0
    }
}

pub fn assessment_severity_score(assessment: &str) -> f64 {
    let lowered = assessment.to_lowercase();
    if contains_any(&lowered, HIGH_SEVERITY_TERMS) {
        15.0
    } else if contains_any(&lowered, VERIFY_TERMS) {
        10.0
    } else {
        5.0
    }
}

pub fn complexity_score(text: &str) -> f64 {
    let length = text.chars().count();
    let length_points = match length {
        l if l > 200 => 9.0,
        l if l > 120 => 7.0,
        l if l > 60 => 5.0,
        _ => 2.0,
    };

    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| s.chars().any(char::is_alphabetic))
        .count();
    let sentence_points = match sentences {
        s if s >= 3 => 6.0,
        2 => 3.0,
        _ => 0.0,
    };

    length_points + sentence_points
}

pub fn uniqueness_score(text: &str) -> f64 {
    let mut score = 0.0;
    if YEAR_RE.is_match(text) {
        score += 5.0;
    }
    if PROPER_NAME_RE.is_match(text) {
        score += 4.0;
    }
    if CURRENCY_RE.is_match(text) {
        score += 4.0;
    }
    score
}

/// Scores claims against the timeline of one video.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceScorer {
    duration_minutes: f64,
}

impl RelevanceScorer {
    pub fn new(duration_minutes: f64) -> Self {
        Self { duration_minutes }
    }

    pub fn breakdown(&self, claim: &Claim) -> ScoreBreakdown {
        ScoreBreakdown {
            source_priority: source_priority_score(claim),
            temporal_position: temporal_score(&claim.timestamp, self.duration_minutes),
            content_signals: content_signal_score(&claim.claim_text),
            speaker_authority: speaker_authority_score(&claim.speaker),
            assessment_severity: assessment_severity_score(&claim.initial_assessment),
            complexity: complexity_score(&claim.claim_text),
            uniqueness: uniqueness_score(&claim.claim_text),
        }
    }

    pub fn score(&self, claim: Claim) -> RankedClaim {
        let breakdown = self.breakdown(&claim);
        RankedClaim::new(claim, breakdown)
    }

    /// Score every claim and sort by score descending. Ties keep input order.
    pub fn rank(&self, claims: Vec<Claim>) -> Vec<RankedClaim> {
        let mut ranked: Vec<RankedClaim> = claims.into_iter().map(|c| self.score(c)).collect();
        ranked.sort_by(|a, b| b.ranking_score().total_cmp(&a.ranking_score()));
        if let (Some(top), Some(bottom)) = (ranked.first(), ranked.last()) {
            debug!(
                claims = ranked.len(),
                top = top.ranking_score(),
                bottom = bottom.ranking_score(),
                "Ranked claims"
            );
        }
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceType;

    fn claim(text: &str, timestamp: &str, speaker: &str, assessment: &str) -> Claim {
        Claim {
            claim_text: text.to_string(),
            timestamp: timestamp.to_string(),
            speaker: speaker.to_string(),
            initial_assessment: assessment.to_string(),
            source_type: SourceType::VideoAnalysis,
            source_priority: 3,
            global_id: "video_0".to_string(),
        }
    }

    #[test]
    fn test_temporal_quartile_scores() {
        assert_eq!(temporal_score("00:30", 40.0), 8.0);
        assert_eq!(temporal_score("12:00", 40.0), 12.0);
        assert_eq!(temporal_score("25:00", 40.0), 15.0);
        assert_eq!(temporal_score("39:00", 40.0), 18.0);
    }

    #[test]
    fn test_content_signals_are_additive() {
        assert_eq!(content_signal_score("The sky is blue"), 0.0);
        // research + quantitative + health
        assert_eq!(
            content_signal_score("A clinical study showed 80% less belly fat"),
            42.0
        );
        // every class at once
        assert_eq!(
            content_signal_score(
                "Secret FDA research: this supplement cures diabetes for $39"
            ),
            71.0
        );
    }

    #[test]
    fn test_content_signals_match_whole_words() {
        assert_eq!(content_signal_score("My father felt secure"), 0.0);
        assert_eq!(content_signal_score("They annihilate the competition"), 0.0);
        // plurals still count
        assert_eq!(content_signal_score("Doctors recommend these supplements"), 23.0);
        assert_eq!(content_signal_score("Researchers found hidden fats"), 36.0);
    }

    #[test]
    fn test_speaker_tiers() {
        assert_eq!(speaker_authority_score("Dr. Jane Smith"), 15.0);
        assert_eq!(speaker_authority_score("Nutrition expert"), 12.0);
        assert_eq!(speaker_authority_score("Mark Hyman"), 12.0);
        assert_eq!(speaker_authority_score("Channel host"), 8.0);
        assert_eq!(speaker_authority_score("Satisfied customer"), 5.0);
        assert_eq!(speaker_authority_score("Unknown"), 3.0);
        assert_eq!(speaker_authority_score("Press Release"), 3.0);
        assert_eq!(speaker_authority_score("voice over"), 3.0);
    }

    #[test]
    fn test_assessment_tiers() {
        assert_eq!(assessment_severity_score("Likely fabricated testimonial"), 15.0);
        assert_eq!(assessment_severity_score("Requires verification"), 10.0);
        assert_eq!(assessment_severity_score("Plausible but hedged"), 5.0);
    }

    #[test]
    fn test_complexity_bounds() {
        assert_eq!(complexity_score("Short claim"), 2.0);
        let long = format!("{}. Second sentence here. Third one!", "word ".repeat(45));
        assert_eq!(complexity_score(&long), 15.0);
    }

    #[test]
    fn test_uniqueness_signals() {
        assert_eq!(uniqueness_score("nothing special here"), 0.0);
        assert_eq!(
            uniqueness_score("In 2019 John Carter paid $5,000 for the patent"),
            13.0
        );
    }

    #[test]
    fn test_score_equals_breakdown_sum() {
        let scorer = RelevanceScorer::new(30.0);
        let ranked = scorer.score(claim(
            "Harvard researchers proved in 2015 that this tea burns 30% more fat",
            "20:00",
            "Dr. Lee",
            "Likely misleading",
        ));
        let sum: f64 = ranked
            .scoring_breakdown()
            .entries()
            .iter()
            .map(|(_, v)| v)
            .sum();
        assert_eq!(ranked.ranking_score(), sum);
    }

    #[test]
    fn test_rank_is_descending_and_stable() {
        let scorer = RelevanceScorer::new(10.0);
        let mut first = claim("A plain claim without signals", "00:10", "Unknown", "ok");
        first.global_id = "video_0".to_string();
        let mut second = first.clone();
        second.global_id = "video_1".to_string();
        let mut strong = claim(
            "Clinical trial data shows 90% cure rate",
            "09:00",
            "Dr. Who",
            "False",
        );
        strong.global_id = "video_2".to_string();

        let ranked = scorer.rank(vec![first, second, strong]);
        let ids: Vec<&str> = ranked.iter().map(|r| r.global_id()).collect();
        assert_eq!(ids, vec!["video_2", "video_0", "video_1"]);
    }
}
