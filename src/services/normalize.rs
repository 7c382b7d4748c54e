//! Candidate normalization.
//!
//! Converts loosely shaped [`RawClaim`] records into [`CandidateClaim`]s. Upstream
//! extractors name their fields inconsistently and sometimes leak their own schema
//! into values (`"claim_text This supplement..."`), so extraction is tolerant and
//! rejection is silent: a bad record is counted and dropped, never an error.

use serde::Serialize;
use tracing::debug;

use crate::config::NormalizeConfig;
use crate::models::{CandidateClaim, RawClaim};
use crate::utils::text::truncate_chars;
use crate::utils::timestamp::validate_timestamp;

const CLAIM_TEXT_KEYS: &[&str] = &["claim_text", "claim", "text", "statement", "content"];
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "time", "time_stamp", "start_time"];
const SPEAKER_KEYS: &[&str] = &["speaker", "speaker_name", "attributed_to", "who"];
const ASSESSMENT_KEYS: &[&str] = &[
    "initial_assessment",
    "assessment",
    "verification_status",
    "analysis",
    "notes",
];

/// Field names the extractor is known to leak as a value prefix. Longest first.
const LEAKED_FIELD_NAMES: &[&str] = &[
    "initial_assessment",
    "claim_text",
    "assessment",
    "timestamp",
    "speaker",
];

/// Meta-labels that are not claims.
const META_LABELS: &[&str] = &[
    "claim",
    "claim text",
    "no claim",
    "no assessment",
    "no claims found",
    "none",
    "n/a",
    "not applicable",
    "unknown",
    "placeholder",
    "pending verification",
    "requires verification",
    "needs verification",
    "speaker credibility claim",
    "speaker credibility",
];

/// Outcome of normalizing one batch of raw records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizeResult {
    pub accepted: Vec<CandidateClaim>,
    pub rejected: usize,
}

/// Remove a leaked leading field name (`"claim_text  ..."`, `"speaker: ..."`).
///
/// Only the exact lowercase key matches, so prose such as `"Speaker Johnson said"`
/// is left alone. Repeats while a prefix keeps matching, so doubled leaks are also
/// removed.
pub fn strip_leaked_field_prefix(value: &str) -> String {
    let mut current = value.trim();
    'outer: loop {
        for name in LEAKED_FIELD_NAMES {
            let Some(rest) = current.strip_prefix(name) else {
                continue;
            };
            let rest = rest.strip_prefix(':').unwrap_or(rest);
            if rest.starts_with(char::is_whitespace) {
                current = rest.trim_start();
                continue 'outer;
            }
        }
        return current.to_string();
    }
}

fn is_meta_label(text: &str) -> bool {
    let folded = text
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase();
    META_LABELS.contains(&folded.as_str())
}

/// The claim text of a raw record, looked up through the alternate key names.
pub fn raw_claim_text(raw: &RawClaim) -> Option<String> {
    match raw {
        RawClaim::Text(text) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
        RawClaim::Record(_) => raw.field(CLAIM_TEXT_KEYS),
    }
}

/// Normalize a single record, or `None` if it is degenerate.
pub fn normalize_claim(raw: &RawClaim, config: &NormalizeConfig) -> Option<CandidateClaim> {
    let text = raw_claim_text(raw)?;
    if is_meta_label(&text) {
        debug!(claim = %text, "Rejected meta-label");
        return None;
    }

    let claim_text = strip_leaked_field_prefix(&text);
    if claim_text.chars().count() < config.min_claim_chars || is_meta_label(&claim_text) {
        debug!(claim = %claim_text, "Rejected degenerate claim");
        return None;
    }

    let timestamp = raw.field(TIMESTAMP_KEYS).and_then(|t| {
        let parsed = validate_timestamp(&t);
        if parsed.is_none() {
            debug!(timestamp = %t, "Unparseable timestamp, leaving unset");
        }
        parsed
    });

    let speaker = raw
        .field(SPEAKER_KEYS)
        .map(|s| truncate_chars(&s, config.max_speaker_chars));

    let initial_assessment = raw
        .field(ASSESSMENT_KEYS)
        .map(|a| strip_leaked_field_prefix(&a))
        .filter(|a| !a.is_empty())
        .map(|a| truncate_chars(&a, config.max_assessment_chars));

    Some(CandidateClaim {
        claim_text: truncate_chars(&claim_text, config.max_claim_chars),
        timestamp,
        speaker,
        initial_assessment,
    })
}

/// Normalize a batch, counting rejected records.
pub fn normalize_claims(raw: &[RawClaim], config: &NormalizeConfig) -> NormalizeResult {
    let accepted: Vec<CandidateClaim> = raw
        .iter()
        .filter_map(|r| normalize_claim(r, config))
        .collect();
    let rejected = raw.len() - accepted.len();
    if rejected > 0 {
        debug!(
            rejected,
            accepted = accepted.len(),
            "Dropped malformed claim records"
        );
    }
    NormalizeResult { accepted, rejected }
}
