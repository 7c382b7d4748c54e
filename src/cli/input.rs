//! Input file parsing for the `run` command.
//!
//! Segment files hold a model response: usually a JSON object with `claims` and a
//! report, sometimes wrapped in a markdown code fence or surrounded by prose. Claim
//! files for the auxiliary sources are JSON or YAML lists, optionally wrapped in an
//! object under `claims`.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::models::RawClaim;
use crate::services::fusion::SegmentExtraction;
use crate::SiftError;

/// Remove a surrounding markdown code fence, if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string (e.g. `json`) on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// The outermost `{...}` or `[...]` span of `text`.
fn json_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

fn segment_from_value(value: Value) -> Result<SegmentExtraction, SiftError> {
    match value {
        Value::Array(_) => Ok(SegmentExtraction::new(
            String::new(),
            serde_json::from_value(value)?,
        )),
        Value::Object(_) => Ok(serde_json::from_value(value)?),
        other => Err(SiftError::Validation(format!(
            "Expected a JSON object or array, found {}",
            other
        ))),
    }
}

/// Parse one segment's model response.
pub fn parse_segment_response(text: &str) -> Result<SegmentExtraction, SiftError> {
    let body = strip_code_fence(text);
    match serde_json::from_str::<Value>(body) {
        Ok(value) => segment_from_value(value),
        Err(first_err) => {
            let span = json_span(body).ok_or_else(|| {
                SiftError::Validation(format!("No JSON found in segment response: {}", first_err))
            })?;
            segment_from_value(serde_json::from_str(span)?)
        }
    }
}

pub fn read_segment_file(path: &Path) -> Result<SegmentExtraction, SiftError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SiftError::Io(format!("Failed to read '{}': {}", path.display(), e)))?;
    parse_segment_response(&content)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClaimFile {
    List(Vec<RawClaim>),
    Wrapped { claims: Vec<RawClaim> },
}

impl ClaimFile {
    fn into_claims(self) -> Vec<RawClaim> {
        match self {
            ClaimFile::List(claims) | ClaimFile::Wrapped { claims } => claims,
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

/// Parse a claim list; `yaml` selects YAML over JSON.
pub fn parse_claim_list(content: &str, yaml: bool) -> Result<Vec<RawClaim>, SiftError> {
    let file: ClaimFile = if yaml {
        serde_yaml_ng::from_str(content)
            .map_err(|e| SiftError::Serialization(format!("Failed to parse YAML: {}", e)))?
    } else {
        serde_json::from_str(strip_code_fence(content))?
    };
    Ok(file.into_claims())
}

pub fn read_claim_file(path: &Path) -> Result<Vec<RawClaim>, SiftError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SiftError::Io(format!("Failed to read '{}': {}", path.display(), e)))?;
    parse_claim_list(&content, is_yaml(path))
}
