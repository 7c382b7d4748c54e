//! Video timestamp parsing.
//!
//! Claims carry timestamps as `MM:SS` or `HH:MM:SS`. Anything else is treated as
//! unparseable and callers fall back to [`DEFAULT_TIMESTAMP`].

pub const DEFAULT_TIMESTAMP: &str = "00:00";

/// Parse `MM:SS` or `HH:MM:SS` into a second offset.
///
/// Minutes in `MM:SS` may exceed 59 (`75:10` is a valid offset into a long video),
/// but seconds must stay below 60.
pub fn parse_timestamp(raw: &str) -> Option<u64> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    let numbers: Vec<u64> = parts
        .iter()
        .map(|p| {
            if p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()) {
                None
            } else {
                p.parse::<u64>().ok()
            }
        })
        .collect::<Option<Vec<u64>>>()?;

    match numbers.as_slice() {
        [m, s] if *s < 60 => m.checked_mul(60)?.checked_add(*s),
        [h, m, s] if *m < 60 && *s < 60 => h
            .checked_mul(3600)?
            .checked_add(m * 60)?
            .checked_add(*s),
        _ => None,
    }
}

/// Return `raw` trimmed if it parses, otherwise `None`.
pub fn validate_timestamp(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|_| raw.trim().to_string())
}

/// Fraction of the video elapsed at `timestamp`, clamped to [0.0, 1.0].
///
/// A non-positive duration puts everything at the start.
pub fn elapsed_fraction(timestamp: &str, duration_minutes: f64) -> f64 {
    let total_seconds = duration_minutes * 60.0;
    if total_seconds <= 0.0 {
        return 0.0;
    }
    let seconds = parse_timestamp(timestamp).unwrap_or(0) as f64;
    (seconds / total_seconds).clamp(0.0, 1.0)
}

/// Time quartile (0..=3) of `timestamp` within a video of the given length.
pub fn quartile_of(timestamp: &str, duration_minutes: f64) -> usize {
    let fraction = elapsed_fraction(timestamp, duration_minutes);
    ((fraction * 4.0) as usize).min(3)
}
