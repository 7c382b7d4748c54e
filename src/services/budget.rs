//! Claim budget derivation from video duration.

/// Upper bound of the duration-derived budget for videos longer than 30 minutes.
pub const LONG_VIDEO_CAP: usize = 40;
/// Upper bound for videos of 15 to 30 minutes.
pub const MEDIUM_VIDEO_CAP: usize = 30;
/// Fixed lower bound for videos of 15 to 30 minutes.
pub const MEDIUM_VIDEO_FLOOR: usize = 15;
/// Upper bound for videos of 15 minutes or less.
pub const SHORT_VIDEO_CAP: usize = 20;

/// Maximum number of claims the pipeline may output for a video.
///
/// An override wins outright. Otherwise `round(duration × claims_per_minute)` is
/// clamped by duration bracket:
///
/// | duration      | budget                             |
/// |---------------|------------------------------------|
/// | > 30 min      | `max(min_claims, min(calc, 40))`   |
/// | 15 to 30 min  | `max(15, min(calc, 30))`           |
/// | ≤ 15 min      | `max(min_claims, min(calc, 20))`   |
pub fn calculate_max_claims(
    duration_minutes: f64,
    claims_per_minute: f64,
    min_claims: usize,
    max_claims_override: Option<usize>,
) -> usize {
    if let Some(max_claims) = max_claims_override {
        return max_claims;
    }

    let raw = (duration_minutes * claims_per_minute).round();
    let calculated = if raw.is_finite() && raw > 0.0 {
        raw as usize
    } else {
        0
    };

    if duration_minutes > 30.0 {
        min_claims.max(calculated.min(LONG_VIDEO_CAP))
    } else if duration_minutes > 15.0 {
        MEDIUM_VIDEO_FLOOR.max(calculated.min(MEDIUM_VIDEO_CAP))
    } else {
        min_claims.max(calculated.min(SHORT_VIDEO_CAP))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_video_clamps_to_cap() {
        assert_eq!(calculate_max_claims(60.0, 1.0, 20, None), 40);
        assert_eq!(calculate_max_claims(35.0, 1.0, 20, None), 35);
        assert_eq!(calculate_max_claims(45.0, 0.2, 20, None), 20);
    }

    #[test]
    fn test_medium_video_bracket() {
        assert_eq!(calculate_max_claims(20.0, 1.0, 20, None), 20);
        assert_eq!(calculate_max_claims(30.0, 2.0, 20, None), 30);
        assert_eq!(calculate_max_claims(25.0, 0.2, 20, None), 15);
    }

    #[test]
    fn test_short_video_uses_floor() {
        assert_eq!(calculate_max_claims(10.0, 1.0, 20, None), 20);
        assert_eq!(calculate_max_claims(15.0, 3.0, 20, None), 20);
        assert_eq!(calculate_max_claims(5.0, 1.0, 8, None), 8);
    }

    #[test]
    fn test_override_wins() {
        assert_eq!(calculate_max_claims(60.0, 1.0, 20, Some(7)), 7);
    }

    #[test]
    fn test_degenerate_duration() {
        assert_eq!(calculate_max_claims(0.0, 1.0, 20, None), 20);
        assert_eq!(calculate_max_claims(-5.0, 1.0, 20, None), 20);
        assert_eq!(calculate_max_claims(f64::NAN, 1.0, 20, None), 20);
    }
}
