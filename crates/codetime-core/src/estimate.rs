//! Session count to duration conversion.

/// Default minutes credited to each inferred session.
pub const DEFAULT_AVG_MINUTES_PER_SESSION: f64 = 30.0;

/// Estimates total hours for `session_count` sessions of `avg_minutes_per_session` each.
///
/// The result is rounded to two decimals, half away from zero. For the
/// non-negative values produced here that is round-half-up.
pub fn estimate_hours(session_count: usize, avg_minutes_per_session: f64) -> f64 {
    #[expect(
        clippy::cast_precision_loss,
        reason = "session counts are far below 2^52"
    )]
    let sessions = session_count as f64;
    round_to_hundredths(sessions * avg_minutes_per_session / 60.0)
}

/// Rounds to two decimal places, half away from zero.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_half_hour_sessions_is_two_hours() {
        assert!((estimate_hours(4, 30.0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_sessions_is_zero_hours() {
        assert!(estimate_hours(0, DEFAULT_AVG_MINUTES_PER_SESSION).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        // 7 * 25 / 60 = 2.91666...
        assert!((estimate_hours(7, 25.0) - 2.92).abs() < f64::EPSILON);
        // 1 / 60 = 0.01666...
        assert!((estimate_hours(1, 1.0) - 0.02).abs() < f64::EPSILON);
        // 2 / 60 = 0.0333...
        assert!((estimate_hours(2, 1.0) - 0.03).abs() < f64::EPSILON);
    }

    #[test]
    fn test_round_half_goes_up() {
        // 0.125 and 0.375 are exact in binary, so these pin the tie rule
        assert!((round_to_hundredths(0.125) - 0.13).abs() < f64::EPSILON);
        assert!((round_to_hundredths(0.375) - 0.38).abs() < f64::EPSILON);
        // 3 * 2.5 / 60 = 0.125
        assert!((estimate_hours(3, 2.5) - 0.13).abs() < f64::EPSILON);
    }
}
