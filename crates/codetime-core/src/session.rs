//! Work session inference from commit timestamps.
//!
//! Sessions are never materialized. After sorting, any gap between consecutive
//! timestamps that strictly exceeds the configured threshold starts a new
//! session, so a gap exactly equal to the threshold stays in the same session.

use chrono::{DateTime, Duration, FixedOffset};

use crate::error::EstimateError;

/// Default gap, in minutes, after which a new session starts.
pub const DEFAULT_SESSION_GAP_MINUTES: f64 = 60.0;

/// Upper bound for the gap threshold (~1000 years in minutes).
const MAX_GAP_MINUTES: f64 = 1000.0 * 365.0 * 24.0 * 60.0;

/// Configuration for session grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Largest gap between two commits that still belongs to one session.
    /// Default: 60 minutes.
    pub gap: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gap: Duration::minutes(60),
        }
    }
}

impl SessionConfig {
    /// Builds a config from a (possibly fractional) number of minutes.
    pub fn from_minutes(minutes: f64) -> Result<Self, EstimateError> {
        let invalid = EstimateError::InvalidParameter {
            name: "session gap minutes",
            value: minutes,
        };
        if !minutes.is_finite() || minutes <= 0.0 || minutes > MAX_GAP_MINUTES {
            return Err(invalid);
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "minutes is bounded by MAX_GAP_MINUTES, so the product fits in i64"
        )]
        let millis = (minutes * 60_000.0).round() as i64;
        let gap = Duration::try_milliseconds(millis).ok_or(invalid)?;
        Ok(Self { gap })
    }
}

/// Counts the work sessions in an unordered set of timestamps.
///
/// Returns 0 for empty input and at least 1 otherwise. The input may be
/// unsorted and may contain duplicates; it is not modified.
pub fn count_sessions(timestamps: &[DateTime<FixedOffset>], config: &SessionConfig) -> usize {
    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();

    let Some((&first, rest)) = sorted.split_first() else {
        return 0;
    };

    let mut sessions = 1;
    let mut previous = first;
    for &current in rest {
        if current - previous > config.gap {
            sessions += 1;
        }
        previous = current;
    }

    tracing::debug!(
        commits = timestamps.len(),
        sessions,
        gap_minutes = config.gap.num_minutes(),
        "grouped commits into sessions"
    );
    sessions
}
