//! Activity catalogs and the hours-to-activities mapping.
//!
//! # Algorithm Summary
//!
//! 1. Load the catalog for the requested mode from a [`CatalogProvider`]
//! 2. Reject entries whose hour cost is not a positive, finite number
//! 3. Shuffle the catalog with the caller's RNG
//! 4. Emit `"<Activity> <units> times"` for each unused activity that fits at
//!    least once into the total, until `activity_count` lines are produced

use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::EstimateError;
use crate::estimate::{DEFAULT_AVG_MINUTES_PER_SESSION, estimate_hours};

/// Default number of activity lines in a result.
pub const DEFAULT_ACTIVITY_COUNT: usize = 10;

/// One activity and what a single unit of it costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCatalogEntry {
    /// Activity description, e.g. "watch a movie".
    pub activity: String,
    /// Hours one unit of the activity takes.
    pub hours: f64,
}

impl ActivityCatalogEntry {
    pub fn new(activity: impl Into<String>, hours: f64) -> Self {
        Self {
            activity: activity.into(),
            hours,
        }
    }

    fn validate(&self) -> Result<(), EstimateError> {
        if self.hours.is_finite() && self.hours > 0.0 {
            Ok(())
        } else {
            Err(EstimateError::InvalidCatalogEntry {
                activity: self.activity.clone(),
                hours: self.hours,
            })
        }
    }
}

/// Source of activity catalogs keyed by mode.
///
/// Implementations must return [`EstimateError::CatalogNotFound`] for an
/// unknown mode; an empty `Vec` means the mode exists but has no entries.
pub trait CatalogProvider {
    fn load(&self, mode: &str) -> Result<Vec<ActivityCatalogEntry>, EstimateError>;
}

impl<F> CatalogProvider for F
where
    F: Fn(&str) -> Result<Vec<ActivityCatalogEntry>, EstimateError>,
{
    fn load(&self, mode: &str) -> Result<Vec<ActivityCatalogEntry>, EstimateError> {
        self(mode)
    }
}

/// In-memory catalogs.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    catalogs: HashMap<String, Vec<ActivityCatalogEntry>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the catalog for `mode`.
    #[must_use]
    pub fn with_mode(
        mut self,
        mode: impl Into<String>,
        entries: Vec<ActivityCatalogEntry>,
    ) -> Self {
        self.catalogs.insert(mode.into(), entries);
        self
    }
}

impl CatalogProvider for StaticCatalog {
    fn load(&self, mode: &str) -> Result<Vec<ActivityCatalogEntry>, EstimateError> {
        self.catalogs
            .get(mode)
            .cloned()
            .ok_or_else(|| EstimateError::CatalogNotFound {
                mode: mode.to_string(),
            })
    }
}

/// Tuning for [`estimate_activities`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateOptions {
    /// Minutes credited to each session. Default: 30.
    pub avg_minutes_per_session: f64,
    /// Maximum number of activity lines. Default: 10.
    pub activity_count: usize,
}

impl Default for EstimateOptions {
    fn default() -> Self {
        Self {
            avg_minutes_per_session: DEFAULT_AVG_MINUTES_PER_SESSION,
            activity_count: DEFAULT_ACTIVITY_COUNT,
        }
    }
}

/// Outcome of one estimation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimationResult {
    pub session_count: usize,
    pub total_hours: f64,
    pub activity_lines: Vec<String>,
}

/// Converts a session count into hours and a list of equivalent activities.
pub fn estimate_activities<P, R>(
    session_count: usize,
    options: &EstimateOptions,
    mode: &str,
    provider: &P,
    rng: &mut R,
) -> Result<EstimationResult, EstimateError>
where
    P: CatalogProvider + ?Sized,
    R: Rng + ?Sized,
{
    let avg = options.avg_minutes_per_session;
    if !avg.is_finite() || avg <= 0.0 {
        return Err(EstimateError::InvalidParameter {
            name: "average minutes per session",
            value: avg,
        });
    }

    let total_hours = estimate_hours(session_count, avg);
    let catalog = provider.load(mode)?;
    tracing::debug!(mode, entries = catalog.len(), total_hours, "loaded activity catalog");

    let activity_lines = map_activities(total_hours, catalog, options.activity_count, rng)?;
    Ok(EstimationResult {
        session_count,
        total_hours,
        activity_lines,
    })
}

/// Maps `total_hours` onto at most `activity_count` distinct activity lines.
///
/// The whole catalog is validated before any line is produced, so an invalid
/// entry fails regardless of where the shuffle places it.
pub fn map_activities<R>(
    total_hours: f64,
    mut catalog: Vec<ActivityCatalogEntry>,
    activity_count: usize,
    rng: &mut R,
) -> Result<Vec<String>, EstimateError>
where
    R: Rng + ?Sized,
{
    for entry in &catalog {
        entry.validate()?;
    }

    catalog.shuffle(rng);

    let mut lines = Vec::new();
    let mut used: HashSet<&str> = HashSet::new();
    for entry in &catalog {
        if lines.len() >= activity_count {
            break;
        }
        if used.contains(entry.activity.as_str()) {
            continue;
        }

        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "both operands are non-negative; huge ratios saturate"
        )]
        let units = (total_hours / entry.hours).floor() as u64;
        if units > 0 {
            lines.push(format!(
                "{} {units} times",
                capitalize_activity(&entry.activity)
            ));
            used.insert(entry.activity.as_str());
        }
    }

    Ok(lines)
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize_activity(activity: &str) -> String {
    let mut chars = activity.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}
