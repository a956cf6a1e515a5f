//! Core domain logic for codetime.
//!
//! This crate is pure and performs no I/O. It contains:
//! - Session grouping: counting work sessions from commit timestamps
//! - Estimation: converting sessions into hours
//! - Activity mapping: expressing those hours as a list of alternative activities

mod activity;
mod error;
pub mod estimate;
pub mod session;

pub use activity::{
    ActivityCatalogEntry, CatalogProvider, DEFAULT_ACTIVITY_COUNT, EstimateOptions,
    EstimationResult, StaticCatalog, capitalize_activity, estimate_activities, map_activities,
};
pub use error::EstimateError;
pub use estimate::{DEFAULT_AVG_MINUTES_PER_SESSION, estimate_hours};
pub use session::{DEFAULT_SESSION_GAP_MINUTES, SessionConfig, count_sessions};
