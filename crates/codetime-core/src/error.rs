//! Error types for session inference and activity estimation.

use thiserror::Error;

/// Errors produced while estimating activities.
///
/// An empty timestamp list is not an error: it yields zero sessions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    /// No catalog exists for the requested mode.
    #[error("no activity catalog for mode '{mode}'")]
    CatalogNotFound { mode: String },

    /// A catalog entry has a non-positive or non-finite hour cost.
    #[error("invalid catalog entry '{activity}': hours must be positive, got {hours}")]
    InvalidCatalogEntry { activity: String, hours: f64 },

    /// The catalog exists but could not be read or parsed.
    #[error("failed to load catalog for mode '{mode}': {reason}")]
    CatalogLoad { mode: String, reason: String },

    /// A tuning parameter was out of range.
    #[error("invalid {name}: {value} (must be a positive, finite number)")]
    InvalidParameter { name: &'static str, value: f64 },
}
