//! Error types for configuration and region construction.
//!
//! Every error is raised while building a [`Configuration`](crate::config::Configuration)
//! or a [`Region`](crate::region::Region). Field evaluation itself is total and
//! never produces one of these.

use thiserror::Error;

/// Errors that can occur while loading or validating a grid configuration.
#[derive(Debug, Error)]
pub enum GridError {
    /// Degenerate or unsupported region shape.
    #[error("region '{name}': invalid geometry: {reason}")]
    InvalidRegionGeometry {
        /// Name of the offending region.
        name: String,
        /// The violated constraint.
        reason: String,
    },

    /// Non-positive resolution, negative transition width, and similar.
    #[error("region '{name}': invalid resolution parameters: {reason}")]
    InvalidResolutionParameters {
        /// Name of the offending region.
        name: String,
        /// The violated constraint.
        reason: String,
    },

    /// Latitude or longitude outside the geographic domain.
    #[error("region '{name}': coordinate ({lat}, {lon}) out of range (lat in [-90, 90], lon in [-180, 180])")]
    OutOfRangeCoordinate {
        /// Name of the offending region.
        name: String,
        /// Offending latitude in degrees.
        lat: f64,
        /// Offending longitude in degrees.
        lon: f64,
    },

    /// Region name is empty or blank.
    #[error("invalid region name '{0}' (must not be empty)")]
    InvalidRegionName(String),

    /// Two regions share a name.
    #[error("duplicate region name '{0}'")]
    DuplicateRegionName(String),

    /// Background resolution must be a positive finite number of kilometers.
    #[error("invalid background resolution {0} km (must be > 0)")]
    InvalidBackgroundResolution(f64),

    /// Grid spacing must be in (0, 90] degrees.
    #[error("invalid grid density {0} degrees (must be in (0, 90])")]
    InvalidGridDensity(f64),

    /// I/O failure while reading or writing a configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration document.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GridError {
    /// Creates an invalid geometry error for `name`.
    pub fn geometry(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRegionGeometry {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid resolution parameters error for `name`.
    pub fn resolution(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidResolutionParameters {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an out-of-range coordinate error for `name`.
    pub fn out_of_range(name: &str, lat: f64, lon: f64) -> Self {
        Self::OutOfRangeCoordinate {
            name: name.to_string(),
            lat,
            lon,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GridError>;
