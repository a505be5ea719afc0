//! Global latitude/longitude sampling lattice.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Evenly spaced latitude and longitude axes covering the whole sphere.
///
/// Latitudes run from -90 to 90 and longitudes from -180 to 180, both ends
/// included, so the lattice holds one full revolution of longitude plus the
/// repeated seam column that mesh generators expect on a periodic axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingGrid {
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
}

impl SamplingGrid {
    /// Build a lattice whose spacing does not exceed `density` degrees.
    pub fn new(density: f64) -> Result<Self> {
        if !(density.is_finite() && density > 0.0 && density <= 90.0) {
            return Err(GridError::InvalidGridDensity(density));
        }

        let lats = axis(-90.0, 90.0, density);
        let lons = axis(-180.0, 180.0, density);
        log::debug!(
            "sampling grid: {} lats x {} lons ({} points) at {} deg",
            lats.len(),
            lons.len(),
            lats.len() * lons.len(),
            density
        );

        Ok(Self { lats, lons })
    }

    pub fn height(&self) -> usize {
        self.lats.len()
    }

    pub fn width(&self) -> usize {
        self.lons.len()
    }

    pub fn len(&self) -> usize {
        self.lats.len() * self.lons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Actual latitude spacing in degrees.
    pub fn lat_step(&self) -> f64 {
        180.0 / (self.lats.len() - 1) as f64
    }

    /// Actual longitude spacing in degrees.
    pub fn lon_step(&self) -> f64 {
        360.0 / (self.lons.len() - 1) as f64
    }

    /// Iterate over every (lat, lon) in row-major order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lats
            .iter()
            .flat_map(move |&lat| self.lons.iter().map(move |&lon| (lat, lon)))
    }
}

/// `start..=end` in equal steps no larger than `max_step`.
fn axis(start: f64, end: f64, max_step: f64) -> Vec<f64> {
    let intervals = ((end - start) / max_step - 1e-9).ceil().max(1.0) as usize;
    let step = (end - start) / intervals as f64;
    (0..=intervals)
        .map(|i| if i == intervals { end } else { start + i as f64 * step })
        .collect()
}
