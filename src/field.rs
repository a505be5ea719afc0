//! The synthesized cell-width field.

use serde::{Deserialize, Serialize};

use crate::geo::EARTH_RADIUS_KM;
use crate::grid::SamplingGrid;

/// Summary statistics over a [`ResolutionField`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// Finest cell width (km)
    pub min: f64,
    /// Coarsest cell width (km)
    pub max: f64,
    /// Plain mean over all samples (km)
    pub mean: f64,
    /// Mean weighted by the sphere area each sample represents (km)
    pub area_weighted_mean: f64,
    /// Hexagonal cells a mesh following the field would roughly hold
    pub estimated_cells: f64,
}

impl FieldStats {
    fn compute(grid: &SamplingGrid, values: &[f64]) -> Self {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        let mut sum = 0.0;
        let mut weighted_sum = 0.0;
        let mut total_area = 0.0;
        let mut cells = 0.0;

        // Sequential, row-major: identical results run to run
        let areas = sample_areas_km2(grid);
        for (row, &area) in areas.iter().enumerate() {
            let start = row * grid.width();
            for &w in &values[start..start + grid.width()] {
                if w < min { min = w; }
                if w > max { max = w; }
                sum += w;
                weighted_sum += w * area;
                total_area += area;
                // Regular hexagon of width w (flat to flat) covers sqrt(3)/2 * w^2
                cells += area / (0.5 * 3f64.sqrt() * w * w);
            }
        }

        let count = values.len().max(1) as f64;
        Self {
            min,
            max,
            mean: sum / count,
            area_weighted_mean: if total_area > 0.0 { weighted_sum / total_area } else { 0.0 },
            estimated_cells: cells,
        }
    }
}

/// Sphere area (km^2) represented by one sample of each latitude row.
///
/// Rows own the latitude band halfway to their neighbours; columns split the
/// full revolution evenly, with the repeated seam column counted once.
fn sample_areas_km2(grid: &SamplingGrid) -> Vec<f64> {
    let n = grid.lats.len();
    let columns = (grid.width() - 1).max(1) as f64;
    let r2 = EARTH_RADIUS_KM * EARTH_RADIUS_KM;
    let seam_share = (grid.width() - 1) as f64 / grid.width() as f64;

    (0..n)
        .map(|i| {
            let south = if i == 0 { -90.0 } else { 0.5 * (grid.lats[i - 1] + grid.lats[i]) };
            let north = if i == n - 1 { 90.0 } else { 0.5 * (grid.lats[i] + grid.lats[i + 1]) };
            let band = 2.0 * std::f64::consts::PI * r2 * (north.to_radians().sin() - south.to_radians().sin());
            band / columns * seam_share
        })
        .collect()
}

/// Desired cell width (km) at every point of a [`SamplingGrid`].
///
/// Row-major: `values[lat_index * width + lon_index]`. Never mutated after
/// synthesis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolutionField {
    grid: SamplingGrid,
    values: Vec<f64>,
    stats: FieldStats,
}

impl ResolutionField {
    pub(crate) fn new(grid: SamplingGrid, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), grid.len());
        let stats = FieldStats::compute(&grid, &values);
        Self { grid, values, stats }
    }

    pub fn grid(&self) -> &SamplingGrid {
        &self.grid
    }

    pub fn lats(&self) -> &[f64] {
        &self.grid.lats
    }

    pub fn lons(&self) -> &[f64] {
        &self.grid.lons
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Cell width at (lat index, lon index).
    pub fn get(&self, lat_idx: usize, lon_idx: usize) -> f64 {
        self.values[lat_idx * self.grid.width() + lon_idx]
    }

    /// One latitude row.
    pub fn row(&self, lat_idx: usize) -> &[f64] {
        let start = lat_idx * self.grid.width();
        &self.values[start..start + self.grid.width()]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn stats(&self) -> &FieldStats {
        &self.stats
    }

    pub fn min(&self) -> f64 {
        self.stats.min
    }

    pub fn max(&self) -> f64 {
        self.stats.max
    }

    pub fn mean(&self) -> f64 {
        self.stats.mean
    }

    /// Rough hexagonal cell count of a mesh that follows this field.
    pub fn estimated_cell_count(&self) -> u64 {
        self.stats.estimated_cells.round() as u64
    }

    /// Iterate over all samples as (lat, lon, width).
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.grid
            .points()
            .zip(self.values.iter())
            .map(|((lat, lon), &w)| (lat, lon, w))
    }

    /// Human-readable report.
    pub fn summary(&self) -> String {
        format!(
            "Cell width field\n\
             \x20 Grid:            {} x {} ({} points, {:.3} x {:.3} deg)\n\
             \x20 Resolution:      {:.2} - {:.2} km\n\
             \x20 Mean:            {:.2} km (area-weighted {:.2} km)\n\
             \x20 Estimated cells: ~{}",
            self.height(),
            self.width(),
            self.values.len(),
            self.grid.lat_step(),
            self.grid.lon_step(),
            self.stats.min,
            self.stats.max,
            self.stats.mean,
            self.stats.area_weighted_mean,
            self.estimated_cell_count(),
        )
    }
}
