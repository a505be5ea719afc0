//! Refinement regions.
//!
//! A region pairs a shape on the sphere (circle or polygon) with a target
//! resolution and a transition zone. Its only capability is reporting the
//! resolution it asks for at a sample point, or nothing when the point is
//! beyond its zone of influence.

mod circle;
mod polygon;

pub use circle::CircularRegion;
pub use polygon::PolygonRegion;

use std::hash::{Hash, Hasher};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::geo::LatLon;
use crate::transition::transition;

/// Attributes shared by every region shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionParams {
    /// Identifier, unique within a configuration
    pub name: String,
    /// Target cell width inside the region core (km)
    pub resolution: f64,
    /// Width of the blend band outside the core (km, 0 = hard edge)
    pub transition_width: f64,
    /// Free-form note carried through serialization
    pub description: Option<String>,
}

impl RegionParams {
    pub fn new(name: impl Into<String>, resolution: f64, transition_width: f64) -> Self {
        Self {
            name: name.into(),
            resolution,
            transition_width,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GridError::InvalidRegionName(self.name.clone()));
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(GridError::resolution(
                &self.name,
                format!("resolution must be > 0 km, got {}", self.resolution),
            ));
        }
        if !(self.transition_width.is_finite() && self.transition_width >= 0.0) {
            return Err(GridError::resolution(
                &self.name,
                format!("transition width must be >= 0 km, got {}", self.transition_width),
            ));
        }
        Ok(())
    }
}

/// A point prepared for repeated evaluation against many regions.
#[derive(Clone, Copy, Debug)]
pub struct SamplePoint {
    pub coord: LatLon,
    pub unit: DVec3,
}

impl SamplePoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        let coord = LatLon::new(lat, lon);
        Self { coord, unit: coord.to_unit() }
    }
}

impl From<LatLon> for SamplePoint {
    fn from(coord: LatLon) -> Self {
        Self { coord, unit: coord.to_unit() }
    }
}

/// A refinement region.
#[derive(Clone, Debug, PartialEq)]
pub enum Region {
    Circular(CircularRegion),
    Polygon(PolygonRegion),
}

impl Region {
    /// Build a validated circular region.
    pub fn circle(params: RegionParams, center: LatLon, radius_km: f64) -> Result<Self> {
        params.validate()?;
        Ok(Region::Circular(CircularRegion::new(params, center, radius_km)?))
    }

    /// Build a validated polygon region from an implicitly closed ring.
    pub fn polygon(params: RegionParams, vertices: Vec<LatLon>) -> Result<Self> {
        params.validate()?;
        Ok(Region::Polygon(PolygonRegion::new(params, vertices)?))
    }

    pub fn params(&self) -> &RegionParams {
        match self {
            Region::Circular(c) => &c.params,
            Region::Polygon(p) => &p.params,
        }
    }

    pub fn name(&self) -> &str {
        &self.params().name
    }

    pub fn resolution(&self) -> f64 {
        self.params().resolution
    }

    pub fn transition_width(&self) -> f64 {
        self.params().transition_width
    }

    /// Short shape name as used in configuration files.
    pub fn kind(&self) -> &'static str {
        match self {
            Region::Circular(_) => "circle",
            Region::Polygon(_) => "polygon",
        }
    }

    /// Signed geodesic distance (km) to the core boundary; negative inside.
    pub fn signed_distance_km(&self, point: &SamplePoint) -> f64 {
        match self {
            Region::Circular(c) => c.signed_distance_km(point),
            Region::Polygon(p) => p.signed_distance_km(point),
        }
    }

    /// Whether a point at `signed_distance` is inside the zone of influence.
    pub fn influences(&self, signed_distance: f64) -> bool {
        signed_distance <= 0.0 || signed_distance < self.transition_width()
    }

    /// Resolution this region asks for at `point`, or `None` beyond its zone
    /// of influence. The band always ends at `background`, so the value is
    /// continuous where the region stops contributing.
    pub fn contribution(&self, point: &SamplePoint, background: f64) -> Option<f64> {
        let params = self.params();

        if let Region::Polygon(p) = self {
            if p.is_beyond(point, params.transition_width) {
                return None;
            }
        }

        let signed = self.signed_distance_km(point);
        if !self.influences(signed) {
            return None;
        }

        Some(transition(signed, params.resolution, background, params.transition_width))
    }

    /// Convenience wrapper of [`Region::contribution`] for a plain coordinate.
    pub fn contribution_at(&self, lat: f64, lon: f64, background: f64) -> Option<f64> {
        self.contribution(&SamplePoint::new(lat, lon), background)
    }
}

impl Hash for Region {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let params = self.params();
        self.kind().hash(state);
        params.name.hash(state);
        params.resolution.to_bits().hash(state);
        params.transition_width.to_bits().hash(state);
        params.description.hash(state);

        let hash_point = |p: &LatLon, state: &mut H| {
            p.lat.to_bits().hash(state);
            p.lon.to_bits().hash(state);
        };
        match self {
            Region::Circular(c) => {
                hash_point(&c.center, state);
                c.radius_km.to_bits().hash(state);
            }
            Region::Polygon(p) => {
                p.vertices.len().hash(state);
                for v in &p.vertices {
                    hash_point(v, state);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn circle(name: &str, res: f64, width: f64, center: (f64, f64), radius: f64) -> Region {
        Region::circle(RegionParams::new(name, res, width), center.into(), radius).unwrap()
    }

    #[test]
    fn test_circle_center_and_outside() {
        let r = circle("c", 5.0, 0.0, (-23.55, -46.63), 200.0);
        assert_eq!(r.contribution_at(-23.55, -46.63, 100.0), Some(5.0));
        // ~1110 km away: no constraint
        assert_eq!(r.contribution_at(-13.55, -46.63, 100.0), None);
    }

    #[test]
    fn test_transition_blends_to_background() {
        let r = circle("c", 10.0, 100.0, (0.0, 0.0), 100.0);
        // Middle of the transition band: 150 km from center
        let lon = 150.0 / crate::geo::EARTH_RADIUS_KM;
        let v = r.contribution_at(0.0, lon.to_degrees(), 50.0).unwrap();
        assert_relative_eq!(v, 30.0, epsilon = 1e-6);
    }

    #[test]
    fn test_contribution_meets_background_at_band_edge() {
        let r = circle("c", 10.0, 30.0, (-22.0, -45.0), 200.0);
        let km_per_deg = crate::geo::EARTH_RADIUS_KM.to_radians();
        // Just inside the band's outer edge the value is already at the background
        let lat = -22.0 + 229.999 / km_per_deg;
        let v = r.contribution_at(lat, -45.0, 120.0).unwrap();
        assert_relative_eq!(v, 120.0, epsilon = 1e-6);
        assert_eq!(r.contribution_at(-22.0 + 230.001 / km_per_deg, -45.0, 120.0), None);
    }

    #[test]
    fn test_param_validation() {
        let bad_res = Region::circle(RegionParams::new("a", 0.0, 1.0), LatLon::new(0.0, 0.0), 10.0);
        assert!(matches!(bad_res, Err(GridError::InvalidResolutionParameters { .. })));

        let bad_width = Region::circle(RegionParams::new("b", 1.0, -1.0), LatLon::new(0.0, 0.0), 10.0);
        assert!(matches!(bad_width, Err(GridError::InvalidResolutionParameters { .. })));

        let unnamed = Region::circle(RegionParams::new("  ", 1.0, 1.0), LatLon::new(0.0, 0.0), 10.0);
        assert!(matches!(unnamed, Err(GridError::InvalidRegionName(_))));
    }

    #[test]
    fn test_influence_edge() {
        let hard = circle("hard", 5.0, 0.0, (0.0, 0.0), 100.0);
        assert!(hard.influences(0.0));
        assert!(!hard.influences(1e-9));

        let soft = circle("soft", 5.0, 20.0, (0.0, 0.0), 100.0);
        assert!(soft.influences(19.9));
        assert!(!soft.influences(20.0));
    }
}
