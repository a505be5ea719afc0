//! Polygon regions on the sphere.
//!
//! Edges are great-circle arcs between consecutive vertices. Membership uses
//! a crossing count along the northward meridian from the query point, which
//! makes it agree with the arc distance used for the boundary: the signed
//! distance is continuous across every edge.
//!
//! Validation policy:
//! - rings that wind around a pole are rejected (no finite inside/outside)
//! - self-intersecting rings are rejected
//! - rings crossing the antimeridian are fine; longitudes are unwrapped per edge

use glam::DVec3;

use super::{RegionParams, SamplePoint};
use crate::error::{GridError, Result};
use crate::geo::{angle_between, angle_to_arc, wrap_lon, LatLon, EARTH_RADIUS_KM};

/// Arc samples per edge when sizing the bounding cap
const CAP_SAMPLES_PER_EDGE: usize = 8;

/// Caps wider than this are not used for pruning
const MAX_PRUNING_CAP_RADIUS: f64 = 80.0 * std::f64::consts::PI / 180.0;

/// Numerical slack for geometric predicates on unit vectors
const EPS: f64 = 1e-12;

#[derive(Clone, Debug, PartialEq)]
pub struct PolygonRegion {
    pub params: RegionParams,
    /// Ring vertices as declared (closing duplicate removed)
    pub vertices: Vec<LatLon>,
    units: Vec<DVec3>,
    /// Signed longitude step of each edge, |step| < 180
    edge_dlon: Vec<f64>,
    /// Center and angular radius of a cap containing the whole ring
    cap: Option<(DVec3, f64)>,
}

impl PolygonRegion {
    pub(super) fn new(params: RegionParams, mut vertices: Vec<LatLon>) -> Result<Self> {
        let name = params.name.as_str();

        for v in &vertices {
            if !v.is_valid() {
                return Err(GridError::out_of_range(name, v.lat, v.lon));
            }
        }

        // Explicitly closed rings are accepted
        if vertices.len() > 1 && same_point(vertices[0], vertices[vertices.len() - 1]) {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(GridError::geometry(
                name,
                format!("polygon needs at least 3 distinct vertices, got {}", vertices.len()),
            ));
        }
        if let Some(v) = vertices.iter().find(|v| v.lat.abs() >= 90.0) {
            return Err(GridError::geometry(
                name,
                format!("vertex ({}, {}) lies on a pole", v.lat, v.lon),
            ));
        }

        let n = vertices.len();
        let units: Vec<DVec3> = vertices.iter().map(LatLon::to_unit).collect();

        let mut edge_dlon = Vec::with_capacity(n);
        for i in 0..n {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            if same_point(a, b) {
                return Err(GridError::geometry(
                    name,
                    format!("repeated vertex ({}, {}) at position {}", a.lat, a.lon, i),
                ));
            }
            let dlon = wrap_lon(b.lon - a.lon);
            if (dlon.abs() - 180.0).abs() < 1e-9 {
                return Err(GridError::geometry(
                    name,
                    format!("edge {} spans 180 degrees of longitude and is ambiguous", i),
                ));
            }
            edge_dlon.push(dlon);
        }

        let winding: f64 = edge_dlon.iter().sum();
        if winding.abs() > 180.0 {
            return Err(GridError::geometry(
                name,
                "ring winds around a pole; split it or use a circular region",
            ));
        }

        if unwrapped_area(&vertices, &edge_dlon).abs() < 1e-10 {
            return Err(GridError::geometry(name, "polygon has zero area"));
        }

        if let Some((i, j)) = first_self_intersection(&units) {
            return Err(GridError::geometry(
                name,
                format!("polygon is self-intersecting (edges {} and {})", i, j),
            ));
        }

        let cap = bounding_cap(&units);
        log::debug!(
            "polygon '{}': {} vertices, pruning cap {}",
            name,
            n,
            match cap {
                Some((_, r)) => format!("{:.2} deg", r.to_degrees()),
                None => "disabled".to_string(),
            }
        );

        Ok(Self {
            params,
            vertices,
            units,
            edge_dlon,
            cap,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Crossing-number membership test.
    ///
    /// Counts edges crossed by the meridian arc running north from `point`
    /// to the pole. Pole-winding rings are rejected at construction, so the
    /// pole itself is always outside.
    pub fn contains(&self, point: &SamplePoint) -> bool {
        let n = self.units.len();
        let lon = point.coord.lon;
        let meridian_dir = DVec3::new(lon.to_radians().cos(), lon.to_radians().sin(), 0.0);
        let meridian_normal = DVec3::new(-meridian_dir.y, meridian_dir.x, 0.0);

        let mut inside = false;
        for i in 0..n {
            let rel_a = wrap_lon(self.vertices[i].lon - lon);
            let rel_b = rel_a + self.edge_dlon[i];
            if (rel_a > 0.0) == (rel_b > 0.0) {
                continue;
            }

            let (a, b) = (self.units[i], self.units[(i + 1) % n]);
            let mut crossing = a.cross(b).cross(meridian_normal);
            if crossing.dot(meridian_dir) < 0.0 {
                crossing = -crossing;
            }
            let crossing = crossing.normalize_or_zero();
            if crossing.z > point.unit.z {
                inside = !inside;
            }
        }
        inside
    }

    /// Minimum geodesic distance (km) from `point` to any edge.
    pub fn boundary_distance_km(&self, point: &SamplePoint) -> f64 {
        let n = self.units.len();
        let mut min_angle = f64::MAX;
        for i in 0..n {
            let angle = angle_to_arc(point.unit, self.units[i], self.units[(i + 1) % n]);
            if angle < min_angle {
                min_angle = angle;
            }
        }
        min_angle * EARTH_RADIUS_KM
    }

    pub fn signed_distance_km(&self, point: &SamplePoint) -> f64 {
        let d = self.boundary_distance_km(point);
        if self.contains(point) {
            -d
        } else {
            d
        }
    }

    /// True when `point` is certainly outside the ring and farther than
    /// `reach_km` from it. Cheap rejection ahead of the full edge scan.
    pub(super) fn is_beyond(&self, point: &SamplePoint, reach_km: f64) -> bool {
        match self.cap {
            Some((center, radius)) => {
                angle_between(point.unit, center) - radius > reach_km / EARTH_RADIUS_KM
            }
            None => false,
        }
    }
}

fn same_point(a: LatLon, b: LatLon) -> bool {
    (a.lat - b.lat).abs() < 1e-12 && wrap_lon(a.lon - b.lon).abs() < 1e-12
}

/// Shoelace area in the unwrapped lon/lat plane (square degrees).
fn unwrapped_area(vertices: &[LatLon], edge_dlon: &[f64]) -> f64 {
    let mut x = vertices[0].lon;
    let mut twice_area = 0.0;
    for (i, dlon) in edge_dlon.iter().enumerate() {
        let (y0, y1) = (vertices[i].lat, vertices[(i + 1) % vertices.len()].lat);
        let x1 = x + dlon;
        twice_area += x * y1 - x1 * y0;
        x = x1;
    }
    twice_area / 2.0
}

/// Whether `p` lies on the minor arc `a`-`b` (all unit vectors, `p` on the arc's circle).
fn on_arc(p: DVec3, a: DVec3, b: DVec3, normal: DVec3) -> bool {
    a.cross(p).dot(normal) >= -EPS && p.cross(b).dot(normal) >= -EPS
}

fn arcs_intersect(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> bool {
    let n1 = a.cross(b).normalize_or_zero();
    let n2 = c.cross(d).normalize_or_zero();
    let line = n1.cross(n2);

    if line.length() < 1e-10 {
        // Same great circle: overlap when an endpoint of one arc touches the other
        return angle_to_arc(c, a, b) < 1e-9
            || angle_to_arc(d, a, b) < 1e-9
            || angle_to_arc(a, c, d) < 1e-9
            || angle_to_arc(b, c, d) < 1e-9;
    }

    let p = line.normalize();
    [p, -p]
        .iter()
        .any(|&x| on_arc(x, a, b, n1) && on_arc(x, c, d, n2))
}

/// First pair of non-adjacent edges that intersect, if any.
fn first_self_intersection(units: &[DVec3]) -> Option<(usize, usize)> {
    let n = units.len();
    for i in 0..n {
        let (a, b) = (units[i], units[(i + 1) % n]);
        for j in (i + 2)..n {
            // Edges i and j share a vertex when j is the closing edge and i is the first
            if i == 0 && j == n - 1 {
                continue;
            }
            let (c, d) = (units[j], units[(j + 1) % n]);
            if arcs_intersect(a, b, c, d) {
                return Some((i, j));
            }
        }
    }
    None
}

/// A cap around the ring's edges, or `None` when too wide to prune with.
fn bounding_cap(units: &[DVec3]) -> Option<(DVec3, f64)> {
    let n = units.len();
    let center = units.iter().copied().sum::<DVec3>().normalize_or_zero();
    if center == DVec3::ZERO {
        return None;
    }

    let mut radius: f64 = 0.0;
    for i in 0..n {
        let (a, b) = (units[i], units[(i + 1) % n]);
        for k in 0..=CAP_SAMPLES_PER_EDGE {
            let t = k as f64 / CAP_SAMPLES_PER_EDGE as f64;
            let sample = a.lerp(b, t).normalize_or_zero();
            radius = radius.max(angle_between(sample, center));
        }
    }

    // Slack for arc bulge between samples
    let radius = radius * 1.01 + 1e-6;
    (radius <= MAX_PRUNING_CAP_RADIUS).then_some((center, radius))
}
