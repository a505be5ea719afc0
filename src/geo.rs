//! Spherical geometry helpers.
//!
//! All distances are measured along the surface of a sphere with the Earth's
//! mean radius. Angles in the public API are degrees; internal math is radians.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic point in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when latitude is in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Unit vector on the sphere (x toward 0°E, z toward the north pole).
    pub fn to_unit(&self) -> DVec3 {
        let (lat, lon) = (self.lat.to_radians(), self.lon.to_radians());
        DVec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
    }
}

impl From<(f64, f64)> for LatLon {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

/// Great-circle distance in kilometers (haversine formula).
pub fn great_circle_distance_km(a: LatLon, b: LatLon) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Angle in radians between two unit vectors.
///
/// Uses atan2 of cross and dot so small and near-antipodal angles stay accurate.
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b))
}

/// Angular distance in radians from `point` to the minor great-circle arc `start`-`end`.
pub fn angle_to_arc(point: DVec3, start: DVec3, end: DVec3) -> f64 {
    let normal = start.cross(end);
    let normal_len = normal.length();
    if normal_len < 1e-12 {
        // Coincident (or antipodal) endpoints: no unique arc
        return angle_between(point, start).min(angle_between(point, end));
    }
    let normal = normal / normal_len;

    // Projection onto the arc's plane; it lies on the arc when it falls between the endpoints
    let off_plane = point.dot(normal);
    let in_plane = point - normal * off_plane;
    let within = start.cross(in_plane).dot(normal) >= 0.0 && in_plane.cross(end).dot(normal) >= 0.0;

    if within && in_plane.length() > 1e-12 {
        off_plane.abs().atan2(in_plane.length())
    } else {
        angle_between(point, start).min(angle_between(point, end))
    }
}

/// Wrap a longitude into [-180, 180).
pub fn wrap_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quarter_meridian() {
        let d = great_circle_distance_km(LatLon::new(0.0, 0.0), LatLon::new(90.0, 0.0));
        assert_relative_eq!(d, EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn test_one_degree_on_equator() {
        let d = great_circle_distance_km(LatLon::new(0.0, 10.0), LatLon::new(0.0, 11.0));
        assert_relative_eq!(d, 111.194_926_6, epsilon = 1e-3);
    }

    #[test]
    fn test_distance_across_antimeridian() {
        let d = great_circle_distance_km(LatLon::new(0.0, 179.5), LatLon::new(0.0, -179.5));
        assert_relative_eq!(d, 111.194_926_6, epsilon = 1e-3);
    }

    #[test]
    fn test_haversine_matches_vector_angle() {
        let a = LatLon::new(-23.55, -46.63);
        let b = LatLon::new(-16.68, -49.25);
        let by_vec = angle_between(a.to_unit(), b.to_unit()) * EARTH_RADIUS_KM;
        assert_relative_eq!(great_circle_distance_km(a, b), by_vec, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_to_arc_interior_and_endpoint() {
        let start = LatLon::new(0.0, 0.0).to_unit();
        let end = LatLon::new(0.0, 10.0).to_unit();

        // Above the middle of the arc: cross-track distance
        let above = LatLon::new(1.0, 5.0).to_unit();
        assert_relative_eq!(angle_to_arc(above, start, end).to_degrees(), 1.0, epsilon = 1e-9);

        // Beyond the end: nearest endpoint
        let beyond = LatLon::new(0.0, 12.0).to_unit();
        assert_relative_eq!(angle_to_arc(beyond, start, end).to_degrees(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_wrap_lon() {
        assert_relative_eq!(wrap_lon(190.0), -170.0);
        assert_relative_eq!(wrap_lon(-190.0), 170.0);
        assert_relative_eq!(wrap_lon(45.0), 45.0);
    }

    #[test]
    fn test_validity() {
        assert!(LatLon::new(90.0, -180.0).is_valid());
        assert!(!LatLon::new(90.1, 0.0).is_valid());
        assert!(!LatLon::new(0.0, 180.5).is_valid());
        assert!(!LatLon::new(f64::NAN, 0.0).is_valid());
    }
}
