use super::{RegionParams, SamplePoint};
use crate::error::{GridError, Result};
use crate::geo::{great_circle_distance_km, LatLon, EARTH_RADIUS_KM};

/// Spherical cap of geodesic `radius_km` around `center`.
#[derive(Clone, Debug, PartialEq)]
pub struct CircularRegion {
    pub params: RegionParams,
    pub center: LatLon,
    pub radius_km: f64,
}

impl CircularRegion {
    pub(super) fn new(params: RegionParams, center: LatLon, radius_km: f64) -> Result<Self> {
        if !center.is_valid() {
            return Err(GridError::out_of_range(&params.name, center.lat, center.lon));
        }
        if !(radius_km.is_finite() && radius_km > 0.0) {
            return Err(GridError::geometry(
                &params.name,
                format!("radius must be > 0 km, got {}", radius_km),
            ));
        }
        // Half the circumference reaches the antipode; anything past that covers the globe twice
        if radius_km > std::f64::consts::PI * EARTH_RADIUS_KM {
            return Err(GridError::geometry(
                &params.name,
                format!("radius {} km exceeds half the Earth's circumference", radius_km),
            ));
        }

        Ok(Self {
            params,
            center,
            radius_km,
        })
    }

    /// Outer radius of the annulus of influence (km).
    pub fn influence_radius_km(&self) -> f64 {
        self.radius_km + self.params.transition_width
    }

    pub fn signed_distance_km(&self, point: &SamplePoint) -> f64 {
        great_circle_distance_km(point.coord, self.center) - self.radius_km
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::geo::angle_between;

    fn region(radius: f64) -> Result<CircularRegion> {
        CircularRegion::new(RegionParams::new("circle", 3.0, 10.0), LatLon::new(-15.93, -49.86), radius)
    }

    #[test]
    fn test_signed_distance_matches_vector_angle() {
        let c = region(350.0).unwrap();
        let goiania = LatLon::new(-16.68, -49.25);
        let expected = angle_between(goiania.to_unit(), c.center.to_unit()) * EARTH_RADIUS_KM - 350.0;
        assert_relative_eq!(c.signed_distance_km(&goiania.into()), expected, epsilon = 1e-6);
        assert!(c.signed_distance_km(&goiania.into()) < 0.0);
        assert_relative_eq!(c.influence_radius_km(), 360.0);
    }

    #[test]
    fn test_invalid_geometry() {
        assert!(matches!(region(0.0), Err(GridError::InvalidRegionGeometry { .. })));
        assert!(matches!(region(-5.0), Err(GridError::InvalidRegionGeometry { .. })));
        assert!(matches!(region(25_000.0), Err(GridError::InvalidRegionGeometry { .. })));

        let off_globe = CircularRegion::new(RegionParams::new("x", 1.0, 0.0), LatLon::new(91.0, 0.0), 10.0);
        assert!(matches!(off_globe, Err(GridError::OutOfRangeCoordinate { .. })));
    }

    #[test]
    fn test_polar_cap_is_round() {
        let c = CircularRegion::new(RegionParams::new("pole", 1.0, 0.0), LatLon::new(90.0, 0.0), 500.0).unwrap();
        let ring_lat = 90.0 - (500.0 / EARTH_RADIUS_KM).to_degrees();
        for lon in [-180.0, -90.0, 0.0, 45.0, 179.0] {
            let d = c.signed_distance_km(&SamplePoint::new(ring_lat, lon));
            assert!(d.abs() < 1e-6, "lon {lon}: {d}");
        }
    }
}
