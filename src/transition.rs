//! Smooth resolution transition across a region boundary.
//!
//! A region's core sits at signed distance <= 0. Across the transition zone
//! (0, width) the resolution blends from the inner to the outer value with a
//! cubic Hermite smoothstep, so the field has neither jumps nor kinks at the
//! inner and outer edges of the zone.

/// Smooth step interpolation (Hermite smoothstep)
/// Returns 0 for x <= edge0, 1 for x >= edge1, smooth transition in between
pub fn smooth_step(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Resolution at signed `distance` (km) from a region's core boundary.
///
/// - `distance <= 0` gives `inner`
/// - `distance >= width` gives `outer` (so `width == 0` is a step at the boundary)
/// - in between, a smoothstep blend with zero slope at both ends
pub fn transition(distance: f64, inner: f64, outer: f64, width: f64) -> f64 {
    if distance <= 0.0 {
        return inner;
    }
    if distance >= width {
        return outer;
    }
    inner + (outer - inner) * smooth_step(0.0, width, distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_endpoints() {
        assert_eq!(transition(-5.0, 3.0, 30.0, 50.0), 3.0);
        assert_eq!(transition(0.0, 3.0, 30.0, 50.0), 3.0);
        assert_eq!(transition(50.0, 3.0, 30.0, 50.0), 30.0);
        assert_eq!(transition(1.0e300, 3.0, 30.0, 50.0), 30.0);
        assert_eq!(transition(f64::INFINITY, 3.0, 30.0, 50.0), 30.0);
    }

    #[test]
    fn test_midpoint_is_average() {
        assert_relative_eq!(transition(25.0, 10.0, 30.0, 50.0), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_width_is_step() {
        assert_eq!(transition(0.0, 5.0, 100.0, 0.0), 5.0);
        assert_eq!(transition(1e-9, 5.0, 100.0, 0.0), 100.0);
        assert_eq!(transition(-1e-9, 5.0, 100.0, 0.0), 5.0);
    }

    #[test]
    fn test_randomized_monotone_and_flat_at_ends() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..2000 {
            let inner: f64 = rng.gen_range(0.5..50.0);
            let outer: f64 = inner + rng.gen_range(1.0..200.0);
            let width: f64 = rng.gen_range(1.0..500.0);

            // Monotone non-decreasing along a sweep that overshoots both ends
            let mut prev = transition(-width, inner, outer, width);
            assert_eq!(prev, inner);
            for step in 0..=240 {
                let d = -0.1 * width + step as f64 * (1.2 * width / 240.0);
                let r = transition(d, inner, outer, width);
                assert!(r >= prev - 1e-12, "not monotone at d={d}: {r} < {prev}");
                assert!(r >= inner - 1e-12 && r <= outer + 1e-12);
                prev = r;
            }
            assert_eq!(prev, outer);

            // One-sided slope at each end vanishes relative to the linear slope
            let h = width * 1e-5;
            let linear = (outer - inner) / width;
            let slope_start = (transition(h, inner, outer, width) - inner) / h;
            let slope_end = (outer - transition(width - h, inner, outer, width)) / h;
            assert!(slope_start <= linear * 1e-4 + 1e-12);
            assert!(slope_end <= linear * 1e-4 + 1e-12);
        }
    }
}
