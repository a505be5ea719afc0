//! Combine the background and all region contributions at a point.
//!
//! The finest requested resolution wins. `min` is associative and
//! commutative, so the value at a point does not depend on the order the
//! regions are listed in, and nested regions need no sorting by the caller.

use crate::region::{Region, SamplePoint};

/// Combined cell width at `point` (km).
pub fn combine(point: &SamplePoint, background: f64, regions: &[Region]) -> f64 {
    regions
        .iter()
        .filter_map(|region| region.contribution(point, background))
        .fold(background, f64::min)
}

/// Which region (if any) sets the value at `point`.
///
/// Returns the index of the region whose contribution is the minimum; ties
/// go to the finer core resolution, then to the lexicographically smaller
/// name, so the answer is independent of list order too.
pub fn controlling_region(point: &SamplePoint, background: f64, regions: &[Region]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (idx, region) in regions.iter().enumerate() {
        let Some(value) = region.contribution(point, background) else {
            continue;
        };
        if value >= background {
            continue;
        }
        best = match best {
            None => Some((idx, value)),
            Some((best_idx, best_value)) => {
                let current = &regions[best_idx];
                let better = value < best_value
                    || (value == best_value
                        && (region.resolution(), region.name()) < (current.resolution(), current.name()));
                if better {
                    Some((idx, value))
                } else {
                    Some((best_idx, best_value))
                }
            }
        };
    }

    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLon;
    use crate::region::RegionParams;

    fn circle(name: &str, res: f64, width: f64, center: (f64, f64), radius: f64) -> Region {
        Region::circle(RegionParams::new(name, res, width), center.into(), radius).unwrap()
    }

    #[test]
    fn test_no_regions_is_background() {
        assert_eq!(combine(&SamplePoint::new(12.0, 34.0), 60.0, &[]), 60.0);
    }

    #[test]
    fn test_finest_wins_in_any_order() {
        let coarse = circle("state", 3.0, 2.0, (-15.93, -49.86), 350.0);
        let fine = circle("metro", 1.0, 2.0, (-16.68, -49.25), 50.0);
        let point = SamplePoint::new(-16.68, -49.25);

        let a = combine(&point, 30.0, &[coarse.clone(), fine.clone()]);
        let b = combine(&point, 30.0, &[fine, coarse]);
        assert_eq!(a, 1.0);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_coarse_region_never_raises_value() {
        // A region coarser than the background cannot make the field coarser
        let odd = circle("odd", 80.0, 0.0, (0.0, 0.0), 500.0);
        assert_eq!(combine(&SamplePoint::new(0.0, 0.0), 50.0, &[odd]), 50.0);
    }

    #[test]
    fn test_controlling_region() {
        let regions = vec![
            circle("state", 3.0, 0.0, (-15.93, -49.86), 350.0),
            circle("metro", 1.0, 0.0, (-16.68, -49.25), 50.0),
        ];
        let metro = SamplePoint::from(LatLon::new(-16.68, -49.25));
        assert_eq!(controlling_region(&metro, 30.0, &regions), Some(1));

        let state_only = SamplePoint::new(-14.0, -49.86);
        assert_eq!(controlling_region(&state_only, 30.0, &regions), Some(0));

        let far = SamplePoint::new(40.0, 10.0);
        assert_eq!(controlling_region(&far, 30.0, &regions), None);
    }
}
