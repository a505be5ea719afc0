//! Profiling tool for field synthesis at increasing grid densities

use std::time::Instant;

use varres_grid::geo::LatLon;
use varres_grid::{synthesize, Configuration, Region, RegionParams};

fn nested_regions() -> Vec<Region> {
    let mato_grosso = Region::polygon(
        RegionParams::new("Mato_Grosso", 10.0, 40.0),
        vec![
            LatLon::new(-7.06, -62.02),
            LatLon::new(-7.06, -49.54),
            LatLon::new(-18.50, -49.54),
            LatLon::new(-18.50, -62.02),
        ],
    );
    let sapezal = Region::circle(
        RegionParams::new("Fazenda_Sapezal", 2.0, 8.0),
        LatLon::new(-13.30, -56.03),
        100.0,
    );

    match (mato_grosso, sapezal) {
        (Ok(a), Ok(b)) => vec![a, b],
        (Err(e), _) | (_, Err(e)) => panic!("profiling regions are invalid: {}", e),
    }
}

fn main() {
    env_logger::init();

    println!("=== Synthesis Profiling ===");
    println!("Threads: {}", rayon::current_num_threads());
    println!();

    for density in [2.0, 1.0, 0.5, 0.25, 0.1] {
        let config = match Configuration::new(150.0, density, nested_regions()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Invalid configuration at {} deg: {}", density, e);
                continue;
            }
        };

        let start = Instant::now();
        let field = match synthesize(&config) {
            Ok(field) => field,
            Err(e) => {
                eprintln!("Synthesis failed at {} deg: {}", density, e);
                continue;
            }
        };
        let elapsed = start.elapsed();

        let points = field.values().len();
        println!(
            "density {:>5.2} deg: {:>9} points in {:>10.2?} ({:>6.1} Mpts/s) | {:.1}-{:.1} km",
            density,
            points,
            elapsed,
            points as f64 / elapsed.as_secs_f64().max(1e-9) / 1e6,
            field.min(),
            field.max()
        );
    }
}
