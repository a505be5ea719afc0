use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use varres_grid::config::ConfigFile;
use varres_grid::geo::LatLon;
use varres_grid::region::SamplePoint;
use varres_grid::synth::{controlling_region_at, resolution_at};
use varres_grid::{export, synthesize, Configuration};

#[derive(Parser, Debug)]
#[command(name = "varres_grid", version)]
#[command(about = "Build variable-resolution cell-width fields for spherical mesh generation")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize the cell-width field described by a JSON configuration
    Run {
        /// JSON configuration file
        config: PathBuf,

        /// Override the configured grid density (degrees)
        #[arg(short, long)]
        density: Option<f64>,

        /// Export the field as an equirectangular PNG
        #[arg(long)]
        png: Option<PathBuf>,

        /// Export the field (axes, values, statistics) as JSON
        #[arg(long)]
        field: Option<PathBuf>,

        /// Write a text report of the configuration and field
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Validate a configuration and show its resolution hierarchy
    Info {
        /// JSON configuration file
        config: PathBuf,
    },

    /// Report the cell width at one point and the region that sets it
    Query {
        /// JSON configuration file
        config: PathBuf,

        /// Latitude (degrees)
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude (degrees)
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// Synthesize a uniform global field
    Uniform {
        /// Cell width everywhere (km)
        resolution: f64,

        /// Grid density (degrees)
        #[arg(short, long, default_value = "1.0")]
        density: f64,

        /// Export the field as JSON
        #[arg(long)]
        field: Option<PathBuf>,
    },

    /// Write an example nested configuration to get started from
    Example {
        /// Output path for the JSON configuration
        output: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // A bare configuration path is shorthand for `run`
    let mut argv: Vec<String> = std::env::args().collect();
    if argv.len() > 1 && argv[1].ends_with(".json") {
        argv.insert(1, "run".to_string());
    }
    let args = Args::parse_from(argv);

    let result = match args.command {
        Command::Run { config, density, png, field, report } => {
            cmd_run(config, density, png, field, report)
        }
        Command::Info { config } => cmd_info(config),
        Command::Query { config, lat, lon } => cmd_query(config, lat, lon),
        Command::Uniform { resolution, density, field } => cmd_uniform(resolution, density, field),
        Command::Example { output } => cmd_example(output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_run(
    config_path: PathBuf,
    density: Option<f64>,
    png: Option<PathBuf>,
    field_path: Option<PathBuf>,
    report: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let mut config = Configuration::load(&config_path)?;
    if let Some(density) = density {
        config = config.with_grid_density(density)?;
    }

    println!("Configuration: {}", config_path.display());
    if let Some(name) = &config.name {
        println!("Name: {}", name);
    }
    println!(
        "Background: {} km | Regions: {} | Grid density: {} deg",
        config.background_resolution(),
        config.regions().len(),
        config.grid_density()
    );

    println!("Synthesizing cell-width field...");
    let start = Instant::now();
    let field = synthesize(&config)?;
    println!("Done in {:?}", start.elapsed());
    println!("\n{}", field.summary());

    if let Some(path) = png {
        export::export_png(&field, &path)?;
        println!("PNG written to {}", path.display());
    }
    if let Some(path) = field_path {
        export::export_json(&config, &field, &path)?;
        println!("Field written to {}", path.display());
    }
    if let Some(path) = report {
        export::export_report(&config, &field, &path)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn cmd_info(config_path: PathBuf) -> Result<(), Box<dyn Error>> {
    let config = Configuration::load(&config_path)?;

    println!("Configuration: {} (valid)", config_path.display());
    if let Some(description) = &config.description {
        println!("Description: {}", description);
    }
    println!("Background resolution: {} km", config.background_resolution());
    println!("Grid density: {} deg", config.grid_density());
    println!("Finest resolution: {} km", config.finest_resolution());
    println!();

    let mut out = std::io::stdout().lock();
    export::write_hierarchy(&mut out, &config)?;
    for note in &config.notes {
        println!("  note: {}", note);
    }
    Ok(())
}

fn cmd_query(config_path: PathBuf, lat: f64, lon: f64) -> Result<(), Box<dyn Error>> {
    if !LatLon::new(lat, lon).is_valid() {
        return Err(format!("point ({}, {}) is off the globe", lat, lon).into());
    }
    let config = Configuration::load(&config_path)?;

    println!("Point: ({}, {})", lat, lon);
    println!("Cell width: {:.3} km", resolution_at(&config, lat, lon));
    match controlling_region_at(&config, lat, lon) {
        Some(region) => println!(
            "Set by: {} [{}], core {} km, {:.1} km from its boundary",
            region.name(),
            region.kind(),
            region.resolution(),
            region.signed_distance_km(&SamplePoint::new(lat, lon))
        ),
        None => println!("Set by: background ({} km)", config.background_resolution()),
    }
    Ok(())
}

fn cmd_uniform(resolution: f64, density: f64, field_path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let config = Configuration::uniform(resolution)?.with_grid_density(density)?;
    println!("Generating {} km uniform field...", resolution);
    let field = synthesize(&config)?;
    println!("\n{}", field.summary());

    if let Some(path) = field_path {
        export::export_json(&config, &field, &path)?;
        println!("Field written to {}", path.display());
    }
    Ok(())
}

fn cmd_example(output: PathBuf) -> Result<(), Box<dyn Error>> {
    let file: ConfigFile = serde_json::from_str(EXAMPLE_CONFIG)?;
    // Validate before writing so the example is known-good
    let config = Configuration::from_file_form(&file)?;
    config.save(&output)?;
    println!("Example configuration written to {}", output.display());
    println!("Run it with: varres_grid {}", output.display());
    Ok(())
}

const EXAMPLE_CONFIG: &str = r#"{
    "name": "goias_nested",
    "description": "Multi-resolution nested grid for Goias State, Brazil",
    "background_resolution": 30.0,
    "grid_density": 0.5,
    "regions": [
        {
            "name": "Regional_Buffer",
            "type": "polygon",
            "description": "5 km square buffer zone around Goias",
            "polygon": [[-10.0, -54.0], [-10.0, -45.0], [-20.0, -45.0], [-20.0, -54.0]],
            "resolution": 5.0,
            "transition_start": 30.0
        },
        {
            "name": "Goias_State",
            "type": "circle",
            "description": "3 km covering the whole state",
            "center": [-15.93, -49.86],
            "radius": 350.0,
            "resolution": 3.0,
            "transition_start": 5.0
        },
        {
            "name": "Goiania_Metro",
            "type": "circle",
            "description": "1 km for the Goiania metropolitan area",
            "center": [-16.68, -49.25],
            "radius": 50.0,
            "resolution": 1.0,
            "transition_start": 3.0
        }
    ],
    "notes": [
        "Grid density of 0.5 for fast computation (use 0.05 for production)"
    ]
}"#;
