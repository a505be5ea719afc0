//! Field export for downstream tools.
//!
//! - PNG: equirectangular image of the field (north up), log-scaled colours
//! - JSON: axes, row-major values and statistics for a mesh-generation step
//! - Text report: configuration hierarchy plus field statistics

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;
use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::config::Configuration;
use crate::error::Result;
use crate::field::{FieldStats, ResolutionField};

/// Export the field as a PNG, one pixel per sample, north at the top.
/// Finest cells are dark blue, coarsest dark red.
pub fn export_png<P: AsRef<Path>>(field: &ResolutionField, path: P) -> std::result::Result<(), image::ImageError> {
    let (width, height) = (field.width(), field.height());
    let mut img: RgbImage = ImageBuffer::new(width as u32, height as u32);

    let (min, max) = (field.min(), field.max());
    let log_range = (max / min).ln();

    for row in 0..height {
        // Row 0 of the image is the northernmost latitude
        let values = field.row(height - 1 - row);
        for (col, &w) in values.iter().enumerate() {
            let t = if log_range > 0.0 { ((w / min).ln() / log_range) as f32 } else { 0.0 };
            img.put_pixel(col as u32, row as u32, Rgb(spectral_colormap(t.clamp(0.0, 1.0))));
        }
    }

    img.save(path)
}

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f32) -> [u8; 3] {
    let colors: [[f32; 3]; 11] = [
        [0.37, 0.31, 0.64],
        [0.20, 0.53, 0.74],
        [0.40, 0.76, 0.65],
        [0.67, 0.87, 0.64],
        [0.90, 0.96, 0.60],
        [1.00, 1.00, 0.75],
        [1.00, 0.88, 0.55],
        [0.99, 0.68, 0.38],
        [0.96, 0.43, 0.26],
        [0.84, 0.24, 0.31],
        [0.62, 0.00, 0.26],
    ];

    let t_scaled = t * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f32;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}

#[derive(Serialize)]
struct FieldExport<'a> {
    generated: String,
    name: Option<&'a str>,
    background_resolution: f64,
    grid_density: f64,
    stats: &'a FieldStats,
    lats: &'a [f64],
    lons: &'a [f64],
    /// Row-major, one row per latitude
    cell_width: &'a [f64],
}

/// Export the field with its axes and statistics as JSON.
pub fn export_json<P: AsRef<Path>>(config: &Configuration, field: &ResolutionField, path: P) -> Result<()> {
    let export = FieldExport {
        generated: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        name: config.name.as_deref(),
        background_resolution: config.background_resolution(),
        grid_density: config.grid_density(),
        stats: field.stats(),
        lats: field.lats(),
        lons: field.lons(),
        cell_width: field.values(),
    };

    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, &export)?;
    Ok(())
}

/// Write a plain-text report of the configuration and resulting field.
pub fn write_report<W: Write>(out: &mut W, config: &Configuration, field: &ResolutionField) -> std::io::Result<()> {
    writeln!(out, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    if let Some(name) = &config.name {
        writeln!(out, "Name: {}", name)?;
    }
    if let Some(description) = &config.description {
        writeln!(out, "Description: {}", description)?;
    }
    writeln!(out, "Background resolution: {} km", config.background_resolution())?;
    writeln!(out, "Grid density: {} deg", config.grid_density())?;
    writeln!(out)?;

    write_hierarchy(out, config)?;
    writeln!(out)?;
    writeln!(out, "{}", field.summary())?;
    Ok(())
}

/// Regions from finest to coarsest, one block each.
pub fn write_hierarchy<W: Write>(out: &mut W, config: &Configuration) -> std::io::Result<()> {
    writeln!(out, "Resolution hierarchy (finest first):")?;
    let hierarchy = config.resolution_hierarchy();
    if hierarchy.is_empty() {
        writeln!(out, "  (no regions, uniform {} km)", config.background_resolution())?;
    }

    for (i, region) in hierarchy.iter().enumerate() {
        let params = region.params();
        writeln!(out, "  {}. {} [{}]", i + 1, region.name(), region.kind())?;
        writeln!(out, "     Resolution: {} km", params.resolution)?;
        writeln!(
            out,
            "     Transition: {} km wide, to {} km",
            params.transition_width,
            config.background_resolution()
        )?;
        match region {
            crate::region::Region::Circular(c) => {
                writeln!(out, "     Center: ({}, {}), radius {} km", c.center.lat, c.center.lon, c.radius_km)?;
            }
            crate::region::Region::Polygon(p) => {
                writeln!(out, "     Vertices: {}", p.vertex_count())?;
            }
        }
        if let Some(description) = &params.description {
            writeln!(out, "     {}", description)?;
        }
    }
    Ok(())
}

/// Write the report to a file.
pub fn export_report<P: AsRef<Path>>(config: &Configuration, field: &ResolutionField, path: P) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_report(&mut writer, config, field)?;
    writer.flush()
}
