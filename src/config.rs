//! Grid configuration: the file form and the validated model.
//!
//! The JSON file form mirrors what users write by hand:
//!
//! ```json
//! {
//!   "name": "goias",
//!   "background_resolution": 30.0,
//!   "grid_density": 0.5,
//!   "regions": [
//!     { "name": "Goias_State", "type": "circle", "center": [-15.93, -49.86],
//!       "radius": 350.0, "resolution": 3.0, "transition_start": 5.0 },
//!     { "name": "Buffer", "type": "polygon", "resolution": 5.0, "transition_width": 25.0,
//!       "polygon": [[-10.0, -54.0], [-10.0, -45.0], [-20.0, -45.0], [-20.0, -54.0]] }
//!   ]
//! }
//! ```
//!
//! Unknown keys (output directories, pipeline settings) are ignored.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::geo::LatLon;
use crate::region::{Region, RegionParams};

/// Grid spacing used when a file does not set `grid_density` (degrees)
pub const DEFAULT_GRID_DENSITY: f64 = 0.1;

fn default_grid_density() -> f64 {
    DEFAULT_GRID_DENSITY
}

// =============================================================================
// FILE FORM
// =============================================================================

/// Configuration document as read from or written to JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub background_resolution: f64,
    #[serde(default = "default_grid_density")]
    pub grid_density: f64,
    #[serde(default)]
    pub regions: Vec<RegionSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// One region entry of a [`ConfigFile`].
///
/// `transition_width` is a distance in km. `transition_start` is the older
/// way of sizing the band: given alone, the band is
/// `transition_start - resolution` km wide. Either way the band ends at the
/// background resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub name: String,
    pub resolution: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub shape: ShapeSpec,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeSpec {
    Circle {
        /// [lat, lon] in degrees
        center: [f64; 2],
        /// km
        radius: f64,
    },
    Polygon {
        /// [[lat, lon], ...] in degrees, implicitly closed
        polygon: Vec<[f64; 2]>,
    },
}

impl RegionSpec {
    /// Validate and build the region this entry describes.
    pub fn to_region(&self) -> Result<Region> {
        let width = match (self.transition_width, self.transition_start) {
            (Some(width), _) => width,
            (None, Some(start)) => {
                if start < self.resolution {
                    return Err(GridError::resolution(
                        &self.name,
                        format!(
                            "transition_start ({} km) must be >= resolution ({} km)",
                            start, self.resolution
                        ),
                    ));
                }
                start - self.resolution
            }
            (None, None) => 0.0,
        };

        let mut params = RegionParams::new(self.name.clone(), self.resolution, width);
        params.description = self.description.clone();

        match &self.shape {
            ShapeSpec::Circle { center, radius } => {
                Region::circle(params, LatLon::new(center[0], center[1]), *radius)
            }
            ShapeSpec::Polygon { polygon } => {
                let vertices = polygon.iter().map(|v| LatLon::new(v[0], v[1])).collect();
                Region::polygon(params, vertices)
            }
        }
    }

    /// File entry for an existing region.
    pub fn from_region(region: &Region) -> Self {
        let params = region.params();
        let shape = match region {
            Region::Circular(c) => ShapeSpec::Circle {
                center: [c.center.lat, c.center.lon],
                radius: c.radius_km,
            },
            Region::Polygon(p) => ShapeSpec::Polygon {
                polygon: p.vertices.iter().map(|v| [v.lat, v.lon]).collect(),
            },
        };

        Self {
            name: params.name.clone(),
            resolution: params.resolution,
            transition_width: Some(params.transition_width),
            transition_start: None,
            description: params.description.clone(),
            shape,
        }
    }
}

// =============================================================================
// VALIDATED MODEL
// =============================================================================

/// Validated background resolution, grid density and regions.
///
/// Every constructor validates eagerly; a `Configuration` that exists is
/// safe to synthesize.
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub notes: Vec<String>,
    background_resolution: f64,
    grid_density: f64,
    regions: Vec<Region>,
}

impl Configuration {
    pub fn new(background_resolution: f64, grid_density: f64, regions: Vec<Region>) -> Result<Self> {
        if !(background_resolution.is_finite() && background_resolution > 0.0) {
            return Err(GridError::InvalidBackgroundResolution(background_resolution));
        }
        if !(grid_density.is_finite() && grid_density > 0.0 && grid_density <= 90.0) {
            return Err(GridError::InvalidGridDensity(grid_density));
        }

        let mut seen = HashSet::new();
        for region in &regions {
            if !seen.insert(region.name()) {
                return Err(GridError::DuplicateRegionName(region.name().to_string()));
            }
            if region.resolution() > background_resolution {
                log::warn!(
                    "region '{}' resolution {} km is coarser than the background {} km; it will have no effect",
                    region.name(),
                    region.resolution(),
                    background_resolution
                );
            }
        }

        Ok(Self {
            name: None,
            description: None,
            author: None,
            notes: Vec::new(),
            background_resolution,
            grid_density,
            regions,
        })
    }

    /// A global field of constant `resolution` at the default density.
    pub fn uniform(resolution: f64) -> Result<Self> {
        Self::new(resolution, DEFAULT_GRID_DENSITY, Vec::new())
    }

    /// Same configuration sampled at a different density.
    pub fn with_grid_density(self, grid_density: f64) -> Result<Self> {
        let Configuration { name, description, author, notes, background_resolution, regions, .. } = self;
        let mut config = Self::new(background_resolution, grid_density, regions)?;
        config.name = name;
        config.description = description;
        config.author = author;
        config.notes = notes;
        Ok(config)
    }

    pub fn from_file_form(file: &ConfigFile) -> Result<Self> {
        let regions = file
            .regions
            .iter()
            .map(RegionSpec::to_region)
            .collect::<Result<Vec<_>>>()?;

        let mut config = Self::new(file.background_resolution, file.grid_density, regions)?;
        config.name = file.name.clone();
        config.description = file.description.clone();
        config.author = file.author.clone();
        config.notes = file.notes.clone();
        Ok(config)
    }

    pub fn to_file_form(&self) -> ConfigFile {
        ConfigFile {
            name: self.name.clone(),
            description: self.description.clone(),
            author: self.author.clone(),
            background_resolution: self.background_resolution,
            grid_density: self.grid_density,
            regions: self.regions.iter().map(RegionSpec::from_region).collect(),
            notes: self.notes.clone(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(json)?;
        Self::from_file_form(&file)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_file_form())?)
    }

    /// Load and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&contents)?;
        log::info!(
            "loaded configuration from {}: {} regions, background {} km",
            path.as_ref().display(),
            config.regions.len(),
            config.background_resolution
        );
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Hash of the full canonical content, used to key cached fields.
    ///
    /// Floats are hashed by bit pattern, so equal configurations always
    /// share a key.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    pub fn background_resolution(&self) -> f64 {
        self.background_resolution
    }

    pub fn grid_density(&self) -> f64 {
        self.grid_density
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Finest requested resolution anywhere (km).
    pub fn finest_resolution(&self) -> f64 {
        self.regions
            .iter()
            .map(Region::resolution)
            .fold(self.background_resolution, f64::min)
    }

    /// Regions sorted finest first (ties by name).
    pub fn resolution_hierarchy(&self) -> Vec<&Region> {
        let mut sorted: Vec<&Region> = self.regions.iter().collect();
        sorted.sort_by(|a, b| {
            a.resolution()
                .total_cmp(&b.resolution())
                .then_with(|| a.name().cmp(b.name()))
        });
        sorted
    }
}

impl Hash for Configuration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.description.hash(state);
        self.author.hash(state);
        self.notes.hash(state);
        self.background_resolution.to_bits().hash(state);
        self.grid_density.to_bits().hash(state);
        self.regions.len().hash(state);
        for region in &self.regions {
            region.hash(state);
        }
    }
}
