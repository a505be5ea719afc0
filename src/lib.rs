//! Variable-resolution cell-width field synthesis
//!
//! Builds the sizing function for spherical mesh generators: a background
//! resolution refined by circular and polygonal regions, blended smoothly
//! and combined so the finest request always wins.

pub mod cache;
pub mod combiner;
pub mod config;
pub mod error;
pub mod export;
pub mod field;
pub mod geo;
pub mod grid;
pub mod region;
pub mod synth;
pub mod transition;

pub use config::Configuration;
pub use error::{GridError, Result};
pub use field::ResolutionField;
pub use region::{Region, RegionParams};
pub use synth::synthesize;
