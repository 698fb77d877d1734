//! Terrain generation module.
//!
//! Turns a [`TerrainParams`] set into a [`HeightField`] by combining
//! multi-octave detail noise with a per-landform mask.

mod heightmap;
mod landform;
mod params;

pub use heightmap::{generate_heightfield, sample_cell, HeightField};
pub use landform::{CellSample, Landform, LandformParseError, MaskContext};
pub use params::{TerrainError, TerrainParams, MAX_RESOLUTION, SHAPE_SEED_OFFSET};
