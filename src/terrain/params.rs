//! Terrain generation parameters and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Landform;

/// Largest accepted grid resolution (segments per side).
///
/// Keeps every vertex index of the solid mesh within `u32`.
pub const MAX_RESOLUTION: u32 = 8192;

/// Seed offset of the shape-warp noise source relative to the detail source.
pub const SHAPE_SEED_OFFSET: i64 = 999;

/// Errors raised when a parameter set cannot describe a valid solid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    #[error("Invalid resolution {0}: must be between 1 and {max}", max = MAX_RESOLUTION)]
    InvalidResolution(u32),
    #[error("Invalid size {0} mm: footprint must be positive and finite")]
    InvalidSize(f64),
    #[error("Invalid maximum height {0} mm: must be finite and not negative")]
    InvalidMaxHeight(f64),
    #[error("Invalid base thickness {0} mm: must be finite")]
    InvalidBaseThickness(f64),
}

/// Parameters for a single terrain generation request.
///
/// Lengths are in millimetres. Missing fields fall back to [`Default`] when
/// deserializing, so partial parameter files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TerrainParams {
    /// Landform archetype selecting the height mask.
    pub landform: Landform,
    /// Footprint edge length.
    pub size: f64,
    /// Vertical scale applied to the normalized height.
    pub max_height: f64,
    /// Grid segments per side; the grid has `(resolution + 1)^2` vertices.
    pub resolution: u32,
    /// Base spatial frequency of the detail noise.
    pub noise_scale: f64,
    /// Per-octave amplitude falloff, nominally in (0, 1).
    pub roughness: f64,
    /// Strength of the shape warp, nominally in [0, 1].
    pub distortion: f64,
    /// Generator seed.
    pub seed: i64,
    /// Solid thickness added under every vertex.
    pub base_thickness: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            landform: Landform::Island,
            size: 100.0,
            max_height: 25.0,
            resolution: 64,
            noise_scale: 4.0,
            roughness: 0.5,
            distortion: 0.4,
            seed: 42,
            base_thickness: 3.0,
        }
    }
}

impl TerrainParams {
    /// Creates default parameters for the given landform and seed.
    pub fn new(landform: Landform, seed: i64) -> Self {
        Self {
            landform,
            seed,
            ..Default::default()
        }
    }

    /// Checks the parameters that would otherwise produce a degenerate grid.
    ///
    /// Out-of-range roughness or distortion values are accepted; they only
    /// make the output more extreme.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.resolution < 1 || self.resolution > MAX_RESOLUTION {
            return Err(TerrainError::InvalidResolution(self.resolution));
        }
        // Negated comparisons also reject NaN.
        if !(self.size > 0.0 && self.size.is_finite()) {
            return Err(TerrainError::InvalidSize(self.size));
        }
        if !(self.max_height >= 0.0 && self.max_height.is_finite()) {
            return Err(TerrainError::InvalidMaxHeight(self.max_height));
        }
        if !self.base_thickness.is_finite() {
            return Err(TerrainError::InvalidBaseThickness(self.base_thickness));
        }
        Ok(())
    }

    /// Distance between neighbouring grid vertices.
    pub fn step(&self) -> f64 {
        self.size / self.resolution as f64
    }

    /// Half of the footprint edge length.
    pub fn half_size(&self) -> f64 {
        self.size / 2.0
    }

    /// Number of vertices along one side of the grid.
    pub fn grid_side(&self) -> usize {
        self.resolution as usize + 1
    }

    /// Seed of the shape-warp noise source.
    pub fn shape_seed(&self) -> i64 {
        self.seed.wrapping_add(SHAPE_SEED_OFFSET)
    }
}
