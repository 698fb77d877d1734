//! Height-field generation from layered noise and landform masks.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::landform::{CellSample, MaskContext};
use super::params::{TerrainError, TerrainParams};
use crate::noise::{sample_fractal_noise, FractalNoiseConfig, SeededNoise};

/// Amplitude of the shape warp at `distortion = 1`.
const WARP_AMPLITUDE: f64 = 0.3;

/// Frequency at which the shape warp is sampled.
const WARP_FREQUENCY: f64 = 2.0;

/// A square grid of vertex heights in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightField {
    /// Grid segments per side.
    pub resolution: u32,
    /// `(resolution + 1)^2` heights, row-major with the x index `i` as row.
    pub heights: Vec<f32>,
}

impl HeightField {
    /// Creates a field with every vertex at `height`.
    pub fn flat(resolution: u32, height: f32) -> Self {
        let side = resolution as usize + 1;
        Self {
            resolution,
            heights: vec![height; side * side],
        }
    }

    /// Creates a field by evaluating `f(i, j)` at every vertex.
    pub fn from_fn(resolution: u32, mut f: impl FnMut(u32, u32) -> f32) -> Self {
        let mut field = Self::flat(resolution, 0.0);
        for i in 0..=resolution {
            for j in 0..=resolution {
                let idx = field.index(i, j);
                field.heights[idx] = f(i, j);
            }
        }
        field
    }

    /// Number of vertices along one side.
    pub fn side(&self) -> u32 {
        self.resolution + 1
    }

    /// Total number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.heights.len()
    }

    /// Flat index of vertex `(i, j)`.
    #[inline]
    pub fn index(&self, i: u32, j: u32) -> usize {
        debug_assert!(i <= self.resolution && j <= self.resolution);
        i as usize * self.side() as usize + j as usize
    }

    /// Returns the height at vertex `(i, j)`.
    ///
    /// # Panics
    /// Panics if `i` or `j` exceeds the resolution.
    pub fn get(&self, i: u32, j: u32) -> f32 {
        self.heights[self.index(i, j)]
    }

    /// Returns the minimum height.
    pub fn min_height(&self) -> f32 {
        self.heights.iter().cloned().fold(f32::MAX, f32::min)
    }

    /// Returns the maximum height.
    pub fn max_height(&self) -> f32 {
        self.heights.iter().cloned().fold(f32::MIN, f32::max)
    }

    /// Returns (min, max) height range.
    pub fn height_range(&self) -> (f32, f32) {
        (self.min_height(), self.max_height())
    }

    /// Iterates over all `(i, j)` vertex coordinates in storage order.
    pub fn coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let res = self.resolution;
        (0..=res).flat_map(move |i| (0..=res).map(move |j| (i, j)))
    }
}

/// Generates the height field described by `params`.
///
/// Vertices are independent of each other, so they are evaluated in
/// parallel; the result is identical to a sequential walk.
#[tracing::instrument(skip_all, fields(landform = %params.landform, resolution = params.resolution, seed = params.seed))]
pub fn generate_heightfield(params: &TerrainParams) -> Result<HeightField, TerrainError> {
    params.validate()?;

    let detail = SeededNoise::new(params.seed);
    let shape = SeededNoise::new(params.shape_seed());
    let octaves = FractalNoiseConfig::terrain_detail(params.noise_scale, params.roughness);
    let ctx = MaskContext::new(&shape, params.distortion, params.seed);

    let mut field = HeightField::flat(params.resolution, 0.0);
    let side = field.side() as usize;
    let resolution = params.resolution;

    field.heights.par_iter_mut().enumerate().for_each(|(idx, height)| {
        let i = (idx / side) as u32;
        let j = (idx % side) as u32;
        let cell = sample_cell(i, j, resolution, &detail, &octaves, &ctx);
        *height = finish_height(params.landform.apply_mask(&cell, &ctx), params);
    });

    let (min, max) = field.height_range();
    debug!(vertices = field.vertex_count(), min, max, "height field generated");

    Ok(field)
}

/// Computes the mask inputs for vertex `(i, j)`.
pub fn sample_cell(
    i: u32,
    j: u32,
    resolution: u32,
    detail: &SeededNoise,
    octaves: &FractalNoiseConfig,
    ctx: &MaskContext<'_>,
) -> CellSample {
    let nx = i as f64 / resolution as f64;
    let ny = j as f64 / resolution as f64;

    let dx = nx - 0.5;
    let dy = ny - 0.5;
    let dist = (dx * dx + dy * dy).sqrt() * 2.0;

    let warp = ctx.distortion * WARP_AMPLITUDE;
    let dnx = nx + ctx.shape.sample_2d(nx * WARP_FREQUENCY, ny * WARP_FREQUENCY) * warp;
    let dny = ny + ctx.shape.sample_2d(ny * WARP_FREQUENCY, nx * WARP_FREQUENCY) * warp;
    let warped_dist = ((dnx - 0.5).powf(2.0) + (dny - 0.5).powf(2.0)).sqrt() * 2.0;

    let h = (sample_fractal_noise(detail, nx, ny, octaves) + 1.0) / 2.0;

    CellSample {
        nx,
        ny,
        dnx,
        dny,
        dist,
        warped_dist,
        h,
    }
}

/// Scales a masked height to millimetres above the base.
///
/// Negative and NaN mask values are floored to zero so no vertex sinks
/// below `base_thickness`. There is no upper clamp.
fn finish_height(masked: f64, params: &TerrainParams) -> f32 {
    (masked.max(0.0) * params.max_height + params.base_thickness) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Landform;

    fn scenario() -> TerrainParams {
        TerrainParams {
            landform: Landform::Island,
            size: 100.0,
            max_height: 25.0,
            resolution: 4,
            noise_scale: 4.0,
            roughness: 0.5,
            distortion: 0.4,
            seed: 42,
            base_thickness: 3.0,
        }
    }

    #[test]
    fn test_flat_field() {
        let field = HeightField::flat(3, 2.5);
        assert_eq!(field.vertex_count(), 16);
        assert_eq!(field.height_range(), (2.5, 2.5));
    }

    #[test]
    fn test_index_is_row_major_in_i() {
        let field = HeightField::from_fn(2, |i, j| (i * 10 + j) as f32);
        assert_eq!(field.get(0, 2), 2.0);
        assert_eq!(field.get(2, 0), 20.0);
        assert_eq!(field.heights[field.index(1, 1)], 11.0);
    }

    #[test]
    fn test_coords_iterator() {
        let field = HeightField::flat(2, 0.0);
        let coords: Vec<_> = field.coords().collect();
        assert_eq!(coords.len(), 9);
        assert_eq!(coords[0], (0, 0));
        assert_eq!(coords[1], (0, 1));
        assert_eq!(coords[3], (1, 0));
        assert_eq!(coords[8], (2, 2));
    }

    #[test]
    fn test_scenario_vertex_count_and_range() {
        let field = generate_heightfield(&scenario()).unwrap();
        assert_eq!(field.vertex_count(), 25);

        for &h in &field.heights {
            assert!((3.0..=28.0).contains(&h), "Height {} outside [3, 28]", h);
        }
    }

    #[test]
    fn test_heightfield_reproducibility() {
        let params = TerrainParams {
            resolution: 24,
            noise_scale: 3.3,
            seed: 999,
            ..Default::default()
        };

        let a = generate_heightfield(&params).unwrap();
        let b = generate_heightfield(&params).unwrap();
        assert_eq!(a, b, "Same parameters should produce identical heights");
    }

    #[test]
    fn test_matches_sequential_evaluation() {
        let params = TerrainParams {
            landform: Landform::Canyon,
            resolution: 9,
            noise_scale: 2.7,
            ..Default::default()
        };
        let field = generate_heightfield(&params).unwrap();

        let detail = SeededNoise::new(params.seed);
        let shape = SeededNoise::new(params.shape_seed());
        let octaves = FractalNoiseConfig::terrain_detail(params.noise_scale, params.roughness);
        let ctx = MaskContext::new(&shape, params.distortion, params.seed);

        for (i, j) in field.coords() {
            let cell = sample_cell(i, j, params.resolution, &detail, &octaves, &ctx);
            let expected = finish_height(params.landform.apply_mask(&cell, &ctx), &params);
            assert_eq!(field.get(i, j), expected);
        }
    }

    #[test]
    fn test_height_floor_for_every_landform() {
        for landform in Landform::all() {
            for seed in [0, 7, 31337] {
                let params = TerrainParams {
                    landform,
                    resolution: 16,
                    noise_scale: 3.1,
                    roughness: 0.9,
                    seed,
                    base_thickness: 2.0,
                    ..Default::default()
                };
                let field = generate_heightfield(&params).unwrap();
                assert!(
                    field.min_height() >= 2.0,
                    "{:?} seed {} dipped to {}",
                    landform,
                    seed,
                    field.min_height()
                );
            }
        }
    }

    #[test]
    fn test_zero_height_and_thickness_is_flat_zero() {
        for landform in Landform::all() {
            let params = TerrainParams {
                landform,
                resolution: 8,
                noise_scale: 2.3,
                max_height: 0.0,
                base_thickness: 0.0,
                ..Default::default()
            };
            let field = generate_heightfield(&params).unwrap();
            assert!(field.heights.iter().all(|&h| h == 0.0), "{:?} not flat", landform);
        }
    }

    #[test]
    fn test_zero_distortion_disables_warp() {
        let shape = SeededNoise::new(1041);
        let detail = SeededNoise::new(42);
        let octaves = FractalNoiseConfig::default();
        let ctx = MaskContext::new(&shape, 0.0, 42);

        let cell = sample_cell(3, 5, 8, &detail, &octaves, &ctx);
        assert_eq!(cell.dnx, cell.nx);
        assert_eq!(cell.dny, cell.ny);
        assert!((cell.warped_dist - cell.dist).abs() < 1e-12);
    }

    #[test]
    fn test_different_seeds_change_terrain() {
        let a = generate_heightfield(&TerrainParams {
            resolution: 16,
            noise_scale: 3.3,
            seed: 1,
            ..Default::default()
        })
        .unwrap();
        let b = generate_heightfield(&TerrainParams {
            resolution: 16,
            noise_scale: 3.3,
            seed: 2,
            ..Default::default()
        })
        .unwrap();
        assert_ne!(a.heights, b.heights);
    }

    #[test]
    fn test_rejects_invalid_params() {
        let params = TerrainParams {
            resolution: 0,
            ..Default::default()
        };
        assert_eq!(generate_heightfield(&params), Err(TerrainError::InvalidResolution(0)));
    }
}
