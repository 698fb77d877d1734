//! Noise generation module for terrain synthesis.
//!
//! Provides a seeded gradient noise source and multi-octave fractal sampling
//! on top of it.

mod fractal;
mod perlin;

pub use fractal::{sample_fractal_noise, FractalNoiseConfig};
pub use perlin::SeededNoise;
