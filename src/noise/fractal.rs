//! Multi-octave fractal Brownian motion (fBm) noise sampling.

use serde::{Deserialize, Serialize};

use super::SeededNoise;

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves.
    pub octaves: u8,
    /// Base frequency of the first octave.
    pub frequency: f64,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f64,
    /// Amplitude multiplier per octave (the terrain's roughness).
    pub persistence: f64,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            frequency: 4.0,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

impl FractalNoiseConfig {
    /// Creates the four-octave detail configuration used for landform terrain.
    pub fn terrain_detail(noise_scale: f64, roughness: f64) -> Self {
        Self {
            frequency: noise_scale,
            persistence: roughness,
            ..Default::default()
        }
    }

    /// Returns the sum of all octave amplitudes.
    pub fn amplitude_sum(&self) -> f64 {
        let mut amplitude = 1.0;
        let mut total = 0.0;
        for _ in 0..self.octaves {
            total += amplitude;
            amplitude *= self.persistence;
        }
        total
    }
}

/// Samples fractal noise at `(x, y)`.
///
/// Octave amplitudes start at 1.0 and are scaled by `persistence` each
/// step. The sum is returned as-is, not divided by [`FractalNoiseConfig::amplitude_sum`];
/// callers that remap it to [0, 1] rely on that raw distribution.
pub fn sample_fractal_noise(noise: &SeededNoise, x: f64, y: f64, config: &FractalNoiseConfig) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = config.frequency;

    for _ in 0..config.octaves {
        total += noise.sample_2d(x * frequency, y * frequency) * amplitude;
        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FractalNoiseConfig::default();
        assert_eq!(config.octaves, 4);
        assert_eq!(config.lacunarity, 2.0);
        assert_eq!(config.persistence, 0.5);
    }

    #[test]
    fn test_terrain_detail_config() {
        let config = FractalNoiseConfig::terrain_detail(3.5, 0.6);
        assert_eq!(config.octaves, 4);
        assert_eq!(config.frequency, 3.5);
        assert_eq!(config.persistence, 0.6);
    }

    #[test]
    fn test_amplitude_sum() {
        let config = FractalNoiseConfig::default();
        assert!((config.amplitude_sum() - 1.875).abs() < 1e-12);
    }

    #[test]
    fn test_fractal_reproducibility() {
        let noise = SeededNoise::new(12345);
        let config = FractalNoiseConfig::default();

        let result1 = sample_fractal_noise(&noise, 0.31, 0.72, &config);
        let result2 = sample_fractal_noise(&noise, 0.31, 0.72, &config);

        assert_eq!(result1, result2, "Same seed and position should produce same result");
    }

    #[test]
    fn test_single_octave_matches_base_noise() {
        let noise = SeededNoise::new(5);
        let config = FractalNoiseConfig {
            octaves: 1,
            frequency: 3.0,
            ..Default::default()
        };

        let fractal = sample_fractal_noise(&noise, 0.4, 0.9, &config);
        assert_eq!(fractal, noise.sample_2d(0.4 * 3.0, 0.9 * 3.0));
    }

    #[test]
    fn test_integer_lattice_octaves_vanish() {
        // With an integer base frequency every octave lands on the lattice at
        // quarter-step coordinates, where gradient noise is zero.
        let noise = SeededNoise::new(42);
        let config = FractalNoiseConfig::terrain_detail(4.0, 0.5);
        for k in 0..=4 {
            let t = k as f64 / 4.0;
            assert_eq!(sample_fractal_noise(&noise, t, 1.0 - t, &config), 0.0);
        }
    }

    #[test]
    fn test_fractal_range_bounded_by_amplitude() {
        let noise = SeededNoise::new(77);
        let config = FractalNoiseConfig::terrain_detail(2.7, 0.55);
        let bound = config.amplitude_sum() + 1e-9;

        for i in 0..32 {
            for j in 0..32 {
                let value = sample_fractal_noise(&noise, i as f64 / 31.0, j as f64 / 31.0, &config);
                assert!(value.abs() <= bound, "Value {} exceeds amplitude sum {}", value, bound);
            }
        }
    }
}
