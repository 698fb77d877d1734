//! Landform archetypes and their height masks.
//!
//! Each landform is a closed-form function of the cell's normalized detail
//! height, its radial distances, and the shape-warp noise source. The mask
//! result is a normalized height, roughly in [0, 1]; it is scaled to
//! millimetres by the height-field generator.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::noise::SeededNoise;

/// Error returned when parsing an unknown landform name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown landform '{0}' (expected one of: {list})", list = Landform::slugs().join(", "))]
pub struct LandformParseError(pub String);

/// Terrain archetype selecting the height mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landform {
    /// Single landmass with an organic coastline.
    #[default]
    Island,
    /// Scattered islets inside a radial falloff.
    Archipelago,
    /// Land on one side of a wavy shoreline, sea on the other.
    Bay,
    /// Tapering finger of land reaching into the sea.
    Cape,
    /// Bulbous landmass joined to one edge by a strip.
    Peninsula,
    /// V-shaped channel along a wobbling path.
    Valley,
    /// Flat-topped table with steep edges.
    Plateau,
    /// Single sharp peak.
    Mountain,
    /// Ridge band along a wobbling path.
    Range,
    /// U-shaped trough with a flat floor.
    GlacialValley,
    /// Rolling land dotted with flat-floored depressions.
    Lakes,
    /// Narrow land bridge between two wider masses.
    Isthmus,
    /// Plateau cut by a narrow trench.
    Canyon,
    /// Cone with a crater at the apex.
    Volcano,
}

impl Landform {
    /// Returns all landforms in display order.
    pub const fn all() -> [Landform; 14] {
        [
            Landform::Island,
            Landform::Archipelago,
            Landform::Bay,
            Landform::Cape,
            Landform::Peninsula,
            Landform::Valley,
            Landform::Plateau,
            Landform::Mountain,
            Landform::Range,
            Landform::GlacialValley,
            Landform::Lakes,
            Landform::Isthmus,
            Landform::Canyon,
            Landform::Volcano,
        ]
    }

    /// Returns the machine-readable name (e.g. "glacial_valley").
    pub const fn slug(self) -> &'static str {
        match self {
            Landform::Island => "island",
            Landform::Archipelago => "archipelago",
            Landform::Bay => "bay",
            Landform::Cape => "cape",
            Landform::Peninsula => "peninsula",
            Landform::Valley => "valley",
            Landform::Plateau => "plateau",
            Landform::Mountain => "mountain",
            Landform::Range => "range",
            Landform::GlacialValley => "glacial_valley",
            Landform::Lakes => "lakes",
            Landform::Isthmus => "isthmus",
            Landform::Canyon => "canyon",
            Landform::Volcano => "volcano",
        }
    }

    /// Returns the human-readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Landform::Island => "Island",
            Landform::Archipelago => "Archipelago",
            Landform::Bay => "Bay",
            Landform::Cape => "Cape",
            Landform::Peninsula => "Peninsula",
            Landform::Valley => "Valley",
            Landform::Plateau => "Plateau / Mesa",
            Landform::Mountain => "Mountain",
            Landform::Range => "Mountain Range",
            Landform::GlacialValley => "Glacial Valley (U)",
            Landform::Lakes => "Lake System",
            Landform::Isthmus => "Isthmus",
            Landform::Canyon => "Canyon",
            Landform::Volcano => "Volcano",
        }
    }

    fn slugs() -> Vec<&'static str> {
        Self::all().iter().map(|l| l.slug()).collect()
    }

    /// Applies this landform's mask to a sampled cell.
    ///
    /// Returns the masked normalized height. The result is not clamped:
    /// some masks overshoot 1.0 and fractional powers of a negative detail
    /// height yield NaN, both of which the caller handles.
    pub fn apply_mask(self, cell: &CellSample, ctx: &MaskContext<'_>) -> f64 {
        let CellSample {
            nx,
            ny,
            dnx,
            dny,
            dist,
            warped_dist,
            h,
        } = *cell;
        let distortion = ctx.distortion;
        let shape = ctx.shape;
        let seed = ctx.seed;

        match self {
            Landform::Island => {
                let mask = (1.0 - warped_dist * 1.4).max(0.0);
                h.powf(0.7) * mask
            }
            Landform::Archipelago => {
                let islet = ((shape.sample_2d(dnx * 6.0, dny * 6.0) + 1.0) / 2.0).powf(2.0);
                let mask = (1.0 - dist * 1.3).max(0.0);
                if islet > 0.55 - distortion * 0.2 {
                    (islet - 0.3) * 2.5 * h * mask
                } else {
                    0.0
                }
            }
            Landform::Bay => {
                let shoreline = 0.4 + shape.sample_2d(ny * 2.0, 0.0) * distortion * 0.3;
                let mask = if nx > shoreline {
                    ((nx - shoreline) * 6.0).min(1.0)
                } else {
                    0.0
                };
                h * mask
            }
            Landform::Cape => {
                let centerline = 0.5 + shape.sample_2d(nx * 2.0, seed) * distortion * 0.2;
                let taper = (0.75 - nx).max(0.0).powf(1.2);
                let width = taper * (0.3 + distortion * 0.1);
                let mask = (1.0 - (ny - centerline).abs() / width).max(0.0);
                h * mask * (1.0 - nx * 0.6)
            }
            Landform::Peninsula => {
                let cx = 0.4 + distortion * 0.1;
                let cy = 0.5 + shape.sample_2d(seed, 0.0) * 0.1;
                let blob_dist =
                    ((dnx - cx).powf(2.0) + (dny - cy).powf(2.0) * 0.8).sqrt() * 2.5;
                let blob = (1.0 - blob_dist).max(0.0);
                // Strip joining the blob to the nx = 0 edge.
                let strip_width = 0.2 + distortion * 0.1;
                let strip = if nx < 0.4 {
                    (1.0 - (ny - cy).abs() / strip_width).max(0.0)
                } else {
                    0.0
                };
                h.powf(0.8) * blob.max(strip)
            }
            Landform::Plateau => {
                let bx = (dnx - 0.5).abs() * 2.0;
                let by = (dny - 0.5).abs() * 2.0;
                let mask = (1.0 - bx.max(by).powf(10.0)).max(0.0);
                let lifted = (h * 0.15 + 0.85) * mask;
                if lifted > 0.7 {
                    0.7 + (lifted - 0.7) * 0.05
                } else {
                    lifted
                }
            }
            Landform::Valley => {
                let path = 0.5 + shape.sample_2d(nx * 1.2, seed) * distortion * 0.4;
                let channel = (ny - path).abs().powf(0.7) * 2.5;
                h * channel.min(1.0)
            }
            Landform::Mountain => {
                let peak = (1.0 - warped_dist * 1.6).max(0.0);
                h.powf(0.4) * peak.powf(2.0)
            }
            Landform::Range => {
                let path = 0.5 + shape.sample_2d(nx * 1.5, seed) * distortion * 0.4;
                let ridge = (1.0 - (ny - path).abs() * 4.0).max(0.0);
                h.powf(0.5) * ridge
            }
            Landform::GlacialValley => {
                let path = 0.5 + shape.sample_2d(nx, seed) * distortion * 0.2;
                let trough = ((ny - path).abs() * 2.5).powf(2.0);
                (h * 0.3 + 0.7) * trough.min(1.0)
            }
            Landform::Lakes => {
                let lake = shape.sample_2d(dnx * 4.0, dny * 4.0);
                let threshold = -0.15 - distortion * 0.2;
                let land = if lake < threshold {
                    0.02
                } else {
                    h * 0.4 + (lake - threshold)
                };
                land * (1.0 - dist * 0.5)
            }
            Landform::Isthmus => {
                let bridge_y = 0.5 + (nx * PI).sin() * (distortion * 0.2);
                let bridge_width = 0.05 + (nx - 0.5).powf(2.0) * 2.8;
                let mask = (1.0 - (ny - bridge_y).abs() / bridge_width).max(0.0);
                h * mask
            }
            Landform::Canyon => {
                let table = 0.85 + h * 0.15;
                let path = 0.5 + shape.sample_2d(nx * 2.0, seed) * distortion * 0.4;
                let width = 0.07 + distortion * 0.05;
                let offset = (ny - path).abs();
                let cut = if offset < width {
                    (offset / width).powf(0.5)
                } else {
                    1.0
                };
                let edge = ((nx - 0.5).abs() * 2.0).max((ny - 0.5).abs() * 2.0);
                let mask = (1.0 - edge.powf(20.0)).max(0.0);
                table * cut * mask
            }
            Landform::Volcano => {
                let cone = (1.0 - warped_dist * 1.4).max(0.0).powf(1.6);
                let crater_radius = 0.13 + distortion * 0.05;
                let crater = if warped_dist < crater_radius {
                    (warped_dist / crater_radius).powf(2.8)
                } else {
                    1.0
                };
                cone * crater + (h * 0.15 * cone)
            }
        }
    }
}

impl fmt::Display for Landform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Landform {
    type Err = LandformParseError;

    /// Accepts the slug, or the label ignoring case, spaces and hyphens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Landform::all()
            .into_iter()
            .find(|l| l.slug() == wanted || normalize_name(l.label()) == wanted)
            .ok_or_else(|| LandformParseError(s.to_string()))
    }
}

fn normalize_name(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Per-cell inputs to a landform mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSample {
    /// Normalized grid coordinate along x, in [0, 1].
    pub nx: f64,
    /// Normalized grid coordinate along z, in [0, 1].
    pub ny: f64,
    /// `nx` displaced by the shape warp.
    pub dnx: f64,
    /// `ny` displaced by the shape warp.
    pub dny: f64,
    /// Radial distance from the centre, 1.0 at the edge midpoints.
    pub dist: f64,
    /// Radial distance of the warped coordinate.
    pub warped_dist: f64,
    /// Detail noise remapped with `(sum + 1) / 2`.
    pub h: f64,
}

/// Generation-wide state shared by every mask evaluation.
#[derive(Debug, Clone, Copy)]
pub struct MaskContext<'a> {
    /// Shape-warp noise source (seeded with `seed + 999`).
    pub shape: &'a SeededNoise,
    /// Shape-warp strength.
    pub distortion: f64,
    /// The generator seed, used as a fixed noise coordinate by path masks.
    pub seed: f64,
}

impl<'a> MaskContext<'a> {
    pub fn new(shape: &'a SeededNoise, distortion: f64, seed: i64) -> Self {
        Self {
            shape,
            distortion,
            seed: seed as f64,
        }
    }
}
