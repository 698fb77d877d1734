//! Grayscale heightmap images of a height field.
//!
//! Sample `(i, j)` lands at pixel column `i`, row `j`: the top view with +x
//! to the right and +z downward. Integer formats quantize heights linearly
//! over a [`HeightRange`]; the float format stores millimetres as-is.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;
use tracing::debug;

use crate::terrain::HeightField;

#[derive(Error, Debug)]
pub enum HeightmapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PNG encoding error: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Empty height range: {low} mm .. {high} mm")]
    EmptyRange { low: f32, high: f32 },
}

/// Sample layout of an exported heightmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightmapFormat {
    /// 16-bit grayscale PNG.
    #[default]
    Png16,
    /// Headerless 16-bit samples, little-endian (Unity terrain import).
    Raw16Le,
    /// Headerless 16-bit samples, big-endian.
    Raw16Be,
    /// Headerless 32-bit float millimetres, little-endian.
    Raw32,
}

impl HeightmapFormat {
    /// Conventional file suffix, including the extension.
    pub const fn suffix(self) -> &'static str {
        match self {
            HeightmapFormat::Png16 => "_height.png",
            HeightmapFormat::Raw16Le | HeightmapFormat::Raw16Be => "_height.r16",
            HeightmapFormat::Raw32 => "_height.r32",
        }
    }

    /// Exact byte size of a headerless export, `None` for PNG.
    pub fn raw_len(self, resolution: u32) -> Option<u64> {
        let samples = (resolution as u64 + 1).pow(2);
        match self {
            HeightmapFormat::Png16 => None,
            HeightmapFormat::Raw16Le | HeightmapFormat::Raw16Be => Some(samples * 2),
            HeightmapFormat::Raw32 => Some(samples * 4),
        }
    }
}

/// Heights mapped to black (`low`) and white (`high`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightRange {
    pub low: f32,
    pub high: f32,
}

impl HeightRange {
    /// The field's own min..max. A flat field is widened by 1 mm so it still
    /// quantizes (to black).
    pub fn of_field(field: &HeightField) -> Self {
        let (low, high) = field.height_range();
        Self {
            low,
            high: if high > low { high } else { low + 1.0 },
        }
    }

    /// Maps `height` onto `0..=u16::MAX`, saturating outside the range.
    pub fn quantize(&self, height: f32) -> u16 {
        let t = (height - self.low) / (self.high - self.low);
        (t.clamp(0.0, 1.0) * u16::MAX as f32) as u16
    }

    fn check(&self) -> Result<(), HeightmapError> {
        // Negated so NaN bounds are rejected too.
        if !(self.high > self.low) {
            return Err(HeightmapError::EmptyRange {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }
}

/// Writes `field` to `path` as a heightmap in `format`.
///
/// `range` is only consulted by the 16-bit formats.
pub fn export_heightmap(
    field: &HeightField,
    path: &Path,
    format: HeightmapFormat,
    range: HeightRange,
) -> Result<(), HeightmapError> {
    if format != HeightmapFormat::Raw32 {
        range.check()?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    match format {
        HeightmapFormat::Png16 => write_png(field, range, out)?,
        HeightmapFormat::Raw16Le => {
            for h in pixel_order(field) {
                out.write_all(&range.quantize(h).to_le_bytes())?;
            }
        }
        HeightmapFormat::Raw16Be => {
            for h in pixel_order(field) {
                out.write_all(&range.quantize(h).to_be_bytes())?;
            }
        }
        HeightmapFormat::Raw32 => {
            for h in pixel_order(field) {
                out.write_all(&h.to_le_bytes())?;
            }
        }
    }

    debug!(path = %path.display(), ?format, side = field.side(), "heightmap written");
    Ok(())
}

/// Heights row by row in image order (row `j`, column `i`).
fn pixel_order(field: &HeightField) -> impl Iterator<Item = f32> + '_ {
    let side = field.side();
    (0..side).flat_map(move |j| (0..side).map(move |i| field.get(i, j)))
}

fn write_png<W: Write>(field: &HeightField, range: HeightRange, out: W) -> Result<(), HeightmapError> {
    let side = field.side();
    let pixels: Vec<u16> = pixel_order(field).map(|h| range.quantize(h)).collect();

    // L16 expects native-endian sample bytes.
    let bytes: &[u8] = bytemuck::cast_slice(&pixels);
    PngEncoder::new_with_quality(out, CompressionType::Best, FilterType::Adaptive).write_image(
        bytes,
        side,
        side,
        ExtendedColorType::L16,
    )?;
    Ok(())
}
