//! ASCII STL export for 3D printing.
//!
//! Writes one `facet` record per triangle of a [`SolidMesh`] in buffer
//! order (top, skirt, base), with coordinates fixed at four decimals. The
//! same mesh and options always produce byte-identical text.

use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::Vec3;
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use super::filename::solid_name;
use crate::mesh::{face_normal, SolidMesh};
use crate::terrain::TerrainParams;

/// Solid name used when none is derived from parameters.
pub const DEFAULT_SOLID_NAME: &str = "landgen";

/// Triangles formatted per parallel work unit.
const FACETS_PER_CHUNK: usize = 2048;

/// Approximate length of one formatted facet record, for capacity hints.
const FACET_BYTES_ESTIMATE: usize = 256;

/// Errors that can occur during STL export.
#[derive(Error, Debug)]
pub enum StlExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How facet normals are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalMode {
    /// Unit face normal from the triangle's winding.
    #[default]
    Computed,
    /// Placeholder `0 0 0`, for consumers that recompute normals.
    Zero,
}

/// Options for STL export.
#[derive(Debug, Clone, PartialEq)]
pub struct StlOptions {
    /// Name written after `solid` and `endsolid`.
    pub solid_name: String,
    /// Normal vector policy.
    pub normals: NormalMode,
}

impl Default for StlOptions {
    fn default() -> Self {
        Self {
            solid_name: DEFAULT_SOLID_NAME.to_string(),
            normals: NormalMode::default(),
        }
    }
}

impl StlOptions {
    /// Options naming the solid after the parameter set.
    pub fn for_params(params: &TerrainParams) -> Self {
        Self {
            solid_name: solid_name(params),
            ..Default::default()
        }
    }
}

/// Serializes `mesh` to an ASCII STL string.
///
/// Facet records are formatted in parallel chunks and joined in triangle
/// order.
pub fn serialize_stl(mesh: &SolidMesh, options: &StlOptions) -> String {
    let chunks: Vec<String> = mesh
        .indices()
        .par_chunks(FACETS_PER_CHUNK * 3)
        .map(|chunk| {
            let mut out = String::with_capacity(chunk.len() / 3 * FACET_BYTES_ESTIMATE);
            for tri in chunk.chunks_exact(3) {
                push_facet(&mut out, &mesh.corners(tri), options.normals);
            }
            out
        })
        .collect();

    let body_len: usize = chunks.iter().map(String::len).sum();
    let mut stl = String::with_capacity(body_len + 2 * options.solid_name.len() + 32);
    push_header(&mut stl, &options.solid_name);
    for chunk in &chunks {
        stl.push_str(chunk);
    }
    push_footer(&mut stl, &options.solid_name);
    stl
}

/// Streams `mesh` as ASCII STL into `writer`.
pub fn write_stl<W: Write>(mesh: &SolidMesh, options: &StlOptions, mut writer: W) -> Result<(), StlExportError> {
    let mut line = String::with_capacity(FACET_BYTES_ESTIMATE);

    push_header(&mut line, &options.solid_name);
    writer.write_all(line.as_bytes())?;

    for tri in mesh.triangles() {
        line.clear();
        push_facet(&mut line, &tri, options.normals);
        writer.write_all(line.as_bytes())?;
    }

    line.clear();
    push_footer(&mut line, &options.solid_name);
    writer.write_all(line.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Exports `mesh` to an ASCII STL file at `path`.
///
/// # Returns
/// `Ok(())` on success, or an error if the file cannot be written
pub fn export_stl(mesh: &SolidMesh, path: &Path, options: &StlOptions) -> Result<(), StlExportError> {
    let file = File::create(path)?;
    write_stl(mesh, options, BufWriter::new(file))?;
    debug!(path = %path.display(), facets = mesh.triangle_count(), "STL written");
    Ok(())
}

/// Rough size of the ASCII STL for `triangle_count` facets.
pub fn estimated_stl_bytes(triangle_count: usize) -> u64 {
    (triangle_count * FACET_BYTES_ESTIMATE) as u64
}

// `fmt::Write` into a `String` never fails, so the results below are ignored.

fn push_header(out: &mut String, name: &str) {
    let _ = writeln!(out, "solid {}", name);
}

fn push_footer(out: &mut String, name: &str) {
    let _ = writeln!(out, "endsolid {}", name);
}

fn push_facet(out: &mut String, tri: &[Vec3; 3], normals: NormalMode) {
    let n = match normals {
        NormalMode::Computed => face_normal(tri),
        NormalMode::Zero => Vec3::ZERO,
    };
    let _ = writeln!(out, "  facet normal {} {} {}", coord(n.x), coord(n.y), coord(n.z));
    out.push_str("    outer loop\n");
    for v in tri {
        let _ = writeln!(out, "      vertex {} {} {}", coord(v.x), coord(v.y), coord(v.z));
    }
    out.push_str("    endloop\n");
    out.push_str("  endfacet\n");
}

/// Formats one number with four decimals, printing negative zero as zero.
///
/// Ties round away from zero, so `-47.65625` prints as `-47.6563`.
fn coord(v: f32) -> String {
    if v == 0.0 {
        return "0.0000".to_string();
    }
    // An f32 scaled by 10^4 is exact in f64, so ties are seen exactly.
    let scaled = (v as f64 * 10_000.0).round();
    format!("{:.4}", scaled / 10_000.0)
}
