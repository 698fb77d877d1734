//! Procedural landform generator for 3D printing.
//!
//! This crate turns a small parameter set (landform, size, height,
//! roughness, seed) into a deterministic height field and closes it into a
//! watertight solid mesh that can be written as ASCII STL.
//!
//! ```no_run
//! use landgen::{generate, serialize, Landform, TerrainParams};
//!
//! let params = TerrainParams::new(Landform::Volcano, 42);
//! let mesh = generate(&params)?;
//! let stl = serialize(&mesh, &params);
//! # Ok::<(), landgen::TerrainError>(())
//! ```

pub mod export;
pub mod mesh;
pub mod noise;
pub mod terrain;

pub use mesh::{MeshGroup, SolidMesh};
pub use noise::SeededNoise;
pub use terrain::{generate_heightfield, HeightField, Landform, TerrainError, TerrainParams};

use tracing::debug;

/// Generates the closed terrain solid for `params`.
///
/// Pure and synchronous: identical parameters always yield an identical
/// mesh.
#[tracing::instrument(skip_all, fields(landform = %params.landform, resolution = params.resolution, seed = params.seed))]
pub fn generate(params: &TerrainParams) -> Result<SolidMesh, TerrainError> {
    let field = generate_heightfield(params)?;
    let mesh = SolidMesh::build(&field, params);
    debug!(triangles = mesh.triangle_count(), "terrain generated");
    Ok(mesh)
}

/// Serializes `mesh` as ASCII STL, naming the solid after `params`.
pub fn serialize(mesh: &SolidMesh, params: &TerrainParams) -> String {
    export::serialize_stl(mesh, &export::StlOptions::for_params(params))
}
