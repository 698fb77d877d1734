//! Solid mesh construction.
//!
//! Converts a height field into a closed, outward-wound triangle mesh made
//! of the terrain surface, a perimeter skirt and a flat base.

mod skirt;
mod solid;

pub use solid::{face_normal, prism_volume, MeshGroup, MeshStats, SolidMesh};
