//! Writing generated terrain to files.
//!
//! ASCII STL is the printable output. Height fields can additionally be
//! written as 16-bit PNG or headerless RAW heightmaps.

mod filename;
mod heightmap;
mod stl;

pub use filename::{sanitize_token, solid_name, suggested_filename, FILE_PREFIX};
pub use heightmap::{export_heightmap, HeightRange, HeightmapError, HeightmapFormat};
pub use stl::{
    estimated_stl_bytes, export_stl, serialize_stl, write_stl, NormalMode, StlExportError, StlOptions,
    DEFAULT_SOLID_NAME,
};
