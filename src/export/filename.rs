//! Output naming derived from generation parameters.

use crate::terrain::TerrainParams;

/// Prefix of every suggested output name.
pub const FILE_PREFIX: &str = "landgen";

/// Replaces every character that is not an ASCII letter or digit with `_`
/// and lowercases the result.
pub fn sanitize_token(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Filesystem-safe stem such as `landgen_island_s42`.
pub fn solid_name(params: &TerrainParams) -> String {
    format!(
        "{}_{}_s{}",
        FILE_PREFIX,
        sanitize_token(params.landform.label()),
        params.seed
    )
}

/// Suggested STL filename for a parameter set.
pub fn suggested_filename(params: &TerrainParams) -> String {
    format!("{}.stl", solid_name(params))
}
