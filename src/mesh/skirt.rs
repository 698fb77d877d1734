//! Side walls and base plate that close the terrain surface into a solid.
//!
//! The skirt drops every boundary vertex of the top grid to `y = 0` and
//! stitches a vertical quad between each pair of neighbours. The base is one
//! rectangle spanning the whole footprint. All facets are wound
//! counter-clockwise as seen from outside the solid.

use glam::Vec3;

/// One of the four boundary sides of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    /// `j = 0`, facing -z.
    MinZ,
    /// `j = resolution`, facing +z.
    MaxZ,
    /// `i = 0`, facing -x.
    MinX,
    /// `i = resolution`, facing +x.
    MaxX,
}

impl Side {
    pub(crate) const ALL: [Side; 4] = [Side::MinZ, Side::MaxZ, Side::MinX, Side::MaxX];

    /// Index of the `k`-th top vertex along this side.
    ///
    /// Vertices are walked with increasing x (z sides) or increasing z
    /// (x sides).
    fn top_index(self, k: u32, resolution: u32) -> u32 {
        let side = resolution + 1;
        match self {
            Side::MinZ => k * side,
            Side::MaxZ => k * side + resolution,
            Side::MinX => k,
            Side::MaxX => resolution * side + k,
        }
    }

    /// Emits the two triangles of the wall quad `(t0, t1)` over `(b0, b1)`.
    ///
    /// Walking with increasing coordinate, the -z and +x sides see the quad
    /// mirrored relative to the +z and -x sides, so they take the reversed
    /// winding.
    fn quad(self, t0: u32, t1: u32, b0: u32, b1: u32) -> [u32; 6] {
        match self {
            Side::MinZ | Side::MaxX => [t0, b1, b0, t0, t1, b1],
            Side::MaxZ | Side::MinX => [t0, b0, b1, t0, b1, t1],
        }
    }
}

/// Appends the perimeter skirt and returns the number of triangles added.
///
/// `positions` must start with the `(resolution + 1)^2` top-surface
/// vertices. Bottom vertices are new, one per boundary vertex per side.
pub(crate) fn append_skirt(positions: &mut Vec<Vec3>, indices: &mut Vec<u32>, resolution: u32) -> usize {
    let before = indices.len();

    for side in Side::ALL {
        let bottom_start = positions.len() as u32;
        for k in 0..=resolution {
            let top = positions[side.top_index(k, resolution) as usize];
            positions.push(Vec3::new(top.x, 0.0, top.z));
        }

        for k in 0..resolution {
            let t0 = side.top_index(k, resolution);
            let t1 = side.top_index(k + 1, resolution);
            let b0 = bottom_start + k;
            let b1 = bottom_start + k + 1;
            indices.extend_from_slice(&side.quad(t0, t1, b0, b1));
        }
    }

    (indices.len() - before) / 3
}

/// Appends the base rectangle at `y = 0`, facing -y, and returns the number
/// of triangles added.
pub(crate) fn append_base(positions: &mut Vec<Vec3>, indices: &mut Vec<u32>, half_size: f32) -> usize {
    let start = positions.len() as u32;
    positions.extend_from_slice(&[
        Vec3::new(-half_size, 0.0, -half_size),
        Vec3::new(-half_size, 0.0, half_size),
        Vec3::new(half_size, 0.0, half_size),
        Vec3::new(half_size, 0.0, -half_size),
    ]);

    let [a, b, c, d] = [start, start + 1, start + 2, start + 3];
    indices.extend_from_slice(&[a, c, b, a, d, c]);
    2
}
