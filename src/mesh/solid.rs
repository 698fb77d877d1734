//! Closed triangle mesh built from a height field.

use std::ops::Range;

use glam::{DVec3, Vec3};
use serde::Serialize;
use tracing::debug;

use super::skirt::{append_base, append_skirt};
use crate::terrain::{HeightField, TerrainParams};

/// The three logically distinct triangle groups of a [`SolidMesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshGroup {
    /// Terrain surface, one vertex per height-field sample.
    Top,
    /// Vertical walls around the perimeter.
    Skirt,
    /// Flat bottom plate at `y = 0`.
    Base,
}

impl MeshGroup {
    /// Returns all groups in buffer order.
    pub const fn all() -> [MeshGroup; 3] {
        [MeshGroup::Top, MeshGroup::Skirt, MeshGroup::Base]
    }
}

/// Summary numbers for a built mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub top_triangles: usize,
    pub skirt_triangles: usize,
    pub base_triangles: usize,
    pub min_height: f32,
    pub max_height: f32,
    /// Enclosed volume in cubic millimetres.
    pub volume: f64,
}

/// A watertight terrain solid: top surface, perimeter skirt and base plate.
///
/// Positions and indices are exposed as single combined buffers. The first
/// `(resolution + 1)^2` vertices are the top surface in height-field order;
/// triangles are stored top first, then skirt, then base. Every triangle is
/// wound counter-clockwise as seen from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidMesh {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
    resolution: u32,
    top_triangles: usize,
    skirt_triangles: usize,
    base_triangles: usize,
}

impl SolidMesh {
    /// Builds the solid for `field` using the footprint size from `params`.
    pub fn build(field: &HeightField, params: &TerrainParams) -> Self {
        Self::from_heightfield(field, params.size)
    }

    /// Builds the solid for `field` over a `size` x `size` footprint centred
    /// on the origin.
    pub fn from_heightfield(field: &HeightField, size: f64) -> Self {
        let resolution = field.resolution;
        let side = field.side();
        let step = size / resolution as f64;
        let half_size = size / 2.0;

        let top_vertices = field.vertex_count();
        let boundary_vertices = 4 * side as usize;
        let mut positions = Vec::with_capacity(top_vertices + boundary_vertices + 4);
        for (i, j) in field.coords() {
            positions.push(Vec3::new(
                (i as f64 * step - half_size) as f32,
                field.get(i, j),
                (j as f64 * step - half_size) as f32,
            ));
        }

        let quads = resolution as usize * resolution as usize;
        let mut indices = Vec::with_capacity((quads * 2 + 8 * resolution as usize + 2) * 3);
        for i in 0..resolution {
            for j in 0..resolution {
                let a = i * side + j;
                let b = (i + 1) * side + j;
                let c = (i + 1) * side + j + 1;
                let d = i * side + j + 1;
                indices.extend_from_slice(&[a, d, b, b, d, c]);
            }
        }
        let top_triangles = indices.len() / 3;

        let skirt_triangles = append_skirt(&mut positions, &mut indices, resolution);
        let base_triangles = append_base(&mut positions, &mut indices, half_size as f32);

        debug!(
            vertices = positions.len(),
            top_triangles, skirt_triangles, base_triangles, "solid mesh built"
        );

        Self {
            positions,
            indices,
            resolution,
            top_triangles,
            skirt_triangles,
            base_triangles,
        }
    }

    /// Combined vertex buffer.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Combined index buffer, three indices per triangle.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Grid segments per side of the top surface.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of vertices belonging to the top surface.
    pub fn top_vertex_count(&self) -> usize {
        let side = self.resolution as usize + 1;
        side * side
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Range of triangle numbers occupied by `group`.
    pub fn group_range(&self, group: MeshGroup) -> Range<usize> {
        let skirt_start = self.top_triangles;
        let base_start = skirt_start + self.skirt_triangles;
        match group {
            MeshGroup::Top => 0..skirt_start,
            MeshGroup::Skirt => skirt_start..base_start,
            MeshGroup::Base => base_start..base_start + self.base_triangles,
        }
    }

    /// Number of triangles in `group`.
    pub fn group_triangle_count(&self, group: MeshGroup) -> usize {
        self.group_range(group).len()
    }

    /// Returns the corner positions of triangle `t`.
    ///
    /// # Panics
    /// Panics if `t >= triangle_count()`.
    pub fn triangle(&self, t: usize) -> [Vec3; 3] {
        let tri = &self.indices[t * 3..t * 3 + 3];
        self.corners(tri)
    }

    /// Resolves one index triple to positions.
    pub fn corners(&self, tri: &[u32]) -> [Vec3; 3] {
        [
            self.positions[tri[0] as usize],
            self.positions[tri[1] as usize],
            self.positions[tri[2] as usize],
        ]
    }

    /// Iterates over all triangles in buffer order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| self.corners(tri))
    }

    /// Iterates over the triangles of one group.
    pub fn group_triangles(&self, group: MeshGroup) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.group_range(group).map(move |t| self.triangle(t))
    }

    /// Signed enclosed volume via the divergence theorem.
    ///
    /// Positive when facets face outward; zero for a flat zero-height plate.
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| {
                let (a, b, c) = (a.as_dvec3(), b.as_dvec3(), c.as_dvec3());
                a.dot(b.cross(c))
            })
            .sum::<f64>()
            / 6.0
    }

    /// (min, max) height over the top surface.
    pub fn height_range(&self) -> (f32, f32) {
        self.positions[..self.top_vertex_count()]
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)))
    }

    pub fn stats(&self) -> MeshStats {
        let (min_height, max_height) = self.height_range();
        MeshStats {
            vertex_count: self.vertex_count(),
            triangle_count: self.triangle_count(),
            top_triangles: self.top_triangles,
            skirt_triangles: self.skirt_triangles,
            base_triangles: self.base_triangles,
            min_height,
            max_height,
            volume: self.signed_volume(),
        }
    }
}

/// Unit normal of a triangle by the right-hand rule, or zero if degenerate.
pub fn face_normal(tri: &[Vec3; 3]) -> Vec3 {
    let normal = (tri[1].as_dvec3() - tri[0].as_dvec3()).cross(tri[2].as_dvec3() - tri[0].as_dvec3());
    normal.normalize_or_zero().as_vec3()
}

/// Volume under the piecewise-linear top surface, integrated per triangle.
///
/// Equals [`SolidMesh::signed_volume`] for a correctly closed solid.
pub fn prism_volume(mesh: &SolidMesh) -> f64 {
    mesh.group_triangles(MeshGroup::Top)
        .map(|[a, b, c]| {
            let (a, b, c) = (a.as_dvec3(), b.as_dvec3(), c.as_dvec3());
            let footprint = DVec3::new(b.x - a.x, 0.0, b.z - a.z)
                .cross(DVec3::new(c.x - a.x, 0.0, c.z - a.z))
                .y
                .abs()
                / 2.0;
            footprint * (a.y + b.y + c.y) / 3.0
        })
        .sum()
}
