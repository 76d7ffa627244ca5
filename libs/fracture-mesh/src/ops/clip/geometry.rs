//! # Geometry Utilities
//!
//! Ray casting for inside/outside tests and vertex welding for turning
//! polygon soup back into an indexed mesh.

use crate::mesh::Mesh;
use config::constants::{VERTEX_MERGE_EPSILON, WELD_GRID_SCALE};
use glam::DVec3;
use std::collections::HashMap;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Tolerance for ray intersection.
const RAY_EPSILON: f64 = 1e-12;

/// Six ray directions, tilted off the axes so rays rarely graze the
/// edges and diagonals of axis-aligned geometry.
const RAY_DIRECTIONS: [[f64; 3]; 6] = [
    [1.0, 0.013_1, 0.027_3],
    [-1.0, -0.021_7, 0.011_9],
    [0.017_3, 1.0, -0.023_9],
    [-0.029_1, -1.0, 0.015_7],
    [0.019_3, -0.031_1, 1.0],
    [-0.012_7, 0.025_9, -1.0],
];

// =============================================================================
// RAY CASTING
// =============================================================================

/// Möller–Trumbore ray-triangle intersection algorithm.
///
/// Returns `true` if the ray from `origin` along `dir` hits the triangle
/// in the positive direction.
///
/// ## Reference
///
/// Möller, T., & Trumbore, B. (1997). Fast, minimum storage ray-triangle intersection.
pub fn ray_triangle_intersect(origin: DVec3, dir: DVec3, v0: DVec3, v1: DVec3, v2: DVec3) -> bool {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = dir.cross(edge2);
    let a = edge1.dot(h);

    // Ray parallel to triangle
    if a.abs() < RAY_EPSILON {
        return false;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return false;
    }

    let q = s.cross(edge1);
    let v = f * dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return false;
    }

    f * edge2.dot(q) > RAY_EPSILON
}

/// Test if point is inside a closed mesh using ray-cast voting.
///
/// Casts six rays and counts crossings; the point is inside when at least
/// four rays report an odd count. Ties resolve to outside.
///
/// # Example
///
/// ```rust
/// use fracture_mesh::ops::clip::point_inside_mesh;
/// use fracture_mesh::primitives::cuboid;
/// use glam::DVec3;
///
/// let cube = cuboid(DVec3::ZERO, DVec3::ONE);
/// assert!(point_inside_mesh(DVec3::splat(0.5), &cube));
/// assert!(!point_inside_mesh(DVec3::splat(1.5), &cube));
/// ```
pub fn point_inside_mesh(point: DVec3, mesh: &Mesh) -> bool {
    let inside_votes = RAY_DIRECTIONS
        .iter()
        .filter(|dir| count_ray_intersections(point, DVec3::from_array(**dir), mesh) % 2 == 1)
        .count();

    inside_votes >= 4
}

/// Count ray-mesh intersections for a single ray direction.
fn count_ray_intersections(origin: DVec3, dir: DVec3, mesh: &Mesh) -> usize {
    (0..mesh.triangle_count())
        .filter(|&i| {
            let [v0, v1, v2] = mesh.triangle_positions(i);
            ray_triangle_intersect(origin, dir, v0, v1, v2)
        })
        .count()
}

// =============================================================================
// VERTEX WELDING
// =============================================================================

/// Builds an indexed mesh from triangles, merging coincident vertices.
///
/// Positions are quantized into a spatial hash; each lookup also checks
/// the neighbouring cells so points straddling a cell border still merge.
#[derive(Debug, Default)]
pub struct VertexWelder {
    mesh: Mesh,
    grid: HashMap<(i64, i64, i64), Vec<u32>>,
}

impl VertexWelder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of a vertex within merge distance of `position`,
    /// adding one if none exists.
    pub fn weld(&mut self, position: DVec3) -> u32 {
        let key = quantize(position);

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let cell = (key.0 + dx, key.1 + dy, key.2 + dz);
                    if let Some(candidates) = self.grid.get(&cell) {
                        for &index in candidates {
                            if self.mesh.vertex(index).distance(position) < VERTEX_MERGE_EPSILON {
                                return index;
                            }
                        }
                    }
                }
            }
        }

        let index = self.mesh.add_vertex(position);
        self.grid.entry(key).or_default().push(index);
        index
    }

    /// Adds a triangle, dropping it if welding collapses two corners.
    pub fn add_triangle(&mut self, corners: [DVec3; 3]) {
        let [a, b, c] = corners.map(|p| self.weld(p));
        if a != b && b != c && a != c {
            self.mesh.add_triangle(a, b, c);
        }
    }

    pub fn finish(self) -> Mesh {
        self.mesh
    }
}

#[inline]
fn quantize(position: DVec3) -> (i64, i64, i64) {
    let q = (position * WELD_GRID_SCALE).round();
    (q.x as i64, q.y as i64, q.z as i64)
}

// =============================================================================
// TESTS
// =============================================================================
