//! # Mesh Data Structure
//!
//! Indexed triangle mesh with f64 positions and optional cached vertex
//! normals.

use crate::bounds::BoundingBox;
use crate::error::{MeshError, MeshResult};
use config::constants::{approx_zero, VERTEX_MERGE_EPSILON};
use glam::{DMat4, DVec3};

/// Indexed triangle mesh.
///
/// All geometry calculations use f64. Triangles wind counter-clockwise
/// when viewed from outside, so closed meshes have positive signed volume.
///
/// # Example
///
/// ```rust
/// use fracture_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<DVec3>,
    triangles: Vec<[u32; 3]>,
    /// Cleared whenever topology changes
    normals: Option<Vec<DVec3>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty mesh with room for the given number of vertices and triangles.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            normals: None,
        }
    }

    /// Builds a mesh from raw buffers, checking every index.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidTopology`] if a triangle references a
    /// vertex past the end of `vertices`.
    pub fn from_parts(vertices: Vec<DVec3>, triangles: Vec<[u32; 3]>) -> MeshResult<Self> {
        let mesh = Self {
            vertices,
            triangles,
            normals: None,
        };
        mesh.check_indices()?;
        Ok(mesh)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// `true` when there are no triangles, even if vertices exist.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Appends a vertex, returning its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals = None;
        index
    }

    /// Appends a triangle. Indices are not checked; see [`validate`](Self::validate).
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
        self.normals = None;
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Moves a vertex. Cached normals are kept; call
    /// [`compute_normals`](Self::compute_normals) to refresh them.
    #[inline]
    pub fn set_vertex(&mut self, index: u32, position: DVec3) {
        self.vertices[index as usize] = position;
    }

    /// Corner positions of triangle `index`.
    #[inline]
    pub fn triangle_positions(&self, index: usize) -> [DVec3; 3] {
        let [a, b, c] = self.triangles[index];
        [self.vertex(a), self.vertex(b), self.vertex(c)]
    }

    /// Cached vertex normals, `None` until computed.
    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    /// Computes area-weighted vertex normals.
    ///
    /// Vertices not referenced by any triangle keep a zero normal.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];

        for tri in &self.triangles {
            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];

            let normal = (v1 - v0).cross(v2 - v0);

            normals[tri[0] as usize] += normal;
            normals[tri[1] as usize] += normal;
            normals[tri[2] as usize] += normal;
        }

        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }

        self.normals = Some(normals);
    }

    /// Computes the axis-aligned bounding box, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.vertices)
    }

    /// Applies an affine transform to positions and cached normals.
    ///
    /// A mirroring transform (negative determinant) also reverses every
    /// triangle, so outward-facing meshes stay outward-facing.
    pub fn transform(&mut self, matrix: &DMat4) {
        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }
        if matrix.determinant() < 0.0 {
            for tri in &mut self.triangles {
                tri.swap(1, 2);
            }
        }

        // Normals use the inverse transpose
        if let Some(normals) = &mut self.normals {
            let normal_matrix = matrix.inverse().transpose();
            for n in normals {
                *n = normal_matrix.transform_vector3(*n).normalize_or_zero();
            }
        }
    }

    /// Reverses the winding of every triangle and flips cached normals.
    pub fn flip_winding(&mut self) {
        for tri in &mut self.triangles {
            tri.swap(1, 2);
        }
        if let Some(normals) = &mut self.normals {
            for n in normals {
                *n = -*n;
            }
        }
    }

    /// Flips a closed mesh wound inside-out. Returns `true` if it was flipped.
    pub fn orient_outward(&mut self) -> bool {
        let inverted = self.signed_volume() < 0.0;
        if inverted {
            self.flip_winding();
        }
        inverted
    }

    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Signed enclosed volume via the divergence theorem.
    ///
    /// Positive for closed meshes wound counter-clockwise from outside.
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let (v0, v1, v2) = (self.vertex(a), self.vertex(b), self.vertex(c));
                v0.dot(v1.cross(v2))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Absolute enclosed volume.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Center of mass of the enclosed solid.
    ///
    /// Falls back to the vertex average when the mesh encloses no volume.
    pub fn centroid(&self) -> DVec3 {
        let mut weighted = DVec3::ZERO;
        let mut total = 0.0;

        for &[a, b, c] in &self.triangles {
            let (v0, v1, v2) = (self.vertex(a), self.vertex(b), self.vertex(c));
            let volume = v0.dot(v1.cross(v2));
            weighted += (v0 + v1 + v2) * volume;
            total += volume;
        }

        if !approx_zero(total) {
            // Tetrahedra share the origin: centroid is (v0 + v1 + v2 + 0) / 4
            weighted / (4.0 * total)
        } else if self.vertices.is_empty() {
            DVec3::ZERO
        } else {
            self.vertices.iter().copied().sum::<DVec3>() / self.vertices.len() as f64
        }
    }

    /// Checks that every triangle index names an existing vertex.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidTopology`] for the first triangle that
    /// references a vertex past the end of the vertex list.
    pub fn check_indices(&self) -> MeshResult<()> {
        let count = self.vertices.len();
        match self
            .triangles
            .iter()
            .enumerate()
            .find(|(_, tri)| tri.iter().any(|&v| v as usize >= count))
        {
            Some((index, tri)) => Err(MeshError::invalid_topology(format!(
                "triangle {index} {tri:?} references a vertex outside 0..{count}"
            ))),
            None => Ok(()),
        }
    }

    /// `false` if any triangle has an out-of-range or repeated index, or
    /// collapses to (near) zero area.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        for tri in &self.triangles {
            if tri.iter().any(|&v| v >= vertex_count) {
                return false;
            }

            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }

            let [v0, v1, v2] = [
                self.vertex(tri[0]),
                self.vertex(tri[1]),
                self.vertex(tri[2]),
            ];
            let area = (v1 - v0).cross(v2 - v0).length();
            if area < VERTEX_MERGE_EPSILON {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::cuboid;
    use approx::assert_relative_eq;

    #[test]
    fn test_mesh_new() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn test_mesh_add_vertex() {
        let mut mesh = Mesh::new();
        let idx = mesh.add_vertex(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(idx, 0);
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.vertex(0), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_mesh_from_parts_rejects_bad_index() {
        let result = Mesh::from_parts(vec![DVec3::ZERO, DVec3::X], vec![[0, 1, 2]]);
        assert!(matches!(result, Err(MeshError::InvalidTopology { .. })));
    }

    #[test]
    fn test_mesh_bounds() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(-1.0, -2.0, -3.0));
        mesh.add_vertex(DVec3::new(4.0, 5.0, 6.0));
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min(), DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(bounds.max(), DVec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_cube_signed_volume_positive() {
        let cube = cuboid(DVec3::ZERO, DVec3::new(2.0, 3.0, 4.0));
        assert_relative_eq!(cube.signed_volume(), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_volume_invariant_under_translation() {
        let mut cube = cuboid(DVec3::ZERO, DVec3::ONE);
        cube.translate(DVec3::new(10.0, -5.0, 3.0));
        assert_relative_eq!(cube.volume(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_centroid_of_offset_cube() {
        let cube = cuboid(DVec3::new(1.0, 1.0, 1.0), DVec3::new(3.0, 5.0, 2.0));
        let c = cube.centroid();
        assert_relative_eq!(c.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(c.y, 3.0, epsilon = 1e-9);
        assert_relative_eq!(c.z, 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_compute_normals_point_outward() {
        let mut cube = cuboid(DVec3::splat(-1.0), DVec3::ONE);
        cube.compute_normals();
        let normals = cube.normals().unwrap();
        for (v, n) in cube.vertices().iter().zip(normals) {
            assert!(v.dot(*n) > 0.0, "normal at {v} should point away from center");
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_transform_scales_volume() {
        let mut cube = cuboid(DVec3::ZERO, DVec3::ONE);
        cube.transform(&DMat4::from_scale(DVec3::splat(2.0)));
        assert_relative_eq!(cube.volume(), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mirror_transform_keeps_outward_winding() {
        let mut cube = cuboid(DVec3::ZERO, DVec3::ONE);
        cube.transform(&DMat4::from_scale(DVec3::new(-1.0, 1.0, 1.0)));
        assert_relative_eq!(cube.signed_volume(), 1.0, epsilon = 1e-9);

        cube.compute_normals();
        let center = cube.centroid();
        for (v, n) in cube.vertices().iter().zip(cube.normals().unwrap()) {
            assert!((*v - center).dot(*n) > 0.0);
        }
    }

    #[test]
    fn test_orient_outward() {
        let mut cube = cuboid(DVec3::ZERO, DVec3::ONE);
        assert!(!cube.orient_outward());

        cube.flip_winding();
        assert_relative_eq!(cube.signed_volume(), -1.0, epsilon = 1e-9);
        assert!(cube.orient_outward());
        assert_relative_eq!(cube.signed_volume(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_check_indices() {
        assert!(cuboid(DVec3::ZERO, DVec3::ONE).check_indices().is_ok());

        let mut truncated = Mesh::new();
        truncated.add_vertex(DVec3::ZERO);
        truncated.add_vertex(DVec3::X);
        truncated.add_triangle(0, 1, 2);
        assert!(matches!(
            truncated.check_indices(),
            Err(MeshError::InvalidTopology { .. })
        ));
    }

    #[test]
    fn test_mesh_validate() {
        let cube = cuboid(DVec3::ZERO, DVec3::ONE);
        assert!(cube.validate());

        let mut broken = Mesh::new();
        broken.add_vertex(DVec3::ZERO);
        broken.add_triangle(0, 1, 2);
        assert!(!broken.validate());
    }
}
