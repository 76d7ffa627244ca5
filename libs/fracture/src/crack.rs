//! # Crack Painter
//!
//! Carves surface cracks into a mesh without changing its topology beyond
//! an initial uniform subdivision.
//!
//! Each crack is a random walk over mesh edges from a random start vertex
//! until a target length is travelled. Vertices along the walk are carved
//! inward along their normal with a profile that is deepest at the middle
//! of the path:
//!
//! ```text
//! depth_factor = (1 - 2 * |progress - 0.5|)^2
//! ```
//!
//! Overlapping cracks do not stack. Every vertex keeps the deepest carve any
//! crack asked for and is moved once, so no vertex moves more than
//! `max_depth`. Walks happen in local space.

use crate::error::{FractureError, FractureResult};
use crate::source::SourceMesh;
use config::constants::{CRACK_MAX_LENGTH, CRACK_MIN_LENGTH, CRACK_SUBDIVISION_CUTS};
use fracture_mesh::topology::edge_key;
use fracture_mesh::{subdivide, Mesh, VertexAdjacency};
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use tracing::debug;

/// Tunables of the crack walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrackConfig {
    /// Extra vertices per edge added before walking.
    pub subdivision_cuts: u32,
    pub min_length: f64,
    pub max_length: f64,
}

impl Default for CrackConfig {
    fn default() -> Self {
        Self {
            subdivision_cuts: CRACK_SUBDIVISION_CUTS,
            min_length: CRACK_MIN_LENGTH,
            max_length: CRACK_MAX_LENGTH,
        }
    }
}

/// Summary of a painting pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrackReport {
    /// Number of walks performed.
    pub paths: u32,
    /// Vertices moved by a positive amount.
    pub vertices_carved: usize,
    /// Largest displacement applied.
    pub deepest: f64,
}

/// Ordered vertices visited by one walk.
#[derive(Debug)]
struct CrackPath {
    vertices: Vec<u32>,
}

impl CrackPath {
    /// `(vertex, depth_factor)` for every step of the path.
    fn depth_factors(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        let span = self.vertices.len().saturating_sub(1).max(1) as f64;
        self.vertices.iter().enumerate().map(move |(i, &vertex)| {
            let progress = i as f64 / span;
            let factor = (1.0 - 2.0 * (progress - 0.5).abs()).powi(2);
            (vertex, factor)
        })
    }
}

/// Random-walk crack carver.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrackPainter {
    config: CrackConfig,
}

impl CrackPainter {
    pub fn new(config: CrackConfig) -> Self {
        Self { config }
    }

    /// Subdivides `mesh` and carves `crack_count` cracks at most `max_depth`
    /// deep. The same seed on the same topology reproduces the same cracks.
    ///
    /// # Errors
    ///
    /// Returns [`FractureError::InvalidParameters`] for a negative or
    /// non-finite `max_depth` or an inverted length range, and
    /// [`FractureError::Mesh`] when a triangle names a missing vertex.
    pub fn paint(
        &self,
        mesh: &mut SourceMesh,
        crack_count: u32,
        max_depth: f64,
        seed: u64,
    ) -> FractureResult<CrackReport> {
        if !(max_depth.is_finite() && max_depth >= 0.0) {
            return Err(FractureError::invalid(format!(
                "crack depth {max_depth} must be a non-negative number"
            )));
        }
        let (min_length, max_length) = (self.config.min_length, self.config.max_length);
        if !(min_length.is_finite() && max_length.is_finite() && 0.0 <= min_length && min_length <= max_length) {
            return Err(FractureError::invalid(format!(
                "crack length range [{min_length}, {max_length}] is invalid"
            )));
        }
        mesh.mesh().check_indices()?;
        if crack_count == 0 || mesh.mesh().is_empty() {
            return Ok(CrackReport::default());
        }

        let mut surface = subdivide(mesh.mesh(), self.config.subdivision_cuts);
        surface.compute_normals();
        let normals: Vec<DVec3> = surface.normals().map(<[DVec3]>::to_vec).unwrap_or_default();
        let adjacency = VertexAdjacency::build(&surface);
        let vertex_count = surface.vertex_count() as u32;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut carve = vec![0.0_f64; surface.vertex_count()];

        for _ in 0..crack_count {
            let start = rng.gen_range(0..vertex_count);
            let target = rng.gen_range(min_length..=max_length);
            let path = walk(&surface, &adjacency, start, target, &mut rng);

            for (vertex, factor) in path.depth_factors() {
                let depth = &mut carve[vertex as usize];
                *depth = depth.max(max_depth * factor);
            }
        }

        let mut report = CrackReport {
            paths: crack_count,
            ..CrackReport::default()
        };
        for (index, (&depth, normal)) in carve.iter().zip(&normals).enumerate() {
            if depth > 0.0 {
                let index = index as u32;
                surface.set_vertex(index, surface.vertex(index) - *normal * depth);
                report.vertices_carved += 1;
                report.deepest = report.deepest.max(depth);
            }
        }
        surface.compute_normals();

        debug!(
            cracks = report.paths,
            carved = report.vertices_carved,
            deepest = report.deepest,
            vertices = surface.vertex_count(),
            "painted surface cracks"
        );

        mesh.replace_mesh(surface);
        Ok(report)
    }
}

/// Paints cracks with the default configuration.
pub fn paint_cracks(
    mesh: &mut SourceMesh,
    crack_count: u32,
    max_depth: f64,
    seed: u64,
) -> FractureResult<CrackReport> {
    CrackPainter::default().paint(mesh, crack_count, max_depth, seed)
}

/// Walks random unused edges from `start` until `target` length is covered
/// or the current vertex has no unused edge left.
fn walk(
    mesh: &Mesh,
    adjacency: &VertexAdjacency,
    start: u32,
    target: f64,
    rng: &mut ChaCha8Rng,
) -> CrackPath {
    let mut vertices = vec![start];
    let mut used = HashSet::new();
    let mut travelled = 0.0;
    let mut current = start;

    while travelled < target {
        let options: Vec<u32> = adjacency
            .neighbours(current)
            .iter()
            .copied()
            .filter(|&next| !used.contains(&edge_key(current, next)))
            .collect();
        if options.is_empty() {
            break;
        }

        let next = options[rng.gen_range(0..options.len())];
        used.insert(edge_key(current, next));
        travelled += mesh.vertex(current).distance(mesh.vertex(next));
        vertices.push(next);
        current = next;
    }

    CrackPath { vertices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use fracture_mesh::is_closed;
    use fracture_mesh::primitives::{cuboid, uv_sphere};
    use glam::DMat4;

    /// Small cube finely subdivided so every walk takes at least two steps.
    fn small_cube() -> (SourceMesh, CrackPainter) {
        let mesh = SourceMesh::new(cuboid(DVec3::ZERO, DVec3::splat(0.3)));
        let painter = CrackPainter::new(CrackConfig {
            subdivision_cuts: 5,
            ..CrackConfig::default()
        });
        (mesh, painter)
    }

    #[test]
    fn test_depth_profile() {
        let path = CrackPath {
            vertices: vec![0, 1, 2, 3, 4],
        };
        let factors: Vec<f64> = path.depth_factors().map(|(_, f)| f).collect();
        assert_eq!(factors, vec![0.0, 0.25, 1.0, 0.25, 0.0]);

        let single = CrackPath { vertices: vec![7] };
        assert_eq!(single.depth_factors().collect::<Vec<_>>(), vec![(7, 0.0)]);
    }

    #[test]
    fn test_rejects_bad_depth() {
        let (mut mesh, painter) = small_cube();
        for depth in [-0.1, f64::NAN, f64::INFINITY] {
            let err = painter.paint(&mut mesh, 3, depth, 1).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameters);
        }
    }

    #[test]
    fn test_rejects_inverted_length_range() {
        let (mut mesh, _) = small_cube();
        let painter = CrackPainter::new(CrackConfig {
            min_length: 0.5,
            max_length: 0.1,
            ..CrackConfig::default()
        });
        assert!(painter.paint(&mut mesh, 3, 0.01, 1).is_err());
    }

    #[test]
    fn test_zero_cracks_is_noop() {
        let (mut mesh, painter) = small_cube();
        let before = mesh.clone();
        let report = painter.paint(&mut mesh, 0, 0.01, 1).unwrap();
        assert_eq!(report, CrackReport::default());
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_empty_mesh_is_noop() {
        let mut mesh = SourceMesh::new(Mesh::new());
        let report = paint_cracks(&mut mesh, 5, 0.01, 1).unwrap();
        assert_eq!(report.paths, 0);
        assert!(mesh.mesh().is_empty());
    }

    #[test]
    fn test_out_of_range_index_is_degenerate() {
        let mut broken = Mesh::new();
        broken.add_vertex(DVec3::ZERO);
        broken.add_vertex(DVec3::X);
        broken.add_triangle(0, 1, 2);
        let mut mesh = SourceMesh::new(broken);

        let err = paint_cracks(&mut mesh, 3, 0.01, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateMesh);
        assert_eq!(mesh.mesh().vertex_count(), 2);
    }

    #[test]
    fn test_walk_stops_when_edges_run_out() {
        let mut triangle = Mesh::new();
        triangle.add_vertex(DVec3::ZERO);
        triangle.add_vertex(DVec3::X);
        triangle.add_vertex(DVec3::Y);
        triangle.add_triangle(0, 1, 2);
        let adjacency = VertexAdjacency::build(&triangle);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let path = walk(&triangle, &adjacency, 0, 100.0, &mut rng);
        // Three edges, each used once, back to the start
        assert_eq!(path.vertices.len(), 4);
        assert_eq!(path.vertices.first(), Some(&0));
        assert_eq!(path.vertices.last(), Some(&0));

        // Cracks far longer than the surface still paint
        let painter = CrackPainter::new(CrackConfig {
            subdivision_cuts: 0,
            min_length: 50.0,
            max_length: 100.0,
        });
        let mut mesh = SourceMesh::new(triangle);
        let report = painter.paint(&mut mesh, 3, 0.01, 5).unwrap();
        assert_eq!(report.paths, 3);
    }

    #[test]
    fn test_subdivides_and_stays_closed() {
        let (mut mesh, painter) = small_cube();
        painter.paint(&mut mesh, 4, 0.005, 9).unwrap();
        assert_eq!(mesh.mesh().triangle_count(), 12 * 36);
        assert!(is_closed(mesh.mesh()));
        assert!(mesh.mesh().normals().is_some());
    }

    #[test]
    fn test_deterministic() {
        let (mut a, painter) = small_cube();
        let mut b = a.clone();
        let report_a = painter.paint(&mut a, 10, 0.01, 42).unwrap();
        let report_b = painter.paint(&mut b, 10, 0.01, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(report_a, report_b);
    }

    #[test]
    fn test_displacement_is_inward_and_bounded() {
        let (mut mesh, painter) = small_cube();
        let max_depth = 0.01;
        let mut reference = subdivide(mesh.mesh(), 5);
        reference.compute_normals();
        let center = DVec3::splat(0.15);

        let report = painter.paint(&mut mesh, 10, max_depth, 3).unwrap();
        assert_eq!(report.paths, 10);
        assert!(report.vertices_carved > 0);
        assert!(report.deepest > 0.0 && report.deepest <= max_depth);

        let normals = reference.normals().unwrap();
        for (i, (before, after)) in reference.vertices().iter().zip(mesh.mesh().vertices()).enumerate() {
            let moved = *after - *before;
            assert!(moved.length() <= max_depth + 1e-12, "vertex {i} moved {}", moved.length());
            assert!(moved.dot(normals[i]) <= 1e-12, "vertex {i} pushed outward");
            assert!(after.distance(center) <= before.distance(center) + 1e-12);
        }
    }

    #[test]
    fn test_zero_depth_moves_nothing() {
        let (mut mesh, painter) = small_cube();
        let reference = subdivide(mesh.mesh(), 5);
        let report = painter.paint(&mut mesh, 10, 0.0, 3).unwrap();
        assert_eq!(report.vertices_carved, 0);
        assert_eq!(mesh.mesh().vertices(), reference.vertices());
    }

    #[test]
    fn test_keeps_transform() {
        let transform = DMat4::from_translation(DVec3::new(0.0, 5.0, 0.0));
        let sphere = uv_sphere(DVec3::ZERO, 0.5, 16, 8);
        let mut mesh = SourceMesh::with_transform(sphere.clone(), transform);

        let report = paint_cracks(&mut mesh, 6, 0.02, 11).unwrap();
        assert_eq!(mesh.transform(), transform);
        assert!(mesh.mesh().vertex_count() > sphere.vertex_count());
        // Carving a convex surface inward only removes volume
        assert!(report.vertices_carved == 0 || mesh.mesh().volume() < sphere.volume());
    }
}
