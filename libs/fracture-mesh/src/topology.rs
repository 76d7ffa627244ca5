//! # Topology Queries
//!
//! Edge and adjacency information derived from triangle connectivity.

use crate::mesh::Mesh;
use std::collections::HashMap;

/// Undirected edge key with the smaller index first.
#[inline]
pub fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Counts how many triangles use each undirected edge.
pub fn edge_use_counts(mesh: &Mesh) -> HashMap<(u32, u32), usize> {
    let mut counts = HashMap::with_capacity(mesh.triangle_count() * 3 / 2);
    for &[a, b, c] in mesh.triangles() {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            *counts.entry(edge_key(u, v)).or_insert(0) += 1;
        }
    }
    counts
}

/// Whether every undirected edge is shared by exactly two triangles.
///
/// An empty mesh is not closed.
pub fn is_closed(mesh: &Mesh) -> bool {
    !mesh.is_empty() && edge_use_counts(mesh).values().all(|&count| count == 2)
}

/// Vertex-to-vertex adjacency of a triangle mesh.
///
/// Neighbour lists are sorted ascending so walks over them are
/// reproducible for a fixed topology.
#[derive(Debug, Clone)]
pub struct VertexAdjacency {
    neighbours: Vec<Vec<u32>>,
}

impl VertexAdjacency {
    pub fn build(mesh: &Mesh) -> Self {
        let mut neighbours = vec![Vec::new(); mesh.vertex_count()];
        for &[a, b, c] in mesh.triangles() {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                neighbours[u as usize].push(v);
                neighbours[v as usize].push(u);
            }
        }
        for list in &mut neighbours {
            list.sort_unstable();
            list.dedup();
        }
        Self { neighbours }
    }

    /// Vertices sharing an edge with `vertex`.
    #[inline]
    pub fn neighbours(&self, vertex: u32) -> &[u32] {
        &self.neighbours[vertex as usize]
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.neighbours.len()
    }

    /// Number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        self.neighbours.iter().map(Vec::len).sum::<usize>() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::cuboid;
    use glam::DVec3;

    #[test]
    fn test_edge_key_orders_indices() {
        assert_eq!(edge_key(5, 2), (2, 5));
        assert_eq!(edge_key(2, 5), (2, 5));
    }

    #[test]
    fn test_cube_is_closed() {
        let cube = cuboid(DVec3::ZERO, DVec3::ONE);
        assert!(is_closed(&cube));
    }

    #[test]
    fn test_open_mesh_is_not_closed() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_vertex(DVec3::X);
        mesh.add_vertex(DVec3::Y);
        mesh.add_triangle(0, 1, 2);
        assert!(!is_closed(&mesh));
        assert!(!is_closed(&Mesh::new()));
    }

    #[test]
    fn test_cube_adjacency() {
        let cube = cuboid(DVec3::ZERO, DVec3::ONE);
        let adjacency = VertexAdjacency::build(&cube);
        assert_eq!(adjacency.vertex_count(), 8);
        // 12 cube edges plus one diagonal per face
        assert_eq!(adjacency.edge_count(), 18);
        for v in 0..8 {
            let list = adjacency.neighbours(v);
            assert!(list.windows(2).all(|w| w[0] < w[1]));
            assert!(!list.contains(&v));
        }
    }
}
