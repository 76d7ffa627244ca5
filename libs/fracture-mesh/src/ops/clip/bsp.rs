//! # BSP Tree Implementation
//!
//! Binary Space Partitioning tree over a mesh's faces, used to cut
//! polygons into pieces that lie wholly inside or wholly outside the mesh.
//!
//! ## Structure
//!
//! ```text
//!           [Plane]
//!          /       \
//!      Front       Back
//!     (+ side)   (- side)
//! ```
//!
//! Nodes live in a flat arena and children are indices, so building and
//! clipping are iterative and deep trees cannot overflow the stack.
//!
//! ## References
//!
//! - Naylor, B. (1990). "Binary Space Partitioning Trees"
//! - Thibault, W. C., & Naylor, B. F. (1987). "Set operations on polyhedra using BSP trees"

use super::geometry::point_inside_mesh;
use super::plane::{Classification, Plane};
use super::polygon::Polygon;
use crate::mesh::Mesh;

// =============================================================================
// BSP NODE
// =============================================================================

#[derive(Debug, Clone)]
struct BspNode {
    plane: Plane,
    front: Option<usize>,
    back: Option<usize>,
}

impl BspNode {
    fn new(plane: Plane) -> Self {
        Self {
            plane,
            front: None,
            back: None,
        }
    }
}

// =============================================================================
// BSP TREE
// =============================================================================

/// BSP tree with arena-allocated nodes.
#[derive(Debug, Clone, Default)]
pub struct BspTree {
    nodes: Vec<BspNode>,
}

impl BspTree {
    /// Build BSP tree from polygons.
    ///
    /// ## Algorithm
    ///
    /// 1. Use first polygon's plane as splitting plane
    /// 2. Classify each polygon: front, back, coplanar, or spanning
    /// 3. Split spanning polygons, absorb coplanar ones into the node
    /// 4. Repeat for the front and back sets
    pub fn build(polygons: Vec<Polygon>) -> Self {
        let mut tree = Self::default();
        let mut pending = Vec::new();

        if let Some(first) = polygons.first() {
            tree.nodes.push(BspNode::new(*first.plane()));
            pending.push((0, polygons));
        }

        while let Some((index, polygons)) = pending.pop() {
            let plane = tree.nodes[index].plane;
            let mut front_polys = Vec::new();
            let mut back_polys = Vec::new();

            for poly in polygons {
                let (_, front_part, back_part) = poly.split(&plane);
                front_polys.extend(front_part);
                back_polys.extend(back_part);
            }

            if !front_polys.is_empty() {
                let child = tree.push(*front_polys[0].plane());
                tree.nodes[index].front = Some(child);
                pending.push((child, front_polys));
            }
            if !back_polys.is_empty() {
                let child = tree.push(*back_polys[0].plane());
                tree.nodes[index].back = Some(child);
                pending.push((child, back_polys));
            }
        }

        tree
    }

    fn push(&mut self, plane: Plane) -> usize {
        self.nodes.push(BspNode::new(plane));
        self.nodes.len() - 1
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Clip polygons using the mesh for robust leaf classification.
    ///
    /// Polygons are split down to the leaves; each piece is then kept or
    /// dropped by ray casting its centroid against `mesh`.
    pub fn clip_polygons_robust(
        &self,
        polygons: Vec<Polygon>,
        mesh: &Mesh,
        keep_inside: bool,
    ) -> Vec<Polygon> {
        let mut result = Vec::new();
        let root = if self.nodes.is_empty() { None } else { Some(0) };
        let mut pending = vec![(root, polygons)];

        while let Some((node, polygons)) = pending.pop() {
            let Some(index) = node else {
                result.extend(polygons.into_iter().filter(|poly| {
                    point_inside_mesh(poly.centroid(), mesh) == keep_inside
                }));
                continue;
            };

            let node = &self.nodes[index];
            let mut front_polys = Vec::new();
            let mut back_polys = Vec::new();

            for poly in polygons {
                match poly.split(&node.plane) {
                    (Classification::Coplanar, _, _) => {
                        // Route based on normal direction relative to plane
                        if poly.plane().normal().dot(node.plane.normal()) > 0.0 {
                            front_polys.push(poly);
                        } else {
                            back_polys.push(poly);
                        }
                    }
                    (_, front_part, back_part) => {
                        front_polys.extend(front_part);
                        back_polys.extend(back_part);
                    }
                }
            }

            if !back_polys.is_empty() {
                pending.push((node.back, back_polys));
            }
            if !front_polys.is_empty() {
                pending.push((node.front, front_polys));
            }
        }

        result
    }
}

// =============================================================================
// TESTS
// =============================================================================
