//! # Voronoi Cells
//!
//! A cell is the region closer to its generator than to any other, i.e. the
//! intersection of the bisector half-spaces against every other generator.
//! The enclosure caps cells that are unbounded on the outside of the
//! point set.

use crate::sampler::SeedPoint;
use config::constants::VERTEX_MERGE_EPSILON;
use fracture_mesh::{BoundingBox, Plane};
use glam::DVec3;
use tracing::trace;

/// Convex region handed to a [`MeshBooleanProvider`](crate::MeshBooleanProvider).
#[derive(Debug, Clone, PartialEq)]
pub struct CellGeometry {
    /// Generator index of the cell.
    pub index: usize,
    pub generator: DVec3,
    /// Planes with the generator on their back side.
    pub half_spaces: Vec<Plane>,
    /// Box the cell is clipped to; contains the source mesh.
    pub enclosure: BoundingBox,
}

impl CellGeometry {
    /// `true` when `point` is inside every half-space and the enclosure.
    pub fn contains(&self, point: DVec3) -> bool {
        self.enclosure.contains(point) && self.half_spaces.iter().all(|plane| plane.contains(point))
    }
}

/// Builds one cell per generator.
///
/// A generator that coincides with an earlier one has no region of its own
/// and is skipped.
pub fn build_cells(generators: &[SeedPoint], enclosure: BoundingBox) -> Vec<CellGeometry> {
    let mut cells = Vec::with_capacity(generators.len());

    for (i, seed) in generators.iter().enumerate() {
        let duplicate = generators[..i]
            .iter()
            .any(|earlier| earlier.position.distance(seed.position) < VERTEX_MERGE_EPSILON);
        if duplicate {
            trace!(generator = seed.generator, "skipping coincident generator");
            continue;
        }

        let half_spaces = generators
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .filter_map(|(_, other)| Plane::bisector(seed.position, other.position))
            .collect();

        cells.push(CellGeometry {
            index: seed.generator,
            generator: seed.position,
            half_spaces,
            enclosure,
        });
    }

    cells
}
