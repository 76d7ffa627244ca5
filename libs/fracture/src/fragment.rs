//! # Fragmenter
//!
//! Partitions a source mesh into one fragment per Voronoi cell that
//! overlaps it, then prunes fragments whose bounding box is smaller than
//! the minimum piece volume.
//!
//! ## Flow
//!
//! ```text
//! validate generators and min volume
//!   -> reject degenerate meshes, bake world transform, wind outward
//!   -> build cells (bisector half-spaces + enclosure)
//!   -> provider.intersect per cell (rayon, collected in cell order)
//!   -> volume filter
//! ```
//!
//! Undersized fragments are discarded, not merged into neighbours.

use crate::cell::{build_cells, CellGeometry};
use crate::error::{FractureError, FractureResult};
use crate::params::validate_min_volume;
use crate::provider::MeshBooleanProvider;
use crate::sampler::SeedPoint;
use crate::source::SourceMesh;
use config::constants::{approx_zero, CELL_BOUNDS_MARGIN, MIN_CELL_COUNT};
use fracture_mesh::{is_closed, BoundingBox, Mesh};
use glam::DVec3;
use rayon::prelude::*;
use tracing::{debug, trace};

// =============================================================================
// FRAGMENT
// =============================================================================

/// One world-space piece of a fractured mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    generator: usize,
    mesh: Mesh,
    bounds: BoundingBox,
    volume: f64,
    solid_volume: f64,
    centroid: DVec3,
}

impl Fragment {
    /// Wraps a non-empty mesh; `None` when it has no vertices.
    pub fn new(generator: usize, mesh: Mesh) -> Option<Self> {
        let bounds = mesh.bounds()?;
        Some(Self {
            generator,
            volume: bounds.volume(),
            solid_volume: mesh.volume(),
            centroid: mesh.centroid(),
            bounds,
            mesh,
        })
    }

    /// Index of the generator whose cell produced this piece.
    pub fn generator(&self) -> usize {
        self.generator
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Bounding-box volume, the measure the volume filter uses.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Enclosed volume of the closed mesh.
    pub fn solid_volume(&self) -> f64 {
        self.solid_volume
    }

    pub fn centroid(&self) -> DVec3 {
        self.centroid
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    /// Mesh moved so its centroid sits at the origin, plus the offset that
    /// puts it back in place.
    pub fn recentered(&self) -> (Mesh, DVec3) {
        let mut mesh = self.mesh.clone();
        mesh.translate(-self.centroid);
        (mesh, self.centroid)
    }
}

// =============================================================================
// FRAGMENTER
// =============================================================================

/// Voronoi fragmentation on top of a [`MeshBooleanProvider`].
#[derive(Debug, Clone, Default)]
pub struct Fragmenter<P> {
    provider: P,
}

impl<P: MeshBooleanProvider> Fragmenter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Splits `mesh` into fragments, one per overlapping cell, ordered by
    /// generator.
    ///
    /// # Errors
    ///
    /// - [`FractureError::InvalidParameters`]: fewer than 3 generators or a
    ///   non-positive `min_volume`. Checked before the provider is called.
    /// - [`FractureError::DegenerateMesh`]: empty, open or zero-volume mesh.
    /// - [`FractureError::Mesh`]: a triangle names a missing vertex.
    /// - [`FractureError::BooleanProvider`]: the provider failed on a cell.
    /// - [`FractureError::NoPieces`]: no cell overlapped the mesh.
    /// - [`FractureError::AllFragmentsFiltered`]: every piece was below
    ///   `min_volume`.
    pub fn fragment(
        &self,
        mesh: SourceMesh,
        generators: Vec<SeedPoint>,
        min_volume: f64,
    ) -> FractureResult<Vec<Fragment>> {
        if generators.len() < MIN_CELL_COUNT {
            return Err(FractureError::invalid(format!(
                "{} generators given, at least {MIN_CELL_COUNT} required",
                generators.len()
            )));
        }
        validate_min_volume(min_volume)?;

        let (world, enclosure) = prepare(&mesh)?;
        let cells = build_cells(&generators, enclosure);

        let results: Vec<_> = cells
            .par_iter()
            .map(|cell| (cell, self.provider.intersect(&world, cell)))
            .collect();

        let mut produced = Vec::with_capacity(results.len());
        for (cell, result) in results {
            let piece = result.map_err(|source| FractureError::BooleanProvider {
                cell: cell.index,
                source,
            })?;
            match piece.and_then(|piece| Fragment::new(cell.index, piece.to_world())) {
                Some(fragment) => produced.push(fragment),
                None => trace!(cell = cell.index, "cell does not overlap the mesh"),
            }
        }

        if produced.is_empty() {
            return Err(FractureError::NoPieces { cells: cells.len() });
        }

        let produced_count = produced.len();
        let fragments = filter_by_volume(produced, min_volume);
        if fragments.is_empty() {
            return Err(FractureError::AllFragmentsFiltered {
                produced: produced_count,
                min_volume,
            });
        }

        debug!(
            cells = cells.len(),
            produced = produced_count,
            retained = fragments.len(),
            "fragmented mesh"
        );
        Ok(fragments)
    }
}

/// Rejects meshes that cannot be fractured. Returns the world-space mesh
/// wound outward and the cell enclosure.
fn prepare(mesh: &SourceMesh) -> FractureResult<(SourceMesh, BoundingBox)> {
    mesh.mesh().check_indices()?;
    if mesh.mesh().is_empty() {
        return Err(FractureError::degenerate("mesh has no triangles"));
    }
    if !is_closed(mesh.mesh()) {
        return Err(FractureError::degenerate("mesh is not closed"));
    }

    let mut world = mesh.to_world();
    if approx_zero(world.signed_volume()) {
        return Err(FractureError::degenerate("mesh has zero volume"));
    }
    if world.orient_outward() {
        trace!("source mesh was wound inside-out, flipped");
    }

    let bounds = world
        .bounds()
        .ok_or_else(|| FractureError::degenerate("mesh has no vertices"))?;
    let enclosure = bounds.expanded(bounds.half_diagonal() * CELL_BOUNDS_MARGIN);
    Ok((SourceMesh::new(world), enclosure))
}

fn filter_by_volume(fragments: Vec<Fragment>, min_volume: f64) -> Vec<Fragment> {
    fragments
        .into_iter()
        .filter(|fragment| {
            let keep = fragment.volume() >= min_volume;
            if !keep {
                debug!(
                    generator = fragment.generator(),
                    volume = fragment.volume(),
                    min_volume,
                    "pruned undersized fragment"
                );
            }
            keep
        })
        .collect()
}

/// Cell geometry for a generator set, as the Fragmenter would build it.
///
/// Useful for hosts that drive their own boolean kernel.
pub fn cells_for(mesh: &SourceMesh, generators: &[SeedPoint]) -> FractureResult<Vec<CellGeometry>> {
    let (_, enclosure) = prepare(mesh)?;
    Ok(build_cells(generators, enclosure))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BoxError, ErrorKind};
    use crate::provider::PlaneSlicingProvider;
    use approx::assert_relative_eq;
    use fracture_mesh::primitives::cuboid;
    use glam::DMat4;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Forwards to the built-in provider and counts calls.
    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl MeshBooleanProvider for CountingProvider {
        fn intersect(&self, mesh: &SourceMesh, cell: &CellGeometry) -> Result<Option<SourceMesh>, BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            PlaneSlicingProvider.intersect(mesh, cell)
        }
    }

    struct MissProvider;

    impl MeshBooleanProvider for MissProvider {
        fn intersect(&self, _: &SourceMesh, _: &CellGeometry) -> Result<Option<SourceMesh>, BoxError> {
            Ok(None)
        }
    }

    /// Fails on one cell.
    struct FailingProvider {
        fail_on: usize,
    }

    impl MeshBooleanProvider for FailingProvider {
        fn intersect(&self, mesh: &SourceMesh, cell: &CellGeometry) -> Result<Option<SourceMesh>, BoxError> {
            if cell.index == self.fail_on {
                return Err("kernel rejected the cell".into());
            }
            PlaneSlicingProvider.intersect(mesh, cell)
        }
    }

    fn cube() -> SourceMesh {
        SourceMesh::new(cuboid(DVec3::ZERO, DVec3::splat(2.0)))
    }

    /// Centers of the eight unit octants of the 2-cube.
    fn octant_generators() -> Vec<SeedPoint> {
        let mut seeds = Vec::new();
        for x in [0.5, 1.5] {
            for y in [0.5, 1.5] {
                for z in [0.5, 1.5] {
                    seeds.push(SeedPoint::new(DVec3::new(x, y, z), seeds.len()));
                }
            }
        }
        seeds
    }

    #[test]
    fn test_too_few_generators_never_calls_provider() {
        let fragmenter = Fragmenter::new(CountingProvider::default());
        let generators = octant_generators().into_iter().take(2).collect();

        let err = fragmenter.fragment(cube(), generators, 0.01).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);
        assert_eq!(fragmenter.provider().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_min_volume_never_calls_provider() {
        let fragmenter = Fragmenter::new(CountingProvider::default());
        for min_volume in [0.0, -1.0, f64::NAN] {
            let err = fragmenter
                .fragment(cube(), octant_generators(), min_volume)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameters);
        }
        assert_eq!(fragmenter.provider().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_degenerate_meshes() {
        let fragmenter = Fragmenter::new(CountingProvider::default());

        let empty = SourceMesh::new(Mesh::new());
        let err = fragmenter.fragment(empty, octant_generators(), 0.01).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateMesh);

        let mut open = Mesh::new();
        let a = open.add_vertex(DVec3::ZERO);
        let b = open.add_vertex(DVec3::X);
        let c = open.add_vertex(DVec3::Y);
        open.add_triangle(a, b, c);
        let err = fragmenter
            .fragment(SourceMesh::new(open), octant_generators(), 0.01)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateMesh);

        // Closed but flat: the cube squashed to zero height
        let flat = SourceMesh::with_transform(
            cuboid(DVec3::ZERO, DVec3::ONE),
            DMat4::from_scale(DVec3::new(1.0, 1.0, 0.0)),
        );
        let err = fragmenter.fragment(flat, octant_generators(), 0.01).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateMesh);

        assert_eq!(fragmenter.provider().calls.load(Ordering::SeqCst), 0);
    }

    /// Cube built from the first seven corners of a 2-cube; triangles still
    /// reference the missing eighth.
    fn truncated_cube() -> Mesh {
        let cube = cuboid(DVec3::ZERO, DVec3::splat(2.0));
        let mut truncated = Mesh::new();
        for &v in &cube.vertices()[..7] {
            truncated.add_vertex(v);
        }
        for &[a, b, c] in cube.triangles() {
            truncated.add_triangle(a, b, c);
        }
        truncated
    }

    fn assert_unit_octants(fragments: &[Fragment]) {
        assert_eq!(fragments.len(), 8);
        for fragment in fragments {
            assert_relative_eq!(fragment.solid_volume(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(fragment.mesh().signed_volume(), 1.0, epsilon = 1e-6);
        }
        let total: f64 = fragments.iter().map(Fragment::solid_volume).sum();
        assert_relative_eq!(total, 8.0, epsilon = 1e-5);
    }

    #[test]
    fn test_out_of_range_index_is_degenerate() {
        let fragmenter = Fragmenter::new(CountingProvider::default());
        let err = fragmenter
            .fragment(SourceMesh::new(truncated_cube()), octant_generators(), 0.01)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateMesh);
        assert_eq!(fragmenter.provider().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_mirrored_source_keeps_outward_fragments() {
        let source = SourceMesh::with_transform(
            cuboid(DVec3::ZERO, DVec3::splat(2.0)),
            DMat4::from_scale(DVec3::new(-1.0, 1.0, 1.0)),
        );
        let generators = octant_generators()
            .into_iter()
            .map(|s| SeedPoint::new(s.position * DVec3::new(-1.0, 1.0, 1.0), s.generator))
            .collect();
        let fragments = Fragmenter::new(PlaneSlicingProvider)
            .fragment(source, generators, 0.5)
            .unwrap();

        assert_unit_octants(&fragments);
        for fragment in &fragments {
            assert!(fragment.bounds().max().x <= 1e-9);
        }
    }

    #[test]
    fn test_inside_out_source_is_reoriented() {
        let mut inverted = cuboid(DVec3::ZERO, DVec3::splat(2.0));
        inverted.flip_winding();
        let fragments = Fragmenter::new(PlaneSlicingProvider)
            .fragment(SourceMesh::new(inverted), octant_generators(), 0.5)
            .unwrap();
        assert_unit_octants(&fragments);
    }

    #[test]
    fn test_octants_split_cube_evenly() {
        let fragmenter = Fragmenter::new(PlaneSlicingProvider);
        let fragments = fragmenter.fragment(cube(), octant_generators(), 0.5).unwrap();

        assert_eq!(fragments.len(), 8);
        for (i, fragment) in fragments.iter().enumerate() {
            assert_eq!(fragment.generator(), i);
            assert_relative_eq!(fragment.volume(), 1.0, epsilon = 1e-6);
            assert_relative_eq!(fragment.solid_volume(), 1.0, epsilon = 1e-6);
        }
        let total: f64 = fragments.iter().map(Fragment::solid_volume).sum();
        assert_relative_eq!(total, 8.0, epsilon = 1e-5);
    }

    #[test]
    fn test_retained_fragments_meet_min_volume() {
        let fragmenter = Fragmenter::new(PlaneSlicingProvider);
        // Uneven split: one thin slab and two thick ones
        let generators = vec![
            SeedPoint::new(DVec3::new(0.1, 1.0, 1.0), 0),
            SeedPoint::new(DVec3::new(0.3, 1.0, 1.0), 1),
            SeedPoint::new(DVec3::new(1.5, 1.0, 1.0), 2),
        ];
        let min_volume = 1.0;
        let fragments = fragmenter.fragment(cube(), generators, min_volume).unwrap();

        // Slab 0 spans x in [0, 0.2]: box volume 0.8, pruned
        let kept: Vec<usize> = fragments.iter().map(Fragment::generator).collect();
        assert_eq!(kept, vec![1, 2]);
        for fragment in &fragments {
            assert!(fragment.volume() >= min_volume);
        }
    }

    #[test]
    fn test_all_filtered_is_distinct_error() {
        let fragmenter = Fragmenter::new(PlaneSlicingProvider);
        let err = fragmenter.fragment(cube(), octant_generators(), 2.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AllFragmentsFiltered);
        assert!(matches!(err, FractureError::AllFragmentsFiltered { produced: 8, .. }));
    }

    #[test]
    fn test_no_pieces() {
        let fragmenter = Fragmenter::new(MissProvider);
        let err = fragmenter.fragment(cube(), octant_generators(), 0.01).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FragmentationProducedNoPieces);
    }

    #[test]
    fn test_provider_failure_names_cell() {
        let fragmenter = Fragmenter::new(FailingProvider { fail_on: 3 });
        let err = fragmenter.fragment(cube(), octant_generators(), 0.01).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BooleanProviderFailure);
        assert!(matches!(err, FractureError::BooleanProvider { cell: 3, .. }));
    }

    #[test]
    fn test_transformed_source_fragments_in_world_space() {
        let source = SourceMesh::with_transform(
            cuboid(DVec3::ZERO, DVec3::splat(2.0)),
            DMat4::from_translation(DVec3::new(10.0, 0.0, 0.0)),
        );
        let generators = octant_generators()
            .into_iter()
            .map(|s| SeedPoint::new(s.position + DVec3::new(10.0, 0.0, 0.0), s.generator))
            .collect();
        let fragments = Fragmenter::new(PlaneSlicingProvider)
            .fragment(source, generators, 0.5)
            .unwrap();
        assert_eq!(fragments.len(), 8);
        for fragment in &fragments {
            assert!(fragment.bounds().min().x >= 10.0 - 1e-9);
        }
    }

    #[test]
    fn test_recentered_fragment() {
        let fragment = Fragment::new(0, cuboid(DVec3::splat(2.0), DVec3::splat(4.0))).unwrap();
        let (mesh, offset) = fragment.recentered();
        assert_relative_eq!(offset.x, 3.0, epsilon = 1e-9);
        assert_relative_eq!(mesh.centroid().length(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(fragment.volume(), 8.0);
    }

    #[test]
    fn test_cells_for_matches_generators() {
        let cells = cells_for(&cube(), &octant_generators()).unwrap();
        assert_eq!(cells.len(), 8);
        assert!(cells[0].enclosure.contains(DVec3::splat(-0.01)));
    }
}
