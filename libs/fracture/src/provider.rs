//! # Mesh Boolean Provider
//!
//! Capability the Fragmenter uses to intersect the source mesh with one
//! Voronoi cell. Hosts with their own geometry kernel implement
//! [`MeshBooleanProvider`]; [`PlaneSlicingProvider`] is the built-in
//! implementation on top of `fracture_mesh::intersect_convex`.

use crate::cell::CellGeometry;
use crate::error::BoxError;
use crate::source::SourceMesh;
use fracture_mesh::intersect_convex;
use std::sync::Arc;

/// Intersects a mesh with a convex cell.
///
/// Calls for different cells may run concurrently and must not depend on
/// each other.
pub trait MeshBooleanProvider: Send + Sync {
    /// Returns the part of `mesh` inside `cell` in world space, or `None`
    /// when the cell does not meaningfully overlap the mesh.
    fn intersect(&self, mesh: &SourceMesh, cell: &CellGeometry) -> Result<Option<SourceMesh>, BoxError>;
}

impl<P: MeshBooleanProvider + ?Sized> MeshBooleanProvider for &P {
    fn intersect(&self, mesh: &SourceMesh, cell: &CellGeometry) -> Result<Option<SourceMesh>, BoxError> {
        (**self).intersect(mesh, cell)
    }
}

impl<P: MeshBooleanProvider + ?Sized> MeshBooleanProvider for Box<P> {
    fn intersect(&self, mesh: &SourceMesh, cell: &CellGeometry) -> Result<Option<SourceMesh>, BoxError> {
        (**self).intersect(mesh, cell)
    }
}

impl<P: MeshBooleanProvider + ?Sized> MeshBooleanProvider for Arc<P> {
    fn intersect(&self, mesh: &SourceMesh, cell: &CellGeometry) -> Result<Option<SourceMesh>, BoxError> {
        (**self).intersect(mesh, cell)
    }
}

/// Clips the world-space mesh by every bisector plane of the cell and caps
/// the cut faces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaneSlicingProvider;

impl MeshBooleanProvider for PlaneSlicingProvider {
    fn intersect(&self, mesh: &SourceMesh, cell: &CellGeometry) -> Result<Option<SourceMesh>, BoxError> {
        let world = mesh.world_mesh();
        let piece = intersect_convex(&world, &cell.half_spaces, &cell.enclosure)?;
        Ok(piece.map(SourceMesh::new))
    }
}
