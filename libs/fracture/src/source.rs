//! # Source Mesh
//!
//! Mesh to be fractured, stored in local space with its world transform.

use fracture_mesh::{BoundingBox, Mesh};
use glam::DMat4;
use std::borrow::Cow;

/// Local-space geometry plus the transform placing it in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMesh {
    mesh: Mesh,
    transform: DMat4,
}

impl SourceMesh {
    /// Mesh already in world space.
    pub fn new(mesh: Mesh) -> Self {
        Self::with_transform(mesh, DMat4::IDENTITY)
    }

    pub fn with_transform(mesh: Mesh, transform: DMat4) -> Self {
        Self { mesh, transform }
    }

    /// Local-space geometry.
    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    #[inline]
    pub fn transform(&self) -> DMat4 {
        self.transform
    }

    /// Replaces the geometry, keeping the transform.
    pub fn replace_mesh(&mut self, mesh: Mesh) -> Mesh {
        std::mem::replace(&mut self.mesh, mesh)
    }

    /// Geometry with the transform baked in; borrows when the transform is
    /// the identity.
    pub fn world_mesh(&self) -> Cow<'_, Mesh> {
        if self.transform == DMat4::IDENTITY {
            Cow::Borrowed(&self.mesh)
        } else {
            let mut mesh = self.mesh.clone();
            mesh.transform(&self.transform);
            Cow::Owned(mesh)
        }
    }

    /// Owned world-space copy of the geometry.
    pub fn to_world(&self) -> Mesh {
        self.world_mesh().into_owned()
    }

    /// World-space bounding box, `None` for an empty mesh.
    pub fn world_bounds(&self) -> Option<BoundingBox> {
        self.world_mesh().bounds()
    }
}

impl From<Mesh> for SourceMesh {
    fn from(mesh: Mesh) -> Self {
        Self::new(mesh)
    }
}
