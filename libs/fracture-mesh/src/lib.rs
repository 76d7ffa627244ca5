//! # Fracture Mesh
//!
//! Geometry kernel used by the fracture engine: indexed triangle meshes
//! with f64 positions, bounding boxes, topology queries, uniform
//! subdivision and convex clipping.
//!
//! ## Architecture
//!
//! ```text
//! Mesh ──► topology (edges, adjacency, closedness)
//!   │
//!   ├──► subdivide (shared edge vertices)
//!   │
//!   └──► ops::clip::intersect_convex (mesh ∩ convex half-space set)
//! ```
//!
//! ## Algorithms
//!
//! - **Clipping**: Successive half-space clipping of the surface plus
//!   cap faces classified with a BSP tree and ray-cast voting
//! - **Volume**: Divergence theorem over signed tetrahedra
//! - **Subdivision**: Barycentric lattice per triangle, edge vertices
//!   shared between neighbours
//!
//! ## Usage
//!
//! ```rust
//! use fracture_mesh::{primitives, BoundingBox};
//! use glam::DVec3;
//!
//! let cube = primitives::cuboid(DVec3::ZERO, DVec3::splat(2.0));
//! assert_eq!(cube.vertex_count(), 8);
//! assert!((cube.volume() - 8.0).abs() < 1e-9);
//!
//! let bounds = cube.bounds().unwrap();
//! assert_eq!(bounds, BoundingBox::new(DVec3::ZERO, DVec3::splat(2.0)).unwrap());
//! ```

pub mod bounds;
pub mod error;
pub mod mesh;
pub mod ops;
pub mod primitives;
pub mod subdivide;
pub mod topology;

pub use bounds::BoundingBox;
pub use error::{MeshError, MeshResult};
pub use mesh::Mesh;
pub use ops::clip::{intersect_convex, Plane};
pub use subdivide::subdivide;
pub use topology::{is_closed, VertexAdjacency};
