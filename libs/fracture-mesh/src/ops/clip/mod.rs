//! # Convex Clipping
//!
//! Intersection of a closed mesh with a convex region given as a set of
//! half-spaces. This is the geometric core of Voronoi fragmentation: each
//! cell is the intersection of perpendicular-bisector half-spaces.
//!
//! ## Algorithm
//!
//! ```text
//! 1. Clip every surface triangle against every half-space (keep back side)
//! 2. For each cell wall, build a large quad on its plane and clip it
//!    against all other walls and the enclosure box
//! 3. Cut those wall caps with a BSP tree of the mesh and keep the pieces
//!    whose centroid ray-casts inside the mesh
//! 4. Fan-triangulate surface and caps, welding shared vertices
//! ```
//!
//! ## Module Structure
//!
//! - `mod.rs` - Public API (this file)
//! - `plane.rs` - Oriented planes and point classification
//! - `polygon.rs` - Convex polygon splitting
//! - `bsp.rs` - Arena BSP tree with robust leaf classification
//! - `geometry.rs` - Ray casting and vertex welding

mod bsp;
mod geometry;
mod plane;
mod polygon;

pub use bsp::BspTree;
pub use geometry::{point_inside_mesh, ray_triangle_intersect, VertexWelder};
pub use plane::{Classification, Plane};
pub use polygon::Polygon;

use crate::bounds::BoundingBox;
use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use config::constants::EPSILON;
use glam::DVec3;
use tracing::trace;

/// Intersects `mesh` with the convex region behind every plane in
/// `half_spaces`, bounded by `enclosure`.
///
/// `enclosure` must contain the mesh; it only caps cells that are open
/// toward the outside. Returns `Ok(None)` when the region does not overlap
/// the mesh with positive volume.
///
/// # Errors
///
/// Returns [`MeshError::DegenerateGeometry`] for an empty mesh.
///
/// # Example
///
/// ```rust
/// use fracture_mesh::{intersect_convex, primitives::cuboid, Plane};
/// use glam::DVec3;
///
/// let cube = cuboid(DVec3::ZERO, DVec3::splat(2.0));
/// let enclosure = cube.bounds().unwrap().expanded(0.1);
/// let left = Plane::from_point_normal(DVec3::new(0.5, 0.0, 0.0), DVec3::X).unwrap();
///
/// let piece = intersect_convex(&cube, &[left], &enclosure).unwrap().unwrap();
/// assert!((piece.volume() - 2.0).abs() < 1e-6);
/// ```
pub fn intersect_convex(
    mesh: &Mesh,
    half_spaces: &[Plane],
    enclosure: &BoundingBox,
) -> MeshResult<Option<Mesh>> {
    if mesh.is_empty() {
        return Err(MeshError::degenerate("cannot clip an empty mesh"));
    }

    let mut walls: Vec<Plane> = Vec::with_capacity(half_spaces.len());
    for plane in half_spaces {
        if !walls.iter().any(|w| w.approx_eq(plane)) {
            walls.push(*plane);
        }
    }

    let mut limits = walls.clone();
    limits.extend(enclosure_planes(enclosure));

    // Surface of the mesh inside the cell
    let mut polygons: Vec<Polygon> = (0..mesh.triangle_count())
        .filter_map(|i| Polygon::from_vertices(mesh.triangle_positions(i).to_vec()))
        .filter_map(|poly| clip_to_region(poly, &limits, None))
        .collect();
    let surface_count = polygons.len();

    // Cell walls inside the mesh
    let half_width = enclosure.half_diagonal() * 2.0 + 1.0;
    let caps: Vec<Polygon> = walls
        .iter()
        .enumerate()
        .filter_map(|(i, wall)| {
            let quad = plane_quad(wall, enclosure.center(), half_width)?;
            clip_to_region(quad, &limits, Some(i))
        })
        .collect();

    if !caps.is_empty() {
        let tree = BspTree::build(
            (0..mesh.triangle_count())
                .filter_map(|i| Polygon::from_vertices(mesh.triangle_positions(i).to_vec()))
                .collect(),
        );
        polygons.extend(tree.clip_polygons_robust(caps, mesh, true));
    }

    trace!(
        walls = walls.len(),
        surface = surface_count,
        caps = polygons.len() - surface_count,
        "clipped mesh to convex region"
    );

    if polygons.is_empty() {
        return Ok(None);
    }

    let mut welder = VertexWelder::new();
    for poly in &polygons {
        for triangle in poly.triangles() {
            welder.add_triangle(triangle);
        }
    }
    let piece = welder.finish();

    if piece.is_empty() || piece.volume() < EPSILON {
        return Ok(None);
    }
    Ok(Some(piece))
}

/// Clips a polygon to the back of every plane in `limits`, skipping the
/// plane at index `skip` (the polygon's own wall).
fn clip_to_region(poly: Polygon, limits: &[Plane], skip: Option<usize>) -> Option<Polygon> {
    limits
        .iter()
        .enumerate()
        .filter(|(j, _)| Some(*j) != skip)
        .try_fold(poly, |poly, (_, plane)| poly.clip_to_back(plane))
}

/// Outward-facing planes of the six box sides.
fn enclosure_planes(enclosure: &BoundingBox) -> Vec<Plane> {
    let (min, max) = (enclosure.min(), enclosure.max());
    [
        (min, -DVec3::X),
        (max, DVec3::X),
        (min, -DVec3::Y),
        (max, DVec3::Y),
        (min, -DVec3::Z),
        (max, DVec3::Z),
    ]
    .into_iter()
    .filter_map(|(point, normal)| Plane::from_point_normal(point, normal))
    .collect()
}

/// Square of half-width `half_width` on `plane`, centred on the projection
/// of `center`, wound so its normal matches the plane's.
fn plane_quad(plane: &Plane, center: DVec3, half_width: f64) -> Option<Polygon> {
    let normal = plane.normal();
    let u = normal.any_orthonormal_vector();
    let v = normal.cross(u);
    let origin = plane.project(center);

    let corners = vec![
        origin + (-u - v) * half_width,
        origin + (u - v) * half_width,
        origin + (u + v) * half_width,
        origin + (-u + v) * half_width,
    ];
    Polygon::with_plane(corners, *plane)
}

// =============================================================================
// TESTS
// =============================================================================
