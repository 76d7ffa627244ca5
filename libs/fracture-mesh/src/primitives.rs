//! # Primitives
//!
//! Closed, outward-wound meshes used as fracture sources and test fixtures.

use crate::mesh::Mesh;
use glam::DVec3;
use std::f64::consts::PI;

/// Axis-aligned box with 8 shared corner vertices and 12 triangles.
///
/// # Example
///
/// ```rust
/// use fracture_mesh::primitives::cuboid;
/// use glam::DVec3;
///
/// let cube = cuboid(DVec3::ZERO, DVec3::ONE);
/// assert_eq!(cube.triangle_count(), 12);
/// ```
pub fn cuboid(min: DVec3, max: DVec3) -> Mesh {
    let mut mesh = Mesh::with_capacity(8, 12);

    // Corner i picks max on X/Y/Z when bit 0/1/2 is set
    for i in 0..8u32 {
        mesh.add_vertex(DVec3::new(
            if i & 1 != 0 { max.x } else { min.x },
            if i & 2 != 0 { max.y } else { min.y },
            if i & 4 != 0 { max.z } else { min.z },
        ));
    }

    const QUADS: [[u32; 4]; 6] = [
        [0, 2, 3, 1], // -Z
        [4, 5, 7, 6], // +Z
        [0, 1, 5, 4], // -Y
        [2, 6, 7, 3], // +Y
        [0, 4, 6, 2], // -X
        [1, 3, 7, 5], // +X
    ];

    for [a, b, c, d] in QUADS {
        mesh.add_triangle(a, b, c);
        mesh.add_triangle(a, c, d);
    }

    mesh
}

/// UV sphere with shared poles.
///
/// `segments` is clamped to at least 3 and `rings` to at least 2.
pub fn uv_sphere(center: DVec3, radius: f64, segments: u32, rings: u32) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let ring_vertices = (rings - 1) * segments;
    let mut mesh = Mesh::with_capacity(
        ring_vertices as usize + 2,
        (2 * segments * (rings - 1)) as usize,
    );

    let north = mesh.add_vertex(center + DVec3::Z * radius);
    for ring in 1..rings {
        let theta = PI * f64::from(ring) / f64::from(rings);
        for segment in 0..segments {
            let phi = 2.0 * PI * f64::from(segment) / f64::from(segments);
            let direction = DVec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
            mesh.add_vertex(center + direction * radius);
        }
    }
    let south = mesh.add_vertex(center - DVec3::Z * radius);

    let ring_start = |ring: u32| 1 + (ring - 1) * segments;

    for s in 0..segments {
        let next = (s + 1) % segments;
        let first = ring_start(1);
        mesh.add_triangle(north, first + s, first + next);
    }

    for ring in 1..rings - 1 {
        let upper = ring_start(ring);
        let lower = ring_start(ring + 1);
        for s in 0..segments {
            let next = (s + 1) % segments;
            let (a, b) = (upper + s, upper + next);
            let (c, d) = (lower + s, lower + next);
            mesh.add_triangle(a, c, d);
            mesh.add_triangle(a, d, b);
        }
    }

    let last = ring_start(rings - 1);
    for s in 0..segments {
        let next = (s + 1) % segments;
        mesh.add_triangle(south, last + next, last + s);
    }

    mesh
}
