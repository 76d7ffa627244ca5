//! # Uniform Subdivision
//!
//! Splits every edge into `cuts + 1` segments and every triangle into
//! `(cuts + 1)^2` triangles. Vertices created on an edge are shared by
//! both triangles using that edge, so closed meshes stay closed.

use crate::mesh::Mesh;
use glam::DVec3;
use std::collections::HashMap;

/// Returns a subdivided copy of `mesh`. `cuts == 0` returns a plain copy.
///
/// Original vertices keep their indices. Normals are not computed.
///
/// # Example
///
/// ```rust
/// use fracture_mesh::{primitives::cuboid, subdivide};
/// use glam::DVec3;
///
/// let cube = cuboid(DVec3::ZERO, DVec3::ONE);
/// let fine = subdivide(&cube, 2);
/// assert_eq!(fine.triangle_count(), 12 * 9);
/// ```
pub fn subdivide(mesh: &Mesh, cuts: u32) -> Mesh {
    if cuts == 0 {
        return mesh.clone();
    }

    let n = cuts + 1;
    let per_triangle = (n * n) as usize;
    let mut out = Mesh::with_capacity(
        mesh.vertex_count() * 4,
        mesh.triangle_count() * per_triangle,
    );
    for &v in mesh.vertices() {
        out.add_vertex(v);
    }

    // (low, high, step from low) -> shared edge vertex
    let mut edge_points: HashMap<(u32, u32, u32), u32> = HashMap::new();
    let mut lattice = Vec::with_capacity(((n + 1) * (n + 2) / 2) as usize);

    for &[a, b, c] in mesh.triangles() {
        lattice.clear();
        let (pa, pb, pc) = (mesh.vertex(a), mesh.vertex(b), mesh.vertex(c));

        // Row-major over i (toward b) then j (toward c), i + j <= n
        for i in 0..=n {
            for j in 0..=(n - i) {
                let index = if i == 0 && j == 0 {
                    a
                } else if i == n {
                    b
                } else if j == n {
                    c
                } else if j == 0 {
                    edge_point(&mut out, &mut edge_points, (a, pa), (b, pb), i, n)
                } else if i == 0 {
                    edge_point(&mut out, &mut edge_points, (a, pa), (c, pc), j, n)
                } else if i + j == n {
                    edge_point(&mut out, &mut edge_points, (b, pb), (c, pc), j, n)
                } else {
                    let t_b = f64::from(i) / f64::from(n);
                    let t_c = f64::from(j) / f64::from(n);
                    out.add_vertex(pa + (pb - pa) * t_b + (pc - pa) * t_c)
                };
                lattice.push(index);
            }
        }

        // Row i holds n + 1 - i entries
        let at = |i: u32, j: u32| -> u32 {
            let row_start = i * (n + 1) - i * i.saturating_sub(1) / 2;
            lattice[(row_start + j) as usize]
        };

        for i in 0..n {
            for j in 0..(n - i) {
                out.add_triangle(at(i, j), at(i + 1, j), at(i, j + 1));
                if i + j + 1 < n {
                    out.add_triangle(at(i + 1, j), at(i + 1, j + 1), at(i, j + 1));
                }
            }
        }
    }

    out
}

/// Vertex `step` of `n` segments from `from` toward `to`, created once per edge.
fn edge_point(
    out: &mut Mesh,
    cache: &mut HashMap<(u32, u32, u32), u32>,
    from: (u32, DVec3),
    to: (u32, DVec3),
    step: u32,
    n: u32,
) -> u32 {
    let (low, high, low_step) = if from.0 < to.0 {
        (from, to, step)
    } else {
        (to, from, n - step)
    };
    *cache.entry((low.0, high.0, low_step)).or_insert_with(|| {
        let t = f64::from(low_step) / f64::from(n);
        out.add_vertex(low.1.lerp(high.1, t))
    })
}
