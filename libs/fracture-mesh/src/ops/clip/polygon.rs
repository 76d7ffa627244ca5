//! # Polygon for Clipping Operations
//!
//! Convex polygon with plane and splitting support.

use super::plane::{Classification, Plane};
use glam::DVec3;

// =============================================================================
// POLYGON
// =============================================================================

/// A convex polygon with its supporting plane.
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Vertices in counter-clockwise order seen from the front.
    vertices: Vec<DVec3>,
    plane: Plane,
}

impl Polygon {
    /// Create polygon from vertices.
    ///
    /// Returns `None` for fewer than three vertices or a collinear start.
    pub fn from_vertices(vertices: Vec<DVec3>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        Some(Self { vertices, plane })
    }

    /// Create polygon with a known supporting plane.
    ///
    /// Used for split pieces, whose first three vertices may be collinear.
    pub fn with_plane(vertices: Vec<DVec3>, plane: Plane) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        Some(Self { vertices, plane })
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Flip the polygon (reverse winding order and plane).
    pub fn flip(&self) -> Polygon {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Polygon {
            vertices,
            plane: self.plane.flip(),
        }
    }

    /// Vertex average.
    pub fn centroid(&self) -> DVec3 {
        self.vertices.iter().copied().sum::<DVec3>() / self.vertices.len() as f64
    }

    /// Polygon area from the fan of cross products.
    pub fn area(&self) -> f64 {
        let origin = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(|w| (w[0] - origin).cross(w[1] - origin))
            .sum::<DVec3>()
            .length()
            * 0.5
    }

    /// Classify this polygon relative to a plane.
    pub fn classify(&self, plane: &Plane) -> Classification {
        let mut front_count = 0;
        let mut back_count = 0;

        for &v in &self.vertices {
            match plane.classify_point(v) {
                Classification::Front => front_count += 1,
                Classification::Back => back_count += 1,
                _ => {}
            }
        }

        match (front_count > 0, back_count > 0) {
            (true, true) => Classification::Spanning,
            (true, false) => Classification::Front,
            (false, true) => Classification::Back,
            (false, false) => Classification::Coplanar,
        }
    }

    /// Split polygon by a plane.
    ///
    /// Returns the classification plus the front and back pieces. Whole
    /// polygons land on the side they lie on; coplanar polygons return
    /// no pieces and the caller routes them.
    pub fn split(&self, plane: &Plane) -> (Classification, Option<Polygon>, Option<Polygon>) {
        let classification = self.classify(plane);
        match classification {
            Classification::Coplanar => (classification, None, None),
            Classification::Front => (classification, Some(self.clone()), None),
            Classification::Back => (classification, None, Some(self.clone())),
            Classification::Spanning => {
                let mut front_verts = Vec::with_capacity(self.vertices.len() + 1);
                let mut back_verts = Vec::with_capacity(self.vertices.len() + 1);

                for i in 0..self.vertices.len() {
                    let j = (i + 1) % self.vertices.len();
                    let vi = self.vertices[i];
                    let vj = self.vertices[j];

                    let ti = plane.classify_point(vi);
                    let tj = plane.classify_point(vj);

                    if ti != Classification::Back {
                        front_verts.push(vi);
                    }
                    if ti != Classification::Front {
                        back_verts.push(vi);
                    }

                    // Edge crosses the plane
                    if (ti == Classification::Front && tj == Classification::Back)
                        || (ti == Classification::Back && tj == Classification::Front)
                    {
                        let di = plane.signed_distance(vi);
                        let dj = plane.signed_distance(vj);
                        let intersection = vi.lerp(vj, di / (di - dj));
                        front_verts.push(intersection);
                        back_verts.push(intersection);
                    }
                }

                (
                    classification,
                    Polygon::with_plane(front_verts, self.plane),
                    Polygon::with_plane(back_verts, self.plane),
                )
            }
        }
    }

    /// Keeps the part of the polygon behind `plane`.
    ///
    /// Coplanar polygons survive only when they face the same way as the
    /// plane, so a shared boundary is claimed by exactly one side.
    pub fn clip_to_back(self, plane: &Plane) -> Option<Polygon> {
        match self.split(plane) {
            (Classification::Coplanar, _, _) => {
                (self.plane.normal().dot(plane.normal()) > 0.0).then_some(self)
            }
            (_, _, back) => back,
        }
    }

    /// Fan triangulation from the first vertex.
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        let origin = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(move |w| [origin, w[0], w[1]])
    }
}

// =============================================================================
// TESTS
// =============================================================================
