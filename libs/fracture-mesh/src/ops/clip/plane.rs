//! # Plane for Clipping Operations
//!
//! Oriented plane with point classification. The back side
//! (negative signed distance) is the inside of a half-space.

use config::constants::{EPSILON, PLANE_EPSILON};
use glam::DVec3;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classification of a point or polygon relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// In front of the plane (positive side).
    Front,
    /// Behind the plane (negative side).
    Back,
    /// On the plane within tolerance.
    Coplanar,
    /// Polygon has vertices on both sides.
    Spanning,
}

// =============================================================================
// PLANE
// =============================================================================

/// A plane `normal · x = w` with unit normal.
///
/// # Example
///
/// ```rust
/// use fracture_mesh::Plane;
/// use glam::DVec3;
///
/// let plane = Plane::from_point_normal(DVec3::new(0.0, 0.0, 2.0), DVec3::Z).unwrap();
/// assert!(plane.contains(DVec3::ZERO));
/// assert!(!plane.contains(DVec3::new(0.0, 0.0, 3.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: DVec3,
    w: f64,
}

impl Plane {
    /// Plane through `point` facing `normal`. `None` for a zero normal.
    pub fn from_point_normal(point: DVec3, normal: DVec3) -> Option<Self> {
        let normal = normal.try_normalize()?;
        Some(Self {
            normal,
            w: normal.dot(point),
        })
    }

    /// Plane through three points, facing the counter-clockwise side.
    ///
    /// Returns `None` for collinear points.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let cross = (b - a).cross(c - a);
        if cross.length_squared() < EPSILON * EPSILON {
            return None;
        }
        Self::from_point_normal(a, cross)
    }

    /// Perpendicular bisector of `keep` and `other`, with `keep` behind it.
    ///
    /// Returns `None` when the two points coincide.
    pub fn bisector(keep: DVec3, other: DVec3) -> Option<Self> {
        Self::from_point_normal((keep + other) * 0.5, other - keep)
    }

    #[inline]
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    #[inline]
    pub fn w(&self) -> f64 {
        self.w
    }

    /// Flip the plane (reverse normal).
    pub fn flip(&self) -> Plane {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance from point to plane.
    ///
    /// Positive = front, negative = back, zero = on plane.
    #[inline]
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.w
    }

    /// Classify a point relative to this plane.
    pub fn classify_point(&self, point: DVec3) -> Classification {
        let dist = self.signed_distance(point);
        if dist > PLANE_EPSILON {
            Classification::Front
        } else if dist < -PLANE_EPSILON {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }

    /// Whether `point` lies in the closed back half-space.
    #[inline]
    pub fn contains(&self, point: DVec3) -> bool {
        self.signed_distance(point) <= PLANE_EPSILON
    }

    /// Orthogonal projection of `point` onto the plane.
    #[inline]
    pub fn project(&self, point: DVec3) -> DVec3 {
        point - self.normal * self.signed_distance(point)
    }

    /// Same plane within tolerance, including orientation.
    pub fn approx_eq(&self, other: &Plane) -> bool {
        self.normal.dot(other.normal) > 1.0 - PLANE_EPSILON
            && (self.w - other.w).abs() < PLANE_EPSILON
    }
}

// =============================================================================
// TESTS
// =============================================================================
