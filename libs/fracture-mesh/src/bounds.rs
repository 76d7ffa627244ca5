//! # Bounding Box
//!
//! Axis-aligned bounding box in world-space coordinates.

use crate::error::{MeshError, MeshResult};
use glam::DVec3;

/// Axis-aligned box with `min <= max` componentwise.
///
/// Immutable once built; derived operations return new boxes.
///
/// # Example
///
/// ```rust
/// use fracture_mesh::BoundingBox;
/// use glam::DVec3;
///
/// let bounds = BoundingBox::new(DVec3::ZERO, DVec3::new(4.0, 1.0, 2.0)).unwrap();
/// assert_eq!(bounds.longest_axis(), 0);
/// assert_eq!(bounds.volume(), 8.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min: DVec3,
    max: DVec3,
}

impl BoundingBox {
    /// Creates a bounding box, rejecting inverted or non-finite corners.
    pub fn new(min: DVec3, max: DVec3) -> MeshResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(MeshError::invalid_bounds(format!(
                "corners must be finite, got {min} and {max}"
            )));
        }
        if min.cmpgt(max).any() {
            return Err(MeshError::invalid_bounds(format!(
                "min {min} exceeds max {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    /// Minimum corner.
    #[inline]
    pub fn min(&self) -> DVec3 {
        self.min
    }

    /// Maximum corner.
    #[inline]
    pub fn max(&self) -> DVec3 {
        self.max
    }

    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Product of the three extents.
    #[inline]
    pub fn volume(&self) -> f64 {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Index of the longest dimension (0 = X, 1 = Y, 2 = Z).
    ///
    /// Ties resolve toward the higher axis, so a cube reports Z.
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        let mut axis = 0;
        for candidate in 1..3 {
            if size[candidate] >= size[axis] {
                axis = candidate;
            }
        }
        axis
    }

    /// Distance from the center to any corner.
    #[inline]
    pub fn half_diagonal(&self) -> f64 {
        self.size().length() * 0.5
    }

    /// Box grown by `margin` on every side.
    ///
    /// Negative margins are clamped so the box never inverts.
    pub fn expanded(&self, margin: f64) -> Self {
        let grow = DVec3::splat(margin).max(-self.size() * 0.5);
        Self {
            min: self.min - grow,
            max: self.max + grow,
        }
    }

    /// Whether `point` lies inside or on the box.
    #[inline]
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}
