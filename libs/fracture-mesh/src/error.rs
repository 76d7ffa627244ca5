//! # Mesh Errors
//!
//! Error types for mesh construction and clipping operations.

use thiserror::Error;

/// Errors that can occur in the geometry kernel.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Bounding box corners are inverted or not finite
    #[error("Invalid bounds: {message}")]
    InvalidBounds { message: String },

    /// Triangle references a vertex that does not exist
    #[error("Invalid topology: {message}")]
    InvalidTopology { message: String },

    /// Geometry has no usable area or volume
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    /// Clipping produced an unusable result
    #[error("Clipping failed: {message}")]
    ClipFailed { message: String },
}

impl MeshError {
    /// Creates an invalid bounds error.
    pub fn invalid_bounds(message: impl Into<String>) -> Self {
        Self::InvalidBounds {
            message: message.into(),
        }
    }

    /// Creates an invalid topology error.
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }

    /// Creates a clipping failed error.
    pub fn clip_failed(message: impl Into<String>) -> Self {
        Self::ClipFailed {
            message: message.into(),
        }
    }
}

/// Result type for geometry kernel operations.
pub type MeshResult<T> = Result<T, MeshError>;
