//! # Fracture Errors
//!
//! Error types for the fracture engine.
//!
//! Every error maps to an [`ErrorKind`] so hosts can branch on the failure
//! class without matching on messages or payloads.

use fracture_mesh::MeshError;
use thiserror::Error;

/// Boxed error surfaced by a [`MeshBooleanProvider`](crate::MeshBooleanProvider).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure class of a [`FractureError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected before any computation; the caller can fix the input.
    InvalidParameters,
    /// Zero-volume, empty or non-manifold source mesh.
    DegenerateMesh,
    /// No cell intersected the mesh.
    FragmentationProducedNoPieces,
    /// Pieces were produced but every one fell below the minimum volume.
    AllFragmentsFiltered,
    /// The injected boolean provider returned an error.
    BooleanProviderFailure,
}

/// Errors that can occur during fracture generation.
#[derive(Debug, Error)]
pub enum FractureError {
    /// Parameter outside its valid range
    #[error("Invalid parameters: {message}")]
    InvalidParameters { message: String },

    /// Source mesh cannot be fractured
    #[error("Degenerate mesh: {message}")]
    DegenerateMesh { message: String },

    /// Geometry kernel rejected the mesh
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// Every cell missed the mesh
    #[error("Fragmentation produced no pieces from {cells} cells")]
    NoPieces { cells: usize },

    /// Every produced piece was below the volume threshold
    #[error("All {produced} fragments fell below the minimum volume {min_volume}")]
    AllFragmentsFiltered { produced: usize, min_volume: f64 },

    /// Boolean provider failed on a cell
    #[error("Boolean provider failed on cell {cell}: {source}")]
    BooleanProvider {
        cell: usize,
        #[source]
        source: BoxError,
    },
}

impl FractureError {
    /// Creates an invalid parameters error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    /// Creates a degenerate mesh error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateMesh {
            message: message.into(),
        }
    }

    /// Returns the failure class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameters { .. } => ErrorKind::InvalidParameters,
            Self::DegenerateMesh { .. } | Self::Mesh(_) => ErrorKind::DegenerateMesh,
            Self::NoPieces { .. } => ErrorKind::FragmentationProducedNoPieces,
            Self::AllFragmentsFiltered { .. } => ErrorKind::AllFragmentsFiltered,
            Self::BooleanProvider { .. } => ErrorKind::BooleanProviderFailure,
        }
    }
}

/// Result type for fracture operations.
pub type FractureResult<T> = Result<T, FractureError>;
