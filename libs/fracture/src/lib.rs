//! # Fracture
//!
//! Procedural fracture engine: turns a closed mesh and a set of fracture
//! parameters into Voronoi fragments, and carves surface cracks.
//!
//! ## Architecture
//!
//! ```text
//! FractureParameters
//!        │
//!        ▼
//! sampler::sample ──► relax::Relaxer ──► fragment::Fragmenter ──► Vec<Fragment>
//!                                              │
//!                                              ▼
//!                                    MeshBooleanProvider (injected)
//!
//! batch::VariationBatcher   runs the pipeline once per variation seed
//! crack::CrackPainter       carves cracks into a SourceMesh in place
//! ```
//!
//! ## Determinism
//!
//! Every random decision comes from a `ChaCha8Rng` seeded from the caller's
//! seed, and parallel work is collected in index order. The same inputs
//! always produce the same points, fragments and cracks.
//!
//! ## Usage
//!
//! ```rust
//! use fracture::{FracturePipeline, MaterialPreset, SourceMesh};
//! use fracture_mesh::primitives::cuboid;
//! use glam::DVec3;
//!
//! let mesh = SourceMesh::new(cuboid(DVec3::ZERO, DVec3::splat(2.0)));
//! let params = MaterialPreset::Plastic.parameters();
//!
//! let fragments = FracturePipeline::new().fracture(&mesh, &params).unwrap();
//! for fragment in &fragments {
//!     assert!(fragment.volume() >= params.minimum_piece_volume);
//! }
//! ```

pub mod batch;
pub mod cell;
pub mod crack;
pub mod error;
pub mod fragment;
pub mod params;
pub mod pipeline;
pub mod provider;
pub mod relax;
pub mod sampler;
pub mod source;

pub use batch::{generate_variations, variation_seeds, Variation, VariationBatch, VariationBatcher, VariationFailure};
pub use cell::{build_cells, CellGeometry};
pub use crack::{paint_cracks, CrackConfig, CrackPainter, CrackReport};
pub use error::{BoxError, ErrorKind, FractureError, FractureResult};
pub use fragment::{cells_for, Fragment, Fragmenter};
pub use params::{DistributionPattern, FractureParameters, MaterialPreset};
pub use pipeline::{FracturePipeline, PipelineConfig};
pub use provider::{MeshBooleanProvider, PlaneSlicingProvider};
pub use relax::{relax, RelaxConfig, Relaxer};
pub use sampler::{sample, SeedPoint};
pub use source::SourceMesh;
