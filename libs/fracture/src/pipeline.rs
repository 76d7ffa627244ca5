//! # Fracture Pipeline
//!
//! One fracture request end to end:
//!
//! ```text
//! FractureParameters ──validate──► world bounds ──► sample ──► relax ──► fragment
//! ```
//!
//! Relaxation uses the fracture seed, so a request is reproducible from its
//! parameters alone.

use crate::error::{FractureError, FractureResult};
use crate::fragment::{Fragment, Fragmenter};
use crate::params::FractureParameters;
use crate::provider::{MeshBooleanProvider, PlaneSlicingProvider};
use crate::relax::{RelaxConfig, Relaxer};
use crate::sampler::{sample, SeedPoint};
use crate::source::SourceMesh;
use config::constants::{DEFAULT_RELAXATION_ITERATIONS, RELAXATION_SAMPLES_PER_POINT};

/// Algorithm tunables that are not part of [`FractureParameters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub relax_iterations: u32,
    pub samples_per_point: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            relax_iterations: DEFAULT_RELAXATION_ITERATIONS,
            samples_per_point: RELAXATION_SAMPLES_PER_POINT,
        }
    }
}

/// Sampler, relaxer and fragmenter wired together.
///
/// # Example
///
/// ```rust
/// use fracture::{DistributionPattern, FractureParameters, FracturePipeline, SourceMesh};
/// use fracture_mesh::primitives::cuboid;
/// use glam::DVec3;
///
/// let mesh = SourceMesh::new(cuboid(DVec3::ZERO, DVec3::splat(2.0)));
/// let params = FractureParameters {
///     voronoi_cell_count: 8,
///     fracture_pattern: DistributionPattern::Grid,
///     fracture_randomness: 0.0,
///     ..FractureParameters::default()
/// };
///
/// let fragments = FracturePipeline::new().fracture(&mesh, &params).unwrap();
/// assert!(!fragments.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct FracturePipeline<P = PlaneSlicingProvider> {
    fragmenter: Fragmenter<P>,
    config: PipelineConfig,
}

impl FracturePipeline {
    /// Pipeline on the built-in plane-slicing provider.
    pub fn new() -> Self {
        Self::with_provider(PlaneSlicingProvider)
    }
}

impl Default for FracturePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: MeshBooleanProvider> FracturePipeline<P> {
    pub fn with_provider(provider: P) -> Self {
        Self {
            fragmenter: Fragmenter::new(provider),
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn fragmenter(&self) -> &Fragmenter<P> {
        &self.fragmenter
    }

    /// Sampled and relaxed generators for `mesh`.
    ///
    /// # Errors
    ///
    /// Returns [`FractureError::InvalidParameters`] for invalid parameters
    /// and [`FractureError::DegenerateMesh`] for a mesh without vertices.
    pub fn seed_points(&self, mesh: &SourceMesh, params: &FractureParameters) -> FractureResult<Vec<SeedPoint>> {
        params.validate()?;
        let bounds = mesh
            .world_bounds()
            .ok_or_else(|| FractureError::degenerate("mesh has no vertices"))?;

        let points = sample(
            params.voronoi_cell_count,
            bounds,
            params.fracture_pattern,
            params.fracture_seed,
            params.fracture_randomness,
        );
        let relaxer = Relaxer::new(RelaxConfig {
            samples_per_point: self.config.samples_per_point,
            seed: params.fracture_seed,
        });
        Ok(relaxer.relax(points, bounds, self.config.relax_iterations))
    }

    /// Fractures `mesh` with `params`.
    pub fn fracture(&self, mesh: &SourceMesh, params: &FractureParameters) -> FractureResult<Vec<Fragment>> {
        let generators = self.seed_points(mesh, params)?;
        self.fragmenter
            .fragment(mesh.clone(), generators, params.minimum_piece_volume)
    }
}
