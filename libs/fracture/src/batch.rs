//! # Variation Batcher
//!
//! Precomputes several fracture variants of one mesh. Run `i` uses seed
//! `base + i * 1000` (wrapping), so every variant can be regenerated alone.
//!
//! Runs are independent and execute on rayon. A failed run is recorded and
//! skipped; the others still complete. Results are reported in run order.

use crate::error::{FractureError, FractureResult};
use crate::fragment::Fragment;
use crate::params::FractureParameters;
use crate::pipeline::FracturePipeline;
use crate::provider::{MeshBooleanProvider, PlaneSlicingProvider};
use crate::source::SourceMesh;
use config::constants::variation_seed;
use rayon::prelude::*;
use tracing::{info, warn};

/// Successful run.
#[derive(Debug, Clone)]
pub struct Variation {
    pub index: u32,
    pub seed: u64,
    pub fragments: Vec<Fragment>,
}

/// Failed run.
#[derive(Debug)]
pub struct VariationFailure {
    pub index: u32,
    pub seed: u64,
    pub error: FractureError,
}

/// Outcome of a batch, in run order.
#[derive(Debug, Default)]
pub struct VariationBatch {
    variations: Vec<Variation>,
    failures: Vec<VariationFailure>,
}

impl VariationBatch {
    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    pub fn failures(&self) -> &[VariationFailure] {
        &self.failures
    }

    /// Number of runs started.
    pub fn attempted(&self) -> usize {
        self.variations.len() + self.failures.len()
    }

    pub fn succeeded(&self) -> usize {
        self.variations.len()
    }

    /// Seed of every attempted run, successful or not, by run index.
    pub fn seeds(&self) -> Vec<u64> {
        let mut runs: Vec<(u32, u64)> = self
            .variations
            .iter()
            .map(|v| (v.index, v.seed))
            .chain(self.failures.iter().map(|f| (f.index, f.seed)))
            .collect();
        runs.sort_unstable_by_key(|(index, _)| *index);
        runs.into_iter().map(|(_, seed)| seed).collect()
    }

    /// Fragment sets of the successful runs.
    pub fn into_fragment_sets(self) -> Vec<Vec<Fragment>> {
        self.variations.into_iter().map(|v| v.fragments).collect()
    }
}

/// Seeds used for `count` variations of `base`.
pub fn variation_seeds(base: u64, count: u32) -> Vec<u64> {
    (0..count).map(|i| variation_seed(base, i)).collect()
}

/// Runs the fracture pipeline once per variation seed.
#[derive(Debug, Clone)]
pub struct VariationBatcher<P = PlaneSlicingProvider> {
    pipeline: FracturePipeline<P>,
}

impl VariationBatcher {
    pub fn new() -> Self {
        Self::with_pipeline(FracturePipeline::new())
    }
}

impl Default for VariationBatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: MeshBooleanProvider> VariationBatcher<P> {
    pub fn with_pipeline(pipeline: FracturePipeline<P>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &FracturePipeline<P> {
        &self.pipeline
    }

    /// Runs `count` variations and reports each outcome.
    ///
    /// # Errors
    ///
    /// Returns [`FractureError::InvalidParameters`] when `params` would fail
    /// every run; no run is started in that case.
    pub fn run(&self, mesh: &SourceMesh, params: &FractureParameters, count: u32) -> FractureResult<VariationBatch> {
        params.validate()?;

        let outcomes: Vec<_> = (0..count)
            .into_par_iter()
            .map(|index| {
                let seed = variation_seed(params.fracture_seed, index);
                (index, seed, self.pipeline.fracture(mesh, &params.with_seed(seed)))
            })
            .collect();

        let mut batch = VariationBatch::default();
        for (index, seed, outcome) in outcomes {
            match outcome {
                Ok(fragments) => batch.variations.push(Variation {
                    index,
                    seed,
                    fragments,
                }),
                Err(error) => {
                    warn!(index, seed, kind = ?error.kind(), %error, "fracture variation failed");
                    batch.failures.push(VariationFailure { index, seed, error });
                }
            }
        }

        info!(
            attempted = batch.attempted(),
            succeeded = batch.succeeded(),
            "generated fracture variations"
        );
        Ok(batch)
    }

    /// Fragment sets of the successful runs, in run order.
    pub fn generate_variations(
        &self,
        mesh: SourceMesh,
        params: FractureParameters,
        count: u32,
    ) -> FractureResult<Vec<Vec<Fragment>>> {
        Ok(self.run(&mesh, &params, count)?.into_fragment_sets())
    }
}

/// [`VariationBatcher::generate_variations`] on the built-in provider.
pub fn generate_variations(
    mesh: SourceMesh,
    params: FractureParameters,
    count: u32,
) -> FractureResult<Vec<Vec<Fragment>>> {
    VariationBatcher::new().generate_variations(mesh, params, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellGeometry;
    use crate::error::{BoxError, ErrorKind};
    use crate::params::DistributionPattern;
    use fracture_mesh::primitives::cuboid;
    use glam::DVec3;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Fails the first call it sees, then forwards.
    #[derive(Default)]
    struct FailOnceProvider {
        failed: AtomicBool,
    }

    impl MeshBooleanProvider for FailOnceProvider {
        fn intersect(&self, mesh: &SourceMesh, cell: &CellGeometry) -> Result<Option<SourceMesh>, BoxError> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err("transient kernel failure".into());
            }
            PlaneSlicingProvider.intersect(mesh, cell)
        }
    }

    fn cube() -> SourceMesh {
        SourceMesh::new(cuboid(DVec3::ZERO, DVec3::splat(2.0)))
    }

    fn params(seed: u64) -> FractureParameters {
        FractureParameters {
            voronoi_cell_count: 8,
            fracture_seed: seed,
            fracture_pattern: DistributionPattern::Grid,
            fracture_randomness: 0.5,
            ..FractureParameters::default()
        }
    }

    #[test]
    fn test_variation_seeds() {
        assert_eq!(variation_seeds(100, 5), vec![100, 1100, 2100, 3100, 4100]);
        assert!(variation_seeds(7, 0).is_empty());
    }

    #[test]
    fn test_runs_use_strided_seeds() {
        let batch = VariationBatcher::new().run(&cube(), &params(100), 5).unwrap();
        assert_eq!(batch.attempted(), 5);
        assert_eq!(batch.seeds(), vec![100, 1100, 2100, 3100, 4100]);
        for (i, variation) in batch.variations().iter().enumerate() {
            assert_eq!(variation.index as usize, i);
        }
    }

    #[test]
    fn test_each_variation_matches_a_direct_request() {
        let batcher = VariationBatcher::new();
        let batch = batcher.run(&cube(), &params(100), 3).unwrap();
        for variation in batch.variations() {
            let direct = batcher
                .pipeline()
                .fracture(&cube(), &params(variation.seed))
                .unwrap();
            assert_eq!(variation.fragments, direct);
        }
    }

    #[test]
    fn test_failed_run_does_not_abort_others() {
        let batcher = VariationBatcher::with_pipeline(FracturePipeline::with_provider(FailOnceProvider::default()));
        let batch = batcher.run(&cube(), &params(100), 5).unwrap();

        assert_eq!(batch.attempted(), 5);
        assert_eq!(batch.succeeded(), 4);
        assert_eq!(batch.failures().len(), 1);
        assert_eq!(batch.failures()[0].error.kind(), ErrorKind::BooleanProviderFailure);
        assert_eq!(batch.seeds(), variation_seeds(100, 5));
        assert_eq!(batch.into_fragment_sets().len(), 4);
    }

    #[test]
    fn test_invalid_parameters_fail_fast() {
        let bad = FractureParameters {
            fracture_randomness: 2.0,
            ..params(1)
        };
        let err = generate_variations(cube(), bad, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);
    }

    #[test]
    fn test_zero_count() {
        let sets = generate_variations(cube(), params(1), 0).unwrap();
        assert!(sets.is_empty());
    }

    #[test]
    fn test_degenerate_mesh_recorded_per_run() {
        let flat = SourceMesh::new(fracture_mesh::Mesh::new());
        let batch = VariationBatcher::new().run(&flat, &params(1), 2).unwrap();
        assert_eq!(batch.succeeded(), 0);
        assert_eq!(batch.failures().len(), 2);
        assert!(batch
            .failures()
            .iter()
            .all(|f| f.error.kind() == ErrorKind::DegenerateMesh));
    }
}
