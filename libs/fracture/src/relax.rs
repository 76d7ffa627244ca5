//! # Relaxer
//!
//! Lloyd relaxation with Monte-Carlo centroids.
//!
//! Each iteration scatters `samples_per_point * points` random positions in
//! the bounds, assigns every sample to its nearest point and moves each point
//! to the mean of its samples. A point that receives no samples stays put.
//!
//! Nearest-point assignment runs on rayon; samples are drawn and reduced in
//! index order, so the result only depends on the inputs and the seed.
//! Samples come from their own ChaCha stream, so relaxing with the seed that
//! placed the points does not replay the point positions.

use crate::sampler::SeedPoint;
use config::constants::{RELAXATION_SAMPLES_PER_POINT, RELAXATION_STREAM};
use fracture_mesh::BoundingBox;
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

/// Tunables of the Monte-Carlo relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaxConfig {
    /// Random samples drawn per point and iteration.
    pub samples_per_point: usize,
    /// Seed for the sample stream.
    pub seed: u64,
}

impl Default for RelaxConfig {
    fn default() -> Self {
        Self {
            samples_per_point: RELAXATION_SAMPLES_PER_POINT,
            seed: 0,
        }
    }
}

/// Lloyd relaxation driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relaxer {
    config: RelaxConfig,
}

impl Relaxer {
    pub fn new(config: RelaxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RelaxConfig {
        &self.config
    }

    /// Moves every point toward the centroid of its Voronoi region.
    ///
    /// Zero iterations, an empty point set or zero samples return the input
    /// unchanged. Generator indices are preserved.
    pub fn relax(&self, points: Vec<SeedPoint>, bounds: BoundingBox, iterations: u32) -> Vec<SeedPoint> {
        if iterations == 0 || points.is_empty() || self.config.samples_per_point == 0 {
            return points;
        }

        let mut rng = sample_rng(self.config.seed);
        let sample_count = self.config.samples_per_point.saturating_mul(points.len());
        let mut positions: Vec<DVec3> = points.iter().map(|p| p.position).collect();
        for _ in 0..iterations {
            let samples = draw_samples(&mut rng, sample_count, &bounds);

            let owners: Vec<usize> = samples
                .par_iter()
                .map(|sample| nearest(&positions, *sample))
                .collect();

            let mut sums = vec![DVec3::ZERO; positions.len()];
            let mut counts = vec![0usize; positions.len()];
            for (sample, owner) in samples.iter().zip(&owners) {
                sums[*owner] += *sample;
                counts[*owner] += 1;
            }

            for ((position, sum), count) in positions.iter_mut().zip(&sums).zip(&counts) {
                if *count > 0 {
                    *position = *sum / *count as f64;
                }
            }
        }

        debug!(
            points = positions.len(),
            iterations,
            samples = sample_count,
            "relaxed seed points"
        );

        points
            .into_iter()
            .zip(positions)
            .map(|(point, position)| SeedPoint::new(position, point.generator))
            .collect()
    }
}

/// Relaxes `points` with the default configuration.
pub fn relax(points: Vec<SeedPoint>, bounds: BoundingBox, iterations: u32) -> Vec<SeedPoint> {
    Relaxer::default().relax(points, bounds, iterations)
}

fn sample_rng(seed: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(RELAXATION_STREAM);
    rng
}

fn draw_samples(rng: &mut ChaCha8Rng, count: usize, bounds: &BoundingBox) -> Vec<DVec3> {
    let (min, max) = (bounds.min(), bounds.max());
    (0..count)
        .map(|_| {
            DVec3::new(
                draw(rng, min.x, max.x),
                draw(rng, min.y, max.y),
                draw(rng, min.z, max.z),
            )
        })
        .collect()
}

#[inline]
fn draw(rng: &mut ChaCha8Rng, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

/// Index of the closest position; ties go to the lowest index.
fn nearest(positions: &[DVec3], sample: DVec3) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, position) in positions.iter().enumerate() {
        let distance = position.distance_squared(sample);
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}
