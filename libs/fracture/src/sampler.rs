//! # Point Sampler
//!
//! Generates Voronoi seed points inside a bounding volume.
//!
//! ## Patterns
//!
//! | Pattern | Canonical arrangement | Jitter scale |
//! |---------|-----------------------|--------------|
//! | Random | uniform draws | none |
//! | Grid | lattice cell centers | half the lattice spacing |
//! | Radial | points on concentric shells | 30% of the shell radius |
//! | Splinter | evenly spaced along the longest axis | along: half the spacing, across: 20% of the radius |
//!
//! Jitter is multiplied by `randomness`, so `randomness == 0` yields the
//! canonical arrangement exactly. Output is a pure function of the inputs.

use crate::params::DistributionPattern;
use config::constants::{
    GRID_JITTER_FRACTION, MIN_RADIAL_SHELLS, RADIAL_JITTER_FRACTION, SPLINTER_CROSS_JITTER_FRACTION,
    SPLINTER_GRAIN_JITTER_FRACTION, SPLINTER_INNER_FRACTION, SPLINTER_RADIUS_FRACTION,
};
use fracture_mesh::BoundingBox;
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;
use tracing::debug;

/// A Voronoi generator position tagged with the index it was created at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedPoint {
    pub position: DVec3,
    pub generator: usize,
}

impl SeedPoint {
    pub fn new(position: DVec3, generator: usize) -> Self {
        Self {
            position,
            generator,
        }
    }
}

/// Generates exactly `count` seed points inside (or near) `bounds`.
///
/// `randomness` is clamped to `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use fracture::{sample, DistributionPattern};
/// use fracture_mesh::BoundingBox;
/// use glam::DVec3;
///
/// let bounds = BoundingBox::new(DVec3::ZERO, DVec3::splat(2.0)).unwrap();
/// let points = sample(8, bounds, DistributionPattern::Grid, 1, 0.0);
/// assert_eq!(points.len(), 8);
/// assert_eq!(points[0].position, DVec3::splat(0.5));
/// ```
pub fn sample(
    count: usize,
    bounds: BoundingBox,
    pattern: DistributionPattern,
    seed: u64,
    randomness: f64,
) -> Vec<SeedPoint> {
    let randomness = if randomness.is_nan() {
        0.0
    } else {
        randomness.clamp(0.0, 1.0)
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let positions = match pattern {
        DistributionPattern::Random => random_points(count, &bounds, &mut rng),
        DistributionPattern::Grid => grid_points(count, &bounds, randomness, &mut rng),
        DistributionPattern::Radial => radial_points(count, &bounds, randomness, &mut rng),
        DistributionPattern::Splinter => splinter_points(count, &bounds, randomness, &mut rng),
    };

    debug!(
        count,
        ?pattern,
        seed,
        randomness,
        "sampled seed points"
    );

    positions
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(generator, position)| SeedPoint::new(position, generator))
        .collect()
}

/// Uniform draw in `[-1, 1]`.
#[inline]
fn unit_jitter(rng: &mut ChaCha8Rng) -> f64 {
    rng.gen_range(-1.0..=1.0)
}

#[inline]
fn uniform_in(rng: &mut ChaCha8Rng, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

fn random_points(count: usize, bounds: &BoundingBox, rng: &mut ChaCha8Rng) -> Vec<DVec3> {
    let (min, max) = (bounds.min(), bounds.max());
    (0..count)
        .map(|_| {
            DVec3::new(
                uniform_in(rng, min.x, max.x),
                uniform_in(rng, min.y, max.y),
                uniform_in(rng, min.z, max.z),
            )
        })
        .collect()
}

/// Smallest `k` with `k^3 >= n`.
fn ceil_cbrt(n: usize) -> usize {
    let mut k = (n as f64).cbrt().round() as usize;
    while k.pow(3) < n {
        k += 1;
    }
    while k > 0 && (k - 1).pow(3) >= n {
        k -= 1;
    }
    k
}

/// Largest `k` with `k^3 <= n`.
fn floor_cbrt(n: usize) -> usize {
    let mut k = (n as f64).cbrt().round() as usize;
    while k.pow(3) > n {
        k -= 1;
    }
    while (k + 1).pow(3) <= n {
        k += 1;
    }
    k
}

fn grid_points(
    count: usize,
    bounds: &BoundingBox,
    randomness: f64,
    rng: &mut ChaCha8Rng,
) -> Vec<DVec3> {
    let cells_per_axis = ceil_cbrt(count).max(1);
    let spacing = bounds.size() / cells_per_axis as f64;
    let jitter = spacing * GRID_JITTER_FRACTION * randomness;
    let mut points = Vec::with_capacity(count);

    'lattice: for x in 0..cells_per_axis {
        for y in 0..cells_per_axis {
            for z in 0..cells_per_axis {
                if points.len() >= count {
                    break 'lattice;
                }
                let cell = DVec3::new(x as f64, y as f64, z as f64) + 0.5;
                let center = bounds.min() + cell * spacing;
                let offset = DVec3::new(unit_jitter(rng), unit_jitter(rng), unit_jitter(rng));
                points.push(center + offset * jitter);
            }
        }
    }

    points
}

fn radial_points(
    count: usize,
    bounds: &BoundingBox,
    randomness: f64,
    rng: &mut ChaCha8Rng,
) -> Vec<DVec3> {
    let center = bounds.center();
    let max_extent = bounds.half_diagonal();
    let shells = floor_cbrt(count).max(MIN_RADIAL_SHELLS);
    let per_shell = count / shells;
    let remainder = count % shells;
    let mut points = Vec::with_capacity(count);

    for shell in 0..shells {
        let radius = (shell + 1) as f64 * max_extent / shells as f64;
        let jitter = radius * RADIAL_JITTER_FRACTION * randomness;
        // Innermost shells take the remainder
        let shell_count = per_shell + usize::from(shell < remainder);

        for _ in 0..shell_count {
            let theta = rng.gen_range(0.0..2.0 * PI);
            let phi = rng.gen_range(0.0..=PI);
            let direction = DVec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
            let offset = DVec3::new(unit_jitter(rng), unit_jitter(rng), unit_jitter(rng));
            points.push(center + direction * radius + offset * jitter);
        }
    }

    points
}

fn splinter_points(
    count: usize,
    bounds: &BoundingBox,
    randomness: f64,
    rng: &mut ChaCha8Rng,
) -> Vec<DVec3> {
    let axis = bounds.longest_axis();
    let (across_a, across_b) = ((axis + 1) % 3, (axis + 2) % 3);
    let center = bounds.center();
    let half = bounds.size() * 0.5;
    let length = bounds.size()[axis];
    let spacing = if count > 0 { length / count as f64 } else { 0.0 };

    let radius = half[across_a].min(half[across_b]) * SPLINTER_RADIUS_FRACTION;
    let grain_jitter = spacing * SPLINTER_GRAIN_JITTER_FRACTION * randomness;
    let cross_jitter = radius * SPLINTER_CROSS_JITTER_FRACTION * randomness;
    let mut points = Vec::with_capacity(count);

    for i in 0..count {
        let along = bounds.min()[axis] + (i as f64 + 0.5) * spacing;
        let angle = rng.gen_range(0.0..2.0 * PI);
        let reach = radius * rng.gen_range(SPLINTER_INNER_FRACTION..=1.0);

        let mut point = center;
        point[axis] = along + unit_jitter(rng) * grain_jitter;
        point[across_a] += reach * angle.cos() + unit_jitter(rng) * cross_jitter;
        point[across_b] += reach * angle.sin() + unit_jitter(rng) * cross_jitter;
        points.push(point);
    }

    points
}
