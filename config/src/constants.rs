//! # Configuration Constants
//!
//! Centralized constants for the fracture engine. All tolerances, sampling
//! parameters and default object properties are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Sampling**: Jitter fractions and shell counts for seed distributions
//! - **Relaxation**: Monte-Carlo Lloyd relaxation tunables
//! - **Cracks**: Random-walk lengths and subdivision resolution
//! - **Defaults**: Fracture parameters used when a host supplies none

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for volume and length checks where a value is treated as zero.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Tolerance for classifying a point against a clipping plane.
///
/// Points closer than this to a plane are treated as lying on it. Larger
/// than [`EPSILON`] because plane intersections accumulate rounding error.
pub const PLANE_EPSILON: f64 = 1e-7;

/// Epsilon for vertex welding.
///
/// Vertices closer than this are merged when polygons are converted back
/// into an indexed mesh.
///
/// # Example
///
/// ```rust
/// use config::constants::VERTEX_MERGE_EPSILON;
///
/// fn vertices_should_merge(v1: [f64; 3], v2: [f64; 3]) -> bool {
///     let dx = v1[0] - v2[0];
///     let dy = v1[1] - v2[1];
///     let dz = v1[2] - v2[2];
///     (dx * dx + dy * dy + dz * dz).sqrt() < VERTEX_MERGE_EPSILON
/// }
/// ```
pub const VERTEX_MERGE_EPSILON: f64 = 1e-8;

/// Quantization factor for the welding spatial hash.
///
/// Positions are multiplied by this factor and rounded to build hash keys.
pub const WELD_GRID_SCALE: f64 = 1e6;

/// Relative margin added around the source bounds when building Voronoi
/// cells, so no cell wall is coplanar with the outer surface of the mesh.
pub const CELL_BOUNDS_MARGIN: f64 = 0.05;

// =============================================================================
// SAMPLING CONSTANTS
// =============================================================================

/// Smallest number of Voronoi cells a fracture may request.
///
/// Fewer than three generators cannot describe a volumetric partition.
pub const MIN_CELL_COUNT: usize = 3;

/// Grid jitter as a fraction of the local lattice spacing at randomness 1.
///
/// Half the spacing keeps every jittered point inside its own lattice cell.
pub const GRID_JITTER_FRACTION: f64 = 0.5;

/// Minimum number of concentric shells for the radial pattern.
pub const MIN_RADIAL_SHELLS: usize = 3;

/// Radial jitter as a fraction of the shell radius at randomness 1.
pub const RADIAL_JITTER_FRACTION: f64 = 0.3;

/// Splinter radius as a fraction of the smaller perpendicular half-extent.
pub const SPLINTER_RADIUS_FRACTION: f64 = 0.8;

/// Smallest radial scale applied to a splinter point (0.2 = 20% of radius).
pub const SPLINTER_INNER_FRACTION: f64 = 0.2;

/// Splinter jitter perpendicular to the grain, as a fraction of the
/// splinter radius at randomness 1.
pub const SPLINTER_CROSS_JITTER_FRACTION: f64 = 0.2;

/// Splinter jitter along the grain, as a fraction of the per-point spacing
/// along the long axis at randomness 1.
pub const SPLINTER_GRAIN_JITTER_FRACTION: f64 = 0.5;

// =============================================================================
// RELAXATION CONSTANTS
// =============================================================================

/// Monte-Carlo samples drawn per generator in every relaxation iteration.
///
/// # Example
///
/// ```rust
/// use config::constants::RELAXATION_SAMPLES_PER_POINT;
///
/// // 25 generators draw 2500 samples per iteration
/// assert_eq!(25 * RELAXATION_SAMPLES_PER_POINT, 2500);
/// ```
pub const RELAXATION_SAMPLES_PER_POINT: usize = 100;

/// Relaxation iterations applied by the fracture pipeline.
pub const DEFAULT_RELAXATION_ITERATIONS: u32 = 2;

/// ChaCha stream used for relaxation samples.
///
/// The sampler draws from stream 0 of the same seed; a separate stream keeps
/// relaxation samples from replaying the seed point positions.
pub const RELAXATION_STREAM: u64 = 1;

// =============================================================================
// VARIATION CONSTANTS
// =============================================================================

/// Seed offset between consecutive fracture variations.
///
/// Variation `i` of a batch uses `seed + i * VARIATION_SEED_STRIDE`.
pub const VARIATION_SEED_STRIDE: u64 = 1000;

// =============================================================================
// CRACK CONSTANTS
// =============================================================================

/// Shortest crack path length in mesh units (meters).
pub const CRACK_MIN_LENGTH: f64 = 0.1;

/// Longest crack path length in mesh units (meters).
pub const CRACK_MAX_LENGTH: f64 = 0.5;

/// Edge cuts applied by the uniform subdivision before cracks are carved.
///
/// Each edge is split into `cuts + 1` segments, so every triangle becomes
/// `(cuts + 1)^2` triangles.
pub const CRACK_SUBDIVISION_CUTS: u32 = 2;

// =============================================================================
// DEFAULT FRACTURE PARAMETERS
// =============================================================================

/// Default number of Voronoi cells per fracture.
pub const DEFAULT_CELL_COUNT: usize = 25;

/// Default fracture seed.
pub const DEFAULT_FRACTURE_SEED: u64 = 12345;

/// Default pattern randomness (0 = canonical arrangement, 1 = chaotic).
pub const DEFAULT_RANDOMNESS: f64 = 0.8;

/// Default smallest retained fragment volume (cubic meters).
pub const DEFAULT_MIN_PIECE_VOLUME: f64 = 0.01;

/// Default crack propagation speed (m/s). Passed through to the host.
pub const DEFAULT_DAMAGE_PROPAGATION_SPEED: f64 = 10.0;

/// Default energy needed to start a fracture (J). Passed through to the host.
pub const DEFAULT_IMPACT_THRESHOLD_ENERGY: f64 = 100.0;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Returns the seed used by variation `index` of a batch.
///
/// Wraps on overflow so every `u64` base seed yields a valid sequence.
///
/// # Example
///
/// ```rust
/// use config::constants::variation_seed;
///
/// assert_eq!(variation_seed(100, 0), 100);
/// assert_eq!(variation_seed(100, 4), 4100);
/// ```
#[inline]
pub fn variation_seed(base: u64, index: u32) -> u64 {
    base.wrapping_add(u64::from(index).wrapping_mul(VARIATION_SEED_STRIDE))
}
