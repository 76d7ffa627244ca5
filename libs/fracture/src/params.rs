//! # Fracture Parameters
//!
//! Per-object fracture configuration, distribution patterns and the
//! material presets hosts offer as starting points.

use crate::error::{FractureError, FractureResult};
use config::constants::{
    DEFAULT_CELL_COUNT, DEFAULT_DAMAGE_PROPAGATION_SPEED, DEFAULT_FRACTURE_SEED,
    DEFAULT_IMPACT_THRESHOLD_ENERGY, DEFAULT_MIN_PIECE_VOLUME, DEFAULT_RANDOMNESS,
    MIN_CELL_COUNT,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// DISTRIBUTION PATTERN
// =============================================================================

/// Seed point distribution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionPattern {
    /// Independent uniform draws; irregular chunks (rock, ceramics).
    #[default]
    Random,
    /// Jittered lattice; rectangular chunks (concrete, masonry).
    Grid,
    /// Concentric shells; shards radiating from the center (glass, ice).
    Radial,
    /// Elongated along the longest axis; long shards (wood, bone).
    Splinter,
}

// =============================================================================
// FRACTURE PARAMETERS
// =============================================================================

/// Fracture settings owned by a destructible object.
///
/// Missing fields deserialize to their defaults, so hosts can store only
/// what differs.
///
/// # Example
///
/// ```rust
/// use fracture::{DistributionPattern, FractureParameters};
///
/// let params = FractureParameters {
///     voronoi_cell_count: 8,
///     fracture_pattern: DistributionPattern::Grid,
///     ..FractureParameters::default()
/// };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractureParameters {
    /// Number of Voronoi cells (at least 3).
    pub voronoi_cell_count: usize,
    /// Seed for reproducible patterns.
    pub fracture_seed: u64,
    /// Pattern noise in `[0, 1]`; 0 is the canonical arrangement.
    pub fracture_randomness: f64,
    pub fracture_pattern: DistributionPattern,
    /// Smallest retained fragment volume in cubic meters.
    pub minimum_piece_volume: f64,
    /// Crack spread speed in m/s. Passed through to the host.
    pub damage_propagation_speed: f64,
    /// Energy needed to start a fracture in joules. Passed through to the host.
    pub impact_threshold_energy: f64,
    /// Break into all pieces at once. Passed through to the host.
    pub shatter_completely: bool,
}

impl Default for FractureParameters {
    fn default() -> Self {
        Self {
            voronoi_cell_count: DEFAULT_CELL_COUNT,
            fracture_seed: DEFAULT_FRACTURE_SEED,
            fracture_randomness: DEFAULT_RANDOMNESS,
            fracture_pattern: DistributionPattern::Random,
            minimum_piece_volume: DEFAULT_MIN_PIECE_VOLUME,
            damage_propagation_speed: DEFAULT_DAMAGE_PROPAGATION_SPEED,
            impact_threshold_energy: DEFAULT_IMPACT_THRESHOLD_ENERGY,
            shatter_completely: false,
        }
    }
}

impl FractureParameters {
    /// Parameters of a material preset.
    pub fn from_preset(preset: MaterialPreset) -> Self {
        preset.parameters()
    }

    /// Same parameters with another seed.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            fracture_seed: seed,
            ..self.clone()
        }
    }

    /// Checks the geometric fields.
    ///
    /// # Errors
    ///
    /// Returns [`FractureError::InvalidParameters`] when the cell count is
    /// below 3, randomness is outside `[0, 1]`, or the minimum piece volume
    /// is not a positive finite number.
    pub fn validate(&self) -> FractureResult<()> {
        if self.voronoi_cell_count < MIN_CELL_COUNT {
            return Err(FractureError::invalid(format!(
                "voronoi_cell_count {} is below {MIN_CELL_COUNT}",
                self.voronoi_cell_count
            )));
        }
        if !(0.0..=1.0).contains(&self.fracture_randomness) {
            return Err(FractureError::invalid(format!(
                "fracture_randomness {} is outside [0, 1]",
                self.fracture_randomness
            )));
        }
        validate_min_volume(self.minimum_piece_volume)
    }
}

/// Minimum fragment volume must be a positive finite number.
pub(crate) fn validate_min_volume(min_volume: f64) -> FractureResult<()> {
    if min_volume.is_finite() && min_volume > 0.0 {
        Ok(())
    } else {
        Err(FractureError::invalid(format!(
            "minimum_piece_volume {min_volume} must be positive"
        )))
    }
}

// =============================================================================
// MATERIAL PRESETS
// =============================================================================

/// Starting points for common materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialPreset {
    Steel,
    Wood,
    Concrete,
    Glass,
    Aluminum,
    Plastic,
}

impl MaterialPreset {
    pub const ALL: [MaterialPreset; 6] = [
        MaterialPreset::Steel,
        MaterialPreset::Wood,
        MaterialPreset::Concrete,
        MaterialPreset::Glass,
        MaterialPreset::Aluminum,
        MaterialPreset::Plastic,
    ];

    /// Fracture parameters for this material; unlisted fields keep defaults.
    pub fn parameters(self) -> FractureParameters {
        let (cells, pattern, energy, shatter) = match self {
            Self::Steel => (20, DistributionPattern::Random, 500.0, false),
            Self::Wood => (15, DistributionPattern::Splinter, 50.0, false),
            Self::Concrete => (30, DistributionPattern::Grid, 200.0, false),
            Self::Glass => (50, DistributionPattern::Radial, 20.0, true),
            Self::Aluminum => (15, DistributionPattern::Random, 300.0, false),
            Self::Plastic => (10, DistributionPattern::Random, 30.0, false),
        };
        FractureParameters {
            voronoi_cell_count: cells,
            fracture_pattern: pattern,
            impact_threshold_energy: energy,
            shatter_completely: shatter,
            ..FractureParameters::default()
        }
    }
}
