//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_epsilon_is_small() {
    assert!(EPSILON < 1e-6, "EPSILON should be small for precision");
}

#[test]
fn test_plane_epsilon_larger_than_epsilon() {
    assert!(
        PLANE_EPSILON >= EPSILON,
        "PLANE_EPSILON should be >= EPSILON"
    );
}

#[test]
fn test_weld_grid_resolves_merge_epsilon() {
    // One grid step must be coarser than the merge distance, or welded
    // neighbours would hash into different buckets too often.
    assert!(1.0 / WELD_GRID_SCALE >= VERTEX_MERGE_EPSILON);
}

// =============================================================================
// SAMPLING TESTS
// =============================================================================

#[test]
fn test_min_cell_count_is_three() {
    assert_eq!(MIN_CELL_COUNT, 3);
}

#[test]
fn test_grid_jitter_stays_inside_cell() {
    assert!(GRID_JITTER_FRACTION <= 0.5);
}

#[test]
fn test_splinter_fractions_ordered() {
    assert!(SPLINTER_INNER_FRACTION < 1.0);
    assert!(SPLINTER_RADIUS_FRACTION <= 1.0);
}

// =============================================================================
// CRACK TESTS
// =============================================================================

#[test]
fn test_crack_length_range_ordered() {
    assert!(CRACK_MIN_LENGTH > 0.0);
    assert!(CRACK_MIN_LENGTH < CRACK_MAX_LENGTH);
}

// =============================================================================
// DEFAULT PARAMETER TESTS
// =============================================================================

#[test]
fn test_default_cell_count_is_valid() {
    assert!(DEFAULT_CELL_COUNT >= MIN_CELL_COUNT);
}

#[test]
fn test_default_randomness_in_unit_range() {
    assert!((0.0..=1.0).contains(&DEFAULT_RANDOMNESS));
}

#[test]
fn test_default_min_piece_volume_positive() {
    assert!(DEFAULT_MIN_PIECE_VOLUME > 0.0);
}

// =============================================================================
// HELPER TESTS
// =============================================================================

#[test]
fn test_approx_zero() {
    assert!(approx_zero(0.0));
    assert!(approx_zero(-EPSILON / 2.0));
    assert!(!approx_zero(0.1));
}

#[test]
fn test_variation_seed_stride() {
    let seeds: Vec<u64> = (0..5).map(|i| variation_seed(100, i)).collect();
    assert_eq!(seeds, vec![100, 1100, 2100, 3100, 4100]);
}

#[test]
fn test_variation_seed_wraps() {
    assert_eq!(variation_seed(u64::MAX, 1), VARIATION_SEED_STRIDE - 1);
}
