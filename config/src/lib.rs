//! # Config Crate
//!
//! Centralized configuration constants for the fracture engine.
//! Tolerances, sampling tunables, seed strides and the default
//! fracture parameters are defined here so the geometry kernel and the
//! engine agree on every magic number.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{EPSILON, VARIATION_SEED_STRIDE};
//!
//! let value: f64 = 1e-13;
//! assert!(value.abs() < EPSILON);
//!
//! // Seed for the third variation of a batch started at seed 100
//! let seed = 100 + 2 * VARIATION_SEED_STRIDE;
//! assert_eq!(seed, 2100);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Deterministic**: Nothing here depends on the platform or the clock
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
