//! # Mesh Operations
//!
//! Operations that produce new meshes from existing ones.

pub mod clip;
