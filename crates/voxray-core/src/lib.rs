//! Core types, math, and errors for the Voxray engine.
//!
//! This crate provides the foundational types shared by the world and
//! collision crates:
//! - Rays and axis-aligned bounding boxes
//! - Engine-wide error type

pub mod error;
pub mod math;

pub use error::{Error, Result};
pub use math::{Aabb, Ray};

/// Engine-wide constants
pub mod constants {
    /// Deepest octree level a collision query descends to before the tree is
    /// considered malformed. The root sits at depth 0.
    pub const MAX_OCTREE_DEPTH: u32 = 16;
    /// Number of children of every non-leaf octree node.
    pub const OCTREE_CHILDREN: usize = 8;
}
