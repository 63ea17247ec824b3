//! Error types for collision queries.
//!
//! A missed ray is not an error. These variants describe malformed trees.

use thiserror::Error;

/// Octree invariant violated during a query.
///
/// Branches always have exactly 8 live children in a [`voxray_world::Octree`],
/// so the only violation a query can run into is a tree that is too deep.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionError {
    /// The traversal went deeper than the configured maximum.
    #[error("Octree deeper than the configured maximum of {max_depth} levels")]
    DepthExceeded { max_depth: u32 },
}

/// Result type alias using [`CollisionError`].
pub type Result<T> = std::result::Result<T, CollisionError>;
