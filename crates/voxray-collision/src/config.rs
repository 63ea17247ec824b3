//! Collision query configuration.

use serde::{Deserialize, Serialize};
use voxray_core::constants::MAX_OCTREE_DEPTH;

/// Collision query configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Deepest level a query may descend to (root = 0). Deeper trees are
    /// reported as malformed.
    pub max_depth: u32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_OCTREE_DEPTH,
        }
    }
}

impl CollisionConfig {
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}
