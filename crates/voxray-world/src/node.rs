//! Nested octree description.
//!
//! [`CubeNode`] is the owned, recursive form of an octree. It is convenient
//! for describing a world by hand or from a generator; [`Octree::build`]
//! flattens it into the arena that collision queries run against.
//!
//! [`Octree::build`]: crate::Octree::build

use crate::cube::CubeType;

/// A node in a nested octree description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CubeNode {
    /// Empty node (no geometry).
    #[default]
    Empty,
    /// Leaf node with a single cube type.
    Leaf(CubeType),
    /// Subdivided node with 8 children in octant order.
    Octant(Box<[CubeNode; 8]>),
}

impl CubeNode {
    /// Create a solid leaf.
    pub const fn solid() -> Self {
        Self::Leaf(CubeType::Solid)
    }

    /// Create an octant node with all empty children.
    pub fn new_octant() -> Self {
        Self::Octant(Box::new(Default::default()))
    }

    /// Create an octant node from its children.
    pub fn octant(children: [Self; 8]) -> Self {
        Self::Octant(Box::new(children))
    }

    /// Replace the child at `index`, turning this node into an octant first
    /// if needed. Indices outside `0..8` are ignored.
    #[must_use]
    pub fn with_child(mut self, index: usize, child: Self) -> Self {
        if !self.is_octant() {
            self = Self::new_octant();
        }
        if let Some(slot) = self
            .as_octant_mut()
            .and_then(|children| children.get_mut(index))
        {
            *slot = child;
        }
        self
    }

    /// Check if the node carries no geometry.
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty | Self::Leaf(CubeType::Empty))
    }

    /// Check if the node is a leaf (including empty nodes).
    pub const fn is_leaf(&self) -> bool {
        !self.is_octant()
    }

    /// Check if the node is subdivided.
    pub const fn is_octant(&self) -> bool {
        matches!(self, Self::Octant(_))
    }

    /// Cube type this node becomes in the arena.
    pub const fn cube_type(&self) -> CubeType {
        match self {
            Self::Empty => CubeType::Empty,
            Self::Leaf(ty) => *ty,
            Self::Octant(_) => CubeType::Octant,
        }
    }

    /// Get children if this is an octant node.
    pub fn as_octant(&self) -> Option<&[Self; 8]> {
        match self {
            Self::Octant(children) => Some(children),
            _ => None,
        }
    }

    /// Get mutable children if this is an octant node.
    pub fn as_octant_mut(&mut self) -> Option<&mut [Self; 8]> {
        match self {
            Self::Octant(children) => Some(children),
            _ => None,
        }
    }

    /// Count total nodes in this subtree.
    pub fn count_nodes(&self) -> usize {
        match self {
            Self::Empty | Self::Leaf(_) => 1,
            Self::Octant(children) => 1 + children.iter().map(Self::count_nodes).sum::<usize>(),
        }
    }

    /// Depth of the deepest node below this one (a leaf has depth 0).
    pub fn depth(&self) -> u32 {
        match self {
            Self::Empty | Self::Leaf(_) => 0,
            Self::Octant(children) => 1 + children.iter().map(Self::depth).max().unwrap_or(0),
        }
    }
}
