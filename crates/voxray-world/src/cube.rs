//! Octree cube nodes.

use glam::Vec3;
use slotmap::new_key_type;
use voxray_core::constants::OCTREE_CHILDREN;
use voxray_core::Aabb;

new_key_type! {
    /// Generational handle to a [`Cube`] inside an [`Octree`](crate::Octree).
    ///
    /// Holding a `CubeId` does not keep the cube alive. Resolve it through
    /// [`Octree::cube`](crate::Octree::cube) every time it is used.
    pub struct CubeId;
}

/// Content type of a cube.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CubeType {
    /// No geometry. Empty cubes never have non-empty descendants.
    #[default]
    Empty,
    /// Fully solid voxel.
    Solid,
    /// Solid voxel with deformed (indented) corners.
    Normal,
    /// Subdivided into 8 child cubes.
    Octant,
}

impl CubeType {
    /// Returns true for [`CubeType::Empty`].
    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns true for types a leaf may carry (everything but `Octant`).
    #[inline]
    pub const fn is_leaf_type(self) -> bool {
        !matches!(self, Self::Octant)
    }
}

/// Offset direction of the child at `index`, each component `-1.0` or `1.0`.
///
/// Children are ordered `x | y << 1 | z << 2`, where a set bit selects the
/// positive half of the parent along that axis.
#[inline]
pub fn octant_offset(index: usize) -> Vec3 {
    let sign = |bit: usize| if index & bit != 0 { 1.0 } else { -1.0 };
    Vec3::new(sign(0b001), sign(0b010), sign(0b100))
}

/// A node of the octree.
#[derive(Clone, Debug, PartialEq)]
pub struct Cube {
    pub(crate) ty: CubeType,
    pub(crate) center: Vec3,
    pub(crate) size: f32,
    pub(crate) children: Option<[CubeId; OCTREE_CHILDREN]>,
}

impl Cube {
    pub(crate) const fn leaf(ty: CubeType, center: Vec3, size: f32) -> Self {
        Self {
            ty,
            center,
            size,
            children: None,
        }
    }

    /// Content type of this cube.
    #[inline]
    pub const fn cube_type(&self) -> CubeType {
        self.ty
    }

    /// Center point in world space.
    #[inline]
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Edge length.
    #[inline]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Bounding box as `[min, max]`.
    #[inline]
    pub fn bounding_box(&self) -> [Vec3; 2] {
        self.aabb().bounds()
    }

    /// Bounding box as an [`Aabb`].
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.center, self.size)
    }

    #[inline]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.ty.is_empty()
    }

    /// The 8 children in octant order, or `None` for a leaf.
    #[inline]
    pub const fn children(&self) -> Option<&[CubeId; OCTREE_CHILDREN]> {
        self.children.as_ref()
    }
}
