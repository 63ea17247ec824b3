//! Arena-backed octree.

use glam::Vec3;
use slotmap::SlotMap;
use voxray_core::constants::OCTREE_CHILDREN;
use voxray_core::{Error, Result};

use crate::cube::{octant_offset, Cube, CubeId, CubeType};
use crate::node::CubeNode;

/// Octree of [`Cube`]s stored in a generational arena.
///
/// Every cube is either a leaf or has exactly 8 children. Removing a subtree
/// invalidates the ids of all removed cubes.
#[derive(Clone, Debug)]
pub struct Octree {
    cubes: SlotMap<CubeId, Cube>,
    root: CubeId,
}

impl Octree {
    /// Create an octree consisting of a single empty root cube.
    pub fn new(center: Vec3, size: f32) -> Result<Self> {
        Self::with_root_type(center, size, CubeType::Empty)
    }

    /// Create an octree whose root is a leaf of the given type.
    pub fn with_root_type(center: Vec3, size: f32, ty: CubeType) -> Result<Self> {
        validate_size(size)?;
        validate_leaf_type(ty)?;

        let mut cubes = SlotMap::with_key();
        let root = cubes.insert(Cube::leaf(ty, center, size));
        Ok(Self { cubes, root })
    }

    /// Flatten a nested [`CubeNode`] description into an arena.
    pub fn build(center: Vec3, size: f32, node: &CubeNode) -> Result<Self> {
        validate_size(size)?;

        let mut cubes = SlotMap::with_capacity_and_key(node.count_nodes());
        let root = Self::build_recursive(&mut cubes, node, center, size)?;
        Ok(Self { cubes, root })
    }

    fn build_recursive(
        cubes: &mut SlotMap<CubeId, Cube>,
        node: &CubeNode,
        center: Vec3,
        size: f32,
    ) -> Result<CubeId> {
        match node {
            CubeNode::Empty => Ok(cubes.insert(Cube::leaf(CubeType::Empty, center, size))),
            CubeNode::Leaf(ty) => {
                validate_leaf_type(*ty)?;
                Ok(cubes.insert(Cube::leaf(*ty, center, size)))
            }
            CubeNode::Octant(children) => {
                let half = size * 0.5;
                let mut ids = [CubeId::default(); OCTREE_CHILDREN];
                for (index, (child, id)) in children.iter().zip(ids.iter_mut()).enumerate() {
                    let child_center = center + octant_offset(index) * (size * 0.25);
                    *id = Self::build_recursive(cubes, child, child_center, half)?;
                }
                Ok(cubes.insert(Cube {
                    ty: CubeType::Octant,
                    center,
                    size,
                    children: Some(ids),
                }))
            }
        }
    }

    /// Id of the root cube.
    #[inline]
    pub const fn root(&self) -> CubeId {
        self.root
    }

    /// Resolve a cube id. Returns `None` if the cube has been removed.
    #[inline]
    pub fn cube(&self, id: CubeId) -> Option<&Cube> {
        self.cubes.get(id)
    }

    /// Root cube.
    #[inline]
    pub fn root_cube(&self) -> Option<&Cube> {
        self.cube(self.root)
    }

    /// Returns true if the id still resolves.
    #[inline]
    pub fn contains(&self, id: CubeId) -> bool {
        self.cubes.contains_key(id)
    }

    /// Number of live cubes, branches included. Never zero.
    #[inline]
    pub fn cube_count(&self) -> usize {
        self.cubes.len()
    }

    /// Returns true if the root is an empty leaf, so nothing can be hit.
    #[inline]
    pub fn root_is_empty(&self) -> bool {
        self.root_cube().map_or(true, Cube::is_empty)
    }

    /// Children of cube `id` with their cubes, in octant order.
    ///
    /// Yields nothing for leaves and stale ids. Children are only ever
    /// inserted and removed together with their parent's child list, so every
    /// child of a live cube is live.
    pub fn children(&self, id: CubeId) -> impl Iterator<Item = (CubeId, &Cube)> + '_ {
        self.cube(id)
            .and_then(Cube::children)
            .into_iter()
            .flatten()
            .map(|&child| (child, &self.cubes[child]))
    }

    /// Child `index` (octant order) of cube `id`.
    pub fn child(&self, id: CubeId, index: usize) -> Result<CubeId> {
        let cube = self.resolve(id)?;
        let children = cube
            .children()
            .ok_or_else(|| Error::InvalidData(format!("cube {id:?} is a leaf")))?;
        children.get(index).copied().ok_or_else(|| {
            Error::OutOfBounds(format!("child index {index} (octree nodes have 8 children)"))
        })
    }

    /// Make `id` a leaf of type `ty`, removing its subtree if it has one.
    pub fn set_type(&mut self, id: CubeId, ty: CubeType) -> Result<()> {
        validate_leaf_type(ty)?;

        let children = self.resolve_mut(id)?.children.take();
        if let Some(children) = children {
            for child in children {
                self.remove_subtree(child);
            }
        }
        self.resolve_mut(id)?.ty = ty;
        Ok(())
    }

    /// Split leaf `id` into 8 children that inherit its type.
    pub fn subdivide(&mut self, id: CubeId) -> Result<[CubeId; OCTREE_CHILDREN]> {
        let cube = self.resolve(id)?;
        if !cube.is_leaf() {
            return Err(Error::InvalidData(format!(
                "cube {id:?} is already subdivided"
            )));
        }
        let (ty, center, size) = (cube.ty, cube.center, cube.size);

        let mut ids = [CubeId::default(); OCTREE_CHILDREN];
        for (index, slot) in ids.iter_mut().enumerate() {
            let child_center = center + octant_offset(index) * (size * 0.25);
            *slot = self.cubes.insert(Cube::leaf(ty, child_center, size * 0.5));
        }

        let cube = self.resolve_mut(id)?;
        cube.ty = CubeType::Octant;
        cube.children = Some(ids);
        Ok(ids)
    }

    /// Depth of the deepest cube; a lone root has depth 0.
    pub fn depth(&self) -> u32 {
        self.depth_of(self.root)
    }

    fn depth_of(&self, id: CubeId) -> u32 {
        self.cube(id)
            .and_then(Cube::children)
            .map_or(0, |children| {
                1 + children
                    .iter()
                    .map(|&child| self.depth_of(child))
                    .max()
                    .unwrap_or(0)
            })
    }

    fn remove_subtree(&mut self, id: CubeId) {
        if let Some(cube) = self.cubes.remove(id) {
            for child in cube.children.into_iter().flatten() {
                self.remove_subtree(child);
            }
        }
    }

    fn resolve(&self, id: CubeId) -> Result<&Cube> {
        self.cubes
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("cube {id:?}")))
    }

    fn resolve_mut(&mut self, id: CubeId) -> Result<&mut Cube> {
        self.cubes
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("cube {id:?}")))
    }
}

fn validate_size(size: f32) -> Result<()> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidData(format!(
            "cube size must be positive and finite, got {size}"
        )))
    }
}

fn validate_leaf_type(ty: CubeType) -> Result<()> {
    if ty.is_leaf_type() {
        Ok(())
    } else {
        Err(Error::InvalidData(
            "octant cubes must be created by subdivision".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_octree_is_single_empty_leaf() {
        let tree = Octree::new(Vec3::ZERO, 2.0).unwrap();
        let root = tree.root_cube().unwrap();
        assert!(root.is_leaf());
        assert!(root.is_empty());
        assert!(tree.root_is_empty());
        assert_eq!(tree.cube_count(), 1);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn rejects_invalid_arguments() {
        assert!(matches!(
            Octree::new(Vec3::ZERO, 0.0),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            Octree::new(Vec3::ZERO, f32::NAN),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            Octree::with_root_type(Vec3::ZERO, 1.0, CubeType::Octant),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn subdivide_places_children_in_octants() {
        let mut tree = Octree::with_root_type(Vec3::ZERO, 2.0, CubeType::Solid).unwrap();
        let children = tree.subdivide(tree.root()).unwrap();

        let root = tree.root_cube().unwrap();
        assert_eq!(root.cube_type(), CubeType::Octant);
        assert_eq!(root.children(), Some(&children));
        assert_eq!(tree.cube_count(), 9);
        assert_eq!(tree.depth(), 1);

        for (index, &id) in children.iter().enumerate() {
            let child = tree.cube(id).unwrap();
            assert_eq!(child.cube_type(), CubeType::Solid);
            assert_relative_eq!(child.size(), 1.0);
            assert_eq!(child.center(), octant_offset(index) * 0.5);
        }

        let last = tree.cube(children[7]).unwrap();
        assert_eq!(last.bounding_box(), [Vec3::ZERO, Vec3::ONE]);
    }

    #[test]
    fn subdivide_twice_fails() {
        let mut tree = Octree::new(Vec3::ZERO, 2.0).unwrap();
        tree.subdivide(tree.root()).unwrap();
        assert!(matches!(
            tree.subdivide(tree.root()),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn set_type_collapses_subtree_and_invalidates_ids() {
        let mut tree = Octree::new(Vec3::ZERO, 4.0).unwrap();
        let children = tree.subdivide(tree.root()).unwrap();
        let grandchildren = tree.subdivide(children[3]).unwrap();
        assert_eq!(tree.cube_count(), 17);
        assert_eq!(tree.depth(), 2);

        tree.set_type(tree.root(), CubeType::Solid).unwrap();

        assert_eq!(tree.cube_count(), 1);
        assert!(tree.root_cube().unwrap().is_leaf());
        assert!(children.iter().all(|&id| !tree.contains(id)));
        assert!(grandchildren.iter().all(|&id| tree.cube(id).is_none()));
        assert!(matches!(
            tree.set_type(children[0], CubeType::Solid),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn children_pair_ids_with_cubes() {
        let mut tree = Octree::new(Vec3::ZERO, 2.0).unwrap();
        assert_eq!(tree.children(tree.root()).count(), 0);

        let ids = tree.subdivide(tree.root()).unwrap();
        let grandchildren = tree.subdivide(ids[2]).unwrap();
        let listed: Vec<_> = tree.children(tree.root()).collect();
        assert_eq!(listed.len(), 8);
        for (index, (id, cube)) in listed.into_iter().enumerate() {
            assert_eq!(id, ids[index]);
            assert_eq!(cube.center(), octant_offset(index) * 0.5);
        }

        // Collapsing a branch takes its children out of the listing too.
        tree.set_type(ids[2], CubeType::Solid).unwrap();
        assert_eq!(tree.children(ids[2]).count(), 0);
        assert!(grandchildren.iter().all(|&id| !tree.contains(id)));
        assert_eq!(tree.children(grandchildren[0]).count(), 0);
    }

    #[test]
    fn child_lookup() {
        let mut tree = Octree::new(Vec3::ZERO, 2.0).unwrap();
        assert!(matches!(
            tree.child(tree.root(), 0),
            Err(Error::InvalidData(_))
        ));

        let children = tree.subdivide(tree.root()).unwrap();
        assert_eq!(tree.child(tree.root(), 5).unwrap(), children[5]);
        assert!(matches!(
            tree.child(tree.root(), 8),
            Err(Error::OutOfBounds(_))
        ));
    }

    #[test]
    fn build_from_nodes() {
        let node = CubeNode::new_octant()
            .with_child(1, CubeNode::solid())
            .with_child(6, CubeNode::new_octant().with_child(0, CubeNode::solid()));
        let tree = Octree::build(Vec3::splat(4.0), 8.0, &node).unwrap();

        assert_eq!(tree.cube_count(), node.count_nodes());
        assert_eq!(tree.depth(), node.depth());

        let child = tree.cube(tree.child(tree.root(), 1).unwrap()).unwrap();
        assert_eq!(child.cube_type(), CubeType::Solid);
        assert_eq!(child.center(), Vec3::new(6.0, 2.0, 2.0));

        let branch = tree.child(tree.root(), 6).unwrap();
        let grandchild = tree.cube(tree.child(branch, 0).unwrap()).unwrap();
        assert_relative_eq!(grandchild.size(), 2.0);
        assert_eq!(grandchild.center(), Vec3::new(1.0, 5.0, 5.0));
    }

    #[test]
    fn build_rejects_octant_leaf() {
        let node = CubeNode::new_octant().with_child(0, CubeNode::Leaf(CubeType::Octant));
        assert!(Octree::build(Vec3::ZERO, 1.0, &node).is_err());
    }
}
