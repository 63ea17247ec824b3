//! Collision results and per-frame hit aggregation.

use glam::Vec3;
use smallvec::SmallVec;
use voxray_core::constants::OCTREE_CHILDREN;
use voxray_world::{Cube, CubeId, Octree};

/// A cube hit by a ray.
///
/// Holds a weak [`CubeId`] handle; the cube may be removed after the query.
/// Use [`resolve`](Self::resolve) to re-check it against the current tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionData {
    cube: CubeId,
    center: Vec3,
    size: f32,
}

impl CollisionData {
    /// Record a hit on `cube`, captured at the time of the query.
    pub const fn new(id: CubeId, cube: &Cube) -> Self {
        Self {
            cube: id,
            center: cube.center(),
            size: cube.size(),
        }
    }

    /// Handle of the hit cube.
    #[inline]
    pub const fn cube(&self) -> CubeId {
        self.cube
    }

    /// Center of the hit cube when it was hit.
    #[inline]
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Edge length of the hit cube when it was hit.
    #[inline]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Squared distance from `position` to the hit cube's center.
    #[inline]
    pub fn squared_distance(&self, position: Vec3) -> f32 {
        self.center.distance_squared(position)
    }

    /// Look the hit cube up in `tree`. `None` if it no longer exists.
    #[inline]
    pub fn resolve<'a>(&self, tree: &'a Octree) -> Option<&'a Cube> {
        tree.cube(self.cube)
    }
}

/// Hits collected from the children of one cube, at most one per child.
#[derive(Clone, Debug, Default)]
pub struct HitSet {
    hits: SmallVec<[CollisionData; OCTREE_CHILDREN]>,
}

impl HitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hit. Returns false and drops the hit once 8 hits are stored.
    pub fn push(&mut self, hit: CollisionData) -> bool {
        if self.hits.len() == OCTREE_CHILDREN {
            return false;
        }
        self.hits.push(hit);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Hit with the smallest squared center distance to `origin`.
    ///
    /// Ties go to the hit pushed first.
    pub fn nearest(&self, origin: Vec3) -> Option<CollisionData> {
        if let [single] = self.hits.as_slice() {
            return Some(*single);
        }

        let mut nearest: Option<(f32, CollisionData)> = None;
        for (index, hit) in self.hits.iter().enumerate() {
            let squared_distance = hit.squared_distance(origin);
            tracing::trace!(index, squared_distance, "Ranking collision");

            if nearest.map_or(true, |(best, _)| squared_distance < best) {
                nearest = Some((squared_distance, *hit));
            }
        }
        nearest.map(|(_, hit)| hit)
    }
}

/// Stable sort by squared center distance to `origin`.
pub(crate) fn sort_by_distance(hits: &mut [CollisionData], origin: Vec3) {
    hits.sort_by(|a, b| {
        a.squared_distance(origin)
            .total_cmp(&b.squared_distance(origin))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxray_world::{CubeNode, CubeType};

    fn leaves() -> (Octree, [CubeId; 8]) {
        let node = CubeNode::octant(std::array::from_fn(|_| CubeNode::solid()));
        let tree = Octree::build(Vec3::ZERO, 2.0, &node).unwrap();
        let children = *tree.root_cube().unwrap().children().unwrap();
        (tree, children)
    }

    fn hit(tree: &Octree, id: CubeId) -> CollisionData {
        CollisionData::new(id, tree.cube(id).unwrap())
    }

    #[test]
    fn squared_distance_to_center() {
        let (tree, children) = leaves();
        let data = hit(&tree, children[7]);
        assert_eq!(data.center(), Vec3::splat(0.5));
        assert!((data.squared_distance(Vec3::new(2.5, 0.5, 0.5)) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn empty_set_has_no_nearest() {
        assert!(HitSet::new().nearest(Vec3::ZERO).is_none());
    }

    #[test]
    fn nearest_picks_smallest_distance() {
        let (tree, children) = leaves();
        let mut set = HitSet::new();
        set.push(hit(&tree, children[0]));
        set.push(hit(&tree, children[1]));

        let origin = Vec3::new(2.5, -0.5, -0.5);
        assert_eq!(set.nearest(origin).unwrap().cube(), children[1]);
    }

    #[test]
    fn nearest_ties_keep_first() {
        let (tree, children) = leaves();
        let mut set = HitSet::new();
        set.push(hit(&tree, children[2]));
        set.push(hit(&tree, children[1]));

        // Equidistant from both centers.
        assert_eq!(set.nearest(Vec3::ZERO).unwrap().cube(), children[2]);
    }

    #[test]
    fn capacity_is_one_hit_per_child() {
        let (tree, children) = leaves();
        let mut set = HitSet::new();
        for &id in &children {
            assert!(set.push(hit(&tree, id)));
        }
        assert!(!set.push(hit(&tree, children[0])));
        assert_eq!(set.len(), 8);
    }

    #[test]
    fn sort_orders_by_distance() {
        let (tree, children) = leaves();
        let mut sorted: Vec<_> = children.iter().map(|&id| hit(&tree, id)).collect();

        let origin = Vec3::new(3.0, 3.0, 3.0);
        sort_by_distance(&mut sorted, origin);
        assert_eq!(sorted.len(), 8);
        assert_eq!(sorted[0].cube(), children[7]);
        assert_eq!(sorted[7].cube(), children[0]);
        assert!(sorted
            .windows(2)
            .all(|pair| pair[0].squared_distance(origin) <= pair[1].squared_distance(origin)));
    }

    #[test]
    fn resolve_fails_after_removal() {
        let (mut tree, children) = leaves();
        let data = hit(&tree, children[4]);
        assert_eq!(data.resolve(&tree).unwrap().cube_type(), CubeType::Solid);

        tree.set_type(tree.root(), CubeType::Empty).unwrap();
        assert!(data.resolve(&tree).is_none());
    }
}
