//! Recursive ray traversal of an octree.

use std::sync::{Arc, Weak};

use glam::Vec3;
use voxray_core::Ray;
use voxray_world::{Cube, CubeId, Octree};

use crate::config::CollisionConfig;
use crate::error::{CollisionError, Result};
use crate::hit::{sort_by_distance, CollisionData, HitSet};
use crate::primitives::{box_intersect, sphere_intersect};
use crate::probe::PrimitiveCounter;

/// Nearest leaf hit by `ray` below `root`.
///
/// Returns `Ok(None)` if nothing is hit, `root` does not resolve, or the ray
/// has no direction. Errors only for malformed trees.
#[cfg_attr(
    feature = "profiling-tracy",
    tracing::instrument(level = "trace", skip_all)
)]
pub fn cast_ray(
    tree: &Octree,
    root: CubeId,
    ray: &Ray,
    config: &CollisionConfig,
) -> Result<Option<CollisionData>> {
    Traversal::new(tree, ray, config, None).nearest_from(root)
}

/// Every leaf hit by `ray` below `root`, nearest first.
#[cfg_attr(
    feature = "profiling-tracy",
    tracing::instrument(level = "trace", skip_all)
)]
pub fn cast_ray_all(
    tree: &Octree,
    root: CubeId,
    ray: &Ray,
    config: &CollisionConfig,
) -> Result<Vec<CollisionData>> {
    Traversal::new(tree, ray, config, None).all_from(root)
}

/// [`cast_ray`] that records every primitive test in `probe`.
pub fn cast_ray_probed(
    tree: &Octree,
    root: CubeId,
    ray: &Ray,
    config: &CollisionConfig,
    probe: &PrimitiveCounter,
) -> Result<Option<CollisionData>> {
    Traversal::new(tree, ray, config, Some(probe)).nearest_from(root)
}

struct Traversal<'a> {
    tree: &'a Octree,
    ray: &'a Ray,
    config: &'a CollisionConfig,
    probe: Option<&'a PrimitiveCounter>,
}

impl<'a> Traversal<'a> {
    const fn new(
        tree: &'a Octree,
        ray: &'a Ray,
        config: &'a CollisionConfig,
        probe: Option<&'a PrimitiveCounter>,
    ) -> Self {
        Self {
            tree,
            ray,
            config,
            probe,
        }
    }

    fn resolve_root(&self, root: CubeId) -> Option<&'a Cube> {
        if self.ray.is_degenerate() {
            tracing::trace!(origin = ?self.ray.origin, "Ray has no direction");
            return None;
        }
        let cube = self.tree.cube(root);
        if cube.is_none() {
            tracing::trace!(?root, "Root cube no longer exists");
        }
        cube
    }

    fn nearest_from(&self, root: CubeId) -> Result<Option<CollisionData>> {
        match self.resolve_root(root) {
            Some(cube) => self.nearest(root, cube, 0),
            None => Ok(None),
        }
    }

    fn all_from(&self, root: CubeId) -> Result<Vec<CollisionData>> {
        let mut hits = Vec::new();
        if let Some(cube) = self.resolve_root(root) {
            self.collect(root, cube, 0, &mut hits)?;
        }
        sort_by_distance(&mut hits, self.ray.origin);
        Ok(hits)
    }

    /// Sphere test first, box test only if the sphere is hit.
    fn enters(&self, id: CubeId, cube: &Cube) -> bool {
        let Ray { origin, direction } = *self.ray;
        let half = cube.size() * 0.5;

        if let Some(probe) = self.probe {
            probe.record_sphere(id);
        }
        if !sphere_intersect(origin, direction, cube.center(), half * half) {
            return false;
        }

        if let Some(probe) = self.probe {
            probe.record_box(id);
        }
        box_intersect(cube.bounding_box(), origin, direction)
    }

    /// Runs `visit` on every non-empty child of `id`, in octant order.
    fn for_each_child(
        &self,
        id: CubeId,
        mut visit: impl FnMut(CubeId, &'a Cube) -> Result<()>,
    ) -> Result<()> {
        for (child_id, child) in self.tree.children(id) {
            if !child.is_empty() {
                visit(child_id, child)?;
            }
        }
        Ok(())
    }

    fn check_depth(&self, depth: u32) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(CollisionError::DepthExceeded {
                max_depth: self.config.max_depth,
            });
        }
        Ok(())
    }

    fn nearest(&self, id: CubeId, cube: &Cube, depth: u32) -> Result<Option<CollisionData>> {
        self.check_depth(depth)?;

        // Empty cubes have no geometry below them.
        if cube.is_empty() || !self.enters(id, cube) {
            return Ok(None);
        }

        if cube.is_leaf() {
            return Ok(Some(CollisionData::new(id, cube)));
        }

        let mut hits = HitSet::new();
        self.for_each_child(id, |child_id, child| {
            if let Some(hit) = self.nearest(child_id, child, depth + 1)? {
                hits.push(hit);
            }
            Ok(())
        })?;

        Ok(hits.nearest(self.ray.origin))
    }

    fn collect(
        &self,
        id: CubeId,
        cube: &Cube,
        depth: u32,
        hits: &mut Vec<CollisionData>,
    ) -> Result<()> {
        self.check_depth(depth)?;

        if cube.is_empty() || !self.enters(id, cube) {
            return Ok(());
        }

        if cube.is_leaf() {
            hits.push(CollisionData::new(id, cube));
            return Ok(());
        }
        self.for_each_child(id, |child_id, child| {
            self.collect(child_id, child, depth + 1, hits)
        })
    }
}

/// Ray picking against one octree world.
///
/// Holds only a weak reference to the tree. If the tree has been dropped or
/// replaced, or the root cube removed, queries report no collision.
#[derive(Clone, Debug)]
pub struct OctreeCollision {
    tree: Weak<Octree>,
    root: CubeId,
    config: CollisionConfig,
}

impl OctreeCollision {
    /// Query the whole of `tree`, starting at its root.
    pub fn new(tree: &Arc<Octree>) -> Self {
        Self::from_weak(Arc::downgrade(tree), tree.root())
    }

    /// Query the subtree below `root`.
    pub fn from_weak(tree: Weak<Octree>, root: CubeId) -> Self {
        Self {
            tree,
            root,
            config: CollisionConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: CollisionConfig) -> Self {
        self.config = config;
        self
    }

    pub const fn root(&self) -> CubeId {
        self.root
    }

    pub const fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Nearest hit for a camera at `position` looking along `direction`.
    ///
    /// # Panics
    ///
    /// In debug builds, if the tree violates an invariant. Release builds log
    /// the violation and report no collision.
    pub fn check_for_collision(&self, position: Vec3, direction: Vec3) -> Option<CollisionData> {
        self.try_check_for_collision(position, direction)
            .unwrap_or_else(aborted)
    }

    /// Every leaf hit, nearest first. Panics like
    /// [`check_for_collision`](Self::check_for_collision).
    pub fn check_for_collisions(&self, position: Vec3, direction: Vec3) -> Vec<CollisionData> {
        self.try_check_for_collisions(position, direction)
            .unwrap_or_else(aborted)
    }

    /// Like [`check_for_collision`](Self::check_for_collision) but reports
    /// malformed trees instead of treating them as a miss.
    pub fn try_check_for_collision(
        &self,
        position: Vec3,
        direction: Vec3,
    ) -> Result<Option<CollisionData>> {
        let Some(tree) = self.upgrade() else {
            return Ok(None);
        };
        cast_ray(&tree, self.root, &Ray::new(position, direction), &self.config)
    }

    pub fn try_check_for_collisions(
        &self,
        position: Vec3,
        direction: Vec3,
    ) -> Result<Vec<CollisionData>> {
        let Some(tree) = self.upgrade() else {
            return Ok(Vec::new());
        };
        cast_ray_all(&tree, self.root, &Ray::new(position, direction), &self.config)
    }

    fn upgrade(&self) -> Option<Arc<Octree>> {
        let tree = self.tree.upgrade();
        if tree.is_none() {
            tracing::trace!("Octree no longer available");
        }
        tree
    }
}

/// Fails fast in debug builds, degrades to "no collision" in release.
fn aborted<T: Default>(err: CollisionError) -> T {
    tracing::warn!(%err, "Octree collision query aborted");
    debug_assert!(false, "octree collision query aborted: {err}");
    T::default()
}
