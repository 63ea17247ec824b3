//! Copy-on-write octree generations shared between threads.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::octree::Octree;

/// Holds the current octree generation.
///
/// Readers take an [`Arc`] snapshot that stays consistent for as long as they
/// hold it. Writers never mutate a published generation; they build a new
/// tree and [`replace`](Self::replace) the old one. Writers are serialized,
/// so an [`update`](Self::update) always edits the latest generation. Weak
/// handles to a replaced generation stop resolving once its last snapshot is
/// dropped.
#[derive(Debug)]
pub struct SharedOctree {
    current: RwLock<Arc<Octree>>,
    writer: Mutex<()>,
}

impl SharedOctree {
    pub fn new(tree: Octree) -> Self {
        Self {
            current: RwLock::new(Arc::new(tree)),
            writer: Mutex::new(()),
        }
    }

    /// Strong handle to the current generation.
    pub fn snapshot(&self) -> Arc<Octree> {
        Arc::clone(&self.current.read())
    }

    /// Weak handle to the current generation.
    pub fn downgrade(&self) -> Weak<Octree> {
        Arc::downgrade(&self.current.read())
    }

    /// Publish a new generation and return the previous one.
    pub fn replace(&self, tree: Octree) -> Arc<Octree> {
        let _writer = self.writer.lock();
        self.publish(tree)
    }

    /// Clone the current generation, apply `edit`, and publish the result.
    ///
    /// Other writers wait until the edited tree is published. Readers are
    /// never blocked by `edit`. `edit` must not call back into
    /// [`replace`](Self::replace) or `update`, which would deadlock.
    pub fn update<R>(&self, edit: impl FnOnce(&mut Octree) -> R) -> R {
        let _writer = self.writer.lock();
        let mut tree = (*self.snapshot()).clone();
        let result = edit(&mut tree);
        self.publish(tree);
        result
    }

    /// Swap in `tree`. Callers hold the writer lock.
    fn publish(&self, tree: Octree) -> Arc<Octree> {
        let cubes = tree.cube_count();
        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(tree));
        tracing::debug!(
            cubes,
            readers = Arc::strong_count(&previous) - 1,
            "Replaced octree generation"
        );
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::CubeType;
    use glam::Vec3;

    fn solid(size: f32) -> Octree {
        Octree::with_root_type(Vec3::ZERO, size, CubeType::Solid).unwrap()
    }

    #[test]
    fn snapshot_survives_replace() {
        let shared = SharedOctree::new(solid(2.0));
        let snapshot = shared.snapshot();

        let previous = shared.replace(solid(4.0));
        drop(previous);

        assert!((snapshot.root_cube().unwrap().size() - 2.0).abs() < f32::EPSILON);
        assert!((shared.snapshot().root_cube().unwrap().size() - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn weak_handle_fails_after_replace() {
        let shared = SharedOctree::new(solid(2.0));
        let weak = shared.downgrade();
        assert!(weak.upgrade().is_some());

        drop(shared.replace(solid(2.0)));
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn update_publishes_new_generation() {
        let shared = SharedOctree::new(solid(2.0));
        let before = shared.snapshot();

        let children = shared.update(|tree| tree.subdivide(tree.root()).unwrap());

        assert_eq!(before.cube_count(), 1);
        let after = shared.snapshot();
        assert_eq!(after.cube_count(), 9);
        assert!(children.iter().all(|&id| after.contains(id)));
    }

    #[test]
    fn concurrent_updates_keep_both_edits() {
        use std::sync::Barrier;
        use std::time::Duration;

        let shared = SharedOctree::new(solid(2.0));
        let children = shared.update(|tree| tree.subdivide(tree.root()).unwrap());
        let inside_edit = Barrier::new(2);

        std::thread::scope(|scope| {
            scope.spawn(|| {
                shared.update(|tree| {
                    inside_edit.wait();
                    // Give the other writer time to try publishing first.
                    std::thread::sleep(Duration::from_millis(50));
                    tree.set_type(children[0], CubeType::Empty).unwrap();
                });
            });
            scope.spawn(|| {
                inside_edit.wait();
                shared.update(|tree| tree.set_type(children[7], CubeType::Empty).unwrap());
            });
        });

        let tree = shared.snapshot();
        assert!(tree.cube(children[0]).unwrap().is_empty());
        assert!(tree.cube(children[7]).unwrap().is_empty());
        assert!(!tree.cube(children[3]).unwrap().is_empty());
    }

    #[test]
    fn replace_waits_for_running_update() {
        use std::sync::Barrier;
        use std::time::Duration;

        let shared = SharedOctree::new(solid(2.0));
        let inside_edit = Barrier::new(2);

        std::thread::scope(|scope| {
            scope.spawn(|| {
                shared.update(|tree| {
                    inside_edit.wait();
                    std::thread::sleep(Duration::from_millis(50));
                    tree.subdivide(tree.root()).unwrap();
                });
            });
            scope.spawn(|| {
                inside_edit.wait();
                shared.replace(solid(4.0));
            });
        });

        // The replacement was published after the edit, so it wins.
        let tree = shared.snapshot();
        assert_eq!(tree.cube_count(), 1);
        assert!((tree.root_cube().unwrap().size() - 4.0).abs() < f32::EPSILON);
    }
}
