//! Ray collision queries against Voxray octrees.
//!
//! A query descends the octree from the root. At every non-empty cube the ray
//! is tested against the cube's inscribed sphere first and its bounding box
//! second; leaves that pass both are hits. When several children of a cube are
//! hit, the one whose center is closest to the ray origin wins.
//!
//! ```ignore
//! use std::sync::Arc;
//! use voxray_collision::OctreeCollision;
//!
//! let world = Arc::new(octree);
//! let picker = OctreeCollision::new(&world);
//! if let Some(hit) = picker.check_for_collision(camera.position, camera.forward) {
//!     let cube = world.cube(hit.cube());
//! }
//! ```

pub mod config;
pub mod error;
pub mod hit;
pub mod octree;
pub mod primitives;
pub mod probe;

pub use config::CollisionConfig;
pub use error::{CollisionError, Result};
pub use hit::{CollisionData, HitSet};
pub use octree::{cast_ray, cast_ray_all, cast_ray_probed, OctreeCollision};
pub use primitives::{box_entry_distance, box_intersect, sphere_intersect};
pub use probe::{PrimitiveCalls, PrimitiveCounter};
