//! Octree world storage for the Voxray engine.
//!
//! Cubes live in a generational arena ([`Octree`]). Handles ([`CubeId`]) are
//! weak: once a cube is removed, every id that referred to it stops resolving
//! instead of pointing at reused memory.

pub mod cube;
pub mod node;
pub mod octree;
pub mod shared;

pub use cube::{octant_offset, Cube, CubeId, CubeType};
pub use node::CubeNode;
pub use octree::Octree;
pub use shared::SharedOctree;
