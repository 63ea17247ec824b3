//! Sample octree world for the picker.

use glam::Vec3;
use voxray_world::{CubeNode, CubeType, Octree};

/// World edge length in world units.
pub const WORLD_SIZE: f32 = 64.0;

/// Build a stepped "pyramid". Every level subdivides its four lower octants
/// again, puts a normal cube in the upper +x +z octant and leaves the other
/// upper octants empty.
pub fn pyramid(depth: u32) -> CubeNode {
    if depth == 0 {
        return CubeNode::solid();
    }

    CubeNode::octant(std::array::from_fn(|index| {
        let upper = index & 0b010 != 0;
        match (upper, index) {
            (false, _) => pyramid(depth - 1),
            (true, 0b111) => CubeNode::Leaf(CubeType::Normal),
            (true, _) => CubeNode::Empty,
        }
    }))
}

/// Octree of the sample world, centered on the origin.
pub fn build(depth: u32) -> voxray_core::Result<Octree> {
    let node = pyramid(depth);
    tracing::info!(
        depth,
        nodes = node.count_nodes(),
        "Building sample world"
    );
    Octree::build(Vec3::ZERO, WORLD_SIZE, &node)
}
