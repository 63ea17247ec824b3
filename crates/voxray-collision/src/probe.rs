//! Per-cube instrumentation of the intersection primitives.

use std::cell::RefCell;

use hashbrown::HashMap;
use voxray_world::CubeId;

/// Number of primitive tests run against one cube.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrimitiveCalls {
    pub sphere: u32,
    pub boxes: u32,
}

/// Records which cubes a query ran intersection tests against.
///
/// Pass it to [`cast_ray_probed`](crate::cast_ray_probed). Not shared between
/// threads; use one counter per query.
#[derive(Debug, Default)]
pub struct PrimitiveCounter {
    calls: RefCell<HashMap<CubeId, PrimitiveCalls>>,
}

impl PrimitiveCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_sphere(&self, id: CubeId) {
        self.calls.borrow_mut().entry(id).or_default().sphere += 1;
    }

    pub(crate) fn record_box(&self, id: CubeId) {
        self.calls.borrow_mut().entry(id).or_default().boxes += 1;
    }

    /// Tests run against `id`; zero for cubes the query never tested.
    pub fn calls(&self, id: CubeId) -> PrimitiveCalls {
        self.calls.borrow().get(&id).copied().unwrap_or_default()
    }

    /// Number of distinct cubes tested.
    pub fn tested_cubes(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Total number of tests of both kinds.
    pub fn total(&self) -> u32 {
        self.calls
            .borrow()
            .values()
            .map(|calls| calls.sphere + calls.boxes)
            .sum()
    }

    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }
}
