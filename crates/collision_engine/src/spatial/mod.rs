//! Spatial partitioning data structures
//!
//! Provides the axis-aligned box type and the octree used to bucket
//! entities before the narrow phase.

mod aabb;
mod octree;

pub use aabb::AABB;
pub use octree::{Octant, OctantId, OctantState, Octree, ROOT_OCTANT};

/// Anything with a world-space axis-aligned box
pub trait Bounded {
    /// Current world-space bounds
    fn global_aabb(&self) -> AABB;
}

impl Bounded for AABB {
    fn global_aabb(&self) -> AABB {
        *self
    }
}

impl<T: Bounded + ?Sized> Bounded for &T {
    fn global_aabb(&self) -> AABB {
        (**self).global_aabb()
    }
}
