//! Physics module for collision detection
//!
//! Narrow-phase volumes live in [`collision`]; the per-frame driver that
//! pairs them through the octree lives in [`collision_system`].

pub mod collision;
pub mod collision_system;

#[cfg(test)]
mod tests;

pub use collision::{
    BoundingSphere,
    BoundingVolume,
    SeparatingAxis,
    VolumeVisibility,
};
pub use collision_system::{CollisionPair, CollisionStats, CollisionSystem};
