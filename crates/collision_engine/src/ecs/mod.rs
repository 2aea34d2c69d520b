//! Entity storage for the collision world
//!
//! Entities are addressed by generational [`EntityId`] handles that stay
//! valid while other entities come and go, and are stored densely in
//! insertion order so the octree can refer to them by index.

pub mod entity;
pub mod world;

pub use entity::{Entity, EntityId};
pub use world::EntityManager;

use thiserror::Error;

/// Errors returned by id-based entity operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// The id was never issued or its entity has been removed
    #[error("Unknown entity: {0:?}")]
    UnknownEntity(EntityId),
}
