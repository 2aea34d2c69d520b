//! # Collision Engine
//!
//! Overlap detection for many oriented bounding volumes, with an octree
//! broad phase.
//!
//! ## Features
//!
//! - **Bounding Volumes**: OBB, bounding sphere and axis-realigned box per entity
//! - **Separating Axis Test**: exact 15-axis OBB overlap with a sphere pre-test
//! - **Octree Broad Phase**: cubic subdivision rebuilt whenever the world moves
//! - **Debug Drawing**: wireframe descriptors for volumes and octants
//!
//! ## Quick Start
//!
//! ```rust
//! use collision_engine::prelude::*;
//!
//! let cube = [Vec3::new(-0.5, -0.5, -0.5), Vec3::new(0.5, 0.5, 0.5)];
//!
//! let mut world = EntityManager::new();
//! let a = world.add_entity(&cube);
//! let b = world.add_entity(&cube);
//! world.set_model_matrix(b, &Transform::from_position(Vec3::new(0.5, 0.0, 0.0)).to_matrix())?;
//!
//! let mut collisions = CollisionSystem::new(CollisionConfig::default());
//! collisions.update(&mut world);
//! assert!(collisions.is_pair_colliding(a, b));
//! # Ok::<(), WorldError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Configuration
pub mod config;
pub mod core;

pub mod foundation;
pub mod spatial;
pub mod ecs;
pub mod physics;
pub mod debug;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{CollisionConfig, Config, ConfigError, OctreeConfig},
        debug::{CollisionDebugVisualizer, DebugDrawList, DebugShape, OctreeDisplayMode},
        ecs::{Entity, EntityId, EntityManager, WorldError},
        foundation::math::{Mat4, Quat, Transform, Vec3, Vec4},
        physics::{
            BoundingVolume, CollisionPair, CollisionStats, CollisionSystem,
            SeparatingAxis, VolumeVisibility,
        },
        spatial::{Octant, OctantId, Octree, AABB},
    };
}
