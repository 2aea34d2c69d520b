//! # Collision Configuration
//!
//! Tuning values for the octree broad phase and the per-frame collision
//! driver. Every value here belongs to one tree or one system instance;
//! independent trees can be built with different settings side by side.

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// Default maximum subdivision level
pub const DEFAULT_MAX_LEVEL: u32 = 3;

/// Default entity count a node may hold before it splits
pub const DEFAULT_IDEAL_ENTITY_COUNT: usize = 5;

/// Configuration for octree construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Deepest level a node may be created at (0 disables subdivision)
    pub max_level: u32,
    
    /// A node splits only when it overlaps strictly more entities than this
    pub ideal_entity_count: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            ideal_entity_count: DEFAULT_IDEAL_ENTITY_COUNT,
        }
    }
}

impl OctreeConfig {
    /// Create a configuration with explicit limits
    pub fn new(max_level: u32, ideal_entity_count: usize) -> Self {
        Self { max_level, ideal_entity_count }
    }
}

/// Configuration for the per-frame collision driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Octree parameters used on every rebuild
    pub octree: OctreeConfig,
    
    /// Bucket entities through the octree; when false every pair is tested
    pub use_octree: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            octree: OctreeConfig::default(),
            use_octree: true,
        }
    }
}

impl Config for CollisionConfig {}
