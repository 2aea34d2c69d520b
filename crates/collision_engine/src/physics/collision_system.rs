//! Core collision detection system
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13:
//! "The collision detection system is typically split into two phases:
//! broad-phase and narrow-phase."
//!
//! The broad phase buckets entities through an [`Octree`] rebuilt whenever
//! the world changed; only entities sharing a non-empty leaf become
//! candidate pairs. The narrow phase runs each candidate through the
//! recording overlap test of [`BoundingVolume`](super::BoundingVolume).

use std::collections::{BTreeSet, HashSet};

use log::{debug, trace};

use crate::core::config::CollisionConfig;
use crate::ecs::{EntityId, EntityManager};
use crate::spatial::Octree;

/// Collision pair representing two entities that are colliding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Smaller of the two ids
    pub entity_a: EntityId,
    /// Larger of the two ids
    pub entity_b: EntityId,
}

impl CollisionPair {
    /// Create a new collision pair (always stores smaller entity ID first for consistency)
    pub fn new(entity_a: EntityId, entity_b: EntityId) -> Self {
        if entity_a <= entity_b {
            Self { entity_a, entity_b }
        } else {
            Self { entity_a: entity_b, entity_b: entity_a }
        }
    }

    /// Whether `entity` is one of the two members
    pub fn involves(&self, entity: EntityId) -> bool {
        self.entity_a == entity || self.entity_b == entity
    }
}

/// Counters from the most recent [`CollisionSystem::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Whether the octree was rebuilt this frame
    pub rebuilt: bool,
    /// Distinct pairs handed to the narrow phase
    pub candidate_pairs: usize,
    /// Pairs found overlapping
    pub colliding_pairs: usize,
    /// Pairs overlapping now but not last frame
    pub entered: usize,
    /// Pairs overlapping last frame but not now
    pub exited: usize,
}

/// Per-frame broad + narrow phase driver over an [`EntityManager`]
#[derive(Debug)]
pub struct CollisionSystem {
    config: CollisionConfig,
    
    /// Spatial partitioning structure for broad-phase
    octree: Octree,
    
    /// Forces a rebuild on the next update regardless of world changes
    needs_rebuild: bool,
    
    /// Collision pairs from the current frame
    current_pairs: HashSet<CollisionPair>,
    
    /// Collision pairs from the previous frame
    previous_pairs: HashSet<CollisionPair>,
    
    stats: CollisionStats,
}

impl CollisionSystem {
    /// Create a system with the given configuration
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            config,
            octree: Octree::new(config.octree),
            needs_rebuild: true,
            current_pairs: HashSet::new(),
            previous_pairs: HashSet::new(),
            stats: CollisionStats::default(),
        }
    }
    
    /// Active configuration
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }
    
    /// Replace the configuration; takes effect on the next update
    pub fn set_config(&mut self, config: CollisionConfig) {
        if config != self.config {
            self.config = config;
            self.octree.set_config(config.octree);
            self.needs_rebuild = true;
        }
    }
    
    /// Octree from the most recent rebuild
    pub fn octree(&self) -> &Octree {
        &self.octree
    }
    
    /// Perform collision detection update (broad-phase + narrow-phase)
    ///
    /// Every volume's colliding set is recomputed from scratch, so after
    /// the call it holds exactly the partners found this frame.
    pub fn update(&mut self, world: &mut EntityManager) -> &HashSet<CollisionPair> {
        let world_changed = world.take_dirty();
        let mut rebuilt = false;
        
        if self.config.use_octree {
            if world_changed || self.needs_rebuild || !self.octree.is_built() {
                self.octree.build(world.entities());
                rebuilt = true;
            }
            world.assign_dimensions(&self.octree);
        } else {
            world.clear_dimensions();
        }
        self.needs_rebuild = false;
        
        world.clear_collisions();
        
        // Move current pairs to previous
        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();
        
        // Phase 1: Broad-phase
        let candidates = self.broad_phase(world);
        
        // Phase 2: Narrow-phase
        self.narrow_phase(world, &candidates);
        
        self.stats = CollisionStats {
            rebuilt,
            candidate_pairs: candidates.len(),
            colliding_pairs: self.current_pairs.len(),
            entered: self.current_pairs.difference(&self.previous_pairs).count(),
            exited: self.previous_pairs.difference(&self.current_pairs).count(),
        };
        debug!(
            "Collision frame: {} entities, {} candidates, {} colliding (+{} / -{})",
            world.len(),
            self.stats.candidate_pairs,
            self.stats.colliding_pairs,
            self.stats.entered,
            self.stats.exited
        );
        
        &self.current_pairs
    }
    
    /// Broad-phase: distinct index pairs `(i, j)` with `i < j`, in ascending order
    fn broad_phase(&self, world: &EntityManager) -> Vec<(usize, usize)> {
        let mut pairs = BTreeSet::new();
        
        if self.config.use_octree {
            for &leaf in self.octree.leaves() {
                let members = self.octree.entities_in(leaf);
                for (offset, &a) in members.iter().enumerate() {
                    for &b in &members[offset + 1..] {
                        pairs.insert((a.min(b), a.max(b)));
                    }
                }
                trace!("Leaf {} holds {} entities", leaf, members.len());
            }
        } else {
            let entities = world.entities();
            for (a, first) in entities.iter().enumerate() {
                for (b, second) in entities.iter().enumerate().skip(a + 1) {
                    if first.shares_dimension(second) {
                        pairs.insert((a, b));
                    }
                }
            }
        }
        
        pairs.into_iter().collect()
    }
    
    /// Narrow-phase: run the recording overlap test on every candidate
    fn narrow_phase(&mut self, world: &mut EntityManager, candidates: &[(usize, usize)]) {
        for &(a, b) in candidates {
            if !world.check_pair(a, b) {
                continue;
            }
            
            let ids = world.entity(a).zip(world.entity(b));
            if let Some((first, second)) = ids {
                self.current_pairs.insert(CollisionPair::new(first.id(), second.id()));
            }
        }
    }
    
    /// Get entities that entered collision this frame, sorted
    pub fn entered(&self) -> Vec<CollisionPair> {
        let mut pairs: Vec<_> = self.current_pairs
            .difference(&self.previous_pairs)
            .copied()
            .collect();
        pairs.sort_unstable();
        pairs
    }
    
    /// Get entities that exited collision this frame, sorted
    pub fn exited(&self) -> Vec<CollisionPair> {
        let mut pairs: Vec<_> = self.previous_pairs
            .difference(&self.current_pairs)
            .copied()
            .collect();
        pairs.sort_unstable();
        pairs
    }
    
    /// Get all current collision pairs
    pub fn current(&self) -> &HashSet<CollisionPair> {
        &self.current_pairs
    }
    
    /// Whether `a` and `b` overlapped in the most recent update
    pub fn is_pair_colliding(&self, a: EntityId, b: EntityId) -> bool {
        self.current_pairs.contains(&CollisionPair::new(a, b))
    }
    
    /// Counters from the most recent update
    pub fn stats(&self) -> CollisionStats {
        self.stats
    }
    
    /// Forget all pair history and force a rebuild
    pub fn clear(&mut self) {
        self.current_pairs.clear();
        self.previous_pairs.clear();
        self.stats = CollisionStats::default();
        self.needs_rebuild = true;
    }
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::SlotMap;
    use crate::foundation::math::{Mat4, Transform, Vec3};

    fn cube() -> [Vec3; 2] {
        [Vec3::repeat(-0.5), Vec3::repeat(0.5)]
    }

    fn at(x: f32, y: f32, z: f32) -> Mat4 {
        Transform::from_position(Vec3::new(x, y, z)).to_matrix()
    }

    #[test]
    fn test_pair_is_ordered() {
        let mut keys = SlotMap::<EntityId, ()>::with_key();
        let a = keys.insert(());
        let b = keys.insert(());

        assert_eq!(CollisionPair::new(a, b), CollisionPair::new(b, a));
        assert!(CollisionPair::new(b, a).involves(a));
    }

    #[test]
    fn test_entered_and_exited() {
        let mut world = EntityManager::new();
        let a = world.add_entity(&cube());
        let b = world.add_entity(&cube());
        world.set_model_matrix(b, &at(0.5, 0.0, 0.0)).expect("b is alive");

        let mut system = CollisionSystem::default();
        assert_eq!(system.update(&mut world).len(), 1);
        assert_eq!(system.entered(), vec![CollisionPair::new(a, b)]);
        assert!(system.exited().is_empty());
        assert!(system.stats().rebuilt);

        system.update(&mut world);
        assert!(system.entered().is_empty());
        assert!(!system.stats().rebuilt);

        world.set_model_matrix(b, &at(3.0, 0.0, 0.0)).expect("b is alive");
        assert!(system.update(&mut world).is_empty());
        assert_eq!(system.exited(), vec![CollisionPair::new(a, b)]);
        assert!(system.stats().rebuilt);
        assert!(!world.get(a).expect("a is alive").volume().has_collisions());
    }

    #[test]
    fn test_octree_culls_distant_pairs() {
        let mut world = EntityManager::new();
        for i in 0..8 {
            let id = world.add_entity(&cube());
            let x = if i < 4 { -10.0 } else { 10.0 };
            world.set_model_matrix(id, &at(x, i as f32 * 0.1, 0.0)).expect("alive");
        }

        let config = CollisionConfig {
            octree: crate::core::config::OctreeConfig::new(3, 1),
            use_octree: true,
        };
        let mut system = CollisionSystem::new(config);
        system.update(&mut world);
        assert_eq!(system.stats().candidate_pairs, 12);
        assert_eq!(system.stats().colliding_pairs, 12);

        system.set_config(CollisionConfig { use_octree: false, ..config });
        system.update(&mut world);
        assert_eq!(system.stats().candidate_pairs, 28);
        assert_eq!(system.stats().colliding_pairs, 12);
    }
}
