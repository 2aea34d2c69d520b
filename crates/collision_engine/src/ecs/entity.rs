//! Entity implementation

use crate::foundation::collections::OrderedSet;
use crate::physics::collision::BoundingVolume;
use crate::spatial::{Bounded, OctantId, AABB};

slotmap::new_key_type! {
    /// Stable entity identifier
    ///
    /// Generational: an id for a removed entity never matches the entity
    /// that later reuses its slot.
    pub struct EntityId;
}

/// Collidable entity: an id, its bounding volume and the octree leaves it occupies
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    volume: BoundingVolume,
    dimensions: OrderedSet<OctantId>,
}

impl Entity {
    pub(super) fn new(id: EntityId, mut volume: BoundingVolume) -> Self {
        volume.set_owner(id);
        Self {
            id,
            volume,
            dimensions: OrderedSet::new(),
        }
    }

    /// Get the entity ID
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Bounding volume
    pub fn volume(&self) -> &BoundingVolume {
        &self.volume
    }

    /// Mutable bounding volume
    pub fn volume_mut(&mut self) -> &mut BoundingVolume {
        &mut self.volume
    }

    /// Octree leaves this entity was assigned to on the last build
    pub fn dimensions(&self) -> impl Iterator<Item = OctantId> + '_ {
        self.dimensions.iter().copied()
    }

    /// Record that the entity occupies leaf `id`
    pub fn add_dimension(&mut self, id: OctantId) {
        self.dimensions.insert(id);
    }

    /// Forget every recorded leaf
    pub fn clear_dimensions(&mut self) {
        self.dimensions.clear();
    }

    /// Whether two entities may touch
    ///
    /// True when they share a leaf, or when neither has any leaf (the
    /// octree is not in use).
    pub fn shares_dimension(&self, other: &Entity) -> bool {
        if self.dimensions.is_empty() && other.dimensions.is_empty() {
            return true;
        }
        !self.dimensions.is_disjoint(&other.dimensions)
    }
}

impl Bounded for Entity {
    fn global_aabb(&self) -> AABB {
        self.volume.global_aabb()
    }
}
