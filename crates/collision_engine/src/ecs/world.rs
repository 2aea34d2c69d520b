//! Entity manager: the ordered entity store the collision system runs over

use log::{debug, warn};

use crate::foundation::collections::SlotMap;
use crate::foundation::math::{Mat4, Vec3};
use crate::physics::collision::BoundingVolume;
use crate::spatial::Octree;

use super::{Entity, EntityId, WorldError};

/// Dense, insertion-ordered entity storage addressed by stable ids
///
/// Entity indices are contiguous (`0..len()`) and keep their relative
/// order when an entity is removed. The manager also tracks whether any
/// volume moved since the last [`EntityManager::take_dirty`], which tells
/// the collision system to rebuild its octree.
#[derive(Debug, Default)]
pub struct EntityManager {
    slots: SlotMap<EntityId, usize>,
    entities: Vec<Entity>,
    dirty: bool,
}

impl EntityManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity whose volume is fitted around model-space `points`
    pub fn add_entity(&mut self, points: &[Vec3]) -> EntityId {
        self.add_volume(BoundingVolume::new(points))
    }

    /// Create an entity around a prepared volume
    pub fn add_volume(&mut self, volume: BoundingVolume) -> EntityId {
        let index = self.entities.len();
        let id = self.slots.insert(index);
        self.entities.push(Entity::new(id, volume));
        self.dirty = true;

        debug!("Added entity {:?} at index {}", id, index);
        id
    }

    /// Remove an entity, shifting later entities down by one index
    ///
    /// Every other volume forgets its overlap with the removed entity.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity, WorldError> {
        let index = self.slots.remove(id).ok_or_else(|| {
            warn!("remove_entity: unknown entity {:?}", id);
            WorldError::UnknownEntity(id)
        })?;

        let removed = self.entities.remove(index);
        for (offset, entity) in self.entities[index..].iter().enumerate() {
            if let Some(slot) = self.slots.get_mut(entity.id()) {
                *slot = index + offset;
            }
        }
        for entity in &mut self.entities {
            entity.volume_mut().remove_collision_with(id);
        }
        self.dirty = true;

        debug!("Removed entity {:?} from index {}", id, index);
        Ok(removed)
    }

    /// Whether `id` refers to a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.contains_key(id)
    }

    /// Current index of entity `id`
    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.slots.get(id).copied()
    }

    /// Entity by id
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).and_then(|index| self.entities.get(index))
    }

    /// Mutable entity by id
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = self.index_of(id)?;
        self.entities.get_mut(index)
    }

    /// Entity by index
    pub fn entity(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// All entities in index order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Iterate entities in index order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity is alive
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Move entity `id` into the world
    ///
    /// Returns whether the matrix differed from the current one. A change
    /// marks the manager dirty.
    pub fn set_model_matrix(&mut self, id: EntityId, model: &Mat4) -> Result<bool, WorldError> {
        let Some(entity) = self.get_mut(id) else {
            warn!("set_model_matrix: unknown entity {:?}", id);
            return Err(WorldError::UnknownEntity(id));
        };

        let changed = entity.volume_mut().set_model_matrix(model);
        self.dirty |= changed;
        Ok(changed)
    }

    /// Whether anything changed since the last call, clearing the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Whether anything changed since the last [`Self::take_dirty`]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force the next [`Self::take_dirty`] to report a change
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Run the recording overlap test between the entities at two indices
    ///
    /// Out-of-range or identical indices never collide.
    pub fn check_pair(&mut self, a: usize, b: usize) -> bool {
        let (low, high) = (a.min(b), a.max(b));
        if low == high || high >= self.entities.len() {
            return false;
        }

        let (head, tail) = self.entities.split_at_mut(high);
        head[low].volume_mut().is_colliding(tail[0].volume_mut())
    }

    /// Record, for every entity, the non-empty octree leaves holding it
    pub fn assign_dimensions(&mut self, octree: &Octree) {
        self.clear_dimensions();
        for &leaf in octree.leaves() {
            for &index in octree.entities_in(leaf) {
                if let Some(entity) = self.entities.get_mut(index) {
                    entity.add_dimension(leaf);
                }
            }
        }
    }

    /// Forget every entity's octree leaves
    pub fn clear_dimensions(&mut self) {
        for entity in &mut self.entities {
            entity.clear_dimensions();
        }
    }

    /// Forget every recorded overlap
    pub fn clear_collisions(&mut self) {
        for entity in &mut self.entities {
            entity.volume_mut().clear_colliding();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;

    fn cube() -> [Vec3; 2] {
        [Vec3::repeat(-0.5), Vec3::repeat(0.5)]
    }

    fn at(x: f32) -> Mat4 {
        Transform::from_position(Vec3::new(x, 0.0, 0.0)).to_matrix()
    }

    #[test]
    fn test_add_and_lookup() {
        let mut world = EntityManager::new();
        let a = world.add_entity(&cube());
        let b = world.add_entity(&cube());

        assert_eq!(world.len(), 2);
        assert_eq!(world.index_of(a), Some(0));
        assert_eq!(world.index_of(b), Some(1));
        assert_eq!(world.get(b).map(Entity::id), Some(b));
        assert_eq!(world.entity(1).map(|e| e.volume().owner()), Some(b));
        assert!(world.take_dirty());
        assert!(!world.take_dirty());
    }

    #[test]
    fn test_set_model_matrix_marks_dirty_only_on_change() {
        let mut world = EntityManager::new();
        let a = world.add_entity(&cube());
        world.take_dirty();

        assert_eq!(world.set_model_matrix(a, &Mat4::identity()), Ok(false));
        assert!(!world.is_dirty());

        assert_eq!(world.set_model_matrix(a, &at(2.0)), Ok(true));
        assert!(world.take_dirty());
    }

    #[test]
    fn test_remove_reindexes_and_forgets_collisions() {
        let mut world = EntityManager::new();
        let a = world.add_entity(&cube());
        let b = world.add_entity(&cube());
        let c = world.add_entity(&cube());

        assert!(world.check_pair(0, 2));
        assert!(world.check_pair(1, 2));

        let removed = world.remove_entity(a).expect("a is alive");
        assert_eq!(removed.id(), a);
        assert_eq!(world.index_of(b), Some(0));
        assert_eq!(world.index_of(c), Some(1));
        assert!(!world.contains(a));

        let volume = world.get(c).expect("c is alive").volume();
        assert!(!volume.is_colliding_with(a));
        assert!(volume.is_colliding_with(b));
    }

    #[test]
    fn test_stale_id_is_unknown() {
        let mut world = EntityManager::new();
        let a = world.add_entity(&cube());
        world.remove_entity(a).expect("a is alive");
        let reused = world.add_entity(&cube());

        assert_ne!(a, reused);
        assert_eq!(world.remove_entity(a).map(|e| e.id()), Err(WorldError::UnknownEntity(a)));
        assert_eq!(world.set_model_matrix(a, &at(1.0)), Err(WorldError::UnknownEntity(a)));
    }

    #[test]
    fn test_check_pair_bounds() {
        let mut world = EntityManager::new();
        world.add_entity(&cube());
        world.add_entity(&cube());

        assert!(world.check_pair(1, 0));
        assert!(!world.check_pair(0, 0));
        assert!(!world.check_pair(0, 5));
    }

    #[test]
    fn test_assign_dimensions_from_leaves() {
        let mut world = EntityManager::new();
        let a = world.add_entity(&cube());
        let b = world.add_entity(&cube());
        world.set_model_matrix(a, &at(-2.0)).expect("a is alive");
        world.set_model_matrix(b, &at(2.0)).expect("b is alive");

        let mut octree = Octree::new(crate::core::config::OctreeConfig::new(1, 1));
        octree.build(world.entities());
        world.assign_dimensions(&octree);

        let ea = world.get(a).expect("a is alive");
        let eb = world.get(b).expect("b is alive");
        assert!(ea.dimensions().next().is_some());
        assert!(!ea.shares_dimension(eb));

        world.clear_dimensions();
        let ea = world.get(a).expect("a is alive");
        assert!(ea.shares_dimension(world.get(b).expect("b is alive")));
    }
}
