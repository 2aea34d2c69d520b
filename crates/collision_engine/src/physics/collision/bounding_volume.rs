//! Oriented bounding volume attached to a single entity
//!
//! A `BoundingVolume` is built once from model-space points and then
//! follows its entity through model-matrix updates. It carries three nested
//! shapes:
//!
//! - the oriented box (OBB): local min/max carried through the model matrix
//! - the bounding sphere: local center and distance to the local min corner
//! - the axis-realigned box (ARBB): world AABB around the 8 transformed corners
//!
//! Overlap is decided by a sphere pre-test followed by the separating axis
//! test. Each volume remembers which other entities it currently overlaps;
//! that membership is keyed by `EntityId` so it survives entity relocation.

use bitflags::bitflags;
use log::trace;

use crate::debug::draw::{palette, DebugDrawList};
use crate::ecs::EntityId;
use crate::foundation::collections::{Key, OrderedSet};
use crate::foundation::math::{box_corners, transform_point, utils, Mat4, Vec3, Vec4};
use crate::spatial::{Bounded, AABB};

use super::primitives::BoundingSphere;
use super::sat::{separating_axis_test, ObbFrame, SeparatingAxis};

bitflags! {
    /// Which of a volume's shapes are sent to the debug renderer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VolumeVisibility: u8 {
        /// Bounding sphere
        const SPHERE = 1 << 0;
        /// Oriented bounding box
        const OBB = 1 << 1;
        /// Axis-realigned bounding box
        const ARBB = 1 << 2;
    }
}

impl Default for VolumeVisibility {
    fn default() -> Self {
        Self::OBB
    }
}

/// Oriented bounding volume with sphere pre-test and collision membership
#[derive(Debug, Clone)]
pub struct BoundingVolume {
    owner: EntityId,

    center: Vec3,
    min_local: Vec3,
    max_local: Vec3,
    min_global: Vec3,
    max_global: Vec3,
    half_width: Vec3,
    radius: f32,
    arbb_size: Vec3,

    model: Mat4,

    color_colliding: Vec4,
    color_not_colliding: Vec4,
    visibility: VolumeVisibility,

    colliding: OrderedSet<EntityId>,
}

impl BoundingVolume {
    /// Fit a volume around model-space points
    ///
    /// An empty point list yields a degenerate volume at the origin
    /// (center, min and max all zero).
    pub fn new(points: &[Vec3]) -> Self {
        let (min, max) = utils::min_max(points).unwrap_or_default();
        let center = (min + max) * 0.5;

        Self {
            owner: EntityId::null(),
            center,
            min_local: min,
            max_local: max,
            min_global: min,
            max_global: max,
            half_width: (max - min) * 0.5,
            radius: (center - min).magnitude(),
            arbb_size: max - min,
            model: Mat4::identity(),
            color_colliding: palette::red(),
            color_not_colliding: palette::white(),
            visibility: VolumeVisibility::default(),
            colliding: OrderedSet::new(),
        }
    }

    /// Fit a volume around points and tag it with its owning entity
    pub fn with_owner(owner: EntityId, points: &[Vec3]) -> Self {
        let mut volume = Self::new(points);
        volume.owner = owner;
        volume
    }

    /// Entity this volume belongs to
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: EntityId) {
        self.owner = owner;
    }

    /// Model-space center
    pub fn center_local(&self) -> Vec3 {
        self.center
    }

    /// Model-space minimum corner
    pub fn min_local(&self) -> Vec3 {
        self.min_local
    }

    /// Model-space maximum corner
    pub fn max_local(&self) -> Vec3 {
        self.max_local
    }

    /// World-space center (the local center through the model matrix)
    pub fn center_global(&self) -> Vec3 {
        transform_point(&self.model, &self.center)
    }

    /// World-space minimum corner of the realigned box
    pub fn min_global(&self) -> Vec3 {
        self.min_global
    }

    /// World-space maximum corner of the realigned box
    pub fn max_global(&self) -> Vec3 {
        self.max_global
    }

    /// Model-space half extents
    pub fn half_width(&self) -> Vec3 {
        self.half_width
    }

    /// Model-space bounding sphere radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Bounding sphere radius after the model matrix's largest axis scale
    pub fn global_radius(&self) -> f32 {
        let scale = (0..3)
            .map(|i| self.model.fixed_view::<3, 1>(0, i).magnitude())
            .fold(0.0_f32, f32::max);
        self.radius * scale
    }

    /// Edge lengths of the axis-realigned box
    pub fn arbb_size(&self) -> Vec3 {
        self.arbb_size
    }

    /// Current model matrix
    pub fn model_matrix(&self) -> &Mat4 {
        &self.model
    }

    /// World-space bounding sphere
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center_global(), self.global_radius())
    }

    /// World-space oriented box
    pub fn obb(&self) -> ObbFrame {
        ObbFrame::from_transform(&self.model, &self.center, &self.half_width)
    }

    /// Move the volume into the world
    ///
    /// Returns `false` without touching anything when `model` equals the
    /// current matrix exactly; otherwise refits the global box around the
    /// 8 transformed local corners and returns `true`.
    pub fn set_model_matrix(&mut self, model: &Mat4) -> bool {
        if *model == self.model {
            return false;
        }
        self.model = *model;

        let corners = box_corners(self.min_local, self.max_local)
            .map(|corner| transform_point(&self.model, &corner));
        let (min, max) = utils::min_max(&corners).unwrap_or_default();

        self.min_global = min;
        self.max_global = max;
        self.arbb_size = max - min;
        true
    }

    /// Colour used when the volume overlaps something
    pub fn color_colliding(&self) -> Vec4 {
        self.color_colliding
    }

    /// Colour used when the volume is free
    pub fn color_not_colliding(&self) -> Vec4 {
        self.color_not_colliding
    }

    /// Set the colour used when the volume overlaps something
    pub fn set_color_colliding(&mut self, color: Vec4) {
        self.color_colliding = color;
    }

    /// Set the colour used when the volume is free
    pub fn set_color_not_colliding(&mut self, color: Vec4) {
        self.color_not_colliding = color;
    }

    /// Shapes drawn by [`Self::add_to_render_list`]
    pub fn visibility(&self) -> VolumeVisibility {
        self.visibility
    }

    /// Choose which shapes are drawn
    pub fn set_visibility(&mut self, visibility: VolumeVisibility) {
        self.visibility = visibility;
    }

    /// First axis separating this box from `other`, if any
    pub fn separating_axis(&self, other: &BoundingVolume) -> Option<SeparatingAxis> {
        separating_axis_test(&self.obb(), &other.obb())
    }

    /// Side-effect free overlap test
    ///
    /// True only when the bounding spheres overlap and no separating axis
    /// exists between the two oriented boxes.
    pub fn overlaps(&self, other: &BoundingVolume) -> bool {
        if !self.bounding_sphere().intersects(&other.bounding_sphere()) {
            return false;
        }

        match self.separating_axis(other) {
            Some(axis) => {
                trace!("{:?} / {:?} separated on {}", self.owner, other.owner, axis);
                false
            }
            None => true,
        }
    }

    /// Overlap test that records the outcome on both volumes
    ///
    /// On overlap each volume adds the other's owner to its colliding set;
    /// otherwise both remove it. Repeating the call changes nothing.
    /// Membership is only recorded between two distinct owned volumes: a
    /// volume without an owner still gets an answer but no set changes.
    pub fn is_colliding(&mut self, other: &mut BoundingVolume) -> bool {
        let colliding = self.overlaps(other);
        if self.owner.is_null() || other.owner.is_null() || self.owner == other.owner {
            return colliding;
        }

        if colliding {
            self.add_collision_with(other.owner);
            other.add_collision_with(self.owner);
        } else {
            self.remove_collision_with(other.owner);
            other.remove_collision_with(self.owner);
        }
        colliding
    }

    /// Record an overlap with `other`
    ///
    /// No-op if already recorded, if `other` is the null id or if it is
    /// this volume's own owner.
    pub fn add_collision_with(&mut self, other: EntityId) {
        if other.is_null() || other == self.owner {
            return;
        }
        self.colliding.insert(other);
    }

    /// Forget an overlap with `other`
    pub fn remove_collision_with(&mut self, other: EntityId) {
        self.colliding.remove(&other);
    }

    /// Forget every recorded overlap
    pub fn clear_colliding(&mut self) {
        self.colliding.clear();
    }

    /// Entities this volume currently overlaps, in id order
    pub fn colliding_with(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.colliding.iter().copied()
    }

    /// Whether an overlap with `other` is recorded
    pub fn is_colliding_with(&self, other: EntityId) -> bool {
        self.colliding.contains(&other)
    }

    /// Whether any overlap is recorded
    pub fn has_collisions(&self) -> bool {
        !self.colliding.is_empty()
    }

    /// Number of recorded overlaps
    pub fn collision_count(&self) -> usize {
        self.colliding.len()
    }

    /// Queue wireframes for every visible shape
    pub fn add_to_render_list(&self, list: &mut DebugDrawList) {
        if self.visibility.contains(VolumeVisibility::SPHERE) {
            let sphere = self.bounding_sphere();
            list.draw_sphere(sphere.center, sphere.radius, palette::cornflower_blue());
        }

        if self.visibility.contains(VolumeVisibility::OBB) {
            let obb = self.obb();
            let color = if self.has_collisions() {
                self.color_colliding
            } else {
                self.color_not_colliding
            };
            list.draw_oriented_box(obb.center, obb.half_extents, obb.rotation(), color);
        }

        if self.visibility.contains(VolumeVisibility::ARBB) {
            list.draw_box(self.center_global(), self.arbb_size * 0.5, palette::yellow());
        }
    }
}

impl Bounded for BoundingVolume {
    fn global_aabb(&self) -> AABB {
        AABB::new(self.min_global, self.max_global)
    }
}
