//! Primitive collision shapes
//!
//! Bounding spheres back the cheap broad pre-test that runs before the
//! oriented box test.

use crate::foundation::math::Vec3;

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere overlaps another
    ///
    /// Strict: spheres that only touch do not overlap.
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance = (self.center - other.center).magnitude();
        distance < self.radius + other.radius
    }
}
