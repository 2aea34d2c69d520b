//! Axis-aligned bounding boxes for spatial bucketing

use crate::foundation::math::Vec3;

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
    
    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }
    
    /// Smallest box enclosing every box in the iterator (zero box if empty)
    pub fn union_all<I>(boxes: I) -> Self
    where
        I: IntoIterator<Item = AABB>,
    {
        let mut iter = boxes.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        iter.fold(first, |acc, next| acc.union(&next))
    }
    
    /// Box enclosing both `self` and `other`
    pub fn union(&self, other: &AABB) -> AABB {
        AABB::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }
    
    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
    
    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
    
    /// Full edge lengths along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
    
    /// Cube with the same center whose half-edge is the largest extent
    pub fn enclosing_cube(&self) -> AABB {
        let half = self.extents().max();
        AABB::from_center_extents(self.center(), Vec3::repeat(half))
    }
    
    /// Check if this AABB intersects another AABB
    ///
    /// Touching faces count as an intersection.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_enclosing_cube_uses_largest_extent() {
        let aabb = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 2.0, 1.0));
        let cube = aabb.enclosing_cube();
        assert_eq!(cube.center(), aabb.center());
        assert_eq!(cube.size(), Vec3::new(4.0, 4.0, 4.0));
        assert_eq!(cube.min, Vec3::new(0.0, -1.0, -1.5));
        assert_eq!(cube.max, Vec3::new(4.0, 3.0, 2.5));
    }
    
    #[test]
    fn test_intersects_touching_faces() {
        let a = AABB::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let b = AABB::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let c = AABB::new(Vec3::new(1.5, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
    
    #[test]
    fn test_union_all() {
        let boxes = [
            AABB::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 1.0)),
            AABB::new(Vec3::new(2.0, -3.0, 0.0), Vec3::new(3.0, 0.0, 5.0)),
        ];
        let union = AABB::union_all(boxes);
        assert_eq!(union.min, Vec3::new(-1.0, -3.0, 0.0));
        assert_eq!(union.max, Vec3::new(3.0, 1.0, 5.0));
        assert_eq!(AABB::union_all(std::iter::empty()), AABB::default());
    }
}
