//! Math utilities and types
//!
//! Provides fundamental math types for 3D collision work.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Rotation3,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (used for RGBA colors)
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,
    
    /// Rotation quaternion
    pub rotation: Quat,
    
    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }
    
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
    
    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }
    
    /// Replace the scale (builder style)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
    
    /// Convert to a model matrix (translation * rotation * scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// The 8 corners of the box spanned by `min` and `max`
///
/// Order: back square (z = min) then front square (z = max), each as
/// (min,min) (max,min) (min,max) (max,max) in x/y.
pub fn box_corners(min: Vec3, max: Vec3) -> [Vec3; 8] {
    [
        min,
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(min.x, max.y, max.z),
        max,
    ]
}

/// Transform a point by a 4x4 affine matrix
pub fn transform_point(matrix: &Mat4, point: &Vec3) -> Vec3 {
    matrix.transform_point(&Point3::from(*point)).coords
}

/// Math utility functions
pub mod utils {
    use super::Vec3;
    
    /// Componentwise minimum and maximum of a point set
    ///
    /// Returns `None` for an empty slice.
    pub fn min_max(points: &[Vec3]) -> Option<(Vec3, Vec3)> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for point in rest {
            min = min.inf(point);
            max = max.sup(point);
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    
    const EPSILON: f32 = 1e-6;
    
    #[test]
    fn test_transform_identity_matrix() {
        assert_eq!(Transform::identity().to_matrix(), Mat4::identity());
    }
    
    #[test]
    fn test_transform_point_translation_and_scale() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .with_scale(Vec3::new(2.0, 2.0, 2.0));
        let p = transform_point(&transform.to_matrix(), &Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Vec3::new(3.0, 2.0, 3.0), epsilon = EPSILON);
    }
    
    #[test]
    fn test_box_corners_span_extremes() {
        let corners = box_corners(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(corners[0], Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(corners[7], Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(utils::min_max(&corners), Some((corners[0], corners[7])));
    }
    
    #[test]
    fn test_min_max_empty() {
        assert!(utils::min_max(&[]).is_none());
    }
}
