//! Debug drawing primitives and per-frame render list
//!
//! Based on Game Engine Architecture 3rd Edition, Section 10.2:
//! "Debug drawing facilities allow programmers to render simple shapes like
//! lines, points, spheres and boxes for debugging and visualization purposes."

use crate::foundation::math::{Quat, Vec3, Vec4};

/// Named RGBA colours used by the collision visualizers
pub mod palette {
    use super::Vec4;

    /// Opaque red
    pub fn red() -> Vec4 {
        Vec4::new(1.0, 0.0, 0.0, 1.0)
    }

    /// Opaque white
    pub fn white() -> Vec4 {
        Vec4::new(1.0, 1.0, 1.0, 1.0)
    }

    /// Opaque yellow
    pub fn yellow() -> Vec4 {
        Vec4::new(1.0, 1.0, 0.0, 1.0)
    }

    /// Cornflower blue
    pub fn cornflower_blue() -> Vec4 {
        Vec4::new(0.392, 0.584, 0.929, 1.0)
    }

    /// Opaque green
    pub fn green() -> Vec4 {
        Vec4::new(0.0, 1.0, 0.0, 1.0)
    }

    /// Light blue, partially transparent
    pub fn light_blue() -> Vec4 {
        Vec4::new(0.5, 0.8, 1.0, 0.35)
    }
}

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Sphere at center with radius
    Sphere {
        /// World-space center
        center: Vec3,
        /// Radius
        radius: f32,
        /// RGBA colour
        color: Vec4,
        /// Draw edges only
        wireframe: bool,
    },
    
    /// Box (AABB or OBB) at center with half-extents
    Box {
        /// World-space center
        center: Vec3,
        /// Half size along each local axis
        extents: Vec3,
        /// Orientation of the local axes
        rotation: Quat,
        /// RGBA colour
        color: Vec4,
        /// Draw edges only
        wireframe: bool,
    },
}

impl DebugShape {
    /// Colour of the shape
    pub fn color(&self) -> Vec4 {
        match self {
            DebugShape::Sphere { color, .. } | DebugShape::Box { color, .. } => *color,
        }
    }
    
    /// World-space center of the shape
    pub fn center(&self) -> Vec3 {
        match self {
            DebugShape::Sphere { center, .. } | DebugShape::Box { center, .. } => *center,
        }
    }
}

/// Shapes queued for the current frame
///
/// The renderer reads [`DebugDrawList::shapes`] (or takes them with
/// [`DebugDrawList::drain`]) and the producer clears the list before
/// queueing the next frame.
#[derive(Debug)]
pub struct DebugDrawList {
    shapes: Vec<DebugShape>,
    
    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawList {
    /// Create an empty, enabled list
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            enabled: true,
        }
    }
    
    fn push(&mut self, shape: DebugShape) {
        if self.enabled {
            self.shapes.push(shape);
        }
    }
    
    /// Queue a wireframe sphere
    pub fn draw_sphere(&mut self, center: Vec3, radius: f32, color: Vec4) {
        self.push(DebugShape::Sphere {
            center,
            radius,
            color,
            wireframe: true,
        });
    }
    
    /// Queue a wireframe world-aligned box
    pub fn draw_box(&mut self, center: Vec3, extents: Vec3, color: Vec4) {
        self.draw_oriented_box(center, extents, Quat::identity(), color);
    }
    
    /// Queue a wireframe box with its own orientation
    pub fn draw_oriented_box(&mut self, center: Vec3, extents: Vec3, rotation: Quat, color: Vec4) {
        self.push(DebugShape::Box {
            center,
            extents,
            rotation,
            color,
            wireframe: true,
        });
    }
    
    /// Queue a wireframe cube given its full edge length
    pub fn draw_cube(&mut self, center: Vec3, size: f32, color: Vec4) {
        self.draw_box(center, Vec3::repeat(size * 0.5), color);
    }
    
    /// Shapes queued so far
    pub fn shapes(&self) -> &[DebugShape] {
        &self.shapes
    }
    
    /// Take every queued shape, leaving the list empty
    pub fn drain(&mut self) -> Vec<DebugShape> {
        std::mem::take(&mut self.shapes)
    }
    
    /// Get the number of queued shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }
    
    /// Drop every queued shape
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

impl Default for DebugDrawList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_cube_uses_half_edge_extents() {
        let mut list = DebugDrawList::new();
        list.draw_cube(Vec3::new(1.0, 2.0, 3.0), 4.0, palette::green());
        
        match list.shapes() {
            [DebugShape::Box { center, extents, wireframe, .. }] => {
                assert_eq!(*center, Vec3::new(1.0, 2.0, 3.0));
                assert_eq!(*extents, Vec3::new(2.0, 2.0, 2.0));
                assert!(*wireframe);
            }
            other => panic!("unexpected shapes: {other:?}"),
        }
    }
    
    #[test]
    fn test_disabled_list_ignores_shapes() {
        let mut list = DebugDrawList::new();
        list.enabled = false;
        list.draw_sphere(Vec3::zeros(), 1.0, palette::red());
        assert_eq!(list.shape_count(), 0);
    }
    
    #[test]
    fn test_drain_empties_list() {
        let mut list = DebugDrawList::new();
        list.draw_sphere(Vec3::zeros(), 1.0, palette::red());
        list.draw_box(Vec3::zeros(), Vec3::repeat(1.0), palette::white());
        
        let shapes = list.drain();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].color(), palette::red());
        assert_eq!(list.shape_count(), 0);
    }
}
