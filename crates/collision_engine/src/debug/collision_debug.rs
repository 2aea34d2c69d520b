//! Collision-specific debug visualization
//!
//! Based on Game Engine Architecture 3rd Edition, Section 10.2:
//! "Debug drawing for collision detection typically includes visualizations
//! of bounding volumes, collision shapes, and query results."

use crate::debug::draw::{palette, DebugDrawList, DebugShape};
use crate::ecs::EntityManager;
use crate::foundation::math::Vec4;
use crate::spatial::{OctantId, Octree};

/// Color scheme for octree visualization
///
/// Volume colours live on each [`BoundingVolume`](crate::physics::BoundingVolume).
#[derive(Clone, Debug)]
pub struct CollisionDebugColors {
    /// Color for every octant in [`OctreeDisplayMode::All`]
    pub octant: Vec4,
    
    /// Color for non-empty leaves in [`OctreeDisplayMode::Leaves`]
    pub leaf: Vec4,
    
    /// Color for the octant picked by [`OctreeDisplayMode::Single`]
    pub selected: Vec4,
}

impl Default for CollisionDebugColors {
    fn default() -> Self {
        Self {
            octant: palette::light_blue(),
            leaf: palette::green(),
            selected: palette::yellow(),
        }
    }
}

/// Which octants are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OctreeDisplayMode {
    /// No octants
    #[default]
    Hidden,
    /// Every node, internal ones included
    All,
    /// Leaves holding at least one entity
    Leaves,
    /// A single node by id
    Single(OctantId),
}

/// Collision-specific debug visualizer
/// 
/// Each call to [`CollisionDebugVisualizer::draw_frame`] replaces the
/// previous frame's shapes with:
/// - every entity's bounding volume, coloured by whether it collides
/// - the octants selected by the display mode
#[derive(Debug)]
pub struct CollisionDebugVisualizer {
    list: DebugDrawList,
    colors: CollisionDebugColors,
    enabled: bool,
    
    /// Octants to draw
    pub octree_mode: OctreeDisplayMode,
    
    /// Draw entity volumes
    pub show_volumes: bool,
}

impl CollisionDebugVisualizer {
    /// Create a new collision debug visualizer
    pub fn new() -> Self {
        Self {
            list: DebugDrawList::new(),
            colors: CollisionDebugColors::default(),
            enabled: true,
            octree_mode: OctreeDisplayMode::default(),
            show_volumes: true,
        }
    }
    
    /// Set custom color scheme
    pub fn with_colors(mut self, colors: CollisionDebugColors) -> Self {
        self.colors = colors;
        self
    }
    
    /// Enable or disable all collision drawing
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.list.clear();
        }
    }
    
    /// Check whether collision drawing is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
    
    /// Rebuild the shape list for the current frame
    pub fn draw_frame(&mut self, world: &EntityManager, octree: &Octree) -> &[DebugShape] {
        self.list.clear();
        if !self.enabled {
            return self.list.shapes();
        }
        
        if self.show_volumes {
            for entity in world.iter() {
                entity.volume().add_to_render_list(&mut self.list);
            }
        }
        
        match self.octree_mode {
            OctreeDisplayMode::Hidden => {}
            OctreeDisplayMode::All => octree.display_all(self.colors.octant, &mut self.list),
            OctreeDisplayMode::Leaves => octree.display_leaves(self.colors.leaf, &mut self.list),
            OctreeDisplayMode::Single(id) => {
                octree.display_octant(id, self.colors.selected, &mut self.list);
            }
        }
        
        self.list.shapes()
    }
    
    /// Shapes from the last [`Self::draw_frame`]
    pub fn shapes(&self) -> &[DebugShape] {
        self.list.shapes()
    }
    
    /// Hand the last frame's shapes to a renderer
    pub fn take_shapes(&mut self) -> Vec<DebugShape> {
        self.list.drain()
    }
}

impl Default for CollisionDebugVisualizer {
    fn default() -> Self {
        Self::new()
    }
}
