//! Debug module for visualization and debugging tools
//! 
//! Based on Game Engine Architecture 3rd Edition, Chapter 10.2:
//! "Debug Drawing Facilities"
//!
//! Nothing here draws. Shapes are queued as plain descriptors and a
//! renderer drains them once per frame.

pub mod draw;
pub mod collision_debug;

pub use draw::{palette, DebugShape, DebugDrawList};
pub use collision_debug::{CollisionDebugColors, CollisionDebugVisualizer, OctreeDisplayMode};
