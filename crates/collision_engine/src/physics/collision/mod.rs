//! Bounding volumes and the oriented-box overlap test
//!
//! # Module Organization
//!
//! - [`primitives`] - Bounding sphere used as the cheap pre-test
//! - [`sat`] - 15-axis separating axis test between oriented boxes
//! - [`bounding_volume`] - Per-entity volume combining both tests and
//!   recording which entities it currently overlaps

pub mod primitives;
pub mod sat;
pub mod bounding_volume;

// Re-export commonly used types
pub use primitives::BoundingSphere;
pub use sat::{separating_axis_test, Axis, ObbFrame, SeparatingAxis, SAT_EPSILON};
pub use bounding_volume::{BoundingVolume, VolumeVisibility};
