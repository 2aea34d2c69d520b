//! Specialized collection types

pub use slotmap::{Key, SlotMap};

/// Ordered set used for per-volume collision membership
///
/// `BTreeSet` keeps iteration deterministic, which keeps collision
/// reports stable across runs with identical inputs.
pub type OrderedSet<T> = std::collections::BTreeSet<T>;
