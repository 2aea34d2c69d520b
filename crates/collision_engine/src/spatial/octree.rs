//! Octree spatial partitioning structure
//!
//! Divides a cubic region into 8 equal octants whenever a node overlaps
//! more entities than the configured ideal count, up to a maximum level.
//! Nodes live in an arena and refer to each other by [`OctantId`]; the
//! whole tree is discarded and rebuilt from scratch on every build.
//!
//! Entities are referenced by their index in the slice handed to
//! [`Octree::build`]. An entity straddling an octant boundary is assigned
//! to every leaf it overlaps.

use log::debug;

use crate::core::config::OctreeConfig;
use crate::debug::draw::DebugDrawList;
use crate::foundation::math::{Vec3, Vec4};

use super::{Bounded, AABB};

/// Index of a node inside its tree's arena
///
/// Ids are handed out in creation order, starting with the root at 0.
pub type OctantId = usize;

/// Id of the root node of every tree
pub const ROOT_OCTANT: OctantId = 0;

// Child layout (x, y, z signs):
// 0: low-left-back    4: top-left-front
// 1: low-right-back   5: top-left-back
// 2: low-right-front  6: top-right-back
// 3: low-left-front   7: top-right-front
const CHILD_SIGNS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
];

/// Build state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OctantState {
    /// The tree has not been built since creation or reconfiguration
    Unbuilt,
    /// Terminal node with no children
    Leaf,
    /// Node with exactly 8 children
    Internal,
}

/// Single cubic node in the octree
///
/// Octants are owned by their tree and are deliberately not `Clone`:
/// child links are arena indices that only mean something inside the
/// tree that created them.
#[derive(Debug)]
pub struct Octant {
    id: OctantId,
    center: Vec3,
    size: f32,
    level: u32,
    parent: Option<OctantId>,
    root: OctantId,
    children: Option<[OctantId; 8]>,
    entities: Vec<usize>,
}

impl Octant {
    fn new(id: OctantId, center: Vec3, size: f32, level: u32, parent: Option<OctantId>) -> Self {
        Self {
            id,
            center,
            size,
            level,
            parent,
            root: ROOT_OCTANT,
            children: None,
            entities: Vec::new(),
        }
    }

    /// Id of this node within its tree
    pub fn id(&self) -> OctantId {
        self.id
    }

    /// World-space center of the cube
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Edge length of the cube
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.center - Vec3::repeat(self.size * 0.5)
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.center + Vec3::repeat(self.size * 0.5)
    }

    /// Cube as an axis-aligned box
    pub fn bounds(&self) -> AABB {
        AABB::from_center_extents(self.center, Vec3::repeat(self.size * 0.5))
    }

    /// Depth in the tree (0 = root)
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<OctantId> {
        self.parent
    }

    /// Root node of the tree this octant belongs to
    pub fn root(&self) -> OctantId {
        self.root
    }

    /// The 8 children in corner order, `None` for a leaf
    pub fn children(&self) -> Option<&[OctantId; 8]> {
        self.children.as_ref()
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Indices of the entities assigned to this node (leaves only)
    pub fn entities(&self) -> &[usize] {
        &self.entities
    }
}

/// Octree spatial partitioning structure
#[derive(Debug)]
pub struct Octree {
    config: OctreeConfig,
    octants: Vec<Octant>,
    volumes: Vec<AABB>,
    leaves: Vec<OctantId>,
    built: bool,
}

impl Octree {
    /// Create an unbuilt tree with a degenerate root at the origin
    pub fn new(config: OctreeConfig) -> Self {
        Self {
            config,
            octants: vec![Octant::new(ROOT_OCTANT, Vec3::zeros(), 0.0, 0, None)],
            volumes: Vec::new(),
            leaves: Vec::new(),
            built: false,
        }
    }

    /// Configuration used by the next build
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Replace the configuration; the tree must be built again
    pub fn set_config(&mut self, config: OctreeConfig) {
        if config != self.config {
            self.config = config;
            self.built = false;
        }
    }

    /// Whether the tree reflects its current configuration
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Build the tree over the global boxes of `entities`
    ///
    /// The root becomes the cube around the union of every entity box, with
    /// an edge of twice the largest half-extent. An empty slice yields a
    /// single empty leaf at the origin.
    pub fn build<B: Bounded>(&mut self, entities: &[B]) {
        self.volumes = entities.iter().map(Bounded::global_aabb).collect();

        let cube = AABB::union_all(self.volumes.iter().copied()).enclosing_cube();
        self.octants.clear();
        self.octants.push(Octant::new(
            ROOT_OCTANT,
            cube.center(),
            cube.size().x,
            0,
            None,
        ));

        self.construct_tree();
    }

    /// Rebuild every node below the root over the stored entity boxes
    pub fn construct_tree(&mut self) {
        self.octants.truncate(1);
        let root = &mut self.octants[ROOT_OCTANT];
        root.children = None;
        root.entities.clear();
        self.leaves.clear();

        if self.contains_more_than(ROOT_OCTANT, self.config.ideal_entity_count) {
            self.subdivide(ROOT_OCTANT);
        }
        self.assign_entities(ROOT_OCTANT);
        self.collect_leaves(ROOT_OCTANT);
        self.built = true;

        debug!(
            "Octree rebuilt: {} entities, {} octants, {} non-empty leaves, depth {}",
            self.volumes.len(),
            self.octants.len(),
            self.leaves.len(),
            self.max_depth()
        );
    }

    fn subdivide(&mut self, id: OctantId) {
        let (center, size, level) = match self.octants.get(id) {
            Some(octant) if octant.is_leaf() && octant.level < self.config.max_level => {
                (octant.center, octant.size, octant.level)
            }
            _ => return,
        };

        let quarter = size * 0.25;
        let children = CHILD_SIGNS.map(|[x, y, z]| {
            let child_id = self.octants.len();
            let child_center = center + Vec3::new(x, y, z) * quarter;
            self.octants.push(Octant::new(child_id, child_center, size * 0.5, level + 1, Some(id)));
            child_id
        });
        self.octants[id].children = Some(children);

        for child in children {
            if self.contains_more_than(child, self.config.ideal_entity_count) {
                self.subdivide(child);
            }
        }
    }

    fn assign_entities(&mut self, id: OctantId) {
        if let Some(children) = self.octants[id].children {
            for child in children {
                self.assign_entities(child);
            }
            return;
        }

        let inside: Vec<usize> = (0..self.volumes.len())
            .filter(|&index| self.contains(id, index))
            .collect();
        self.octants[id].entities = inside;
    }

    fn collect_leaves(&mut self, id: OctantId) {
        if let Some(children) = self.octants[id].children {
            for child in children {
                self.collect_leaves(child);
            }
        } else if !self.octants[id].entities.is_empty() {
            self.leaves.push(id);
        }
    }

    /// Whether entity `index` overlaps node `id`
    ///
    /// Axis-aligned interval test against the entity's global box; an
    /// unknown node or entity index is never contained.
    pub fn contains(&self, id: OctantId, index: usize) -> bool {
        match (self.octants.get(id), self.volumes.get(index)) {
            (Some(octant), Some(volume)) => octant.bounds().intersects(volume),
            _ => false,
        }
    }

    /// Whether node `id` overlaps strictly more than `count` entities
    pub fn contains_more_than(&self, id: OctantId, count: usize) -> bool {
        (0..self.volumes.len())
            .filter(|&index| self.contains(id, index))
            .nth(count)
            .is_some()
    }

    /// The root node
    pub fn root(&self) -> &Octant {
        &self.octants[ROOT_OCTANT]
    }

    /// Node by id
    pub fn octant(&self, id: OctantId) -> Option<&Octant> {
        self.octants.get(id)
    }

    /// Every node in id order
    pub fn octants(&self) -> impl Iterator<Item = &Octant> {
        self.octants.iter()
    }

    /// Total number of nodes, root included
    pub fn octant_count(&self) -> usize {
        self.octants.len()
    }

    /// Child slot `index` (0..8) of node `id`
    pub fn child(&self, id: OctantId, index: usize) -> Option<OctantId> {
        self.octant(id)?.children?.get(index).copied()
    }

    /// Parent of node `id`
    pub fn parent(&self, id: OctantId) -> Option<OctantId> {
        self.octant(id)?.parent
    }

    /// Whether node `id` exists and has no children
    pub fn is_leaf(&self, id: OctantId) -> bool {
        self.octant(id).is_some_and(Octant::is_leaf)
    }

    /// Build state of node `id`
    pub fn state(&self, id: OctantId) -> Option<OctantState> {
        let octant = self.octant(id)?;
        Some(if !self.built {
            OctantState::Unbuilt
        } else if octant.is_leaf() {
            OctantState::Leaf
        } else {
            OctantState::Internal
        })
    }

    /// Leaves holding at least one entity, in depth-first order
    pub fn leaves(&self) -> &[OctantId] {
        &self.leaves
    }

    /// Entity indices assigned to node `id` (empty for internal or unknown nodes)
    pub fn entities_in(&self, id: OctantId) -> &[usize] {
        self.octant(id).map(Octant::entities).unwrap_or_default()
    }

    /// Number of entities the tree was built over
    pub fn entity_count(&self) -> usize {
        self.volumes.len()
    }

    /// Deepest level reached by any node
    pub fn max_depth(&self) -> u32 {
        self.octants.iter().map(Octant::level).max().unwrap_or(0)
    }

    /// Queue a wireframe cube for node `id` only
    pub fn display_octant(&self, id: OctantId, color: Vec4, list: &mut DebugDrawList) {
        if let Some(octant) = self.octant(id) {
            list.draw_cube(octant.center, octant.size, color);
        }
    }

    /// Queue a wireframe cube for every node
    pub fn display_all(&self, color: Vec4, list: &mut DebugDrawList) {
        self.display_subtree(ROOT_OCTANT, color, list);
    }

    fn display_subtree(&self, id: OctantId, color: Vec4, list: &mut DebugDrawList) {
        self.display_octant(id, color, list);
        if let Some(children) = self.octant(id).and_then(Octant::children) {
            for &child in children {
                self.display_subtree(child, color, list);
            }
        }
    }

    /// Queue a wireframe cube for every leaf holding entities
    pub fn display_leaves(&self, color: Vec4, list: &mut DebugDrawList) {
        for &leaf in &self.leaves {
            self.display_octant(leaf, color, list);
        }
    }
}

impl Default for Octree {
    fn default() -> Self {
        Self::new(OctreeConfig::default())
    }
}
