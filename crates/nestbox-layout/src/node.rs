//! Node records and the flat, id-keyed node collection.
//!
//! The hierarchy is stored as a flat list where each node carries an optional
//! `parent_id`. The parent edge is a lookup relation, never an ownership
//! pointer: children are found by scanning (or indexing) the collection.
//! Derived fields such as [`NodeType`] are recomputed after structural edits
//! rather than trusted.
//!
//! Collection order is significant. It is the order children are handed to
//! the packing strategies and the tie-breaker for render order.

use std::collections::BTreeSet;
use std::fmt;

use nestbox_core::geometry::{Point, Rect, Size};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Current node-set schema version.
pub const NODE_SET_SCHEMA_VERSION: u16 = 1;

/// Stable identifier for diagram nodes.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Lowest valid node ID.
    pub const MIN: Self = Self(1);

    /// Create a new node ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, NodeSetError> {
        if raw == 0 {
            return Err(NodeSetError::ZeroNodeId);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, NodeSetError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(NodeSetError::NodeIdOverflow { current: self });
        };
        Self::new(next)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Hierarchy role, derived from structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// No parent.
    #[default]
    Root,
    /// Has a parent and at least one child.
    Parent,
    /// Has a parent and no children.
    Leaf,
    /// Free-standing text; sticky regardless of structure.
    TextLabel,
}

/// Order in which a packing strategy fills its tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStrategy {
    /// Fill a row left to right before starting the next row.
    #[default]
    FillRowsFirst,
    /// Fill a column top to bottom before starting the next column.
    FillColumnsFirst,
}

/// Per-parent packing hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPreferences {
    pub fill_strategy: FillStrategy,
    /// Cap on children per row (rows-first).
    pub max_columns: Option<u32>,
    /// Cap on children per column (columns-first).
    pub max_rows: Option<u32>,
}

/// One box in the containment hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    #[serde(default)]
    pub node_type: NodeType,
    /// Exempts this node's children from automatic packing.
    #[serde(default)]
    pub is_manual_positioning_enabled: bool,
    /// Freezes this node's own size against auto-fit.
    #[serde(default)]
    pub is_locked_as_is: bool,
    #[serde(default)]
    pub layout_preferences: LayoutPreferences,
    /// Text labels cannot have children and are never pinned.
    #[serde(default)]
    pub is_text_label: bool,
    #[serde(default)]
    pub label: String,
}

impl Node {
    /// A node at `bounds` with default flags.
    ///
    /// The type is provisional until the hierarchy re-derives it.
    #[must_use]
    pub fn new(id: NodeId, parent_id: Option<NodeId>, bounds: Rect) -> Self {
        Self {
            id,
            parent_id,
            x: bounds.x,
            y: bounds.y,
            w: bounds.width,
            h: bounds.height,
            node_type: if parent_id.is_some() {
                NodeType::Leaf
            } else {
                NodeType::Root
            },
            is_manual_positioning_enabled: false,
            is_locked_as_is: false,
            layout_preferences: LayoutPreferences::default(),
            is_text_label: false,
            label: String::new(),
        }
    }

    /// Set the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.x = bounds.x;
        self.y = bounds.y;
        self.w = bounds.width;
        self.h = bounds.height;
    }

    pub fn set_size(&mut self, size: Size) {
        self.w = size.width;
        self.h = size.height;
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    /// True if this node's children are packed automatically.
    #[must_use]
    pub const fn is_automatic(&self) -> bool {
        !self.is_manual_positioning_enabled
    }
}

/// Canonical serialized node-set shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSetSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    pub next_id: NodeId,
    pub nodes: Vec<Node>,
}

fn default_schema_version() -> u16 {
    NODE_SET_SCHEMA_VERSION
}

/// Flat, id-keyed node collection preserving collection order.
///
/// Operations never mutate a `NodeSet` they were given; they clone it and
/// return the edited copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "NodeSetSnapshot", try_from = "NodeSetSnapshot")]
pub struct NodeSet {
    nodes: Vec<Node>,
    index: FxHashMap<NodeId, usize>,
    next_id: NodeId,
}

impl Default for NodeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeSet {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: FxHashMap::default(),
            next_id: NodeId::MIN,
        }
    }

    /// Build a collection from nodes, rejecting only duplicate IDs.
    ///
    /// Structural problems (dangling parents, cycles) are accepted here so
    /// diagnostics can run on damaged graphs; use [`NodeSet::validate`] or
    /// [`NodeSet::from_snapshot`] for strict loading.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Result<Self, NodeSetError> {
        let mut set = Self::new();
        for node in nodes {
            set.insert(node)?;
        }
        Ok(set)
    }

    /// Strictly load a snapshot.
    pub fn from_snapshot(snapshot: NodeSetSnapshot) -> Result<Self, NodeSetError> {
        if snapshot.schema_version != NODE_SET_SCHEMA_VERSION {
            return Err(NodeSetError::UnsupportedSchemaVersion {
                version: snapshot.schema_version,
            });
        }
        let max_existing = snapshot.nodes.iter().map(|node| node.id).max();
        let mut set = Self::from_nodes(snapshot.nodes)?;
        if let Some(max_existing) = max_existing
            && snapshot.next_id <= max_existing
        {
            return Err(NodeSetError::NextIdNotGreaterThanExisting {
                next_id: snapshot.next_id,
                max_existing,
            });
        }
        set.next_id = snapshot.next_id;
        set.validate()?;
        Ok(set)
    }

    /// Canonical snapshot in collection order.
    #[must_use]
    pub fn to_snapshot(&self) -> NodeSetSnapshot {
        NodeSetSnapshot {
            schema_version: NODE_SET_SCHEMA_VERSION,
            next_id: self.next_id,
            nodes: self.nodes.clone(),
        }
    }

    /// Check structural invariants: no self-parenting, no dangling parent,
    /// no cycles.
    pub fn validate(&self) -> Result<(), NodeSetError> {
        for node in &self.nodes {
            let Some(parent_id) = node.parent_id else {
                continue;
            };
            if parent_id == node.id {
                return Err(NodeSetError::SelfParent { node_id: node.id });
            }
            if !self.contains(parent_id) {
                return Err(NodeSetError::MissingParent {
                    node_id: node.id,
                    parent_id,
                });
            }
        }
        for node in &self.nodes {
            let mut seen = BTreeSet::new();
            let mut cursor = Some(node.id);
            while let Some(current) = cursor {
                if !seen.insert(current) {
                    return Err(NodeSetError::CycleDetected { node_id: node.id });
                }
                cursor = self.get(current).and_then(|n| n.parent_id);
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = *self.index.get(&id)?;
        self.nodes.get_mut(slot)
    }

    /// Iterate nodes in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> + '_ {
        self.nodes.iter_mut()
    }

    /// Node IDs in collection order.
    #[must_use]
    pub fn ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|node| node.id).collect()
    }

    /// The ID the next [`NodeSet::allocate_id`] call will return.
    #[must_use]
    pub const fn next_id(&self) -> NodeId {
        self.next_id
    }

    /// Reserve a fresh ID.
    pub fn allocate_id(&mut self) -> Result<NodeId, NodeSetError> {
        let id = self.next_id;
        self.next_id = id.checked_next()?;
        Ok(id)
    }

    /// Append a node at the end of collection order.
    pub fn insert(&mut self, node: Node) -> Result<(), NodeSetError> {
        if self.index.contains_key(&node.id) {
            return Err(NodeSetError::DuplicateNodeId { node_id: node.id });
        }
        if node.id >= self.next_id {
            self.next_id = node.id.checked_next()?;
        }
        let _ = self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Remove every node in `ids`, preserving the order of the rest.
    pub fn remove_all(&mut self, ids: &BTreeSet<NodeId>) -> Vec<Node> {
        if ids.is_empty() {
            return Vec::new();
        }
        let (removed, kept): (Vec<Node>, Vec<Node>) = std::mem::take(&mut self.nodes)
            .into_iter()
            .partition(|node| ids.contains(&node.id));
        self.nodes = kept;
        self.reindex();
        removed
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (slot, node) in self.nodes.iter().enumerate() {
            let _ = self.index.insert(node.id, slot);
        }
    }
}

impl From<NodeSet> for NodeSetSnapshot {
    fn from(set: NodeSet) -> Self {
        Self {
            schema_version: NODE_SET_SCHEMA_VERSION,
            next_id: set.next_id,
            nodes: set.nodes,
        }
    }
}

impl TryFrom<NodeSetSnapshot> for NodeSet {
    type Error = NodeSetError;

    fn try_from(snapshot: NodeSetSnapshot) -> Result<Self, Self::Error> {
        Self::from_snapshot(snapshot)
    }
}

/// Node-collection validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSetError {
    ZeroNodeId,
    NodeIdOverflow {
        current: NodeId,
    },
    UnsupportedSchemaVersion {
        version: u16,
    },
    DuplicateNodeId {
        node_id: NodeId,
    },
    SelfParent {
        node_id: NodeId,
    },
    MissingParent {
        node_id: NodeId,
        parent_id: NodeId,
    },
    CycleDetected {
        node_id: NodeId,
    },
    NextIdNotGreaterThanExisting {
        next_id: NodeId,
        max_existing: NodeId,
    },
}

impl fmt::Display for NodeSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroNodeId => write!(f, "node id 0 is reserved"),
            Self::NodeIdOverflow { current } => write!(f, "node id overflow after {current}"),
            Self::UnsupportedSchemaVersion { version } => write!(
                f,
                "unsupported node set schema version {version} (expected {NODE_SET_SCHEMA_VERSION})"
            ),
            Self::DuplicateNodeId { node_id } => write!(f, "duplicate node id {node_id}"),
            Self::SelfParent { node_id } => write!(f, "node {node_id} is its own parent"),
            Self::MissingParent { node_id, parent_id } => {
                write!(f, "node {node_id} references missing parent {parent_id}")
            }
            Self::CycleDetected { node_id } => write!(f, "cycle detected at node {node_id}"),
            Self::NextIdNotGreaterThanExisting {
                next_id,
                max_existing,
            } => write!(
                f,
                "next_id {next_id} must be greater than max existing id {max_existing}"
            ),
        }
    }
}

impl std::error::Error for NodeSetError {}
