//! Hierarchy queries over a flat [`NodeSet`].
//!
//! Every traversal here is cycle-guarded. A well-formed collection is acyclic,
//! but collections loaded with [`NodeSet::from_nodes`] may not be; a detected
//! cycle aborts the affected branch with a warning instead of looping.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::node::{Node, NodeId, NodeSet, NodeType};

/// Depth beyond which [`depth`] stops counting.
pub const MAX_DEPTH: u32 = 10;

/// Direct children of `id`, in collection order.
#[must_use]
pub fn get_children(nodes: &NodeSet, id: NodeId) -> Vec<&Node> {
    nodes
        .iter()
        .filter(|node| node.parent_id == Some(id) && node.id != id)
        .collect()
}

/// True if `id` has no children.
#[must_use]
pub fn is_leaf(nodes: &NodeSet, id: NodeId) -> bool {
    !nodes
        .iter()
        .any(|node| node.parent_id == Some(id) && node.id != id)
}

/// Parent → children map built in one pass, children in collection order.
///
/// Nodes whose parent is missing are treated as roots and do not appear as
/// anyone's child.
#[must_use]
pub fn children_index(nodes: &NodeSet) -> FxHashMap<NodeId, Vec<NodeId>> {
    let mut index: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
    for node in nodes.iter() {
        if let Some(parent_id) = effective_parent(nodes, node) {
            index.entry(parent_id).or_default().push(node.id);
        }
    }
    index
}

/// The node's parent if it exists in the collection and is not the node itself.
#[must_use]
pub fn effective_parent(nodes: &NodeSet, node: &Node) -> Option<NodeId> {
    node.parent_id
        .filter(|&parent_id| parent_id != node.id && nodes.contains(parent_id))
}

/// Every descendant of `id`, depth-first pre-order.
///
/// `id` itself is not included. If the walk reaches a node it has already
/// visited, that branch is abandoned and a warning is logged; the result is
/// then best-effort.
#[must_use]
pub fn get_all_descendants(nodes: &NodeSet, id: NodeId) -> Vec<NodeId> {
    let index = children_index(nodes);
    descendants_with_index(&index, id)
}

pub(crate) fn descendants_with_index(
    index: &FxHashMap<NodeId, Vec<NodeId>>,
    id: NodeId,
) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut visited = FxHashSet::default();
    let _ = visited.insert(id);
    collect_descendants(index, id, &mut visited, &mut out);
    out
}

fn collect_descendants(
    index: &FxHashMap<NodeId, Vec<NodeId>>,
    id: NodeId,
    visited: &mut FxHashSet<NodeId>,
    out: &mut Vec<NodeId>,
) {
    let Some(children) = index.get(&id) else {
        return;
    };
    for &child in children {
        if !visited.insert(child) {
            tracing::warn!(
                parent = %id,
                child = %child,
                "cycle detected while collecting descendants; abandoning branch"
            );
            continue;
        }
        out.push(child);
        collect_descendants(index, child, visited, out);
    }
}

/// Ancestor chain of `id`, nearest parent first.
///
/// Stops at a root, at a dangling parent reference, or on revisiting a node.
#[must_use]
pub fn ancestors(nodes: &NodeSet, id: NodeId) -> Vec<NodeId> {
    let mut chain = Vec::new();
    let mut seen = FxHashSet::default();
    let _ = seen.insert(id);
    let mut cursor = nodes.get(id).and_then(|node| effective_parent(nodes, node));
    while let Some(parent_id) = cursor {
        if !seen.insert(parent_id) {
            tracing::warn!(node = %id, at = %parent_id, "cycle detected in ancestor chain");
            break;
        }
        chain.push(parent_id);
        cursor = nodes
            .get(parent_id)
            .and_then(|node| effective_parent(nodes, node));
    }
    chain
}

/// True if `candidate` sits somewhere below `ancestor`.
#[must_use]
pub fn is_descendant_of(nodes: &NodeSet, candidate: NodeId, ancestor: NodeId) -> bool {
    candidate != ancestor && ancestors(nodes, candidate).contains(&ancestor)
}

/// Parent hops from `id` up to a root, capped at [`MAX_DEPTH`].
#[must_use]
pub fn depth(nodes: &NodeSet, id: NodeId) -> u32 {
    let mut hops = 0;
    let mut cursor = nodes.get(id).and_then(|node| effective_parent(nodes, node));
    while let Some(parent_id) = cursor {
        if hops >= MAX_DEPTH {
            break;
        }
        hops += 1;
        cursor = nodes
            .get(parent_id)
            .and_then(|node| effective_parent(nodes, node));
    }
    hops
}

/// Role implied by structure. Text labels stay text labels.
#[must_use]
pub const fn derive_node_type(
    has_parent: bool,
    has_children: bool,
    is_text_label: bool,
) -> NodeType {
    if is_text_label {
        NodeType::TextLabel
    } else if !has_parent {
        NodeType::Root
    } else if has_children {
        NodeType::Parent
    } else {
        NodeType::Leaf
    }
}

/// Re-derive `node_type` for every node from current structure.
pub fn derive_node_types(nodes: &mut NodeSet) {
    let index = children_index(nodes);
    let derived: Vec<(NodeId, NodeType)> = nodes
        .iter()
        .map(|node| {
            let has_parent = effective_parent(nodes, node).is_some();
            let has_children = index.get(&node.id).is_some_and(|c| !c.is_empty());
            (
                node.id,
                derive_node_type(has_parent, has_children, node.is_text_label),
            )
        })
        .collect();
    for (id, node_type) in derived {
        if let Some(node) = nodes.get_mut(id) {
            node.node_type = node_type;
        }
    }
}

/// Roots-to-leaves visiting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologicalOrder {
    /// Every node reachable from a root, each after its parent (breadth-first).
    pub order: Vec<NodeId>,
    /// Nodes not reachable from any root: members of cycles and their subtrees.
    pub unreachable: Vec<NodeId>,
}

/// Breadth-first order from every root, siblings in collection order.
#[must_use]
pub fn topological_order(nodes: &NodeSet) -> TopologicalOrder {
    let index = children_index(nodes);
    let mut order = Vec::with_capacity(nodes.len());
    let mut visited = FxHashSet::default();
    let mut queue: VecDeque<NodeId> = nodes
        .iter()
        .filter(|node| effective_parent(nodes, node).is_none())
        .map(|node| node.id)
        .collect();

    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        order.push(id);
        if let Some(children) = index.get(&id) {
            queue.extend(children.iter().copied());
        }
    }

    let unreachable: Vec<NodeId> = nodes
        .iter()
        .map(|node| node.id)
        .filter(|id| !visited.contains(id))
        .collect();
    if !unreachable.is_empty() {
        tracing::warn!(
            count = unreachable.len(),
            "nodes unreachable from any root (parent cycle)"
        );
    }

    TopologicalOrder { order, unreachable }
}
