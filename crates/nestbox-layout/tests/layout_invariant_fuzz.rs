//! Property/fuzz-style invariants for the layout engine.
//!
//! Random edit streams are driven through the public engine API; after every
//! edit the collection must be a settled layout: re-running the cascade is a
//! no-op, automatic parents contain their children with margin-separated
//! gaps, and packing into the computed minimum never spills.

use nestbox_layout::{
    FillStrategy, FixedDimensions, LayoutAlgorithmType, LayoutConfig, LayoutEngine,
    LayoutPreferences, NewNode, Node, NodeId, NodeSet, Point, Rect, Size, calculate_child_layout,
    get_all_descendants, get_children, hierarchy::is_descendant_of,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn next_i32_range(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        let span = (i64::from(max) - i64::from(min) + 1) as u64;
        min + (self.next_u64() % span) as i32
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    fn choose_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 0
    }
}

fn engine(algorithm: LayoutAlgorithmType, pinned: bool) -> LayoutEngine {
    let mut config = LayoutConfig {
        algorithm,
        ..LayoutConfig::default()
    };
    config.margins.margin = 2;
    config.margins.label_margin = 3;
    if pinned {
        config.fixed_dimensions = FixedDimensions::both(6, 4);
    }
    LayoutEngine::new(config).expect("valid config")
}

fn pick(rng: &mut Lcg, nodes: &NodeSet) -> Option<NodeId> {
    let ids = nodes.ids();
    if ids.is_empty() {
        None
    } else {
        Some(ids[rng.choose_index(ids.len())])
    }
}

fn random_preferences(rng: &mut Lcg) -> LayoutPreferences {
    let cap = |rng: &mut Lcg| rng.choose_bool().then(|| rng.next_i32_range(1, 4) as u32);
    LayoutPreferences {
        fill_strategy: if rng.choose_bool() {
            FillStrategy::FillRowsFirst
        } else {
            FillStrategy::FillColumnsFirst
        },
        max_columns: cap(rng),
        max_rows: cap(rng),
    }
}

/// Apply one random edit. Returns a short description for replay logs.
fn step(engine: &LayoutEngine, nodes: &NodeSet, rng: &mut Lcg) -> (NodeSet, String) {
    let Some(target) = pick(rng, nodes) else {
        let (out, id) = engine
            .add_node(nodes, NewNode::root(Point::ZERO, Size::new(30, 20)))
            .expect("adding a root never fails");
        return (out, format!("add_root {id}"));
    };

    match rng.choose_index(10) {
        0..=2 => {
            let is_label = nodes.get(target).is_some_and(|n| n.is_text_label);
            let mut new_node = NewNode::child(target).with_label("n");
            if rng.choose_index(5) == 0 {
                new_node = new_node.text_label();
            }
            let result = engine.add_node(nodes, new_node);
            if is_label {
                assert!(result.is_err(), "text label {target} accepted a child");
                (nodes.clone(), format!("add_child {target} refused"))
            } else {
                let (out, id) = result.expect("adding under an existing node succeeds");
                (out, format!("add_child {id} under {target}"))
            }
        }
        3 => {
            let out = engine.remove_node(nodes, target).expect("target exists");
            (out, format!("remove {target}"))
        }
        4 => {
            let new_parent = if rng.choose_index(4) == 0 { None } else { pick(rng, nodes) };
            let allowed = engine.can_reparent(nodes, target, new_parent);
            let expected = new_parent.is_none_or(|p| {
                p != target
                    && !is_descendant_of(nodes, p, target)
                    && nodes.get(p).is_some_and(|n| !n.is_text_label)
            });
            assert_eq!(allowed, expected, "guard disagrees for {target} -> {new_parent:?}");
            match engine.reparent(nodes, target, new_parent) {
                Ok(out) => (out, format!("reparent {target} -> {new_parent:?}")),
                Err(err) => {
                    assert!(!allowed, "reparent failed although allowed: {err}");
                    (nodes.clone(), format!("reparent {target} refused"))
                }
            }
        }
        5 => {
            let enabled = nodes.get(target).is_some_and(|n| !n.is_manual_positioning_enabled);
            let out = engine
                .set_manual_positioning(nodes, target, enabled)
                .expect("target exists");
            (out, format!("manual {target} {enabled}"))
        }
        6 => {
            let locked = rng.choose_index(4) == 0;
            let out = engine.set_locked_as_is(nodes, target, locked).expect("target exists");
            (out, format!("locked {target} {locked}"))
        }
        7 => {
            let (dx, dy) = (rng.next_i32_range(-8, 8), rng.next_i32_range(-8, 8));
            let out = engine.move_node(nodes, target, dx, dy).expect("target exists");
            (out, format!("move {target} {dx},{dy}"))
        }
        8 => {
            let size = Size::new(rng.next_i32_range(1, 30), rng.next_i32_range(1, 20));
            let out = engine.resize_node(nodes, target, size).expect("target exists");
            (out, format!("resize {target} {size:?}"))
        }
        _ => {
            let preferences = random_preferences(rng);
            let out = engine
                .set_layout_preferences(nodes, target, preferences)
                .expect("target exists");
            (out, format!("preferences {target}"))
        }
    }
}

fn run_sequence(engine: &LayoutEngine, seed: u64, steps: usize) -> (NodeSet, Vec<String>) {
    let mut rng = Lcg::new(seed);
    let mut nodes = NodeSet::new();
    let mut log = Vec::with_capacity(steps);
    for _ in 0..steps {
        // Keep the collection small enough for the quadratic checks.
        let (next, entry) = if nodes.len() > 24 {
            let target = pick(&mut rng, &nodes).expect("non-empty");
            let out = engine.remove_node(&nodes, target).expect("target exists");
            (out, format!("trim {target}"))
        } else {
            step(engine, &nodes, &mut rng)
        };
        assert_layout_invariants(engine, &next, &entry);
        nodes = next;
        log.push(entry);
    }
    (nodes, log)
}

fn is_settled_parent(node: &Node) -> bool {
    node.is_automatic() && !node.is_locked_as_is
}

fn assert_layout_invariants(engine: &LayoutEngine, nodes: &NodeSet, context: &str) {
    assert!(nodes.validate().is_ok(), "{context}: collection invalid");
    assert_eq!(
        &engine.update_children_layout(nodes),
        nodes,
        "{context}: cascade is not idempotent"
    );

    let insets = engine.config().margins.insets();
    let margin = engine.config().margins.margin;
    for parent in nodes.iter().filter(|node| is_settled_parent(node)) {
        let children = get_children(nodes, parent.id);
        if children.is_empty() {
            continue;
        }
        let interior = parent.bounds().inner(insets);
        for (i, a) in children.iter().enumerate() {
            assert!(
                interior.contains_rect(&a.bounds()),
                "{context}: {} escapes parent {}",
                a.id,
                parent.id
            );
            for b in &children[i + 1..] {
                assert!(
                    !a.bounds().expand(margin).intersects(&b.bounds()),
                    "{context}: {} and {} closer than the margin",
                    a.id,
                    b.id
                );
            }
        }

        let min = engine
            .minimum_parent_size(nodes, parent.id)
            .expect("parent exists");
        let mut smallest = parent.clone();
        smallest.set_size(min);
        let min_interior = smallest.bounds().inner(insets);
        for placement in calculate_child_layout(&smallest, &children, engine.context()) {
            assert!(
                min_interior.contains_rect(&placement.bounds),
                "{context}: packing {} into the minimum of {} spills",
                placement.id,
                parent.id
            );
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn grid_edit_streams_preserve_invariants(
        seed in any::<u64>(),
        steps in 10usize..60,
        pinned in any::<bool>(),
    ) {
        let engine = engine(LayoutAlgorithmType::Grid, pinned);
        let _ = run_sequence(&engine, seed, steps);
    }

    #[test]
    fn flow_edit_streams_preserve_invariants(
        seed in any::<u64>(),
        steps in 10usize..60,
        pinned in any::<bool>(),
    ) {
        let engine = engine(LayoutAlgorithmType::Flow, pinned);
        let _ = run_sequence(&engine, seed, steps);
    }

    #[test]
    fn edit_streams_replay_deterministically(
        seed in any::<u64>(),
        steps in 10usize..40,
    ) {
        let engine = engine(LayoutAlgorithmType::Grid, true);
        let first = run_sequence(&engine, seed, steps);
        let second = run_sequence(&engine, seed, steps);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn packing_into_minimum_never_spills(
        sizes in proptest::collection::vec((1i32..20, 1i32..20), 1..16),
        columns_first in any::<bool>(),
        cap in proptest::option::of(1u32..5),
    ) {
        let preferences = LayoutPreferences {
            fill_strategy: if columns_first {
                FillStrategy::FillColumnsFirst
            } else {
                FillStrategy::FillRowsFirst
            },
            max_columns: cap,
            max_rows: cap,
        };
        for kind in [LayoutAlgorithmType::Grid, LayoutAlgorithmType::Flow] {
            let engine = engine(kind, false);
            let mut nodes = vec![Node::new(NodeId::MIN, None, Rect::new(0, 0, 1, 1))];
            nodes[0].layout_preferences = preferences;
            for (offset, (w, h)) in sizes.iter().enumerate() {
                let id = NodeId::new(offset as u64 + 2).expect("non-zero");
                nodes.push(Node::new(id, Some(NodeId::MIN), Rect::new(0, 0, *w, *h)));
            }
            let nodes = NodeSet::from_nodes(nodes).expect("valid nodes");
            let nodes = engine.update_children_layout(&nodes);
            assert_layout_invariants(&engine, &nodes, "packing");
        }
    }
}

#[test]
fn cyclic_collections_terminate() {
    let id = |raw| NodeId::new(raw).expect("non-zero");
    let nodes = NodeSet::from_nodes(vec![
        Node::new(id(1), Some(id(3)), Rect::new(0, 0, 10, 10)),
        Node::new(id(2), Some(id(1)), Rect::new(0, 0, 10, 10)),
        Node::new(id(3), Some(id(2)), Rect::new(0, 0, 10, 10)),
        Node::new(id(4), None, Rect::new(0, 0, 30, 30)),
        Node::new(id(5), Some(id(4)), Rect::new(0, 0, 3, 3)),
    ])
    .expect("duplicates are the only hard error");

    let descendants = get_all_descendants(&nodes, id(1));
    assert_eq!(descendants, vec![id(2), id(3)]);

    let engine = engine(LayoutAlgorithmType::Grid, false);
    let (out, stats) = engine.update_children_layout_with_stats(&nodes);
    assert_eq!(stats.unreachable, 3);
    for raw in 1..=3 {
        assert_eq!(
            out.get(id(raw)).map(Node::bounds),
            nodes.get(id(raw)).map(Node::bounds),
            "node {raw} on the cycle was moved"
        );
    }
    assert!(!engine.can_reparent(&nodes, id(4), Some(id(4))));
}
