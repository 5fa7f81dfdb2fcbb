#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nestbox_layout::{
    Alignment, Axis, FixedDimensions, LayoutAlgorithmType, LayoutConfig, LayoutEngine, NewNode,
    NodeId, NodeSet, Point, Size, get_children,
};

#[derive(Debug, Arbitrary)]
enum Edit {
    AddRoot { x: i8, y: i8 },
    AddChild { parent: u8, text_label: bool },
    Remove { node: u8 },
    Reparent { node: u8, parent: Option<u8> },
    Manual { node: u8, enabled: bool },
    Locked { node: u8, locked: bool },
    Move { node: u8, dx: i8, dy: i8 },
    Resize { node: u8, w: u8, h: u8 },
    Align { first: u8, second: u8 },
    Distribute { parent: u8 },
    Fit { node: u8 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    flow: bool,
    pinned: bool,
    margin: u8,
    edits: Vec<Edit>,
}

fn resolve(nodes: &NodeSet, raw: u8) -> Option<NodeId> {
    let ids = nodes.ids();
    if ids.is_empty() {
        None
    } else {
        Some(ids[usize::from(raw) % ids.len()])
    }
}

fuzz_target!(|input: Input| {
    let mut config = LayoutConfig {
        algorithm: if input.flow {
            LayoutAlgorithmType::Flow
        } else {
            LayoutAlgorithmType::Grid
        },
        ..LayoutConfig::default()
    };
    config.margins.margin = i32::from(input.margin % 4);
    if input.pinned {
        config.fixed_dimensions = FixedDimensions::both(5, 3);
    }
    let Ok(engine) = LayoutEngine::new(config) else {
        return;
    };

    let mut nodes = NodeSet::new();
    for edit in input.edits.into_iter().take(64) {
        if nodes.len() > 48 {
            break;
        }
        let result = match edit {
            Edit::AddRoot { x, y } => engine
                .add_node(&nodes, NewNode::root(Point::new(x.into(), y.into()), Size::new(20, 12)))
                .map(|(out, _)| out),
            Edit::AddChild { parent, text_label } => {
                let Some(parent) = resolve(&nodes, parent) else { continue };
                let mut new_node = NewNode::child(parent);
                new_node.is_text_label = text_label;
                engine.add_node(&nodes, new_node).map(|(out, _)| out)
            }
            Edit::Remove { node } => {
                let Some(node) = resolve(&nodes, node) else { continue };
                engine.remove_node(&nodes, node)
            }
            Edit::Reparent { node, parent } => {
                let Some(node) = resolve(&nodes, node) else { continue };
                let parent = parent.and_then(|raw| resolve(&nodes, raw));
                let allowed = engine.can_reparent(&nodes, node, parent);
                let result = engine.reparent(&nodes, node, parent);
                assert_eq!(allowed, result.is_ok(), "guard and reparent disagree");
                result
            }
            Edit::Manual { node, enabled } => {
                let Some(node) = resolve(&nodes, node) else { continue };
                engine.set_manual_positioning(&nodes, node, enabled)
            }
            Edit::Locked { node, locked } => {
                let Some(node) = resolve(&nodes, node) else { continue };
                engine.set_locked_as_is(&nodes, node, locked)
            }
            Edit::Move { node, dx, dy } => {
                let Some(node) = resolve(&nodes, node) else { continue };
                engine.move_node(&nodes, node, dx.into(), dy.into())
            }
            Edit::Resize { node, w, h } => {
                let Some(node) = resolve(&nodes, node) else { continue };
                engine.resize_node(&nodes, node, Size::new(w.into(), h.into()))
            }
            Edit::Align { first, second } => {
                let (Some(a), Some(b)) = (resolve(&nodes, first), resolve(&nodes, second)) else {
                    continue;
                };
                engine.align_nodes(&nodes, &[a, b], Alignment::Left)
            }
            Edit::Distribute { parent } => {
                let Some(parent) = resolve(&nodes, parent) else { continue };
                let ids: Vec<NodeId> = get_children(&nodes, parent).iter().map(|n| n.id).collect();
                engine.distribute_nodes(&nodes, &ids, Axis::Horizontal)
            }
            Edit::Fit { node } => {
                let Some(node) = resolve(&nodes, node) else { continue };
                Ok(engine.fit_parent_to_children_recursive(&nodes, node))
            }
        };
        if let Ok(out) = result {
            nodes = out;
        }
    }

    assert!(nodes.validate().is_ok(), "edits produced an invalid collection");
    assert_eq!(
        engine.update_children_layout(&nodes),
        nodes,
        "cascade output is not a fixed point"
    );
});
