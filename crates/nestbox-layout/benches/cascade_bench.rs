//! Benchmarks for the cascading re-layout and edit operations.
//!
//! Run with: cargo bench -p nestbox-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use nestbox_layout::{
    FixedDimensions, LayoutAlgorithmType, LayoutConfig, LayoutEngine, NewNode, Node, NodeId,
    NodeSet, Point, Rect, Size,
};
use std::hint::black_box;

fn engine(algorithm: LayoutAlgorithmType) -> LayoutEngine {
    let mut config = LayoutConfig {
        algorithm,
        ..LayoutConfig::default()
    };
    config.fixed_dimensions = FixedDimensions::both(6, 4);
    LayoutEngine::new(config).expect("valid config")
}

/// A tree `depth` levels deep where every parent has `fanout` children.
/// All nodes start at the origin with size 1x1, so the cascade does all the work.
fn make_tree(depth: u32, fanout: usize) -> NodeSet {
    let mut nodes = vec![Node::new(NodeId::MIN, None, Rect::new(0, 0, 1, 1))];
    let mut frontier = vec![NodeId::MIN];
    let mut next = 2u64;
    for _ in 0..depth {
        let mut level = Vec::with_capacity(frontier.len() * fanout);
        for &parent in &frontier {
            for _ in 0..fanout {
                let id = NodeId::new(next).expect("non-zero");
                next += 1;
                nodes.push(Node::new(id, Some(parent), Rect::new(0, 0, 1, 1)));
                level.push(id);
            }
        }
        frontier = level;
    }
    NodeSet::from_nodes(nodes).expect("valid tree")
}

fn bench_cascade_cold(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/cascade_cold");
    for kind in [LayoutAlgorithmType::Grid, LayoutAlgorithmType::Flow] {
        let engine = engine(kind);
        for (depth, fanout) in [(2, 4), (3, 4), (3, 8), (4, 5)] {
            let tree = make_tree(depth, fanout);
            let id = BenchmarkId::new(kind.as_str(), format!("d{depth}_f{fanout}_n{}", tree.len()));
            group.bench_with_input(id, &tree, |b, tree| {
                b.iter(|| black_box(engine.update_children_layout(tree)))
            });
        }
    }
    group.finish();
}

fn bench_cascade_settled(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/cascade_settled");
    let engine = engine(LayoutAlgorithmType::Grid);
    for (depth, fanout) in [(3, 4), (4, 5)] {
        let settled = engine.update_children_layout(&make_tree(depth, fanout));
        group.bench_with_input(
            BenchmarkId::from_parameter(settled.len()),
            &settled,
            |b, tree| b.iter(|| black_box(engine.update_children_layout(tree))),
        );
    }
    group.finish();
}

fn bench_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/edits");
    let engine = engine(LayoutAlgorithmType::Grid);
    let settled = engine.update_children_layout(&make_tree(3, 5));
    let leaf = settled.ids().last().copied().expect("tree is non-empty");
    let target = NodeId::new(2).expect("non-zero");

    group.bench_function("add_child", |b| {
        b.iter_batched(
            || settled.clone(),
            |nodes| black_box(engine.add_node(&nodes, NewNode::child(target))),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("reparent_leaf", |b| {
        b.iter(|| black_box(engine.reparent(&settled, leaf, Some(target))))
    });
    group.bench_function("fit_recursive", |b| {
        b.iter(|| black_box(engine.fit_parent_to_children_recursive(&settled, target)))
    });

    let mut manual = settled.clone();
    if let Some(node) = manual.get_mut(NodeId::MIN) {
        node.is_manual_positioning_enabled = true;
    }
    group.bench_function("add_to_manual_parent", |b| {
        b.iter(|| {
            black_box(engine.add_node(
                &manual,
                NewNode::child(NodeId::MIN).with_size(Size::new(5, 5)),
            ))
        })
    });
    group.bench_function("add_root", |b| {
        b.iter(|| black_box(engine.add_node(&settled, NewNode::root(Point::ZERO, Size::new(8, 8)))))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_cascade_cold,
    bench_cascade_settled,
    bench_edits
);
criterion_main!(benches);
