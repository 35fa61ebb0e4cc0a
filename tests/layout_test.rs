//! Tests for the hierarchical layout engine

use std::collections::{BTreeMap, VecDeque};

use generational_arena::Index;
use petgraph::graph::NodeIndex;
use rstest::rstest;

use rxtree::domain::{
    build, project, validate_out_tree, DomainError, EdgeRole, HierarchicalLayout, Layout,
    LayoutEngine, LayoutParams, NotATree, SyntaxGraph,
};

const EPS: f64 = 1e-9;

#[ctor::ctor]
fn init() {
    rxtree::util::testing::init_test_setup();
}

fn layout_of(postfix: &str) -> (SyntaxGraph, Layout) {
    let graph = project(&build(postfix).unwrap());
    let layout = HierarchicalLayout::default().layout(&graph, None).unwrap();
    (graph, layout)
}

/// Depth of every node, counted from the root.
fn depths(graph: &SyntaxGraph) -> BTreeMap<NodeIndex, usize> {
    let mut depths = BTreeMap::new();
    let mut queue = VecDeque::from([(graph.root().unwrap(), 0)]);
    while let Some((node, depth)) = queue.pop_front() {
        depths.insert(node, depth);
        for (_, child) in graph.children(node) {
            queue.push_back((child, depth + 1));
        }
    }
    depths
}

fn dummy_source() -> Index {
    Index::from_raw_parts(0, 0)
}

// ============================================================
// Geometry
// ============================================================

#[rstest]
#[case("a")]
#[case("ab.")]
#[case("a*")]
#[case("ab.c|")]
#[case("ab|*c.d?.")]
fn given_valid_tree_when_laying_out_then_root_alone_at_top_and_y_falls_per_level(
    #[case] postfix: &str,
) {
    let (graph, layout) = layout_of(postfix);
    let root = graph.root().unwrap();
    assert_eq!(layout.len(), graph.node_count());

    let max_y = layout.iter().map(|(_, p)| p.y).fold(f64::MIN, f64::max);
    let at_top: Vec<_> = layout
        .iter()
        .filter(|(_, p)| (p.y - max_y).abs() < EPS)
        .collect();
    assert_eq!(at_top.len(), 1);
    assert_eq!(at_top[0].0, root);

    for (node, depth) in depths(&graph) {
        let y = layout.position(node).unwrap().y;
        assert!((y - (0.0 - 0.2 * depth as f64)).abs() < EPS, "node {:?}", node);
    }
}

#[test]
fn given_parent_with_children_when_laying_out_then_children_are_symmetric_and_evenly_spaced() {
    let (graph, layout) = layout_of("ab.c|");

    for parent in graph.nodes() {
        let children = graph.children(parent);
        if children.len() < 2 {
            continue;
        }
        let px = layout.position(parent).unwrap().x;
        let xs: Vec<f64> = children
            .iter()
            .map(|&(_, c)| layout.position(c).unwrap().x)
            .collect();
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        assert!((mean - px).abs() < EPS);
        let gaps: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(gaps.iter().all(|g| (g - gaps[0]).abs() < EPS && *g > 0.0));
    }
}

#[test]
fn given_nested_binary_tree_when_laying_out_then_width_halves_per_level() {
    let (graph, layout) = layout_of("ab.c|");
    let x = |label: char| {
        let node = graph.nodes().find(|&n| graph.label(n) == Some(label)).unwrap();
        layout.position(node).unwrap().x
    };

    assert!((x('|') - 0.5).abs() < EPS);
    assert!((x('.') - 0.25).abs() < EPS);
    assert!((x('c') - 0.75).abs() < EPS);
    assert!((x('a') - 0.125).abs() < EPS);
    assert!((x('b') - 0.375).abs() < EPS);
}

#[test]
fn given_unary_chain_when_laying_out_then_stays_on_parent_axis() {
    let (_, layout) = layout_of("a**+?");
    for (_, p) in layout.iter() {
        assert!((p.x - 0.5).abs() < EPS);
    }
}

#[test]
fn given_custom_params_when_laying_out_then_uses_origin_and_gap() {
    let graph = project(&build("ab|").unwrap());
    let engine = HierarchicalLayout::new(LayoutParams {
        width: 8.0,
        vertical_gap: 1.5,
        start_y: 10.0,
        center_x: 0.0,
    });
    let layout = engine.layout(&graph, None).unwrap();

    let root = layout.position(NodeIndex::new(0)).unwrap();
    let left = layout.position(NodeIndex::new(1)).unwrap();
    let right = layout.position(NodeIndex::new(2)).unwrap();
    assert!((root.x - 0.0).abs() < EPS && (root.y - 10.0).abs() < EPS);
    assert!((left.x + 2.0).abs() < EPS && (left.y - 8.5).abs() < EPS);
    assert!((right.x - 2.0).abs() < EPS && (right.y - 8.5).abs() < EPS);
}

#[test]
fn given_same_shape_different_symbols_when_laying_out_then_coordinates_match() {
    let (_, first) = layout_of("ab.c|");
    let (_, second) = layout_of("xy|z.");
    let a: Vec<_> = first.iter().map(|(_, p)| (p.x, p.y)).collect();
    let b: Vec<_> = second.iter().map(|(_, p)| (p.x, p.y)).collect();
    assert_eq!(a, b);
}

#[test]
fn given_deep_unary_chain_when_laying_out_then_completes_without_recursion() {
    let postfix = format!("a{}", "*".repeat(100_000));
    let (graph, layout) = layout_of(&postfix);
    assert_eq!(layout.len(), graph.node_count());
    let bounds = layout.bounds().unwrap();
    assert!((bounds.min_y + 0.2 * 100_000.0).abs() < 1e-6);
}

// ============================================================
// Tree validation
// ============================================================

#[test]
fn given_two_parentless_nodes_when_laying_out_then_fails_not_a_tree() {
    let mut graph = SyntaxGraph::new();
    graph.add_node('a', dummy_source());
    graph.add_node('b', dummy_source());

    let err = HierarchicalLayout::default().layout(&graph, None).unwrap_err();
    assert_eq!(
        err,
        DomainError::NotATree(NotATree::MultipleRoots { count: 2 })
    );
}

#[test]
fn given_empty_graph_when_laying_out_then_fails_not_a_tree() {
    let err = HierarchicalLayout::default()
        .layout(&SyntaxGraph::new(), None)
        .unwrap_err();
    assert_eq!(err, DomainError::NotATree(NotATree::Empty));
}

#[test]
fn given_cycle_when_validating_then_rejected() {
    let mut graph = SyntaxGraph::new();
    let a = graph.add_node('a', dummy_source());
    let b = graph.add_node('b', dummy_source());
    graph.add_edge(a, b, EdgeRole::Left);
    graph.add_edge(b, a, EdgeRole::Left);

    assert_eq!(validate_out_tree(&graph, None), Err(NotATree::NoRoot));
}

#[test]
fn given_root_plus_detached_cycle_when_validating_then_reports_cycle() {
    let mut graph = SyntaxGraph::new();
    graph.add_node('r', dummy_source());
    let a = graph.add_node('a', dummy_source());
    let b = graph.add_node('b', dummy_source());
    graph.add_edge(a, b, EdgeRole::Left);
    graph.add_edge(b, a, EdgeRole::Left);

    assert_eq!(validate_out_tree(&graph, None), Err(NotATree::Cycle));
}

#[test]
fn given_shared_child_when_validating_then_reports_multiple_parents() {
    let mut graph = SyntaxGraph::new();
    let root = graph.add_node('.', dummy_source());
    let left = graph.add_node('*', dummy_source());
    let shared = graph.add_node('a', dummy_source());
    graph.add_edge(root, left, EdgeRole::Left);
    graph.add_edge(root, shared, EdgeRole::Right);
    graph.add_edge(left, shared, EdgeRole::Left);

    assert_eq!(
        validate_out_tree(&graph, None),
        Err(NotATree::MultipleParents {
            node: shared.index(),
            parents: 2
        })
    );
}

#[test]
fn given_explicit_root_when_it_is_not_the_root_then_rejected() {
    let graph = project(&build("ab.").unwrap());
    let not_root = NodeIndex::new(1);

    let err = HierarchicalLayout::default()
        .layout(&graph, Some(not_root))
        .unwrap_err();
    assert_eq!(err, DomainError::NotATree(NotATree::InvalidRoot { node: 1 }));
}

#[test]
fn given_explicit_root_when_it_is_the_root_then_same_as_inferred() {
    let graph = project(&build("ab.c|").unwrap());
    let engine = HierarchicalLayout::default();
    assert_eq!(
        engine.layout(&graph, graph.root()).unwrap(),
        engine.layout(&graph, None).unwrap()
    );
}

#[test]
fn given_explicit_root_outside_graph_when_laying_out_then_rejected_as_unknown() {
    let graph = project(&build("ab.").unwrap());
    let outside = NodeIndex::new(99);
    assert!(!graph.contains(outside));

    let err = HierarchicalLayout::default()
        .layout(&graph, Some(outside))
        .unwrap_err();
    assert_eq!(err, DomainError::NotATree(NotATree::UnknownRoot { node: 99 }));
}
