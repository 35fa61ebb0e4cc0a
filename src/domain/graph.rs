//! Projection of a syntax tree into a labelled directed graph.

use std::fmt;

use generational_arena::Index;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::{debug, instrument};

use crate::domain::arena::{EdgeRole, SyntaxTree};

/// Graph node: the symbol of one syntax node plus the arena handle it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphNode {
    pub label: char,
    pub source: Index,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Directed graph view of a syntax tree, edges pointing parent -> child.
///
/// Node identity is the petgraph `NodeIndex`. Identities are unique per
/// projection; because projection is a fixed pre-order walk, projecting
/// the same tree twice assigns the same indices, but callers should not
/// rely on that.
#[derive(Debug, Clone, Default)]
pub struct SyntaxGraph {
    graph: DiGraph<GraphNode, EdgeRole>,
}

impl SyntaxGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
        }
    }

    pub fn add_node(&mut self, label: char, source: Index) -> NodeIndex {
        self.graph.add_node(GraphNode { label, source })
    }

    pub fn add_edge(&mut self, parent: NodeIndex, child: NodeIndex, role: EdgeRole) {
        self.graph.add_edge(parent, child, role);
    }

    pub fn inner(&self) -> &DiGraph<GraphNode, EdgeRole> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.graph.node_weight(node).is_some()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn label(&self, node: NodeIndex) -> Option<char> {
        self.graph.node_weight(node).map(|n| n.label)
    }

    pub fn source(&self, node: NodeIndex) -> Option<Index> {
        self.graph.node_weight(node).map(|n| n.source)
    }

    pub fn in_degree(&self, node: NodeIndex) -> usize {
        self.graph.edges_directed(node, Direction::Incoming).count()
    }

    /// Nodes with no incoming edge.
    pub fn roots(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&n| self.in_degree(n) == 0)
            .collect()
    }

    /// The unique parentless node, if exactly one exists.
    pub fn root(&self) -> Option<NodeIndex> {
        match self.roots().as_slice() {
            [root] => Some(*root),
            _ => None,
        }
    }

    /// Successors in edge insertion order (left before right).
    ///
    /// petgraph walks adjacency lists newest-first, so edges are re-sorted
    /// by their index.
    pub fn children(&self, node: NodeIndex) -> Vec<(EdgeRole, NodeIndex)> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (e.id(), *e.weight(), e.target()))
            .collect();
        edges.sort_by_key(|(id, _, _)| *id);
        edges
            .into_iter()
            .map(|(_, role, target)| (role, target))
            .collect()
    }

    /// Node labels in node-index order.
    pub fn node_labels(&self) -> Vec<char> {
        self.graph
            .node_indices()
            .filter_map(|n| self.label(n))
            .collect()
    }

    /// `(parent label, child label, role)` per edge, in insertion order.
    pub fn edge_labels(&self) -> Vec<(char, char, EdgeRole)> {
        self.graph
            .edge_indices()
            .filter_map(|e| {
                let (source, target) = self.graph.edge_endpoints(e)?;
                let role = *self.graph.edge_weight(e)?;
                Some((self.label(source)?, self.label(target)?, role))
            })
            .collect()
    }
}

/// Project a syntax tree into a graph, visiting nodes in pre-order.
///
/// An empty tree gives an empty graph. The result is an out-tree: the
/// syntax root is the only node without a parent.
#[instrument(level = "debug", skip(tree))]
pub fn project(tree: &SyntaxTree) -> SyntaxGraph {
    let mut graph = SyntaxGraph::new();
    // (arena index, parent graph node and the slot we hang from)
    let mut stack: Vec<(Index, Option<(NodeIndex, EdgeRole)>)> =
        tree.root().map(|r| (r, None)).into_iter().collect();

    while let Some((idx, parent)) = stack.pop() {
        let Some(node) = tree.get_node(idx) else {
            continue;
        };
        let graph_idx = graph.add_node(node.value(), idx);
        if let Some((parent_idx, role)) = parent {
            graph.add_edge(parent_idx, graph_idx, role);
        }
        let children: Vec<_> = node.children().collect();
        for (role, child) in children.into_iter().rev() {
            stack.push((child, Some((graph_idx, role))));
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "projected syntax tree"
    );
    graph
}
