//! Hierarchical layout: coordinates for every node of an out-tree.

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use petgraph::visit::Dfs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult, NotATree};
use crate::domain::graph::SyntaxGraph;

/// Geometry of the layout area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Horizontal span available to the root's subtree
    pub width: f64,
    /// Vertical distance between consecutive depth levels
    pub vertical_gap: f64,
    /// y of the root
    pub start_y: f64,
    /// x of the root
    pub center_x: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            vertical_gap: 0.2,
            start_y: 0.0,
            center_x: 0.5,
        }
    }
}

impl LayoutParams {
    /// `width` and `vertical_gap` must be finite and positive, the
    /// origin finite.
    pub fn validate(&self) -> DomainResult<()> {
        let positive = [("width", self.width), ("vertical_gap", self.vertical_gap)];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(DomainError::InvalidParameters { name, value });
            }
        }
        let finite = [("start_y", self.start_y), ("center_x", self.center_x)];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(DomainError::InvalidParameters { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned extent of a layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// Node -> coordinate mapping produced by a layout engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: BTreeMap<NodeIndex, Position>,
}

impl Layout {
    pub fn position(&self, node: NodeIndex) -> Option<Position> {
        self.positions.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions in node-index order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, Position)> + '_ {
        self.positions.iter().map(|(&n, &p)| (n, p))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut positions = self.positions.values();
        let first = positions.next()?;
        let init = Bounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(positions.fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            max_x: b.max_x.max(p.x),
            min_y: b.min_y.min(p.y),
            max_y: b.max_y.max(p.y),
        }))
    }
}

/// Strategy that assigns coordinates to the nodes of a syntax graph.
pub trait LayoutEngine {
    /// Lay out `graph` starting at `root`, or at its unique parentless
    /// node when `root` is `None`.
    fn layout(&self, graph: &SyntaxGraph, root: Option<NodeIndex>) -> DomainResult<Layout>;
}

/// Check that `graph` is an out-tree and return its root.
///
/// A supplied `root` must be a node of the graph and its unique
/// parentless node.
#[instrument(level = "debug", skip(graph))]
pub fn validate_out_tree(
    graph: &SyntaxGraph,
    root: Option<NodeIndex>,
) -> Result<NodeIndex, NotATree> {
    if graph.is_empty() {
        return Err(NotATree::Empty);
    }
    if let Some(requested) = root.filter(|&r| !graph.contains(r)) {
        return Err(NotATree::UnknownRoot {
            node: requested.index(),
        });
    }

    if let Some((node, parents)) = graph
        .nodes()
        .map(|n| (n, graph.in_degree(n)))
        .find(|&(_, parents)| parents > 1)
    {
        return Err(NotATree::MultipleParents {
            node: node.index(),
            parents,
        });
    }

    let found = match graph.roots().as_slice() {
        [] => return Err(NotATree::NoRoot),
        [single] => *single,
        many => return Err(NotATree::MultipleRoots { count: many.len() }),
    };
    if let Some(requested) = root {
        if requested != found {
            return Err(NotATree::InvalidRoot {
                node: requested.index(),
            });
        }
    }

    // Iterative check; trees may be arbitrarily deep
    if toposort(graph.inner(), None).is_err() {
        return Err(NotATree::Cycle);
    }

    let mut dfs = Dfs::new(graph.inner(), found);
    let mut reached = 0;
    while dfs.next(graph.inner()).is_some() {
        reached += 1;
    }
    if reached != graph.node_count() {
        return Err(NotATree::Disconnected {
            unreached: graph.node_count() - reached,
        });
    }

    Ok(found)
}

/// Recursive horizontal subdivision.
///
/// Each node sits at its parent-assigned center; its `k` children split
/// the node's width into `k` equal slices one `vertical_gap` lower.
/// Traversal uses an explicit worklist, so depth is bounded only by memory.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HierarchicalLayout {
    pub params: LayoutParams,
}

impl HierarchicalLayout {
    pub fn new(params: LayoutParams) -> Self {
        Self { params }
    }
}

struct Frame {
    node: NodeIndex,
    center_x: f64,
    y: f64,
    width: f64,
}

impl LayoutEngine for HierarchicalLayout {
    #[instrument(level = "debug", skip(self, graph), fields(nodes = graph.node_count()))]
    fn layout(&self, graph: &SyntaxGraph, root: Option<NodeIndex>) -> DomainResult<Layout> {
        self.params.validate()?;
        let root = validate_out_tree(graph, root)?;

        let mut positions = BTreeMap::new();
        let mut worklist = vec![Frame {
            node: root,
            center_x: self.params.center_x,
            y: self.params.start_y,
            width: self.params.width,
        }];

        while let Some(frame) = worklist.pop() {
            positions.insert(
                frame.node,
                Position {
                    x: frame.center_x,
                    y: frame.y,
                },
            );

            let children = graph.children(frame.node);
            if children.is_empty() {
                continue;
            }
            let dx = frame.width / children.len() as f64;
            let first_x = frame.center_x - frame.width / 2.0 + dx / 2.0;
            for (i, (_, child)) in children.into_iter().enumerate().rev() {
                worklist.push(Frame {
                    node: child,
                    center_x: first_x + i as f64 * dx,
                    y: frame.y - self.params.vertical_gap,
                    width: dx,
                });
            }
        }

        debug!(positions = positions.len(), "layout complete");
        Ok(Layout { positions })
    }
}
