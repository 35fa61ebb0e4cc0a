//! Arena-backed regex syntax tree.

use std::fmt;

use generational_arena::{Arena, Index};
use serde::Serialize;
use tracing::instrument;

use crate::domain::token::{BinaryOp, UnaryOp};

/// Which child slot of its parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EdgeRole {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
}

impl EdgeRole {
    pub fn label(self) -> &'static str {
        match self {
            EdgeRole::Left => "L",
            EdgeRole::Right => "R",
        }
    }
}

impl fmt::Display for EdgeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One constructor application of the regex grammar.
///
/// Arity is carried by the variant: operands have no children, unary
/// operators exactly one (`left`), binary operators exactly two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxNode {
    Operand(char),
    Unary { op: UnaryOp, child: Index },
    Binary { op: BinaryOp, left: Index, right: Index },
}

impl SyntaxNode {
    /// The symbol this node was built from.
    pub fn value(&self) -> char {
        match *self {
            SyntaxNode::Operand(c) => c,
            SyntaxNode::Unary { op, .. } => op.symbol(),
            SyntaxNode::Binary { op, .. } => op.symbol(),
        }
    }

    pub fn left(&self) -> Option<Index> {
        match *self {
            SyntaxNode::Operand(_) => None,
            SyntaxNode::Unary { child, .. } => Some(child),
            SyntaxNode::Binary { left, .. } => Some(left),
        }
    }

    pub fn right(&self) -> Option<Index> {
        match *self {
            SyntaxNode::Binary { right, .. } => Some(right),
            _ => None,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            SyntaxNode::Operand(_) => 0,
            SyntaxNode::Unary { .. } => 1,
            SyntaxNode::Binary { .. } => 2,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, SyntaxNode::Operand(_))
    }

    /// Children with their slot, left before right.
    pub fn children(&self) -> impl Iterator<Item = (EdgeRole, Index)> {
        let left = self.left().map(|idx| (EdgeRole::Left, idx));
        let right = self.right().map(|idx| (EdgeRole::Right, idx));
        left.into_iter().chain(right)
    }
}

/// Syntax tree whose nodes live in a generational arena.
///
/// Nodes are addressed by arena `Index`, which doubles as node identity:
/// two operands with the same symbol are distinct indices.
/// A tree is only populated by the postfix builder and never mutated
/// afterwards.
#[derive(Debug)]
pub struct SyntaxTree {
    arena: Arena<SyntaxNode>,
    root: Option<Index>,
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxTree {
    /// Create an empty tree (no root).
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub(crate) fn insert_node(&mut self, node: SyntaxNode) -> Index {
        self.arena.insert(node)
    }

    pub(crate) fn set_root(&mut self, root: Index) {
        self.root = Some(root);
    }

    pub fn get_node(&self, idx: Index) -> Option<&SyntaxNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> Option<&SyntaxNode> {
        self.root.and_then(|idx| self.get_node(idx))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Pre-order traversal: node, then left subtree, then right subtree.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    /// Post-order traversal: left subtree, right subtree, then node.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels; a single operand has depth 1, an empty tree 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get_node(idx) {
                stack.extend(node.children().map(|(_, child)| (child, depth + 1)));
            }
        }
        max_depth
    }

    /// Operand symbols from left to right.
    pub fn leaf_symbols(&self) -> Vec<char> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.value())
            .collect()
    }

    /// Reproduce the postfix expression the tree was built from.
    pub fn to_postfix(&self) -> String {
        self.iter_postorder().map(|(_, node)| node.value()).collect()
    }

    /// Infix rendering with explicit operators; compound operands are
    /// parenthesised, e.g. `(a.b)|c` or `(a|b)*`.
    pub fn to_infix(&self) -> String {
        // (text, atomic)
        let mut stack: Vec<(String, bool)> = Vec::new();

        fn wrap((text, atomic): (String, bool)) -> String {
            if atomic {
                text
            } else {
                format!("({})", text)
            }
        }

        for (_, node) in self.iter_postorder() {
            match *node {
                SyntaxNode::Operand(c) => stack.push((c.to_string(), true)),
                SyntaxNode::Unary { op, .. } => {
                    let child = stack.pop().unwrap_or_default();
                    stack.push((format!("{}{}", wrap(child), op.symbol()), true));
                }
                SyntaxNode::Binary { op, .. } => {
                    let right = stack.pop().unwrap_or_default();
                    let left = stack.pop().unwrap_or_default();
                    stack.push((
                        format!("{}{}{}", wrap(left), op.symbol(), wrap(right)),
                        false,
                    ));
                }
            }
        }
        stack.pop().map(|(text, _)| text).unwrap_or_default()
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_infix())
    }
}

pub struct PreOrderIterator<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a SyntaxTree) -> Self {
        Self {
            tree,
            stack: tree.root().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a SyntaxNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.tree.get_node(current_idx)?;
        // Right first so left is popped first
        if let Some(right) = node.right() {
            self.stack.push(right);
        }
        if let Some(left) = node.left() {
            self.stack.push(left);
        }
        Some((current_idx, node))
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a SyntaxTree) -> Self {
        Self {
            tree,
            stack: tree.root().map(|r| (r, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a SyntaxNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                if let Some(right) = node.right() {
                    self.stack.push((right, false));
                }
                if let Some(left) = node.left() {
                    self.stack.push((left, false));
                }
            }
        }
        None
    }
}
