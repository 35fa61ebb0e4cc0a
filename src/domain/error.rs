//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Reasons a postfix token sequence cannot reduce to a single tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedPostfix {
    #[error("empty expression")]
    Empty,

    #[error(
        "operator '{operator}' at position {position} needs {required} operand(s), found {available}"
    )]
    InsufficientOperands {
        operator: char,
        position: usize,
        required: usize,
        available: usize,
    },

    #[error("{remaining} subexpressions left without a joining operator")]
    UnreducedOperands { remaining: usize },
}

/// Reasons a graph is rejected by the layout engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotATree {
    #[error("graph has no nodes")]
    Empty,

    #[error("no node without a parent")]
    NoRoot,

    #[error("{count} nodes without a parent")]
    MultipleRoots { count: usize },

    #[error("requested root {node} is not a node of the graph")]
    UnknownRoot { node: usize },

    #[error("requested root {node} is not the graph's root")]
    InvalidRoot { node: usize },

    #[error("node {node} has {parents} parents")]
    MultipleParents { node: usize, parents: usize },

    #[error("graph contains a cycle")]
    Cycle,

    #[error("{unreached} nodes unreachable from the root")]
    Disconnected { unreached: usize },
}

/// Domain errors represent violations of the tree-building and layout rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("malformed postfix expression: {0}")]
    MalformedPostfix(#[from] MalformedPostfix),

    #[error("graph is not a tree: {0}")]
    NotATree(#[from] NotATree),

    #[error("invalid layout parameter {name}: {value}")]
    InvalidParameters { name: &'static str, value: f64 },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
