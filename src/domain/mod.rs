//! Domain layer: syntax tree, builder, graph projection and layout
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod graph;
pub mod layout;
pub mod token;

pub use arena::{EdgeRole, SyntaxNode, SyntaxTree};
pub use builder::{build, PostfixBuilder};
pub use error::{DomainError, DomainResult, MalformedPostfix, NotATree};
pub use graph::{project, GraphNode, SyntaxGraph};
pub use layout::{
    validate_out_tree, Bounds, HierarchicalLayout, Layout, LayoutEngine, LayoutParams, Position,
};
pub use token::{tokenize, BinaryOp, Token, UnaryOp};
