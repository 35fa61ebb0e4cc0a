//! Syntax trees for postfix regular expressions, projected to labelled
//! graphs and laid out hierarchically for drawing.
//!
//! ```
//! use rxtree::domain::{build, project, HierarchicalLayout, LayoutEngine};
//!
//! let tree = build("ab.c|").unwrap();
//! assert_eq!(tree.to_infix(), "(a.b)|c");
//!
//! let graph = project(&tree);
//! let layout = HierarchicalLayout::default().layout(&graph, None).unwrap();
//! assert_eq!(layout.len(), 5);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
