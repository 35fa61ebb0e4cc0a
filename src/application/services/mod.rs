//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod batch;
mod visualize;

pub use batch::{non_blank_lines, BatchService};
pub use visualize::{Visualization, VisualizeService};
