//! Batch processing of expression files
//!
//! Each non-blank line of the file is one postfix expression. Processing
//! stops at the first line that fails; earlier lines have already been
//! handed to the caller.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::services::{Visualization, VisualizeService};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::traits::FileSystem;

/// Trimmed non-blank lines with their 1-based line numbers.
pub fn non_blank_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Service visualizing every expression of a file.
pub struct BatchService {
    fs: Arc<dyn FileSystem>,
    visualizer: Arc<VisualizeService>,
}

impl BatchService {
    pub fn new(fs: Arc<dyn FileSystem>, visualizer: Arc<VisualizeService>) -> Self {
        Self { fs, visualizer }
    }

    /// Visualize each expression in `path`, passing results to `sink` in file order.
    ///
    /// Returns the number of expressions processed. The first malformed line
    /// aborts the rest of the file with `ApplicationError::BatchLine`.
    pub fn process<F>(&self, path: &Path, mut sink: F) -> ApplicationResult<usize>
    where
        F: FnMut(usize, &Visualization) -> ApplicationResult<()>,
    {
        if !self.fs.exists(path) {
            return Err(ApplicationError::InputNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read expressions", path)?;

        let mut processed = 0;
        for (line, expression) in non_blank_lines(&content) {
            debug!(line, expression, "processing");
            let visualization = self.visualizer.visualize(expression).map_err(|e| match e {
                ApplicationError::Domain(source) => ApplicationError::BatchLine {
                    line,
                    expression: expression.to_string(),
                    source,
                },
                other => other,
            })?;
            sink(line, &visualization)?;
            processed += 1;
        }

        info!("processed {} expressions from {}", processed, path.display());
        Ok(processed)
    }
}
