//! Build -> project -> layout pipeline for one postfix expression.

use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::domain::{
    project, HierarchicalLayout, Layout, LayoutEngine, LayoutParams, PostfixBuilder, SyntaxGraph,
    SyntaxTree,
};

/// Everything a renderer needs for one expression.
#[derive(Debug)]
pub struct Visualization {
    pub postfix: String,
    pub tree: SyntaxTree,
    pub graph: SyntaxGraph,
    pub layout: Layout,
}

/// Runs the pipeline with a pluggable layout engine.
pub struct VisualizeService {
    engine: Box<dyn LayoutEngine + Send + Sync>,
}

impl VisualizeService {
    /// Service using hierarchical subdivision with `params`.
    pub fn new(params: LayoutParams) -> Self {
        Self::with_engine(Box::new(HierarchicalLayout::new(params)))
    }

    pub fn with_engine(engine: Box<dyn LayoutEngine + Send + Sync>) -> Self {
        Self { engine }
    }

    /// Build the syntax tree only.
    pub fn tree(&self, postfix: &str) -> ApplicationResult<SyntaxTree> {
        Ok(PostfixBuilder::new().build_str(postfix)?)
    }

    /// Build, project and lay out `postfix`.
    #[instrument(level = "debug", skip(self))]
    pub fn visualize(&self, postfix: &str) -> ApplicationResult<Visualization> {
        let tree = self.tree(postfix)?;
        let graph = project(&tree);
        let layout = self.engine.layout(&graph, None)?;
        debug!(
            nodes = graph.node_count(),
            depth = tree.depth(),
            "visualized {}",
            postfix
        );
        Ok(Visualization {
            postfix: postfix.to_string(),
            tree,
            graph,
            layout,
        })
    }
}

impl Default for VisualizeService {
    fn default() -> Self {
        Self::new(LayoutParams::default())
    }
}
