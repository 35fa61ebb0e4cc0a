//! Output renderers for laid-out expressions.
//!
//! These produce text for an external viewer; nothing here draws.

use petgraph::dot::Dot;
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::application::services::Visualization;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::OutputFormat;
use crate::domain::{EdgeRole, GraphNode};
use crate::tree_traits::TreeConvert;

#[derive(Serialize)]
struct JsonNode {
    id: usize,
    label: char,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct JsonEdge {
    from: usize,
    to: usize,
    label: EdgeRole,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    postfix: &'a str,
    infix: String,
    nodes: Vec<JsonNode>,
    edges: Vec<JsonEdge>,
}

/// Render `vis` in `format`; `precision` is the number of decimals for
/// coordinates in text formats.
pub fn render(
    vis: &Visualization,
    format: OutputFormat,
    precision: usize,
) -> ApplicationResult<String> {
    match format {
        OutputFormat::Tree => Ok(vis.tree.to_tree_string()),
        OutputFormat::Coords => Ok(render_coords(vis, precision)),
        OutputFormat::Dot => Ok(render_dot(vis, precision)),
        OutputFormat::Json => render_json(vis),
    }
}

/// One `label<TAB>x<TAB>y` line per node, in projection (pre-)order.
fn render_coords(vis: &Visualization, precision: usize) -> String {
    vis.layout
        .iter()
        .map(|(node, pos)| {
            let label = vis.graph.label(node).unwrap_or(' ');
            format!("{}\t{:.*}\t{:.*}\n", label, precision, pos.x, precision, pos.y)
        })
        .collect()
}

/// Graphviz DOT; positions are pinned so `neato -n` keeps the layout.
fn render_dot(vis: &Visualization, precision: usize) -> String {
    let edge_attrs = |_, _| String::new();
    let node_attrs = |_, (idx, _): (NodeIndex, &GraphNode)| match vis.layout.position(idx) {
        Some(p) => format!("pos = \"{:.*},{:.*}!\"", precision, p.x, precision, p.y),
        None => String::new(),
    };
    let dot = Dot::with_attr_getters(vis.graph.inner(), &[], &edge_attrs, &node_attrs);
    format!("{}", dot)
}

fn render_json(vis: &Visualization) -> ApplicationResult<String> {
    let nodes = vis
        .layout
        .iter()
        .filter_map(|(idx, pos)| {
            Some(JsonNode {
                id: idx.index(),
                label: vis.graph.label(idx)?,
                x: pos.x,
                y: pos.y,
            })
        })
        .collect();
    let edges = vis
        .graph
        .nodes()
        .flat_map(|parent| {
            vis.graph
                .children(parent)
                .into_iter()
                .map(move |(role, child)| JsonEdge {
                    from: parent.index(),
                    to: child.index(),
                    label: role,
                })
        })
        .collect();

    let doc = JsonDocument {
        postfix: &vis.postfix,
        infix: vis.tree.to_infix(),
        nodes,
        edges,
    };
    serde_json::to_string_pretty(&doc).map_err(|e| ApplicationError::Render {
        message: e.to_string(),
    })
}
