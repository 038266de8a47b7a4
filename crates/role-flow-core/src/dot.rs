//! Graphviz export of a solved network.
//!
//! Players are labelled with the role they received; every edge shows its
//! cost, and edges carrying flow are drawn bold red. Rendering to an image
//! is left to `dot` or any other Graphviz consumer.

use petgraph::dot::{Config as DotConfig, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};

use crate::assignment::Assignment;
use crate::network::{FlowEdge, FlowNode, NodeKind, SolvedNetwork};

pub fn render_dot(solved: &SolvedNetwork, assignment: &Assignment) -> String {
    let graph = solved.network().graph();

    let node_attrs =
        |_: &DiGraph<FlowNode, FlowEdge>, (_, node): (NodeIndex, &FlowNode)| -> String {
            let label = match (node.kind, assignment.get(&node.label)) {
                (NodeKind::Agent, Some(role)) => {
                    format!("{}\\n({})", escape(&node.label), escape(role))
                }
                _ => escape(&node.label),
            };
            let (shape, color) = match node.kind {
                NodeKind::Source | NodeKind::Sink => ("doublecircle", "lightgray"),
                NodeKind::Agent => ("ellipse", "lightblue"),
                NodeKind::Category => ("box", "khaki"),
            };
            format!("label = \"{label}\" shape = {shape} style = filled fillcolor = {color} ")
        };

    let edge_attrs = |_: &DiGraph<FlowNode, FlowEdge>, edge: EdgeReference<'_, FlowEdge>| -> String {
        let weight = edge.weight();
        let style = if weight.flow > 0 {
            "color = red fontcolor = red penwidth = 2"
        } else {
            "color = gray fontcolor = gray"
        };
        format!("label = \"{}\" {} ", weight.cost, style)
    };

    format!(
        "{}",
        Dot::with_attr_getters(
            graph,
            &[DotConfig::NodeNoLabel, DotConfig::EdgeNoLabel],
            &edge_attrs,
            &node_attrs,
        )
    )
}

/// Escape a name for a quoted DOT string. Only `"` and `\` need it; every
/// other character, non-ASCII included, is written as is.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
