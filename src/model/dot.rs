/*!
# DOT Serialization

Flattens the attempt/peel structure below one attempt into a directed graph
and writes it in Graphviz syntax for the external layout tool.
*/

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::io::{self, Write};

use super::node::{AttemptNode, PeelNode};
use super::tag::{AttemptId, Tag};
use super::tree::ResultTree;

/// Vertex of the flattened subgraph
#[derive(Debug, Clone, Copy)]
pub enum GraphNode<'a> {
    Attempt(&'a AttemptNode),
    Peel(&'a PeelNode),
}

/// Why one vertex hangs below another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEdge {
    Call,
    Loop,
    Iteration(usize),
}

pub type IntegrationGraph<'a> = DiGraph<GraphNode<'a>, GraphEdge>;

impl ResultTree {
    /// Subgraph reachable from `id`, vertices in depth-first pre-order
    pub fn subgraph(&self, id: AttemptId) -> IntegrationGraph<'_> {
        let mut graph = DiGraph::new();
        let start = graph.add_node(GraphNode::Attempt(self.attempt(id)));
        self.collect_attempt(&mut graph, start, id);
        graph
    }

    fn collect_attempt<'a>(
        &'a self,
        graph: &mut IntegrationGraph<'a>,
        from: NodeIndex,
        id: AttemptId,
    ) {
        for &child in self.attempt(id).children() {
            match child {
                Tag::Attempt(call) => {
                    let to = graph.add_node(GraphNode::Attempt(self.attempt(call)));
                    graph.add_edge(from, to, GraphEdge::Call);
                    self.collect_attempt(graph, to, call);
                }
                Tag::Peel(peel) => {
                    let peel_node = self.peel(peel);
                    let to = graph.add_node(GraphNode::Peel(peel_node));
                    graph.add_edge(from, to, GraphEdge::Loop);
                    for (i, &iteration) in peel_node.iterations().iter().enumerate() {
                        let it = graph.add_node(GraphNode::Attempt(self.attempt(iteration)));
                        graph.add_edge(to, it, GraphEdge::Iteration(i));
                        self.collect_attempt(graph, it, iteration);
                    }
                }
            }
        }
    }

    /// Write the graph description of `id` and everything beneath it
    pub fn describe_as_dot<W: Write + ?Sized>(&self, id: AttemptId, sink: &mut W) -> io::Result<()> {
        let graph = self.subgraph(id);

        writeln!(sink, "digraph \"{}\" {{", escape_dot(self.attempt(id).short_header()))?;
        writeln!(sink, "  rankdir=TB;")?;
        writeln!(sink, "  node [fontname=\"Helvetica\", fontsize=10];")?;
        writeln!(sink, "  edge [fontname=\"Helvetica\", fontsize=8];")?;

        for index in graph.node_indices() {
            match graph[index] {
                GraphNode::Attempt(attempt) => writeln!(
                    sink,
                    "  n{} [label=\"{}\", shape=box];",
                    index.index(),
                    attempt_label(attempt)
                )?,
                GraphNode::Peel(peel) => writeln!(
                    sink,
                    "  n{} [label=\"{}\", shape=ellipse, style=dashed];",
                    index.index(),
                    escape_dot(peel.short_header())
                )?,
            }
        }

        for edge in graph.edge_references() {
            let from = edge.source().index();
            let to = edge.target().index();
            match edge.weight() {
                GraphEdge::Call => writeln!(sink, "  n{} -> n{};", from, to)?,
                GraphEdge::Loop => writeln!(sink, "  n{} -> n{} [style=dashed];", from, to)?,
                GraphEdge::Iteration(i) => writeln!(
                    sink,
                    "  n{} -> n{} [label=\"iteration {}\"];",
                    from, to, i
                )?,
            }
        }

        writeln!(sink, "}}")
    }

    pub fn dot_string(&self, id: AttemptId) -> String {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.describe_as_dot(id, &mut out);
        String::from_utf8_lossy(&out).into_owned()
    }
}

fn attempt_label(attempt: &AttemptNode) -> String {
    let mut label = escape_dot(attempt.short_header());
    if !attempt.details().is_empty() {
        label.push_str("\\n");
        for line in attempt.details() {
            label.push_str(&escape_dot(line));
            label.push_str("\\l");
        }
    }
    label
}

fn escape_dot(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}
