//! You can export networks to the Graphviz dot format using [`to_dot`], or [`to_dot_leveled`]
//! to also get levels and the critical path.
//!
//! ```rust
//! use aigebra::{Aig, DepthView, Network};
//! use aigebra::dot::{GraphvizStyle, to_dot, to_dot_leveled};
//!
//! let mut aig = Aig::new();
//! let a = aig.add_input();
//! let b = aig.add_input();
//! let ab = aig.create_and(a, !b).unwrap();
//! aig.add_output(ab).unwrap();
//! println!("{}", to_dot(&aig, &GraphvizStyle::default()));
//!
//! let view = DepthView::new(&mut aig).unwrap();
//! println!("{}", to_dot_leveled(&view, &GraphvizStyle::default()));
//! ```
//!
//! You can then render the graphs using the DOT engine.

use std::{fmt::Display, ops::Add};

use crate::{AigEdge, Leveled, Network, NodeId, dfs::Dfs};

// Definining default global style.
const DEFAULT_RANKDIR: &str = "BT";

// Defining default style for nodes.
const DEFAULT_FALSE_NODE_FORMAT: &str = "[shape=point, label=\"GND\", width=1.5]";
const DEFAULT_INPUT_NODE_FORMAT: &str = "[shape=box]";
const DEFAULT_AND_NODE_FORMAT: &str = "[shape=circle]";
const DEFAULT_CRITICAL_NODE_FORMAT: &str = "[color=red, penwidth=2]";
/// See https://stackoverflow.com/questions/50822798/how-to-use-graphviz-to-draw-a-node-pointed-by-an-arrow.
const DEFAULT_OUTPUT_NODE_FORMAT: &str = "[shape=none, height=.0, width=.0]";

// Defining default style for edges.
const DEFAULT_EDGE_ALL_FORMAT: &str = "[arrowsize=0.3]";
const DEFAULT_EDGE_COMPLEMENT_FORMAT: &str = "[headlabel=\"●\", labelangle=.0, labeldistance=1.5]";
const DEFAULT_EDGE_CRITICAL_FORMAT: &str = "[color=red]";
const DEFAULT_EDGE_OUTPUT_FORMAT: &str = "[arrowhead=none]";

/// String containing the graphviz node style (you must manually include square brackets).
///
/// See [`GraphvizStyle`] for what kind of nodes can be described.
#[derive(Debug, Clone)]
pub struct GraphvizNodeStyle(String);

impl Display for GraphvizNodeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// String containing the graphviz edge style (you must manually include square brackets).
///
/// See [`GraphvizStyle`] for what kind of edges can be described.
#[derive(Debug, Clone, Default)]
pub struct GraphvizEdgeStyle(String);

impl Display for GraphvizEdgeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for GraphvizEdgeStyle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        GraphvizEdgeStyle(format!("{}{}", self.0, rhs.0))
    }
}

/// Parameters for Graphviz rendering.
///
/// ### Global parameters
/// - `rankdir`
///
/// ### Nodes
/// The following nodes can be rendered using [`GraphvizNodeStyle`]:
/// - the constant node
/// - inputs
/// - and gates
/// - output (by default, invisible node just to get an arrow)
/// - `critical`, added to the style of the nodes on the critical path ([`to_dot_leveled`] only).
///
/// ### Edges
/// Edge styles are additive. All edges implement the `edge_all` style. To that can be added:
/// - `edge_complement` if the edge is complemented
/// - `edge_critical` if both ends are on the critical path ([`to_dot_leveled`] only)
/// - `edge_output` if the edge is directed to an output.
#[derive(Debug, Clone)]
pub struct GraphvizStyle {
    // Global
    pub rankdir: String,

    // Nodes
    pub cst_false: GraphvizNodeStyle,
    pub input: GraphvizNodeStyle,
    pub and: GraphvizNodeStyle,
    pub critical: GraphvizNodeStyle,
    pub output: GraphvizNodeStyle,

    // Edges
    pub edge_all: GraphvizEdgeStyle,
    pub edge_complement: GraphvizEdgeStyle,
    pub edge_critical: GraphvizEdgeStyle,
    pub edge_output: GraphvizEdgeStyle,
}

impl Default for GraphvizStyle {
    fn default() -> Self {
        GraphvizStyle {
            rankdir: DEFAULT_RANKDIR.to_string(),

            cst_false: GraphvizNodeStyle(DEFAULT_FALSE_NODE_FORMAT.to_string()),
            input: GraphvizNodeStyle(DEFAULT_INPUT_NODE_FORMAT.to_string()),
            and: GraphvizNodeStyle(DEFAULT_AND_NODE_FORMAT.to_string()),
            critical: GraphvizNodeStyle(DEFAULT_CRITICAL_NODE_FORMAT.to_string()),
            output: GraphvizNodeStyle(DEFAULT_OUTPUT_NODE_FORMAT.to_string()),

            edge_all: GraphvizEdgeStyle(DEFAULT_EDGE_ALL_FORMAT.to_string()),
            edge_complement: GraphvizEdgeStyle(DEFAULT_EDGE_COMPLEMENT_FORMAT.to_string()),
            edge_critical: GraphvizEdgeStyle(DEFAULT_EDGE_CRITICAL_FORMAT.to_string()),
            edge_output: GraphvizEdgeStyle(DEFAULT_EDGE_OUTPUT_FORMAT.to_string()),
        }
    }
}

/// Level and critical path flag of a node, when known.
type Annotation = Option<(u32, bool)>;

fn edge_decl(
    edge: &AigEdge,
    to: String,
    to_output: bool,
    critical: bool,
    graphviz_style: &GraphvizStyle,
) -> String {
    let mut style = GraphvizEdgeStyle::default();
    if edge.get_complement() {
        style = style + graphviz_style.edge_complement.clone();
    }
    if critical {
        style = style + graphviz_style.edge_critical.clone();
    }
    if to_output {
        style = style + graphviz_style.edge_output.clone();
    }
    format!("{} -> {} {}\n", edge.get_node_id(), to, style)
}

fn get_output_id(index: usize) -> String {
    format!("o{}", index)
}

fn render<N, F>(ntk: &N, graphviz_style: &GraphvizStyle, annotate: F) -> String
where
    N: Network + ?Sized,
    F: Fn(NodeId) -> Annotation,
{
    let is_critical = |node: NodeId| annotate(node).is_some_and(|(_, critical)| critical);
    let mut decl_edges = String::new();

    // Creating different subgraphs for node declarations
    let mut decl_false_node_optional = "".to_string();
    let mut decl_inputs = format!("subgraph inputs {{\n node {}\n", graphviz_style.input);
    let mut decl_outputs = format!("subgraph outputs {{\n node {}\n", graphviz_style.output);
    let mut decl_ands = format!("subgraph ands {{\n node {}\n", graphviz_style.and);

    // Adding artificial outputs to point to
    for (i, output) in ntk.get_outputs().iter().enumerate() {
        let output_id = get_output_id(i);
        decl_outputs.push_str(&format!("{} [label=\"o{}\"]\n", output_id, 1 + i));
        decl_edges.push_str(&edge_decl(
            output,
            output_id,
            true,
            is_critical(output.get_node_id()),
            graphviz_style,
        ));
    }

    // DFS from outputs
    let mut dfs = Dfs::from_outputs(ntk);
    while let Some(node) = dfs.next(ntk) {
        let (label, extra_style) = match annotate(node) {
            Some((level, true)) => (level.to_string(), graphviz_style.critical.to_string()),
            Some((level, false)) => (level.to_string(), String::new()),
            None => (String::new(), String::new()),
        };

        if ntk.is_constant(node) {
            decl_false_node_optional.push_str(&format!(
                "{} {}{}\n",
                node, graphviz_style.cst_false, extra_style
            ));
        } else if ntk.is_input(node) {
            decl_inputs.push_str(&format!(
                "{} [label=\"i{}\"]{}\n",
                node, node, extra_style
            ));
        } else {
            decl_ands.push_str(&format!("{} [label=\"{}\"]{}\n", node, label, extra_style));
        }

        for fanin in ntk.get_fanins(node) {
            decl_edges.push_str(&edge_decl(
                &fanin,
                node.to_string(),
                false,
                is_critical(node) && is_critical(fanin.get_node_id()),
                graphviz_style,
            ));
        }
    }

    // Concatenating everything together
    format!(
        "
strict digraph {{
    rankdir=\"{}\"
    edge {}
    {}
    {}
    }}
    {}
    }}
    {}
    }}
    {}
}}",
        graphviz_style.rankdir,
        graphviz_style.edge_all,
        decl_false_node_optional,
        decl_inputs,
        decl_ands,
        decl_outputs,
        decl_edges
    )
}

/// Returns a DOT representation of the network.
/// Only nodes reachable from the outputs are drawn.
pub fn to_dot<N: Network + ?Sized>(ntk: &N, graphviz_style: &GraphvizStyle) -> String {
    render(ntk, graphviz_style, |_| None)
}

/// Returns a DOT representation of the network, gates labelled by their level and the critical
/// path highlighted.
pub fn to_dot_leveled<N: Leveled + ?Sized>(ntk: &N, graphviz_style: &GraphvizStyle) -> String {
    render(ntk, graphviz_style, |node| {
        Some((ntk.level(node), ntk.is_on_critical_path(node)))
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Aig, DepthView};

    fn small_aig() -> (Aig, Vec<AigEdge>) {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let ab = aig.create_and(a, !b).unwrap();
        let abc = aig.create_and(ab, c).unwrap();
        aig.add_output(!abc).unwrap();
        (aig, vec![a, b, c, ab, abc])
    }

    #[test]
    fn to_dot_test() {
        let (aig, signals) = small_aig();
        let dot = to_dot(&aig, &GraphvizStyle::default());
        assert!(dot.contains("strict digraph"));
        assert!(dot.contains("o0 [label=\"o1\"]"));
        assert!(dot.contains(&format!(
            "{} -> o0 {}{}",
            signals[4].get_node_id(),
            DEFAULT_EDGE_COMPLEMENT_FORMAT,
            DEFAULT_EDGE_OUTPUT_FORMAT
        )));
        assert!(dot.contains("1 [label=\"i1\"]"));
        assert!(!dot.contains(DEFAULT_CRITICAL_NODE_FORMAT));
    }

    #[test]
    fn to_dot_leveled_test() {
        let (mut aig, signals) = small_aig();
        let view = DepthView::new(&mut aig).unwrap();
        let dot = to_dot_leveled(&view, &GraphvizStyle::default());
        // abc is at level 2 and critical
        assert!(dot.contains(&format!(
            "{} [label=\"2\"]{}",
            signals[4].get_node_id(),
            DEFAULT_CRITICAL_NODE_FORMAT
        )));
        // c is not critical
        assert!(dot.contains("3 [label=\"i3\"]\n"));
        assert!(dot.contains(&format!(
            "{} -> {} {}",
            signals[3].get_node_id(),
            signals[4].get_node_id(),
            DEFAULT_EDGE_CRITICAL_FORMAT
        )));
    }
}
