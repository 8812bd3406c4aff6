//! Read-only helpers over a [`Network`]: fanins as a pair, consumers of a node as nodes or as
//! signals, and primary outputs driven by a node.
//!
//! Consumers are found by scanning the whole network, not from a cached fanout index: every call
//! costs O(size of the network).

use crate::{AigEdge, Network, NodeId};

/// The two fanins of a gate, or `None` if the node does not have exactly two fanins.
pub fn fanins_of<N: Network + ?Sized>(ntk: &N, node: NodeId) -> Option<[AigEdge; 2]> {
    match ntk.get_fanins(node)[..] {
        [f0, f1] => Some([f0, f1]),
        _ => None,
    }
}

/// Every live gate which has `node` as a fanin (each gate listed once).
pub fn consumers_as_nodes<N: Network + ?Sized>(ntk: &N, node: NodeId) -> Vec<NodeId> {
    ntk.get_nodes()
        .into_iter()
        .filter(|&n| {
            ntk.get_fanins(n)
                .iter()
                .any(|fanin| fanin.get_node_id() == node)
        })
        .collect()
}

/// The fanin signals pointing at `node`, one per reference.
pub fn consumers_as_signals<N: Network + ?Sized>(ntk: &N, node: NodeId) -> Vec<AigEdge> {
    ntk.get_nodes()
        .into_iter()
        .flat_map(|n| ntk.get_fanins(n))
        .filter(|fanin| fanin.get_node_id() == node)
        .collect()
}

/// The primary output signals driven by `node`.
pub fn primary_output_signals<N: Network + ?Sized>(ntk: &N, node: NodeId) -> Vec<AigEdge> {
    ntk.get_outputs()
        .into_iter()
        .filter(|output| output.get_node_id() == node)
        .collect()
}

/// All signals pointing at `node`: gate fanins first, then primary outputs.
pub fn fanout_signals<N: Network + ?Sized>(ntk: &N, node: NodeId) -> Vec<AigEdge> {
    let mut signals = consumers_as_signals(ntk, node);
    signals.extend(primary_output_signals(ntk, node));
    signals
}
