//! Capability interface the rewriting engine works against.
//!
//! The rules in [`crate::rewrite`] never touch a concrete graph type: they only need the operations
//! of [`Network`] (structure queries and mutation primitives) and [`Leveled`] (logic levels and
//! critical path). [`crate::Aig`] implements the former, [`crate::DepthView`] adds the latter on top
//! of any network.

use crate::{AigEdge, NodeId, Result};

/// A combinational And-Inverter Graph that can be queried and mutated.
///
/// Node ids are stable handles: a node which has been taken out stays addressable and reports
/// [`is_dead`](Network::is_dead), its id is never reused.
pub trait Network {
    /// Number of node slots, including the constant node, inputs and dead nodes.
    fn size(&self) -> usize;

    /// Returns true if the node has been taken out (or never existed).
    fn is_dead(&self, node: NodeId) -> bool;

    fn is_constant(&self, node: NodeId) -> bool;

    fn is_input(&self, node: NodeId) -> bool;

    fn is_and(&self, node: NodeId) -> bool;

    /// Fanins of a node: exactly two for a live and gate, none otherwise.
    fn get_fanins(&self, node: NodeId) -> Vec<AigEdge>;

    /// Number of references to the node, from gates and from primary outputs.
    fn fanout_size(&self, node: NodeId) -> usize;

    /// All live nodes (constant and inputs included), by increasing id.
    fn get_nodes(&self) -> Vec<NodeId>;

    /// All live and gates, by increasing id.
    fn get_gates(&self) -> Vec<NodeId> {
        self.get_nodes()
            .into_iter()
            .filter(|&n| self.is_and(n))
            .collect()
    }

    fn num_gates(&self) -> usize {
        self.get_gates().len()
    }

    /// Primary inputs, in creation order.
    fn get_inputs(&self) -> Vec<NodeId>;

    /// Signals driving the primary outputs, in creation order.
    fn get_outputs(&self) -> Vec<AigEdge>;

    /// Returns a signal computing `a & b`.
    /// The network may return an existing node or simplify trivial cases.
    fn create_and(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge>;

    /// Returns a signal computing `!(a & b)`.
    fn create_nand(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge> {
        Ok(!self.create_and(a, b)?)
    }

    /// Returns a signal computing `a | b`.
    fn create_or(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge> {
        Ok(!self.create_and(!a, !b)?)
    }

    /// Replaces every reference to `old` (from gates and outputs) by `new`, then takes `old` out.
    fn substitute_node(&mut self, old: NodeId, new: AigEdge) -> Result<()>;

    /// If `node` has `old` as a fanin, replace it by `new`.
    ///
    /// When the replacement makes `node` trivial or structurally equal to another node, `node`
    /// is left untouched and the pair `(node, replacement)` is returned instead, for the caller to
    /// substitute.
    fn replace_in_node(
        &mut self,
        node: NodeId,
        old: NodeId,
        new: AigEdge,
    ) -> Result<Option<(NodeId, AigEdge)>>;

    /// Replaces `old` by `new` in every primary output driven by `old`.
    fn replace_in_outputs(&mut self, old: NodeId, new: AigEdge) -> Result<()>;

    /// Checks the structural invariants of the network.
    fn check_integrity(&self) -> Result<()> {
        Ok(())
    }
}

/// A network annotated with logic levels and critical path membership.
///
/// Levels and critical path flags are only trusted right after [`update_levels`]; any mutation
/// may leave them stale.
///
/// [`update_levels`]: Leveled::update_levels
pub trait Leveled: Network {
    /// Longest path, in gates, from an input or the constant to this node.
    fn level(&self, node: NodeId) -> u32;

    /// True iff some path from this node to a primary output realizes the network depth.
    fn is_on_critical_path(&self, node: NodeId) -> bool;

    /// Maximum level over the nodes driving primary outputs.
    fn depth(&self) -> u32;

    /// Recomputes levels and critical path for the current structure.
    fn update_levels(&mut self) -> Result<()>;

    /// Checks the stored levels and critical path against the current structure.
    fn check_levels(&self) -> Result<()> {
        Ok(())
    }
}
