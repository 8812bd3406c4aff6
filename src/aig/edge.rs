//! An [`AigEdge`] points at a node and can be complemented (indicates the presence of a NOT gate).
//!
//! Edges are what the rest of the crate calls *signals*: fanins and outputs store edges, not nodes.

use std::{fmt::Display, ops::Not};

use super::NodeId;

/// A directed edge referring to a node, possibly inverted.
///
/// The edge is a plain value: it stores the id of the node it points at, so it stays valid
/// (as a handle) even after the node was taken out of the network. Use
/// [`Network::is_dead`](crate::Network::is_dead) to know whether the node is still alive.
///
/// For example:
///
/// ```rust
/// use aigebra::{Aig, AigEdge};
/// let mut aig = Aig::new();
/// let a = aig.add_input();
/// assert_eq!(a, !!a);
/// assert!(a.is_complement_of(&!a));
/// assert_eq!(AigEdge::cst_true(), !AigEdge::cst_false());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AigEdge {
    /// The node the edge is refering to.
    pub(super) node: NodeId,
    /// Set to true if signal should be inverted.
    pub(super) complement: bool,
}

impl Not for AigEdge {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.complement = !self.complement;
        self
    }
}

impl Display for AigEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.complement {
            write!(f, "!{}", self.node)
        } else {
            write!(f, "{}", self.node)
        }
    }
}

impl AigEdge {
    pub fn new(node: NodeId, complement: bool) -> Self {
        AigEdge { node, complement }
    }

    /// The constant false signal (non-complemented edge to node 0).
    pub fn cst_false() -> Self {
        AigEdge::new(0, false)
    }

    /// The constant true signal (complemented edge to node 0).
    pub fn cst_true() -> Self {
        AigEdge::new(0, true)
    }

    pub fn get_node_id(&self) -> NodeId {
        self.node
    }

    pub fn get_complement(&self) -> bool {
        self.complement
    }

    pub fn is_cst_false(&self) -> bool {
        self.node == 0 && !self.complement
    }

    pub fn is_cst_true(&self) -> bool {
        self.node == 0 && self.complement
    }

    /// Same node, opposite polarity.
    pub fn is_complement_of(&self, other: &AigEdge) -> bool {
        self.node == other.node && self.complement ^ other.complement
    }

    /// Returns the edge complemented iff `complement` is set.
    pub fn complement_if(self, complement: bool) -> Self {
        if complement { !self } else { self }
    }
}
