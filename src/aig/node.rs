use std::mem::swap;

use super::AigEdge;

/// A node id.
///
/// The constant node [`AigNode::False`] has id 0 by convention. Ids are indices into the
/// network storage: they are never reused, even once the node has been taken out.
pub type NodeId = usize;

/// An AIG node.
///
/// Each node has an id. By convention, id for constant node `False` is 0. The id must be unique.
///
/// Fanouts are not carried by the node itself: the owning [`Aig`](super::Aig) keeps a
/// reference count per node, see [`Network::fanout_size`](crate::Network::fanout_size).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AigNode {
    /// The constant low/false signal.
    False,
    /// A primary input.
    Input(NodeId),
    /// An AND gate with two fanins.
    And {
        id: NodeId,
        fanin0: AigEdge,
        fanin1: AigEdge,
    },
}

impl AigNode {
    /// Returns a new and gate.
    pub fn and(id: NodeId, fanin0: AigEdge, fanin1: AigEdge) -> Self {
        if id == 0 {
            panic!(
                "Hey, you are trying to create an AND gate with id=0. \
                Id=0 is reserved for the constant node AigNode::False."
            )
        }
        AigNode::And {
            id,
            fanin0,
            fanin1,
        }
    }

    pub fn is_false(&self) -> bool {
        matches!(self, AigNode::False)
    }

    pub fn is_input(&self) -> bool {
        matches!(self, AigNode::Input(_))
    }

    pub fn is_and(&self) -> bool {
        matches!(self, AigNode::And { .. })
    }

    pub fn get_id(&self) -> NodeId {
        match *self {
            AigNode::False => 0,
            AigNode::Input(id) => id,
            AigNode::And { id, .. } => id,
        }
    }

    pub fn get_fanins(&self) -> Vec<AigEdge> {
        match self {
            AigNode::And { fanin0, fanin1, .. } => vec![*fanin0, *fanin1],
            _ => vec![],
        }
    }

    /// Structural hashing key of an and gate, `None` for other nodes.
    pub(super) fn strash_key(&self) -> Option<(AigEdge, AigEdge)> {
        match self {
            AigNode::And { fanin0, fanin1, .. } => Some((*fanin0, *fanin1)),
            _ => None,
        }
    }

    /// Overwrite both fanins of an and gate, keeping them ordered.
    /// Does nothing on other nodes. Reference counts are the caller's business.
    pub(super) fn set_fanins(&mut self, new0: AigEdge, new1: AigEdge) {
        if let AigNode::And { fanin0, fanin1, .. } = self {
            *fanin0 = new0;
            *fanin1 = new1;
            self.reorder_fanins();
        }
    }

    /// Reorders fanins to make sure fanin0 <= fanin1 for AND gates.
    ///
    /// Both [`Aig::create_and`](super::Aig) and fanin replacement rely on this canonical order
    /// for structural hashing.
    pub(super) fn reorder_fanins(&mut self) {
        if let AigNode::And { fanin0, fanin1, .. } = self {
            if *fanin1 < *fanin0 {
                swap(fanin0, fanin1);
            }
        }
    }
}
