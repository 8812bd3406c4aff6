//! Module defining the [`Aig`] struct, as well as [`AigNode`], [`AigEdge`] and some others relevant structs.
//!
//! [`Aig`] is the concrete network shipped with this crate. The rewriting engine itself only
//! relies on the [`Network`] trait, see [`crate::network`].

pub mod dfs;
pub mod dot;
pub mod edge;
pub mod error;
mod integrity;
pub mod node;

use std::collections::HashMap;

pub use edge::AigEdge;
pub use error::{AigError, Result};
pub use node::{AigNode, NodeId};

use crate::Network;

/// Storage cell for a node: the node itself, its reference count and its tombstone.
#[derive(Debug, Clone)]
struct Slot {
    node: AigNode,
    /// References from live gates and from outputs.
    fanout_size: usize,
    dead: bool,
}

impl Slot {
    fn new(node: AigNode) -> Self {
        Slot {
            node,
            fanout_size: 0,
            dead: false,
        }
    }
}

/// A whole combinational AIG.
///
/// Nodes live in an arena and are addressed by their [`NodeId`]. Gates are structurally hashed:
/// [`create_and`] returns the existing gate when the same pair of fanins is requested twice, and
/// simplifies trivial cases (`x & x`, `x & !x`, constants).
///
/// Each node keeps a reference count (its fanout size, outputs included). When
/// [`substitute_node`] detaches the last consumer of a gate, the gate is taken out: it is marked
/// dead, removed from the hash table, and its fanins are dereferenced (recursively). Dead nodes
/// keep their slot so ids stay stable.
///
/// Gates that were created but never used are *not* collected automatically, call
/// [`cleanup_dangling`] once you are done with your rewrites.
///
/// ```rust
/// use aigebra::{Aig, Network};
/// let mut aig = Aig::new();
/// let a = aig.add_input();
/// let b = aig.add_input();
/// let ab = aig.create_and(a, b).unwrap();
/// assert_eq!(aig.create_and(b, a).unwrap(), ab); // structural hashing
/// assert!(aig.create_and(a, !a).unwrap().is_cst_false());
/// aig.add_output(ab).unwrap();
/// assert_eq!(aig.num_gates(), 1);
/// ```
///
/// [`create_and`]: Network::create_and
/// [`substitute_node`]: Network::substitute_node
/// [`cleanup_dangling`]: Aig::cleanup_dangling
#[derive(Debug, Clone)]
pub struct Aig {
    slots: Vec<Slot>,
    inputs: Vec<NodeId>,
    outputs: Vec<AigEdge>,
    strash: HashMap<(AigEdge, AigEdge), NodeId>,
}

impl Default for Aig {
    fn default() -> Self {
        Aig::new()
    }
}

/// Simplification of `a & b` (fanins ordered) when one can be found without a new gate.
fn trivial_and(a: AigEdge, b: AigEdge) -> Option<AigEdge> {
    if a.node == b.node {
        if a == b {
            Some(a)
        } else {
            Some(AigEdge::cst_false())
        }
    } else if a.node == 0 {
        if a.complement {
            Some(b)
        } else {
            Some(AigEdge::cst_false())
        }
    } else {
        None
    }
}

fn ordered(a: AigEdge, b: AigEdge) -> (AigEdge, AigEdge) {
    if b < a { (b, a) } else { (a, b) }
}

impl Aig {
    /// Create a brand new AIG (constant node [`AigNode::False`] included).
    pub fn new() -> Self {
        Aig {
            slots: vec![Slot::new(AigNode::False)],
            inputs: Vec::new(),
            outputs: Vec::new(),
            strash: HashMap::new(),
        }
    }

    /// Retrieves a live node from its id.
    pub fn get_node(&self, id: NodeId) -> Option<&AigNode> {
        self.slots
            .get(id)
            .filter(|slot| !slot.dead)
            .map(|slot| &slot.node)
    }

    /// Creates a new primary input and returns its (non-complemented) signal.
    pub fn add_input(&mut self) -> AigEdge {
        let id = self.slots.len();
        self.slots.push(Slot::new(AigNode::Input(id)));
        self.inputs.push(id);
        AigEdge::new(id, false)
    }

    /// Mark an existing signal as an output.
    pub fn add_output(&mut self, signal: AigEdge) -> Result<()> {
        self.check_live(signal.node)?;
        self.slots[signal.node].fanout_size += 1;
        self.outputs.push(signal);
        Ok(())
    }

    fn check_live(&self, id: NodeId) -> Result<()> {
        match self.slots.get(id) {
            None => Err(AigError::NodeDoesNotExist(id)),
            Some(slot) if slot.dead => Err(AigError::DeadNode(id)),
            Some(_) => Ok(()),
        }
    }

    /// Removes `count` references to a node and returns what is left.
    fn dereference(&mut self, id: NodeId, count: usize) -> usize {
        let slot = &mut self.slots[id];
        debug_assert!(
            slot.fanout_size >= count,
            "node {} has {} fanouts, cannot drop {}",
            id,
            slot.fanout_size,
            count
        );
        slot.fanout_size -= count;
        slot.fanout_size
    }

    /// Marks a gate as dead and dereferences its fanins, taking out the ones left unused.
    /// Constant and inputs are never taken out.
    fn take_out_node(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let slot = &mut self.slots[id];
            if slot.dead || !slot.node.is_and() {
                continue;
            }
            slot.dead = true;
            slot.fanout_size = 0;
            let fanins = slot.node.get_fanins();
            if let Some(key) = slot.node.strash_key() {
                if self.strash.get(&key) == Some(&id) {
                    self.strash.remove(&key);
                }
            }

            for fanin in fanins {
                // A gate still waiting for its own substitution can point at a dead node
                if self.slots[fanin.node].dead {
                    continue;
                }
                if self.dereference(fanin.node, 1) == 0 {
                    stack.push(fanin.node);
                }
            }
        }
    }

    /// Brings back a dead gate (and its dead fanins) into the network.
    /// The revived node starts with no reference, the caller is expected to add one.
    fn revive_node(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let slot = &mut self.slots[id];
            if !slot.dead {
                continue;
            }
            slot.dead = false;
            let fanins = slot.node.get_fanins();
            if let Some(key) = slot.node.strash_key() {
                self.strash.entry(key).or_insert(id);
            }

            for fanin in fanins {
                let child = &mut self.slots[fanin.node];
                child.fanout_size += 1;
                if child.dead {
                    stack.push(fanin.node);
                }
            }
        }
    }

    /// Takes out every gate which is not used by any other gate nor output.
    /// Returns the number of gates which were taken out.
    pub fn cleanup_dangling(&mut self) -> usize {
        let before = self.num_gates();
        for id in 0..self.slots.len() {
            let slot = &self.slots[id];
            if !slot.dead && slot.node.is_and() && slot.fanout_size == 0 {
                self.take_out_node(id);
            }
        }
        let removed = before - self.num_gates();
        if removed > 0 {
            log::debug!("took out {} dangling gates", removed);
        }
        removed
    }
}

impl Network for Aig {
    fn size(&self) -> usize {
        self.slots.len()
    }

    fn is_dead(&self, node: NodeId) -> bool {
        self.slots.get(node).is_none_or(|slot| slot.dead)
    }

    fn is_constant(&self, node: NodeId) -> bool {
        node == 0
    }

    fn is_input(&self, node: NodeId) -> bool {
        self.get_node(node).is_some_and(AigNode::is_input)
    }

    fn is_and(&self, node: NodeId) -> bool {
        self.get_node(node).is_some_and(AigNode::is_and)
    }

    fn get_fanins(&self, node: NodeId) -> Vec<AigEdge> {
        self.get_node(node)
            .map(AigNode::get_fanins)
            .unwrap_or_default()
    }

    fn fanout_size(&self, node: NodeId) -> usize {
        self.slots.get(node).map_or(0, |slot| slot.fanout_size)
    }

    fn get_nodes(&self) -> Vec<NodeId> {
        (0..self.slots.len())
            .filter(|&id| !self.slots[id].dead)
            .collect()
    }

    fn get_gates(&self) -> Vec<NodeId> {
        (0..self.slots.len())
            .filter(|&id| !self.slots[id].dead && self.slots[id].node.is_and())
            .collect()
    }

    fn get_inputs(&self) -> Vec<NodeId> {
        self.inputs.clone()
    }

    fn get_outputs(&self) -> Vec<AigEdge> {
        self.outputs.clone()
    }

    fn create_and(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge> {
        self.check_live(a.node)?;
        self.check_live(b.node)?;

        let (a, b) = ordered(a, b);
        if let Some(signal) = trivial_and(a, b) {
            return Ok(signal);
        }
        if let Some(&id) = self.strash.get(&(a, b)) {
            return Ok(AigEdge::new(id, false));
        }

        let id = self.slots.len();
        self.slots.push(Slot::new(AigNode::and(id, a, b)));
        self.slots[a.node].fanout_size += 1;
        self.slots[b.node].fanout_size += 1;
        self.strash.insert((a, b), id);
        Ok(AigEdge::new(id, false))
    }

    fn substitute_node(&mut self, old: NodeId, new: AigEdge) -> Result<()> {
        self.check_live(old)?;
        if !self.slots[old].node.is_and() {
            return Err(AigError::NotAGate(old));
        }
        self.check_live(new.node)?;

        // Substituting a node may make some of its fanouts trivial or structurally equal to
        // another node: those get substituted in turn.
        let mut old_to_new: HashMap<NodeId, AigEdge> = HashMap::new();
        let mut to_substitute = vec![(old, new)];

        while let Some((old, mut new)) = to_substitute.pop() {
            if self.is_dead(old) {
                continue;
            }

            // The replacement might itself have been replaced since it was queued
            while self.is_dead(new.node) {
                match old_to_new.get(&new.node) {
                    Some(&repl) => new = repl.complement_if(new.complement),
                    None => break,
                }
            }
            if self.is_dead(new.node) {
                let twin = self.slots[new.node]
                    .node
                    .strash_key()
                    .and_then(|key| self.strash.get(&key).copied());
                match twin {
                    Some(twin) => new = AigEdge::new(twin, new.complement),
                    None => self.revive_node(new.node),
                }
            }

            for id in 0..self.slots.len() {
                if self.slots[id].dead || !self.slots[id].node.is_and() {
                    continue;
                }
                if let Some(repl) = self.replace_in_node(id, old, new)? {
                    to_substitute.push(repl);
                }
            }
            self.replace_in_outputs(old, new)?;

            if old != new.node {
                old_to_new.insert(old, new);
                self.take_out_node(old);
            }
        }

        Ok(())
    }

    fn replace_in_node(
        &mut self,
        node: NodeId,
        old: NodeId,
        new: AigEdge,
    ) -> Result<Option<(NodeId, AigEdge)>> {
        let (f0, f1) = match self.get_node(node).and_then(AigNode::strash_key) {
            Some(key) => key,
            None => return Ok(None),
        };
        if f0.node != old && f1.node != old {
            return Ok(None);
        }
        self.check_live(new.node)?;

        let replace = |fanin: AigEdge| {
            if fanin.node == old {
                new.complement_if(fanin.complement)
            } else {
                fanin
            }
        };
        let (c0, c1) = ordered(replace(f0), replace(f1));

        if let Some(signal) = trivial_and(c0, c1) {
            return Ok(Some((node, signal)));
        }
        if let Some(&existing) = self.strash.get(&(c0, c1)) {
            if existing != node {
                return Ok(Some((node, AigEdge::new(existing, false))));
            }
        }

        if self.strash.get(&(f0, f1)) == Some(&node) {
            self.strash.remove(&(f0, f1));
        }
        // Only the replaced fanin moves. The other one keeps its count, even when it is a dead
        // node that the current cascade already took out.
        self.dereference(old, 1);
        self.slots[new.node].fanout_size += 1;
        self.slots[node].node.set_fanins(c0, c1);
        self.strash.insert((c0, c1), node);

        Ok(None)
    }

    fn replace_in_outputs(&mut self, old: NodeId, new: AigEdge) -> Result<()> {
        let mut replaced = 0;
        for output in self.outputs.iter_mut().filter(|o| o.node == old) {
            *output = new.complement_if(output.complement);
            replaced += 1;
        }
        if replaced > 0 && old != new.node {
            self.check_live(new.node)?;
            self.slots[new.node].fanout_size += replaced;
            self.dereference(old, replaced);
        }
        Ok(())
    }

    fn check_integrity(&self) -> Result<()> {
        Aig::check_integrity(self)
    }
}
