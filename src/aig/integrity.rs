use crate::{Aig, AigEdge, AigError, AigNode, Network, NodeId, Result, dfs::topological_sort};

impl Aig {
    /// Checking if the AIG structure is correct.
    /// This function was written for debug purposes, as the library is supposed to maintain
    /// integrity of the AIG at any moment. It checks that:
    /// - ids match slots, only `False` has id 0, inputs are registered
    /// - every live gate has two live, ordered fanins
    /// - fanout counts match the references from live gates and outputs
    /// - the structural hash table maps exactly the live gates
    /// - the AIG is acyclic.
    pub fn check_integrity(&self) -> Result<()> {
        let mut references = vec![0usize; self.slots.len()];

        for (id, slot) in self.slots.iter().enumerate() {
            if slot.node.get_id() != id {
                return Err(AigError::InvalidState(format!(
                    "slot {} holds node {}",
                    id,
                    slot.node.get_id()
                )));
            }
            if id == 0 && !slot.node.is_false() {
                return Err(AigError::InvalidState("invalid false node".to_string()));
            }
            if slot.dead {
                if slot.fanout_size != 0 {
                    return Err(AigError::InvalidState(format!(
                        "dead node {} still has {} fanouts",
                        id, slot.fanout_size
                    )));
                }
                continue;
            }
            self.check_node_integrity(&slot.node)?;
            for fanin in slot.node.get_fanins() {
                references[fanin.node] += 1;
            }
        }

        for input in &self.inputs {
            if !self.is_input(*input) {
                return Err(AigError::InvalidState(format!(
                    "input {} is not an input node",
                    input
                )));
            }
        }

        for output in &self.outputs {
            self.check_edge_integrity(output)?;
            references[output.node] += 1;
        }

        for (id, slot) in self.slots.iter().enumerate() {
            if !slot.dead && slot.fanout_size != references[id] {
                return Err(AigError::InvalidState(format!(
                    "node {} has fanout size {} but {} references",
                    id, slot.fanout_size, references[id]
                )));
            }
        }

        for (key, &id) in &self.strash {
            if self.get_node(id).and_then(AigNode::strash_key) != Some(*key) {
                return Err(AigError::InvalidState(format!(
                    "hash table entry ({}, {}) points at node {} with other fanins",
                    key.0, key.1, id
                )));
            }
        }

        // Checks for acyclicity
        topological_sort(self)?;

        Ok(())
    }

    /// Check the integrity for an individual live node, that is:
    /// - check that only `False` have id 0
    /// - check that fanins of and gates refer to two distinct live nodes, in canonical order
    ///   and registered in the hash table (possibly under another gate with the same fanins).
    fn check_node_integrity(&self, node: &AigNode) -> Result<()> {
        match node {
            AigNode::False => Ok(()),
            AigNode::Input(id) => {
                if *id == 0 {
                    Err(AigError::InvalidState("input with id 0".to_string()))
                } else {
                    Ok(())
                }
            }
            AigNode::And {
                id,
                fanin0,
                fanin1,
            } => {
                self.check_edge_integrity(fanin0)?;
                self.check_edge_integrity(fanin1)?;
                if fanin0.node == fanin1.node {
                    return Err(AigError::InvalidState(format!(
                        "gate {} uses node {} twice",
                        id, fanin0.node
                    )));
                }
                if fanin1 < fanin0 {
                    return Err(AigError::InvalidState(format!(
                        "gate {} has unordered fanins {} and {}",
                        id, fanin0, fanin1
                    )));
                }
                // A revived gate may share its fanins with a gate created while it was dead,
                // the table then only knows one of them
                let key = (*fanin0, *fanin1);
                let hashed = self.strash.get(&key).and_then(|&other| self.get_node(other));
                if hashed.and_then(AigNode::strash_key) != Some(key) {
                    return Err(AigError::InvalidState(format!(
                        "gate {} is missing from the hash table",
                        id
                    )));
                }
                Ok(())
            }
        }
    }

    fn check_edge_integrity(&self, fanin: &AigEdge) -> Result<()> {
        let id: NodeId = fanin.node;
        self.get_node(id).ok_or(AigError::InvalidState(format!(
            "edge pointing at node {} which is not in the AIG anymore",
            id
        )))?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{Aig, Network};

    #[test]
    fn fresh_aig_is_valid() {
        let mut aig = Aig::new();
        assert!(aig.check_integrity().is_ok());
        let a = aig.add_input();
        let b = aig.add_input();
        let ab = aig.create_and(a, !b).unwrap();
        aig.add_output(ab).unwrap();
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn broken_fanout_count_is_detected() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let ab = aig.create_and(a, b).unwrap();
        aig.slots[ab.get_node_id()].fanout_size = 3;
        assert!(aig.check_integrity().is_err());
    }

    #[test]
    fn broken_hash_table_is_detected() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        aig.create_and(a, b).unwrap();
        aig.strash.clear();
        assert!(aig.check_integrity().is_err());
    }
}
