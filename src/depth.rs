//! Leveling oracle: logic levels and critical path on top of any [`Network`].

use crate::{AigEdge, AigError, Leveled, Network, NodeId, Result, dfs::topological_sort};

/// A view over a network which tracks the level of every node and the critical path.
///
/// The view forwards every [`Network`] operation to the underlying network. Gates created
/// through the view get their level right away; every other mutation leaves levels and critical
/// path stale until [`update_levels`] is called.
///
/// ```rust
/// use aigebra::{Aig, DepthView, Leveled, Network};
/// let mut aig = Aig::new();
/// let a = aig.add_input();
/// let b = aig.add_input();
/// let c = aig.add_input();
/// let ab = aig.create_and(a, b).unwrap();
/// let abc = aig.create_and(ab, c).unwrap();
/// aig.add_output(abc).unwrap();
///
/// let view = DepthView::new(&mut aig).unwrap();
/// assert_eq!(view.depth(), 2);
/// assert!(view.is_on_critical_path(a.get_node_id()));
/// assert!(!view.is_on_critical_path(c.get_node_id()));
/// ```
///
/// [`update_levels`]: Leveled::update_levels
#[derive(Debug)]
pub struct DepthView<'a, N: Network> {
    ntk: &'a mut N,
    levels: Vec<u32>,
    critical: Vec<bool>,
    depth: u32,
}

/// Levels of every live node, indexed by id (0 for dead slots).
fn compute_levels<N: Network + ?Sized>(ntk: &N) -> Result<Vec<u32>> {
    let mut levels = vec![0; ntk.size()];
    for node in topological_sort(ntk)? {
        levels[node] = ntk
            .get_fanins(node)
            .iter()
            .map(|fanin| levels[fanin.get_node_id()] + 1)
            .max()
            .unwrap_or(0);
    }
    Ok(levels)
}

/// Critical path flags: nodes reachable from a deepest output by following fanins whose level
/// is exactly one less than their consumer's.
fn compute_critical_path<N: Network + ?Sized>(ntk: &N, levels: &[u32], depth: u32) -> Vec<bool> {
    let mut critical = vec![false; levels.len()];
    let mut stack: Vec<NodeId> = ntk
        .get_outputs()
        .iter()
        .map(AigEdge::get_node_id)
        .filter(|&node| levels[node] == depth)
        .collect();

    while let Some(node) = stack.pop() {
        if critical[node] {
            continue;
        }
        critical[node] = true;
        if ntk.is_constant(node) {
            continue;
        }
        for fanin in ntk.get_fanins(node) {
            let child = fanin.get_node_id();
            if levels[child] + 1 == levels[node] && !critical[child] {
                stack.push(child);
            }
        }
    }
    critical
}

fn output_depth<N: Network + ?Sized>(ntk: &N, levels: &[u32]) -> u32 {
    ntk.get_outputs()
        .iter()
        .map(|output| levels[output.get_node_id()])
        .max()
        .unwrap_or(0)
}

impl<'a, N: Network> DepthView<'a, N> {
    /// Wraps the network and computes levels and critical path.
    pub fn new(ntk: &'a mut N) -> Result<Self> {
        let mut view = DepthView {
            ntk,
            levels: Vec::new(),
            critical: Vec::new(),
            depth: 0,
        };
        view.update_levels()?;
        Ok(view)
    }

    /// The underlying network.
    pub fn network(&self) -> &N {
        &*self.ntk
    }
}

impl<N: Network> Network for DepthView<'_, N> {
    fn size(&self) -> usize {
        self.ntk.size()
    }

    fn is_dead(&self, node: NodeId) -> bool {
        self.ntk.is_dead(node)
    }

    fn is_constant(&self, node: NodeId) -> bool {
        self.ntk.is_constant(node)
    }

    fn is_input(&self, node: NodeId) -> bool {
        self.ntk.is_input(node)
    }

    fn is_and(&self, node: NodeId) -> bool {
        self.ntk.is_and(node)
    }

    fn get_fanins(&self, node: NodeId) -> Vec<AigEdge> {
        self.ntk.get_fanins(node)
    }

    fn fanout_size(&self, node: NodeId) -> usize {
        self.ntk.fanout_size(node)
    }

    fn get_nodes(&self) -> Vec<NodeId> {
        self.ntk.get_nodes()
    }

    fn get_gates(&self) -> Vec<NodeId> {
        self.ntk.get_gates()
    }

    fn get_inputs(&self) -> Vec<NodeId> {
        self.ntk.get_inputs()
    }

    fn get_outputs(&self) -> Vec<AigEdge> {
        self.ntk.get_outputs()
    }

    fn create_and(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge> {
        let signal = self.ntk.create_and(a, b)?;
        let node = signal.get_node_id();
        if node >= self.levels.len() {
            let level = 1 + self.level(a.get_node_id()).max(self.level(b.get_node_id()));
            self.levels.resize(self.ntk.size(), 0);
            self.critical.resize(self.ntk.size(), false);
            self.levels[node] = level;
        }
        Ok(signal)
    }

    fn substitute_node(&mut self, old: NodeId, new: AigEdge) -> Result<()> {
        self.ntk.substitute_node(old, new)
    }

    fn replace_in_node(
        &mut self,
        node: NodeId,
        old: NodeId,
        new: AigEdge,
    ) -> Result<Option<(NodeId, AigEdge)>> {
        self.ntk.replace_in_node(node, old, new)
    }

    fn replace_in_outputs(&mut self, old: NodeId, new: AigEdge) -> Result<()> {
        self.ntk.replace_in_outputs(old, new)
    }

    fn check_integrity(&self) -> Result<()> {
        self.ntk.check_integrity()
    }
}

impl<N: Network> Leveled for DepthView<'_, N> {
    fn level(&self, node: NodeId) -> u32 {
        self.levels.get(node).copied().unwrap_or(0)
    }

    fn is_on_critical_path(&self, node: NodeId) -> bool {
        self.critical.get(node).copied().unwrap_or(false)
    }

    fn depth(&self) -> u32 {
        self.depth
    }

    fn update_levels(&mut self) -> Result<()> {
        self.levels = compute_levels(&*self.ntk)?;
        self.depth = output_depth(&*self.ntk, &self.levels);
        self.critical = compute_critical_path(&*self.ntk, &self.levels, self.depth);
        Ok(())
    }

    /// Compares the stored levels, depth and critical path with a recomputation from scratch.
    fn check_levels(&self) -> Result<()> {
        let levels = compute_levels(&*self.ntk)?;
        for node in self.ntk.get_nodes() {
            let stored = self.level(node);
            if stored != levels[node] {
                return Err(AigError::LevelMismatch {
                    node,
                    stored,
                    expected: levels[node],
                });
            }
        }

        let depth = output_depth(&*self.ntk, &levels);
        if depth != self.depth {
            return Err(AigError::InvalidState(format!(
                "stored depth {} but the outputs have depth {}",
                self.depth, depth
            )));
        }

        let critical = compute_critical_path(&*self.ntk, &levels, depth);
        for node in self.ntk.get_nodes() {
            if critical[node] != self.is_on_critical_path(node) {
                return Err(AigError::InvalidState(format!(
                    "critical path flag of node {} is stale",
                    node
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Aig;

    /// out = ((a & b) & c) & d, plus a second output e & d.
    fn chain() -> (Aig, Vec<AigEdge>, Vec<AigEdge>) {
        let mut aig = Aig::new();
        let inputs: Vec<AigEdge> = (0..5).map(|_| aig.add_input()).collect();
        let ab = aig.create_and(inputs[0], inputs[1]).unwrap();
        let abc = aig.create_and(ab, !inputs[2]).unwrap();
        let abcd = aig.create_and(abc, inputs[3]).unwrap();
        let ed = aig.create_and(inputs[4], inputs[3]).unwrap();
        aig.add_output(abcd).unwrap();
        aig.add_output(!ed).unwrap();
        (aig, inputs, vec![ab, abc, abcd, ed])
    }

    #[test]
    fn levels_and_critical_path() {
        let (mut aig, inputs, gates) = chain();
        let view = DepthView::new(&mut aig).unwrap();

        assert_eq!(view.depth(), 3);
        assert_eq!(view.level(0), 0);
        assert_eq!(view.level(inputs[0].get_node_id()), 0);
        assert_eq!(view.level(gates[0].get_node_id()), 1);
        assert_eq!(view.level(gates[1].get_node_id()), 2);
        assert_eq!(view.level(gates[2].get_node_id()), 3);
        assert_eq!(view.level(gates[3].get_node_id()), 1);

        assert!(view.is_on_critical_path(gates[2].get_node_id()));
        assert!(view.is_on_critical_path(gates[1].get_node_id()));
        assert!(view.is_on_critical_path(gates[0].get_node_id()));
        assert!(view.is_on_critical_path(inputs[0].get_node_id()));
        assert!(view.is_on_critical_path(inputs[1].get_node_id()));
        assert!(!view.is_on_critical_path(inputs[2].get_node_id()));
        assert!(!view.is_on_critical_path(inputs[3].get_node_id()));
        assert!(!view.is_on_critical_path(gates[3].get_node_id()));
        assert!(view.check_levels().is_ok());
    }

    #[test]
    fn created_gates_are_leveled() {
        let (mut aig, inputs, gates) = chain();
        let mut view = DepthView::new(&mut aig).unwrap();
        let g = view.create_and(gates[2], inputs[4]).unwrap();
        assert_eq!(view.level(g.get_node_id()), 4);
        assert!(!view.is_on_critical_path(g.get_node_id()));
        // Dangling gate: structure unchanged for the outputs
        assert!(view.check_levels().is_ok());
    }

    #[test]
    fn substitution_makes_levels_stale() {
        let (mut aig, inputs, gates) = chain();
        let mut view = DepthView::new(&mut aig).unwrap();
        let abd = view.create_and(gates[0], inputs[3]).unwrap();
        let cd = view.create_and(!inputs[2], inputs[3]).unwrap();
        let balanced = view.create_and(abd, cd).unwrap();
        view.substitute_node(gates[2].get_node_id(), balanced).unwrap();

        assert!(matches!(
            view.check_levels(),
            Err(AigError::InvalidState(_))
        ));
        view.update_levels().unwrap();
        assert!(view.check_levels().is_ok());
        assert_eq!(view.depth(), 3);
        assert!(!view.is_on_critical_path(cd.get_node_id()));
        assert!(view.is_on_critical_path(abd.get_node_id()));
    }

    #[test]
    fn no_outputs_means_zero_depth() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let ab = aig.create_and(a, b).unwrap();
        let view = DepthView::new(&mut aig).unwrap();
        assert_eq!(view.depth(), 0);
        assert_eq!(view.level(ab.get_node_id()), 1);
        assert!(!view.is_on_critical_path(ab.get_node_id()));
    }
}
