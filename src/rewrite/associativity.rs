use crate::{AigEdge, Leveled, NodeId, Result};

use super::{gate_fanins, substitute_if_changed};

/// Reassociates `n = shallow & (crit & other)` into `(shallow & other) & crit`, pulling the
/// critical grandchild one level closer to the output.
///
/// Only applies to a node on the critical path whose deeper fanin is a plain (non-complemented)
/// gate at least two levels deeper than the other fanin, and which has exactly one critical fanin.
pub fn try_associativity<N: Leveled>(ntk: &mut N, n: NodeId) -> Result<bool> {
    if !ntk.is_on_critical_path(n) {
        return Ok(false);
    }
    let Some([s0, s1]) = gate_fanins(&*ntk, n) else {
        return Ok(false);
    };
    if ntk.is_input(s0.get_node_id()) && ntk.is_input(s1.get_node_id()) {
        return Ok(false);
    }

    let level = |signal: AigEdge| ntk.level(signal.get_node_id());
    let (shallow, deep) = if level(s0) > level(s1) + 1 && !s0.get_complement() {
        (s1, s0)
    } else if level(s1) > level(s0) + 1 && !s1.get_complement() {
        (s0, s1)
    } else {
        return Ok(false);
    };

    let Some([a0, a1]) = gate_fanins(&*ntk, deep.get_node_id()) else {
        return Ok(false);
    };
    let (other, crit) = match (
        ntk.is_on_critical_path(a0.get_node_id()),
        ntk.is_on_critical_path(a1.get_node_id()),
    ) {
        (true, false) => (a1, a0),
        (false, true) => (a0, a1),
        _ => return Ok(false),
    };

    let g1 = ntk.create_and(shallow, other)?;
    let g2 = ntk.create_and(g1, crit)?;
    substitute_if_changed(ntk, n, g2)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Aig, DepthView, Network, sim::simulate_outputs};
    use test_case::test_case;

    #[test]
    fn reassociates_critical_chain() {
        // out = a & (b & (c & d)), inputs at level 0
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let d = aig.add_input();
        let cd = aig.create_and(c, d).unwrap();
        let bcd = aig.create_and(b, cd).unwrap();
        let out = aig.create_and(a, bcd).unwrap();
        aig.add_output(out).unwrap();
        let before = simulate_outputs(&aig).unwrap();

        let mut view = DepthView::new(&mut aig).unwrap();
        assert_eq!(view.depth(), 3);
        assert!(try_associativity(&mut view, out.get_node_id()).unwrap());
        view.update_levels().unwrap();
        assert_eq!(view.depth(), 2);
        assert!(view.check_levels().is_ok());

        assert!(aig.is_dead(out.get_node_id()));
        assert!(aig.is_dead(bcd.get_node_id()));
        let top = aig.get_outputs()[0];
        let fanins = aig.get_fanins(top.get_node_id());
        assert!(fanins.contains(&cd));
        assert_eq!(simulate_outputs(&aig).unwrap(), before);
        assert!(aig.check_integrity().is_ok());
    }

    // out = a & !(b & (c & d)): not an associative chain, whichever side the deep fanin is on
    #[test_case(false ; "deep fanin second")]
    #[test_case(true ; "deep fanin first")]
    fn complemented_deep_branch_is_rejected(deep_first: bool) {
        let mut aig = Aig::new();
        let early = if deep_first { None } else { Some(aig.add_input()) };
        let b = aig.add_input();
        let c = aig.add_input();
        let d = aig.add_input();
        let cd = aig.create_and(c, d).unwrap();
        let bcd = aig.create_and(b, cd).unwrap();
        // Fanins are ordered by node id
        let a = early.unwrap_or_else(|| aig.add_input());
        let out = aig.create_and(a, !bcd).unwrap();
        aig.add_output(out).unwrap();
        let side = if deep_first { 0 } else { 1 };
        assert_eq!(aig.get_fanins(out.get_node_id())[side], !bcd);

        let mut view = DepthView::new(&mut aig).unwrap();
        assert!(!try_associativity(&mut view, out.get_node_id()).unwrap());
        assert_eq!(view.num_gates(), 3);
    }

    #[test]
    fn skew_of_one_level_is_rejected() {
        // out = (a & b) & ((c & d) & e), levels 1 and 2
        let mut aig = Aig::new();
        let inputs: Vec<AigEdge> = (0..5).map(|_| aig.add_input()).collect();
        let ab = aig.create_and(inputs[0], inputs[1]).unwrap();
        let cd = aig.create_and(inputs[2], inputs[3]).unwrap();
        let cde = aig.create_and(cd, inputs[4]).unwrap();
        let out = aig.create_and(ab, cde).unwrap();
        aig.add_output(out).unwrap();

        let mut view = DepthView::new(&mut aig).unwrap();
        assert_eq!(view.level(cde.get_node_id()), view.level(ab.get_node_id()) + 1);
        assert!(!try_associativity(&mut view, out.get_node_id()).unwrap());
        assert_eq!(view.num_gates(), 4);
    }

    #[test]
    fn balanced_levels_are_rejected() {
        // out = (a & b) & (c & d)
        let mut aig = Aig::new();
        let inputs: Vec<AigEdge> = (0..4).map(|_| aig.add_input()).collect();
        let ab = aig.create_and(inputs[0], inputs[1]).unwrap();
        let cd = aig.create_and(inputs[2], inputs[3]).unwrap();
        let out = aig.create_and(ab, cd).unwrap();
        aig.add_output(out).unwrap();

        let mut view = DepthView::new(&mut aig).unwrap();
        assert!(!try_associativity(&mut view, out.get_node_id()).unwrap());
    }

    #[test]
    fn two_critical_grandchildren_are_rejected() {
        // out = a & ((b & c) & (d & e)): both grandchildren are critical
        let mut aig = Aig::new();
        let inputs: Vec<AigEdge> = (0..5).map(|_| aig.add_input()).collect();
        let bc = aig.create_and(inputs[1], inputs[2]).unwrap();
        let de = aig.create_and(inputs[3], inputs[4]).unwrap();
        let deep = aig.create_and(bc, de).unwrap();
        let out = aig.create_and(inputs[0], deep).unwrap();
        aig.add_output(out).unwrap();

        let mut view = DepthView::new(&mut aig).unwrap();
        assert!(!try_associativity(&mut view, out.get_node_id()).unwrap());
    }
}
