use crate::{AigEdge, Leveled, NodeId, Result};

use super::{gate_fanins, substitute_if_changed};

/// Factors a term shared by both fanins of `n`: `(x & y) & (x & z)` becomes `x & (y & z)`,
/// complemented fanins included (`!(x & y) & !(x & z)` becomes `!(x & (y | z))`).
///
/// Both fanins must be gates used by `n` only, and the shared term must appear with the same
/// polarity on both sides. The shared term is looked for among the direct fanins only.
pub fn try_distributivity<N: Leveled>(ntk: &mut N, n: NodeId) -> Result<bool> {
    let Some([s0, s1]) = gate_fanins(&*ntk, n) else {
        return Ok(false);
    };
    if ntk.fanout_size(s0.get_node_id()) != 1 || ntk.fanout_size(s1.get_node_id()) != 1 {
        return Ok(false);
    }
    let (Some(a), Some(b)) = (
        gate_fanins(&*ntk, s0.get_node_id()),
        gate_fanins(&*ntk, s1.get_node_id()),
    ) else {
        return Ok(false);
    };

    // Shared term first
    let same = |x: AigEdge, y: AigEdge| x.get_node_id() == y.get_node_id();
    let (a, b) = if same(a[0], b[0]) {
        (a, b)
    } else if same(a[0], b[1]) {
        (a, [b[1], b[0]])
    } else if same(a[1], b[0]) {
        ([a[1], a[0]], b)
    } else if same(a[1], b[1]) {
        ([a[1], a[0]], [b[1], b[0]])
    } else {
        return Ok(false);
    };
    if a[0].get_complement() != b[0].get_complement() {
        return Ok(false);
    }

    let shared = a[0];
    if s0.get_complement() && s1.get_complement() {
        let or = ntk.create_nand(!a[1], !b[1])?;
        let g = ntk.create_and(shared, or)?;
        substitute_if_changed(ntk, n, !g)
    } else {
        let rest0 = a[1].complement_if(s0.get_complement());
        let rest1 = b[1].complement_if(s1.get_complement());
        let rest = ntk.create_and(rest0, rest1)?;
        let g = ntk.create_and(shared, rest)?;
        substitute_if_changed(ntk, n, g)
    }
}

/// Returns `(deeper, other)`, the second signal winning ties.
fn split_by_level<N: Leveled>(ntk: &N, [s0, s1]: [AigEdge; 2]) -> (AigEdge, AigEdge) {
    if ntk.level(s0.get_node_id()) > ntk.level(s1.get_node_id()) {
        (s0, s1)
    } else {
        (s1, s0)
    }
}

fn level_gap<N: Leveled>(ntk: &N, high: AigEdge, low: AigEdge) -> i64 {
    i64::from(ntk.level(high.get_node_id())) - i64::from(ntk.level(low.get_node_id()))
}

/// Three-level distributivity on `n = !(!(b & a) & c) & d`, where `b` sits on a path much deeper
/// than `d`. The node is rebuilt as `((a & d) & b) | (!c & d)`, which moves `b` one level up.
///
/// Requires the deeper fanin of `n` to be complemented and at least four levels deeper than `d`,
/// the deeper fanin under it (`!(b & a)`) to be complemented and strictly deeper than `c`, and
/// `b` to be strictly deeper than `a`.
pub fn try_distributivity_bis<N: Leveled>(ntk: &mut N, n: NodeId) -> Result<bool> {
    let Some(fanins) = gate_fanins(&*ntk, n) else {
        return Ok(false);
    };
    let (z, d) = split_by_level(&*ntk, fanins);
    if !z.get_complement() || level_gap(&*ntk, z, d) <= 3 {
        return Ok(false);
    }

    let Some(fanins) = gate_fanins(&*ntk, z.get_node_id()) else {
        return Ok(false);
    };
    let (w, c) = split_by_level(&*ntk, fanins);
    if !w.get_complement() || level_gap(&*ntk, w, c) <= 0 {
        return Ok(false);
    }

    let Some(fanins) = gate_fanins(&*ntk, w.get_node_id()) else {
        return Ok(false);
    };
    let (b, a) = split_by_level(&*ntk, fanins);
    if level_gap(&*ntk, b, a) <= 0 {
        return Ok(false);
    }

    let nw = ntk.create_and(a, d)?;
    let nz = ntk.create_and(nw, b)?;
    let nf = ntk.create_and(!c, d)?;
    let nn = ntk.create_and(!nz, !nf)?;
    substitute_if_changed(ntk, n, !nn)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Aig, DepthView, Network, rewrite::try_associativity, sim::simulate_outputs};
    use test_case::test_case;

    /// `s0 & s1` with `s0 = x & y`, `s1 = x & z` (complemented as asked), x, y, z inputs.
    fn shared_term(c0: bool, c1: bool) -> (Aig, AigEdge, [AigEdge; 3]) {
        let mut aig = Aig::new();
        let x = aig.add_input();
        let y = aig.add_input();
        let z = aig.add_input();
        let xy = aig.create_and(x, y).unwrap();
        let xz = aig.create_and(z, x).unwrap();
        let out = aig
            .create_and(xy.complement_if(c0), xz.complement_if(c1))
            .unwrap();
        aig.add_output(out).unwrap();
        (aig, out, [x, y, z])
    }

    #[test_case(false, false ; "plain")]
    #[test_case(true, false ; "first complemented")]
    #[test_case(false, true ; "second complemented")]
    #[test_case(true, true ; "both complemented")]
    fn factors_shared_term(c0: bool, c1: bool) {
        let (mut aig, out, [x, _, _]) = shared_term(c0, c1);
        let before = simulate_outputs(&aig).unwrap();

        let mut view = DepthView::new(&mut aig).unwrap();
        assert!(try_distributivity(&mut view, out.get_node_id()).unwrap());
        view.update_levels().unwrap();
        assert_eq!(view.depth(), 2);
        assert!(view.check_levels().is_ok());

        assert_eq!(aig.num_gates(), 2);
        assert_eq!(aig.fanout_size(x.get_node_id()), 1);
        assert_eq!(simulate_outputs(&aig).unwrap(), before);
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn both_complemented_builds_nand() {
        let (mut aig, out, [x, y, z]) = shared_term(true, true);
        let mut view = DepthView::new(&mut aig).unwrap();
        assert!(try_distributivity(&mut view, out.get_node_id()).unwrap());

        // !(x & !(!y & !z))
        let top = aig.get_outputs()[0];
        assert!(top.get_complement());
        let fanins = aig.get_fanins(top.get_node_id());
        assert_eq!(fanins[0], x);
        assert!(fanins[1].get_complement());
        assert_eq!(aig.get_fanins(fanins[1].get_node_id()), vec![!y, !z]);
    }

    #[test]
    fn polarity_mismatch_is_rejected() {
        // (x & y) & (!x & z)
        let mut aig = Aig::new();
        let x = aig.add_input();
        let y = aig.add_input();
        let z = aig.add_input();
        let xy = aig.create_and(x, y).unwrap();
        let xz = aig.create_and(!x, z).unwrap();
        let out = aig.create_and(xy, xz).unwrap();
        aig.add_output(out).unwrap();

        let mut view = DepthView::new(&mut aig).unwrap();
        assert!(!try_distributivity(&mut view, out.get_node_id()).unwrap());
        assert_eq!(view.num_gates(), 3);
    }

    #[test]
    fn shared_fanin_is_rejected() {
        let (mut aig, out, _) = shared_term(false, false);
        let xy = aig.get_fanins(out.get_node_id())[0];
        aig.add_output(xy).unwrap();

        let mut view = DepthView::new(&mut aig).unwrap();
        assert!(!try_distributivity(&mut view, out.get_node_id()).unwrap());
    }

    #[test_case(false ; "inputs")]
    #[test_case(true ; "no shared term")]
    fn no_match(nested: bool) {
        let mut aig = Aig::new();
        let inputs: Vec<AigEdge> = (0..4).map(|_| aig.add_input()).collect();
        let out = if nested {
            let ab = aig.create_and(inputs[0], inputs[1]).unwrap();
            let cd = aig.create_and(inputs[2], inputs[3]).unwrap();
            aig.create_and(ab, cd).unwrap()
        } else {
            aig.create_and(inputs[0], inputs[1]).unwrap()
        };
        aig.add_output(out).unwrap();
        let gates = aig.num_gates();

        let mut view = DepthView::new(&mut aig).unwrap();
        assert!(!try_associativity(&mut view, out.get_node_id()).unwrap());
        assert!(!try_distributivity(&mut view, out.get_node_id()).unwrap());
        assert!(!try_distributivity_bis(&mut view, out.get_node_id()).unwrap());
        assert_eq!(view.num_gates(), gates);
    }

    /// AND chain of `depth` gates over fresh inputs (a single input when `depth` is 0).
    fn input_chain(aig: &mut Aig, depth: usize) -> AigEdge {
        let mut top = aig.add_input();
        for _ in 0..depth {
            let input = aig.add_input();
            top = aig.create_and(top, input).unwrap();
        }
        top
    }

    /// `n = !(!(b & a) & c) & d`, each of `b`, `a`, `c`, `d` being a chain of the given depth.
    fn bis_network([b, a, c, d]: [usize; 4], w_complemented: bool) -> (Aig, AigEdge) {
        let mut aig = Aig::new();
        let b = input_chain(&mut aig, b);
        let a = input_chain(&mut aig, a);
        let c = input_chain(&mut aig, c);
        let d = input_chain(&mut aig, d);
        let w = aig.create_and(b, a).unwrap();
        let z = aig.create_and(w.complement_if(w_complemented), c).unwrap();
        let n = aig.create_and(!z, d).unwrap();
        aig.add_output(n).unwrap();
        (aig, n)
    }

    #[test]
    fn bis_moves_deep_signal_up() {
        let (mut aig, n) = bis_network([3, 0, 0, 0], true);
        let before = simulate_outputs(&aig).unwrap();

        let mut view = DepthView::new(&mut aig).unwrap();
        assert_eq!(view.depth(), 6);
        assert!(try_distributivity_bis(&mut view, n.get_node_id()).unwrap());
        view.update_levels().unwrap();
        assert_eq!(view.depth(), 5);
        assert!(view.check_levels().is_ok());

        assert!(aig.is_dead(n.get_node_id()));
        assert!(aig.get_outputs()[0].get_complement());
        assert_eq!(simulate_outputs(&aig).unwrap(), before);
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn bis_needs_complemented_middle() {
        let (mut aig, n) = bis_network([3, 0, 0, 0], false);
        let mut view = DepthView::new(&mut aig).unwrap();
        assert!(!try_distributivity_bis(&mut view, n.get_node_id()).unwrap());
    }

    // Depths of [b, a, c, d]. Levels: w = 1 + max(b, a), z = 1 + max(w, c), n = 1 + max(z, d).
    #[test_case([3, 0, 0, 2], false ; "z three levels above d")]
    #[test_case([3, 0, 0, 1], true ; "z four levels above d")]
    #[test_case([2, 0, 3, 0], false ; "w level with c")]
    #[test_case([3, 3, 0, 0], false ; "b level with a")]
    fn bis_thresholds(depths: [usize; 4], applies: bool) {
        let (mut aig, n) = bis_network(depths, true);
        let before = simulate_outputs(&aig).unwrap();
        let gates = aig.num_gates();

        let mut view = DepthView::new(&mut aig).unwrap();
        let depth = view.depth();
        assert_eq!(
            try_distributivity_bis(&mut view, n.get_node_id()).unwrap(),
            applies
        );
        view.update_levels().unwrap();
        if applies {
            assert_eq!(view.depth(), depth - 1);
        } else {
            assert_eq!(view.depth(), depth);
            assert_eq!(view.num_gates(), gates);
        }

        assert_eq!(simulate_outputs(&aig).unwrap(), before);
        assert!(aig.check_integrity().is_ok());
    }
}
