//! Human readable dump of a network: for every gate, its fanins and who uses it.
//!
//! ```text
//! 5 AND(1, !2)
//!     -> 6
//!     -> !o0
//! ```

use std::fmt;

use crate::{
    Network,
    query::{consumers_as_nodes, primary_output_signals},
};

/// Display adapter returned by [`describe`].
pub struct NetworkSummary<'a, N: ?Sized> {
    ntk: &'a N,
}

/// Lists every live gate with its fanins, then one line per consumer (gate or output).
pub fn describe<N: Network + ?Sized>(ntk: &N) -> NetworkSummary<'_, N> {
    NetworkSummary { ntk }
}

fn bang(complement: bool) -> &'static str {
    if complement { "!" } else { "" }
}

impl<N: Network + ?Sized> fmt::Display for NetworkSummary<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ntk = self.ntk;
        let outputs = ntk.get_outputs();

        for gate in ntk.get_gates() {
            let fanins: Vec<String> = ntk
                .get_fanins(gate)
                .iter()
                .map(|fanin| fanin.to_string())
                .collect();
            writeln!(f, "{} AND({})", gate, fanins.join(", "))?;

            for consumer in consumers_as_nodes(ntk, gate) {
                for fanin in ntk.get_fanins(consumer) {
                    if fanin.get_node_id() == gate {
                        writeln!(f, "    -> {}{}", bang(fanin.get_complement()), consumer)?;
                    }
                }
            }

            if !primary_output_signals(ntk, gate).is_empty() {
                for (i, output) in outputs.iter().enumerate() {
                    if output.get_node_id() == gate {
                        writeln!(f, "    -> {}o{}", bang(output.get_complement()), i)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Aig;

    #[test]
    fn describe_test() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let ab = aig.create_and(a, !b).unwrap();
        let top = aig.create_and(!ab, a).unwrap();
        aig.add_output(top).unwrap();
        aig.add_output(!ab).unwrap();

        assert_eq!(
            describe(&aig).to_string(),
            "3 AND(1, !2)\n    -> !4\n    -> !o1\n4 AND(1, !3)\n    -> o0\n"
        );
    }
}
