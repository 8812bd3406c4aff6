//! Exhaustive bit-parallel simulation.
//!
//! Every node gets a [`TruthTable`] over all the primary inputs, which is only practical for small
//! networks: simulation refuses networks with more than [`MAX_INPUTS`] inputs.
//! Two networks with the same inputs compute the same functions iff their output tables are equal.

use std::fmt;

use crate::{AigError, Network, Result, dfs::topological_sort};

/// Largest number of primary inputs [`simulate_outputs`] accepts.
pub const MAX_INPUTS: usize = 16;

/// Bit patterns of the six first variables within a single word.
const PROJECTIONS: [u64; 6] = [
    0xAAAA_AAAA_AAAA_AAAA,
    0xCCCC_CCCC_CCCC_CCCC,
    0xF0F0_F0F0_F0F0_F0F0,
    0xFF00_FF00_FF00_FF00,
    0xFFFF_0000_FFFF_0000,
    0xFFFF_FFFF_0000_0000,
];

/// Truth table of a boolean function over `num_vars` variables.
///
/// Bit `i` holds the value of the function for the assignment where variable `k` is bit `k` of `i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TruthTable {
    num_vars: usize,
    words: Vec<u64>,
}

impl TruthTable {
    fn num_words(num_vars: usize) -> usize {
        if num_vars <= 6 {
            1
        } else {
            1 << (num_vars - 6)
        }
    }

    /// Mask of the meaningful bits of each word.
    fn mask(&self) -> u64 {
        if self.num_vars >= 6 {
            u64::MAX
        } else {
            (1u64 << (1 << self.num_vars)) - 1
        }
    }

    /// The constant false function.
    pub fn zero(num_vars: usize) -> Self {
        TruthTable {
            num_vars,
            words: vec![0; Self::num_words(num_vars)],
        }
    }

    /// The function returning variable `var`.
    pub fn projection(num_vars: usize, var: usize) -> Self {
        assert!(var < num_vars, "variable {} out of {}", var, num_vars);
        let words = (0..Self::num_words(num_vars))
            .map(|w| {
                if var < 6 {
                    PROJECTIONS[var]
                } else if (w >> (var - 6)) & 1 == 1 {
                    u64::MAX
                } else {
                    0
                }
            })
            .collect();
        let mut table = TruthTable { num_vars, words };
        table.normalize();
        table
    }

    fn normalize(&mut self) {
        let mask = self.mask();
        for word in self.words.iter_mut() {
            *word &= mask;
        }
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Number of assignments, ie number of meaningful bits.
    pub fn num_bits(&self) -> usize {
        1 << self.num_vars
    }

    /// Value of the function for the given assignment.
    pub fn get_bit(&self, assignment: usize) -> bool {
        (self.words[assignment / 64] >> (assignment % 64)) & 1 == 1
    }

    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    pub fn and(&self, other: &TruthTable) -> TruthTable {
        debug_assert_eq!(self.num_vars, other.num_vars);
        TruthTable {
            num_vars: self.num_vars,
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a & b)
                .collect(),
        }
    }

    pub fn complement_if(&self, complement: bool) -> TruthTable {
        if !complement {
            return self.clone();
        }
        let mut table = TruthTable {
            num_vars: self.num_vars,
            words: self.words.iter().map(|w| !w).collect(),
        };
        table.normalize();
        table
    }
}

impl fmt::Display for TruthTable {
    /// Hexadecimal, most significant assignment first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num_vars >= 6 {
            for word in self.words.iter().rev() {
                write!(f, "{:016x}", word)?;
            }
            Ok(())
        } else {
            let digits = (self.num_bits() / 4).max(1);
            write!(f, "{:0width$x}", self.words[0], width = digits)
        }
    }
}

/// Simulates every output of the network over all input assignments.
///
/// The variable `k` of the tables is the `k`-th primary input.
pub fn simulate_outputs<N: Network + ?Sized>(ntk: &N) -> Result<Vec<TruthTable>> {
    let inputs = ntk.get_inputs();
    let num_vars = inputs.len();
    if num_vars > MAX_INPUTS {
        return Err(AigError::TooManyInputs {
            inputs: num_vars,
            max: MAX_INPUTS,
        });
    }

    let mut tables: Vec<Option<TruthTable>> = vec![None; ntk.size()];
    for (var, &input) in inputs.iter().enumerate() {
        tables[input] = Some(TruthTable::projection(num_vars, var));
    }

    for node in topological_sort(ntk)? {
        if ntk.is_constant(node) {
            tables[node] = Some(TruthTable::zero(num_vars));
        } else if ntk.is_and(node) {
            let mut table: Option<TruthTable> = None;
            for fanin in ntk.get_fanins(node) {
                let fanin_table = tables[fanin.get_node_id()]
                    .as_ref()
                    .ok_or_else(|| {
                        AigError::InvalidState(format!(
                            "fanin {} of node {} was not simulated",
                            fanin.get_node_id(),
                            node
                        ))
                    })?
                    .complement_if(fanin.get_complement());
                table = Some(match table {
                    None => fanin_table,
                    Some(table) => table.and(&fanin_table),
                });
            }
            tables[node] = table;
        }
    }

    ntk.get_outputs()
        .iter()
        .map(|output| {
            tables[output.get_node_id()]
                .as_ref()
                .map(|table| table.complement_if(output.get_complement()))
                .ok_or_else(|| {
                    AigError::InvalidState(format!(
                        "output driven by node {} which was not simulated",
                        output.get_node_id()
                    ))
                })
        })
        .collect()
}
