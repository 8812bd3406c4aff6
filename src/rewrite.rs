//! Depth-oriented algebraic rewriting.
//!
//! The [`Rewriter`] scans the gates of a leveled network and tries the algebraic rules on each of
//! them: [associativity](associativity::try_associativity),
//! [distributivity](distributivity::try_distributivity) and
//! [three-level distributivity](distributivity::try_distributivity_bis). As soon as one rule
//! rewrites a node, levels are recomputed and the scan starts over. The pass ends on the first
//! scan where no rule applies.
//!
//! ```rust
//! use aigebra::{Aig, Network, algebraic_rewriting};
//! let mut aig = Aig::new();
//! let inputs: Vec<_> = (0..4).map(|_| aig.add_input()).collect();
//! // ((a & b) & c) & d
//! let mut chain = inputs[0];
//! for &input in &inputs[1..] {
//!     chain = aig.create_and(chain, input).unwrap();
//! }
//! aig.add_output(chain).unwrap();
//!
//! let stats = algebraic_rewriting(&mut aig).unwrap();
//! assert!(stats.converged);
//! assert_eq!(stats.depth_before, 3);
//! assert_eq!(stats.depth_after, 2);
//! ```

pub mod associativity;
pub mod distributivity;

use std::{collections::BTreeMap, fmt};

use crate::{
    AigEdge, DepthView, Leveled, Network, NodeId, Result, diagnostics, query::fanins_of,
};

pub use associativity::try_associativity;
pub use distributivity::{try_distributivity, try_distributivity_bis};

/// Fanins of a node, `None` for anything but a gate.
fn gate_fanins<N: Network + ?Sized>(ntk: &N, node: NodeId) -> Option<[AigEdge; 2]> {
    let fanins = fanins_of(ntk, node);
    debug_assert!(
        !ntk.is_and(node) || fanins.is_some(),
        "gate {} does not have two fanins",
        node
    );
    fanins
}

/// Substitutes `n` by `signal`, unless structural hashing handed `n` itself back.
fn substitute_if_changed<N: Network + ?Sized>(
    ntk: &mut N,
    n: NodeId,
    signal: AigEdge,
) -> Result<bool> {
    if signal.get_node_id() == n {
        return Ok(false);
    }
    ntk.substitute_node(n, signal)?;
    Ok(true)
}

/// The algebraic rules the [`Rewriter`] can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleKind {
    Associativity,
    Distributivity,
    DistributivityBis,
}

impl RuleKind {
    /// Every rule, in the default order.
    pub const ALL: [RuleKind; 3] = [
        RuleKind::Associativity,
        RuleKind::Distributivity,
        RuleKind::DistributivityBis,
    ];

    /// Tries the rule on node `n`, returns true iff the network was rewritten.
    pub fn apply<N: Leveled>(self, ntk: &mut N, n: NodeId) -> Result<bool> {
        match self {
            RuleKind::Associativity => try_associativity(ntk, n),
            RuleKind::Distributivity => try_distributivity(ntk, n),
            RuleKind::DistributivityBis => try_distributivity_bis(ntk, n),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::Associativity => "associativity",
            RuleKind::Distributivity => "distributivity",
            RuleKind::DistributivityBis => "distributivity-bis",
        };
        write!(f, "{}", name)
    }
}

/// A rewrite applied by [`Rewriter::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rewrite {
    pub rule: RuleKind,
    /// The node which was replaced (and is now dead).
    pub node: NodeId,
}

/// Options of a rewriting pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    /// Rules tried on each node, in order. The first one to apply wins.
    pub rules: Vec<RuleKind>,
    /// Stop after this many rewrites even if the fixpoint is not reached.
    pub max_rewrites: Option<usize>,
    /// Check the network and its levels after every rewrite.
    pub verify: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        RewriteConfig {
            rules: RuleKind::ALL.to_vec(),
            max_rewrites: None,
            verify: false,
        }
    }
}

impl RewriteConfig {
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = RuleKind>) -> Self {
        self.rules = rules.into_iter().collect();
        self
    }

    pub fn with_max_rewrites(mut self, max_rewrites: usize) -> Self {
        self.max_rewrites = Some(max_rewrites);
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

/// What a rewriting pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Number of scans over the gates, the last (unsuccessful) one included.
    pub scans: usize,
    pub rewrites: usize,
    pub per_rule: BTreeMap<RuleKind, usize>,
    pub gates_before: usize,
    pub gates_after: usize,
    pub depth_before: u32,
    pub depth_after: u32,
    /// False if the pass was stopped by [`RewriteConfig::max_rewrites`].
    pub converged: bool,
}

impl RewriteStats {
    /// Number of rewrites done by the given rule.
    pub fn count(&self, rule: RuleKind) -> usize {
        self.per_rule.get(&rule).copied().unwrap_or(0)
    }
}

impl fmt::Display for RewriteStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rewrites in {} scans (", self.rewrites, self.scans)?;
        for (i, rule) in RuleKind::ALL.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", rule, self.count(*rule))?;
        }
        write!(
            f,
            "), gates {} -> {}, depth {} -> {}, {}",
            self.gates_before,
            self.gates_after,
            self.depth_before,
            self.depth_after,
            if self.converged {
                "converged"
            } else {
                "stopped early"
            }
        )
    }
}

/// Drives the algebraic rules over a leveled network until no rule applies.
pub struct Rewriter<'a, N: Leveled> {
    ntk: &'a mut N,
    config: RewriteConfig,
    stats: RewriteStats,
}

impl<'a, N: Leveled> Rewriter<'a, N> {
    /// Refreshes the levels of the network and prepares a pass.
    pub fn new(ntk: &'a mut N, config: RewriteConfig) -> Result<Self> {
        ntk.update_levels()?;
        let stats = RewriteStats {
            gates_before: ntk.num_gates(),
            gates_after: ntk.num_gates(),
            depth_before: ntk.depth(),
            depth_after: ntk.depth(),
            ..Default::default()
        };
        Ok(Rewriter { ntk, config, stats })
    }

    pub fn network(&self) -> &N {
        &*self.ntk
    }

    pub fn stats(&self) -> &RewriteStats {
        &self.stats
    }

    /// Scans the gates until one rule applies, and returns that rewrite.
    /// Returns `None` when no rule applies to any gate: the network is at a fixpoint.
    ///
    /// Gates with no fanout are skipped.
    pub fn step(&mut self) -> Result<Option<Rewrite>> {
        self.stats.scans += 1;
        let rules = self.config.rules.clone();

        for node in self.ntk.get_gates() {
            // Dangling gates drive nothing
            if self.ntk.is_dead(node) || self.ntk.fanout_size(node) == 0 {
                continue;
            }
            for &rule in &rules {
                if !rule.apply(&mut *self.ntk, node)? {
                    continue;
                }
                self.ntk.update_levels()?;
                if self.config.verify {
                    self.ntk.check_integrity()?;
                    self.ntk.check_levels()?;
                }

                self.stats.rewrites += 1;
                *self.stats.per_rule.entry(rule).or_default() += 1;
                self.stats.gates_after = self.ntk.num_gates();
                self.stats.depth_after = self.ntk.depth();
                log::debug!(
                    "{} rewrote node {}, depth is now {}",
                    rule,
                    node,
                    self.stats.depth_after
                );
                if log::log_enabled!(log::Level::Trace) {
                    log::trace!("network:\n{}", diagnostics::describe(&*self.ntk));
                }
                return Ok(Some(Rewrite { rule, node }));
            }
        }
        Ok(None)
    }

    /// Applies rewrites until the fixpoint (or the configured bound) is reached.
    pub fn run(&mut self) -> Result<RewriteStats> {
        loop {
            if let Some(max) = self.config.max_rewrites {
                if self.stats.rewrites >= max {
                    log::warn!("stopping after {} rewrites, no fixpoint reached", max);
                    self.stats.converged = false;
                    break;
                }
            }
            if self.step()?.is_none() {
                self.stats.converged = true;
                break;
            }
        }
        log::info!("algebraic rewriting: {}", self.stats);
        Ok(self.stats.clone())
    }
}

/// Runs the default rewriting pass on a network, levels being tracked by a [`DepthView`].
///
/// Rewritten nodes are taken out of the network, but gates created by a rule which ended up
/// unused are left dangling (see [`crate::Aig::cleanup_dangling`]).
pub fn algebraic_rewriting<N: Network>(ntk: &mut N) -> Result<RewriteStats> {
    let mut view = DepthView::new(ntk)?;
    Rewriter::new(&mut view, RewriteConfig::default())?.run()
}
