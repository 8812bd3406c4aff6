//! Provides a DFS visitor and a topological sort to allow simple AIG traversal.
//!
//! Both work on any [`Network`], node ids being the only handles involved.
//!
//! See [`Dfs`] and [`topological_sort`] for details.

use std::collections::HashSet;

use crate::{AigError, Network, NodeId, Result};

/// A simple DFS visitor.
///
/// Nodes are yielded in preorder. You can:
/// - start a DFS from a node using [`from_node`]
/// - or visit all the AIG by starting from the outputs using [`from_outputs`].
///
/// In the latter case, it will start by the fanin of the last output,
/// then explore all non-previously-explored nodes from the fanin of the previous output,
/// and so on until all the outputs have been processed.
///
/// [`from_node`]: Dfs::from_node
/// [`from_outputs`]: Dfs::from_outputs
///
/// Example:
///
/// ```rust
/// use aigebra::{Aig, dfs::Dfs};
/// let mut aig = Aig::new();
/// // You can modify the aig here
/// let mut dfs = Dfs::from_outputs(&aig);
/// while let Some(node) = dfs.next(&aig) {
///     // You can still borrow mut aig here
///     // ...
/// }
/// ```
pub struct Dfs {
    /// Must maintain the following invariant:
    /// - all nodes on the stack have not been visited yet
    /// - their `seen` flag is set to true to avoid adding them one more time to the stack
    /// - the different outputs from which to start a DFS are in starts
    ///   (they might have been visited already by the time we start the DFS from them,
    ///   and will simply be discarded if that's the case).
    stack: Vec<NodeId>,
    seen: HashSet<NodeId>,
    starts: Vec<NodeId>,
}

impl Dfs {
    /// Create a DFS from the initial start node.
    /// You will only browse the fanin of this node.
    pub fn from_node(start: NodeId) -> Self {
        Dfs {
            stack: vec![start],
            seen: HashSet::from([start]),
            starts: Vec::new(),
        }
    }

    /// Create a DFS from the outputs of the given network.
    /// Dangling gates (used by no output) are not visited.
    pub fn from_outputs<N: Network + ?Sized>(ntk: &N) -> Self {
        let mut starts: Vec<NodeId> = ntk
            .get_outputs()
            .iter()
            .map(|output| output.get_node_id())
            .collect();

        match starts.pop() {
            None => Dfs {
                stack: Vec::new(),
                seen: HashSet::new(),
                starts: Vec::new(),
            },
            Some(start) => Dfs {
                stack: vec![start],
                seen: HashSet::from([start]),
                starts,
            },
        }
    }

    /// Returns true if we are ready to start again! Else false, we are done.
    /// Should only be called when stack is empty (ie we are done with the current fanin).
    fn new_start(&mut self) -> bool {
        debug_assert!(self.stack.is_empty());

        while let Some(id) = self.starts.pop() {
            if self.seen.insert(id) {
                self.stack.push(id);
                return true;
            }
        }
        false
    }

    /// Yield the next node of the DFS, or None if it is done.
    pub fn next<N: Network + ?Sized>(&mut self, ntk: &N) -> Option<NodeId> {
        loop {
            if let Some(id) = self.stack.pop() {
                for child in ntk.get_fanins(id) {
                    let child_id = child.get_node_id();
                    if self.seen.insert(child_id) {
                        self.stack.push(child_id);
                    }
                }
                return Some(id);
            }

            // Maybe we can start from a different output?
            if !self.new_start() {
                return None;
            }
        }
    }
}

fn topological_visit<N: Network + ?Sized>(
    ntk: &N,
    node: NodeId,
    sort: &mut Vec<NodeId>,
    seen: &mut HashSet<NodeId>,
    done: &mut HashSet<NodeId>,
) -> Result<()> {
    let mut stack: Vec<(NodeId, bool)> = vec![(node, false)];

    while let Some((node, last_time)) = stack.pop() {
        // Post order check
        if last_time {
            done.insert(node);
            sort.push(node);
            continue;
        }

        if done.contains(&node) {
            continue;
        } else if seen.contains(&node) {
            return Err(AigError::InvalidState(format!(
                "found a cycle through node {}",
                node
            )));
        }

        seen.insert(node);
        stack.push((node, true));

        for fanin in ntk.get_fanins(node) {
            if !done.contains(&fanin.get_node_id()) {
                stack.push((fanin.get_node_id(), false));
            }
        }
    }

    Ok(())
}

/// Returns a topological sort of all the live nodes (fanins first), will error if a cycle is detected.
///
/// Node ids are not a topological order once the network has been rewritten: a gate may be
/// rewired to a fanin created after it.
pub fn topological_sort<N: Network + ?Sized>(ntk: &N) -> Result<Vec<NodeId>> {
    let mut sort = Vec::new();
    let mut seen = HashSet::new();
    let mut done = HashSet::new();

    for node in ntk.get_nodes() {
        if !done.contains(&node) {
            topological_visit(ntk, node, &mut sort, &mut seen, &mut done)?;
        }
    }
    Ok(sort)
}
