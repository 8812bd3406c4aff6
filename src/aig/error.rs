use thiserror::Error;

use super::NodeId;

/// The result of an AIG operation.
pub type Result<T> = std::result::Result<T, AigError>;

/// Error returned when an AIG operation failed.
///
/// Note that a rewriting rule which does not apply is *not* an error: rules return `Ok(false)`.
/// These errors are raised by the network or the leveling oracle when they are misused or when
/// they detect a broken invariant.
#[derive(Debug, Error)]
pub enum AigError {
    /// The node with given id does not exist.
    #[error("node with id={0} does not exist")]
    NodeDoesNotExist(NodeId),

    /// The node with given id was taken out of the network.
    #[error("node with id={0} has been taken out of the network")]
    DeadNode(NodeId),

    /// An and gate was expected.
    #[error("node with id={0} is not an and gate")]
    NotAGate(NodeId),

    /// The AIG has reached an invalid state. This should never happen.
    /// For example, the fanout count of a node does not match the number of its references,
    /// or a cycle has been found.
    #[error("the AIG has reached an invalid state - this should not happen - error: {0}")]
    InvalidState(String),

    /// Exhaustive simulation is only supported for small networks.
    #[error("cannot simulate {inputs} inputs exhaustively (at most {max})")]
    TooManyInputs { inputs: usize, max: usize },

    /// The leveling oracle holds a level which does not match the current structure.
    #[error("node {node} has level {stored} but should have level {expected}")]
    LevelMismatch {
        node: NodeId,
        stored: u32,
        expected: u32,
    },
}
