pub mod aig;
pub mod depth;
pub mod diagnostics;
pub mod network;
pub mod query;
pub mod rewrite;
pub mod sim;

// Re-exporting symbols and modules.
pub use aig::dfs;
pub use aig::dot;
pub use aig::{Aig, AigEdge, AigError, AigNode, NodeId, Result};
pub use depth::DepthView;
pub use network::{Leveled, Network};
pub use rewrite::{
    Rewrite, RewriteConfig, RewriteStats, Rewriter, RuleKind, algebraic_rewriting,
};
