//! Tree store error types

use crate::model::NodeId;

/// Errors raised by the tree store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id was never issued by this store.
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    /// The root hub list has not been loaded.
    #[error("Hub list unavailable: {0}")]
    RootsUnavailable(String),
}
