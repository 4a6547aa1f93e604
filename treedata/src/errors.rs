use thiserror::Error;

use crate::arena::NodeId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node not found in this tree: {0}")]
    UnknownNode(NodeId),

    #[error("Invalid index {index}: expected a position within 0..{len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("Invalid index {0}: the root node can only be at index 0")]
    RootIndex(usize),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    #[error("Node is already attached to a parent: {0}")]
    AlreadyAttached(NodeId),

    #[error("Cycle detected: node {0} cannot be attached beneath itself")]
    CycleDetected(NodeId),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl TreeError {
    /// True for every error that reports an out-of-range position.
    pub fn is_invalid_index(&self) -> bool {
        matches!(self, TreeError::InvalidIndex { .. } | TreeError::RootIndex(_))
    }
}

pub type TreeResult<T> = Result<T, TreeError>;
