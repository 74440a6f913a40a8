//! Error types for DOM operations.

use thiserror::Error;

use crate::node::NodeId;

/// Errors raised by [`Document`](crate::Document) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node was never created or has been removed.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    /// The operation needs the node to be attached to a parent.
    #[error("node {0} has no parent")]
    Detached(NodeId),

    /// The operation is only defined for elements.
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// The node cannot hold children (text and comment nodes).
    #[error("node {0} cannot have children")]
    NotAContainer(NodeId),

    /// Appending would make a node its own ancestor.
    #[error("node {child} is an ancestor of {parent}")]
    Cycle { parent: NodeId, child: NodeId },
}

/// Result type for DOM operations.
pub type DomResult<T> = Result<T, DomError>;
