//! Error types for cloudmod Core
//!
//! These errors describe misuse of the syntax tree API. User mistakes in a
//! module document are never errors; they are recorded as diagnostics.

use crate::ast::NodeId;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("Node {node} is already attached to {parent}")]
    AlreadyAttached { node: NodeId, parent: NodeId },

    #[error("Node {node} cannot be attached beneath itself")]
    CyclicAttachment { node: NodeId },

    #[error("Node {node} is not a child of {parent}")]
    NotAChild { node: NodeId, parent: NodeId },

    #[error("Node {node} is a required operand of {parent} and cannot be detached")]
    RequiredChild { node: NodeId, parent: NodeId },

    #[error("{kind} declarations have no property '{key}'")]
    UnknownProperty { kind: &'static str, key: String },

    #[error("Node {0} is not a declaration")]
    NotADeclaration(NodeId),

    #[error("Node {0} does not carry a reference")]
    NotReferenceBearing(NodeId),

    #[error("Node {node} is a {found}, expected {expected}")]
    UnexpectedNode {
        node: NodeId,
        expected: &'static str,
        found: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
