//! cloudmod Core - Syntax tree and diagnostics for the cloudmod module language
//!
//! This crate provides the types shared by every cloudmod compiler phase:
//! - Source locations and the diagnostics sink
//! - The arena-backed syntax tree (declarations, expressions, collections)
//! - Static declaration schema tables
//! - Dependency tracking between item declarations
//! - Error types

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod location;

// Re-export commonly used types
pub use ast::{
    Declaration, DeclarationFamily, DeclarationKind, DeclarationType, DependencyEdge,
    DependencyGraph, Expression, Node, NodeId, SyntaxTree,
};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{CoreError, Result};
pub use location::SourceLocation;
