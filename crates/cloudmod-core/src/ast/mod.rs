//! Syntax tree definitions for cloudmod
//!
//! This module contains:
//! - Node identities and the closed node sum type
//! - Declarations, generated from a static schema table
//! - Value, function and condition expressions
//! - The arena that owns every node and enforces single parents
//! - Dependency tracking, traversal, reference linking and re-serialization

pub mod declaration;
pub mod dependency;
pub mod expression;
pub mod linker;
pub mod node;
pub mod schema;
pub mod tree;
pub mod visitor;
pub mod writer;

pub use declaration::{Declaration, DeclarationKind, ModuleDeclaration};
pub use dependency::{DependencyEdge, DependencyGraph};
pub use expression::{
    tags, ConditionExpression, Expression, FunctionExpression, ListExpression, LiteralExpression,
    LiteralKind, ObjectEntry, ObjectExpression,
};
pub use linker::{full_name, link_references, UnresolvedReference};
pub use node::{Node, NodeCollection, NodeId};
pub use schema::{DeclarationFamily, DeclarationType, PropertySchema, ValueKind};
pub use tree::SyntaxTree;
pub use visitor::{SyntaxVisitor, VisitControl};
pub use writer::to_yaml_value;
