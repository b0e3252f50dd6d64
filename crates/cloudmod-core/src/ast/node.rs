//! Node identities and the closed node type

use super::declaration::Declaration;
use super::expression::{
    ConditionExpression, Expression, FunctionExpression, ListExpression, LiteralExpression,
    ObjectExpression,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a node inside a [`SyntaxTree`](super::SyntaxTree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered list of declarations or literals, e.g. a module's `Items`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeCollection {
    pub items: Vec<NodeId>,
}

impl NodeCollection {
    pub fn new(items: Vec<NodeId>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Every element of the syntax tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Declaration(Declaration),
    Expression(Expression),
    Collection(NodeCollection),
}

/// Outcome of removing a child id from its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChildRemoval {
    Removed,
    Required,
    NotFound,
}

impl Node {
    /// Short human-readable name of the node's variant
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Declaration(declaration) => declaration.kind().name(),
            Node::Expression(expression) => expression.kind_name(),
            Node::Collection(_) => "Collection",
        }
    }

    /// Owned children in traversal order
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Node::Declaration(declaration) => declaration.children(),
            Node::Expression(expression) => expression.children(),
            Node::Collection(collection) => collection.items.clone(),
        }
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut NodeId> {
        match self {
            Node::Declaration(declaration) => declaration.children_mut(),
            Node::Expression(expression) => expression.children_mut(),
            Node::Collection(collection) => collection.items.iter_mut().collect(),
        }
    }

    pub(crate) fn remove_child(&mut self, child: NodeId) -> ChildRemoval {
        match self {
            Node::Declaration(declaration) => declaration.remove_child(child),
            Node::Expression(expression) => expression.remove_child(child),
            Node::Collection(collection) => {
                match collection.items.iter().position(|&item| item == child) {
                    Some(index) => {
                        collection.items.remove(index);
                        ChildRemoval::Removed
                    }
                    None => ChildRemoval::NotFound,
                }
            }
        }
    }

    /// `Some(target)` for reference-bearing expressions, `None` otherwise
    pub fn reference_target(&self) -> Option<Option<NodeId>> {
        match self {
            Node::Expression(expression) => expression.reference_target(),
            _ => None,
        }
    }

    pub(crate) fn reference_target_mut(&mut self) -> Option<&mut Option<NodeId>> {
        match self {
            Node::Expression(expression) => expression.reference_target_mut(),
            _ => None,
        }
    }

    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            Node::Declaration(declaration) => Some(declaration),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Node::Expression(expression) => Some(expression),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&NodeCollection> {
        match self {
            Node::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn is_item_declaration(&self) -> bool {
        self.as_declaration()
            .map(|declaration| declaration.kind().is_item())
            .unwrap_or(false)
    }
}

impl From<Declaration> for Node {
    fn from(declaration: Declaration) -> Self {
        Node::Declaration(declaration)
    }
}

impl From<Expression> for Node {
    fn from(expression: Expression) -> Self {
        Node::Expression(expression)
    }
}

impl From<NodeCollection> for Node {
    fn from(collection: NodeCollection) -> Self {
        Node::Collection(collection)
    }
}

macro_rules! expression_into_node {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(expression: $ty) -> Self {
                    Node::Expression(Expression::$variant(expression))
                }
            }
        )*
    };
}

expression_into_node! {
    Literal(LiteralExpression),
    List(ListExpression),
    Object(ObjectExpression),
    Function(FunctionExpression),
    Condition(ConditionExpression),
}
