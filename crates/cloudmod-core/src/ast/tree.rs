//! Node arena
//!
//! The tree owns every node. Children are referenced by [`NodeId`] from their
//! owner and point back through a parent index that is set exactly once per
//! attachment. A node must be detached before it can be attached elsewhere.
//!
//! Reference-bearing expressions with a target are tracked so that every
//! attach, detach or retarget recomputes their dependency edges.

use super::declaration::Declaration;
use super::dependency::{DependencyEdge, DependencyGraph};
use super::expression::{Expression, LiteralExpression, ObjectEntry};
use super::node::{ChildRemoval, Node, NodeCollection, NodeId};
use crate::error::{CoreError, Result};
use crate::location::SourceLocation;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
struct NodeEntry {
    parent: Option<NodeId>,
    location: SourceLocation,
    node: Node,
}

/// Arena-backed syntax tree
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<NodeEntry>,
    bound: BTreeSet<NodeId>,
    graph: DependencyGraph,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever added, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node, taking ownership of the children it names.
    ///
    /// Every child must exist and be unattached. A reference target carried
    /// by the node must be a declaration.
    pub fn add(&mut self, node: impl Into<Node>, location: SourceLocation) -> Result<NodeId> {
        let node = node.into();
        let id = NodeId(self.nodes.len() as u32);

        let children = node.children();
        for (index, &child) in children.iter().enumerate() {
            if let Some(parent) = self.entry(child)?.parent {
                return Err(CoreError::AlreadyAttached {
                    node: child,
                    parent,
                });
            }
            if children[..index].contains(&child) {
                return Err(CoreError::AlreadyAttached {
                    node: child,
                    parent: id,
                });
            }
        }
        if let Some(target) = node.reference_target().flatten() {
            self.require_declaration(target)?;
        }

        let id = self.push_entry(node, location);
        self.refresh_subtree(id);
        Ok(id)
    }

    /// Convenience for adding a literal
    pub fn add_literal(
        &mut self,
        literal: LiteralExpression,
        location: SourceLocation,
    ) -> Result<NodeId> {
        self.add(Expression::Literal(literal), location)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.entry(id).map(|entry| &entry.node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).map(|entry| &entry.node)
    }

    pub fn location(&self, id: NodeId) -> Option<&SourceLocation> {
        self.nodes.get(id.index()).map(|entry| &entry.location)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index()).and_then(|entry| entry.parent)
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&node| self.parent(node))
    }

    /// Nearest strict ancestor that is an item declaration
    pub fn enclosing_item(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).find(|&ancestor| {
            self.get(ancestor)
                .map(Node::is_item_declaration)
                .unwrap_or(false)
        })
    }

    pub fn declaration(&self, id: NodeId) -> Option<&Declaration> {
        self.get(id).and_then(Node::as_declaration)
    }

    pub fn expression(&self, id: NodeId) -> Option<&Expression> {
        self.get(id).and_then(Node::as_expression)
    }

    pub fn collection(&self, id: NodeId) -> Option<&NodeCollection> {
        self.get(id).and_then(Node::as_collection)
    }

    pub fn literal(&self, id: NodeId) -> Option<&LiteralExpression> {
        self.expression(id).and_then(Expression::as_literal)
    }

    pub fn literal_value(&self, id: NodeId) -> Option<&str> {
        self.literal(id).map(|literal| literal.value.as_str())
    }

    /// Items of a list expression or a collection
    pub fn list_items(&self, id: NodeId) -> Option<&[NodeId]> {
        match self.get(id)? {
            Node::Expression(Expression::List(list)) => Some(&list.items),
            Node::Collection(collection) => Some(&collection.items),
            _ => None,
        }
    }

    /// Keyword value of a declaration when it is a literal (item names, module name)
    pub fn declaration_name(&self, id: NodeId) -> Option<&str> {
        self.declaration(id)
            .and_then(Declaration::keyword_value)
            .and_then(|keyword| self.literal_value(keyword))
    }

    /// Bind `value` to a non-keyword property of a declaration.
    ///
    /// Returns the previously bound node, which is left detached.
    pub fn set_property(
        &mut self,
        declaration: NodeId,
        key: &str,
        value: Option<NodeId>,
    ) -> Result<Option<NodeId>> {
        let kind = match self.node(declaration)? {
            Node::Declaration(existing) => existing.kind(),
            _ => return Err(CoreError::NotADeclaration(declaration)),
        };
        if let Some(value) = value {
            self.check_attachable(declaration, value)?;
        }

        let entry = self.entry_mut(declaration)?;
        let slot = match &mut entry.node {
            Node::Declaration(existing) => existing.property_slot_mut(key),
            _ => None,
        }
        .ok_or_else(|| CoreError::UnknownProperty {
            kind: kind.name(),
            key: key.to_string(),
        })?;
        let previous = std::mem::replace(slot, value);

        if let Some(previous) = previous {
            self.entry_mut(previous)?.parent = None;
            self.refresh_subtree(previous);
        }
        if let Some(value) = value {
            self.entry_mut(value)?.parent = Some(declaration);
            self.refresh_subtree(value);
        }
        Ok(previous)
    }

    /// Append `child` to a list expression or collection
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_attachable(parent, child)?;
        let entry = self.entry_mut(parent)?;
        match &mut entry.node {
            Node::Expression(Expression::List(list)) => list.items.push(child),
            Node::Collection(collection) => collection.items.push(child),
            other => {
                return Err(CoreError::UnexpectedNode {
                    node: parent,
                    expected: "List or Collection",
                    found: other.kind_name(),
                })
            }
        }
        self.entry_mut(child)?.parent = Some(parent);
        self.refresh_subtree(child);
        Ok(())
    }

    /// Add a keyed entry to an object expression.
    ///
    /// Returns false when the key is already present; `value` stays detached.
    pub fn insert_entry(
        &mut self,
        object: NodeId,
        key: impl Into<String>,
        key_location: SourceLocation,
        value: NodeId,
    ) -> Result<bool> {
        self.check_attachable(object, value)?;
        let entry = self.entry_mut(object)?;
        let inserted = match &mut entry.node {
            Node::Expression(Expression::Object(existing)) => existing.insert(ObjectEntry {
                key: key.into(),
                key_location,
                value,
            }),
            other => {
                return Err(CoreError::UnexpectedNode {
                    node: object,
                    expected: "Object",
                    found: other.kind_name(),
                })
            }
        };
        if inserted {
            self.entry_mut(value)?.parent = Some(object);
            self.refresh_subtree(value);
        }
        Ok(inserted)
    }

    /// Detach a node from its parent. Detaching a root is a no-op.
    ///
    /// Required operands cannot be detached; replace their owner instead.
    pub fn detach(&mut self, child: NodeId) -> Result<()> {
        let Some(parent) = self.entry(child)?.parent else {
            return Ok(());
        };
        match self.entry_mut(parent)?.node.remove_child(child) {
            ChildRemoval::Removed => {}
            ChildRemoval::Required => return Err(CoreError::RequiredChild { node: child, parent }),
            ChildRemoval::NotFound => return Err(CoreError::NotAChild { node: child, parent }),
        }
        self.entry_mut(child)?.parent = None;
        self.refresh_subtree(child);
        Ok(())
    }

    /// Point a reference-bearing expression at a declaration, or clear it.
    ///
    /// The expression's dependency edge is updated in the same call;
    /// assigning the current target again changes nothing.
    pub fn set_reference(&mut self, expression: NodeId, target: Option<NodeId>) -> Result<()> {
        if let Some(target) = target {
            self.require_declaration(target)?;
        }
        let slot = self
            .entry_mut(expression)?
            .node
            .reference_target_mut()
            .ok_or(CoreError::NotReferenceBearing(expression))?;
        if *slot == target {
            return Ok(());
        }
        *slot = target;

        if target.is_some() {
            self.bound.insert(expression);
        } else {
            self.bound.remove(&expression);
        }
        self.refresh_reference(expression);
        Ok(())
    }

    /// Current target of a reference-bearing expression
    pub fn reference_target(&self, expression: NodeId) -> Option<NodeId> {
        self.get(expression)
            .and_then(Node::reference_target)
            .flatten()
    }

    /// Name a reference-bearing expression refers to
    pub fn reference_name(&self, expression: NodeId) -> Option<&str> {
        self.expression(expression)
            .and_then(Expression::reference_name)
            .and_then(|name| self.literal_value(name))
    }

    /// Deep-copy a subtree. The copy is unattached; reference targets are
    /// shared with the original, and no dependency edges are recorded for
    /// the copy until it is attached.
    pub fn clone_subtree(&mut self, root: NodeId) -> Result<NodeId> {
        let entry = self.entry(root)?;
        let mut node = entry.node.clone();
        let location = entry.location.clone();

        let mut copies = Vec::new();
        for child in node.children() {
            copies.push(self.clone_subtree(child)?);
        }
        for (slot, copy) in node.children_mut().into_iter().zip(copies) {
            *slot = copy;
        }
        Ok(self.push_entry(node, location))
    }

    pub fn dependencies(&self) -> &DependencyGraph {
        &self.graph
    }

    fn entry(&self, id: NodeId) -> Result<&NodeEntry> {
        self.nodes.get(id.index()).ok_or(CoreError::UnknownNode(id))
    }

    fn entry_mut(&mut self, id: NodeId) -> Result<&mut NodeEntry> {
        self.nodes
            .get_mut(id.index())
            .ok_or(CoreError::UnknownNode(id))
    }

    fn require_declaration(&self, id: NodeId) -> Result<()> {
        match self.node(id)? {
            Node::Declaration(_) => Ok(()),
            _ => Err(CoreError::NotADeclaration(id)),
        }
    }

    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.entry(parent)?;
        if let Some(existing) = self.entry(child)?.parent {
            return Err(CoreError::AlreadyAttached {
                node: child,
                parent: existing,
            });
        }
        if parent == child || self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(CoreError::CyclicAttachment { node: child });
        }
        Ok(())
    }

    fn push_entry(&mut self, node: Node, location: SourceLocation) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in node.children() {
            if let Some(entry) = self.nodes.get_mut(child.index()) {
                entry.parent = Some(id);
            }
        }
        if node.reference_target().flatten().is_some() {
            self.bound.insert(id);
        }
        self.nodes.push(NodeEntry {
            parent: None,
            location,
            node,
        });
        id
    }

    /// Recompute edges of every bound reference inside `root`'s subtree
    fn refresh_subtree(&mut self, root: NodeId) {
        if self.bound.is_empty() {
            return;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if self.bound.contains(&id) {
                self.refresh_reference(id);
            }
            if let Some(node) = self.get(id) {
                stack.extend(node.children());
            }
        }
    }

    fn refresh_reference(&mut self, expression: NodeId) {
        let target = self.reference_target(expression);
        let from = self.enclosing_item(expression);
        match (from, target) {
            (Some(from), Some(to)) if from != to => {
                self.graph.insert(DependencyEdge {
                    from,
                    to,
                    via: expression,
                });
            }
            _ => {
                self.graph.remove(expression);
            }
        }
    }
}
