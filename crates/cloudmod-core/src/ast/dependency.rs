//! Dependency edges between item declarations
//!
//! An edge is owned by the expression that caused it, so two expressions
//! referring to the same declaration produce two edges. The graph is only
//! mutated by [`SyntaxTree`](super::SyntaxTree) when references are attached,
//! detached or retargeted.

use super::node::NodeId;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// `from` depends on `to` because of the reference expression `via`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DependencyEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub via: NodeId,
}

/// Edge set keyed by the referring expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeMap<NodeId, DependencyEdge>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edge, replacing the previous edge of the same expression
    pub(crate) fn insert(&mut self, edge: DependencyEdge) -> Option<DependencyEdge> {
        self.edges.insert(edge.via, edge)
    }

    pub(crate) fn remove(&mut self, via: NodeId) -> Option<DependencyEdge> {
        self.edges.remove(&via)
    }

    /// All edges ordered by referring expression
    pub fn edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.values()
    }

    pub fn edge_for(&self, via: NodeId) -> Option<&DependencyEdge> {
        self.edges.get(&via)
    }

    /// Declarations `declaration` depends on
    pub fn dependencies_of(&self, declaration: NodeId) -> BTreeSet<NodeId> {
        self.edges
            .values()
            .filter(|edge| edge.from == declaration)
            .map(|edge| edge.to)
            .collect()
    }

    /// Declarations that depend on `declaration`
    pub fn dependents_of(&self, declaration: NodeId) -> BTreeSet<NodeId> {
        self.edges
            .values()
            .filter(|edge| edge.to == declaration)
            .map(|edge| edge.from)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
