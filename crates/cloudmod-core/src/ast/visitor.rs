//! Traversal of the syntax tree
//!
//! Children are visited in the order their owner declares them: the keyword
//! first, then properties in schema order, list and collection items in
//! sequence, object entries in insertion order.

use super::node::{Node, NodeId};
use super::tree::SyntaxTree;

/// What the traversal does after `visit_start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    Continue,
    /// Do not descend into this node; `visit_end` is still called
    SkipChildren,
    /// Abort the whole traversal
    Stop,
}

/// Visitor over syntax tree nodes
pub trait SyntaxVisitor {
    fn visit_start(&mut self, tree: &SyntaxTree, id: NodeId, node: &Node) -> VisitControl;

    fn visit_end(&mut self, _tree: &SyntaxTree, _id: NodeId, _node: &Node) {}
}

impl SyntaxTree {
    /// Walk the subtree at `root`. Returns false when the visitor stopped early.
    pub fn visit<V: SyntaxVisitor + ?Sized>(&self, root: NodeId, visitor: &mut V) -> bool {
        let Some(node) = self.get(root) else {
            return true;
        };
        match visitor.visit_start(self, root, node) {
            VisitControl::Stop => return false,
            VisitControl::SkipChildren => {}
            VisitControl::Continue => {
                for child in node.children() {
                    if !self.visit(child, visitor) {
                        return false;
                    }
                }
            }
        }
        visitor.visit_end(self, root, node);
        true
    }

    /// Preorder walk of the subtree at `root` with no early exit
    pub fn inspect<F>(&self, root: NodeId, mut inspector: F)
    where
        F: FnMut(NodeId, &Node),
    {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                inspector(id, node);
                stack.extend(node.children().into_iter().rev());
            }
        }
    }
}
