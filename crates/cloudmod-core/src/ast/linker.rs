//! Reference linking
//!
//! Binds `!Ref`, `!GetAtt`, `!Exists` and condition references to the item
//! declarations reachable from a root. Items nested in groups are named by
//! joining the group names with `::`; a reference inside a group tries the
//! innermost group first and falls back outward.

use super::declaration::DeclarationKind;
use super::expression::{ConditionExpression, Expression};
use super::node::NodeId;
use super::tree::SyntaxTree;
use crate::error::Result;
use serde::Serialize;
use std::collections::HashMap;

/// Reference whose name matched no item declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    pub expression: NodeId,
    pub name: String,
}

/// Full `::`-joined name of an item declaration
pub fn full_name(tree: &SyntaxTree, declaration: NodeId) -> Option<String> {
    let mut segments = scope_path(tree, declaration);
    segments.push(tree.declaration_name(declaration)?.to_string());
    Some(segments.join("::"))
}

/// Names of the enclosing groups, outermost first
fn scope_path(tree: &SyntaxTree, id: NodeId) -> Vec<String> {
    let mut path: Vec<String> = tree
        .ancestors(id)
        .filter(|&ancestor| {
            tree.declaration(ancestor).map(|d| d.kind()) == Some(DeclarationKind::Group)
        })
        .filter_map(|ancestor| tree.declaration_name(ancestor).map(str::to_string))
        .collect();
    path.reverse();
    path
}

/// Bind every reference under `root`, returning the names that did not resolve.
///
/// Unresolved references have their target cleared.
pub fn link_references(tree: &mut SyntaxTree, root: NodeId) -> Result<Vec<UnresolvedReference>> {
    let mut declarations: HashMap<String, NodeId> = HashMap::new();
    let mut references = Vec::new();
    tree.inspect(root, |id, node| {
        if node.is_item_declaration() {
            if let Some(name) = full_name(tree, id) {
                declarations.entry(name).or_insert(id);
            }
        } else if node.reference_target().is_some() {
            references.push(id);
        }
    });

    let mut unresolved = Vec::new();
    for expression in references {
        let Some(name) = tree.reference_name(expression).map(str::to_string) else {
            continue;
        };
        let conditions_only = matches!(
            tree.expression(expression),
            Some(Expression::Condition(ConditionExpression::Reference { .. }))
        );

        let scope = scope_path(tree, expression);
        let target = (0..=scope.len()).rev().find_map(|depth| {
            let mut candidate = scope[..depth].to_vec();
            candidate.push(name.clone());
            declarations
                .get(&candidate.join("::"))
                .copied()
                .filter(|&declaration| {
                    !conditions_only
                        || tree.declaration(declaration).map(|d| d.kind())
                            == Some(DeclarationKind::Condition)
                })
        });

        tree.set_reference(expression, target)?;
        if target.is_none() {
            unresolved.push(UnresolvedReference { expression, name });
        }
    }

    log::debug!(
        "linked {} declarations, {} unresolved references",
        declarations.len(),
        unresolved.len()
    );
    Ok(unresolved)
}
