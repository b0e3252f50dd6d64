//! Unit tests for the syntax tree model
//!
//! Builds trees by hand and checks ownership, dependency tracking,
//! traversal, linking and re-serialization through the public API.

use cloudmod_core::ast::*;
use cloudmod_core::{CoreError, Diagnostics, SourceLocation};

fn at(line: usize) -> SourceLocation {
    SourceLocation::point("module.yml", line, 1)
}

fn literal(tree: &mut SyntaxTree, value: &str) -> NodeId {
    tree.add_literal(LiteralExpression::string(value), at(1))
        .unwrap()
}

fn item(tree: &mut SyntaxTree, kind: DeclarationKind, name: &str) -> NodeId {
    let keyword = literal(tree, name);
    tree.add(Declaration::new(kind, Some(keyword)).unwrap(), at(1))
        .unwrap()
}

fn reference(tree: &mut SyntaxTree, name: &str) -> NodeId {
    let resource_name = literal(tree, name);
    tree.add(
        FunctionExpression::Ref {
            resource_name,
            referenced: None,
        },
        at(2),
    )
    .unwrap()
}

/// Module with the given items
fn module(tree: &mut SyntaxTree, items: Vec<NodeId>) -> NodeId {
    let root = item(tree, DeclarationKind::Module, "Test.Module");
    let items = tree.add(NodeCollection::new(items), at(3)).unwrap();
    tree.set_property(root, "Items", Some(items)).unwrap();
    root
}

// =============================================================================
// Dependency Tracking
// =============================================================================

#[test]
fn test_retargeting_leaves_one_edge() {
    let mut tree = SyntaxTree::new();
    let source = item(&mut tree, DeclarationKind::Variable, "Source");
    let a = item(&mut tree, DeclarationKind::Resource, "A");
    let b = item(&mut tree, DeclarationKind::Resource, "B");
    let expr = reference(&mut tree, "A");
    tree.set_property(source, "Value", Some(expr)).unwrap();

    tree.set_reference(expr, Some(a)).unwrap();
    tree.set_reference(expr, Some(b)).unwrap();

    let edges: Vec<_> = tree.dependencies().edges().copied().collect();
    assert_eq!(
        edges,
        vec![DependencyEdge {
            from: source,
            to: b,
            via: expr
        }]
    );
    assert!(tree.dependencies().dependents_of(a).is_empty());
}

#[test]
fn test_clearing_a_reference_removes_its_edge() {
    let mut tree = SyntaxTree::new();
    let source = item(&mut tree, DeclarationKind::Variable, "Source");
    let target = item(&mut tree, DeclarationKind::Resource, "Target");
    let expr = reference(&mut tree, "Target");
    tree.set_property(source, "Value", Some(expr)).unwrap();
    tree.set_reference(expr, Some(target)).unwrap();
    assert_eq!(tree.dependencies().edge_for(expr).map(|e| e.to), Some(target));

    tree.set_reference(expr, None).unwrap();
    assert!(tree.dependencies().is_empty());
}

#[test]
fn test_replacing_a_property_drops_edges_below_it() {
    let mut tree = SyntaxTree::new();
    let source = item(&mut tree, DeclarationKind::Variable, "Source");
    let target = item(&mut tree, DeclarationKind::Resource, "Target");
    let expr = reference(&mut tree, "Target");
    let list = tree
        .add(ListExpression { items: vec![expr] }, at(2))
        .unwrap();
    tree.set_property(source, "Value", Some(list)).unwrap();
    tree.set_reference(expr, Some(target)).unwrap();
    assert_eq!(tree.dependencies().len(), 1);

    let replacement = literal(&mut tree, "plain");
    let previous = tree.set_property(source, "Value", Some(replacement)).unwrap();
    assert_eq!(previous, Some(list));
    assert_eq!(tree.parent(list), None);
    assert!(tree.dependencies().is_empty());
}

#[test]
fn test_reference_targets_must_be_declarations() {
    let mut tree = SyntaxTree::new();
    let expr = reference(&mut tree, "A");
    let not_a_declaration = literal(&mut tree, "A");

    assert_eq!(
        tree.set_reference(expr, Some(not_a_declaration)),
        Err(CoreError::NotADeclaration(not_a_declaration))
    );
    assert!(matches!(
        tree.set_reference(not_a_declaration, None),
        Err(CoreError::NotReferenceBearing(_))
    ));
}

#[test]
fn test_clone_gets_edges_once_attached() {
    let mut tree = SyntaxTree::new();
    let source = item(&mut tree, DeclarationKind::Variable, "Source");
    let target = item(&mut tree, DeclarationKind::Resource, "Target");
    let expr = reference(&mut tree, "Target");
    tree.set_property(source, "Value", Some(expr)).unwrap();
    tree.set_reference(expr, Some(target)).unwrap();

    let copy = tree.clone_subtree(expr).unwrap();
    assert_eq!(tree.dependencies().len(), 1);
    assert_eq!(tree.reference_target(copy), Some(target));

    let holder = item(&mut tree, DeclarationKind::Variable, "Holder");
    tree.set_property(holder, "Value", Some(copy)).unwrap();
    assert_eq!(tree.dependencies().len(), 2);
    assert_eq!(
        tree.dependencies().dependents_of(target),
        [source, holder].into_iter().collect()
    );

    // retargeting the copy leaves the original edge alone
    tree.set_reference(copy, None).unwrap();
    assert_eq!(tree.dependencies().edge_for(expr).map(|e| e.from), Some(source));
    assert_eq!(tree.dependencies().len(), 1);
}

// =============================================================================
// Ownership
// =============================================================================

#[test]
fn test_unknown_property() {
    let mut tree = SyntaxTree::new();
    let variable = item(&mut tree, DeclarationKind::Variable, "V");
    let value = literal(&mut tree, "x");

    assert_eq!(
        tree.set_property(variable, "Memory", Some(value)),
        Err(CoreError::UnknownProperty {
            kind: "Variable",
            key: "Memory".to_string()
        })
    );
    assert_eq!(tree.parent(value), None);
}

#[test]
fn test_object_entries_keep_first_key() {
    let mut tree = SyntaxTree::new();
    let object = tree.add(ObjectExpression::default(), at(1)).unwrap();
    let first = literal(&mut tree, "1");
    let second = literal(&mut tree, "2");

    assert!(tree.insert_entry(object, "A", at(1), first).unwrap());
    assert!(!tree.insert_entry(object, "A", at(2), second).unwrap());
    assert_eq!(tree.parent(second), None);

    let object = tree.expression(object).and_then(Expression::as_object).unwrap();
    assert_eq!(object.get("A"), Some(first));
}

#[test]
fn test_ancestors_and_enclosing_item() {
    let mut tree = SyntaxTree::new();
    let variable = item(&mut tree, DeclarationKind::Variable, "V");
    let root = module(&mut tree, vec![variable]);
    let expr = reference(&mut tree, "Other");
    tree.set_property(variable, "Value", Some(expr)).unwrap();

    let ancestors: Vec<_> = tree.ancestors(expr).collect();
    assert_eq!(ancestors.len(), 3);
    assert_eq!(ancestors[0], variable);
    assert_eq!(ancestors[2], root);
    assert_eq!(tree.enclosing_item(expr), Some(variable));
    assert_eq!(tree.enclosing_item(variable), None);
}

// =============================================================================
// Traversal and Linking
// =============================================================================

struct FirstReference {
    seen: Vec<&'static str>,
    found: Option<NodeId>,
}

impl SyntaxVisitor for FirstReference {
    fn visit_start(&mut self, _tree: &SyntaxTree, id: NodeId, node: &Node) -> VisitControl {
        self.seen.push(node.kind_name());
        if node.reference_target().is_some() {
            self.found = Some(id);
            return VisitControl::Stop;
        }
        VisitControl::Continue
    }
}

#[test]
fn test_visitor_stops_at_first_reference() {
    let mut tree = SyntaxTree::new();
    let a = item(&mut tree, DeclarationKind::Variable, "A");
    let expr = reference(&mut tree, "B");
    tree.set_property(a, "Value", Some(expr)).unwrap();
    let b = item(&mut tree, DeclarationKind::Variable, "B");
    let root = module(&mut tree, vec![a, b]);

    let mut visitor = FirstReference {
        seen: Vec::new(),
        found: None,
    };
    assert!(!tree.visit(root, &mut visitor));
    assert_eq!(visitor.found, Some(expr));
    assert!(visitor.seen.contains(&"Variable"));
}

#[test]
fn test_link_references_builds_edges() -> anyhow::Result<()> {
    let mut tree = SyntaxTree::new();
    let a = item(&mut tree, DeclarationKind::Variable, "A");
    let to_b = reference(&mut tree, "B");
    tree.set_property(a, "Value", Some(to_b)).unwrap();
    let b = item(&mut tree, DeclarationKind::Resource, "B");
    let c = item(&mut tree, DeclarationKind::Variable, "C");
    let to_missing = reference(&mut tree, "Missing");
    tree.set_property(c, "Value", Some(to_missing)).unwrap();
    let root = module(&mut tree, vec![a, b, c]);

    let unresolved = link_references(&mut tree, root)?;
    assert_eq!(
        unresolved,
        vec![UnresolvedReference {
            expression: to_missing,
            name: "Missing".to_string()
        }]
    );
    assert_eq!(tree.reference_target(to_b), Some(b));
    assert_eq!(
        tree.dependencies().dependencies_of(a),
        [b].into_iter().collect()
    );
    Ok(())
}

#[test]
fn test_writer_round_trips_get_att() {
    let mut tree = SyntaxTree::new();
    let resource_name = literal(&mut tree, "MyQueue");
    let attribute_name = literal(&mut tree, "Arn");
    let get_att = tree
        .add(
            FunctionExpression::GetAtt {
                resource_name,
                attribute_name,
                referenced: None,
            },
            at(1),
        )
        .unwrap();

    let written = to_yaml_value(&tree, get_att).unwrap();
    let expected: serde_yaml::Value = serde_yaml::from_str("!GetAtt [ MyQueue, Arn ]").unwrap();
    assert_eq!(written, expected);
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn test_diagnostics_keep_order_and_severity() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.warning("unused item 'A'", at(4));
    diagnostics.error("missing keys: Items", at(1));

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics.error_count(), 1);
    assert!(diagnostics.has_errors());
    let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["unused item 'A'", "missing keys: Items"]);
    assert_eq!(
        diagnostics.messages()[1].to_string(),
        "ERROR: missing keys: Items @ module.yml(1,1)"
    );
}

#[test]
fn test_diagnostics_into_vec_keeps_order() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.error("duplicate key 'A'", at(2));
    diagnostics.warning("unused item 'B'", at(5));

    let messages = diagnostics.into_vec();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].message, "duplicate key 'A'");
    assert_eq!(messages[1].location.line_start, 5);
}
