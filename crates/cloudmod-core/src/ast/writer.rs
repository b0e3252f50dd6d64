//! Re-serialization of expressions to YAML values
//!
//! Intrinsic functions are written in their short tagged form with list
//! operands, e.g. `!Join [",", [a, b]]`. `!Sub` without parameters and
//! single-operand functions are written with a scalar operand.

use super::expression::{ConditionExpression, Expression, FunctionExpression, LiteralKind};
use super::node::{Node, NodeId};
use super::tree::SyntaxTree;
use crate::error::{CoreError, Result};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};

/// Convert the expression (or collection) at `id` into a YAML value
pub fn to_yaml_value(tree: &SyntaxTree, id: NodeId) -> Result<Value> {
    match tree.node(id)? {
        Node::Expression(expression) => write_expression(tree, expression),
        Node::Collection(collection) => collection
            .items
            .iter()
            .map(|&item| to_yaml_value(tree, item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        Node::Declaration(declaration) => Err(CoreError::UnexpectedNode {
            node: id,
            expected: "Expression",
            found: declaration.kind().name(),
        }),
    }
}

fn write_expression(tree: &SyntaxTree, expression: &Expression) -> Result<Value> {
    match expression {
        Expression::Literal(literal) => Ok(match literal.kind {
            LiteralKind::String => Value::String(literal.value.clone()),
            LiteralKind::Int => literal
                .value
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(literal.value.clone())),
            LiteralKind::Bool => literal
                .value
                .parse::<bool>()
                .map(Value::Bool)
                .unwrap_or_else(|_| Value::String(literal.value.clone())),
        }),
        Expression::List(list) => sequence(tree, &list.items),
        Expression::Object(object) => {
            let mut mapping = Mapping::new();
            for entry in &object.entries {
                mapping.insert(
                    Value::String(entry.key.clone()),
                    to_yaml_value(tree, entry.value)?,
                );
            }
            Ok(Value::Mapping(mapping))
        }
        Expression::Function(function) => write_function(tree, function),
        Expression::Condition(condition) => write_condition(tree, condition),
    }
}

fn write_function(tree: &SyntaxTree, function: &FunctionExpression) -> Result<Value> {
    let operand = match function {
        FunctionExpression::Base64 { value: operand }
        | FunctionExpression::GetAzs { region: operand }
        | FunctionExpression::ImportValue {
            shared_value: operand,
        }
        | FunctionExpression::Ref {
            resource_name: operand,
            ..
        }
        | FunctionExpression::Sub {
            format_string: operand,
            parameters: None,
        } => to_yaml_value(tree, *operand)?,
        FunctionExpression::If {
            condition,
            if_true,
            if_false,
        } => {
            let name = match tree.expression(*condition) {
                Some(Expression::Condition(ConditionExpression::Reference { name, .. })) => *name,
                _ => *condition,
            };
            sequence(tree, &[name, *if_true, *if_false])?
        }
        FunctionExpression::Transform {
            macro_name,
            parameters,
        } => {
            let mut mapping = Mapping::new();
            mapping.insert("Name".into(), to_yaml_value(tree, *macro_name)?);
            mapping.insert("Parameters".into(), to_yaml_value(tree, *parameters)?);
            Value::Mapping(mapping)
        }
        other => sequence(tree, &other.operands())?,
    };
    Ok(tagged(function.tag(), operand))
}

fn write_condition(tree: &SyntaxTree, condition: &ConditionExpression) -> Result<Value> {
    let operand = match condition {
        ConditionExpression::Reference { name, .. } | ConditionExpression::Exists { name, .. } => {
            to_yaml_value(tree, *name)?
        }
        other => sequence(tree, &other.operands())?,
    };
    Ok(tagged(condition.tag(), operand))
}

fn sequence(tree: &SyntaxTree, items: &[NodeId]) -> Result<Value> {
    items
        .iter()
        .map(|&item| to_yaml_value(tree, item))
        .collect::<Result<Vec<_>>>()
        .map(Value::Sequence)
}

fn tagged(tag: &str, value: Value) -> Value {
    Value::Tagged(Box::new(TaggedValue {
        tag: Tag::new(tag.trim_start_matches('!')),
        value,
    }))
}
