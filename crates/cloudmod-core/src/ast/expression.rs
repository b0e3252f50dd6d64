//! Expression AST nodes
//!
//! Operands are node ids owned by the expression. Reference-bearing variants
//! additionally carry a non-owned `referenced` target that the tree keeps in
//! sync with the dependency graph.

use super::node::{ChildRemoval, NodeId};
use crate::location::SourceLocation;
use serde::{Deserialize, Serialize};

/// YAML tags of the intrinsic functions and condition operators
pub mod tags {
    pub const BASE64: &str = "!Base64";
    pub const CIDR: &str = "!Cidr";
    pub const FIND_IN_MAP: &str = "!FindInMap";
    pub const GET_ATT: &str = "!GetAtt";
    pub const GET_AZS: &str = "!GetAZs";
    pub const IF: &str = "!If";
    pub const IMPORT_VALUE: &str = "!ImportValue";
    pub const JOIN: &str = "!Join";
    pub const SELECT: &str = "!Select";
    pub const SPLIT: &str = "!Split";
    pub const SUB: &str = "!Sub";
    pub const TRANSFORM: &str = "!Transform";
    pub const REF: &str = "!Ref";

    pub const AND: &str = "!And";
    pub const OR: &str = "!Or";
    pub const NOT: &str = "!Not";
    pub const EQUALS: &str = "!Equals";
    pub const CONDITION: &str = "!Condition";
    pub const EXISTS: &str = "!Exists";
}

/// Declared kind of a literal scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    String,
    Int,
    Bool,
}

/// Scalar value, kept as authored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralExpression {
    pub value: String,
    pub kind: LiteralKind,
}

impl LiteralExpression {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: LiteralKind::String,
        }
    }

    pub fn int(value: i64) -> Self {
        Self {
            value: value.to_string(),
            kind: LiteralKind::Int,
        }
    }

    pub fn bool(value: bool) -> Self {
        Self {
            value: value.to_string(),
            kind: LiteralKind::Bool,
        }
    }

    /// Integer value for int literals
    pub fn as_int(&self) -> Option<i64> {
        match self.kind {
            LiteralKind::Int => self.value.parse().ok(),
            _ => None,
        }
    }

    /// Boolean value for bool literals
    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            LiteralKind::Bool => self.value.parse().ok(),
            _ => None,
        }
    }
}

/// Ordered sequence of expressions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListExpression {
    pub items: Vec<NodeId>,
}

/// One key of an object expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    pub key: String,
    pub key_location: SourceLocation,
    pub value: NodeId,
}

/// Mapping of unique keys to expressions, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectExpression {
    pub entries: Vec<ObjectEntry>,
}

impl ObjectExpression {
    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry. Returns false and leaves the object unchanged when
    /// the key is already present.
    pub(crate) fn insert(&mut self, entry: ObjectEntry) -> bool {
        if self.contains_key(&entry.key) {
            return false;
        }
        self.entries.push(entry);
        true
    }
}

/// Intrinsic function expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionExpression {
    Base64 {
        value: NodeId,
    },
    Cidr {
        ip_block: NodeId,
        count: NodeId,
        cidr_bits: NodeId,
    },
    FindInMap {
        map_name: NodeId,
        top_level_key: NodeId,
        second_level_key: NodeId,
    },
    GetAtt {
        /// String literal naming the resource
        resource_name: NodeId,
        attribute_name: NodeId,
        referenced: Option<NodeId>,
    },
    GetAzs {
        region: NodeId,
    },
    If {
        /// Condition reference naming the condition item
        condition: NodeId,
        if_true: NodeId,
        if_false: NodeId,
    },
    ImportValue {
        shared_value: NodeId,
    },
    Join {
        delimiter: NodeId,
        values: NodeId,
    },
    Select {
        index: NodeId,
        values: NodeId,
    },
    Split {
        delimiter: NodeId,
        source: NodeId,
    },
    Sub {
        format_string: NodeId,
        parameters: Option<NodeId>,
    },
    Transform {
        macro_name: NodeId,
        parameters: NodeId,
    },
    Ref {
        /// String literal naming the referenced item
        resource_name: NodeId,
        referenced: Option<NodeId>,
    },
}

impl FunctionExpression {
    pub fn tag(&self) -> &'static str {
        match self {
            FunctionExpression::Base64 { .. } => tags::BASE64,
            FunctionExpression::Cidr { .. } => tags::CIDR,
            FunctionExpression::FindInMap { .. } => tags::FIND_IN_MAP,
            FunctionExpression::GetAtt { .. } => tags::GET_ATT,
            FunctionExpression::GetAzs { .. } => tags::GET_AZS,
            FunctionExpression::If { .. } => tags::IF,
            FunctionExpression::ImportValue { .. } => tags::IMPORT_VALUE,
            FunctionExpression::Join { .. } => tags::JOIN,
            FunctionExpression::Select { .. } => tags::SELECT,
            FunctionExpression::Split { .. } => tags::SPLIT,
            FunctionExpression::Sub { .. } => tags::SUB,
            FunctionExpression::Transform { .. } => tags::TRANSFORM,
            FunctionExpression::Ref { .. } => tags::REF,
        }
    }

    /// Operands in authored order
    pub fn operands(&self) -> Vec<NodeId> {
        match self {
            FunctionExpression::Base64 { value } => vec![*value],
            FunctionExpression::Cidr {
                ip_block,
                count,
                cidr_bits,
            } => vec![*ip_block, *count, *cidr_bits],
            FunctionExpression::FindInMap {
                map_name,
                top_level_key,
                second_level_key,
            } => vec![*map_name, *top_level_key, *second_level_key],
            FunctionExpression::GetAtt {
                resource_name,
                attribute_name,
                ..
            } => vec![*resource_name, *attribute_name],
            FunctionExpression::GetAzs { region } => vec![*region],
            FunctionExpression::If {
                condition,
                if_true,
                if_false,
            } => vec![*condition, *if_true, *if_false],
            FunctionExpression::ImportValue { shared_value } => vec![*shared_value],
            FunctionExpression::Join { delimiter, values } => vec![*delimiter, *values],
            FunctionExpression::Select { index, values } => vec![*index, *values],
            FunctionExpression::Split { delimiter, source } => vec![*delimiter, *source],
            FunctionExpression::Sub {
                format_string,
                parameters,
            } => std::iter::once(*format_string).chain(*parameters).collect(),
            FunctionExpression::Transform {
                macro_name,
                parameters,
            } => vec![*macro_name, *parameters],
            FunctionExpression::Ref { resource_name, .. } => vec![*resource_name],
        }
    }

    fn operands_mut(&mut self) -> Vec<&mut NodeId> {
        match self {
            FunctionExpression::Base64 { value } => vec![value],
            FunctionExpression::Cidr {
                ip_block,
                count,
                cidr_bits,
            } => vec![ip_block, count, cidr_bits],
            FunctionExpression::FindInMap {
                map_name,
                top_level_key,
                second_level_key,
            } => vec![map_name, top_level_key, second_level_key],
            FunctionExpression::GetAtt {
                resource_name,
                attribute_name,
                ..
            } => vec![resource_name, attribute_name],
            FunctionExpression::GetAzs { region } => vec![region],
            FunctionExpression::If {
                condition,
                if_true,
                if_false,
            } => vec![condition, if_true, if_false],
            FunctionExpression::ImportValue { shared_value } => vec![shared_value],
            FunctionExpression::Join { delimiter, values } => vec![delimiter, values],
            FunctionExpression::Select { index, values } => vec![index, values],
            FunctionExpression::Split { delimiter, source } => vec![delimiter, source],
            FunctionExpression::Sub {
                format_string,
                parameters,
            } => std::iter::once(format_string)
                .chain(parameters.as_mut())
                .collect(),
            FunctionExpression::Transform {
                macro_name,
                parameters,
            } => vec![macro_name, parameters],
            FunctionExpression::Ref { resource_name, .. } => vec![resource_name],
        }
    }

    fn remove_operand(&mut self, child: NodeId) -> ChildRemoval {
        if let FunctionExpression::Sub { parameters, .. } = self {
            if *parameters == Some(child) {
                *parameters = None;
                return ChildRemoval::Removed;
            }
        }
        if self.operands().contains(&child) {
            ChildRemoval::Required
        } else {
            ChildRemoval::NotFound
        }
    }
}

/// Condition operators and condition references
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionExpression {
    And {
        operands: Vec<NodeId>,
    },
    Or {
        operands: Vec<NodeId>,
    },
    Not {
        operand: NodeId,
    },
    Equals {
        left: NodeId,
        right: NodeId,
    },
    /// Named condition item
    Reference {
        name: NodeId,
        referenced: Option<NodeId>,
    },
    /// Existence check of a named item
    Exists {
        name: NodeId,
        referenced: Option<NodeId>,
    },
}

impl ConditionExpression {
    pub fn tag(&self) -> &'static str {
        match self {
            ConditionExpression::And { .. } => tags::AND,
            ConditionExpression::Or { .. } => tags::OR,
            ConditionExpression::Not { .. } => tags::NOT,
            ConditionExpression::Equals { .. } => tags::EQUALS,
            ConditionExpression::Reference { .. } => tags::CONDITION,
            ConditionExpression::Exists { .. } => tags::EXISTS,
        }
    }

    pub fn operands(&self) -> Vec<NodeId> {
        match self {
            ConditionExpression::And { operands } | ConditionExpression::Or { operands } => {
                operands.clone()
            }
            ConditionExpression::Not { operand } => vec![*operand],
            ConditionExpression::Equals { left, right } => vec![*left, *right],
            ConditionExpression::Reference { name, .. }
            | ConditionExpression::Exists { name, .. } => vec![*name],
        }
    }

    fn operands_mut(&mut self) -> Vec<&mut NodeId> {
        match self {
            ConditionExpression::And { operands } | ConditionExpression::Or { operands } => {
                operands.iter_mut().collect()
            }
            ConditionExpression::Not { operand } => vec![operand],
            ConditionExpression::Equals { left, right } => vec![left, right],
            ConditionExpression::Reference { name, .. }
            | ConditionExpression::Exists { name, .. } => vec![name],
        }
    }
}

/// Every expression node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Literal(LiteralExpression),
    List(ListExpression),
    Object(ObjectExpression),
    Function(FunctionExpression),
    Condition(ConditionExpression),
}

impl Expression {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Literal(_) => "Literal",
            Expression::List(_) => "List",
            Expression::Object(_) => "Object",
            Expression::Function(function) => function.tag(),
            Expression::Condition(condition) => condition.tag(),
        }
    }

    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Expression::Literal(_) => Vec::new(),
            Expression::List(list) => list.items.clone(),
            Expression::Object(object) => object.entries.iter().map(|entry| entry.value).collect(),
            Expression::Function(function) => function.operands(),
            Expression::Condition(condition) => condition.operands(),
        }
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut NodeId> {
        match self {
            Expression::Literal(_) => Vec::new(),
            Expression::List(list) => list.items.iter_mut().collect(),
            Expression::Object(object) => object
                .entries
                .iter_mut()
                .map(|entry| &mut entry.value)
                .collect(),
            Expression::Function(function) => function.operands_mut(),
            Expression::Condition(condition) => condition.operands_mut(),
        }
    }

    pub(crate) fn remove_child(&mut self, child: NodeId) -> ChildRemoval {
        match self {
            Expression::Literal(_) => ChildRemoval::NotFound,
            Expression::List(list) => match list.items.iter().position(|&item| item == child) {
                Some(index) => {
                    list.items.remove(index);
                    ChildRemoval::Removed
                }
                None => ChildRemoval::NotFound,
            },
            Expression::Object(object) => {
                match object.entries.iter().position(|entry| entry.value == child) {
                    Some(index) => {
                        object.entries.remove(index);
                        ChildRemoval::Removed
                    }
                    None => ChildRemoval::NotFound,
                }
            }
            Expression::Function(function) => function.remove_operand(child),
            Expression::Condition(condition) => {
                if condition.operands().contains(&child) {
                    ChildRemoval::Required
                } else {
                    ChildRemoval::NotFound
                }
            }
        }
    }

    /// `Some(target)` when this expression carries a reference
    pub fn reference_target(&self) -> Option<Option<NodeId>> {
        match self {
            Expression::Function(FunctionExpression::Ref { referenced, .. })
            | Expression::Function(FunctionExpression::GetAtt { referenced, .. })
            | Expression::Condition(ConditionExpression::Reference { referenced, .. })
            | Expression::Condition(ConditionExpression::Exists { referenced, .. }) => {
                Some(*referenced)
            }
            _ => None,
        }
    }

    pub(crate) fn reference_target_mut(&mut self) -> Option<&mut Option<NodeId>> {
        match self {
            Expression::Function(FunctionExpression::Ref { referenced, .. })
            | Expression::Function(FunctionExpression::GetAtt { referenced, .. })
            | Expression::Condition(ConditionExpression::Reference { referenced, .. })
            | Expression::Condition(ConditionExpression::Exists { referenced, .. }) => {
                Some(referenced)
            }
            _ => None,
        }
    }

    /// Literal node naming the reference target, for reference-bearing expressions
    pub fn reference_name(&self) -> Option<NodeId> {
        match self {
            Expression::Function(FunctionExpression::Ref { resource_name, .. })
            | Expression::Function(FunctionExpression::GetAtt { resource_name, .. }) => {
                Some(*resource_name)
            }
            Expression::Condition(ConditionExpression::Reference { name, .. })
            | Expression::Condition(ConditionExpression::Exists { name, .. }) => Some(*name),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&LiteralExpression> {
        match self {
            Expression::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListExpression> {
        match self {
            Expression::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectExpression> {
        match self {
            Expression::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionExpression> {
        match self {
            Expression::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_condition(&self) -> Option<&ConditionExpression> {
        match self {
            Expression::Condition(condition) => Some(condition),
            _ => None,
        }
    }
}

impl From<LiteralExpression> for Expression {
    fn from(literal: LiteralExpression) -> Self {
        Expression::Literal(literal)
    }
}

impl From<ListExpression> for Expression {
    fn from(list: ListExpression) -> Self {
        Expression::List(list)
    }
}

impl From<ObjectExpression> for Expression {
    fn from(object: ObjectExpression) -> Self {
        Expression::Object(object)
    }
}

impl From<FunctionExpression> for Expression {
    fn from(function: FunctionExpression) -> Self {
        Expression::Function(function)
    }
}

impl From<ConditionExpression> for Expression {
    fn from(condition: ConditionExpression) -> Self {
        Expression::Condition(condition)
    }
}
