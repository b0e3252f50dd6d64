//! Value and condition expression resolver
//!
//! Turns an untyped [`RawValue`] into expression nodes. Untagged values keep
//! their structure; tagged values become intrinsic function or condition
//! nodes after their operand shape is checked. A shape violation records one
//! diagnostic and yields no node.

use crate::error::Result;
use crate::raw::{RawEntry, RawKind, RawValue};
use cloudmod_core::ast::{
    tags, ConditionExpression, FunctionExpression, ListExpression, LiteralExpression, Node,
    NodeId, ObjectExpression, SyntaxTree,
};
use cloudmod_core::{Diagnostics, SourceLocation};
use std::collections::HashSet;

const MIN_CONDITION_OPERANDS: usize = 2;
const MAX_CONDITION_OPERANDS: usize = 10;

fn expects(tag: &str, count: usize) -> String {
    if count == 1 {
        format!("{tag} expects 1 parameter")
    } else {
        format!("{tag} expects {count} parameters")
    }
}

fn invalid_parameters(tag: &str) -> String {
    format!("invalid parameters for {tag} function")
}

/// Builds expression nodes into a tree, reporting shape errors
pub struct Resolver<'a> {
    tree: &'a mut SyntaxTree,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a mut SyntaxTree, diagnostics: &'a mut Diagnostics) -> Self {
        Self { tree, diagnostics }
    }

    /// Resolve a value expression
    pub fn resolve_value(&mut self, mut value: RawValue) -> Result<Option<NodeId>> {
        match value.tag.take() {
            None => self.resolve_structure(value).map(Some),
            Some(tag) => self.resolve_function(&tag, value),
        }
    }

    /// Resolve a condition expression
    pub fn resolve_condition(&mut self, mut value: RawValue) -> Result<Option<NodeId>> {
        let location = value.location.clone();
        let Some(tag) = value.tag.take() else {
            return match value.kind {
                RawKind::Scalar(name) => self.condition_reference(name, location).map(Some),
                _ => {
                    self.diagnostics
                        .error("expected a condition name or condition function", location);
                    Ok(None)
                }
            };
        };

        let condition = match tag.as_str() {
            tags::CONDITION => match value.kind {
                RawKind::Scalar(name) => return self.condition_reference(name, location).map(Some),
                _ => {
                    self.diagnostics.error(invalid_parameters(&tag), location);
                    return Ok(None);
                }
            },
            tags::EXISTS => match value.kind {
                RawKind::Scalar(name) => {
                    let name = self.literal(name, location.clone())?;
                    ConditionExpression::Exists {
                        name,
                        referenced: None,
                    }
                }
                _ => {
                    self.diagnostics.error(invalid_parameters(&tag), location);
                    return Ok(None);
                }
            },
            tags::AND | tags::OR => {
                let RawKind::Sequence(items) = value.kind else {
                    self.diagnostics.error(invalid_parameters(&tag), location);
                    return Ok(None);
                };
                if !(MIN_CONDITION_OPERANDS..=MAX_CONDITION_OPERANDS).contains(&items.len()) {
                    self.diagnostics.error(
                        format!(
                            "{tag} expects between {MIN_CONDITION_OPERANDS} and {MAX_CONDITION_OPERANDS} parameters"
                        ),
                        location,
                    );
                    return Ok(None);
                }
                let mut operands = Vec::with_capacity(items.len());
                for item in items {
                    let Some(operand) = self.resolve_condition(item)? else {
                        return Ok(None);
                    };
                    operands.push(operand);
                }
                if tag == tags::AND {
                    ConditionExpression::And { operands }
                } else {
                    ConditionExpression::Or { operands }
                }
            }
            tags::NOT => {
                let Some([operand]) = self.operands::<1>(&tag, value) else {
                    return Ok(None);
                };
                let Some(operand) = self.resolve_condition(operand)? else {
                    return Ok(None);
                };
                ConditionExpression::Not { operand }
            }
            tags::EQUALS => {
                let Some([left, right]) = self.operands::<2>(&tag, value) else {
                    return Ok(None);
                };
                let (Some(left), Some(right)) =
                    (self.resolve_value(left)?, self.resolve_value(right)?)
                else {
                    return Ok(None);
                };
                ConditionExpression::Equals { left, right }
            }
            _ => {
                self.diagnostics
                    .error(format!("unknown condition tag '{tag}'"), location);
                return Ok(None);
            }
        };
        self.add(condition, location).map(Some)
    }

    fn resolve_structure(&mut self, value: RawValue) -> Result<NodeId> {
        let RawValue { location, kind, .. } = value;
        match kind {
            RawKind::Scalar(value) => self.literal(value, location),
            RawKind::Sequence(items) => {
                let list = self.add(ListExpression::default(), location)?;
                for item in items {
                    if let Some(item) = self.resolve_value(item)? {
                        self.tree.push_child(list, item)?;
                    }
                }
                Ok(list)
            }
            RawKind::Mapping(entries) => self.resolve_object(entries, location),
        }
    }

    fn resolve_object(
        &mut self,
        entries: Vec<RawEntry>,
        location: SourceLocation,
    ) -> Result<NodeId> {
        let object = self.add(ObjectExpression::default(), location)?;
        let mut seen = HashSet::new();
        for RawEntry {
            key,
            key_location,
            value,
        } in entries
        {
            if !seen.insert(key.clone()) {
                self.diagnostics
                    .error(format!("duplicate key '{key}'"), key_location);
                continue;
            }
            if let Some(value) = self.resolve_value(value)? {
                self.tree.insert_entry(object, key, key_location, value)?;
            }
        }
        Ok(object)
    }

    fn resolve_function(&mut self, tag: &str, operand: RawValue) -> Result<Option<NodeId>> {
        let location = operand.location.clone();
        let function = match tag {
            tags::BASE64 => match self.resolve_value(operand)? {
                Some(value) => FunctionExpression::Base64 { value },
                None => return Ok(None),
            },
            tags::GET_AZS => match self.resolve_value(operand)? {
                Some(region) => FunctionExpression::GetAzs { region },
                None => return Ok(None),
            },
            tags::IMPORT_VALUE => match self.resolve_value(operand)? {
                Some(shared_value) => FunctionExpression::ImportValue { shared_value },
                None => return Ok(None),
            },
            tags::CIDR => {
                let Some([ip_block, count, cidr_bits]) = self.operands::<3>(tag, operand) else {
                    return Ok(None);
                };
                let Some([ip_block, count, cidr_bits]) =
                    self.resolve_all([ip_block, count, cidr_bits])?
                else {
                    return Ok(None);
                };
                FunctionExpression::Cidr {
                    ip_block,
                    count,
                    cidr_bits,
                }
            }
            tags::FIND_IN_MAP => {
                let Some(operands) = self.operands::<3>(tag, operand) else {
                    return Ok(None);
                };
                let Some([map_name, top_level_key, second_level_key]) = self.resolve_all(operands)?
                else {
                    return Ok(None);
                };
                FunctionExpression::FindInMap {
                    map_name,
                    top_level_key,
                    second_level_key,
                }
            }
            tags::GET_ATT => {
                if let Some(value) = operand.as_plain_scalar() {
                    let (resource, attribute) = value.split_once('.').unwrap_or((value, ""));
                    let (resource, attribute) = (resource.to_string(), attribute.to_string());
                    let resource_name = self.literal(resource, location.clone())?;
                    let attribute_name = self.literal(attribute, location.clone())?;
                    FunctionExpression::GetAtt {
                        resource_name,
                        attribute_name,
                        referenced: None,
                    }
                } else {
                    let Some([resource, attribute]) = self.operands::<2>(tag, operand) else {
                        return Ok(None);
                    };
                    let Some(resource_name) = self.first_literal(tag, resource)? else {
                        return Ok(None);
                    };
                    let Some(attribute_name) = self.resolve_value(attribute)? else {
                        return Ok(None);
                    };
                    FunctionExpression::GetAtt {
                        resource_name,
                        attribute_name,
                        referenced: None,
                    }
                }
            }
            tags::IF => {
                let Some([condition, if_true, if_false]) = self.operands::<3>(tag, operand) else {
                    return Ok(None);
                };
                let condition_location = condition.location.clone();
                let Some(name) = self.first_literal(tag, condition)? else {
                    return Ok(None);
                };
                let condition = self.add(
                    ConditionExpression::Reference {
                        name,
                        referenced: None,
                    },
                    condition_location,
                )?;
                let Some([if_true, if_false]) = self.resolve_all([if_true, if_false])? else {
                    return Ok(None);
                };
                FunctionExpression::If {
                    condition,
                    if_true,
                    if_false,
                }
            }
            tags::JOIN => {
                let Some([delimiter, values]) = self.operands::<2>(tag, operand) else {
                    return Ok(None);
                };
                let Some(delimiter) = self.first_literal(tag, delimiter)? else {
                    return Ok(None);
                };
                let Some(values) = self.resolve_value(values)? else {
                    return Ok(None);
                };
                FunctionExpression::Join { delimiter, values }
            }
            tags::SELECT => {
                let Some(operands) = self.operands::<2>(tag, operand) else {
                    return Ok(None);
                };
                let Some([index, values]) = self.resolve_all(operands)? else {
                    return Ok(None);
                };
                FunctionExpression::Select { index, values }
            }
            tags::SPLIT => {
                let Some([delimiter, source]) = self.operands::<2>(tag, operand) else {
                    return Ok(None);
                };
                let Some(delimiter) = self.first_literal(tag, delimiter)? else {
                    return Ok(None);
                };
                let Some(source) = self.resolve_value(source)? else {
                    return Ok(None);
                };
                FunctionExpression::Split { delimiter, source }
            }
            tags::SUB => {
                if let Some(value) = operand.as_plain_scalar() {
                    let format_string = self.literal(value.to_string(), location.clone())?;
                    FunctionExpression::Sub {
                        format_string,
                        parameters: None,
                    }
                } else {
                    let Some([format_string, parameters]) = self.operands::<2>(tag, operand) else {
                        return Ok(None);
                    };
                    let Some(format_string) = self.first_literal(tag, format_string)? else {
                        return Ok(None);
                    };
                    if !parameters.is_plain_mapping() {
                        self.diagnostics.error(
                            format!("{tag} second parameter must be a map"),
                            parameters.location,
                        );
                        return Ok(None);
                    }
                    let parameters = self.resolve_structure(parameters)?;
                    FunctionExpression::Sub {
                        format_string,
                        parameters: Some(parameters),
                    }
                }
            }
            tags::TRANSFORM => {
                let RawKind::Mapping(entries) = operand.kind else {
                    self.diagnostics.error(invalid_parameters(tag), location);
                    return Ok(None);
                };
                let mut name = None;
                let mut parameters = None;
                for entry in entries {
                    match entry.key.as_str() {
                        "Name" if name.is_none() => name = Some(entry.value),
                        "Parameters" if parameters.is_none() => parameters = Some(entry.value),
                        _ => {}
                    }
                }
                let Some(name) = name else {
                    self.diagnostics
                        .error(format!("{tag} missing 'Name'"), location);
                    return Ok(None);
                };
                let Some(macro_name) = name.as_plain_scalar().map(str::to_string) else {
                    self.diagnostics.error(
                        format!("{tag} 'Name' must be a literal value"),
                        name.location,
                    );
                    return Ok(None);
                };
                let Some(parameters) = parameters else {
                    self.diagnostics
                        .error(format!("{tag} missing 'Parameters'"), location);
                    return Ok(None);
                };
                if !parameters.is_plain_mapping() {
                    self.diagnostics.error(
                        format!("{tag} 'Parameters' must be a map"),
                        parameters.location,
                    );
                    return Ok(None);
                }
                let macro_name = self.literal(macro_name, name.location)?;
                let parameters = self.resolve_structure(parameters)?;
                FunctionExpression::Transform {
                    macro_name,
                    parameters,
                }
            }
            tags::REF => match operand.kind {
                RawKind::Scalar(name) => {
                    let resource_name = self.literal(name, location.clone())?;
                    FunctionExpression::Ref {
                        resource_name,
                        referenced: None,
                    }
                }
                _ => {
                    self.diagnostics.error(invalid_parameters(tag), location);
                    return Ok(None);
                }
            },
            _ => {
                self.diagnostics.error(format!("unknown tag '{tag}'"), location);
                return Ok(None);
            }
        };
        self.add(function, location).map(Some)
    }

    /// Split a list operand into exactly `N` elements
    fn operands<const N: usize>(&mut self, tag: &str, operand: RawValue) -> Option<[RawValue; N]> {
        match operand.kind {
            RawKind::Sequence(items) => match <[RawValue; N]>::try_from(items) {
                Ok(items) => Some(items),
                Err(_) => {
                    self.diagnostics.error(expects(tag, N), operand.location);
                    None
                }
            },
            _ => {
                self.diagnostics
                    .error(invalid_parameters(tag), operand.location);
                None
            }
        }
    }

    /// Resolve every operand; `None` if any of them fails
    fn resolve_all<const N: usize>(
        &mut self,
        operands: [RawValue; N],
    ) -> Result<Option<[NodeId; N]>> {
        let mut resolved = Vec::with_capacity(N);
        for operand in operands {
            match self.resolve_value(operand)? {
                Some(id) => resolved.push(id),
                None => return Ok(None),
            }
        }
        Ok(<[NodeId; N]>::try_from(resolved).ok())
    }

    fn first_literal(&mut self, tag: &str, operand: RawValue) -> Result<Option<NodeId>> {
        match (operand.tag, operand.kind) {
            (None, RawKind::Scalar(value)) => self.literal(value, operand.location).map(Some),
            _ => {
                self.diagnostics.error(
                    format!("{tag} first parameter must be a literal value"),
                    operand.location,
                );
                Ok(None)
            }
        }
    }

    fn condition_reference(&mut self, name: String, location: SourceLocation) -> Result<NodeId> {
        let name = self.literal(name, location.clone())?;
        self.add(
            ConditionExpression::Reference {
                name,
                referenced: None,
            },
            location,
        )
    }

    fn literal(&mut self, value: String, location: SourceLocation) -> Result<NodeId> {
        self.add(LiteralExpression::string(value), location)
    }

    fn add(&mut self, node: impl Into<Node>, location: SourceLocation) -> Result<NodeId> {
        Ok(self.tree.add(node, location)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudmod_core::ast::{to_yaml_value, Expression};

    fn at(line: usize) -> SourceLocation {
        SourceLocation::point("module.yml", line, 1)
    }

    fn s(value: &str) -> RawValue {
        RawValue::scalar(value, at(1))
    }

    fn seq(items: Vec<RawValue>) -> RawValue {
        RawValue {
            tag: None,
            location: at(1),
            kind: RawKind::Sequence(items),
        }
    }

    fn map(entries: Vec<(&str, RawValue)>) -> RawValue {
        RawValue {
            tag: None,
            location: at(1),
            kind: RawKind::Mapping(
                entries
                    .into_iter()
                    .map(|(key, value)| RawEntry {
                        key: key.to_string(),
                        key_location: at(2),
                        value,
                    })
                    .collect(),
            ),
        }
    }

    struct Fixture {
        tree: SyntaxTree,
        diagnostics: Diagnostics,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                tree: SyntaxTree::new(),
                diagnostics: Diagnostics::new(),
            }
        }

        fn value(&mut self, raw: RawValue) -> Option<NodeId> {
            Resolver::new(&mut self.tree, &mut self.diagnostics)
                .resolve_value(raw)
                .unwrap()
        }

        fn condition(&mut self, raw: RawValue) -> Option<NodeId> {
            Resolver::new(&mut self.tree, &mut self.diagnostics)
                .resolve_condition(raw)
                .unwrap()
        }

        fn function(&self, id: NodeId) -> &FunctionExpression {
            self.tree.expression(id).and_then(Expression::as_function).unwrap()
        }

        fn messages(&self) -> Vec<String> {
            self.diagnostics
                .iter()
                .map(|d| d.message.clone())
                .collect()
        }
    }

    #[test]
    fn test_join() {
        let mut fixture = Fixture::new();
        let id = fixture
            .value(seq(vec![s(","), seq(vec![s("a"), s("b")])]).with_tag("!Join"))
            .unwrap();

        let FunctionExpression::Join { delimiter, values } = *fixture.function(id) else {
            panic!("expected !Join");
        };
        assert_eq!(fixture.tree.literal_value(delimiter), Some(","));
        let items: Vec<_> = fixture
            .tree
            .list_items(values)
            .unwrap()
            .iter()
            .map(|&item| fixture.tree.literal_value(item).unwrap())
            .collect();
        assert_eq!(items, vec!["a", "b"]);
        assert!(fixture.diagnostics.is_empty());
    }

    #[test]
    fn test_get_att_string_forms() {
        let mut fixture = Fixture::new();

        let id = fixture.value(s("MyQueue.Arn").with_tag("!GetAtt")).unwrap();
        let FunctionExpression::GetAtt {
            resource_name,
            attribute_name,
            ..
        } = *fixture.function(id)
        else {
            panic!("expected !GetAtt");
        };
        assert_eq!(fixture.tree.literal_value(resource_name), Some("MyQueue"));
        assert_eq!(fixture.tree.literal_value(attribute_name), Some("Arn"));

        let id = fixture.value(s("MyQueue").with_tag("!GetAtt")).unwrap();
        let FunctionExpression::GetAtt { attribute_name, .. } = *fixture.function(id) else {
            panic!("expected !GetAtt");
        };
        assert_eq!(fixture.tree.literal_value(attribute_name), Some(""));

        let id = fixture
            .value(s("Table.StreamArn.Latest").with_tag("!GetAtt"))
            .unwrap();
        let FunctionExpression::GetAtt { attribute_name, .. } = *fixture.function(id) else {
            panic!("expected !GetAtt");
        };
        assert_eq!(fixture.tree.literal_value(attribute_name), Some("StreamArn.Latest"));
    }

    #[test]
    fn test_get_att_list_form_uses_second_element() {
        let mut fixture = Fixture::new();
        let id = fixture
            .value(seq(vec![s("MyQueue"), s("Arn")]).with_tag("!GetAtt"))
            .unwrap();
        let FunctionExpression::GetAtt { attribute_name, .. } = *fixture.function(id) else {
            panic!("expected !GetAtt");
        };
        assert_eq!(fixture.tree.literal_value(attribute_name), Some("Arn"));
    }

    #[test]
    fn test_sub_with_parameters() {
        let mut fixture = Fixture::new();
        let id = fixture
            .value(
                seq(vec![s("Hello ${Name}"), map(vec![("Name", s("World"))])]).with_tag("!Sub"),
            )
            .unwrap();
        let FunctionExpression::Sub {
            format_string,
            parameters: Some(parameters),
        } = *fixture.function(id)
        else {
            panic!("expected !Sub with parameters");
        };
        assert_eq!(fixture.tree.literal_value(format_string), Some("Hello ${Name}"));
        let object = fixture.tree.expression(parameters).unwrap().as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(
            object.get("Name").and_then(|v| fixture.tree.literal_value(v)),
            Some("World")
        );
    }

    #[test]
    fn test_sub_rejects_non_map_parameters() {
        let mut fixture = Fixture::new();
        let result = fixture.value(seq(vec![s("${A}"), s("x")]).with_tag("!Sub"));
        assert!(result.is_none());
        assert_eq!(fixture.messages(), vec!["!Sub second parameter must be a map"]);
    }

    #[test]
    fn test_if_wrong_arity() {
        let mut fixture = Fixture::new();
        let result = fixture.value(seq(vec![s("Cond"), s("A")]).with_tag("!If"));
        assert!(result.is_none());
        assert_eq!(fixture.messages(), vec!["!If expects 3 parameters"]);
    }

    #[test]
    fn test_if_condition_becomes_reference() {
        let mut fixture = Fixture::new();
        let id = fixture
            .value(seq(vec![s("IsProd"), s("a"), s("b")]).with_tag("!If"))
            .unwrap();
        let FunctionExpression::If { condition, .. } = *fixture.function(id) else {
            panic!("expected !If");
        };
        assert_eq!(fixture.tree.reference_name(condition), Some("IsProd"));
        assert_eq!(fixture.tree.parent(condition), Some(id));
    }

    #[test]
    fn test_first_parameter_must_be_literal() {
        let mut fixture = Fixture::new();
        let result = fixture.value(
            seq(vec![s("Sep").with_tag("!Ref"), seq(vec![])]).with_tag("!Join"),
        );
        assert!(result.is_none());
        assert_eq!(
            fixture.messages(),
            vec!["!Join first parameter must be a literal value"]
        );
    }

    #[test]
    fn test_invalid_shapes_report_once() {
        let cases = vec![
            (s("x").with_tag("!Cidr"), "invalid parameters for !Cidr function"),
            (seq(vec![s("a")]).with_tag("!Select"), "!Select expects 2 parameters"),
            (map(vec![]).with_tag("!Ref"), "invalid parameters for !Ref function"),
            (seq(vec![]).with_tag("!FindInMap"), "!FindInMap expects 3 parameters"),
            (s("x").with_tag("!Transform"), "invalid parameters for !Transform function"),
            (
                map(vec![("Parameters", map(vec![]))]).with_tag("!Transform"),
                "!Transform missing 'Name'",
            ),
            (map(vec![("Name", s("M"))]).with_tag("!Transform"), "!Transform missing 'Parameters'"),
            (s("x").with_tag("!Bogus"), "unknown tag '!Bogus'"),
            (s("IsProd").with_tag("!Condition"), "unknown tag '!Condition'"),
        ];
        for (raw, message) in cases {
            let mut fixture = Fixture::new();
            assert!(fixture.value(raw).is_none(), "{message}");
            assert_eq!(fixture.messages(), vec![message]);
        }
    }

    #[test]
    fn test_transform() {
        let mut fixture = Fixture::new();
        let id = fixture
            .value(
                map(vec![
                    ("Name", s("AWS::Include")),
                    ("Parameters", map(vec![("Location", s("s3://b/k"))])),
                ])
                .with_tag("!Transform"),
            )
            .unwrap();
        let FunctionExpression::Transform { macro_name, .. } = *fixture.function(id) else {
            panic!("expected !Transform");
        };
        assert_eq!(fixture.tree.literal_value(macro_name), Some("AWS::Include"));
    }

    #[test]
    fn test_single_operand_functions_wrap_any_value() {
        let mut fixture = Fixture::new();
        let id = fixture
            .value(seq(vec![s("a")]).with_tag("!Base64"))
            .unwrap();
        assert_eq!(fixture.function(id).tag(), "!Base64");

        let id = fixture.value(s("").with_tag("!GetAZs")).unwrap();
        assert_eq!(fixture.function(id).tag(), "!GetAZs");
    }

    #[test]
    fn test_object_duplicate_key_keeps_first() {
        let mut fixture = Fixture::new();
        let id = fixture
            .value(map(vec![("A", s("1")), ("A", s("2"))]))
            .unwrap();
        let object = fixture.tree.expression(id).unwrap().as_object().unwrap();
        assert_eq!(
            object.get("A").and_then(|v| fixture.tree.literal_value(v)),
            Some("1")
        );
        assert_eq!(fixture.messages(), vec!["duplicate key 'A'"]);
    }

    #[test]
    fn test_nested_failure_drops_list_item() {
        let mut fixture = Fixture::new();
        let id = fixture
            .value(seq(vec![s("a"), s("x").with_tag("!Nope"), s("b")]))
            .unwrap();
        assert_eq!(fixture.tree.list_items(id).map(<[NodeId]>::len), Some(2));
        assert_eq!(fixture.diagnostics.error_count(), 1);
    }

    #[test]
    fn test_conditions() {
        let mut fixture = Fixture::new();
        let id = fixture
            .condition(
                seq(vec![
                    s("IsProd"),
                    seq(vec![s("IsEast").with_tag("!Condition")]).with_tag("!Not"),
                    seq(vec![s("Env").with_tag("!Ref"), s("prod")]).with_tag("!Equals"),
                ])
                .with_tag("!And"),
            )
            .unwrap();

        let condition = fixture.tree.expression(id).unwrap().as_condition().unwrap();
        let ConditionExpression::And { operands } = condition else {
            panic!("expected !And");
        };
        assert_eq!(operands.len(), 3);
        assert_eq!(fixture.tree.reference_name(operands[0]), Some("IsProd"));
        assert!(fixture.diagnostics.is_empty());
    }

    #[test]
    fn test_condition_shape_errors() {
        let mut fixture = Fixture::new();
        assert!(fixture
            .condition(seq(vec![s("A")]).with_tag("!Or"))
            .is_none());
        assert!(fixture
            .condition(seq(vec![s("A"), s("B")]).with_tag("!Not"))
            .is_none());
        assert!(fixture.condition(s("A").with_tag("!Join")).is_none());
        assert_eq!(
            fixture.messages(),
            vec![
                "!Or expects between 2 and 10 parameters",
                "!Not expects 1 parameter",
                "unknown condition tag '!Join'",
            ]
        );
    }

    #[test]
    fn test_operands_round_trip() {
        let mut fixture = Fixture::new();
        let id = fixture
            .value(
                seq(vec![s("10.0.0.0/16"), s("6"), s("5")]).with_tag("!Cidr"),
            )
            .unwrap();
        let value = to_yaml_value(&fixture.tree, id).unwrap();
        let expected: serde_yaml::Value =
            serde_yaml::from_str("!Cidr ['10.0.0.0/16', '6', '5']").unwrap();
        assert_eq!(value, expected);
    }
}
