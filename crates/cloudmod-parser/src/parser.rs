//! Structural parser
//!
//! Walks the event stream and builds declarations from the schema registry.
//! The first key of every declaration mapping selects its schema; the
//! remaining keys are checked against it and parsed by the sub-parser of
//! their value kind. Structural mistakes are reported and the offending
//! subtree skipped, so parsing always resumes at the next sibling.

use crate::config::ParserOptions;
use crate::error::{ParseError, Result};
use crate::events::{EventStream, MarkedEvent, ParsingEvent};
use crate::raw::{RawEntry, RawKind, RawValue};
use crate::resolver::Resolver;
use crate::schema::{Schema, SchemaRegistry, SchemaSet};
use cloudmod_core::ast::{
    Declaration, DeclarationKind, DeclarationType, LiteralExpression, NodeCollection, NodeId,
    SyntaxTree, ValueKind,
};
use cloudmod_core::{Diagnostics, SourceLocation};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Mapping,
    Sequence,
}

/// Declaration whose keys are still being read
struct DeclarationDraft {
    schema: Arc<Schema>,
    keyword: Option<NodeId>,
    values: Vec<(&'static str, NodeId)>,
    seen: HashSet<&'static str>,
}

impl DeclarationDraft {
    fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            keyword: None,
            values: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Mandatory keys not seen, in sorted order
    fn missing_keys(&self) -> Vec<&'static str> {
        self.schema
            .mandatory_keys
            .iter()
            .copied()
            .filter(|key| !self.seen.contains(key))
            .collect()
    }
}

/// Schema-driven parser over an event stream
pub struct Parser<S: EventStream> {
    file_path: String,
    events: S,
    options: ParserOptions,
    registry: &'static SchemaRegistry,
    tree: SyntaxTree,
    diagnostics: Diagnostics,
    depth: usize,
}

impl<S: EventStream> Parser<S> {
    pub fn new(file_path: impl Into<String>, events: S, options: ParserOptions) -> Self {
        Self {
            file_path: file_path.into(),
            events,
            options,
            registry: SchemaRegistry::global(),
            tree: SyntaxTree::new(),
            diagnostics: Diagnostics::new(),
            depth: 0,
        }
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (SyntaxTree, Diagnostics) {
        (self.tree, self.diagnostics)
    }

    /// Consume stream and document start
    pub fn start(&mut self) -> Result<()> {
        self.expect_event("stream start", |event| {
            matches!(event, ParsingEvent::StreamStart)
        })?;
        self.expect_event("document start", |event| {
            matches!(event, ParsingEvent::DocumentStart)
        })
    }

    /// Consume document and stream end
    pub fn end(&mut self) -> Result<()> {
        self.expect_event("document end", |event| {
            matches!(event, ParsingEvent::DocumentEnd)
        })?;
        self.expect_event("stream end", |event| matches!(event, ParsingEvent::StreamEnd))
    }

    /// Parse a declaration mapping of the given type.
    ///
    /// Returns `None` when the value is not a map, when its first key selects
    /// no schema, or when its keyword value cannot be parsed.
    pub fn parse_declaration(&mut self, target: DeclarationType) -> Result<Option<NodeId>> {
        let registry = self.registry;
        let Some(set) = registry.schema_set(target) else {
            let location = self.current_location()?;
            self.diagnostics
                .error(format!("no parser defined for {target:?}"), location);
            self.skip()?;
            return Ok(None);
        };
        let start = self.current()?.clone();
        if !matches!(start.event, ParsingEvent::MappingStart { tag: None }) {
            self.diagnostics
                .error("expected a map", start.location(&self.file_path));
            self.skip()?;
            return Ok(None);
        }
        if !self.enter()? {
            return Ok(None);
        }
        self.events.advance();
        let declaration = self.parse_declaration_entries(set, &start)?;
        self.leave();
        Ok(declaration)
    }

    fn parse_declaration_entries(
        &mut self,
        set: &SchemaSet,
        start: &MarkedEvent,
    ) -> Result<Option<NodeId>> {
        let mut draft: Option<DeclarationDraft> = None;
        while !self.at_close(Container::Mapping)? {
            let Some((key, key_location)) = self.read_key()? else {
                continue;
            };
            if draft.is_none() {
                let Some(schema) = set.resolve_first(&key) else {
                    self.diagnostics
                        .error(format!("unexpected item keyword '{key}'"), key_location);
                    self.skip()?;
                    self.skip_remaining_entries()?;
                    self.events.advance();
                    return Ok(None);
                };
                log::debug!(
                    "resolved {} declaration from key '{}'",
                    schema.kind.name(),
                    key
                );
                draft = Some(DeclarationDraft::new(Arc::clone(schema)));
            }
            let Some(current) = draft.as_mut() else {
                continue;
            };

            let Some(property) = current.schema.property(&key).copied() else {
                self.diagnostics
                    .error(format!("unexpected key '{key}'"), key_location);
                self.skip()?;
                continue;
            };
            if !current.seen.insert(property.key) {
                self.diagnostics
                    .error(format!("duplicate key '{key}'"), key_location);
                self.skip()?;
                continue;
            }

            let value = self.parse_value_of(property.value)?;
            if current.schema.is_keyword(property.key) {
                match value {
                    Some(value) => current.keyword = Some(value),
                    None => {
                        log::trace!("dropping declaration with unparsable '{key}'");
                        self.skip_remaining_entries()?;
                        self.events.advance();
                        return Ok(None);
                    }
                }
            } else if let Some(value) = value {
                current.values.push((property.key, value));
            }
        }

        let start_location = start.location(&self.file_path);
        let location = start_location.through(&self.current_location()?);
        self.events.advance();

        let draft = match draft {
            Some(draft) => draft,
            None => match set {
                SchemaSet::Unkeyed(schema) if schema.keyword.is_none() => {
                    DeclarationDraft::new(Arc::clone(schema))
                }
                SchemaSet::Unkeyed(schema) => {
                    let missing: Vec<_> = schema.mandatory_keys.iter().copied().collect();
                    self.report_missing_keys(&missing, start_location);
                    return Ok(None);
                }
                SchemaSet::Keyed(_) => {
                    self.diagnostics
                        .error("expected a declaration keyword", start_location);
                    return Ok(None);
                }
            },
        };

        let missing = draft.missing_keys();
        self.report_missing_keys(&missing, start_location);

        let kind = draft.schema.kind;
        let Some(declaration) = Declaration::new(kind, draft.keyword) else {
            return Ok(None);
        };
        let id = self.tree.add(declaration, location.clone())?;
        for (key, value) in draft.values {
            self.tree.set_property(id, key, Some(value))?;
        }
        self.apply_defaults(id, kind, &draft.seen, location)?;
        Ok(Some(id))
    }

    fn apply_defaults(
        &mut self,
        id: NodeId,
        kind: DeclarationKind,
        seen: &HashSet<&'static str>,
        location: SourceLocation,
    ) -> Result<()> {
        if kind == DeclarationKind::Module && !seen.contains("Version") {
            let version = self.tree.add_literal(
                LiteralExpression::string(self.options.default_module_version.clone()),
                location,
            )?;
            self.tree.set_property(id, "Version", Some(version))?;
        }
        Ok(())
    }

    fn report_missing_keys(&mut self, missing: &[&'static str], location: SourceLocation) {
        if !missing.is_empty() {
            self.diagnostics
                .error(format!("missing keys: {}", missing.join(", ")), location);
        }
    }

    /// Parse a sequence of declarations into a collection node.
    ///
    /// Elements that fail to parse are left out; their siblings are kept.
    pub fn parse_declaration_list(&mut self, target: DeclarationType) -> Result<Option<NodeId>> {
        if !self.at_untagged(Container::Sequence)? {
            let location = self.current_location()?;
            self.diagnostics.error("expected a sequence", location);
            self.skip()?;
            return Ok(None);
        }
        let start_location = self.current_location()?;
        if !self.enter()? {
            return Ok(None);
        }
        self.events.advance();

        let mut items = Vec::new();
        let mut names = HashSet::new();
        while !self.at_close(Container::Sequence)? {
            let Some(item) = self.parse_declaration(target)? else {
                continue;
            };
            if self.options.enforce_unique_names
                && self.tree.get(item).map(|n| n.is_item_declaration()) == Some(true)
            {
                if let Some(name) = self.tree.declaration_name(item) {
                    if !names.insert(name.to_string()) {
                        let location = self.tree.location(item).cloned().unwrap_or_default();
                        self.diagnostics
                            .error(format!("duplicate item name '{name}'"), location);
                        continue;
                    }
                }
            }
            items.push(item);
        }
        let location = start_location.through(&self.current_location()?);
        self.events.advance();
        self.leave();

        let collection = self.tree.add(NodeCollection::new(items), location)?;
        Ok(Some(collection))
    }

    /// Dispatch to the sub-parser for a property's value kind
    pub fn parse_value_of(&mut self, kind: ValueKind) -> Result<Option<NodeId>> {
        match kind {
            ValueKind::String => self.parse_string_literal(),
            ValueKind::Int => self.parse_int_literal(),
            ValueKind::Bool => self.parse_bool_literal(),
            ValueKind::Expression => self.parse_value_expression(),
            ValueKind::Condition => self.parse_condition_expression(),
            ValueKind::Object => self.parse_container_expression(Container::Mapping),
            ValueKind::List => self.parse_container_expression(Container::Sequence),
            ValueKind::StringList => self.parse_string_list(),
            ValueKind::Declaration(target) => self.parse_declaration(target),
            ValueKind::DeclarationList(target) => self.parse_declaration_list(target),
        }
    }

    /// Parse any value, resolving intrinsic function tags
    pub fn parse_value_expression(&mut self) -> Result<Option<NodeId>> {
        let Some(value) = self.read_value()? else {
            return Ok(None);
        };
        Resolver::new(&mut self.tree, &mut self.diagnostics).resolve_value(value)
    }

    /// Parse a condition name or condition function
    pub fn parse_condition_expression(&mut self) -> Result<Option<NodeId>> {
        let Some(value) = self.read_value()? else {
            return Ok(None);
        };
        Resolver::new(&mut self.tree, &mut self.diagnostics).resolve_condition(value)
    }

    fn parse_container_expression(&mut self, container: Container) -> Result<Option<NodeId>> {
        if !self.at_untagged(container)? {
            let message = match container {
                Container::Mapping => "expected a map",
                Container::Sequence => "expected a sequence",
            };
            let location = self.current_location()?;
            self.diagnostics.error(message, location);
            self.skip()?;
            return Ok(None);
        }
        self.parse_value_expression()
    }

    pub fn parse_string_literal(&mut self) -> Result<Option<NodeId>> {
        self.parse_scalar("expected a literal string", |value| {
            Some(LiteralExpression::string(value))
        })
    }

    pub fn parse_int_literal(&mut self) -> Result<Option<NodeId>> {
        self.parse_scalar("expected a literal integer", |value| {
            value.trim().parse().ok().map(LiteralExpression::int)
        })
    }

    pub fn parse_bool_literal(&mut self) -> Result<Option<NodeId>> {
        self.parse_scalar("expected a literal boolean", |value| {
            match value.trim().to_ascii_lowercase().as_str() {
                "true" => Some(LiteralExpression::bool(true)),
                "false" => Some(LiteralExpression::bool(false)),
                _ => None,
            }
        })
    }

    fn parse_scalar<F>(&mut self, message: &'static str, convert: F) -> Result<Option<NodeId>>
    where
        F: FnOnce(&str) -> Option<LiteralExpression>,
    {
        let event = self.current()?;
        let location = event.location(&self.file_path);
        let literal = match &event.event {
            ParsingEvent::Scalar { value, tag: None } => convert(value),
            _ => None,
        };
        match literal {
            Some(literal) => {
                self.events.advance();
                Ok(Some(self.tree.add_literal(literal, location)?))
            }
            None => {
                self.diagnostics.error(message, location);
                self.skip()?;
                Ok(None)
            }
        }
    }

    /// Parse a sequence of string literals into a collection node
    pub fn parse_string_list(&mut self) -> Result<Option<NodeId>> {
        if !self.at_untagged(Container::Sequence)? {
            let location = self.current_location()?;
            self.diagnostics.error("expected a sequence", location);
            self.skip()?;
            return Ok(None);
        }
        let start_location = self.current_location()?;
        if !self.enter()? {
            return Ok(None);
        }
        self.events.advance();

        let mut items = Vec::new();
        while !self.at_close(Container::Sequence)? {
            if let Some(item) = self.parse_string_literal()? {
                items.push(item);
            }
        }
        let location = start_location.through(&self.current_location()?);
        self.events.advance();
        self.leave();

        Ok(Some(self.tree.add(NodeCollection::new(items), location)?))
    }

    /// Read the value at the cursor without interpreting tags
    pub fn read_value(&mut self) -> Result<Option<RawValue>> {
        let event = self.current()?.clone();
        let location = event.location(&self.file_path);
        match event.event {
            ParsingEvent::Scalar { value, tag } => {
                self.events.advance();
                Ok(Some(RawValue {
                    tag,
                    location,
                    kind: RawKind::Scalar(value),
                }))
            }
            ParsingEvent::SequenceStart { tag } => {
                if !self.enter()? {
                    return Ok(None);
                }
                self.events.advance();
                let mut items = Vec::new();
                while !self.at_close(Container::Sequence)? {
                    if let Some(item) = self.read_value()? {
                        items.push(item);
                    }
                }
                let location = location.through(&self.current_location()?);
                self.events.advance();
                self.leave();
                Ok(Some(RawValue {
                    tag,
                    location,
                    kind: RawKind::Sequence(items),
                }))
            }
            ParsingEvent::MappingStart { tag } => {
                if !self.enter()? {
                    return Ok(None);
                }
                self.events.advance();
                let mut entries = Vec::new();
                while !self.at_close(Container::Mapping)? {
                    let Some((key, key_location)) = self.read_key()? else {
                        continue;
                    };
                    if let Some(value) = self.read_value()? {
                        entries.push(RawEntry {
                            key,
                            key_location,
                            value,
                        });
                    }
                }
                let location = location.through(&self.current_location()?);
                self.events.advance();
                self.leave();
                Ok(Some(RawValue {
                    tag,
                    location,
                    kind: RawKind::Mapping(entries),
                }))
            }
            _ => {
                self.diagnostics
                    .error("expected a map, sequence, or literal", location);
                self.skip()?;
                Ok(None)
            }
        }
    }

    /// Read a mapping key. Non-scalar keys are reported and skipped with
    /// their value.
    pub fn read_key(&mut self) -> Result<Option<(String, SourceLocation)>> {
        let event = self.current()?;
        let location = event.location(&self.file_path);
        if let ParsingEvent::Scalar { value, .. } = &event.event {
            let key = value.clone();
            self.events.advance();
            return Ok(Some((key, location)));
        }
        self.diagnostics.error("expected a literal key", location);
        self.skip()?;
        self.skip()?;
        Ok(None)
    }

    fn skip_remaining_entries(&mut self) -> Result<()> {
        while !self.at_close(Container::Mapping)? {
            self.skip()?;
            self.skip()?;
        }
        Ok(())
    }

    fn skip(&mut self) -> Result<()> {
        if let Some(event) = self.events.current() {
            log::trace!(
                "skipping {} at {}:{}",
                event.event.name(),
                event.start.line,
                event.start.column
            );
        }
        self.events.skip_this_and_nested()
    }

    fn enter(&mut self) -> Result<bool> {
        if self.depth >= self.options.max_depth {
            let location = self.current_location()?;
            self.diagnostics
                .error("maximum nesting depth exceeded", location);
            self.skip()?;
            return Ok(false);
        }
        self.depth += 1;
        Ok(true)
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn current(&self) -> Result<&MarkedEvent> {
        self.events
            .current()
            .ok_or(ParseError::UnexpectedEndOfStream)
    }

    fn current_location(&self) -> Result<SourceLocation> {
        Ok(self.current()?.location(&self.file_path))
    }

    fn at_untagged(&self, container: Container) -> Result<bool> {
        Ok(match (&self.current()?.event, container) {
            (ParsingEvent::MappingStart { tag: None }, Container::Mapping) => true,
            (ParsingEvent::SequenceStart { tag: None }, Container::Sequence) => true,
            _ => false,
        })
    }

    /// True at the close event of `container`; framing or mismatched close
    /// events mean the document is malformed.
    fn at_close(&self, container: Container) -> Result<bool> {
        let event = self.current()?;
        match (&event.event, container) {
            (ParsingEvent::MappingEnd, Container::Mapping)
            | (ParsingEvent::SequenceEnd, Container::Sequence) => Ok(true),
            (ParsingEvent::MappingEnd, _) | (ParsingEvent::SequenceEnd, _) => {
                Err(ParseError::UnexpectedEvent {
                    expected: match container {
                        Container::Mapping => "map end",
                        Container::Sequence => "sequence end",
                    },
                    found: event.event.name().to_string(),
                    line: event.start.line,
                    column: event.start.column,
                })
            }
            (
                ParsingEvent::StreamStart
                | ParsingEvent::StreamEnd
                | ParsingEvent::DocumentStart
                | ParsingEvent::DocumentEnd,
                _,
            ) => Err(ParseError::UnexpectedEndOfStream),
            _ => Ok(false),
        }
    }

    fn expect_event(
        &mut self,
        expected: &'static str,
        matches: fn(&ParsingEvent) -> bool,
    ) -> Result<()> {
        let event = self.current()?;
        if !matches(&event.event) {
            return Err(ParseError::UnexpectedEvent {
                expected,
                found: event.event.name().to_string(),
                line: event.start.line,
                column: event.start.column,
            });
        }
        self.events.advance();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventCursor;
    use crate::yaml::tokenize;
    use cloudmod_core::ast::{DeclarationFamily, Expression, Node};

    const ITEM: DeclarationType = DeclarationType::Abstract(DeclarationFamily::Item);

    fn parser(source: &str) -> Parser<EventCursor> {
        let mut parser = Parser::new(
            "test.yml",
            tokenize(source).unwrap(),
            ParserOptions::default(),
        );
        parser.start().unwrap();
        parser
    }

    fn messages(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics.iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_item_dispatch_by_first_key() {
        let mut parser = parser("Variable: Greeting\nValue: hello\n");
        let id = parser.parse_declaration(ITEM).unwrap().unwrap();
        parser.end().unwrap();

        let tree = parser.tree();
        let declaration = tree.declaration(id).unwrap();
        assert_eq!(declaration.kind(), DeclarationKind::Variable);
        assert_eq!(tree.declaration_name(id), Some("Greeting"));
        let value = declaration.property("Value").unwrap();
        assert_eq!(tree.literal_value(value), Some("hello"));
        assert!(parser.diagnostics().is_empty());
    }

    #[test]
    fn test_unknown_first_key_skips_mapping() {
        let mut parser = parser("Bogus: x\nValue: [1, 2]\n");
        assert_eq!(parser.parse_declaration(ITEM).unwrap(), None);
        parser.end().unwrap();
        assert_eq!(
            messages(parser.diagnostics()),
            vec!["unexpected item keyword 'Bogus'"]
        );
    }

    #[test]
    fn test_keyword_must_come_first() {
        let mut parser = parser("Value: hello\nVariable: Greeting\n");
        assert_eq!(parser.parse_declaration(ITEM).unwrap(), None);
        parser.end().unwrap();
        assert_eq!(
            messages(parser.diagnostics()),
            vec!["unexpected item keyword 'Value'"]
        );
    }

    #[test]
    fn test_unknown_and_duplicate_keys() {
        let mut parser = parser(
            "Variable: Greeting\nValue: first\nColor: red\nValue: second\n",
        );
        let id = parser.parse_declaration(ITEM).unwrap().unwrap();
        parser.end().unwrap();

        assert_eq!(
            messages(parser.diagnostics()),
            vec!["unexpected key 'Color'", "duplicate key 'Value'"]
        );
        let tree = parser.tree();
        let value = tree.declaration(id).unwrap().property("Value").unwrap();
        assert_eq!(tree.literal_value(value), Some("first"));
    }

    #[test]
    fn test_missing_keys_are_aggregated_and_sorted() {
        let mut parser = parser("Function: Worker\nDescription: does work\n");
        let id = parser.parse_declaration(ITEM).unwrap();
        parser.end().unwrap();

        assert!(id.is_some());
        assert_eq!(
            messages(parser.diagnostics()),
            vec!["missing keys: Memory, Timeout"]
        );
        let location = &parser.diagnostics().messages()[0].location;
        assert_eq!((location.line_start, location.column_start), (1, 1));
    }

    #[test]
    fn test_not_a_map() {
        let mut parser = parser("- Variable: A\n");
        assert_eq!(parser.parse_declaration(ITEM).unwrap(), None);
        parser.end().unwrap();
        assert_eq!(messages(parser.diagnostics()), vec!["expected a map"]);
    }

    #[test]
    fn test_declaration_list_recovers_per_element() {
        let mut parser = parser(
            "- Variable: A\n  Value: a\n- Nonsense: 1\n- just a string\n- Variable: B\n  Value: b\n",
        );
        let id = parser.parse_declaration_list(ITEM).unwrap().unwrap();
        parser.end().unwrap();

        let tree = parser.tree();
        let names: Vec<_> = tree
            .list_items(id)
            .unwrap()
            .iter()
            .map(|&item| tree.declaration_name(item).unwrap())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(
            messages(parser.diagnostics()),
            vec!["unexpected item keyword 'Nonsense'", "expected a map"]
        );
    }

    #[test]
    fn test_duplicate_item_names() {
        let mut parser = parser("- Variable: A\n  Value: 1\n- Resource: A\n");
        let id = parser.parse_declaration_list(ITEM).unwrap().unwrap();
        parser.end().unwrap();

        assert_eq!(parser.tree().list_items(id).map(<[NodeId]>::len), Some(1));
        assert_eq!(
            messages(parser.diagnostics()),
            vec!["duplicate item name 'A'"]
        );
    }

    #[test]
    fn test_typed_literals() {
        let mut parser = parser(
            "Parameter: Size\nNoEcho: TRUE\nMaxLength: 12\nMinLength: twelve\n",
        );
        let id = parser.parse_declaration(ITEM).unwrap().unwrap();
        parser.end().unwrap();

        let tree = parser.tree();
        let declaration = tree.declaration(id).unwrap();
        let no_echo = declaration.property("NoEcho").unwrap();
        assert_eq!(tree.literal(no_echo).and_then(|l| l.as_bool()), Some(true));
        let max_length = declaration.property("MaxLength").unwrap();
        assert_eq!(tree.literal(max_length).and_then(|l| l.as_int()), Some(12));
        assert_eq!(declaration.property("MinLength"), None);
        assert_eq!(
            messages(parser.diagnostics()),
            vec!["expected a literal integer"]
        );
    }

    #[test]
    fn test_tagged_keyword_drops_declaration() {
        let mut parser =
            parser("- Variable: !Ref Other\n  Value: 1\n- Variable: Kept\n  Value: 2\n");
        let id = parser.parse_declaration_list(ITEM).unwrap().unwrap();
        parser.end().unwrap();

        let tree = parser.tree();
        assert_eq!(tree.list_items(id).map(<[NodeId]>::len), Some(1));
        assert_eq!(
            messages(parser.diagnostics()),
            vec!["expected a literal string"]
        );
    }

    #[test]
    fn test_vpc_accepts_any_first_key() {
        let mut parser = parser("SubnetIds: !Split [',', abc]\n");
        let id = parser
            .parse_declaration(DeclarationType::Concrete(DeclarationKind::Vpc))
            .unwrap()
            .unwrap();
        parser.end().unwrap();

        let tree = parser.tree();
        let subnets = tree.declaration(id).unwrap().property("SubnetIds").unwrap();
        assert!(matches!(
            tree.expression(subnets),
            Some(Expression::Function(_))
        ));
        assert_eq!(
            messages(parser.diagnostics()),
            vec!["missing keys: SecurityGroupIds"]
        );
    }

    #[test]
    fn test_empty_mappings() {
        let mut parser = parser("- {}\n");
        let id = parser.parse_declaration_list(ITEM).unwrap().unwrap();
        parser.end().unwrap();
        assert_eq!(parser.tree().list_items(id).map(<[NodeId]>::len), Some(0));
        assert_eq!(
            messages(parser.diagnostics()),
            vec!["expected a declaration keyword"]
        );

        let mut parser = self::parser("{}\n");
        let id = parser
            .parse_declaration(DeclarationType::Concrete(DeclarationKind::Using))
            .unwrap();
        assert_eq!(id, None);
        assert_eq!(messages(parser.diagnostics()), vec!["missing keys: Module"]);
    }

    #[test]
    fn test_object_and_list_properties_require_shape() {
        let mut parser = parser(
            "Mapping: Regions\nValue: [a]\nDescription: !Sub x\n",
        );
        let id = parser.parse_declaration(ITEM).unwrap().unwrap();
        parser.end().unwrap();

        assert_eq!(
            messages(parser.diagnostics()),
            vec!["expected a map", "expected a literal string"]
        );
        assert_eq!(
            parser.tree().declaration(id).unwrap().property("Value"),
            None
        );
        assert!(matches!(
            parser.tree().get(id),
            Some(Node::Declaration(Declaration::Mapping(_)))
        ));
    }

    #[test]
    fn test_depth_limit() {
        let options = ParserOptions::default().with_max_depth(3);
        let mut parser = Parser::new(
            "test.yml",
            tokenize("Variable: Deep\nValue: [[[[x]]]]\n").unwrap(),
            options,
        );
        parser.start().unwrap();
        let id = parser.parse_declaration(ITEM).unwrap().unwrap();
        parser.end().unwrap();

        assert_eq!(
            messages(parser.diagnostics()),
            vec!["maximum nesting depth exceeded"]
        );
        assert!(parser.tree().declaration(id).unwrap().property("Value").is_some());
    }

    #[test]
    fn test_truncated_stream_is_fatal() {
        let mut events: Vec<MarkedEvent> = Vec::new();
        let mut cursor = tokenize("Variable: A\nValue: [1, 2]\n").unwrap();
        while let Some(event) = cursor.current() {
            if event.event == ParsingEvent::SequenceEnd {
                break;
            }
            events.push(event.clone());
            cursor.advance();
        }
        let mut parser = Parser::new(
            "test.yml",
            EventCursor::new(events),
            ParserOptions::default(),
        );
        parser.start().unwrap();
        assert!(matches!(
            parser.parse_declaration(ITEM),
            Err(ParseError::UnexpectedEndOfStream)
        ));
    }
}
