//! Schema registry
//!
//! Aggregates the static declaration tables into per-type schemas and
//! caches them for the lifetime of the process. Abstract families are
//! indexed by each member's keyword so the first key of a mapping selects
//! the concrete kind.

use cloudmod_core::ast::{DeclarationFamily, DeclarationKind, DeclarationType, PropertySchema};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, OnceLock};

/// Accepted keys of one concrete declaration kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub kind: DeclarationKind,
    pub keyword: Option<&'static str>,
    pub keys: BTreeMap<&'static str, PropertySchema>,
    pub mandatory_keys: BTreeSet<&'static str>,
}

impl Schema {
    fn build(kind: DeclarationKind) -> Self {
        let keys: BTreeMap<_, _> = kind
            .keyword_property()
            .into_iter()
            .chain(kind.properties().iter().copied())
            .map(|property| (property.key, property))
            .collect();
        Self {
            kind,
            keyword: kind.keyword(),
            mandatory_keys: kind.mandatory_keys().collect(),
            keys,
        }
    }

    pub fn property(&self, key: &str) -> Option<&PropertySchema> {
        self.keys.get(key)
    }

    pub fn is_keyword(&self, key: &str) -> bool {
        self.keyword == Some(key)
    }
}

/// Schemas a declaration site can resolve to
#[derive(Debug, Clone)]
pub enum SchemaSet {
    /// Abstract family, indexed by member keyword
    Keyed(BTreeMap<&'static str, Arc<Schema>>),
    /// Single concrete kind
    Unkeyed(Arc<Schema>),
}

impl SchemaSet {
    /// Schema selected by the first key of a mapping
    pub fn resolve_first(&self, key: &str) -> Option<&Arc<Schema>> {
        match self {
            SchemaSet::Keyed(schemas) => schemas.get(key),
            SchemaSet::Unkeyed(schema) => match schema.keyword {
                Some(keyword) => (keyword == key).then_some(schema),
                None => schema.keys.contains_key(key).then_some(schema),
            },
        }
    }

    /// Keywords that can open a mapping of this set, `None` when any key may
    pub fn keywords(&self) -> Option<Vec<&'static str>> {
        match self {
            SchemaSet::Keyed(schemas) => Some(schemas.keys().copied().collect()),
            SchemaSet::Unkeyed(schema) => schema.keyword.map(|keyword| vec![keyword]),
        }
    }
}

/// Process-wide schema cache
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: HashMap<DeclarationKind, Arc<Schema>>,
    sets: HashMap<DeclarationType, SchemaSet>,
}

static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

impl SchemaRegistry {
    /// Shared registry, built on first use
    pub fn global() -> &'static SchemaRegistry {
        REGISTRY.get_or_init(SchemaRegistry::build)
    }

    /// Build every schema and schema set.
    ///
    /// Panics when a family member has no keyword or two members share one;
    /// both are defects in the declaration table.
    pub fn build() -> Self {
        let schemas: HashMap<_, _> = DeclarationKind::ALL
            .iter()
            .map(|&kind| (kind, Arc::new(Schema::build(kind))))
            .collect();

        let mut sets = HashMap::new();
        for (&kind, schema) in &schemas {
            sets.insert(
                DeclarationType::Concrete(kind),
                SchemaSet::Unkeyed(Arc::clone(schema)),
            );
        }
        for &family in DeclarationFamily::ALL {
            let mut keyed = BTreeMap::new();
            for kind in family.kinds() {
                let Some(keyword) = kind.keyword() else {
                    panic!("{} has no keyword but belongs to {:?}", kind.name(), family);
                };
                if let Some(existing) = keyed.insert(keyword, Arc::clone(&schemas[&kind])) {
                    panic!(
                        "{} and {} share the keyword '{}'",
                        existing.kind.name(),
                        kind.name(),
                        keyword
                    );
                }
            }
            sets.insert(DeclarationType::Abstract(family), SchemaSet::Keyed(keyed));
        }

        log::debug!("built {} declaration schemas", schemas.len());
        Self { schemas, sets }
    }

    pub fn schema(&self, kind: DeclarationKind) -> Option<&Arc<Schema>> {
        self.schemas.get(&kind)
    }

    pub fn schema_set(&self, declaration_type: DeclarationType) -> Option<&SchemaSet> {
        self.sets.get(&declaration_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudmod_core::ast::ValueKind;

    #[test]
    fn test_item_family_dispatches_by_keyword() {
        let registry = SchemaRegistry::global();
        let items = registry
            .schema_set(DeclarationType::Abstract(DeclarationFamily::Item))
            .unwrap();

        let schema = items.resolve_first("Function").unwrap();
        assert_eq!(schema.kind, DeclarationKind::Function);
        assert!(items.resolve_first("Module").is_none());
        assert!(items.resolve_first("Api").is_none());
    }

    #[test]
    fn test_schema_includes_keyword_as_mandatory_key() {
        let schema = SchemaRegistry::global()
            .schema(DeclarationKind::Function)
            .unwrap();

        assert!(schema.is_keyword("Function"));
        let mandatory: Vec<_> = schema.mandatory_keys.iter().copied().collect();
        assert_eq!(mandatory, vec!["Function", "Memory", "Timeout"]);
        assert_eq!(
            schema.property("Sources").map(|p| p.value),
            Some(ValueKind::DeclarationList(DeclarationType::Abstract(
                DeclarationFamily::EventSource
            )))
        );
    }

    #[test]
    fn test_concrete_sets() {
        let registry = SchemaRegistry::global();

        let module = registry
            .schema_set(DeclarationType::Concrete(DeclarationKind::Module))
            .unwrap();
        assert!(module.resolve_first("Module").is_some());
        assert!(module.resolve_first("Items").is_none());

        let vpc = registry
            .schema_set(DeclarationType::Concrete(DeclarationKind::Vpc))
            .unwrap();
        assert!(vpc.resolve_first("SubnetIds").is_some());
        assert!(vpc.resolve_first("Memory").is_none());
        assert_eq!(vpc.keywords(), None);
    }

    #[test]
    fn test_every_type_has_a_schema_set() {
        let registry = SchemaRegistry::build();
        for &kind in DeclarationKind::ALL {
            assert!(registry
                .schema_set(DeclarationType::Concrete(kind))
                .is_some());
        }
        for &family in DeclarationFamily::ALL {
            assert!(registry
                .schema_set(DeclarationType::Abstract(family))
                .is_some());
        }
    }
}
