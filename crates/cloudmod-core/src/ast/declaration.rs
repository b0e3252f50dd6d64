//! Declaration AST nodes
//!
//! Declarations form a closed set generated from one registration table.
//! Each entry produces a struct with one field per accepted key plus the
//! static schema the parser uses to read it:
//! - `keyword`: key that must come first and whose value constructs the node
//! - `required` / `optional`: remaining keys and whether they are mandatory
//!
//! The keyword value is a constructor argument, so a declaration never exists
//! without it. Other keys are optional fields because a declaration missing a
//! mandatory key is still returned (with a diagnostic) to keep the rest of
//! the document usable.

use super::node::{ChildRemoval, NodeId};
use super::schema::{DeclarationFamily, DeclarationType, PropertySchema, ValueKind};
use super::tree::SyntaxTree;
use serde::{Deserialize, Serialize};

const ITEMS: DeclarationType = DeclarationType::Abstract(DeclarationFamily::Item);
const EVENT_SOURCES: DeclarationType = DeclarationType::Abstract(DeclarationFamily::EventSource);
const USINGS: DeclarationType = DeclarationType::Concrete(DeclarationKind::Using);
const VPC: DeclarationType = DeclarationType::Concrete(DeclarationKind::Vpc);
const PROPERTY_TYPES: DeclarationType = DeclarationType::Concrete(DeclarationKind::PropertyType);
const ATTRIBUTE_TYPES: DeclarationType = DeclarationType::Concrete(DeclarationKind::AttributeType);

macro_rules! is_required {
    (required) => {
        true
    };
    (optional) => {
        false
    };
}

macro_rules! keyword_property {
    () => {
        None
    };
    ($keyword:literal => $value:ident $(($($arg:tt)+))?) => {
        Some(PropertySchema {
            key: $keyword,
            value: ValueKind::$value $(($($arg)+))?,
            required: true,
        })
    };
}

macro_rules! family_of {
    () => {
        None
    };
    ($family:ident) => {
        Some(DeclarationFamily::$family)
    };
}

macro_rules! keyword_field {
    ($self:ident) => {
        None
    };
    ($self:ident, $field:ident) => {
        Some($self.$field)
    };
}

macro_rules! declarations {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident($name:ident)
            $(in $family:ident)?
            $(keyword $keyword:literal => $kfield:ident : $kvalue:ident $(($($karg:tt)+))?)?
            {
                $( $req:ident $key:literal => $field:ident : $value:ident $(($($arg:tt)+))? ),* $(,)?
            }
        )*
    ) => {
        /// Concrete declaration kinds
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum DeclarationKind {
            $( $variant, )*
        }

        impl DeclarationKind {
            pub const ALL: &'static [DeclarationKind] = &[ $( DeclarationKind::$variant, )* ];

            pub fn name(self) -> &'static str {
                match self {
                    $( DeclarationKind::$variant => stringify!($variant), )*
                }
            }

            /// Abstract family this kind is dispatched from, if any
            pub fn family(self) -> Option<DeclarationFamily> {
                match self {
                    $( DeclarationKind::$variant => family_of!($($family)?), )*
                }
            }

            /// Key that must appear first and identifies this kind
            pub fn keyword(self) -> Option<&'static str> {
                match self {
                    $( DeclarationKind::$variant => $name::KEYWORD.map(|property| property.key), )*
                }
            }

            pub fn keyword_property(self) -> Option<PropertySchema> {
                match self {
                    $( DeclarationKind::$variant => $name::KEYWORD, )*
                }
            }

            /// Non-keyword keys in authored order
            pub fn properties(self) -> &'static [PropertySchema] {
                match self {
                    $( DeclarationKind::$variant => $name::PROPERTIES, )*
                }
            }
        }

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq)]
            pub struct $name {
                $( pub $kfield: NodeId, )?
                $( pub $field: Option<NodeId>, )*
            }

            impl $name {
                pub const KEYWORD: Option<PropertySchema> =
                    keyword_property!($($keyword => $kvalue $(($($karg)+))?)?);

                pub const PROPERTIES: &'static [PropertySchema] = &[
                    $(
                        PropertySchema {
                            key: $key,
                            value: ValueKind::$value $(($($arg)+))?,
                            required: is_required!($req),
                        },
                    )*
                ];

                #[allow(unused_variables)]
                fn with_keyword(keyword: Option<NodeId>) -> Option<Self> {
                    Some(Self {
                        $( $kfield: keyword?, )?
                        $( $field: None, )*
                    })
                }

                /// Node bound to the keyword key
                pub fn keyword_value(&self) -> Option<NodeId> {
                    keyword_field!(self $(, $kfield)?)
                }

                fn slot(&self, key: &str) -> Option<Option<NodeId>> {
                    match key {
                        $( $key => Some(self.$field), )*
                        _ => None,
                    }
                }

                fn slot_mut(&mut self, key: &str) -> Option<&mut Option<NodeId>> {
                    match key {
                        $( $key => Some(&mut self.$field), )*
                        _ => None,
                    }
                }

                fn children(&self) -> Vec<NodeId> {
                    let mut children = Vec::new();
                    $( children.push(self.$kfield); )?
                    $( children.extend(self.$field); )*
                    children
                }

                fn children_mut(&mut self) -> Vec<&mut NodeId> {
                    let mut children: Vec<&mut NodeId> = Vec::new();
                    $( children.push(&mut self.$kfield); )?
                    $( children.extend(self.$field.as_mut()); )*
                    children
                }

                fn remove_child(&mut self, child: NodeId) -> ChildRemoval {
                    $(
                        if self.$kfield == child {
                            return ChildRemoval::Required;
                        }
                    )?
                    $(
                        if self.$field == Some(child) {
                            self.$field = None;
                            return ChildRemoval::Removed;
                        }
                    )*
                    ChildRemoval::NotFound
                }
            }
        )*

        /// Every declaration node
        #[derive(Debug, Clone, PartialEq)]
        pub enum Declaration {
            $( $variant($name), )*
        }

        impl Declaration {
            /// Construct an empty declaration of `kind`.
            ///
            /// Returns `None` when the kind has a keyword but no keyword value
            /// was supplied.
            pub fn new(kind: DeclarationKind, keyword: Option<NodeId>) -> Option<Self> {
                match kind {
                    $( DeclarationKind::$variant => $name::with_keyword(keyword).map(Declaration::$variant), )*
                }
            }

            pub fn kind(&self) -> DeclarationKind {
                match self {
                    $( Declaration::$variant(_) => DeclarationKind::$variant, )*
                }
            }

            pub fn keyword_value(&self) -> Option<NodeId> {
                match self {
                    $( Declaration::$variant(declaration) => declaration.keyword_value(), )*
                }
            }

            /// Node bound to a non-keyword key, if the key exists and is set
            pub fn property(&self, key: &str) -> Option<NodeId> {
                match self {
                    $( Declaration::$variant(declaration) => declaration.slot(key).flatten(), )*
                }
            }

            /// True when `key` is one of this declaration's non-keyword keys
            pub fn has_property(&self, key: &str) -> bool {
                match self {
                    $( Declaration::$variant(declaration) => declaration.slot(key).is_some(), )*
                }
            }

            pub(crate) fn property_slot_mut(&mut self, key: &str) -> Option<&mut Option<NodeId>> {
                match self {
                    $( Declaration::$variant(declaration) => declaration.slot_mut(key), )*
                }
            }

            pub fn children(&self) -> Vec<NodeId> {
                match self {
                    $( Declaration::$variant(declaration) => declaration.children(), )*
                }
            }

            pub(crate) fn children_mut(&mut self) -> Vec<&mut NodeId> {
                match self {
                    $( Declaration::$variant(declaration) => declaration.children_mut(), )*
                }
            }

            pub(crate) fn remove_child(&mut self, child: NodeId) -> ChildRemoval {
                match self {
                    $( Declaration::$variant(declaration) => declaration.remove_child(child), )*
                }
            }
        }
    };
}

declarations! {
    /// Root of a module document
    Module(ModuleDeclaration)
        keyword "Module" => module_name: String
    {
        optional "Version" => version: String,
        optional "Description" => description: String,
        optional "Pragmas" => pragmas: List,
        optional "Secrets" => secrets: StringList,
        optional "Using" => using: DeclarationList(USINGS),
        required "Items" => items: DeclarationList(ITEMS),
    }

    /// Reference to another module whose outputs this module consumes
    Using(UsingDeclaration)
        keyword "Module" => module_name: String
    {
        optional "Description" => description: String,
    }

    /// Deployment parameter supplied by the operator
    Parameter(ParameterDeclaration) in Item
        keyword "Parameter" => name: String
    {
        optional "Section" => section: String,
        optional "Label" => label: String,
        optional "Description" => description: String,
        optional "Type" => type_name: String,
        optional "Scope" => scope: StringList,
        optional "NoEcho" => no_echo: Bool,
        optional "Default" => default: String,
        optional "ConstraintDescription" => constraint_description: String,
        optional "AllowedPattern" => allowed_pattern: String,
        optional "AllowedValues" => allowed_values: List,
        optional "MaxLength" => max_length: Int,
        optional "MaxValue" => max_value: Int,
        optional "MinLength" => min_length: Int,
        optional "MinValue" => min_value: Int,
        optional "Allow" => allow: Expression,
        optional "Properties" => properties: Object,
        optional "EncryptionContext" => encryption_context: Object,
        optional "Pragmas" => pragmas: List,
    }

    /// Value exported by another deployed module
    Import(ImportDeclaration) in Item
        keyword "Import" => name: String
    {
        optional "Description" => description: String,
        optional "Type" => type_name: String,
        optional "Scope" => scope: StringList,
        required "Module" => module: String,
        optional "EncryptionContext" => encryption_context: Object,
    }

    /// Named value computed from other items
    Variable(VariableDeclaration) in Item
        keyword "Variable" => name: String
    {
        optional "Description" => description: String,
        optional "Type" => type_name: String,
        optional "Scope" => scope: StringList,
        required "Value" => value: Expression,
        optional "EncryptionContext" => encryption_context: Object,
    }

    /// Nested scope of items
    Group(GroupDeclaration) in Item
        keyword "Group" => name: String
    {
        optional "Description" => description: String,
        required "Items" => items: DeclarationList(ITEMS),
    }

    /// Named deployment condition
    Condition(ConditionDeclaration) in Item
        keyword "Condition" => name: String
    {
        optional "Description" => description: String,
        required "Value" => value: Condition,
    }

    /// Cloud resource, created or referenced by value
    Resource(ResourceDeclaration) in Item
        keyword "Resource" => name: String
    {
        optional "Description" => description: String,
        optional "If" => condition: Condition,
        optional "Type" => type_name: String,
        optional "Scope" => scope: StringList,
        optional "Allow" => allow: Expression,
        optional "Value" => value: Expression,
        optional "DependsOn" => depends_on: StringList,
        optional "Properties" => properties: Object,
        optional "DefaultAttribute" => default_attribute: String,
        optional "Pragmas" => pragmas: List,
    }

    /// Nested module deployment
    Nested(NestedModuleDeclaration) in Item
        keyword "Nested" => name: String
    {
        optional "Description" => description: String,
        required "Module" => module: String,
        optional "DependsOn" => depends_on: StringList,
        optional "Parameters" => parameters: Object,
    }

    /// Packaged folder of files
    Package(PackageDeclaration) in Item
        keyword "Package" => name: String
    {
        optional "Description" => description: String,
        optional "Scope" => scope: StringList,
        required "Files" => files: String,
    }

    /// Serverless function with its event sources
    Function(FunctionDeclaration) in Item
        keyword "Function" => name: String
    {
        optional "Description" => description: String,
        optional "Scope" => scope: StringList,
        optional "If" => condition: Condition,
        required "Memory" => memory: String,
        required "Timeout" => timeout: String,
        optional "Project" => project: String,
        optional "Runtime" => runtime: String,
        optional "Language" => language: String,
        optional "Handler" => handler: String,
        optional "Vpc" => vpc: Declaration(VPC),
        optional "Environment" => environment: Object,
        optional "Properties" => properties: Object,
        optional "Sources" => sources: DeclarationList(EVENT_SOURCES),
        optional "Pragmas" => pragmas: List,
    }

    /// Static lookup table
    Mapping(MappingDeclaration) in Item
        keyword "Mapping" => name: String
    {
        optional "Description" => description: String,
        required "Value" => value: Object,
    }

    /// Custom resource type backed by a handler
    ResourceType(ResourceTypeDeclaration) in Item
        keyword "ResourceType" => name: String
    {
        optional "Description" => description: String,
        required "Handler" => handler: String,
        required "Properties" => properties: DeclarationList(PROPERTY_TYPES),
        required "Attributes" => attributes: DeclarationList(ATTRIBUTE_TYPES),
    }

    /// Template macro backed by a handler
    Macro(MacroDeclaration) in Item
        keyword "Macro" => name: String
    {
        optional "Description" => description: String,
        required "Handler" => handler: String,
    }

    /// Network placement of a function
    Vpc(VpcDeclaration)
    {
        required "SecurityGroupIds" => security_group_ids: Expression,
        required "SubnetIds" => subnet_ids: Expression,
    }

    /// Property of a custom resource type
    PropertyType(PropertyTypeDeclaration)
        keyword "Name" => name: String
    {
        optional "Description" => description: String,
        required "Type" => type_name: String,
        optional "Required" => required: Bool,
    }

    /// Attribute of a custom resource type
    AttributeType(AttributeTypeDeclaration)
        keyword "Name" => name: String
    {
        optional "Description" => description: String,
        required "Type" => type_name: String,
    }

    /// HTTP API route invoking a function
    ApiSource(ApiEventSourceDeclaration) in EventSource
        keyword "Api" => route: String
    {
        optional "Integration" => integration: String,
        optional "OperationName" => operation_name: String,
        optional "ApiKeyRequired" => api_key_required: Bool,
        optional "Invoke" => invoke: String,
    }

    /// Timer invoking a function
    ScheduleSource(ScheduleEventSourceDeclaration) in EventSource
        keyword "Schedule" => schedule: Expression
    {
        optional "Name" => name: String,
    }

    /// Notification topic subscription
    TopicSource(TopicEventSourceDeclaration) in EventSource
        keyword "Topic" => topic: String
    {
        optional "Filters" => filters: Object,
    }

    /// Queue subscription
    QueueSource(QueueEventSourceDeclaration) in EventSource
        keyword "Sqs" => queue: String
    {
        optional "BatchSize" => batch_size: Int,
    }
}

impl DeclarationKind {
    pub fn is_item(self) -> bool {
        self.family() == Some(DeclarationFamily::Item)
    }

    /// Keys that must all be present, keyword included
    pub fn mandatory_keys(self) -> impl Iterator<Item = &'static str> {
        self.keyword()
            .into_iter()
            .chain(self.properties().iter().filter(|p| p.required).map(|p| p.key))
    }
}

impl ModuleDeclaration {
    /// True when the module's `Pragmas` list contains `pragma` as a literal
    pub fn has_pragma(&self, tree: &SyntaxTree, pragma: &str) -> bool {
        self.pragmas
            .and_then(|pragmas| tree.list_items(pragmas))
            .map(|items| {
                items
                    .iter()
                    .any(|&item| tree.literal_value(item) == Some(pragma))
            })
            .unwrap_or(false)
    }

    pub fn has_module_registration(&self, tree: &SyntaxTree) -> bool {
        !self.has_pragma(tree, "no-module-registration")
    }
}
