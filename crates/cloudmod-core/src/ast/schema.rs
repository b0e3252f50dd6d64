//! Static schema vocabulary
//!
//! Declarations describe their accepted keys with these types. The tables
//! themselves are generated next to each declaration struct; the parser
//! aggregates and caches them.

use super::declaration::DeclarationKind;
use serde::{Deserialize, Serialize};

/// Abstract declaration families dispatched by their first key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeclarationFamily {
    /// Named module items (resources, variables, functions, ...)
    Item,
    /// Function event sources
    EventSource,
}

impl DeclarationFamily {
    pub const ALL: &'static [DeclarationFamily] =
        &[DeclarationFamily::Item, DeclarationFamily::EventSource];

    /// Concrete kinds belonging to this family, in declaration order
    pub fn kinds(self) -> impl Iterator<Item = DeclarationKind> {
        DeclarationKind::ALL
            .iter()
            .copied()
            .filter(move |kind| kind.family() == Some(self))
    }
}

/// Target of a declaration parse: one concrete kind or a whole family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeclarationType {
    Concrete(DeclarationKind),
    Abstract(DeclarationFamily),
}

/// Shape of the value bound to a declaration key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Untagged scalar, kept as a string literal
    String,
    /// Untagged scalar parsed as an integer literal
    Int,
    /// Untagged scalar parsed as a boolean literal
    Bool,
    /// Any value expression, intrinsic functions included
    Expression,
    /// Condition expression (`!And`, `!Equals`, condition names, ...)
    Condition,
    /// Untagged mapping
    Object,
    /// Untagged sequence
    List,
    /// Sequence of untagged scalars
    StringList,
    /// A single nested declaration
    Declaration(DeclarationType),
    /// Sequence of declarations
    DeclarationList(DeclarationType),
}

/// One accepted key of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PropertySchema {
    pub key: &'static str,
    pub value: ValueKind,
    pub required: bool,
}
