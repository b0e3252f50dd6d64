//! Untyped YAML values
//!
//! Expression sites are read into a [`RawValue`] first, so the resolver can
//! inspect the operand shape of a tagged value before building nodes.

use cloudmod_core::SourceLocation;

/// Scalar, sequence or mapping with its tag and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    pub tag: Option<String>,
    pub location: SourceLocation,
    pub kind: RawKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawKind {
    Scalar(String),
    Sequence(Vec<RawValue>),
    Mapping(Vec<RawEntry>),
}

/// One key of a raw mapping, duplicates kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub key: String,
    pub key_location: SourceLocation,
    pub value: RawValue,
}

impl RawValue {
    pub fn scalar(value: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            tag: None,
            location,
            kind: RawKind::Scalar(value.into()),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn is_untagged(&self) -> bool {
        self.tag.is_none()
    }

    pub fn is_plain_mapping(&self) -> bool {
        self.is_untagged() && matches!(self.kind, RawKind::Mapping(_))
    }

    /// Value of an untagged scalar
    pub fn as_plain_scalar(&self) -> Option<&str> {
        match (&self.tag, &self.kind) {
            (None, RawKind::Scalar(value)) => Some(value),
            _ => None,
        }
    }
}
