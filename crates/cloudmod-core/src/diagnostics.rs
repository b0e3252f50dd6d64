//! Diagnostics sink
//!
//! Every recoverable problem found while building a syntax tree is recorded
//! here instead of being returned as an error. Recording never fails, so the
//! caller always continues with the next construct.

use crate::location::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single message tied to a source location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: SourceLocation,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            location,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            location,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };
        write!(f, "{}: {} @ {}", label, self.message, self.location)
    }
}

/// Append-only collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error
    pub fn error(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.push(Diagnostic::error(message, location));
    }

    /// Record a warning
    pub fn warning(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.push(Diagnostic::warning(message, location));
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("{}", diagnostic);
        self.messages.push(diagnostic);
    }

    /// True when at least one error-severity message was recorded.
    ///
    /// A tree paired with errors may be partially populated and must not be
    /// handed to code generation.
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.messages.iter()
    }

    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.messages
    }

    /// Export all messages as a JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.messages)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
