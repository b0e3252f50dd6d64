//! Parser error types
//!
//! Only failures that leave no recovery point are errors. Problems inside a
//! well-framed document are reported through [`Diagnostics`](cloudmod_core::Diagnostics).

use cloudmod_core::CoreError;
use thiserror::Error;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// YAML scanner failure
    #[error("YAML parsing error: {message}")]
    Yaml { message: String },

    /// Anchors and aliases are not part of the module language
    #[error("YAML aliases are not supported ({line},{column})")]
    UnsupportedAlias { line: usize, column: usize },

    /// The event stream ended inside an open construct
    #[error("Unexpected end of event stream")]
    UnexpectedEndOfStream,

    /// Document framing event other than the expected one
    #[error("Expected {expected}, found {found} ({line},{column})")]
    UnexpectedEvent {
        expected: &'static str,
        found: String,
        line: usize,
        column: usize,
    },

    /// Invalid parser options
    #[error("Invalid parser options: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Syntax tree misuse
    #[error("Syntax tree error: {0}")]
    Tree(#[from] CoreError),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
