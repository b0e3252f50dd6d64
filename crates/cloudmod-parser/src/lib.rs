//! cloudmod Parser - YAML to syntax tree parser for the cloudmod module language
//!
//! This crate turns a module document into a [`SyntaxTree`]. Declaration
//! mappings are dispatched through the schema registry, expression sites are
//! resolved from YAML tags, and references are linked once parsing completes.

pub mod config;
pub mod error;
pub mod events;
pub mod parser;
pub mod raw;
pub mod resolver;
pub mod schema;
pub mod yaml;

// Re-export main parser types
pub use config::ParserOptions;
pub use error::{ParseError, Result};
pub use events::{EventCursor, EventStream, Mark, MarkedEvent, ParsingEvent};
pub use parser::Parser;
pub use raw::{RawEntry, RawKind, RawValue};
pub use resolver::Resolver;
pub use schema::{Schema, SchemaRegistry, SchemaSet};

use cloudmod_core::ast::{
    link_references, Declaration, DeclarationKind, DeclarationType, ModuleDeclaration, NodeId,
    SyntaxTree, UnresolvedReference,
};
use cloudmod_core::Diagnostics;

/// Result of parsing one module document
#[derive(Debug)]
pub struct ParsedModule {
    pub tree: SyntaxTree,
    /// Module declaration, absent when the document root could not be parsed
    pub root: Option<NodeId>,
    pub diagnostics: Diagnostics,
    /// References left without a target after linking
    pub unresolved: Vec<UnresolvedReference>,
}

impl ParsedModule {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    pub fn module(&self) -> Option<&ModuleDeclaration> {
        match self.tree.declaration(self.root?)? {
            Declaration::Module(module) => Some(module),
            _ => None,
        }
    }
}

/// Parse a module document.
///
/// Malformed YAML and truncated documents are returned as errors; every
/// other problem is recorded in the returned diagnostics.
pub fn parse_module(
    file_path: &str,
    source: &str,
    options: &ParserOptions,
) -> Result<ParsedModule> {
    let events = yaml::tokenize(source)?;
    let mut parser = Parser::new(file_path, events, options.clone());
    parser.start()?;
    let root = parser.parse_declaration(DeclarationType::Concrete(DeclarationKind::Module))?;
    parser.end()?;

    let (mut tree, diagnostics) = parser.into_parts();
    let unresolved = match root {
        Some(root) if options.link_references => link_references(&mut tree, root)?,
        _ => Vec::new(),
    };

    log::debug!(
        "parsed {} with {} nodes, {} diagnostics, {} unresolved references",
        file_path,
        tree.len(),
        diagnostics.len(),
        unresolved.len()
    );
    Ok(ParsedModule {
        tree,
        root,
        diagnostics,
        unresolved,
    })
}
