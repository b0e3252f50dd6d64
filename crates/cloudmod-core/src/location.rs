//! Source locations

use serde::{Deserialize, Serialize};
use std::fmt;

/// A span of source text within a module file.
///
/// Lines and columns are 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file_path: String,
    pub line_start: usize,
    pub column_start: usize,
    pub line_end: usize,
    pub column_end: usize,
}

impl SourceLocation {
    /// Create a location spanning from one position to another
    pub fn new(
        file_path: impl Into<String>,
        (line_start, column_start): (usize, usize),
        (line_end, column_end): (usize, usize),
    ) -> Self {
        Self {
            file_path: file_path.into(),
            line_start,
            column_start,
            line_end,
            column_end,
        }
    }

    /// Create a zero-width location
    pub fn point(file_path: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(file_path, (line, column), (line, column))
    }

    /// Location starting where `self` starts and ending where `end` ends
    pub fn through(&self, end: &SourceLocation) -> Self {
        Self {
            file_path: self.file_path.clone(),
            line_start: self.line_start,
            column_start: self.column_start,
            line_end: end.line_end,
            column_end: end.column_end,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({},{})",
            self.file_path, self.line_start, self.column_start
        )
    }
}
