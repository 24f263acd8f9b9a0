use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A location inside a template source file.
///
/// Line and column are 1-based. A position that only names a file (no
/// line information) uses 0 for both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    source: Arc<str>,
    line: u32,
    column: u32,
}

impl SourcePosition {
    pub fn new(source: impl Into<Arc<str>>, line: u32, column: u32) -> Self {
        debug_assert!(line >= 1, "line must be >= 1");
        debug_assert!(column >= 1, "column must be >= 1");
        Self {
            source: source.into(),
            line,
            column,
        }
    }

    /// A position that identifies only the source file.
    pub fn file(source: impl Into<Arc<str>>) -> Self {
        Self {
            source: source.into(),
            line: 0,
            column: 0,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn has_line_info(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for SourcePosition {
    // End positions are not tracked, so the start is repeated as the end.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}",
            self.source, self.line, self.column, self.line, self.column
        )
    }
}

impl<S: Into<Arc<str>>> From<(S, u32, u32)> for SourcePosition {
    fn from((source, line, column): (S, u32, u32)) -> Self {
        SourcePosition::new(source, line, column)
    }
}
