use std::fmt;

/// Position in a source file (1-indexed line and column).
///
/// Synthesized nodes have no real position; they are reported at line 0.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_path, self.line, self.col)
    }
}

/// Location plus the source line it points into, for cargo-style reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub location: SourceLocation,
    /// The source code line content for display.
    pub source_line: String,
}

impl SourceContext {
    pub fn new(location: SourceLocation, source_line: impl Into<String>) -> Self {
        Self {
            location,
            source_line: source_line.into(),
        }
    }

    /// Build a context by looking the location's line up in `source`.
    ///
    /// Locations outside the text (line 0, past the end) get an empty line.
    pub fn from_source(location: SourceLocation, source: &str) -> Self {
        let source_line = location
            .line
            .checked_sub(1)
            .and_then(|idx| source.lines().nth(idx))
            .unwrap_or_default()
            .to_string();
        Self {
            location,
            source_line,
        }
    }

    pub fn file_path(&self) -> &str {
        &self.location.file_path
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn col(&self) -> usize {
        self.location.col
    }
}
