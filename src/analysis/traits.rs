//! Core traits for language parsing.

use thiserror::Error;

use super::SyntaxTree;

/// Recoverable failure to parse a file.
///
/// Carries the 1-based line of the first syntax error so the failure can be
/// reported at a location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: line.max(1),
            message: message.into(),
        }
    }
}

/// Language-specific parser.
///
/// Implementations must not fail on well-formed input for their grammar.
///
/// # Thread Safety
///
/// Note: tree_sitter::Parser is not Sync, so implementations should
/// create parsers as needed or use thread-local storage.
pub trait SourceParser: Send + Sync {
    /// Returns the language identifier (e.g., "go", "rust").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this parser handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse source text into a syntax tree.
    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError>;

    /// Check if this parser handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}
