//! Syntax trees and per-file analysis context.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Source Text     │────▶│ SourceParser │────▶│ SyntaxTree    │
//! └─────────────────┘     │ (tree-sitter)│     │ (categorized  │
//!                         └──────────────┘     │  nodes)       │
//!                                              └───────────────┘
//!                                                      │
//!                                                      ▼
//!                         ┌──────────────┐     ┌───────────────┐
//!                         │ Checks and   │◀────│AnalysisContext│
//!                         │ Visitors     │     │ (one per file)│
//!                         └──────────────┘     └───────────────┘
//! ```
//!
//! # Adding a New Language
//!
//! 1. Create a new module in `src/analysis/languages/` (e.g., `java.rs`)
//! 2. Fill in a `LanguageSpec` with the grammar's node kinds
//! 3. Add it to the `LANGUAGES` table in `languages/mod.rs`

mod context;
#[cfg(feature = "tree-sitter")]
pub mod languages;
#[cfg(test)]
pub(crate) mod testing;
mod traits;
mod tree;
#[cfg(feature = "tree-sitter")]
pub mod treesitter;

pub use context::{AnalysisContext, AnalysisSettings};
pub use traits::{ParseError, SourceParser};
pub use tree::{Descendants, Node, NodeCategory, Span, SyntaxTree};

/// Get a parser by language ID. Always `None` without the `tree-sitter` feature.
pub fn parser_for_language(lang_id: &str) -> Option<Box<dyn SourceParser>> {
    #[cfg(feature = "tree-sitter")]
    {
        languages::parser_for_language(lang_id)
    }
    #[cfg(not(feature = "tree-sitter"))]
    {
        let _ = lang_id;
        None
    }
}

/// Get a parser for a file extension. Always `None` without the `tree-sitter` feature.
pub fn parser_for_extension(ext: &str) -> Option<Box<dyn SourceParser>> {
    #[cfg(feature = "tree-sitter")]
    {
        languages::parser_for_extension(ext)
    }
    #[cfg(not(feature = "tree-sitter"))]
    {
        let _ = ext;
        None
    }
}

/// Ids of the languages compiled into this build.
pub fn registered_languages() -> Vec<&'static str> {
    #[cfg(feature = "tree-sitter")]
    {
        languages::registered_languages()
    }
    #[cfg(not(feature = "tree-sitter"))]
    {
        Vec::new()
    }
}
