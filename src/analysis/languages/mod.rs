//! Language-specific tree-sitter configurations.

mod go;
mod javascript;
mod python;
mod rust_lang;

pub use go::GO;
pub use javascript::JAVASCRIPT;
pub use python::PYTHON;
pub use rust_lang::RUST;

use super::treesitter::{LanguageSpec, TreeSitterParser};
use super::SourceParser;

/// All grammars compiled into this build.
static LANGUAGES: &[&LanguageSpec] = &[&GO, &JAVASCRIPT, &PYTHON, &RUST];

/// Get a parser by language ID.
///
/// Returns None if the language is not compiled in.
pub fn parser_for_language(lang_id: &str) -> Option<Box<dyn SourceParser>> {
    LANGUAGES
        .iter()
        .find(|spec| spec.id == lang_id)
        .map(|spec| Box::new(TreeSitterParser::new(spec)) as Box<dyn SourceParser>)
}

/// Get a parser for the given file extension (without dot).
pub fn parser_for_extension(ext: &str) -> Option<Box<dyn SourceParser>> {
    LANGUAGES
        .iter()
        .find(|spec| spec.extensions.contains(&ext))
        .map(|spec| Box::new(TreeSitterParser::new(spec)) as Box<dyn SourceParser>)
}

/// Get all registered language IDs.
pub fn registered_languages() -> Vec<&'static str> {
    LANGUAGES.iter().map(|spec| spec.id).collect()
}
