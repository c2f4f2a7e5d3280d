//! Rust node-kind tables.

use crate::analysis::treesitter::LanguageSpec;

fn language() -> tree_sitter::Language {
    tree_sitter_rust::LANGUAGE.into()
}

pub static RUST: LanguageSpec = LanguageSpec {
    id: "rust",
    extensions: &["rs"],
    language,
    functions: &["function_item", "closure_expression"],
    blocks: &["block"],
    // `else if` nests another if_expression, so only the `if` is listed
    branches: &["if_expression", "match_arm"],
    loops: &["for_expression", "while_expression", "loop_expression"],
    catches: &[],
    exits: &["return_expression", "break_expression", "continue_expression"],
    logical_operators: &["&&", "||"],
    comments: &["line_comment", "block_comment"],
    strings: &["string_literal", "raw_string_literal", "char_literal"],
    numbers: &["integer_literal", "float_literal"],
    identifiers: &["identifier", "field_identifier", "type_identifier"],
    declarations: &[
        "function_item",
        "let_declaration",
        "parameter",
        "const_item",
        "static_item",
        "struct_item",
        "enum_item",
        "trait_item",
        "type_item",
    ],
};
