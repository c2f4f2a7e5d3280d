//! Go node-kind tables.

use crate::analysis::treesitter::LanguageSpec;

fn language() -> tree_sitter::Language {
    tree_sitter_go::LANGUAGE.into()
}

pub static GO: LanguageSpec = LanguageSpec {
    id: "go",
    extensions: &["go"],
    language,
    functions: &["function_declaration", "method_declaration", "func_literal"],
    blocks: &["block"],
    branches: &[
        "if_statement",
        "expression_case",
        "type_case",
        "communication_case",
    ],
    loops: &["for_statement"],
    catches: &[],
    exits: &[
        "return_statement",
        "break_statement",
        "continue_statement",
        "goto_statement",
    ],
    logical_operators: &["&&", "||"],
    comments: &["comment"],
    strings: &[
        "interpreted_string_literal",
        "raw_string_literal",
        "rune_literal",
    ],
    numbers: &["int_literal", "float_literal", "imaginary_literal"],
    identifiers: &["identifier", "field_identifier", "type_identifier"],
    declarations: &[
        "function_declaration",
        "method_declaration",
        "var_spec",
        "const_spec",
        "parameter_declaration",
        "type_spec",
    ],
};
