//! JavaScript node-kind tables.

use crate::analysis::treesitter::LanguageSpec;

fn language() -> tree_sitter::Language {
    tree_sitter_javascript::LANGUAGE.into()
}

pub static JAVASCRIPT: LanguageSpec = LanguageSpec {
    id: "javascript",
    extensions: &["js", "jsx", "mjs"],
    language,
    functions: &[
        "function_declaration",
        "function_expression",
        "arrow_function",
        "method_definition",
        "generator_function_declaration",
    ],
    blocks: &["statement_block"],
    branches: &["if_statement", "switch_case", "ternary_expression"],
    loops: &[
        "for_statement",
        "for_in_statement",
        "while_statement",
        "do_statement",
    ],
    catches: &["catch_clause"],
    exits: &[
        "return_statement",
        "break_statement",
        "continue_statement",
        "throw_statement",
    ],
    logical_operators: &["&&", "||", "??"],
    comments: &["comment"],
    strings: &["string", "template_string"],
    numbers: &["number"],
    identifiers: &["identifier", "property_identifier"],
    declarations: &[
        "function_declaration",
        "class_declaration",
        "variable_declarator",
        "method_definition",
    ],
};
