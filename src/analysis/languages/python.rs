//! Python node-kind tables.

use crate::analysis::treesitter::LanguageSpec;

fn language() -> tree_sitter::Language {
    tree_sitter_python::LANGUAGE.into()
}

pub static PYTHON: LanguageSpec = LanguageSpec {
    id: "python",
    extensions: &["py"],
    language,
    functions: &["function_definition", "lambda"],
    blocks: &["block"],
    branches: &[
        "if_statement",
        "elif_clause",
        "conditional_expression",
        "case_clause",
    ],
    loops: &["for_statement", "while_statement"],
    catches: &["except_clause"],
    exits: &[
        "return_statement",
        "break_statement",
        "continue_statement",
        "raise_statement",
    ],
    logical_operators: &["and", "or"],
    comments: &["comment"],
    strings: &["string"],
    numbers: &["integer", "float"],
    identifiers: &["identifier"],
    declarations: &["function_definition", "class_definition"],
};
