//! Tree builders for unit tests.

use super::{Node, NodeCategory, Span, SyntaxTree};

/// One leaf per non-blank line: lines starting with `//`, `/*` or `#` become
/// comments, everything else an identifier covering the trimmed text.
pub fn line_tree(source: &str) -> SyntaxTree {
    let mut children = Vec::new();
    let mut byte = 0;
    let mut last_line = 1;
    let mut last_len = 0;

    for (idx, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            let start = line.len() - line.trim_start().len();
            let end = start + trimmed.len();
            let category = if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('#') {
                NodeCategory::Comment
            } else {
                NodeCategory::Identifier
            };
            children.push(Node::new(
                "line",
                category,
                Span::on_line(idx + 1, start, end, byte + start),
            ));
        }
        last_line = idx + 1;
        last_len = line.len();
        byte += line.len() + 1;
    }

    let root = Node::new(
        "file",
        NodeCategory::Other,
        Span {
            start_byte: 0,
            end_byte: source.len(),
            start_line: 1,
            start_offset: 0,
            end_line: last_line,
            end_offset: last_len,
        },
    )
    .with_children(children);
    SyntaxTree::new(root, source)
}
