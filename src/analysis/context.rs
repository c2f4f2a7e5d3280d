//! Per-file analysis context.
//!
//! One `AnalysisContext` is built for every successfully parsed file and
//! dropped once its checks have run. Nothing in it is shared with other
//! files, which is what keeps a failure on one file from leaking into the
//! results of another.

use crate::pipeline::InputFile;

use super::{Node, NodeCategory, SyntaxTree};

/// Run-wide settings visible to checks and visitors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSettings {
    /// Skip the comment block at the top of a file when counting comment
    /// lines and scanning for no-sonar markers.
    pub ignore_header_comments: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            ignore_header_comments: true,
        }
    }
}

/// Everything a check may look at for one file.
pub struct AnalysisContext<'a> {
    tree: SyntaxTree,
    file: &'a InputFile,
    settings: &'a AnalysisSettings,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(tree: SyntaxTree, file: &'a InputFile, settings: &'a AnalysisSettings) -> Self {
        Self {
            tree,
            file,
            settings,
        }
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn file(&self) -> &InputFile {
        self.file
    }

    pub fn settings(&self) -> &AnalysisSettings {
        self.settings
    }

    /// Text of a node of this file's tree.
    pub fn text(&self, node: &Node) -> &str {
        self.tree.text(node)
    }

    /// Source lines, without terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.tree.source().lines()
    }

    /// Comment nodes, excluding the header block when the settings ask for it.
    pub fn comments(&self) -> Vec<&Node> {
        let comments: Vec<&Node> = self.tree.nodes_of(NodeCategory::Comment).collect();
        if !self.settings.ignore_header_comments {
            return comments;
        }
        let header_end = self.header_comment_end_line();
        comments
            .into_iter()
            .filter(|c| c.span.start_line > header_end)
            .collect()
    }

    /// Last line of the leading comment block, or 0 when the file does not
    /// start with a comment.
    pub fn header_comment_end_line(&self) -> usize {
        let first_code_line = self
            .tree
            .walk()
            .filter(|n| n.is_leaf() && n.category != NodeCategory::Comment)
            .map(|n| n.span.start_line)
            .min()
            .unwrap_or(usize::MAX);

        self.tree
            .nodes_of(NodeCategory::Comment)
            .filter(|c| c.span.end_line < first_code_line)
            .map(|c| c.span.end_line)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Span;

    fn tree() -> SyntaxTree {
        let source = "// header\nx\n// body\n";
        let root = Node::new(
            "file",
            NodeCategory::Other,
            Span {
                start_byte: 0,
                end_byte: source.len(),
                start_line: 1,
                start_offset: 0,
                end_line: 3,
                end_offset: 7,
            },
        )
        .with_children(vec![
            Node::new("comment", NodeCategory::Comment, Span::on_line(1, 0, 9, 0)),
            Node::new("identifier", NodeCategory::Identifier, Span::on_line(2, 0, 1, 10)),
            Node::new("comment", NodeCategory::Comment, Span::on_line(3, 0, 7, 12)),
        ]);
        SyntaxTree::new(root, source)
    }

    #[test]
    fn test_header_comments_ignored_by_default() {
        let file = InputFile::in_memory("a.rs", "");
        let settings = AnalysisSettings::default();
        let ctx = AnalysisContext::new(tree(), &file, &settings);

        assert_eq!(ctx.header_comment_end_line(), 1);
        let comments = ctx.comments();
        assert_eq!(comments.len(), 1);
        assert_eq!(ctx.text(comments[0]), "// body");
    }

    #[test]
    fn test_header_comments_kept_when_disabled() {
        let file = InputFile::in_memory("a.rs", "");
        let settings = AnalysisSettings {
            ignore_header_comments: false,
        };
        let ctx = AnalysisContext::new(tree(), &file, &settings);
        assert_eq!(ctx.comments().len(), 2);
    }
}
