//! Size and complexity metrics per file.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::analysis::{AnalysisContext, NodeCategory};
use crate::pipeline::ReportSink;

use super::AuxiliaryVisitor;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileMetrics {
    pub lines: usize,
    /// Lines holding at least one token that is not a comment.
    pub lines_of_code: usize,
    /// Lines holding comment text (header excluded when configured).
    pub comment_lines: usize,
    pub functions: usize,
    pub statements: usize,
    /// One per function plus one per decision point.
    pub complexity: usize,
}

pub struct MetricsVisitor;

impl MetricsVisitor {
    pub fn measure(ctx: &AnalysisContext) -> FileMetrics {
        let tree = ctx.tree();

        let code_lines: BTreeSet<usize> = tree
            .walk()
            .filter(|n| n.is_leaf() && n.category != NodeCategory::Comment)
            .filter(|n| n.span.start_byte < n.span.end_byte)
            .flat_map(|n| n.span.start_line..=n.span.end_line)
            .collect();

        let mut comment_lines = BTreeSet::new();
        for comment in ctx.comments() {
            for (idx, line) in ctx.text(comment).lines().enumerate() {
                let body = line.trim_matches(|c: char| c.is_whitespace() || "/*#-!".contains(c));
                if !body.is_empty() {
                    comment_lines.insert(comment.span.start_line + idx);
                }
            }
        }

        let statements = tree
            .nodes_of(NodeCategory::Block)
            .flat_map(|block| block.named_children())
            .filter(|n| n.category != NodeCategory::Comment)
            .count();

        let functions = tree.nodes_of(NodeCategory::Function).count();
        let decisions = tree.walk().filter(|n| n.category.is_decision_point()).count();

        FileMetrics {
            lines: tree.line_count(),
            lines_of_code: code_lines.len(),
            comment_lines: comment_lines.len(),
            functions,
            statements,
            complexity: functions + decisions,
        }
    }
}

impl AuxiliaryVisitor for MetricsVisitor {
    fn visit(&self, ctx: &AnalysisContext, sink: &mut dyn ReportSink) -> anyhow::Result<()> {
        sink.save_metrics(ctx.file(), Self::measure(ctx));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{testing, AnalysisSettings};
    use crate::pipeline::InputFile;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_metrics() {
        let source = "// header\ncode\n\n// note\n//\nmore code\n";
        let file = InputFile::in_memory("a.rs", source);

        let settings = AnalysisSettings::default();
        let ctx = AnalysisContext::new(testing::line_tree(source), &file, &settings);
        let metrics = MetricsVisitor::measure(&ctx);
        assert_eq!(metrics.lines, 6);
        assert_eq!(metrics.lines_of_code, 2);
        assert_eq!(metrics.comment_lines, 1);

        let settings = AnalysisSettings {
            ignore_header_comments: false,
        };
        let ctx = AnalysisContext::new(testing::line_tree(source), &file, &settings);
        assert_eq!(MetricsVisitor::measure(&ctx).comment_lines, 2);
    }
}
