//! Duplicate-code (CPD) tokens.
//!
//! Literals are normalized so that copies differing only in constants are
//! still found. Comments are dropped.

use serde::Serialize;

use crate::analysis::{AnalysisContext, NodeCategory};
use crate::pipeline::ReportSink;

use super::{AuxiliaryVisitor, TextRange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CpdToken {
    pub range: TextRange,
    pub image: String,
}

pub struct CpdVisitor;

impl CpdVisitor {
    pub fn tokens(ctx: &AnalysisContext) -> Vec<CpdToken> {
        let mut tokens = Vec::new();
        let mut stack = vec![&ctx.tree().root];

        while let Some(node) = stack.pop() {
            let image = match node.category {
                NodeCategory::Comment => continue,
                NodeCategory::StringLiteral => "$str".to_string(),
                NodeCategory::NumberLiteral => "$num".to_string(),
                _ if node.is_leaf() => ctx.text(node).trim().to_string(),
                _ => {
                    stack.extend(node.children.iter().rev());
                    continue;
                }
            };
            if !image.is_empty() {
                tokens.push(CpdToken {
                    range: TextRange::from(&node.span),
                    image,
                });
            }
        }

        tokens
    }
}

impl AuxiliaryVisitor for CpdVisitor {
    fn visit(&self, ctx: &AnalysisContext, sink: &mut dyn ReportSink) -> anyhow::Result<()> {
        sink.save_cpd_tokens(ctx.file(), Self::tokens(ctx));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisSettings, Node, Span, SyntaxTree};
    use crate::pipeline::InputFile;

    #[test]
    fn test_literals_normalized_comments_dropped() {
        let source = "x = 42 // c";
        let root = Node::new("stmt", NodeCategory::Other, Span::on_line(1, 0, 11, 0)).with_children(vec![
            Node::new("identifier", NodeCategory::Identifier, Span::on_line(1, 0, 1, 0)),
            Node::new("=", NodeCategory::Other, Span::on_line(1, 2, 3, 2)).anonymous(),
            Node::new("integer", NodeCategory::NumberLiteral, Span::on_line(1, 4, 6, 4)),
            Node::new("comment", NodeCategory::Comment, Span::on_line(1, 7, 11, 7)),
        ]);
        let file = InputFile::in_memory("a.py", source);
        let settings = AnalysisSettings::default();
        let ctx = AnalysisContext::new(SyntaxTree::new(root, source), &file, &settings);

        let images: Vec<_> = CpdVisitor::tokens(&ctx).into_iter().map(|t| t.image).collect();
        assert_eq!(images, vec!["x", "=", "$num"]);
    }
}
