//! Syntax highlighting ranges.

use serde::Serialize;

use crate::analysis::{AnalysisContext, NodeCategory};
use crate::pipeline::ReportSink;

use super::{AuxiliaryVisitor, TextRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Keyword,
    Comment,
    String,
    Constant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub range: TextRange,
    pub kind: HighlightKind,
}

pub struct HighlighterVisitor;

impl HighlighterVisitor {
    pub fn highlights(ctx: &AnalysisContext) -> Vec<Highlight> {
        let mut highlights = Vec::new();
        let mut stack = vec![&ctx.tree().root];

        while let Some(node) = stack.pop() {
            let kind = match node.category {
                NodeCategory::Keyword => Some(HighlightKind::Keyword),
                NodeCategory::Comment => Some(HighlightKind::Comment),
                NodeCategory::StringLiteral => Some(HighlightKind::String),
                NodeCategory::NumberLiteral => Some(HighlightKind::Constant),
                _ => None,
            };
            match kind {
                // Highlighted nodes are not descended into
                Some(kind) => highlights.push(Highlight {
                    range: TextRange::from(&node.span),
                    kind,
                }),
                None => stack.extend(node.children.iter().rev()),
            }
        }

        highlights
    }
}

impl AuxiliaryVisitor for HighlighterVisitor {
    fn visit(&self, ctx: &AnalysisContext, sink: &mut dyn ReportSink) -> anyhow::Result<()> {
        sink.save_highlighting(ctx.file(), Self::highlights(ctx));
        Ok(())
    }
}
