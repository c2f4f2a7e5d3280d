//! Auxiliary (non-rule) visitors.
//!
//! These produce data for the host besides issues: metrics, no-sonar lines,
//! syntax highlighting, duplicate-code tokens and symbol tables. Which of
//! them run is decided by the [`ProductProfile`](crate::pipeline::ProductProfile).

mod cpd;
mod highlighter;
mod metrics;
mod nosonar;
mod symbols;

use serde::Serialize;

use crate::analysis::{AnalysisContext, Span};
use crate::pipeline::ReportSink;

pub use cpd::{CpdToken, CpdVisitor};
pub use highlighter::{Highlight, HighlightKind, HighlighterVisitor};
pub use metrics::{FileMetrics, MetricsVisitor};
pub use nosonar::{NoSonarVisitor, NOSONAR_MARKER};
pub use symbols::{Symbol, SymbolHighlighter, SymbolTable};

/// A visitor run once per successfully parsed file.
pub trait AuxiliaryVisitor: Send + Sync {
    fn visit(&self, ctx: &AnalysisContext, sink: &mut dyn ReportSink) -> anyhow::Result<()>;
}

/// Range of text, without a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextRange {
    pub start_line: usize,
    pub start_offset: usize,
    pub end_line: usize,
    pub end_offset: usize,
}

impl From<&Span> for TextRange {
    fn from(span: &Span) -> Self {
        Self {
            start_line: span.start_line,
            start_offset: span.start_offset,
            end_line: span.end_line,
            end_offset: span.end_offset,
        }
    }
}
