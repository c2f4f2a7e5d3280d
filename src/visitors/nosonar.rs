//! No-sonar suppression bookkeeping.
//!
//! Records the lines whose comments carry the `NOSONAR` marker. Issues on
//! those lines are filtered out host-side, see
//! [`AnalysisReport::finish`](crate::pipeline::AnalysisReport::finish).

use std::collections::BTreeSet;

use crate::analysis::AnalysisContext;
use crate::pipeline::ReportSink;

use super::AuxiliaryVisitor;

pub const NOSONAR_MARKER: &str = "NOSONAR";

pub struct NoSonarVisitor;

impl NoSonarVisitor {
    pub fn no_sonar_lines(ctx: &AnalysisContext) -> BTreeSet<usize> {
        let mut lines = BTreeSet::new();
        for comment in ctx.comments() {
            for (idx, line) in ctx.text(comment).lines().enumerate() {
                if line.contains(NOSONAR_MARKER) {
                    lines.insert(comment.span.start_line + idx);
                }
            }
        }
        lines
    }
}

impl AuxiliaryVisitor for NoSonarVisitor {
    fn visit(&self, ctx: &AnalysisContext, sink: &mut dyn ReportSink) -> anyhow::Result<()> {
        let lines = Self::no_sonar_lines(ctx);
        if !lines.is_empty() {
            sink.save_no_sonar_lines(ctx.file(), lines);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{testing, AnalysisSettings};
    use crate::pipeline::InputFile;

    #[test]
    fn test_marker_lines() {
        let source = "// NOSONAR in header\nx\n// NOSONAR\ny\n// nosonar\n";
        let file = InputFile::in_memory("a.rs", source);
        let settings = AnalysisSettings::default();
        let ctx = AnalysisContext::new(testing::line_tree(source), &file, &settings);

        let lines: Vec<_> = NoSonarVisitor::no_sonar_lines(&ctx).into_iter().collect();
        assert_eq!(lines, vec![3]);
    }
}
