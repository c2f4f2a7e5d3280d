//! Detection of god files: files with too many lines.

use std::sync::Arc;

use crate::analysis::AnalysisContext;
use crate::checks::{Check, CheckType, RuleParams, TreeVisitor};
use crate::issue::Issue;

/// Maximum lines per file before flagging.
pub const DEFAULT_MAX: usize = 1000;

pub struct FileTooLongCheck {
    max: usize,
}

impl FileTooLongCheck {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Check for FileTooLongCheck {
    fn as_tree_visitor(&self) -> Option<&dyn TreeVisitor> {
        Some(self)
    }
}

impl TreeVisitor for FileTooLongCheck {
    fn scan_file(&self, ctx: &AnalysisContext) -> anyhow::Result<Vec<Issue>> {
        let line_count = ctx.tree().line_count();
        if line_count <= self.max {
            return Ok(Vec::new());
        }
        Ok(vec![Issue::file(format!(
            "File has {} lines, which is greater than {} authorized. Split it into smaller files.",
            line_count, self.max
        ))
        .with_cost((line_count - self.max) as f64)])
    }
}

fn create(params: &RuleParams) -> anyhow::Result<Arc<dyn Check>> {
    Ok(Arc::new(FileTooLongCheck::new(params.get_usize("max", DEFAULT_MAX)?)))
}

pub const CHECK_TYPE: CheckType = CheckType {
    key: "FileTooLong",
    name: "Files should not have too many lines of code",
    description: "File line count above the `max` parameter (default 1000)",
    default_active: true,
    create,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{testing, AnalysisSettings};
    use crate::issue::IssueKind;
    use crate::pipeline::InputFile;

    #[test]
    fn test_file_over_limit() {
        let source = "a\nb\nc\n";
        let file = InputFile::in_memory("a.rs", source);
        let settings = AnalysisSettings::default();
        let ctx = AnalysisContext::new(testing::line_tree(source), &file, &settings);

        let issues = FileTooLongCheck::new(2).scan_file(&ctx).unwrap();
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0].kind, IssueKind::File { .. }));
        assert_eq!(issues[0].cost, Some(1.0));

        assert!(FileTooLongCheck::new(3).scan_file(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_bad_parameter_fails_instantiation() {
        let params = RuleParams::new().with("max", "lots");
        assert!(create(&params).is_err());
    }
}
