//! Lines longer than a configurable width.

use std::sync::Arc;

use crate::analysis::AnalysisContext;
use crate::checks::{Check, CheckType, RuleParams, TreeVisitor};
use crate::issue::Issue;

pub const DEFAULT_MAX: usize = 120;

pub struct LineTooLongCheck {
    max: usize,
}

impl LineTooLongCheck {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Check for LineTooLongCheck {
    fn as_tree_visitor(&self) -> Option<&dyn TreeVisitor> {
        Some(self)
    }
}

impl TreeVisitor for LineTooLongCheck {
    fn scan_file(&self, ctx: &AnalysisContext) -> anyhow::Result<Vec<Issue>> {
        Ok(ctx
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| {
                // Width in characters, not bytes
                let width = line.chars().count();
                (width > self.max).then(|| {
                    Issue::line(
                        idx + 1,
                        format!(
                            "Line is {} characters long, which is greater than {} authorized.",
                            width, self.max
                        ),
                    )
                })
            })
            .collect())
    }
}

fn create(params: &RuleParams) -> anyhow::Result<Arc<dyn Check>> {
    Ok(Arc::new(LineTooLongCheck::new(params.get_usize("max", DEFAULT_MAX)?)))
}

pub const CHECK_TYPE: CheckType = CheckType {
    key: "LineTooLong",
    name: "Lines should not be too long",
    description: "Line width above the `max` parameter (default 120)",
    default_active: false,
    create,
};
