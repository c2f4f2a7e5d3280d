//! Statements that can never run because an earlier statement of the same
//! block always leaves it (return, break, continue, throw/raise).
//!
//! One issue per dead region, on its first statement.

use std::collections::HashSet;
use std::sync::Arc;

use crate::analysis::{AnalysisContext, Node};
use crate::checks::{Check, CheckType, FlowState, RuleParams, SemanticCheck, SemanticScope};
use crate::issue::{Issue, IssueLocation};

pub const MESSAGE: &str = "Remove this unreachable code.";

pub struct UnreachableCodeCheck;

impl Check for UnreachableCodeCheck {
    fn as_semantic_check(&self) -> Option<&dyn SemanticCheck> {
        Some(self)
    }
}

impl SemanticCheck for UnreachableCodeCheck {
    fn begin<'a>(&'a self, _ctx: &AnalysisContext) -> anyhow::Result<Box<dyn SemanticScope + 'a>> {
        Ok(Box::new(UnreachableScope::default()))
    }
}

#[derive(Default)]
struct UnreachableScope {
    /// Byte ranges of exit statements already reported.
    reported: HashSet<(usize, usize)>,
    issues: Vec<Issue>,
}

impl SemanticScope for UnreachableScope {
    fn enter(&mut self, node: &Node, flow: &FlowState, _ctx: &AnalysisContext) -> anyhow::Result<()> {
        if !flow.is_statement || flow.reachable {
            return Ok(());
        }
        let Some(exit) = flow.terminated_by else {
            return Ok(());
        };
        if !self.reported.insert((exit.start_byte, exit.end_byte)) {
            return Ok(());
        }

        let primary = IssueLocation::from_node(node).with_message(MESSAGE);
        self.issues.push(
            Issue::precise(primary).secondary(IssueLocation::from_span(&exit).with_message("Exits here")),
        );
        Ok(())
    }

    fn finish(self: Box<Self>, _ctx: &AnalysisContext) -> anyhow::Result<Vec<Issue>> {
        Ok(self.issues)
    }
}

fn create(_params: &RuleParams) -> anyhow::Result<Arc<dyn Check>> {
    Ok(Arc::new(UnreachableCodeCheck))
}

pub const CHECK_TYPE: CheckType = CheckType {
    key: "UnreachableCode",
    name: "Unreachable code should be removed",
    description: "Statements following a return, break, continue or throw in the same block",
    default_active: true,
    create,
};
