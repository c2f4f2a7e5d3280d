//! Detection of functions with high cyclomatic complexity.
//!
//! Cyclomatic complexity is calculated as:
//! - Start at 1
//! - Add 1 for each branch, loop, catch clause and short-circuit operator
//!
//! Every decision point is attached to the issue as a secondary location so
//! the reader can see where the complexity comes from. Nested functions are
//! measured on their own and do not add to the enclosing function.

use std::sync::Arc;

use crate::analysis::{AnalysisContext, Node, NodeCategory};
use crate::checks::{Check, CheckType, FlowState, RuleParams, SemanticCheck, SemanticScope};
use crate::issue::{Issue, IssueLocation};

pub const DEFAULT_MAX: usize = 10;

pub struct FunctionComplexityCheck {
    max: usize,
}

impl FunctionComplexityCheck {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Check for FunctionComplexityCheck {
    fn as_semantic_check(&self) -> Option<&dyn SemanticCheck> {
        Some(self)
    }
}

impl SemanticCheck for FunctionComplexityCheck {
    fn begin<'a>(&'a self, _ctx: &AnalysisContext) -> anyhow::Result<Box<dyn SemanticScope + 'a>> {
        Ok(Box::new(ComplexityScope {
            max: self.max,
            frames: Vec::new(),
            issues: Vec::new(),
        }))
    }
}

struct Frame {
    name: IssueLocation,
    decisions: Vec<IssueLocation>,
}

struct ComplexityScope {
    max: usize,
    frames: Vec<Frame>,
    issues: Vec<Issue>,
}

/// Where a function is reported: its declared name, else its first token.
fn name_location(function: &Node) -> IssueLocation {
    function
        .children
        .iter()
        .find(|c| c.category == NodeCategory::DeclarationName)
        .or_else(|| function.children.first())
        .map(IssueLocation::from_node)
        .unwrap_or_else(|| IssueLocation::from_node(function))
}

/// Keyword that introduces a decision point, or the whole node.
fn decision_location(node: &Node) -> IssueLocation {
    match node.children.first() {
        Some(first) if first.is_leaf() && first.category == NodeCategory::Keyword => {
            IssueLocation::from_node(first)
        }
        _ => IssueLocation::from_node(node),
    }
}

impl SemanticScope for ComplexityScope {
    fn enter(&mut self, node: &Node, _flow: &FlowState, _ctx: &AnalysisContext) -> anyhow::Result<()> {
        if node.category == NodeCategory::Function {
            self.frames.push(Frame {
                name: name_location(node),
                decisions: Vec::new(),
            });
        } else if node.category.is_decision_point() {
            if let Some(frame) = self.frames.last_mut() {
                frame.decisions.push(decision_location(node).with_message("+1"));
            }
        }
        Ok(())
    }

    fn leave(&mut self, node: &Node, _flow: &FlowState, _ctx: &AnalysisContext) -> anyhow::Result<()> {
        if node.category != NodeCategory::Function {
            return Ok(());
        }
        let Some(frame) = self.frames.pop() else {
            return Ok(());
        };

        let complexity = frame.decisions.len() + 1;
        if complexity > self.max {
            let primary = frame.name.with_message(format!(
                "Function has a complexity of {} which is greater than {} authorized.",
                complexity, self.max
            ));
            let issue = frame
                .decisions
                .into_iter()
                .fold(Issue::precise(primary), Issue::secondary)
                .with_cost((complexity - self.max) as f64);
            self.issues.push(issue);
        }
        Ok(())
    }

    fn finish(self: Box<Self>, _ctx: &AnalysisContext) -> anyhow::Result<Vec<Issue>> {
        Ok(self.issues)
    }
}

fn create(params: &RuleParams) -> anyhow::Result<Arc<dyn Check>> {
    Ok(Arc::new(FunctionComplexityCheck::new(params.get_usize("max", DEFAULT_MAX)?)))
}

pub const CHECK_TYPE: CheckType = CheckType {
    key: "FunctionComplexity",
    name: "Cyclomatic complexity of functions should not be too high",
    description: "Function complexity above the `max` parameter (default 10)",
    default_active: true,
    create,
};
