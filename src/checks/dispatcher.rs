//! Shared driver for semantic checks.
//!
//! All semantic checks of a run are fed from one pre-order walk of the
//! tree, so adding another semantic check never adds another traversal.

use std::sync::Arc;

use crate::analysis::{AnalysisContext, Node, NodeCategory};
use crate::issue::CollectedIssue;

use super::{Check, FlowState, SemanticScope};

pub struct SemanticDispatcher<'c> {
    checks: &'c [Arc<dyn Check>],
}

struct ActiveScope<'c> {
    check: &'c Arc<dyn Check>,
    scope: Box<dyn SemanticScope + 'c>,
}

impl<'c> SemanticDispatcher<'c> {
    /// Checks without the semantic capability are ignored.
    pub fn new(checks: &'c [Arc<dyn Check>]) -> Self {
        Self { checks }
    }

    /// Run every semantic check over the file and collect their issues.
    pub fn dispatch(&self, ctx: &AnalysisContext) -> anyhow::Result<Vec<CollectedIssue>> {
        let mut scopes = Vec::new();
        for check in self.checks {
            if let Some(semantic) = check.as_semantic_check() {
                scopes.push(ActiveScope {
                    check,
                    scope: semantic.begin(ctx)?,
                });
            }
        }
        if scopes.is_empty() {
            return Ok(Vec::new());
        }

        let mut flow = FlowState::default();
        walk(&ctx.tree().root, &mut flow, &mut scopes, ctx)?;

        let mut issues = Vec::new();
        for active in scopes {
            let check = Arc::clone(active.check);
            issues.extend(
                active
                    .scope
                    .finish(ctx)?
                    .into_iter()
                    .map(|issue| CollectedIssue {
                        check: Arc::clone(&check),
                        issue,
                    }),
            );
        }
        Ok(issues)
    }
}

/// A node whose children are still being visited.
struct Frame<'n> {
    node: &'n Node,
    /// Flow state the node was entered with; restored when it is left.
    entry: FlowState,
    next_child: usize,
}

/// Pre-order walk with an explicit stack, so tree depth never grows the
/// call stack.
fn walk(
    root: &Node,
    flow: &mut FlowState,
    scopes: &mut [ActiveScope<'_>],
    ctx: &AnalysisContext,
) -> anyhow::Result<()> {
    let mut stack = Vec::new();
    open(root, flow, scopes, ctx, &mut stack)?;

    while let Some(frame) = stack.last_mut() {
        let node = frame.node;
        let is_block = node.category == NodeCategory::Block;

        if is_block && frame.next_child > 0 {
            let finished = &node.children[frame.next_child - 1];
            if flow.is_statement && flow.reachable && terminates(finished) {
                flow.reachable = false;
                flow.terminated_by = Some(finished.span);
            }
        }

        let child = node.children.get(frame.next_child);
        if child.is_some() {
            frame.next_child += 1;
        }

        match child {
            Some(child) => {
                if is_block {
                    flow.is_statement = child.named && child.category != NodeCategory::Comment;
                    flow.block = Some(node.span);
                } else {
                    flow.is_statement = false;
                    flow.block = None;
                }
                open(child, flow, scopes, ctx, &mut stack)?;
            }
            None => {
                if let Some(frame) = stack.pop() {
                    *flow = frame.entry;
                    for active in scopes.iter_mut() {
                        active.scope.leave(node, flow, ctx)?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn open<'n>(
    node: &'n Node,
    flow: &mut FlowState,
    scopes: &mut [ActiveScope<'_>],
    ctx: &AnalysisContext,
    stack: &mut Vec<Frame<'n>>,
) -> anyhow::Result<()> {
    let entry = flow.clone();

    for active in scopes.iter_mut() {
        active.scope.enter(node, flow, ctx)?;
    }

    match node.category {
        NodeCategory::Function => {
            flow.function_depth += 1;
            flow.nesting = 0;
            flow.reachable = true;
            flow.terminated_by = None;
        }
        category if category.is_nesting() => flow.nesting += 1,
        _ => {}
    }

    stack.push(Frame {
        node,
        entry,
        next_child: 0,
    });
    Ok(())
}

/// Whether a statement unconditionally leaves its block.
fn terminates(statement: &Node) -> bool {
    match statement.category {
        NodeCategory::Exit => true,
        // expression_statement wrappers around `return`/`break`
        NodeCategory::Other => statement
            .named_children()
            .next()
            .is_some_and(|c| c.category == NodeCategory::Exit),
        _ => false,
    }
}
