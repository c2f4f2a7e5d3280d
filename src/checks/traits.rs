//! Check contract.
//!
//! A check exposes its capabilities through `as_tree_visitor` and
//! `as_semantic_check`. The registry asks once, at registration, and files
//! each instance into the matching pre-filtered lists.

use std::fmt;
use std::sync::Arc;

use crate::analysis::{AnalysisContext, Node, Span};
use crate::issue::Issue;

use super::RuleParams;

/// A rule implementation.
///
/// Instances are shared by every file of a run, so per-file state belongs
/// in the value a check returns from [`SemanticCheck::begin`], never in
/// the check itself.
pub trait Check: Send + Sync {
    /// Tree-visiting capability, if any.
    fn as_tree_visitor(&self) -> Option<&dyn TreeVisitor> {
        None
    }

    /// Semantic (flow-driven) capability, if any.
    fn as_semantic_check(&self) -> Option<&dyn SemanticCheck> {
        None
    }

    /// True only for the rule that reports unparsable files.
    fn reports_parse_errors(&self) -> bool {
        false
    }
}

/// Walks the parsed tree itself, exactly once per file.
pub trait TreeVisitor {
    fn scan_file(&self, ctx: &AnalysisContext) -> anyhow::Result<Vec<Issue>>;
}

/// Driven by the shared [`SemanticDispatcher`](super::SemanticDispatcher).
pub trait SemanticCheck {
    /// Start a fresh per-file scope.
    fn begin<'a>(&'a self, ctx: &AnalysisContext) -> anyhow::Result<Box<dyn SemanticScope + 'a>>;
}

/// Per-file state of a semantic check.
pub trait SemanticScope {
    /// Called before the node's children are visited.
    fn enter(&mut self, _node: &Node, _flow: &FlowState, _ctx: &AnalysisContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called after the node's children were visited.
    fn leave(&mut self, _node: &Node, _flow: &FlowState, _ctx: &AnalysisContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// Issues found in the file.
    fn finish(self: Box<Self>, ctx: &AnalysisContext) -> anyhow::Result<Vec<Issue>>;
}

/// Flow information maintained by the dispatcher during its single walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowState {
    /// Number of enclosing functions.
    pub function_depth: usize,
    /// Branches/loops/catches enclosing the node within its function.
    pub nesting: usize,
    /// False once an earlier statement of the same block always exits.
    pub reachable: bool,
    /// The exit statement that made the rest of the block unreachable.
    pub terminated_by: Option<Span>,
    /// Whether the node is a statement directly inside a block.
    pub is_statement: bool,
    /// Enclosing block, for statements.
    pub block: Option<Span>,
}

impl Default for FlowState {
    fn default() -> Self {
        Self {
            function_depth: 0,
            nesting: 0,
            reachable: true,
            terminated_by: None,
            is_statement: false,
            block: None,
        }
    }
}

/// Factory function type for creating check instances.
pub type CheckFactory = fn(&RuleParams) -> anyhow::Result<Arc<dyn Check>>;

/// Describes a check class: its rule id, metadata and how to build it.
#[derive(Clone, Copy)]
pub struct CheckType {
    /// Rule id within its repository (e.g. "HollowTodo").
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Part of the default profile.
    pub default_active: bool,
    pub create: CheckFactory,
}

impl fmt::Debug for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckType")
            .field("key", &self.key)
            .field("default_active", &self.default_active)
            .finish()
    }
}
