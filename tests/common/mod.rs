//! Shared doubles for the integration tests: a line-based parser and a few
//! checks with controllable behavior.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Context;
use sweepcheck::analysis::{
    AnalysisContext, Node, NodeCategory, ParseError, SourceParser, Span, SyntaxTree,
};
use sweepcheck::checks::{
    Check, CheckType, FlowState, RuleParams, SemanticCheck, SemanticScope, TreeVisitor,
};
use sweepcheck::issue::{Issue, IssueLocation};
use sweepcheck::pipeline::Interrupted;

/// One node per non-blank line, under a root block.
///
/// `//` lines are comments, `return` is an exit, a line reading `@@` is a
/// syntax error.
pub struct LineParser;

impl SourceParser for LineParser {
    fn language_id(&self) -> &'static str {
        "lines"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["txt"]
    }

    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
        let mut children = Vec::new();
        let mut byte = 0;
        for (idx, line) in source.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed == "@@" {
                return Err(ParseError::new(idx + 1, "unexpected '@@'"));
            }
            if !trimmed.is_empty() {
                let start = line.len() - line.trim_start().len();
                let category = if trimmed.starts_with("//") {
                    NodeCategory::Comment
                } else if trimmed == "return" {
                    NodeCategory::Exit
                } else {
                    NodeCategory::Identifier
                };
                children.push(Node::new(
                    "line",
                    category,
                    Span::on_line(idx + 1, start, start + trimmed.len(), byte + start),
                ));
            }
            byte += line.len() + 1;
        }

        let lines = source.lines().count().max(1);
        let root = Node::new(
            "file",
            NodeCategory::Block,
            Span {
                start_byte: 0,
                end_byte: source.len(),
                start_line: 1,
                start_offset: 0,
                end_line: lines,
                end_offset: 0,
            },
        )
        .with_children(children);
        Ok(SyntaxTree::new(root, source))
    }
}

/// Line issue on every line containing `MARK`.
pub struct MarkerCheck;

impl Check for MarkerCheck {
    fn as_tree_visitor(&self) -> Option<&dyn TreeVisitor> {
        Some(self)
    }
}

impl TreeVisitor for MarkerCheck {
    fn scan_file(&self, ctx: &AnalysisContext) -> anyhow::Result<Vec<Issue>> {
        Ok(ctx
            .lines()
            .enumerate()
            .filter(|(_, l)| l.contains("MARK"))
            .map(|(i, _)| Issue::line(i + 1, "marker found"))
            .collect())
    }
}

/// Fails on files containing `boom`, interrupts on `interrupt`, panics on
/// `panic`; otherwise reports one file issue.
pub struct MoodyCheck;

impl Check for MoodyCheck {
    fn as_tree_visitor(&self) -> Option<&dyn TreeVisitor> {
        Some(self)
    }
}

impl TreeVisitor for MoodyCheck {
    fn scan_file(&self, ctx: &AnalysisContext) -> anyhow::Result<Vec<Issue>> {
        let text = ctx.tree().source();
        if text.contains("interrupt") {
            return Err(Interrupted).context("waiting for symbol table").context("moody check");
        }
        if text.contains("boom") {
            anyhow::bail!("moody check exploded");
        }
        if text.contains("panic") {
            panic!("moody check panicked");
        }
        Ok(vec![Issue::file("moody check ran")])
    }
}

/// Semantic check reporting every identifier as a precise issue.
pub struct IdentifierCheck;

impl Check for IdentifierCheck {
    fn as_semantic_check(&self) -> Option<&dyn SemanticCheck> {
        Some(self)
    }
}

impl SemanticCheck for IdentifierCheck {
    fn begin<'a>(&'a self, _ctx: &AnalysisContext) -> anyhow::Result<Box<dyn SemanticScope + 'a>> {
        Ok(Box::new(IdentifierScope(Vec::new())))
    }
}

struct IdentifierScope(Vec<Issue>);

impl SemanticScope for IdentifierScope {
    fn enter(&mut self, node: &Node, flow: &FlowState, ctx: &AnalysisContext) -> anyhow::Result<()> {
        if node.category == NodeCategory::Identifier && flow.reachable {
            let location = IssueLocation::from_node(node).with_message(ctx.text(node).to_string());
            self.0.push(Issue::precise(location));
        }
        Ok(())
    }

    fn finish(self: Box<Self>, _ctx: &AnalysisContext) -> anyhow::Result<Vec<Issue>> {
        Ok(self.0)
    }
}

/// Reports at line 0 on `zero`, past the end on `eof`, a reversed range
/// on `reversed`; otherwise one issue on line 1.
pub struct StrayCheck;

impl Check for StrayCheck {
    fn as_tree_visitor(&self) -> Option<&dyn TreeVisitor> {
        Some(self)
    }
}

impl TreeVisitor for StrayCheck {
    fn scan_file(&self, ctx: &AnalysisContext) -> anyhow::Result<Vec<Issue>> {
        let text = ctx.tree().source();
        let issue = if text.contains("zero") {
            Issue::line(0, "line zero")
        } else if text.contains("eof") {
            Issue::line(999, "past eof")
        } else if text.contains("reversed") {
            Issue::precise(IssueLocation {
                start_line: 1,
                start_offset: 9,
                end_line: 1,
                end_offset: 0,
                message: None,
            })
        } else {
            Issue::line(1, "in bounds")
        };
        Ok(vec![issue])
    }
}

fn create_marker(_: &RuleParams) -> anyhow::Result<Arc<dyn Check>> {
    Ok(Arc::new(MarkerCheck))
}

fn create_moody(_: &RuleParams) -> anyhow::Result<Arc<dyn Check>> {
    Ok(Arc::new(MoodyCheck))
}

fn create_stray(_: &RuleParams) -> anyhow::Result<Arc<dyn Check>> {
    Ok(Arc::new(StrayCheck))
}

fn create_identifier(_: &RuleParams) -> anyhow::Result<Arc<dyn Check>> {
    Ok(Arc::new(IdentifierCheck))
}

pub const MARKER: CheckType = CheckType {
    key: "Marker",
    name: "Marker",
    description: "Lines containing MARK",
    default_active: true,
    create: create_marker,
};

pub const MOODY: CheckType = CheckType {
    key: "Moody",
    name: "Moody",
    description: "Fails on demand",
    default_active: true,
    create: create_moody,
};

pub const IDENTIFIER: CheckType = CheckType {
    key: "Identifier",
    name: "Identifier",
    description: "Every reachable identifier",
    default_active: true,
    create: create_identifier,
};

pub const STRAY: CheckType = CheckType {
    key: "Stray",
    name: "Stray",
    description: "Reports outside the file on demand",
    default_active: true,
    create: create_stray,
};
