//! Hollow work markers.
//!
//! A TODO-style marker is fine when it says what is missing, e.g.
//! `// TODO: retry on EAGAIN once the socket is non-blocking`. It is
//! reported when the text after the marker is empty or one of a known set
//! of placeholder phrases such as `fix this` or `finish later`.
//!
//! Only comment nodes are scanned, so markers inside string literals are
//! never reported.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::{AnalysisContext, NodeCategory};
use crate::checks::{Check, CheckType, RuleParams, TreeVisitor};
use crate::issue::Issue;

lazy_static! {
    /// Marker keyword plus whatever follows it on the line.
    static ref TODO_PATTERN: Regex = Regex::new(
        r"(?i)\b(TODO|FIXME|XXX|HACK)\b\s*:?\s*(.*)"
    ).unwrap();

    /// Generic placeholder text without technical specifics.
    static ref HOLLOW_PATTERNS: Vec<Regex> = vec![
        // verb + generic object, with optional filler words
        Regex::new(r"(?i)^(implement|finish|complete|add|write)(\s+(this|here|later|the))?(\s+(function|method|code|logic|feature|implementation))?$").unwrap(),
        Regex::new(r"(?i)^(finish|complete)\s+(implementation|later)$").unwrap(),
        Regex::new(r"(?i)^add\s+(code|implementation|logic)$").unwrap(),
        Regex::new(r"(?i)^fix(\s+(this|here|it|later|the))?(\s+(bug|issue|error|problem))?$").unwrap(),
        Regex::new(r"(?i)^fix\s+(bug|issue|error|problem)$").unwrap(),
        Regex::new(r"(?i)^do(\s+(this|something|later))?$").unwrap(),
        Regex::new(r"(?i)^handle(\s+(this|here|it|the))?(\s+(error|case|exception))?$").unwrap(),
        Regex::new(r"(?i)^fill\s*(this\s*)?in\s*(later|here)?$").unwrap(),

        // bare placeholders
        Regex::new(r"(?i)^(placeholder|stub|tbd|wip)$").unwrap(),

        // "not implemented" and friends
        Regex::new(r"(?i)^not\s+implemented\s*(yet)?$").unwrap(),
        Regex::new(r"(?i)^needs?\s+(implementation|work|to\s+be\s+done)$").unwrap(),

        // verb + deictic pronoun
        Regex::new(r"(?i)^(change|remove|delete)\s+(this|me|later)$").unwrap(),
        Regex::new(r"(?i)^(update|refactor|cleanup|clean\s+up)\s+(this|here|later)$").unwrap(),
    ];

    /// Comment delimiters trimmed from the captured text.
    static ref TRAILING_DELIMITER: Regex = Regex::new(r"\s*(\*/|-->|\*\)|\})\s*$").unwrap();
}

/// True when the marker text names nothing specific.
fn is_hollow_todo(content: &str) -> bool {
    let trimmed = content
        .trim()
        .trim_end_matches(|c: char| c == '.' || c == '!')
        .trim();
    trimmed.is_empty() || HOLLOW_PATTERNS.iter().any(|p| p.is_match(trimmed))
}

/// Flags TODO/FIXME/XXX/HACK comments that carry no actionable context.
pub struct HollowTodoCheck;

impl Check for HollowTodoCheck {
    fn as_tree_visitor(&self) -> Option<&dyn TreeVisitor> {
        Some(self)
    }
}

impl TreeVisitor for HollowTodoCheck {
    fn scan_file(&self, ctx: &AnalysisContext) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for comment in ctx.tree().nodes_of(NodeCategory::Comment) {
            for (idx, line) in ctx.text(comment).lines().enumerate() {
                let Some(caps) = TODO_PATTERN.captures(line) else {
                    continue;
                };
                let marker = caps.get(1).map(|m| m.as_str()).unwrap_or("TODO");
                let raw = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                let content = TRAILING_DELIMITER.replace(raw, "");

                if !is_hollow_todo(&content) {
                    continue;
                }

                let message = if content.trim().is_empty() {
                    format!("{} marker without context", marker.to_uppercase())
                } else {
                    format!(
                        "{} with hollow context: {:?}",
                        marker.to_uppercase(),
                        content.trim()
                    )
                };
                issues.push(Issue::line(comment.span.start_line + idx, message));
            }
        }

        Ok(issues)
    }
}

fn create(_params: &RuleParams) -> anyhow::Result<Arc<dyn Check>> {
    Ok(Arc::new(HollowTodoCheck))
}

pub const CHECK_TYPE: CheckType = CheckType {
    key: "HollowTodo",
    name: "TODO markers should explain what is left to do",
    description: "TODO/FIXME/XXX/HACK comments without specific context",
    default_active: true,
    create,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{testing, AnalysisSettings};
    use crate::pipeline::InputFile;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placeholder_phrases_are_hollow() {
        for text in [
            "",
            "  ",
            "write code",
            "implement the method",
            "Complete implementation.",
            "fix it",
            "fix the bug",
            "handle error",
            "fill in later",
            "stub",
            "WIP!",
            "not implemented yet",
            "need work",
            "remove me",
            "clean up later",
        ] {
            assert!(is_hollow_todo(text), "expected hollow: {:?}", text);
        }
    }

    #[test]
    fn test_specific_markers_are_kept() {
        for text in [
            "retry on EAGAIN once the socket is non-blocking",
            "drop this shim after MSRV 1.80",
            "tracked in #412",
            "fix off-by-one when the buffer wraps",
            "implement Display for Span",
        ] {
            assert!(!is_hollow_todo(text), "expected specific: {:?}", text);
        }
    }

    #[test]
    fn test_scan_comments_only() {
        let source = "// TODO: implement this function\nlet s = \"TODO\";\n// TODO: Use io_uring when kernel >= 5.19\n/* FIXME */\n";
        let file = InputFile::in_memory("a.rs", source);
        let settings = AnalysisSettings::default();
        let ctx = AnalysisContext::new(testing::line_tree(source), &file, &settings);

        let issues = HollowTodoCheck.scan_file(&ctx).unwrap();
        let found: Vec<_> = issues
            .iter()
            .map(|i| (i.line_number().unwrap(), i.message().to_string()))
            .collect();
        assert_eq!(
            found,
            vec![
                (1, "TODO with hollow context: \"implement this function\"".to_string()),
                (4, "FIXME marker without context".to_string()),
            ]
        );
    }
}
