//! Issue types emitted by checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::checks::Check;

use super::location::check_line;
use super::{IssueLocation, LocationError, RuleKey};

/// Where an issue applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IssueKind {
    /// Applies to the whole file.
    File { message: String },
    /// Applies to one source line (1-based).
    Line { message: String, line: usize },
    /// Applies to a precise range, with optional related ranges.
    Precise {
        primary: IssueLocation,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        secondary: Vec<IssueLocation>,
    },
}

/// A finding returned by a check.
///
/// The check that produced it is attached by the pipeline, which keeps
/// attribution out of the check implementations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(flatten)]
    pub kind: IssueKind,
    /// Remediation effort ("gap"), only present when the check supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl Issue {
    pub fn file(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::File {
                message: message.into(),
            },
            cost: None,
        }
    }

    pub fn line(line: usize, message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Line {
                message: message.into(),
                line,
            },
            cost: None,
        }
    }

    pub fn precise(primary: IssueLocation) -> Self {
        Self {
            kind: IssueKind::Precise {
                primary,
                secondary: Vec::new(),
            },
            cost: None,
        }
    }

    /// Add a secondary location. No-op on file and line issues.
    pub fn secondary(mut self, location: IssueLocation) -> Self {
        if let IssueKind::Precise { secondary, .. } = &mut self.kind {
            secondary.push(location);
        }
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Primary message. Precise issues without a primary message yield "".
    pub fn message(&self) -> &str {
        match &self.kind {
            IssueKind::File { message } | IssueKind::Line { message, .. } => message,
            IssueKind::Precise { primary, .. } => primary.message.as_deref().unwrap_or(""),
        }
    }

    /// Check every location of the issue against a file of `lines` lines.
    pub fn validate(&self, lines: usize) -> Result<(), LocationError> {
        match &self.kind {
            IssueKind::File { .. } => Ok(()),
            IssueKind::Line { line, .. } => check_line(*line, lines),
            IssueKind::Precise { primary, secondary } => {
                primary.validate(lines)?;
                secondary.iter().try_for_each(|loc| loc.validate(lines))
            }
        }
    }

    /// Primary line, `None` for file-level issues.
    pub fn line_number(&self) -> Option<usize> {
        match &self.kind {
            IssueKind::File { .. } => None,
            IssueKind::Line { line, .. } => Some(*line),
            IssueKind::Precise { primary, .. } => Some(primary.start_line),
        }
    }
}

/// An issue together with the check instance that emitted it.
#[derive(Clone)]
pub struct CollectedIssue {
    pub check: Arc<dyn Check>,
    pub issue: Issue,
}

impl fmt::Debug for CollectedIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectedIssue")
            .field("check", &Arc::as_ptr(&self.check).cast::<()>())
            .field("issue", &self.issue)
            .finish()
    }
}

/// An issue whose rule has been resolved, ready for the report sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportedIssue {
    #[serde(rename = "rule")]
    pub rule_key: RuleKey,
    /// Path of the file as shown to users.
    pub file: String,
    #[serde(flatten)]
    pub issue: Issue,
}

impl ReportedIssue {
    pub fn message(&self) -> &str {
        self.issue.message()
    }

    pub fn line(&self) -> Option<usize> {
        self.issue.line_number()
    }
}
