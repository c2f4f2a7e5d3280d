//! Rule keys and issue locations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::analysis::{Node, Span};

/// Stable identifier of a rule: the repository it belongs to plus its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleKey {
    pub repository: String,
    pub rule: String,
}

impl RuleKey {
    pub fn new(repository: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            rule: rule.into(),
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.rule)
    }
}

impl Serialize for RuleKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for RuleKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((repo, rule)) if !repo.is_empty() && !rule.is_empty() && !rule.contains(':') => {
                Ok(RuleKey::new(repo, rule))
            }
            _ => Err(format!("invalid rule key {:?}, expected <repository>:<rule>", s)),
        }
    }
}

/// A location that does not fit the file it was reported on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("line {line} is outside the file (1..={lines})")]
    LineOutOfRange { line: usize, lines: usize },

    #[error("range {0} ends before it starts")]
    Reversed(String),
}

/// Check that `line` is a line of a file with `lines` lines.
pub(crate) fn check_line(line: usize, lines: usize) -> Result<(), LocationError> {
    if line == 0 || line > lines {
        return Err(LocationError::LineOutOfRange { line, lines });
    }
    Ok(())
}

/// A precise range in a file, optionally annotated with a message.
///
/// Lines are 1-based, offsets are 0-based byte columns; the end is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLocation {
    pub start_line: usize,
    pub start_offset: usize,
    pub end_line: usize,
    pub end_offset: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IssueLocation {
    /// Build a range. Returns `None` when the end precedes the start or a
    /// line number is 0.
    pub fn range(
        start_line: usize,
        start_offset: usize,
        end_line: usize,
        end_offset: usize,
    ) -> Option<Self> {
        if start_line == 0 || (end_line, end_offset) < (start_line, start_offset) {
            return None;
        }
        Some(Self {
            start_line,
            start_offset,
            end_line,
            end_offset,
            message: None,
        })
    }

    pub fn from_span(span: &Span) -> Self {
        Self {
            start_line: span.start_line,
            start_offset: span.start_offset,
            end_line: span.end_line,
            end_offset: span.end_offset,
            message: None,
        }
    }

    pub fn from_node(node: &Node) -> Self {
        Self::from_span(&node.span)
    }

    /// Range from the start of `first` to the end of `last`.
    pub fn from_nodes(first: &Node, last: &Node) -> Self {
        Self::from_span(&first.span.cover(&last.span))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Check the range against a file of `lines` lines.
    pub fn validate(&self, lines: usize) -> Result<(), LocationError> {
        check_line(self.start_line, lines)?;
        check_line(self.end_line, lines)?;
        if (self.end_line, self.end_offset) < (self.start_line, self.start_offset) {
            return Err(LocationError::Reversed(self.to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for IssueLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_offset, self.end_line, self.end_offset
        )
    }
}
