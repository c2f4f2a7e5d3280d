//! Issue and location model.
//!
//! Checks report findings at one of three granularities: the whole file, a
//! single line, or a precise range with optional secondary ranges.

mod location;
mod types;

pub use location::{IssueLocation, LocationError, RuleKey};
pub use types::{CollectedIssue, Issue, IssueKind, ReportedIssue};
