//! Report sink: where the pipeline sends what it finds.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::issue::ReportedIssue;
use crate::visitors::{CpdToken, FileMetrics, Highlight, SymbolTable};

use super::InputFile;

/// A file that could not be fully analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisError {
    pub file: String,
    /// Set for parse failures, absent for runtime failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

/// Append-only receiver for one run.
///
/// Only issues and analysis errors must be handled; the auxiliary data
/// hooks default to dropping their input.
pub trait ReportSink {
    fn save_issue(&mut self, file: &InputFile, issue: ReportedIssue);

    fn save_analysis_error(&mut self, error: AnalysisError);

    fn save_metrics(&mut self, _file: &InputFile, _metrics: FileMetrics) {}

    fn save_no_sonar_lines(&mut self, _file: &InputFile, _lines: BTreeSet<usize>) {}

    fn save_highlighting(&mut self, _file: &InputFile, _highlights: Vec<Highlight>) {}

    fn save_cpd_tokens(&mut self, _file: &InputFile, _tokens: Vec<CpdToken>) {}

    fn save_symbol_table(&mut self, _file: &InputFile, _table: SymbolTable) {}
}

/// Everything a [`MemorySink`] received, keyed by display name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    pub issues: Vec<ReportedIssue>,
    /// Issues dropped because their line carries a no-sonar marker.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<ReportedIssue>,
    pub errors: Vec<AnalysisError>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, FileMetrics>,
    #[serde(skip)]
    pub no_sonar: BTreeMap<String, BTreeSet<usize>>,
    #[serde(skip)]
    pub highlighting: BTreeMap<String, Vec<Highlight>>,
    #[serde(skip)]
    pub cpd_tokens: BTreeMap<String, Vec<CpdToken>>,
    #[serde(skip)]
    pub symbols: BTreeMap<String, SymbolTable>,
}

impl AnalysisReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply no-sonar suppression and sort issues by file, then line.
    pub fn finish(mut self) -> Self {
        let (kept, suppressed): (Vec<_>, Vec<_>) = self.issues.into_iter().partition(|issue| {
            match (issue.line(), self.no_sonar.get(&issue.file)) {
                (Some(line), Some(lines)) => !lines.contains(&line),
                _ => true,
            }
        });
        self.issues = kept;
        self.suppressed.extend(suppressed);

        let order = |i: &ReportedIssue| (i.file.clone(), i.line().unwrap_or(0));
        self.issues.sort_by_key(order);
        self.suppressed.sort_by_key(order);
        self.errors
            .sort_by(|a, b| (&a.file, a.line).cmp(&(&b.file, b.line)));
        self
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Collects everything into an [`AnalysisReport`].
#[derive(Debug, Default)]
pub struct MemorySink {
    report: AnalysisReport,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> &AnalysisReport {
        &self.report
    }

    pub fn into_report(self) -> AnalysisReport {
        self.report
    }
}

impl ReportSink for MemorySink {
    fn save_issue(&mut self, _file: &InputFile, issue: ReportedIssue) {
        self.report.issues.push(issue);
    }

    fn save_analysis_error(&mut self, error: AnalysisError) {
        self.report.errors.push(error);
    }

    fn save_metrics(&mut self, file: &InputFile, metrics: FileMetrics) {
        self.report
            .metrics
            .insert(file.display_name().to_string(), metrics);
    }

    fn save_no_sonar_lines(&mut self, file: &InputFile, lines: BTreeSet<usize>) {
        self.report
            .no_sonar
            .entry(file.display_name().to_string())
            .or_default()
            .extend(lines);
    }

    fn save_highlighting(&mut self, file: &InputFile, highlights: Vec<Highlight>) {
        self.report
            .highlighting
            .entry(file.display_name().to_string())
            .or_default()
            .extend(highlights);
    }

    fn save_cpd_tokens(&mut self, file: &InputFile, tokens: Vec<CpdToken>) {
        self.report
            .cpd_tokens
            .entry(file.display_name().to_string())
            .or_default()
            .extend(tokens);
    }

    fn save_symbol_table(&mut self, file: &InputFile, table: SymbolTable) {
        self.report
            .symbols
            .insert(file.display_name().to_string(), table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{Issue, RuleKey};

    fn reported(file: &str, line: usize) -> ReportedIssue {
        ReportedIssue {
            rule_key: RuleKey::new("repo", "R"),
            file: file.to_string(),
            issue: Issue::line(line, "m"),
        }
    }

    #[test]
    fn test_finish_moves_no_sonar_issues() {
        let file = InputFile::in_memory("a.rs", "");
        let mut sink = MemorySink::new();
        sink.save_issue(&file, reported("a.rs", 5));
        sink.save_issue(&file, reported("a.rs", 2));
        sink.save_issue(&file, reported("b.rs", 2));
        sink.save_no_sonar_lines(&file, BTreeSet::from([2]));

        let report = sink.into_report().finish();
        let kept: Vec<_> = report.issues.iter().map(|i| (i.file.as_str(), i.line())).collect();
        assert_eq!(kept, vec![("a.rs", Some(5)), ("b.rs", Some(2))]);
        assert_eq!(report.suppressed.len(), 1);
    }
}
