//! Output formatting for analysis results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use colored::*;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::checks::builtin;
use crate::issue::{IssueKind, IssueLocation, ReportedIssue, RuleKey};
use crate::pipeline::{AnalysisError, AnalysisReport, RunSummary};
use crate::visitors::FileMetrics;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
    Sarif,
}

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub path: &'a str,
    pub files_analyzed: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub cancelled: bool,
    pub issues: &'a [ReportedIssue],
    #[serde(skip_serializing_if = "is_empty")]
    pub suppressed: &'a [ReportedIssue],
    pub errors: &'a [AnalysisError],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<FileMetrics>,
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

pub fn json_report<'a>(path: &'a str, summary: &RunSummary, report: &'a AnalysisReport) -> JsonReport<'a> {
    JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        path,
        files_analyzed: summary.analyzed(),
        files_skipped: summary.skipped(),
        files_failed: summary.failed(),
        cancelled: summary.cancelled,
        issues: &report.issues,
        suppressed: &report.suppressed,
        errors: &report.errors,
        metrics: (!report.metrics.is_empty()).then(|| total_metrics(report)),
    }
}

fn total_metrics(report: &AnalysisReport) -> FileMetrics {
    report
        .metrics
        .values()
        .fold(FileMetrics::default(), |acc, m| FileMetrics {
            lines: acc.lines + m.lines,
            lines_of_code: acc.lines_of_code + m.lines_of_code,
            comment_lines: acc.comment_lines + m.comment_lines,
            functions: acc.functions + m.functions,
            statements: acc.statements + m.statements,
            complexity: acc.complexity + m.complexity,
        })
}

/// Write results in JSON format.
pub fn write_json(path: &str, summary: &RunSummary, report: &AnalysisReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&json_report(path, summary, report))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "sweepcheck";

#[derive(Serialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Serialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invocations: Vec<SarifInvocation>,
}

#[derive(Serialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Serialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Serialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
}

#[derive(Serialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: &'static str,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
    #[serde(rename = "relatedLocations", skip_serializing_if = "Vec::is_empty")]
    pub related_locations: Vec<SarifLocation>,
    #[serde(rename = "properties", skip_serializing_if = "Option::is_none")]
    pub properties: Option<SarifProperties>,
}

#[derive(Serialize)]
pub struct SarifProperties {
    pub gap: f64,
}

#[derive(Serialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Serialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<SarifMessage>,
}

#[derive(Serialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<SarifRegion>,
}

#[derive(Serialize)]
pub struct SarifArtifact {
    pub uri: String,
}

/// SARIF columns are 1-based, ours are 0-based offsets.
#[derive(Serialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: usize,
    #[serde(rename = "startColumn", skip_serializing_if = "Option::is_none")]
    pub start_column: Option<usize>,
    #[serde(rename = "endLine", skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(rename = "endColumn", skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
}

#[derive(Serialize)]
pub struct SarifInvocation {
    #[serde(rename = "executionSuccessful")]
    pub execution_successful: bool,
    #[serde(rename = "toolExecutionNotifications")]
    pub notifications: Vec<SarifNotification>,
}

#[derive(Serialize)]
pub struct SarifNotification {
    pub level: &'static str,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

fn rule_metadata(key: &RuleKey) -> (String, String) {
    let builtin = (key.repository == builtin::REPOSITORY_KEY)
        .then(|| builtin::check_types().into_iter().find(|t| t.key == key.rule))
        .flatten();
    match builtin {
        Some(ty) => (ty.key.to_string(), ty.name.to_string()),
        None => (key.rule.clone(), key.to_string()),
    }
}

fn level(key: &RuleKey) -> &'static str {
    if key.repository == builtin::REPOSITORY_KEY && key.rule == builtin::parsing_error::CHECK_TYPE.key {
        "error"
    } else {
        "warning"
    }
}

fn region(location: &IssueLocation) -> SarifRegion {
    SarifRegion {
        start_line: location.start_line,
        start_column: Some(location.start_offset + 1),
        end_line: Some(location.end_line),
        end_column: Some(location.end_offset + 1),
    }
}

fn sarif_location(file: &str, region: Option<SarifRegion>, message: Option<&str>) -> SarifLocation {
    SarifLocation {
        physical_location: SarifPhysicalLocation {
            artifact_location: SarifArtifact {
                uri: file.to_string(),
            },
            region,
        },
        message: message.map(|text| SarifMessage {
            text: text.to_string(),
        }),
    }
}

fn sarif_result(issue: &ReportedIssue) -> SarifResult {
    let (locations, related) = match &issue.issue.kind {
        IssueKind::File { .. } => (vec![sarif_location(&issue.file, None, None)], Vec::new()),
        IssueKind::Line { line, .. } => {
            let region = SarifRegion {
                start_line: (*line).max(1),
                start_column: None,
                end_line: None,
                end_column: None,
            };
            (vec![sarif_location(&issue.file, Some(region), None)], Vec::new())
        }
        IssueKind::Precise { primary, secondary } => (
            vec![sarif_location(&issue.file, Some(region(primary)), None)],
            secondary
                .iter()
                .map(|s| sarif_location(&issue.file, Some(region(s)), s.message.as_deref()))
                .collect(),
        ),
    };

    SarifResult {
        rule_id: issue.rule_key.to_string(),
        level: level(&issue.rule_key),
        message: SarifMessage {
            text: issue.message().to_string(),
        },
        locations,
        related_locations: related,
        properties: issue.issue.cost.map(|gap| SarifProperties { gap }),
    }
}

pub fn sarif_report(report: &AnalysisReport) -> SarifReport {
    let rule_keys: BTreeSet<&RuleKey> = report.issues.iter().map(|i| &i.rule_key).collect();
    let rules = rule_keys
        .into_iter()
        .map(|key| {
            let (name, description) = rule_metadata(key);
            SarifRule {
                id: key.to_string(),
                name,
                short_description: SarifMessage { text: description },
            }
        })
        .collect();

    let notifications: Vec<SarifNotification> = report
        .errors
        .iter()
        .map(|e| SarifNotification {
            level: "error",
            message: SarifMessage {
                text: e.message.clone(),
            },
            locations: vec![sarif_location(
                &e.file,
                e.line.map(|start_line| SarifRegion {
                    start_line,
                    start_column: None,
                    end_line: None,
                    end_column: None,
                }),
                None,
            )],
        })
        .collect();

    let invocations = if notifications.is_empty() {
        Vec::new()
    } else {
        vec![SarifInvocation {
            execution_successful: true,
            notifications,
        }]
    };

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results: report.issues.iter().map(sarif_result).collect(),
            invocations,
        }],
    }
}

/// Write results in SARIF format.
pub fn write_sarif(report: &AnalysisReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&sarif_report(report))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, config_path: Option<&str>, summary: &RunSummary, report: &AnalysisReport) {
    // Header
    println!();
    print!("  ");
    print!("{}", "sweepcheck".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Analyzing: ".dimmed());
    println!("{}", path);
    print!("  {}", "Config:    ".dimmed());
    println!("{}", config_path.unwrap_or("(defaults)"));
    println!();

    write_summary(summary, report);
    println!();

    if !report.issues.is_empty() {
        write_issues(&report.issues);
        println!();
    }

    if !report.errors.is_empty() {
        write_errors(&report.errors);
        println!();
    }
}

fn write_summary(summary: &RunSummary, report: &AnalysisReport) {
    if report.issues.is_empty() {
        print!("  {}", "✓ CLEAN".green());
    } else {
        print!("  {}", "✗ ISSUES".red());
    }

    print!(
        "  {} analyzed, {} skipped, {} failed",
        summary.analyzed(),
        summary.skipped(),
        summary.failed()
    );

    if !report.suppressed.is_empty() {
        print!(
            "  {}",
            format!("({} suppressed by NOSONAR)", report.suppressed.len()).dimmed()
        );
    }
    if summary.cancelled {
        print!("  {}", "(cancelled)".yellow());
    }
    println!();
}

fn write_issues(issues: &[ReportedIssue]) {
    println!("  {} ({}):", "Issues".bold(), issues.len());
    println!();

    for issue in issues {
        match level(&issue.rule_key) {
            "error" => print!("    {} ", "ERROR".red()),
            _ => print!("    {} ", "WARN ".yellow()),
        }
        print!("   ");
        print!("{:<20}", issue.rule_key.rule.dimmed());
        print!("{}", issue.file.blue());
        if let Some(line) = issue.line() {
            print!("{}", format!(":{}", line).dimmed());
        }
        println!();

        // Message on next line, indented
        println!("            {}", issue.message());
        if let IssueKind::Precise { secondary, .. } = &issue.issue.kind {
            for location in secondary {
                let note = location.message.as_deref().unwrap_or("");
                println!(
                    "              {} {}",
                    format!("{}:{}", issue.file, location).dimmed(),
                    note.dimmed()
                );
            }
        }
        println!();
    }
}

fn write_errors(errors: &[AnalysisError]) {
    println!("  {} ({}):", "Analysis errors".bold(), errors.len());
    for e in errors {
        print!("    {}", e.file.blue());
        if let Some(line) = e.line {
            print!("{}", format!(":{}", line).dimmed());
        }
        println!("  {}", e.message);
    }
}
