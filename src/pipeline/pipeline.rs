//! Per-file analysis loop.
//!
//! Each file goes through skip check, parse, dispatch and report. Failures
//! stay inside the file that caused them: a parse or runtime failure is
//! recorded as an analysis error and the loop moves on. Only cancellation
//! and registry faults end a run early.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, error};

use crate::analysis::{AnalysisContext, AnalysisSettings, ParseError, SourceParser};
use crate::checks::builtin::parsing_error;
use crate::checks::{CheckRegistry, RegistryError, SemanticDispatcher};
use crate::issue::{CollectedIssue, Issue, ReportedIssue, RuleKey};
use crate::visitors::AuxiliaryVisitor;

use super::{
    is_interruption, AnalysisError, CancellationToken, FileFilter, IncludeAll, InputFile,
    ProductProfile, ProgressReport, ReportSink, SilentProgress,
};

/// Faults that abort a run. None of them depends on the files analyzed.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("a registered check has no resolvable rule key")]
    UnresolvedRuleKey,
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// How a failed dispatch is handled.
#[derive(Debug)]
pub enum DispatchFailure {
    /// Recorded against the file; the run continues.
    Recovered(anyhow::Error),
    /// The whole run stops, cleanly.
    Cancelled,
}

impl DispatchFailure {
    pub fn classify(err: anyhow::Error) -> Self {
        if is_interruption(&err) {
            DispatchFailure::Cancelled
        } else {
            DispatchFailure::Recovered(err)
        }
    }
}

/// Terminal state of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Analyzed { issues: usize },
    Skipped,
    ParseFailed { line: usize },
    RuntimeFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub file: String,
    pub outcome: FileOutcome,
}

/// What happened during a run, file by file.
///
/// Files not reached because of cancellation are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: Vec<FileSummary>,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn outcome(&self, file: &str) -> Option<&FileOutcome> {
        self.files.iter().find(|f| f.file == file).map(|f| &f.outcome)
    }

    pub fn analyzed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Analyzed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                FileOutcome::ParseFailed { .. } | FileOutcome::RuntimeFailed { .. }
            )
        })
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Why the per-file step stopped the loop.
enum Stop {
    Cancelled,
    Fatal(PipelineError),
}

/// Orchestrates parsing and check dispatch over a set of files.
pub struct AnalysisPipeline {
    registry: CheckRegistry,
    parser: Box<dyn SourceParser>,
    product: ProductProfile,
    settings: AnalysisSettings,
    filter: Box<dyn FileFilter>,
    progress: Box<dyn ProgressReport>,
    cancellation: CancellationToken,
    parsing_error_key: Option<RuleKey>,
}

impl AnalysisPipeline {
    /// Create a pipeline over a fully built registry.
    ///
    /// Fails when an active rule is unknown to its repository or a
    /// registered check does not resolve to a rule key.
    pub fn new(
        registry: CheckRegistry,
        parser: Box<dyn SourceParser>,
        product: ProductProfile,
        settings: AnalysisSettings,
    ) -> Result<Self, PipelineError> {
        registry.verify_active_rules()?;

        let mut parsing_error_key = None;
        for check in registry.all_checks() {
            let key = registry
                .rule_key_for(&*check)
                .ok_or(PipelineError::UnresolvedRuleKey)?;
            if parsing_error_key.is_none() && check.reports_parse_errors() {
                parsing_error_key = Some(key.clone());
            }
        }

        Ok(Self {
            registry,
            parser,
            product,
            settings,
            filter: Box::new(IncludeAll),
            progress: Box::new(SilentProgress),
            cancellation: CancellationToken::new(),
            parsing_error_key,
        })
    }

    pub fn with_filter(mut self, filter: impl FileFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    pub fn with_progress(mut self, progress: impl ProgressReport + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Key of the active parsing-error rule, if any.
    pub fn parsing_error_key(&self) -> Option<&RuleKey> {
        self.parsing_error_key.as_ref()
    }

    /// Analyze `files` in order, reporting into `sink`.
    pub fn run(&self, files: &[InputFile], sink: &mut dyn ReportSink) -> Result<RunSummary, PipelineError> {
        let names: Vec<String> = files.iter().map(|f| f.display_name().to_string()).collect();
        self.progress.start(&names);

        let visitors = self.product.auxiliary_visitors();
        let mut summary = RunSummary::default();

        for file in files {
            if self.cancellation.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            match self.analyze_file(file, &visitors, sink) {
                Ok(outcome) => summary.files.push(FileSummary {
                    file: file.display_name().to_string(),
                    outcome,
                }),
                Err(Stop::Cancelled) => {
                    summary.cancelled = true;
                    break;
                }
                Err(Stop::Fatal(err)) => {
                    self.progress.cancel();
                    return Err(err);
                }
            }

            self.progress.next_file();
        }

        if summary.cancelled {
            debug!(
                "Analysis cancelled after {} of {} files",
                summary.files.len(),
                files.len()
            );
            self.progress.cancel();
        } else {
            self.progress.stop();
        }

        Ok(summary)
    }

    fn analyze_file(
        &self,
        file: &InputFile,
        visitors: &[Box<dyn AuxiliaryVisitor>],
        sink: &mut dyn ReportSink,
    ) -> Result<FileOutcome, Stop> {
        if self.filter.should_skip(file) {
            debug!("Skipping {}", file.display_name());
            return Ok(FileOutcome::Skipped);
        }

        let text = match file.contents() {
            Ok(text) => text,
            Err(err) => return self.recover(file, err, sink),
        };

        let tree = match self.parser.parse(&text) {
            Ok(tree) => tree,
            Err(err) => {
                self.report_parse_error(file, &err, sink);
                return Ok(FileOutcome::ParseFailed { line: err.line });
            }
        };

        let ctx = AnalysisContext::new(tree, file, &self.settings);
        let dispatched = panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(&ctx, visitors, sink)))
            .unwrap_or_else(|payload| Err(anyhow::anyhow!("check panicked: {}", panic_message(&*payload))));

        let collected = match dispatched {
            Ok(collected) => collected,
            Err(err) => return self.recover(file, err, sink),
        };

        let count = collected.len();
        for CollectedIssue { check, issue } in collected {
            let rule_key = self
                .registry
                .rule_key_for(&*check)
                .ok_or(Stop::Fatal(PipelineError::UnresolvedRuleKey))?;
            sink.save_issue(
                file,
                ReportedIssue {
                    rule_key: rule_key.clone(),
                    file: file.display_name().to_string(),
                    issue,
                },
            );
        }

        Ok(FileOutcome::Analyzed { issues: count })
    }

    /// Run the auxiliary visitors and every check over one parsed file.
    fn dispatch(
        &self,
        ctx: &AnalysisContext,
        visitors: &[Box<dyn AuxiliaryVisitor>],
        sink: &mut dyn ReportSink,
    ) -> anyhow::Result<Vec<CollectedIssue>> {
        for visitor in visitors {
            visitor.visit(ctx, sink)?;
        }

        let mut issues = SemanticDispatcher::new(self.registry.semantic_checks()).dispatch(ctx)?;

        for check in self.registry.visitor_checks() {
            if let Some(visitor) = check.as_tree_visitor() {
                issues.extend(visitor.scan_file(ctx)?.into_iter().map(|issue| CollectedIssue {
                    check: Arc::clone(check),
                    issue,
                }));
            }
        }

        self.product.highlight_symbols(ctx, sink)?;

        let lines = ctx.tree().last_line();
        for collected in &issues {
            collected.issue.validate(lines).with_context(|| {
                let rule = self
                    .registry
                    .rule_key_for(&*collected.check)
                    .map(|key| key.to_string())
                    .unwrap_or_else(|| "unknown rule".to_string());
                format!("{} reported an issue outside the file", rule)
            })?;
        }
        Ok(issues)
    }

    fn report_parse_error(&self, file: &InputFile, err: &ParseError, sink: &mut dyn ReportSink) {
        error!("Unable to parse file {}: {}", file.display_name(), err);

        if let Some(key) = &self.parsing_error_key {
            sink.save_issue(
                file,
                ReportedIssue {
                    rule_key: key.clone(),
                    file: file.display_name().to_string(),
                    issue: Issue::line(err.line, parsing_error::MESSAGE),
                },
            );
        }

        sink.save_analysis_error(AnalysisError {
            file: file.display_name().to_string(),
            line: Some(err.line),
            message: err.to_string(),
        });
    }

    fn recover(
        &self,
        file: &InputFile,
        err: anyhow::Error,
        sink: &mut dyn ReportSink,
    ) -> Result<FileOutcome, Stop> {
        match DispatchFailure::classify(err) {
            DispatchFailure::Cancelled => Err(Stop::Cancelled),
            DispatchFailure::Recovered(err) => {
                let message = format!("{:#}", err);
                error!("Unable to analyze file {}: {}", file.display_name(), message);
                sink.save_analysis_error(AnalysisError {
                    file: file.display_name().to_string(),
                    line: None,
                    message: message.clone(),
                });
                Ok(FileOutcome::RuntimeFailed { message })
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{testing, SyntaxTree};
    use crate::checks::builtin;
    use crate::pipeline::MemorySink;
    use pretty_assertions::assert_eq;

    /// Line-based parser; a line reading `@@` is a syntax error.
    struct LineParser;

    impl SourceParser for LineParser {
        fn language_id(&self) -> &'static str {
            "lines"
        }

        fn file_extensions(&self) -> &'static [&'static str] {
            &["txt"]
        }

        fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
            match source.lines().position(|l| l.trim() == "@@") {
                Some(idx) => Err(ParseError::new(idx + 1, "unexpected '@@'")),
                None => Ok(testing::line_tree(source)),
            }
        }
    }

    fn pipeline(active: crate::checks::ActiveRules) -> AnalysisPipeline {
        let registry = CheckRegistry::create(active)
            .add_checks(builtin::REPOSITORY_KEY, &builtin::check_types())
            .unwrap();
        AnalysisPipeline::new(
            registry,
            Box::new(LineParser),
            ProductProfile::Lightweight,
            AnalysisSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_failure_with_rule_active() {
        let pipeline = pipeline(builtin::default_profile());
        let files = vec![InputFile::in_memory("a.txt", "ok\n@@\n")];
        let mut sink = MemorySink::new();

        let summary = pipeline.run(&files, &mut sink).unwrap();
        assert_eq!(summary.outcome("a.txt"), Some(&FileOutcome::ParseFailed { line: 2 }));

        let report = sink.into_report();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].line, Some(2));
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].rule_key.rule, "ParsingError");
        assert_eq!(report.issues[0].line(), Some(2));
    }

    #[test]
    fn test_parse_failure_with_rule_inactive() {
        let mut active = builtin::default_profile();
        active.deactivate(&RuleKey::new(builtin::REPOSITORY_KEY, "ParsingError"));
        let pipeline = pipeline(active);
        assert!(pipeline.parsing_error_key().is_none());

        let files = vec![InputFile::in_memory("a.txt", "@@\n")];
        let mut sink = MemorySink::new();
        pipeline.run(&files, &mut sink).unwrap();

        let report = sink.into_report();
        assert_eq!(report.errors.len(), 1);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_interruption_classified_as_cancel() {
        let err = anyhow::Error::new(crate::pipeline::Interrupted).context("check failed");
        assert!(matches!(DispatchFailure::classify(err), DispatchFailure::Cancelled));
        assert!(matches!(
            DispatchFailure::classify(anyhow::anyhow!("boom")),
            DispatchFailure::Recovered(_)
        ));
    }
}
