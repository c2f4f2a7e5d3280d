//! Sweepcheck - fault-tolerant static analysis orchestration.
//!
//! Sweepcheck parses every file of a project into a syntax tree, runs a
//! configurable set of rule checks over each tree and reports located
//! issues. A file that fails to parse or crashes a check is recorded as an
//! analysis error; it never aborts the run or disturbs other files.
//!
//! # Architecture
//!
//! - `issue`: rule keys, locations and the three issue granularities
//! - `analysis`: language-neutral syntax trees, tree-sitter adapters, per-file context
//! - `checks`: the check contract, the registry and the built-in rules
//! - `visitors`: auxiliary data (metrics, no-sonar lines, highlighting, CPD, symbols)
//! - `pipeline`: the per-file loop, report sink, progress and cancellation
//! - `config`: YAML configuration
//! - `report`: output formatting (pretty, JSON, SARIF)
//!
//! # Example
//!
//! ```no_run
//! use sweepcheck::checks::{builtin, CheckRegistry};
//! use sweepcheck::pipeline::{AnalysisPipeline, InputFile, MemorySink, ProductProfile};
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = CheckRegistry::create(builtin::default_profile())
//!     .add_checks(builtin::REPOSITORY_KEY, &builtin::check_types())?;
//! let parser = sweepcheck::analysis::parser_for_language("rust").expect("rust grammar");
//! let pipeline = AnalysisPipeline::new(registry, parser, ProductProfile::Full, Default::default())?;
//!
//! let mut sink = MemorySink::new();
//! pipeline.run(&[InputFile::in_memory("lib.rs", "fn main() {}")], &mut sink)?;
//! let report = sink.into_report().finish();
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod checks;
pub mod cli;
pub mod config;
pub mod issue;
pub mod pipeline;
pub mod report;
pub mod visitors;

pub use checks::{Check, CheckRegistry};
pub use config::Config;
pub use issue::{Issue, IssueKind, IssueLocation, ReportedIssue, RuleKey};
pub use pipeline::{AnalysisPipeline, AnalysisReport, RunSummary};
