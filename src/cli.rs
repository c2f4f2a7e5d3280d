//! Command-line interface for sweepcheck.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use crate::analysis::{self, SourceParser};
use crate::checks::{builtin, CheckRegistry};
use crate::config::Config;
use crate::pipeline::{
    discover_files, AnalysisPipeline, AnalysisReport, IndicatifProgress, MemorySink, ProductProfile,
    RunSummary, SilentProgress,
};
use crate::report::{self, OutputFormat};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Static analysis over tree-sitter grammars.
///
/// Parses every source file of a project, runs the active rules over each
/// syntax tree and reports the issues found. A file that cannot be parsed
/// or analyzed is recorded as an analysis error without stopping the run.
#[derive(Parser)]
#[command(name = "sweepcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a file or directory
    #[command(visible_alias = "check")]
    Analyze(AnalyzeArgs),
    /// List the built-in rules
    Rules,
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to analyze (file or directory)
    pub path: PathBuf,

    /// Path to configuration YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Language to analyze (default: from the configuration, else inferred)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Only produce issues and no-sonar data, as a lightweight host would
    #[arg(long)]
    pub lightweight: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Load the configuration given on the command line, else the first one
/// found next to the analyzed path or in the current directory.
fn load_config(args: &AnalyzeArgs, root: &Path) -> anyhow::Result<(Config, Option<PathBuf>)> {
    let path = match &args.config {
        Some(p) => Some(p.clone()),
        None => {
            let dir = if root.is_dir() { root } else { root.parent().unwrap_or(root) };
            Config::discover(dir).or_else(|| Config::discover(Path::new(".")))
        }
    };

    let config = match &path {
        Some(p) => Config::parse_file(p).with_context(|| format!("invalid configuration {}", p.display()))?,
        None => Config::default(),
    };
    config.validate()?;
    Ok((config, path))
}

/// Pick the language with the most files under `root`.
fn infer_language(root: &Path) -> Option<&'static str> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for lang in analysis::registered_languages() {
        let Some(parser) = analysis::parser_for_language(lang) else {
            continue;
        };
        let suffixes: Vec<String> = parser.file_extensions().iter().map(|s| s.to_string()).collect();
        let found = discover_files(root, &suffixes).map(|f| f.len()).unwrap_or(0);
        if found > 0 {
            counts.insert(lang, found);
        }
    }
    counts.into_iter().max_by_key(|(_, n)| *n).map(|(lang, _)| lang)
}

fn select_parser(args: &AnalyzeArgs, config: &Config, root: &Path) -> anyhow::Result<Box<dyn SourceParser>> {
    let language = match args.language.as_deref().or(config.language.as_deref()) {
        Some(lang) => lang.to_string(),
        None => infer_language(root)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("cannot infer the language of {}; use --language", root.display()))?,
    };
    analysis::parser_for_language(&language).ok_or_else(|| {
        anyhow::anyhow!(
            "no parser for language {:?} (available: {})",
            language,
            analysis::registered_languages().join(", ")
        )
    })
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("cannot access path {:?}", args.path))?;

    let (config, config_path) = load_config(args, &root)?;
    let parser = select_parser(args, &config, &root)?;
    info!("Analyzing {} as {}", root.display(), parser.language_id());

    let suffixes = if config.file_suffixes.is_empty() {
        parser.file_extensions().iter().map(|s| s.to_string()).collect()
    } else {
        config.file_suffixes.clone()
    };
    let files = discover_files(&root, &suffixes)?;
    if files.is_empty() {
        warn!("No {} files found under {}", parser.language_id(), root.display());
    }
    debug!("{} files to analyze", files.len());

    let registry = CheckRegistry::create(config.active_rules(builtin::default_profile())?)
        .add_checks(builtin::REPOSITORY_KEY, &builtin::check_types())?;

    let product = if args.lightweight {
        ProductProfile::Lightweight
    } else {
        config.product()?
    };

    let mut pipeline = AnalysisPipeline::new(registry, parser, product, config.settings())?
        .with_filter(config.exclusion_filter()?);
    if !args.no_progress && args.format == OutputFormat::Pretty {
        pipeline = pipeline.with_progress(IndicatifProgress::new());
    } else {
        pipeline = pipeline.with_progress(SilentProgress);
    }

    let mut sink = MemorySink::new();
    let summary = pipeline.run(&files, &mut sink)?;
    let report = sink.into_report().finish();

    let path_str = args.path.to_string_lossy().to_string();
    match args.format {
        OutputFormat::Json => report::write_json(&path_str, &summary, &report)?,
        OutputFormat::Sarif => report::write_sarif(&report)?,
        OutputFormat::Pretty => {
            let config_str = config_path.map(|p| p.to_string_lossy().to_string());
            report::write_pretty(&path_str, config_str.as_deref(), &summary, &report);
        }
    }

    Ok(exit_code(&summary, &report))
}

/// Files that could not be analyzed fail the run even when no issue was
/// reported for them.
fn exit_code(summary: &RunSummary, report: &AnalysisReport) -> i32 {
    if report.has_issues() || summary.failed() > 0 {
        EXIT_FAILED
    } else {
        EXIT_SUCCESS
    }
}

/// List the built-in rules.
pub fn run_rules() -> anyhow::Result<i32> {
    println!("Built-in rules (repository {:?}):", builtin::REPOSITORY_KEY);
    println!();

    for ty in builtin::check_types() {
        let key = if ty.default_active {
            format!("{} (default)", ty.key)
        } else {
            ty.key.to_string()
        };
        println!("  {:<30} {}", key, ty.name);
        println!("  {:<30} {}", "", ty.description);
    }

    println!();
    println!("Usage:");
    println!("  rules:");
    println!("    sweepcheck:<rule>:");
    println!("      active: true");
    println!("      params: {{ max: 10 }}");

    Ok(EXIT_SUCCESS)
}
