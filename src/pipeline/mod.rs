//! The analysis pipeline and its collaborators.
//!
//! # Architecture
//!
//! ```text
//! InputFile ──▶ FileFilter ──▶ SourceParser ──▶ AnalysisContext
//!                   │               │                  │
//!                (skip)      (parse failure)   auxiliary visitors
//!                                   │          semantic dispatcher
//!                                   ▼          tree visitors
//!                              ReportSink ◀────────────┘
//! ```

mod cancel;
mod input;
#[allow(clippy::module_inception)]
mod pipeline;
mod product;
mod progress;
mod sink;

pub use cancel::{is_interruption, CancellationToken, Interrupted};
pub use input::{discover_files, ExclusionFilter, FileFilter, IncludeAll, InputFile, DEFAULT_EXCLUSIONS};
pub use pipeline::{
    AnalysisPipeline, DispatchFailure, FileOutcome, FileSummary, PipelineError, RunSummary,
};
pub use product::ProductProfile;
pub use progress::{IndicatifProgress, ProgressReport, SilentProgress};
pub use sink::{AnalysisError, AnalysisReport, MemorySink, ReportSink};
