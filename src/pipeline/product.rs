//! Capability profile of the host.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisContext;
use crate::visitors::{
    AuxiliaryVisitor, CpdVisitor, HighlighterVisitor, MetricsVisitor, NoSonarVisitor,
    SymbolHighlighter,
};

use super::ReportSink;

/// Which auxiliary data a run produces. Issue semantics are the same in
/// both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductProfile {
    /// Metrics, no-sonar lines, highlighting, CPD tokens and symbol tables.
    #[default]
    Full,
    /// No-sonar lines only.
    Lightweight,
}

impl ProductProfile {
    /// Pick the profile from whether the host supports full reporting.
    pub fn for_host(full_reporting: bool) -> Self {
        if full_reporting {
            ProductProfile::Full
        } else {
            ProductProfile::Lightweight
        }
    }

    /// Visitors run before the checks of every parsed file.
    pub fn auxiliary_visitors(&self) -> Vec<Box<dyn AuxiliaryVisitor>> {
        match self {
            ProductProfile::Full => vec![
                Box::new(MetricsVisitor),
                Box::new(NoSonarVisitor),
                Box::new(HighlighterVisitor),
                Box::new(CpdVisitor),
            ],
            ProductProfile::Lightweight => vec![Box::new(NoSonarVisitor)],
        }
    }

    /// Runs after the checks of a file. No-op in lightweight mode.
    pub fn highlight_symbols(&self, ctx: &AnalysisContext, sink: &mut dyn ReportSink) -> anyhow::Result<()> {
        match self {
            ProductProfile::Full => SymbolHighlighter.visit(ctx, sink),
            ProductProfile::Lightweight => Ok(()),
        }
    }
}

impl fmt::Display for ProductProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductProfile::Full => write!(f, "full"),
            ProductProfile::Lightweight => write!(f, "lightweight"),
        }
    }
}

impl FromStr for ProductProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(ProductProfile::Full),
            "lightweight" => Ok(ProductProfile::Lightweight),
            _ => Err(format!("unknown product: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection() {
        assert_eq!(ProductProfile::for_host(true), ProductProfile::Full);
        assert_eq!(ProductProfile::for_host(false), ProductProfile::Lightweight);
        assert_eq!(ProductProfile::Full.auxiliary_visitors().len(), 4);
        assert_eq!(ProductProfile::Lightweight.auxiliary_visitors().len(), 1);
        assert_eq!("Lightweight".parse(), Ok(ProductProfile::Lightweight));
    }
}
