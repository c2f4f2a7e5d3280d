//! Configuration file schema.
//!
//! A `sweepcheck.yaml` selects the language, the files to analyze, the
//! host profile and which rules run with which parameters. Every field is
//! optional; an absent file means the defaults.
//!
//! ```yaml
//! language: rust
//! exclusions: ["**/target/**"]
//! max_file_size: 1048576
//! product: lightweight
//! rules:
//!   sweepcheck:LineTooLong:
//!     params:
//!       max: 100
//!   sweepcheck:HollowTodo:
//!     active: false
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::AnalysisSettings;
use crate::checks::{ActiveRules, RuleParams};
use crate::issue::RuleKey;
use crate::pipeline::{ExclusionFilter, ProductProfile, DEFAULT_EXCLUSIONS};

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["sweepcheck.yaml", ".sweepcheck.yaml"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unknown product {0:?}, must be 'full' or 'lightweight'")]
    UnknownProduct(String),
    #[error("invalid exclusion pattern {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("{0}")]
    InvalidRuleKey(String),
    #[error("parameter {name:?} of rule {rule} must be a scalar")]
    InvalidParam { rule: String, name: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Language id (e.g. "rust"); inferred from the files when absent.
    #[serde(default)]
    pub language: Option<String>,
    /// Extensions of the files to analyze (default: the language's own)
    #[serde(default)]
    pub file_suffixes: Vec<String>,
    /// Glob patterns of paths to skip; `**` matches across directories.
    #[serde(default = "default_exclusions")]
    pub exclusions: Vec<String>,
    /// Files larger than this many bytes are skipped.
    #[serde(default)]
    pub max_file_size: Option<u64>,
    #[serde(default = "default_true")]
    pub ignore_header_comments: bool,
    /// "full" (default) or "lightweight"
    #[serde(default)]
    pub product: Option<String>,
    /// Per-rule overrides of the default profile, keyed `repository:rule`.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

/// Activation and parameters of one rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub params: BTreeMap<String, serde_yaml::Value>,
}

fn default_true() -> bool {
    true
}

fn default_exclusions() -> Vec<String> {
    DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: None,
            file_suffixes: Vec::new(),
            exclusions: default_exclusions(),
            max_file_size: None,
            ignore_header_comments: true,
            product: None,
            rules: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content)
    }

    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        // An empty document is a valid, all-default configuration
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Look for a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Check everything that can be checked without running an analysis.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.product()?;
        self.exclusion_filter()?;
        for (key, rule) in &self.rules {
            key.parse::<RuleKey>().map_err(ConfigError::InvalidRuleKey)?;
            rule_params(key, rule)?;
        }
        Ok(())
    }

    pub fn product(&self) -> Result<ProductProfile, ConfigError> {
        match &self.product {
            None => Ok(ProductProfile::default()),
            Some(p) => p.parse().map_err(|_| ConfigError::UnknownProduct(p.clone())),
        }
    }

    pub fn settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            ignore_header_comments: self.ignore_header_comments,
        }
    }

    pub fn exclusion_filter(&self) -> Result<ExclusionFilter, ConfigError> {
        // Compile one by one to name the offending pattern
        for pattern in &self.exclusions {
            globset::Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
        }
        ExclusionFilter::new(&self.exclusions, self.max_file_size).map_err(|source| {
            ConfigError::InvalidGlob {
                pattern: self.exclusions.join(","),
                source,
            }
        })
    }

    /// Apply the rule overrides to a base profile.
    pub fn active_rules(&self, mut base: ActiveRules) -> Result<ActiveRules, ConfigError> {
        for (key, rule) in &self.rules {
            let rule_key: RuleKey = key.parse().map_err(ConfigError::InvalidRuleKey)?;
            if rule.active {
                base.activate(rule_key, rule_params(key, rule)?);
            } else {
                base.deactivate(&rule_key);
            }
        }
        Ok(base)
    }
}

fn rule_params(key: &str, rule: &RuleConfig) -> Result<RuleParams, ConfigError> {
    let mut params = RuleParams::new();
    for (name, value) in &rule.params {
        let text = match value {
            serde_yaml::Value::String(s) => s.clone(),
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            _ => {
                return Err(ConfigError::InvalidParam {
                    rule: key.to_string(),
                    name: name.clone(),
                })
            }
        };
        params = params.with(name.clone(), text);
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::builtin;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
language: rust
max_file_size: 1024
product: lightweight
ignore_header_comments: false
rules:
  sweepcheck:LineTooLong:
    params:
      max: 100
  sweepcheck:HollowTodo:
    active: false
"#;
        let config = Config::parse_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.language.as_deref(), Some("rust"));
        assert_eq!(config.exclusions.len(), 3);
        assert_eq!(config.product().unwrap(), ProductProfile::Lightweight);
        assert!(!config.settings().ignore_header_comments);

        let active = config.active_rules(builtin::default_profile()).unwrap();
        let line_key = RuleKey::new("sweepcheck", "LineTooLong");
        assert!(active.is_active(&line_key));
        assert_eq!(active.params(&line_key).unwrap().get("max"), Some("100"));
        assert!(!active.is_active(&RuleKey::new("sweepcheck", "HollowTodo")));
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse_str("").unwrap();
        assert!(config.ignore_header_comments);
        assert_eq!(config.product().unwrap(), ProductProfile::Full);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config::parse_str("product: desktop").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::UnknownProduct(_))));

        let config = Config::parse_str("exclusions: ['a[']").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidGlob { .. })));

        let config = Config::parse_str("rules:\n  HollowTodo: {}\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRuleKey(_))));

        let config = Config::parse_str("rules:\n  a:b:\n    params:\n      max: [1]\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidParam { .. })));
    }

    #[test]
    fn test_discover() {
        let temp = TempDir::new().unwrap();
        assert!(Config::discover(temp.path()).is_none());
        std::fs::write(temp.path().join(".sweepcheck.yaml"), "").unwrap();
        assert!(Config::discover(temp.path()).is_some());
    }
}
