//! Check registry.
//!
//! Aggregates check instances from one or more rule repositories. The
//! registry is assembled once before any file is analyzed and is read-only
//! afterwards, so it can be shared freely between files (and threads).

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::issue::RuleKey;

use super::{Check, CheckType};

/// Errors raised while assembling the registry. All of them are fatal.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("repository key must not be empty")]
    EmptyRepositoryKey,
    #[error("rule {0} is declared more than once in the same repository")]
    DuplicateRule(RuleKey),
    #[error("failed to instantiate check {key}: {source}")]
    Instantiation {
        key: RuleKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("active rule {0} is not provided by any check of its repository")]
    UnknownRule(RuleKey),
}

/// String parameters of an active rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleParams(BTreeMap<String, String>);

impl RuleParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Numeric parameter, falling back to `default` when absent.
    pub fn get_usize(&self, name: &str, default: usize) -> anyhow::Result<usize> {
        match self.get(name) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| {
                anyhow::anyhow!("parameter {:?} must be a non-negative integer, got {:?}", name, raw)
            }),
        }
    }

    pub fn merge(&mut self, other: &RuleParams) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }
}

/// The rules enabled for a run and their parameters.
///
/// Only check types whose rule is active here get instantiated.
#[derive(Debug, Clone, Default)]
pub struct ActiveRules {
    rules: BTreeMap<RuleKey, RuleParams>,
}

impl ActiveRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate every `default_active` check type of a repository.
    pub fn with_defaults(mut self, repository_key: &str, check_types: &[CheckType]) -> Self {
        for ty in check_types.iter().filter(|t| t.default_active) {
            self.activate(RuleKey::new(repository_key, ty.key), RuleParams::new());
        }
        self
    }

    /// Activate every check type of a repository.
    pub fn with_all(mut self, repository_key: &str, check_types: &[CheckType]) -> Self {
        for ty in check_types {
            self.activate(RuleKey::new(repository_key, ty.key), RuleParams::new());
        }
        self
    }

    /// Activate a rule, merging parameters with any already set.
    pub fn activate(&mut self, key: RuleKey, params: RuleParams) {
        self.rules.entry(key).or_default().merge(&params);
    }

    pub fn deactivate(&mut self, key: &RuleKey) {
        self.rules.remove(key);
    }

    pub fn is_active(&self, key: &RuleKey) -> bool {
        self.rules.contains_key(key)
    }

    pub fn params(&self, key: &RuleKey) -> Option<&RuleParams> {
        self.rules.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &RuleKey> {
        self.rules.keys()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Deprecated extension point declaring a single rule repository.
///
/// Kept for plugins written against the older API; prefer
/// [`CustomRuleRepository`].
pub trait CustomRulesDefinition: Send + Sync {
    /// Human-readable repository name.
    fn name(&self) -> &str;
    fn repository_key(&self) -> &str;
    fn check_types(&self) -> Vec<CheckType>;
}

/// Extension point contributing checks under a repository key.
pub trait CustomRuleRepository: Send + Sync {
    fn repository_key(&self) -> &str;
    fn check_types(&self) -> Vec<CheckType>;
}

struct RegisteredCheck {
    rule_key: RuleKey,
    check: Arc<dyn Check>,
}

struct RepositoryChecks {
    key: String,
    /// Every rule id the repository declares, active or not.
    declared: Vec<&'static str>,
    checks: Vec<RegisteredCheck>,
}

/// Registry of the checks for one analysis run.
pub struct CheckRegistry {
    active: ActiveRules,
    repositories: Vec<RepositoryChecks>,
    visitor_checks: Vec<Arc<dyn Check>>,
    semantic_checks: Vec<Arc<dyn Check>>,
}

impl CheckRegistry {
    /// Create an empty registry that instantiates the given active rules.
    pub fn create(active: ActiveRules) -> Self {
        Self {
            active,
            repositories: Vec::new(),
            visitor_checks: Vec::new(),
            semantic_checks: Vec::new(),
        }
    }

    /// Instantiate the active checks among `check_types` under `repository_key`.
    pub fn add_checks(
        mut self,
        repository_key: &str,
        check_types: &[CheckType],
    ) -> Result<Self, RegistryError> {
        if repository_key.trim().is_empty() {
            return Err(RegistryError::EmptyRepositoryKey);
        }

        let mut seen = HashSet::new();
        let mut checks = Vec::new();

        for ty in check_types {
            let rule_key = RuleKey::new(repository_key, ty.key);
            if !seen.insert(ty.key) {
                return Err(RegistryError::DuplicateRule(rule_key));
            }

            let Some(params) = self.active.params(&rule_key) else {
                continue;
            };

            let check = (ty.create)(params).map_err(|source| RegistryError::Instantiation {
                key: rule_key.clone(),
                source: source.into(),
            })?;

            if check.as_tree_visitor().is_some() {
                self.visitor_checks.push(Arc::clone(&check));
            }
            if check.as_semantic_check().is_some() {
                self.semantic_checks.push(Arc::clone(&check));
            }
            checks.push(RegisteredCheck { rule_key, check });
        }

        debug!(
            "Repository {}: {} of {} checks active",
            repository_key,
            checks.len(),
            check_types.len()
        );

        self.repositories.push(RepositoryChecks {
            key: repository_key.to_string(),
            declared: check_types.iter().map(|t| t.key).collect(),
            checks,
        });

        Ok(self)
    }

    /// Merge checks contributed through the two extension surfaces.
    ///
    /// Either may be absent. A repository key that is already registered
    /// gets its checks appended, not replaced.
    pub fn add_custom_checks(
        mut self,
        definitions: Option<&[Box<dyn CustomRulesDefinition>]>,
        repositories: Option<&[Box<dyn CustomRuleRepository>]>,
    ) -> Result<Self, RegistryError> {
        if let Some(definitions) = definitions {
            if !definitions.is_empty() {
                warn!(
                    "CustomRulesDefinition usage is deprecated. Use CustomRuleRepository to define custom rules"
                );
            }
            for definition in definitions {
                self = self.add_checks(definition.repository_key(), &definition.check_types())?;
            }
        }

        if let Some(repositories) = repositories {
            for repo in repositories {
                self = self.add_checks(repo.repository_key(), &repo.check_types())?;
            }
        }

        Ok(self)
    }

    /// Every registered check, across all repositories.
    pub fn all_checks(&self) -> Vec<Arc<dyn Check>> {
        self.repositories
            .iter()
            .flat_map(|r| r.checks.iter().map(|c| Arc::clone(&c.check)))
            .collect()
    }

    /// Checks with the semantic capability, in registration order.
    pub fn semantic_checks(&self) -> &[Arc<dyn Check>] {
        &self.semantic_checks
    }

    /// Checks with the tree-visiting capability, in registration order.
    pub fn visitor_checks(&self) -> &[Arc<dyn Check>] {
        &self.visitor_checks
    }

    /// Rule key a check instance was registered under.
    ///
    /// Searches repositories in registration order and returns the first
    /// match. `None` for instances that were never registered.
    pub fn rule_key_for(&self, check: &dyn Check) -> Option<&RuleKey> {
        let target = check as *const dyn Check;
        self.repositories
            .iter()
            .flat_map(|r| r.checks.iter())
            .find(|c| std::ptr::addr_eq(Arc::as_ptr(&c.check), target))
            .map(|c| &c.rule_key)
    }

    /// Registered repository keys, in registration order (duplicates kept).
    pub fn repositories(&self) -> Vec<&str> {
        self.repositories.iter().map(|r| r.key.as_str()).collect()
    }

    pub fn check_count(&self) -> usize {
        self.repositories.iter().map(|r| r.checks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.check_count() == 0
    }

    /// Reject active rules that belong to a registered repository but that
    /// none of its check types declares.
    pub fn verify_active_rules(&self) -> Result<(), RegistryError> {
        for key in self.active.keys() {
            let mut repos = self
                .repositories
                .iter()
                .filter(|r| r.key == key.repository)
                .peekable();
            if repos.peek().is_none() {
                continue;
            }
            if !repos.any(|r| r.declared.contains(&key.rule.as_str())) {
                return Err(RegistryError::UnknownRule(key.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisContext;
    use crate::checks::TreeVisitor;
    use crate::issue::Issue;

    struct Noop;

    impl Check for Noop {
        fn as_tree_visitor(&self) -> Option<&dyn TreeVisitor> {
            Some(self)
        }
    }

    impl TreeVisitor for Noop {
        fn scan_file(&self, _ctx: &AnalysisContext) -> anyhow::Result<Vec<Issue>> {
            Ok(vec![])
        }
    }

    fn noop(_: &RuleParams) -> anyhow::Result<Arc<dyn Check>> {
        Ok(Arc::new(Noop))
    }

    fn failing(_: &RuleParams) -> anyhow::Result<Arc<dyn Check>> {
        anyhow::bail!("missing resource")
    }

    const A: CheckType = CheckType {
        key: "A",
        name: "A",
        description: "",
        default_active: true,
        create: noop,
    };
    const B: CheckType = CheckType {
        key: "B",
        name: "B",
        description: "",
        default_active: false,
        create: noop,
    };
    const BROKEN: CheckType = CheckType {
        key: "Broken",
        name: "Broken",
        description: "",
        default_active: true,
        create: failing,
    };

    #[test]
    fn test_only_active_rules_instantiated() {
        let active = ActiveRules::new().with_defaults("repo", &[A, B]);
        let registry = CheckRegistry::create(active).add_checks("repo", &[A, B]).unwrap();
        assert_eq!(registry.check_count(), 1);
        assert_eq!(registry.visitor_checks().len(), 1);
        assert!(registry.semantic_checks().is_empty());
    }

    #[test]
    fn test_empty_repository_key_rejected() {
        let err = CheckRegistry::create(ActiveRules::new())
            .add_checks("  ", &[A])
            .err()
            .unwrap();
        assert!(matches!(err, RegistryError::EmptyRepositoryKey));
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let active = ActiveRules::new().with_all("repo", &[A]);
        let err = CheckRegistry::create(active)
            .add_checks("repo", &[A, A])
            .err()
            .unwrap();
        assert!(matches!(err, RegistryError::DuplicateRule(k) if k.rule == "A"));
    }

    #[test]
    fn test_instantiation_failure_is_fatal() {
        let active = ActiveRules::new().with_all("repo", &[BROKEN]);
        let err = CheckRegistry::create(active)
            .add_checks("repo", &[BROKEN])
            .err()
            .unwrap();
        assert!(err.to_string().contains("repo:Broken"));
        assert!(err.to_string().contains("missing resource"));
    }

    #[test]
    fn test_inactive_broken_check_is_not_built() {
        let registry = CheckRegistry::create(ActiveRules::new())
            .add_checks("repo", &[BROKEN])
            .unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_active_rule() {
        let mut active = ActiveRules::new().with_all("repo", &[A]);
        active.activate(RuleKey::new("repo", "Ghost"), RuleParams::new());
        active.activate(RuleKey::new("elsewhere", "Other"), RuleParams::new());

        let registry = CheckRegistry::create(active).add_checks("repo", &[A]).unwrap();
        let err = registry.verify_active_rules().unwrap_err();
        assert!(matches!(err, RegistryError::UnknownRule(k) if k.rule == "Ghost"));
    }

    #[test]
    fn test_params_parse() {
        let params = RuleParams::new().with("max", "12").with("bad", "x");
        assert_eq!(params.get_usize("max", 3).unwrap(), 12);
        assert_eq!(params.get_usize("absent", 3).unwrap(), 3);
        assert!(params.get_usize("bad", 3).is_err());
    }
}
