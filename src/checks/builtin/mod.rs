//! Built-in rule catalog.
//!
//! Every built-in check lives in its own module and exposes a `CHECK_TYPE`
//! describing it. All of them are registered under [`REPOSITORY_KEY`].

pub mod complexity;
pub mod file_length;
pub mod line_length;
pub mod parsing_error;
pub mod todos;
pub mod unreachable;

use super::{ActiveRules, CheckType};

/// Repository key of the built-in rules.
pub const REPOSITORY_KEY: &str = "sweepcheck";

/// All built-in check types, in registration order.
pub fn check_types() -> Vec<CheckType> {
    vec![
        parsing_error::CHECK_TYPE,
        todos::CHECK_TYPE,
        file_length::CHECK_TYPE,
        line_length::CHECK_TYPE,
        complexity::CHECK_TYPE,
        unreachable::CHECK_TYPE,
    ]
}

/// The default ("Sonar way") profile: every built-in marked `default_active`.
pub fn default_profile() -> ActiveRules {
    ActiveRules::new().with_defaults(REPOSITORY_KEY, &check_types())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CheckRegistry;
    use crate::issue::RuleKey;

    #[test]
    fn test_default_profile_registers() {
        let registry = CheckRegistry::create(default_profile())
            .add_checks(REPOSITORY_KEY, &check_types())
            .unwrap();

        assert_eq!(registry.check_count(), 5);
        assert_eq!(registry.semantic_checks().len(), 2);
        assert_eq!(registry.visitor_checks().len(), 2);
        registry.verify_active_rules().unwrap();

        for check in registry.all_checks() {
            let key = registry.rule_key_for(&*check).unwrap();
            assert_eq!(key.repository, REPOSITORY_KEY);
        }
        assert!(!default_profile().is_active(&RuleKey::new(REPOSITORY_KEY, "LineTooLong")));
    }
}
