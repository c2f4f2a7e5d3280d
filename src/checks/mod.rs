//! Rule checks and the registry that holds them.
//!
//! A check is registered under a [`RuleKey`](crate::issue::RuleKey) and
//! declares one or both capabilities:
//!
//! - [`TreeVisitor`]: walks the tree itself, once per file
//! - [`SemanticCheck`]: fed by the shared [`SemanticDispatcher`]
//!
//! Custom rule sets plug in through [`CustomRuleRepository`] (or the
//! deprecated [`CustomRulesDefinition`]).

pub mod builtin;
mod dispatcher;
mod registry;
mod traits;

pub use dispatcher::SemanticDispatcher;
pub use registry::{
    ActiveRules, CheckRegistry, CustomRuleRepository, CustomRulesDefinition, RegistryError,
    RuleParams,
};
pub use traits::{
    Check, CheckFactory, CheckType, FlowState, SemanticCheck, SemanticScope, TreeVisitor,
};
