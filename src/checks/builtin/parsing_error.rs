//! Rule reporting files the parser could not read.
//!
//! The check itself never visits a tree: the pipeline raises its issue
//! directly when parsing fails, at the line of the syntax error.

use std::sync::Arc;

use crate::checks::{Check, CheckType, RuleParams};

/// Message of the line issue raised for an unparsable file.
pub const MESSAGE: &str = "Parse error";

pub struct ParsingErrorCheck;

impl Check for ParsingErrorCheck {
    fn reports_parse_errors(&self) -> bool {
        true
    }
}

fn create(_params: &RuleParams) -> anyhow::Result<Arc<dyn Check>> {
    Ok(Arc::new(ParsingErrorCheck))
}

pub const CHECK_TYPE: CheckType = CheckType {
    key: "ParsingError",
    name: "Source files should be parsable",
    description: "Raised at the first syntax error of a file that cannot be parsed",
    default_active: true,
    create,
};
