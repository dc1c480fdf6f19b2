//! OAA Rules
//!
//! The rule contract and the built-in rule catalog.
//!
//! Features:
//! - Rule metadata: scope, category, group, WCAG mapping
//! - Element results as message keys plus parameters
//! - Rule registry keyed by id
//! - JSON rulesets mapping rules to required / enabled

pub mod constants;
mod registry;
mod result;
mod rule;
pub mod rules;
mod ruleset;

pub use constants::{RuleCategory, RuleGroup, RuleScope};
pub use registry::{RegistryError, RuleRegistry};
pub use result::{ElementResult, ResultCollector, ResultTarget, TestResult};
pub use rule::{Rule, ValidateFn};
pub use ruleset::{RuleMapping, Ruleset, RulesetError, RulesetManager};

/// Failure inside a rule procedure
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("cached item at ordinal {0} has no element")]
    MissingElement(u32),

    #[error("{0}")]
    Internal(String),
}
