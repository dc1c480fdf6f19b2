//! OAA Engine
//!
//! Accessibility evaluation of HTML documents against a ruleset.
//!
//! # Example
//! ```rust,ignore
//! use oaa_engine::EvaluatorFactory;
//!
//! let mut factory = EvaluatorFactory::new()?;
//! factory.set_parameter("ruleset", "WCAG20_ARIA_TRANS")?;
//! let evaluator = factory.new_evaluator()?;
//! let result = evaluator.evaluate_html(html, "https://example.com/")?;
//! println!("{}", result.to_json(false)?);
//! ```

mod config;
mod evaluation;
mod evaluator;
mod export;
mod group;
mod rule_result;

pub use config::{ConfigError, EvaluatorConfig, EvaluatorFactory};
pub use evaluation::{ElementSummary, EvaluationResult};
pub use evaluator::Evaluator;
pub use export::{ElementResultExport, EvaluationExport, RuleResultExport};
pub use group::{GroupKey, RuleGroupResult, RuleGroupSummary};
pub use rule_result::{
    ElementResultValue, ImplementationValue, RuleExecution, RuleMessage, RuleResult,
    RuleResultSummary, RuleResultValue, implementation_score,
};

// Re-export sub-crates for advanced usage
pub use oaa_cache as cache;
pub use oaa_css as css;
pub use oaa_dom as dom;
pub use oaa_html as html;
pub use oaa_rules as rules;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
