//! Evaluator Configuration
//!
//! Typed options plus the string-keyed setup surface used by hosts that
//! only deal in names and values.

use oaa_cache::EventProcessing;
use oaa_rules::{RegistryError, RuleGroup, RuleRegistry, RulesetError, RulesetManager};

use crate::evaluator::Evaluator;

/// Setup-time failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("invalid value {value:?} for feature {feature}")]
    InvalidValue { feature: String, value: String },

    #[error("rule group filter {0} is outside 1..=7")]
    GroupOutOfRange(String),

    #[error("no rulesets are loaded")]
    NoRulesets,

    #[error(transparent)]
    Ruleset(#[from] RulesetError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Evaluation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// `None` selects the first loaded ruleset
    pub ruleset_id: Option<String>,
    pub event_processing: EventProcessing,
    pub broken_link_testing: bool,
    pub groups: RuleGroup,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            ruleset_id: None,
            event_processing: EventProcessing::FaeUtil,
            broken_link_testing: false,
            groups: RuleGroup::GROUP123,
        }
    }
}

/// Owns the rule registry and rulesets, and hands out configured evaluators
pub struct EvaluatorFactory {
    registry: RuleRegistry,
    rulesets: RulesetManager,
    config: EvaluatorConfig,
}

impl EvaluatorFactory {
    /// Built-in rules and rulesets
    pub fn new() -> Result<Self, ConfigError> {
        let registry = RuleRegistry::builtin()?;
        let rulesets = RulesetManager::builtin(&registry)?;
        Ok(Self::with_rulesets(registry, rulesets))
    }

    pub fn with_rulesets(registry: RuleRegistry, rulesets: RulesetManager) -> Self {
        tracing::info!(
            "OAA evaluation engine {} initialized with {} rules",
            crate::VERSION,
            registry.len()
        );
        Self {
            registry,
            rulesets,
            config: EvaluatorConfig::default(),
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn rulesets(&self) -> &RulesetManager {
        &self.rulesets
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EvaluatorConfig) -> Result<(), ConfigError> {
        if let Some(id) = &config.ruleset_id {
            self.rulesets.lookup(id)?;
        }
        self.config = config;
        Ok(())
    }

    /// Set a named parameter; only `ruleset` is recognised
    pub fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        match name {
            "ruleset" => {
                let id = self.rulesets.lookup(value)?.id.clone();
                self.config.ruleset_id = Some(id);
                Ok(())
            }
            other => Err(ConfigError::UnknownParameter(other.to_string())),
        }
    }

    /// Set a named feature: `groups`, `eventprocessing` or `brokenlinktesting`
    pub fn set_feature(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            feature: name.to_string(),
            value: value.to_string(),
        };
        match name {
            "groups" => {
                let bits: u8 = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::GroupOutOfRange(value.to_string()))?;
                self.config.groups = RuleGroup::from_bits(bits)
                    .ok_or_else(|| ConfigError::GroupOutOfRange(value.to_string()))?;
            }
            "eventprocessing" => {
                self.config.event_processing = value.parse().map_err(|_| invalid())?;
            }
            "brokenlinktesting" => {
                self.config.broken_link_testing = match value.trim().to_ascii_lowercase().as_str() {
                    "true" => true,
                    "false" => false,
                    _ => return Err(invalid()),
                };
            }
            other => return Err(ConfigError::UnknownFeature(other.to_string())),
        }
        Ok(())
    }

    /// Evaluator for the current configuration
    pub fn new_evaluator(&self) -> Result<Evaluator<'_>, ConfigError> {
        let ruleset = match &self.config.ruleset_id {
            Some(id) => self.rulesets.lookup(id)?,
            None => self.rulesets.first().ok_or(ConfigError::NoRulesets)?,
        };
        Ok(Evaluator::new(&self.registry, ruleset, self.config.clone()))
    }
}
