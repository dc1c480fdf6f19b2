//! Rule Registry
//!
//! The catalog of rule definitions, keyed by id. Built once at startup and
//! passed by reference to evaluators.

use std::collections::HashMap;

use crate::rule::Rule;
use crate::rules;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("rule {0} is already registered")]
    DuplicateRule(String),

    #[error("unknown rule: {0}")]
    UnknownRule(String),
}

#[derive(Debug, Default, Clone)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
    by_id: HashMap<&'static str, usize>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with the built-in rule catalog
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for rule in rules::all() {
            registry.register(rule)?;
        }
        tracing::debug!(rules = registry.len(), "rule registry populated");
        Ok(registry)
    }

    /// Add a rule; ids are unique
    pub fn register(&mut self, rule: Rule) -> Result<(), RegistryError> {
        if self.by_id.contains_key(rule.id) {
            return Err(RegistryError::DuplicateRule(rule.id.to_string()));
        }
        self.by_id.insert(rule.id, self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Rules in registration order
    pub fn get_all(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get_by_id(&self, id: &str) -> Result<&Rule, RegistryError> {
        self.by_id
            .get(id)
            .map(|&i| &self.rules[i])
            .ok_or_else(|| RegistryError::UnknownRule(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let registry = RuleRegistry::builtin().unwrap();
        assert!(registry.len() >= 29);
        assert_eq!(registry.get_by_id("COLOR_1").unwrap().wcag_primary_id, "1.4.3");
        assert_eq!(registry.get_all()[0].id, "COLOR_1");
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = RuleRegistry::builtin().unwrap();
        let rule = *registry.get_by_id("LINK_1").unwrap();
        assert_eq!(
            registry.register(rule),
            Err(RegistryError::DuplicateRule("LINK_1".into()))
        );
    }

    #[test]
    fn test_unknown_rule() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(
            registry.get_by_id("NOPE_1").unwrap_err(),
            RegistryError::UnknownRule("NOPE_1".into())
        );
    }
}
