//! Rulesets
//!
//! A ruleset maps rule ids to `{required, enabled}`. Rulesets are data:
//! JSON documents, two of which are built in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::registry::RuleRegistry;

const WCAG20_ARIA_TRANS: &str = include_str!("../rulesets/wcag20_aria_trans.json");
const TEST: &str = include_str!("../rulesets/test.json");

#[derive(Debug, thiserror::Error)]
pub enum RulesetError {
    #[error("invalid ruleset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ruleset {ruleset:?} is missing {field}")]
    MissingField { ruleset: String, field: &'static str },

    #[error("ruleset {ruleset} maps unknown rule {rule}")]
    UnknownRule { ruleset: String, rule: String },

    #[error("ruleset {0} is already loaded")]
    DuplicateRuleset(String),

    #[error("unknown ruleset: {0}")]
    UnknownRuleset(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMapping {
    pub required: bool,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ruleset {
    #[serde(rename = "ruleset_id", default)]
    pub id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rule_mappings: BTreeMap<String, RuleMapping>,
}

impl Ruleset {
    /// Parse and check the identifying metadata
    pub fn from_json(json: &str) -> Result<Self, RulesetError> {
        let ruleset: Ruleset = serde_json::from_str(json)?;
        let required = [
            ("ruleset_id", &ruleset.id),
            ("version", &ruleset.version),
            ("title", &ruleset.title),
            ("author", &ruleset.author),
            ("last_updated", &ruleset.last_updated),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(RulesetError::MissingField {
                ruleset: ruleset.id.clone(),
                field: *field,
            });
        }
        Ok(ruleset)
    }

    pub fn mapping(&self, rule_id: &str) -> Option<RuleMapping> {
        self.rule_mappings.get(rule_id).copied()
    }

    pub fn is_enabled(&self, rule_id: &str) -> bool {
        self.mapping(rule_id).is_some_and(|m| m.enabled)
    }

    pub fn is_required(&self, rule_id: &str) -> bool {
        self.mapping(rule_id).is_some_and(|m| m.required)
    }

    /// Every mapped rule must exist in the registry
    pub fn check_rules(&self, registry: &RuleRegistry) -> Result<(), RulesetError> {
        match self.rule_mappings.keys().find(|id| !registry.contains(id)) {
            Some(rule) => Err(RulesetError::UnknownRule {
                ruleset: self.id.clone(),
                rule: rule.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Loaded rulesets, in load order
#[derive(Debug, Default, Clone)]
pub struct RulesetManager {
    rulesets: Vec<Ruleset>,
}

impl RulesetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in rulesets, checked against `registry`
    pub fn builtin(registry: &RuleRegistry) -> Result<Self, RulesetError> {
        let mut manager = Self::new();
        for json in [WCAG20_ARIA_TRANS, TEST] {
            manager.add(Ruleset::from_json(json)?, registry)?;
        }
        Ok(manager)
    }

    pub fn add(&mut self, ruleset: Ruleset, registry: &RuleRegistry) -> Result<(), RulesetError> {
        if self.get(&ruleset.id).is_some() {
            return Err(RulesetError::DuplicateRuleset(ruleset.id));
        }
        ruleset.check_rules(registry)?;
        tracing::debug!(
            ruleset = %ruleset.id,
            version = %ruleset.version,
            rules = ruleset.rule_mappings.len(),
            "ruleset loaded"
        );
        self.rulesets.push(ruleset);
        Ok(())
    }

    pub fn add_json(&mut self, json: &str, registry: &RuleRegistry) -> Result<(), RulesetError> {
        self.add(Ruleset::from_json(json)?, registry)
    }

    pub fn get(&self, id: &str) -> Option<&Ruleset> {
        self.rulesets.iter().find(|r| r.id == id)
    }

    pub fn lookup(&self, id: &str) -> Result<&Ruleset, RulesetError> {
        self.get(id).ok_or_else(|| RulesetError::UnknownRuleset(id.to_string()))
    }

    /// Default ruleset: the first one loaded
    pub fn first(&self) -> Option<&Ruleset> {
        self.rulesets.first()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rulesets.iter().map(|r| r.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ruleset> {
        self.rulesets.iter()
    }

    pub fn len(&self) -> usize {
        self.rulesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rulesets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rulesets() {
        let registry = RuleRegistry::builtin().unwrap();
        let manager = RulesetManager::builtin(&registry).unwrap();
        assert_eq!(manager.ids().collect::<Vec<_>>(), vec!["WCAG20_ARIA_TRANS", "TEST"]);
        assert_eq!(manager.first().unwrap().id, "WCAG20_ARIA_TRANS");

        let test = manager.lookup("TEST").unwrap();
        assert!(test.is_required("COLOR_1"));
        assert!(!test.is_required("BYPASS_1"));
        assert!(test.is_enabled("BYPASS_1"));
        for rule in registry.get_all() {
            assert!(test.is_enabled(rule.id), "{} missing from TEST", rule.id);
        }
    }

    #[test]
    fn test_missing_metadata() {
        let json = r#"{"ruleset_id": "X", "version": "1", "title": "t", "author": "a", "rule_mappings": {}}"#;
        match Ruleset::from_json(json) {
            Err(RulesetError::MissingField { field, .. }) => assert_eq!(field, "last_updated"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_rule_in_mapping() {
        let registry = RuleRegistry::builtin().unwrap();
        let json = r#"{"ruleset_id": "X", "version": "1", "title": "t", "author": "a",
            "last_updated": "2020-01-01",
            "rule_mappings": {"NOPE_9": {"required": true, "enabled": true}}}"#;
        let mut manager = RulesetManager::new();
        assert!(matches!(
            manager.add_json(json, &registry),
            Err(RulesetError::UnknownRule { .. })
        ));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_duplicate_and_unknown_ruleset() {
        let registry = RuleRegistry::builtin().unwrap();
        let mut manager = RulesetManager::builtin(&registry).unwrap();
        assert!(matches!(
            manager.add_json(TEST, &registry),
            Err(RulesetError::DuplicateRuleset(_))
        ));
        assert!(matches!(manager.lookup("NONE"), Err(RulesetError::UnknownRuleset(_))));
        assert!(matches!(Ruleset::from_json("{"), Err(RulesetError::Json(_))));
    }
}
