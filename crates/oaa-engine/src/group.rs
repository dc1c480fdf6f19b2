//! Rule Group Results
//!
//! Rule results sliced by category, guideline or scope, each slice
//! carrying a running summary that is updated as rules are added.

use serde::Serialize;

use oaa_rules::{RuleCategory, RuleScope};

use crate::rule_result::{ImplementationValue, RuleResult, RuleResultValue};

/// What a group collects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum GroupKey {
    All,
    Category(RuleCategory),
    /// WCAG guideline, e.g. `"1.4"`
    Guideline(String),
    Scope(RuleScope),
}

impl GroupKey {
    pub fn matches(&self, rule_result: &RuleResult) -> bool {
        let rule = rule_result.rule();
        match self {
            Self::All => true,
            Self::Category(category) => rule.category.intersects(*category),
            Self::Guideline(id) => rule.guideline_id() == id,
            Self::Scope(scope) => rule.scope == *scope,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::All => "All Rules".to_string(),
            Self::Category(category) => category.name().to_string(),
            Self::Guideline(id) => format!("Guideline {id}"),
            Self::Scope(RuleScope::Element) => "Element Rules".to_string(),
            Self::Scope(RuleScope::Page) => "Page Rules".to_string(),
            Self::Scope(RuleScope::Website) => "Website Rules".to_string(),
        }
    }
}

/// Counts of rules by verdict plus the running implementation score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleGroupSummary {
    pub violations: usize,
    pub warnings: usize,
    pub manual_checks: usize,
    pub passed: usize,
    pub not_applicable: usize,
    /// Rules whose procedure did not complete
    pub failed: usize,
    pub required: usize,
    pub recommended: usize,
    pub has_manual_checks: bool,
    #[serde(skip)]
    score_sum: i64,
    #[serde(skip)]
    scored_rules: i64,
    pub implementation_score: i32,
    pub implementation_value: ImplementationValue,
}

impl RuleGroupSummary {
    pub fn new() -> Self {
        Self {
            implementation_score: -1,
            implementation_value: ImplementationValue::NotApplicable,
            ..Self::default()
        }
    }

    /// Fold one more rule into the counts and the running mean
    pub fn update(&mut self, rule_result: &RuleResult) {
        if rule_result.is_required() {
            self.required += 1;
        } else {
            self.recommended += 1;
        }
        if rule_result.is_failed() {
            self.failed += 1;
            return;
        }

        match rule_result.result_value() {
            RuleResultValue::Violation => self.violations += 1,
            RuleResultValue::Warning => self.warnings += 1,
            RuleResultValue::ManualCheck => self.manual_checks += 1,
            RuleResultValue::Pass => self.passed += 1,
            RuleResultValue::NotApplicable => self.not_applicable += 1,
        }
        self.has_manual_checks |= rule_result.summary().manual_checks > 0;

        let score = rule_result.implementation_score();
        if score >= 0 {
            self.score_sum += i64::from(score);
            self.scored_rules += 1;
            let mean = (self.score_sum as f64 / self.scored_rules as f64).round() as i32;
            self.implementation_score = if mean == 100 && self.violations + self.warnings > 0 {
                99
            } else {
                mean
            };
        }
        self.implementation_value =
            ImplementationValue::from_score(self.implementation_score, self.has_manual_checks);
    }

    /// At least one rule produced a verdict
    pub fn has_results(&self) -> bool {
        self.violations + self.warnings + self.manual_checks + self.passed + self.not_applicable > 0
    }
}

/// A slice of an evaluation's rule results
#[derive(Debug, Clone)]
pub struct RuleGroupResult<'e> {
    key: GroupKey,
    rule_results: Vec<&'e RuleResult>,
    summary: RuleGroupSummary,
}

impl<'e> RuleGroupResult<'e> {
    pub fn new(key: GroupKey) -> Self {
        Self {
            key,
            rule_results: Vec::new(),
            summary: RuleGroupSummary::new(),
        }
    }

    /// Collect every matching rule result, in evaluation order
    pub fn collect(key: GroupKey, rule_results: impl IntoIterator<Item = &'e RuleResult>) -> Self {
        let mut group = Self::new(key);
        for rule_result in rule_results {
            if group.key.matches(rule_result) {
                group.add(rule_result);
            }
        }
        group
    }

    pub fn add(&mut self, rule_result: &'e RuleResult) {
        self.summary.update(rule_result);
        self.rule_results.push(rule_result);
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn title(&self) -> String {
        self.key.title()
    }

    pub fn rule_results(&self) -> &[&'e RuleResult] {
        &self.rule_results
    }

    pub fn summary(&self) -> &RuleGroupSummary {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.rule_results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_results.is_empty()
    }
}
