//! Evaluation Result
//!
//! Everything one evaluation produced: document identity, the ruleset used
//! and the rule results in registration order, with group queries and a
//! per-element view.

use std::collections::{BTreeMap, BTreeSet};

use oaa_cache::EventProcessing;
use oaa_rules::{RuleCategory, RuleGroup, RuleScope, Ruleset};

use serde::Serialize;

use crate::group::{GroupKey, RuleGroupResult};
use crate::rule_result::{ElementResultValue, RuleResult};

/// The results one element (or the page) received across rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSummary {
    pub ordinal_position: u32,
    pub tag_name: String,
    pub elem_name: String,
    /// Most severe value among the element's results
    pub highest: ElementResultValue,
    /// Rules that produced a result for the element, in evaluation order
    pub rule_ids: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub(crate) url: String,
    pub(crate) title: String,
    pub(crate) eval_time: u64,
    pub(crate) ruleset: Ruleset,
    pub(crate) event_processing: EventProcessing,
    pub(crate) broken_link_testing: bool,
    pub(crate) groups: RuleGroup,
    pub(crate) has_body_element: bool,
    pub(crate) rule_results: Vec<RuleResult>,
}

impl EvaluationResult {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// UTC seconds since the Unix epoch
    pub fn eval_time(&self) -> u64 {
        self.eval_time
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn event_processing(&self) -> EventProcessing {
        self.event_processing
    }

    pub fn broken_link_testing(&self) -> bool {
        self.broken_link_testing
    }

    pub fn groups(&self) -> RuleGroup {
        self.groups
    }

    /// False when the document had no body and no rule ran
    pub fn has_body_element(&self) -> bool {
        self.has_body_element
    }

    pub fn rule_results(&self) -> &[RuleResult] {
        &self.rule_results
    }

    pub fn rule_result(&self, rule_id: &str) -> Option<&RuleResult> {
        self.rule_results.iter().find(|r| r.rule_id() == rule_id)
    }

    pub fn group(&self, key: GroupKey) -> RuleGroupResult<'_> {
        RuleGroupResult::collect(key, &self.rule_results)
    }

    pub fn all_rules(&self) -> RuleGroupResult<'_> {
        self.group(GroupKey::All)
    }

    /// Like [`Self::group`], restricted to rules in `groups`
    pub fn group_filtered(&self, key: GroupKey, groups: RuleGroup) -> RuleGroupResult<'_> {
        RuleGroupResult::collect(key, self.rules_in(groups))
    }

    pub fn by_category(&self, category: RuleCategory, groups: RuleGroup) -> RuleGroupResult<'_> {
        self.group_filtered(GroupKey::Category(category), groups)
    }

    /// Rules whose WCAG success criterion falls under `guideline` (`"1.4"`)
    pub fn by_guideline(&self, guideline: &str, groups: RuleGroup) -> RuleGroupResult<'_> {
        self.group_filtered(GroupKey::Guideline(guideline.to_string()), groups)
    }

    pub fn by_scope(&self, scope: RuleScope) -> RuleGroupResult<'_> {
        self.group(GroupKey::Scope(scope))
    }

    /// One group per category that has at least one rule
    pub fn category_groups(&self, groups: RuleGroup) -> Vec<RuleGroupResult<'_>> {
        RuleCategory::NAMED
            .iter()
            .map(|(category, _)| self.by_category(*category, groups))
            .filter(|g| !g.is_empty())
            .collect()
    }

    /// One group per guideline present, in guideline order
    pub fn guideline_groups(&self, groups: RuleGroup) -> Vec<RuleGroupResult<'_>> {
        let guidelines: BTreeSet<&str> = self.rules_in(groups).map(|r| r.rule().guideline_id()).collect();
        guidelines.into_iter().map(|g| self.by_guideline(g, groups)).collect()
    }

    /// Each element with a result from a rule in `groups`, in document
    /// order, rated by its most severe result
    ///
    /// Not-applicable results are left out.
    pub fn element_results(&self, groups: RuleGroup) -> Vec<ElementSummary> {
        let mut elements: BTreeMap<u32, ElementSummary> = BTreeMap::new();
        for rule_result in self.rules_in(groups) {
            for result in rule_result.element_results() {
                let value = rule_result.element_value(result);
                if value == ElementResultValue::Undefined {
                    continue;
                }
                let target = &result.target;
                let summary = elements.entry(target.ordinal_position).or_insert_with(|| ElementSummary {
                    ordinal_position: target.ordinal_position,
                    tag_name: target.tag_name.clone(),
                    elem_name: target.elem_name.clone(),
                    highest: value,
                    rule_ids: Vec::new(),
                });
                summary.highest = summary.highest.max(value);
                summary.rule_ids.push(rule_result.rule_id());
            }
        }
        elements.into_values().collect()
    }

    fn rules_in(&self, groups: RuleGroup) -> impl Iterator<Item = &RuleResult> {
        self.rule_results
            .iter()
            .filter(move |r| r.rule().group.intersects(groups))
    }
}
