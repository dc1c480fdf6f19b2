//! JSON Export
//!
//! A flat, serializable view of an evaluation. Element results are
//! optional since they dominate the document size.

use serde::Serialize;

use oaa_rules::{ElementResult, RuleCategory, RuleScope};

use crate::evaluation::EvaluationResult;
use crate::group::RuleGroupSummary;
use crate::rule_result::{ElementResultValue, ImplementationValue, RuleExecution, RuleResult, RuleResultValue};

#[derive(Debug, Serialize)]
pub struct EvaluationExport<'e> {
    pub eval_url: &'e str,
    pub eval_title: &'e str,
    pub eval_time: u64,
    pub ruleset_id: &'e str,
    pub ruleset_title: &'e str,
    pub ruleset_version: &'e str,
    pub broken_link_testing: bool,
    pub event_processing: &'static str,
    pub groups: u8,
    pub rule_results: Vec<RuleResultExport<'e>>,
    pub summary: RuleGroupSummary,
}

#[derive(Debug, Serialize)]
pub struct RuleResultExport<'e> {
    pub rule_id: &'static str,
    pub rule_scope: RuleScope,
    pub rule_category: RuleCategory,
    pub wcag_primary_id: &'static str,
    pub rule_required: bool,
    pub result_value: RuleResultValue,
    pub implementation_score: i32,
    pub implementation_value: ImplementationValue,
    pub elements_passed: usize,
    pub elements_violation: usize,
    pub elements_warning: usize,
    pub elements_manual_check: usize,
    pub elements_hidden: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_error: Option<&'e str>,
    pub message_key: &'static str,
    pub message_params: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_results: Option<Vec<ElementResultExport<'e>>>,
}

#[derive(Debug, Serialize)]
pub struct ElementResultExport<'e> {
    pub ordinal_position: u32,
    pub elem_name: &'e str,
    pub result_value: ElementResultValue,
    pub message_key: &'e str,
    pub message_params: &'e [String],
}

impl<'e> ElementResultExport<'e> {
    fn new(rule_result: &RuleResult, result: &'e ElementResult) -> Self {
        Self {
            ordinal_position: result.target.ordinal_position,
            elem_name: &result.target.elem_name,
            result_value: rule_result.element_value(result),
            message_key: &result.message_key,
            message_params: &result.params,
        }
    }
}

impl<'e> RuleResultExport<'e> {
    fn new(rule_result: &'e RuleResult, with_elements: bool) -> Self {
        let rule = rule_result.rule();
        let summary = rule_result.summary();
        let message = rule_result.message();
        let execution_error = match rule_result.execution() {
            RuleExecution::Failed { message } => Some(message.as_str()),
            RuleExecution::Completed => None,
        };
        let element_results = with_elements.then(|| {
            rule_result
                .element_results()
                .iter()
                .map(|r| ElementResultExport::new(rule_result, r))
                .collect()
        });

        Self {
            rule_id: rule.id,
            rule_scope: rule.scope,
            rule_category: rule.category,
            wcag_primary_id: rule.wcag_primary_id,
            rule_required: rule_result.is_required(),
            result_value: rule_result.result_value(),
            implementation_score: rule_result.implementation_score(),
            implementation_value: rule_result.implementation_value(),
            elements_passed: summary.passed,
            elements_violation: summary.violations,
            elements_warning: summary.warnings,
            elements_manual_check: summary.manual_checks,
            elements_hidden: summary.hidden,
            execution_error,
            message_key: message.key,
            message_params: message.params,
            element_results,
        }
    }
}

impl EvaluationResult {
    pub fn export(&self, with_elements: bool) -> EvaluationExport<'_> {
        EvaluationExport {
            eval_url: &self.url,
            eval_title: &self.title,
            eval_time: self.eval_time,
            ruleset_id: &self.ruleset.id,
            ruleset_title: &self.ruleset.title,
            ruleset_version: &self.ruleset.version,
            broken_link_testing: self.broken_link_testing,
            event_processing: self.event_processing.as_str(),
            groups: self.groups.bits(),
            rule_results: self
                .rule_results
                .iter()
                .map(|r| RuleResultExport::new(r, with_elements))
                .collect(),
            summary: *self.all_rules().summary(),
        }
    }

    pub fn to_json(&self, with_elements: bool) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.export(with_elements))
    }

    pub fn to_json_pretty(&self, with_elements: bool) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.export(with_elements))
    }
}
