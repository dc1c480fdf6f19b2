//! Evaluator
//!
//! Builds the classification cache once, then runs every enabled rule of
//! the selected ruleset against it in registration order. A rule that
//! errors or panics is recorded as failed and the rest still run.

use std::panic::{self, AssertUnwindSafe};
use std::time::{SystemTime, UNIX_EPOCH};

use oaa_cache::ClassificationCache;
use oaa_dom::Document;
use oaa_html::{HtmlError, HtmlParser};
use oaa_rules::{Rule, RuleRegistry, Ruleset};

use crate::config::EvaluatorConfig;
use crate::evaluation::EvaluationResult;
use crate::rule_result::RuleResult;

/// Runs one ruleset over documents
#[derive(Debug, Clone)]
pub struct Evaluator<'f> {
    registry: &'f RuleRegistry,
    ruleset: &'f Ruleset,
    config: EvaluatorConfig,
}

impl<'f> Evaluator<'f> {
    pub fn new(registry: &'f RuleRegistry, ruleset: &'f Ruleset, config: EvaluatorConfig) -> Self {
        Self {
            registry,
            ruleset,
            config,
        }
    }

    pub fn ruleset(&self) -> &'f Ruleset {
        self.ruleset
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Parse `html` as if loaded from `url` and evaluate it
    pub fn evaluate_html(&self, html: &str, url: &str) -> Result<EvaluationResult, HtmlError> {
        let document = HtmlParser::new().parse_with_url(html, url)?;
        Ok(self.evaluate(&document))
    }

    pub fn evaluate(&self, document: &Document) -> EvaluationResult {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.evaluate_at(document, now)
    }

    /// Evaluate with a fixed timestamp, for reproducible output
    pub fn evaluate_at(&self, document: &Document, eval_time: u64) -> EvaluationResult {
        let cache = ClassificationCache::build(document, self.config.event_processing);
        let page = cache.page();

        let mut evaluation = EvaluationResult {
            url: page.url.clone(),
            title: page.title.clone(),
            eval_time,
            ruleset: self.ruleset.clone(),
            event_processing: self.config.event_processing,
            broken_link_testing: self.config.broken_link_testing,
            groups: self.config.groups,
            has_body_element: page.has_body_element,
            rule_results: Vec::new(),
        };

        if !page.has_body_element {
            tracing::debug!(url = %page.url, "no body element; rules skipped");
            return evaluation;
        }

        for rule in self.registry.get_all() {
            let Some(mapping) = self.ruleset.mapping(rule.id).filter(|m| m.enabled) else {
                continue;
            };
            if !rule.group.intersects(self.config.groups) {
                continue;
            }
            evaluation.rule_results.push(run_rule(rule, mapping.required, &cache));
        }

        tracing::debug!(
            url = %evaluation.url,
            ruleset = %self.ruleset.id,
            rules = evaluation.rule_results.len(),
            "evaluation complete"
        );
        evaluation
    }
}

fn run_rule(rule: &Rule, required: bool, cache: &ClassificationCache<'_>) -> RuleResult {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(cache))) {
        Ok(Ok(results)) => {
            tracing::debug!(rule = rule.id, results = results.len(), "rule executed");
            RuleResult::new(*rule, required, results)
        }
        Ok(Err(err)) => {
            tracing::error!(rule = rule.id, error = %err, "rule failed");
            RuleResult::failed(*rule, required, err.to_string())
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "rule panicked".to_string());
            tracing::error!(rule = rule.id, %message, "rule panicked");
            RuleResult::failed(*rule, required, message)
        }
    }
}
