//! Heading Rules

use oaa_cache::ClassificationCache;

use super::{dom, unresolved_labels};
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const HEADING_1: Rule = Rule {
    id: "HEADING_1",
    scope: RuleScope::Page,
    category: RuleCategory::HEADINGS,
    group: RuleGroup::GROUP1,
    wcag_primary_id: "2.4.6",
    wcag_related_ids: &["1.3.1", "2.4.1", "2.4.10"],
    target_resources: &["h1", "[role=heading][aria-level=1]"],
    summary: "The page should contain at least one visible h1 heading",
    validate: validate_main_heading,
};

pub const HEADING_2: Rule = Rule {
    id: "HEADING_2",
    scope: RuleScope::Element,
    category: RuleCategory::HEADINGS,
    group: RuleGroup::GROUP1,
    wcag_primary_id: "2.4.6",
    wcag_related_ids: &["1.3.1"],
    target_resources: &["h1", "h2", "h3", "h4", "h5", "h6", "[role=heading]"],
    summary: "Headings must have text content",
    validate: validate_heading_content,
};

fn validate_main_heading(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    let mut visible = 0usize;
    let mut hidden = 0usize;

    for heading in cache.headings().iter().filter(|h| h.level == 1) {
        if dom(cache, heading)?.is_visible_to_at() {
            visible += 1;
            out.add(TestResult::Pass, heading, "ELEMENT_PASS_1", Vec::new());
        } else {
            hidden += 1;
            out.add(TestResult::Hidden, heading, "ELEMENT_HIDDEN_1", Vec::new());
        }
    }

    if visible > 0 {
        out.add_page(TestResult::Pass, "PAGE_PASS_1", vec![visible.to_string()]);
    } else if hidden > 0 {
        out.add_page(TestResult::Fail, "PAGE_FAIL_2", Vec::new());
    } else {
        out.add_page(TestResult::Fail, "PAGE_FAIL_1", Vec::new());
    }
    Ok(())
}

fn validate_heading_content(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for heading in cache.headings() {
        let de = dom(cache, heading)?;
        let level = vec![heading.level.to_string()];
        if !de.is_visible_to_at() {
            out.add(TestResult::Hidden, heading, "ELEMENT_HIDDEN_1", level);
        } else if de.accessible_name.has_name() {
            out.add(TestResult::Pass, heading, "ELEMENT_PASS_1", level);
        } else if let Some(ids) = unresolved_labels(de) {
            out.add(TestResult::ManualCheck, heading, "ELEMENT_MC_1", vec![ids]);
        } else {
            out.add(TestResult::Fail, heading, "ELEMENT_FAIL_1", level);
        }
    }
    Ok(())
}
