//! Colour Rules
//!
//! Text contrast and use of colour.

use std::collections::HashSet;

use oaa_cache::ClassificationCache;

use super::entry;
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const COLOR_1: Rule = Rule {
    id: "COLOR_1",
    scope: RuleScope::Element,
    category: RuleCategory::STYLES_READABILITY,
    group: RuleGroup::GROUP1,
    wcag_primary_id: "1.4.3",
    wcag_related_ids: &["1.4.1", "1.4.6"],
    target_resources: &["text content"],
    summary: "Text must have a contrast ratio of at least 4.5 (3.1 for large text)",
    validate: validate_contrast,
};

pub const COLOR_2: Rule = Rule {
    id: "COLOR_2",
    scope: RuleScope::Page,
    category: RuleCategory::STYLES_READABILITY,
    group: RuleGroup::GROUP1,
    wcag_primary_id: "1.4.1",
    wcag_related_ids: &[],
    target_resources: &["Page"],
    summary: "Colour must not be the only means of conveying information",
    validate: validate_use_of_color,
};

/// One result per element that directly contains text
fn validate_contrast(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    let mut seen = HashSet::new();

    for text in cache.texts() {
        if !seen.insert(text.parent) {
            continue;
        }
        let element = entry(cache, text.parent)?;
        let de = element.element;
        let cc = &de.color_contrast;

        if !de.is_visible_onscreen() {
            out.add(TestResult::Hidden, &element, "ELEMENT_HIDDEN_1", Vec::new());
            continue;
        }

        let ccr = format!("{:.1}", cc.ccr);
        let (result, key) = match (cc.passes(), cc.has_background_image, cc.is_large_font) {
            (true, false, false) => (TestResult::Pass, "ELEMENT_PASS_1"),
            (true, false, true) => (TestResult::Pass, "ELEMENT_PASS_2"),
            // A background image makes the composite colour unknown
            (true, true, false) => (TestResult::ManualCheck, "ELEMENT_MC_1"),
            (false, true, false) => (TestResult::ManualCheck, "ELEMENT_MC_2"),
            (true, true, true) => (TestResult::ManualCheck, "ELEMENT_MC_3"),
            (false, true, true) => (TestResult::ManualCheck, "ELEMENT_MC_4"),
            (false, false, false) => (TestResult::Fail, "ELEMENT_FAIL_1"),
            (false, false, true) => (TestResult::Fail, "ELEMENT_FAIL_2"),
        };
        out.add(result, &element, key, vec![ccr]);
    }
    Ok(())
}

fn validate_use_of_color(
    _cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    out.add_page(TestResult::ManualCheck, "PAGE_MC_1", Vec::new());
    Ok(())
}
