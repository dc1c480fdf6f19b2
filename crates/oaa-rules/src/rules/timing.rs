//! Timing Rules
//!
//! Time limits, moving content and flashing content.

use oaa_cache::ClassificationCache;

use super::dom;
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const TIMING_1: Rule = Rule {
    id: "TIMING_1",
    scope: RuleScope::Page,
    category: RuleCategory::TIMING,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "2.2.1",
    wcag_related_ids: &[],
    target_resources: &["Page", "meta[http-equiv=refresh]"],
    summary: "Time limits must be adjustable",
    validate: validate_time_limits,
};

pub const TIMING_2: Rule = Rule {
    id: "TIMING_2",
    scope: RuleScope::Element,
    category: RuleCategory::TIMING,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "2.2.2",
    wcag_related_ids: &[],
    target_resources: &["canvas", "embed", "img", "marquee", "blink", "object"],
    summary: "Moving, blinking or auto-updating content can be paused",
    validate: validate_moving_content,
};

pub const TIMING_3: Rule = Rule {
    id: "TIMING_3",
    scope: RuleScope::Element,
    category: RuleCategory::TIMING,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "2.3.1",
    wcag_related_ids: &[],
    target_resources: &["canvas", "embed", "img", "marquee", "blink", "object"],
    summary: "Content must not flash more than three times a second",
    validate: validate_moving_content,
};

fn validate_time_limits(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    match &cache.page().meta_refresh {
        Some(content) => out.add_page(TestResult::Fail, "PAGE_FAIL_1", vec![content.clone()]),
        None => out.add_page(TestResult::ManualCheck, "PAGE_MC_1", Vec::new()),
    }
    Ok(())
}

/// Shared by the pause and flash checks: both need a person to look
fn validate_moving_content(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for item in cache.timing() {
        let de = dom(cache, item)?;
        let tag = vec![de.tag_name.clone()];
        if de.is_visible_onscreen() {
            out.add(TestResult::ManualCheck, item, "ELEMENT_MC_1", tag);
        } else {
            out.add(TestResult::Hidden, item, "ELEMENT_HIDDEN_1", tag);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{doc, outcomes, run};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_meta_refresh_fails() {
        let d = doc(r#"<head><meta http-equiv="refresh" content="30"></head><body>x</body>"#);
        let results = run(&TIMING_1, &d);
        assert_eq!(outcomes(&results), vec![(TestResult::Fail, "PAGE_FAIL_1")]);
        assert_eq!(results[0].params, vec!["30"]);

        let results = run(&TIMING_1, &doc("<body>x</body>"));
        assert_eq!(outcomes(&results), vec![(TestResult::ManualCheck, "PAGE_MC_1")]);
    }

    #[test]
    fn test_moving_content() {
        let d = doc(
            r#"<body><marquee>news</marquee><img src="spin.gif" alt="spinner">
            <canvas style="display:none"></canvas></body>"#,
        );
        let results = run(&TIMING_2, &d);
        assert_eq!(
            outcomes(&results),
            vec![
                (TestResult::ManualCheck, "ELEMENT_MC_1"),
                (TestResult::ManualCheck, "ELEMENT_MC_1"),
                (TestResult::Hidden, "ELEMENT_HIDDEN_1"),
            ]
        );
        assert_eq!(results[1].params, vec!["img"]);
        assert_eq!(run(&TIMING_3, &d).len(), 3);
    }

    #[test]
    fn test_moving_content_has_no_page_result() {
        let d = doc("<body><marquee>news</marquee></body>");
        for rule in [&TIMING_2, &TIMING_3] {
            let results = run(rule, &d);
            assert!(results.iter().all(|r| !r.target.is_page()), "{}", rule.id);
        }
        assert!(run(&TIMING_2, &doc("<body><p>still</p></body>")).is_empty());
    }
}
