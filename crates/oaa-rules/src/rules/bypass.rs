//! Bypass Blocks
//!
//! A skip-to control, or one of the first two links pointing at an
//! in-page target.

use std::collections::HashSet;

use oaa_cache::{ClassificationCache, ElementIndex, Inspectable};

use super::{dom, entry};
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

/// Links inspected for an in-page target
const CANDIDATE_LINKS: usize = 2;

pub const BYPASS_1: Rule = Rule {
    id: "BYPASS_1",
    scope: RuleScope::Page,
    category: RuleCategory::KEYBOARD_SUPPORT,
    group: RuleGroup::GROUP1,
    wcag_primary_id: "2.4.1",
    wcag_related_ids: &["2.4.3"],
    target_resources: &["Page", "a[href]", "[class~=skipto]"],
    summary: "Provide a way to bypass blocks of repeated content",
    validate: validate_bypass,
};

/// Element with the given id, else one whose `name` matches
fn find_target(cache: &ClassificationCache<'_>, id: &str) -> Option<ElementIndex> {
    cache.element_by_id(id).or_else(|| {
        cache
            .element_entries()
            .find(|e| cache.attr(e.index, "name").is_some_and(|n| n.trim() == id))
            .map(|e| e.index)
    })
}

fn validate_bypass(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    if let Some(index) = cache.page().skipto {
        out.add(TestResult::Pass, &entry(cache, index)?, "ELEMENT_PASS_1", Vec::new());
        out.add_page(TestResult::Pass, "PAGE_PASS_1", Vec::new());
        return Ok(());
    }

    let mut bypass_link = false;
    let mut focusable = false;
    let mut missing: Option<String> = None;
    let mut reported: HashSet<ElementIndex> = HashSet::new();

    for link in cache.links().iter().take(CANDIDATE_LINKS) {
        let Some(id) = link.fragment.as_deref() else {
            continue;
        };
        reported.insert(link.element_index());

        if !dom(cache, link)?.is_visible_to_at() {
            out.add(TestResult::Hidden, link, "ELEMENT_HIDDEN_1", Vec::new());
            continue;
        }
        bypass_link = true;

        let Some(target) = find_target(cache, id) else {
            missing.get_or_insert_with(|| id.to_string());
            out.add(TestResult::Fail, link, "ELEMENT_FAIL_1", vec![id.to_string()]);
            continue;
        };

        let target = entry(cache, target)?;
        let first_report = reported.insert(target.index);
        if target.element.is_focusable() {
            focusable = true;
            out.add(TestResult::Pass, link, "ELEMENT_PASS_2", Vec::new());
            if first_report {
                out.add(TestResult::Pass, &target, "ELEMENT_PASS_3", Vec::new());
            }
        } else {
            out.add(TestResult::Pass, link, "ELEMENT_PASS_2", vec![id.to_string()]);
            if first_report {
                out.add(TestResult::ManualCheck, &target, "ELEMENT_MC_1", Vec::new());
            }
        }
    }

    match (bypass_link && focusable, missing) {
        (true, _) => out.add_page(TestResult::Pass, "PAGE_PASS_1", Vec::new()),
        (false, Some(id)) => out.add_page(TestResult::Fail, "PAGE_FAIL_1", vec![id]),
        (false, None) if bypass_link => out.add_page(TestResult::ManualCheck, "PAGE_MC_1", Vec::new()),
        (false, None) => out.add_page(TestResult::ManualCheck, "PAGE_MC_2", Vec::new()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{doc, outcomes, page, run};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_focusable_target_passes() {
        let d = doc(
            r##"<body><a href="#content">Skip</a><nav>x</nav>
            <main id="content" tabindex="-1">c</main></body>"##,
        );
        let results = run(&BYPASS_1, &d);
        assert_eq!(
            outcomes(&results),
            vec![
                (TestResult::Pass, "ELEMENT_PASS_2"),
                (TestResult::Pass, "ELEMENT_PASS_3"),
                (TestResult::Pass, "PAGE_PASS_1"),
            ]
        );
    }

    #[test]
    fn test_missing_target_fails_with_id() {
        let d = doc(r##"<body><a href="#nowhere">Skip</a><p>c</p></body>"##);
        let results = run(&BYPASS_1, &d);
        let page = page(&results);
        assert_eq!(page.test_result, TestResult::Fail);
        assert_eq!(page.message_key, "PAGE_FAIL_1");
        assert_eq!(page.params, vec!["nowhere"]);
        assert_eq!(results[0].params, vec!["nowhere"]);
    }

    #[test]
    fn test_hidden_link_is_hidden_whatever_its_target() {
        let d = doc(
            r##"<body><a href="#nowhere" style="display:none">Skip</a><p>c</p></body>"##,
        );
        let results = run(&BYPASS_1, &d);
        assert_eq!(
            outcomes(&results),
            vec![(TestResult::Hidden, "ELEMENT_HIDDEN_1"), (TestResult::ManualCheck, "PAGE_MC_2")]
        );
    }

    #[test]
    fn test_static_target_needs_manual_check() {
        let d = doc(
            r##"<body><a href="#main">Skip</a><a href="#main">Again</a><div id="main">c</div></body>"##,
        );
        let results = run(&BYPASS_1, &d);
        assert_eq!(
            outcomes(&results),
            vec![
                (TestResult::Pass, "ELEMENT_PASS_2"),
                (TestResult::ManualCheck, "ELEMENT_MC_1"),
                (TestResult::Pass, "ELEMENT_PASS_2"),
                (TestResult::ManualCheck, "PAGE_MC_1"),
            ]
        );
    }

    #[test]
    fn test_target_found_by_name() {
        let d = doc(r##"<body><a href="#top">Skip</a><a name="top" href="/x">t</a></body>"##);
        let results = run(&BYPASS_1, &d);
        assert_eq!(page(&results).message_key, "PAGE_PASS_1");
    }

    #[test]
    fn test_skipto_control() {
        let d = doc(r#"<body><div class="SkipTo" role="button">s</div></body>"#);
        let results = run(&BYPASS_1, &d);
        assert_eq!(
            outcomes(&results),
            vec![(TestResult::Pass, "ELEMENT_PASS_1"), (TestResult::Pass, "PAGE_PASS_1")]
        );
    }

    #[test]
    fn test_no_links() {
        let results = run(&BYPASS_1, &doc("<body><p>plain</p></body>"));
        assert_eq!(outcomes(&results), vec![(TestResult::ManualCheck, "PAGE_MC_2")]);
    }
}
