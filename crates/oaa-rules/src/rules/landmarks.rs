//! Landmark Rules

use oaa_cache::ClassificationCache;

use super::{dom, unresolved_labels};
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const LANDMARK_1: Rule = Rule {
    id: "LANDMARK_1",
    scope: RuleScope::Page,
    category: RuleCategory::LANDMARKS,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "2.4.1",
    wcag_related_ids: &["1.3.1", "2.4.6"],
    target_resources: &["main", "[role=main]"],
    summary: "Each page should have a main landmark",
    validate: validate_main_landmark,
};

pub const LANDMARK_2: Rule = Rule {
    id: "LANDMARK_2",
    scope: RuleScope::Element,
    category: RuleCategory::LANDMARKS,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "1.3.1",
    wcag_related_ids: &["2.4.1", "2.4.6"],
    target_resources: &["section", "form", "[role=region]", "[role=form]"],
    summary: "Region and form landmarks must have an accessible name",
    validate: validate_named_regions,
};

fn validate_main_landmark(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    let mut visible = 0usize;

    for landmark in cache.landmarks().iter().filter(|l| l.landmark == "main") {
        if dom(cache, landmark)?.is_visible_to_at() {
            visible += 1;
            out.add(TestResult::Pass, landmark, "ELEMENT_PASS_1", Vec::new());
        } else {
            out.add(TestResult::Hidden, landmark, "ELEMENT_HIDDEN_1", Vec::new());
        }
    }

    match visible {
        0 => out.add_page(TestResult::Fail, "PAGE_FAIL_1", Vec::new()),
        1 => out.add_page(TestResult::Pass, "PAGE_PASS_1", Vec::new()),
        n => out.add_page(TestResult::Pass, "PAGE_PASS_2", vec![n.to_string()]),
    }
    Ok(())
}

fn validate_named_regions(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for landmark in cache.landmarks() {
        if !matches!(landmark.landmark, "region" | "form") {
            continue;
        }
        let de = dom(cache, landmark)?;
        let kind = landmark.landmark.to_string();

        if !de.is_visible_to_at() {
            out.add(TestResult::Hidden, landmark, "ELEMENT_HIDDEN_1", vec![kind]);
        } else if de.accessible_name.has_name() {
            let name = de.accessible_name.name.clone();
            out.add(TestResult::Pass, landmark, "ELEMENT_PASS_1", vec![kind, name]);
        } else if let Some(ids) = unresolved_labels(de) {
            out.add(TestResult::ManualCheck, landmark, "ELEMENT_MC_1", vec![kind, ids]);
        } else {
            out.add(TestResult::Fail, landmark, "ELEMENT_FAIL_1", vec![kind]);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{doc, outcomes, page, run};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_main_landmark() {
        let results = run(&LANDMARK_1, &doc("<body><main><p>Hi</p></main></body>"));
        assert_eq!(
            outcomes(&results),
            vec![(TestResult::Pass, "ELEMENT_PASS_1"), (TestResult::Pass, "PAGE_PASS_1")]
        );

        let d = doc(r#"<body><main>a</main><div role="main">b</div><main hidden>c</main></body>"#);
        let results = run(&LANDMARK_1, &d);
        assert_eq!(page(&results).message_key, "PAGE_PASS_2");
        assert_eq!(page(&results).params, vec!["2"]);
        assert_eq!(results[2].test_result, TestResult::Hidden);

        let results = run(&LANDMARK_1, &doc("<body><p>No landmarks</p></body>"));
        assert_eq!(outcomes(&results), vec![(TestResult::Fail, "PAGE_FAIL_1")]);
    }

    #[test]
    fn test_named_regions() {
        let d = doc(
            r#"<body><section aria-label="News">n</section><div role="region">r</div>
            <form aria-label="Search"><input type="search" title="q"></form><form><input type="text"></form>
            <div role="form" style="display:none">f</div></body>"#,
        );
        let results = run(&LANDMARK_2, &d);
        assert_eq!(
            outcomes(&results),
            vec![
                (TestResult::Pass, "ELEMENT_PASS_1"),
                (TestResult::Fail, "ELEMENT_FAIL_1"),
                (TestResult::Pass, "ELEMENT_PASS_1"),
                (TestResult::Hidden, "ELEMENT_HIDDEN_1"),
            ]
        );
        assert_eq!(results[0].params, vec!["region", "News"]);
        assert_eq!(results[1].params, vec!["region"]);
    }

    #[test]
    fn test_region_dangling_labelledby() {
        let d = doc(r#"<body><div role="region" aria-labelledby="nope">r</div></body>"#);
        let results = run(&LANDMARK_2, &d);
        assert_eq!(outcomes(&results), vec![(TestResult::ManualCheck, "ELEMENT_MC_1")]);
        assert_eq!(results[0].params, vec!["region", "nope"]);
    }
}
