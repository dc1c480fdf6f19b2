//! Page Title

use oaa_cache::ClassificationCache;

use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const TITLE_1: Rule = Rule {
    id: "TITLE_1",
    scope: RuleScope::Page,
    category: RuleCategory::SITE_NAVIGATION,
    group: RuleGroup::GROUP1,
    wcag_primary_id: "2.4.2",
    wcag_related_ids: &["1.3.1", "2.4.6"],
    target_resources: &["Page", "title"],
    summary: "The page must have a title that describes its purpose",
    validate: validate_title,
};

fn validate_title(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    let page = cache.page();
    if !page.has_title_element {
        out.add_page(TestResult::Fail, "PAGE_FAIL_2", Vec::new());
    } else if page.title.is_empty() {
        out.add_page(TestResult::Fail, "PAGE_FAIL_1", Vec::new());
    } else {
        out.add_page(TestResult::ManualCheck, "PAGE_MC_1", vec![page.title.clone()]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{doc, outcomes, run};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_states() {
        let results = run(&TITLE_1, &doc("<head><title>Orders</title></head><body>x</body>"));
        assert_eq!(outcomes(&results), vec![(TestResult::ManualCheck, "PAGE_MC_1")]);
        assert_eq!(results[0].params, vec!["Orders"]);

        let results = run(&TITLE_1, &doc("<head><title>  </title></head><body>x</body>"));
        assert_eq!(outcomes(&results), vec![(TestResult::Fail, "PAGE_FAIL_1")]);

        let results = run(&TITLE_1, &doc("<body>x</body>"));
        assert_eq!(outcomes(&results), vec![(TestResult::Fail, "PAGE_FAIL_2")]);
    }
}
