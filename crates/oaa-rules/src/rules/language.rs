//! Language Rules

use oaa_cache::ClassificationCache;

use super::dom;
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const LANGUAGE_1: Rule = Rule {
    id: "LANGUAGE_1",
    scope: RuleScope::Page,
    category: RuleCategory::STYLES_READABILITY,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "3.1.1",
    wcag_related_ids: &[],
    target_resources: &["html[lang]"],
    summary: "The page must declare a valid primary language",
    validate: validate_page_language,
};

pub const LANGUAGE_2: Rule = Rule {
    id: "LANGUAGE_2",
    scope: RuleScope::Page,
    category: RuleCategory::STYLES_READABILITY,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "3.1.2",
    wcag_related_ids: &[],
    target_resources: &["[lang]"],
    summary: "Changes of language must use valid language codes",
    validate: validate_language_changes,
};

fn validate_page_language(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    let page = cache.page();
    if !page.has_lang {
        out.add_page(TestResult::Fail, "PAGE_FAIL_1", Vec::new());
    } else if page.lang_valid {
        out.add_page(TestResult::Pass, "PAGE_PASS_1", vec![page.lang.clone()]);
    } else {
        out.add_page(TestResult::Fail, "PAGE_FAIL_2", vec![page.lang.clone()]);
    }
    Ok(())
}

fn validate_language_changes(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    let mut passed = 0usize;
    let mut failed = 0usize;

    for entry in cache.languages() {
        let de = dom(cache, entry)?;
        let params = vec![de.tag_name.clone(), entry.lang.clone()];
        if !de.is_visible_to_at() {
            out.add(TestResult::Hidden, entry, "ELEMENT_HIDDEN_1", params);
        } else if entry.is_valid {
            passed += 1;
            out.add(TestResult::Pass, entry, "ELEMENT_PASS_1", params);
        } else {
            failed += 1;
            out.add(TestResult::Fail, entry, "ELEMENT_FAIL_1", params);
        }
    }

    match (failed, passed) {
        (1, _) => out.add_page(TestResult::Fail, "PAGE_FAIL_1", Vec::new()),
        (f, _) if f > 1 => out.add_page(TestResult::Fail, "PAGE_FAIL_2", vec![f.to_string()]),
        (_, 1) => out.add_page(TestResult::ManualCheck, "PAGE_MC_1", Vec::new()),
        (_, p) if p > 1 => out.add_page(TestResult::ManualCheck, "PAGE_MC_2", vec![p.to_string()]),
        _ => out.add_page(TestResult::ManualCheck, "PAGE_MC_3", Vec::new()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{doc, outcomes, page, run};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_language() {
        let results = run(&LANGUAGE_1, &doc(r#"<html lang="en-US"><body>x</body></html>"#));
        assert_eq!(outcomes(&results), vec![(TestResult::Pass, "PAGE_PASS_1")]);
        assert_eq!(results[0].params, vec!["en-US"]);

        let results = run(&LANGUAGE_1, &doc(r#"<html lang="english"><body>x</body></html>"#));
        assert_eq!(outcomes(&results), vec![(TestResult::Fail, "PAGE_FAIL_2")]);

        let results = run(&LANGUAGE_1, &doc("<html><body>x</body></html>"));
        assert_eq!(outcomes(&results), vec![(TestResult::Fail, "PAGE_FAIL_1")]);
    }

    #[test]
    fn test_language_changes() {
        let d = doc(
            r#"<html lang="en"><body><p lang="fr">Bonjour</p><p lang="de">Hallo</p></body></html>"#,
        );
        let results = run(&LANGUAGE_2, &d);
        let page = page(&results);
        assert_eq!(page.message_key, "PAGE_MC_2");
        assert_eq!(page.params, vec!["2"]);
        assert_eq!(results[0].params, vec!["p", "fr"]);
    }

    #[test]
    fn test_invalid_change_fails() {
        let d = doc(r#"<body><span lang="zz-top">x</span><span lang="es" hidden>y</span></body>"#);
        let results = run(&LANGUAGE_2, &d);
        assert_eq!(
            outcomes(&results),
            vec![
                (TestResult::Fail, "ELEMENT_FAIL_1"),
                (TestResult::Hidden, "ELEMENT_HIDDEN_1"),
                (TestResult::Fail, "PAGE_FAIL_1"),
            ]
        );
    }

    #[test]
    fn test_no_changes() {
        let results = run(&LANGUAGE_2, &doc("<body>x</body>"));
        assert_eq!(outcomes(&results), vec![(TestResult::ManualCheck, "PAGE_MC_3")]);
    }
}
