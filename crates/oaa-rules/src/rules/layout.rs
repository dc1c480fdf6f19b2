//! Layout and Reading Order

use oaa_cache::{ClassificationCache, TableType};

use super::dom;
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const LAYOUT_1: Rule = Rule {
    id: "LAYOUT_1",
    scope: RuleScope::Page,
    category: RuleCategory::TABLES,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "1.3.2",
    wcag_related_ids: &["1.3.1"],
    target_resources: &["table"],
    summary: "Content in layout tables must make sense when linearized",
    validate: validate_linearization,
};

pub const LAYOUT_2: Rule = Rule {
    id: "LAYOUT_2",
    scope: RuleScope::Element,
    category: RuleCategory::STYLES_READABILITY,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "1.3.2",
    wcag_related_ids: &["1.3.1"],
    target_resources: &["table"],
    summary: "Multi-column layout tables must not be nested",
    validate: validate_nesting,
};

pub const LAYOUT_3: Rule = Rule {
    id: "LAYOUT_3",
    scope: RuleScope::Page,
    category: RuleCategory::STYLES_READABILITY,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "1.3.2",
    wcag_related_ids: &["1.3.1"],
    target_resources: &["[aria-flowto]"],
    summary: "Reading order defined with aria-flowto must be verified",
    validate: validate_flowto,
};

fn validate_linearization(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    let mut manual = 0usize;
    let mut passed = 0usize;

    for table in cache.tables().iter().filter(|t| t.table_type == TableType::Layout) {
        if !dom(cache, table)?.is_visible_to_at() {
            out.add(TestResult::Hidden, table, "ELEMENT_HIDDEN_1", Vec::new());
        } else if !table.is_multi_column() {
            // One column reads the same linearized
            passed += 1;
            out.add(TestResult::Pass, table, "ELEMENT_PASS_1", Vec::new());
        } else if table.nesting_level == 0 {
            manual += 1;
            out.add(
                TestResult::ManualCheck,
                table,
                "ELEMENT_MC_2",
                vec![table.row_count.to_string(), table.column_count.to_string()],
            );
        } else {
            manual += 1;
            out.add(
                TestResult::ManualCheck,
                table,
                "ELEMENT_MC_3",
                vec![table.nesting_level.to_string()],
            );
        }
    }

    if manual > 0 {
        out.add_page(TestResult::ManualCheck, "PAGE_MC_1", vec![manual.to_string()]);
    } else if passed > 0 {
        out.add_page(TestResult::Pass, "PAGE_PASS_1", Vec::new());
    } else {
        out.add_page(TestResult::NotApplicable, "PAGE_NA_1", Vec::new());
    }
    Ok(())
}

fn validate_nesting(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for table in cache.tables().iter().filter(|t| t.table_type == TableType::Layout) {
        if !dom(cache, table)?.is_visible_to_at() {
            out.add(TestResult::Hidden, table, "ELEMENT_HIDDEN_1", Vec::new());
        } else if !table.is_multi_column() {
            out.add(TestResult::Pass, table, "ELEMENT_PASS_2", Vec::new());
        } else if table.nesting_level > 0 {
            out.add(
                TestResult::Fail,
                table,
                "ELEMENT_FAIL_1",
                vec![
                    table.row_count.to_string(),
                    table.column_count.to_string(),
                    table.nesting_level.to_string(),
                ],
            );
        } else {
            out.add(TestResult::Pass, table, "ELEMENT_PASS_1", Vec::new());
        }
    }
    Ok(())
}

fn validate_flowto(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    let mut manual = 0usize;

    for element in cache.element_entries() {
        if cache.attr(element.index, "aria-flowto").is_none_or(|v| v.trim().is_empty()) {
            continue;
        }
        let tag = vec![element.element.tag_name.clone()];
        if element.element.is_visible_to_at() {
            manual += 1;
            out.add(TestResult::ManualCheck, &element, "ELEMENT_MC_1", tag);
        } else {
            out.add(TestResult::Hidden, &element, "ELEMENT_HIDDEN_1", tag);
        }
    }

    if manual > 0 {
        out.add_page(TestResult::ManualCheck, "PAGE_MC_1", vec![manual.to_string()]);
    } else {
        out.add_page(TestResult::NotApplicable, "PAGE_NA_1", Vec::new());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testing::{doc, outcomes, page, run};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_column_layout_table_passes() {
        let d = doc("<body><table><tr><td>a</td></tr><tr><td>b</td></tr></table></body>");
        let results = run(&LAYOUT_1, &d);
        assert_eq!(
            outcomes(&results),
            vec![(TestResult::Pass, "ELEMENT_PASS_1"), (TestResult::Pass, "PAGE_PASS_1")]
        );
    }

    #[test]
    fn test_nested_multi_column_layout() {
        let d = doc(
            "<body><table><tr><td><table><tr><td>a</td><td>b</td></tr></table></td><td>c</td></tr></table></body>",
        );
        let results = run(&LAYOUT_1, &d);
        assert_eq!(
            outcomes(&results),
            vec![
                (TestResult::ManualCheck, "ELEMENT_MC_2"),
                (TestResult::ManualCheck, "ELEMENT_MC_3"),
                (TestResult::ManualCheck, "PAGE_MC_1"),
            ]
        );
        assert_eq!(results[0].params, vec!["1", "2"]);

        let results = run(&LAYOUT_2, &d);
        assert_eq!(
            outcomes(&results),
            vec![(TestResult::Pass, "ELEMENT_PASS_1"), (TestResult::Fail, "ELEMENT_FAIL_1")]
        );
        assert_eq!(results[1].params, vec!["1", "2", "1"]);
    }

    #[test]
    fn test_no_layout_tables_not_applicable() {
        let results = run(&LAYOUT_1, &doc("<body><p>x</p></body>"));
        assert_eq!(page(&results).test_result, TestResult::NotApplicable);
        assert!(run(&LAYOUT_2, &doc("<body><p>x</p></body>")).is_empty());
    }

    #[test]
    fn test_flowto() {
        let d = doc(r#"<body><div aria-flowto="b">a</div><div id="b" hidden aria-flowto="a">b</div></body>"#);
        let results = run(&LAYOUT_3, &d);
        assert_eq!(
            outcomes(&results),
            vec![
                (TestResult::ManualCheck, "ELEMENT_MC_1"),
                (TestResult::Hidden, "ELEMENT_HIDDEN_1"),
                (TestResult::ManualCheck, "PAGE_MC_1"),
            ]
        );
    }
}
