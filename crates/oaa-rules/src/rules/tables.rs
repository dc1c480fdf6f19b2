//! Data Table Rules
//!
//! Only tables classified as data or complex are inspected. Layout tables
//! are covered by the layout rules.

use oaa_cache::{ClassificationCache, NameSource};

use super::{dom, entry, unresolved_labels};
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const TABLE_1: Rule = Rule {
    id: "TABLE_1",
    scope: RuleScope::Element,
    category: RuleCategory::TABLES,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "1.3.1",
    wcag_related_ids: &[],
    target_resources: &["td"],
    summary: "Data cells must be labelled by header cells",
    validate: validate_cell_headers,
};

pub const TABLE_2: Rule = Rule {
    id: "TABLE_2",
    scope: RuleScope::Element,
    category: RuleCategory::TABLES,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "2.4.6",
    wcag_related_ids: &["1.3.1"],
    target_resources: &["table"],
    summary: "Data tables should have an accessible name",
    validate: validate_table_names,
};

fn validate_cell_headers(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for table in cache.tables().iter().filter(|t| t.table_type.is_data()) {
        for cell in table.cells.iter().filter(|c| !c.is_header() && c.has_content) {
            let item = entry(cache, cell.element.index)?;
            if !item.element.is_visible_to_at() {
                out.add(TestResult::Hidden, &item, "ELEMENT_HIDDEN_1", Vec::new());
            } else if !cell.headers.is_empty() {
                out.add(TestResult::Pass, &item, "ELEMENT_PASS_1", vec![cell.headers.clone()]);
            } else {
                out.add(TestResult::Fail, &item, "ELEMENT_FAIL_1", Vec::new());
            }
        }
    }
    Ok(())
}

fn validate_table_names(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for table in cache.tables().iter().filter(|t| t.table_type.is_data()) {
        let de = dom(cache, table)?;
        let name = &de.accessible_name;

        if !de.is_visible_to_at() {
            out.add(TestResult::Hidden, table, "ELEMENT_HIDDEN_1", Vec::new());
            continue;
        }
        if !name.has_name() {
            match unresolved_labels(de) {
                Some(ids) => out.add(TestResult::ManualCheck, table, "ELEMENT_MC_1", vec![ids]),
                None => out.add(TestResult::Fail, table, "ELEMENT_FAIL_1", Vec::new()),
            }
            continue;
        }
        let key = match name.source {
            NameSource::Caption => "ELEMENT_PASS_1",
            NameSource::AriaLabelledby => "ELEMENT_PASS_2",
            NameSource::AriaLabel => "ELEMENT_PASS_3",
            NameSource::Title => "ELEMENT_PASS_4",
            _ => "ELEMENT_PASS_5",
        };
        out.add(TestResult::Pass, table, key, vec![name.name.clone()]);
    }
    Ok(())
}
