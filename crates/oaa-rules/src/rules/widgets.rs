//! Widget Rules
//!
//! Authored roles must be valid ARIA roles permitted on their host, and
//! anything scripted for mouse clicks must also be reachable from the
//! keyboard.

use oaa_cache::{ClassificationCache, DomElement};

use super::{descendants, dom};
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const WIDGET_1: Rule = Rule {
    id: "WIDGET_1",
    scope: RuleScope::Element,
    category: RuleCategory::WIDGETS_SCRIPTS,
    group: RuleGroup::GROUP3,
    wcag_primary_id: "4.1.2",
    wcag_related_ids: &["1.3.1"],
    target_resources: &["[role]"],
    summary: "Role attribute values must be valid ARIA roles allowed on the element",
    validate: validate_roles,
};

pub const WIDGET_2: Rule = Rule {
    id: "WIDGET_2",
    scope: RuleScope::Element,
    category: RuleCategory::WIDGETS_SCRIPTS,
    group: RuleGroup::GROUP3,
    wcag_primary_id: "4.1.2",
    wcag_related_ids: &["2.1.1"],
    target_resources: &["[onclick]"],
    summary: "Elements with click handlers must be keyboard operable",
    validate: validate_click_handlers,
};

/// Hosts whose click handlers describe the whole document or embedded content
const IGNORED_CLICK_HOSTS: &[&str] = &["body", "frame", "iframe", "embed", "object", "applet"];

fn validate_roles(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for widget in cache.widgets() {
        let de = dom(cache, widget)?;
        let authored = de.role.authored.clone().unwrap_or_default();

        if !de.is_visible_to_at() {
            out.add(TestResult::Hidden, widget, "ELEMENT_HIDDEN_1", vec![authored]);
        } else if de.role.invalid_role {
            out.add(TestResult::Fail, widget, "ELEMENT_FAIL_1", vec![authored]);
        } else if de.role.disallowed_role {
            out.add(
                TestResult::Fail,
                widget,
                "ELEMENT_FAIL_2",
                vec![authored, de.tag_name.clone()],
            );
        } else {
            out.add(
                TestResult::Pass,
                widget,
                "ELEMENT_PASS_1",
                vec![de.role.name().to_string()],
            );
        }
    }
    Ok(())
}

/// Something inside the element already provides keyboard access
fn has_operable_descendant(cache: &ClassificationCache<'_>, element: &DomElement) -> bool {
    descendants(cache, element).any(|d| d.role.is_widget() || d.is_interactive)
}

fn validate_click_handlers(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for item in cache.element_entries() {
        let de = item.element;
        if !de.events.own.click || IGNORED_CLICK_HOSTS.contains(&de.tag_name.as_str()) {
            continue;
        }
        let tag = de.tag_name.clone();

        if !(de.is_visible_to_at() || de.is_visible_onscreen()) {
            out.add(TestResult::Hidden, &item, "ELEMENT_HIDDEN_1", vec![tag]);
            continue;
        }

        match tag.as_str() {
            "input" | "textarea" | "button" | "select" => {
                out.add(TestResult::Pass, &item, "ELEMENT_PASS_2", vec![tag]);
            }
            "a" | "area" => {
                out.add(TestResult::Pass, &item, "ELEMENT_PASS_3", vec![tag]);
            }
            _ if de.role.is_widget() && de.is_focusable() => {
                out.add(TestResult::Pass, &item, "ELEMENT_PASS_1", vec![tag]);
            }
            _ if de.role.is_widget() => {
                let role = de.role.name().to_string();
                out.add(TestResult::Fail, &item, "ELEMENT_FAIL_2", vec![tag, role]);
            }
            _ if has_operable_descendant(cache, de) => {
                out.add(TestResult::ManualCheck, &item, "ELEMENT_MC_1", vec![tag]);
            }
            _ => {
                out.add(TestResult::Fail, &item, "ELEMENT_FAIL_1", vec![tag]);
            }
        }
    }
    Ok(())
}
