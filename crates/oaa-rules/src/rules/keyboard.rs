//! Keyboard Support

use oaa_cache::{ClassificationCache, EventFlags};

use super::{descendants, dom};
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const KEYBOARD_1: Rule = Rule {
    id: "KEYBOARD_1",
    scope: RuleScope::Element,
    category: RuleCategory::KEYBOARD_SUPPORT,
    group: RuleGroup::GROUP3,
    wcag_primary_id: "2.1.1",
    wcag_related_ids: &["4.1.2"],
    target_resources: &["[role]"],
    summary: "Widgets must support the keyboard interactions of their role",
    validate: validate_keyboard_support,
};

/// Space separated names of the key events handled
fn key_event_names(flags: &EventFlags) -> String {
    [
        (flags.key_down, "keydown"),
        (flags.key_press, "keypress"),
        (flags.key_up, "keyup"),
    ]
    .iter()
    .filter(|(set, _)| *set)
    .map(|(_, name)| *name)
    .collect::<Vec<_>>()
    .join(" ")
}

fn validate_keyboard_support(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for widget in cache.widgets() {
        let de = dom(cache, widget)?;
        if !de.role.is_widget() {
            continue;
        }
        if !de.is_visible_to_at() {
            out.add(TestResult::Hidden, widget, "ELEMENT_HIDDEN_1", vec![de.elem_name.clone()]);
            continue;
        }

        let role = de.role.name().to_string();
        let events = &de.events;
        if events.own.has_key_events() {
            let names = key_event_names(&events.own);
            out.add(TestResult::ManualCheck, widget, "ELEMENT_MC_1", vec![names, role]);
        } else if events.ancestor.has_key_events() {
            let names = key_event_names(&events.ancestor);
            out.add(TestResult::ManualCheck, widget, "ELEMENT_MC_2", vec![names, role]);
        } else if let Some(inner) =
            descendants(cache, de).find(|d| d.events.own.has_key_events())
        {
            let names = key_event_names(&inner.events.own);
            out.add(TestResult::ManualCheck, widget, "ELEMENT_MC_4", vec![names, role]);
        } else {
            out.add(TestResult::ManualCheck, widget, "ELEMENT_MC_5", vec![role]);
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
    fn test_key_event_names() {
        let flags = EventFlags {
            key_down: true,
            key_up: true,
            ..EventFlags::default()
        };
        assert_eq!(key_event_names(&flags), "keydown keyup");
        assert_eq!(key_event_names(&EventFlags::default()), "");
    }

    #[test]
    fn test_keyboard_support() {
        let d = doc(
            r#"<body>
            <div role="slider" tabindex="0" onkeydown="k()">1</div>
            <div onkeyup="k()"><span role="button" tabindex="0">2</span></div>
            <div role="tablist"><span role="tab" tabindex="0" onkeypress="k()">3</span></div>
            <div role="checkbox" tabindex="0">4</div>
            <div role="navigation">nav</div>
            <div role="button" aria-hidden="true">5</div>
            </body>"#,
        );
        let results = run(&KEYBOARD_1, &d);
        assert_eq!(
            outcomes(&results),
            vec![
                (TestResult::ManualCheck, "ELEMENT_MC_1"),
                (TestResult::ManualCheck, "ELEMENT_MC_2"),
                (TestResult::ManualCheck, "ELEMENT_MC_4"),
                (TestResult::ManualCheck, "ELEMENT_MC_1"),
                (TestResult::ManualCheck, "ELEMENT_MC_5"),
                (TestResult::Hidden, "ELEMENT_HIDDEN_1"),
            ]
        );
        assert_eq!(results[0].params, vec!["keydown", "slider"]);
        assert_eq!(results[1].params, vec!["keyup", "button"]);
        assert_eq!(results[2].params, vec!["keypress", "tablist"]);
    }
}
