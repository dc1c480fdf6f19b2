//! Form Control Labels

use oaa_cache::{ClassificationCache, ControlType};

use super::{dom, unresolved_labels};
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const CONTROL_1: Rule = Rule {
    id: "CONTROL_1",
    scope: RuleScope::Element,
    category: RuleCategory::FORMS,
    group: RuleGroup::GROUP1,
    wcag_primary_id: "3.3.2",
    wcag_related_ids: &["1.3.1", "2.4.6"],
    target_resources: &["input", "select", "textarea"],
    summary: "Form controls must have a label",
    validate: validate_labels,
};

/// Controls whose name is authored separately from their value
fn needs_label(control_type: ControlType) -> bool {
    !matches!(
        control_type,
        ControlType::Button
            | ControlType::Image
            | ControlType::Output
            | ControlType::Meter
            | ControlType::Progress
    )
}

fn validate_labels(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for control in cache.controls() {
        let Some(control_type) = control.control_type.filter(|t| needs_label(*t)) else {
            continue;
        };
        let de = dom(cache, control)?;
        let params = vec![de.tag_name.clone(), control_type.as_str().to_string()];

        if !de.is_visible_to_at() {
            out.add(TestResult::Hidden, control, "ELEMENT_HIDDEN_1", params);
        } else if de.accessible_name.has_name() {
            out.add(
                TestResult::Pass,
                control,
                "ELEMENT_PASS_1",
                vec![de.accessible_name.source.as_str().to_string()],
            );
        } else if let Some(ids) = unresolved_labels(de) {
            out.add(TestResult::ManualCheck, control, "ELEMENT_MC_1", vec![ids]);
        } else {
            out.add(TestResult::Fail, control, "ELEMENT_FAIL_1", params);
        }
    }
    Ok(())
}
