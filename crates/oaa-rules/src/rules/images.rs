//! Image Text Alternatives

use oaa_cache::ClassificationCache;

use super::{dom, unresolved_labels};
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const IMAGE_1: Rule = Rule {
    id: "IMAGE_1",
    scope: RuleScope::Element,
    category: RuleCategory::IMAGES,
    group: RuleGroup::GROUP1,
    wcag_primary_id: "1.1.1",
    wcag_related_ids: &[],
    target_resources: &["img", "area", "input[type=image]", "[role=img]"],
    summary: "Images must have a text alternative",
    validate: validate_text_alternative,
};

fn validate_text_alternative(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for image in cache.images() {
        let de = dom(cache, image)?;
        // Decorative images are out of scope
        if de.role.is_presentational() {
            continue;
        }
        if !de.is_visible_to_at() {
            out.add(TestResult::Hidden, image, "ELEMENT_HIDDEN_1", vec![de.tag_name.clone()]);
        } else if de.accessible_name.has_name() {
            out.add(
                TestResult::Pass,
                image,
                "ELEMENT_PASS_1",
                vec![de.accessible_name.source.as_str().to_string()],
            );
        } else if let Some(ids) = unresolved_labels(de) {
            out.add(TestResult::ManualCheck, image, "ELEMENT_MC_1", vec![ids]);
        } else {
            out.add(TestResult::Fail, image, "ELEMENT_FAIL_1", vec![de.tag_name.clone()]);
        }
    }
    Ok(())
}
