//! Link Rules

use std::collections::HashMap;

use oaa_cache::{ClassificationCache, LinkElement};

use super::{dom, unresolved_labels};
use crate::RuleError;
use crate::constants::{RuleCategory, RuleGroup, RuleScope};
use crate::result::{ResultCollector, TestResult};
use crate::rule::Rule;

pub const LINK_1: Rule = Rule {
    id: "LINK_1",
    scope: RuleScope::Element,
    category: RuleCategory::LINKS,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "2.4.4",
    wcag_related_ids: &["2.4.9"],
    target_resources: &["a", "area", "[role=link]"],
    summary: "Link text must describe the purpose of the link",
    validate: validate_link_purpose,
};

pub const LINK_2: Rule = Rule {
    id: "LINK_2",
    scope: RuleScope::Element,
    category: RuleCategory::LINKS,
    group: RuleGroup::GROUP2,
    wcag_primary_id: "2.4.4",
    wcag_related_ids: &["2.4.9"],
    target_resources: &["a", "area", "[role=link]"],
    summary: "Links with the same name but different targets need distinct descriptions",
    validate: validate_same_names,
};

fn validate_link_purpose(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for link in cache.links() {
        let de = dom(cache, link)?;
        let tag = de.tag_name.clone();
        let name = &de.accessible_name;

        if !de.is_visible_to_at() {
            out.add(TestResult::Hidden, link, "ELEMENT_HIDDEN_1", vec![tag]);
        } else if !name.has_name() {
            match unresolved_labels(de) {
                Some(ids) => out.add(TestResult::ManualCheck, link, "ELEMENT_MC_3", vec![tag, ids]),
                None => out.add(TestResult::Fail, link, "ELEMENT_FAIL_1", vec![tag]),
            }
        } else if de.accessible_description.is_empty() {
            out.add(TestResult::ManualCheck, link, "ELEMENT_MC_1", vec![tag, name.name.clone()]);
        } else {
            out.add(
                TestResult::ManualCheck,
                link,
                "ELEMENT_MC_2",
                vec![tag, name.name.clone(), de.accessible_description.clone()],
            );
        }
    }
    Ok(())
}

/// Visible, named links grouped by case-folded name, in order of first use
fn same_name_groups<'c>(
    cache: &'c ClassificationCache<'_>,
) -> Result<Vec<Vec<&'c LinkElement>>, RuleError> {
    let mut groups: Vec<Vec<&LinkElement>> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for link in cache.links() {
        let de = dom(cache, link)?;
        if !de.is_visible_to_at() || !de.accessible_name.has_name() {
            continue;
        }
        let key = de.accessible_name.name.to_lowercase();
        let slot = *by_name.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(link);
    }

    groups.retain(|g| g.len() > 1);
    Ok(groups)
}

fn validate_same_names(
    cache: &ClassificationCache<'_>,
    out: &mut ResultCollector<'_, '_>,
) -> Result<(), RuleError> {
    for group in same_name_groups(cache)? {
        let same_hrefs = group.windows(2).all(|w| w[0].href == w[1].href);

        let mut descriptions = Vec::with_capacity(group.len());
        for link in &group {
            descriptions.push(dom(cache, *link)?.accessible_description.to_lowercase());
        }
        let unique_descriptions = descriptions.iter().all(|d| !d.is_empty())
            && descriptions
                .iter()
                .enumerate()
                .all(|(i, d)| !descriptions[..i].contains(d));

        let (result, key) = if same_hrefs {
            (TestResult::Pass, "ELEMENT_PASS_1")
        } else if unique_descriptions {
            (TestResult::Pass, "ELEMENT_PASS_2")
        } else {
            (TestResult::Fail, "ELEMENT_FAIL_1")
        };

        let count = group.len().to_string();
        for link in group {
            let tag = dom(cache, link)?.tag_name.clone();
            out.add(result, link, key, vec![tag, count.clone()]);
        }
    }
    Ok(())
}
