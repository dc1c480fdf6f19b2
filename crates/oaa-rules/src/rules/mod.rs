//! Rule Catalog
//!
//! Built-in rules, grouped by topic. Every procedure only reads the
//! classification cache.

use oaa_cache::{ClassificationCache, DomElement, ElementEntry, ElementIndex, Inspectable};

use crate::RuleError;
use crate::rule::Rule;

pub mod bypass;
pub mod color;
pub mod controls;
pub mod frames;
pub mod headings;
pub mod images;
pub mod keyboard;
pub mod landmarks;
pub mod language;
pub mod layout;
pub mod links;
pub mod media;
pub mod tables;
pub mod timing;
pub mod title;
pub mod widgets;

/// Every built-in rule, in registration order
pub fn all() -> Vec<Rule> {
    vec![
        color::COLOR_1,
        color::COLOR_2,
        bypass::BYPASS_1,
        frames::FRAME_1,
        frames::FRAME_2,
        layout::LAYOUT_1,
        layout::LAYOUT_2,
        layout::LAYOUT_3,
        timing::TIMING_1,
        timing::TIMING_2,
        timing::TIMING_3,
        language::LANGUAGE_1,
        language::LANGUAGE_2,
        title::TITLE_1,
        headings::HEADING_1,
        headings::HEADING_2,
        images::IMAGE_1,
        links::LINK_1,
        links::LINK_2,
        controls::CONTROL_1,
        widgets::WIDGET_1,
        widgets::WIDGET_2,
        landmarks::LANDMARK_1,
        landmarks::LANDMARK_2,
        keyboard::KEYBOARD_1,
        tables::TABLE_1,
        tables::TABLE_2,
        media::AUDIO_1,
        media::VIDEO_1,
    ]
}

/// The element behind a cached item
fn dom<'c>(
    cache: &'c ClassificationCache<'_>,
    item: &impl Inspectable,
) -> Result<&'c DomElement, RuleError> {
    cache
        .dom_element(item)
        .ok_or_else(|| RuleError::MissingElement(item.ordinal_position()))
}

fn entry<'c>(
    cache: &'c ClassificationCache<'_>,
    index: ElementIndex,
) -> Result<ElementEntry<'c>, RuleError> {
    cache
        .element_entry(index)
        .ok_or_else(|| RuleError::Internal(format!("element index {} out of range", index.index())))
}

/// `aria-labelledby` ids that pointed nowhere, space separated
fn unresolved_labels(element: &DomElement) -> Option<String> {
    (!element.unresolved_label_ids.is_empty()).then(|| element.unresolved_label_ids.join(" "))
}

/// Cached elements below `element`, in document order
fn descendants<'c>(
    cache: &'c ClassificationCache<'_>,
    element: &DomElement,
) -> impl Iterator<Item = &'c DomElement> + 'c {
    cache
        .document()
        .tree()
        .descendants(element.node)
        .filter_map(move |(node, _)| cache.element_for_node(node))
        .filter_map(move |index| cache.element(index))
}
