//! Visibility
//!
//! Inherited visibility flags. An element is hidden from assistive
//! technology when any ancestor (or itself) is removed from the
//! accessibility tree, and hidden on screen when it is also clipped,
//! collapsed or positioned far outside the viewport.

use oaa_css::{PropertyId, SpecifiedStyle, parse_length_px};
use oaa_dom::ElementData;

/// Offsets at or beyond this many pixels left/up count as off screen
const OFFSCREEN_PX: f32 = -1000.0;

/// Inherited visibility flags of an element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityState {
    pub hidden_attr: bool,
    pub aria_hidden: bool,
    pub display_none: bool,
    pub visibility_hidden: bool,
    pub small_height: bool,
    pub small_font: bool,
    pub offscreen: bool,
}

impl VisibilityState {
    /// Derive an element's flags from its parent's and its own style
    pub fn compute(
        parent: &VisibilityState,
        elem: &ElementData,
        style: &SpecifiedStyle,
        font_size: f32,
    ) -> Self {
        let mut state = *parent;

        // Image map areas render through their image, not their map
        if elem.tag() == "area" {
            state.hidden_attr = false;
            state.display_none = false;
        } else {
            if elem.has_attr("hidden") {
                state.hidden_attr = true;
            }
            if keyword(style, PropertyId::Display).as_deref() == Some("none") {
                state.display_none = true;
            }
        }

        if elem
            .get_attr_trimmed("aria-hidden")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            state.aria_hidden = true;
        }

        // visibility inherits but a descendant may opt back in
        match keyword(style, PropertyId::Visibility).as_deref() {
            Some("hidden") | Some("collapse") => state.visibility_hidden = true,
            Some("visible") => state.visibility_hidden = false,
            _ => {}
        }

        let overflow_hidden = keyword(style, PropertyId::Overflow)
            .is_some_and(|v| v.split_whitespace().any(|t| t == "hidden" || t == "clip"));
        let height = style
            .get(PropertyId::Height)
            .and_then(|v| parse_length_px(v, font_size));
        if overflow_hidden && height.is_some_and(|h| h <= 1.0) {
            state.small_height = true;
        }

        state.small_font = font_size <= 1.0;

        if is_offscreen(style, font_size) {
            state.offscreen = true;
        }

        state
    }

    /// Part of the accessibility tree
    pub fn is_visible_to_at(&self) -> bool {
        !(self.hidden_attr || self.display_none || self.visibility_hidden || self.aria_hidden)
    }

    /// Rendered in a way a sighted user can perceive
    pub fn is_visible_onscreen(&self) -> bool {
        !(self.hidden_attr
            || self.display_none
            || self.visibility_hidden
            || self.small_height
            || self.small_font
            || self.offscreen)
    }
}

fn keyword(style: &SpecifiedStyle, property: PropertyId) -> Option<String> {
    style.get(property).map(|v| v.trim().to_ascii_lowercase())
}

fn is_offscreen(style: &SpecifiedStyle, font_size: f32) -> bool {
    let positioned = matches!(
        keyword(style, PropertyId::Position).as_deref(),
        Some("absolute") | Some("fixed")
    );
    if positioned {
        let far = |p: PropertyId| {
            style
                .get(p)
                .and_then(|v| parse_length_px(v, font_size))
                .is_some_and(|px| px <= OFFSCREEN_PX)
        };
        if far(PropertyId::Left) || far(PropertyId::Top) {
            return true;
        }
    }

    // clip: rect(0 0 0 0) and rect(1px, 1px, 1px, 1px) hide content
    if let Some(clip) = keyword(style, PropertyId::Clip) {
        if let Some(inner) = clip.strip_prefix("rect(").and_then(|s| s.strip_suffix(')')) {
            let edges: Vec<f32> = inner
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .filter_map(|t| parse_length_px(t, font_size))
                .collect();
            if edges.len() == 4 && edges.iter().all(|e| *e <= 1.0) {
                return true;
            }
        }
    }
    false
}
