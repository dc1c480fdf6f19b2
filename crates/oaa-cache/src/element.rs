//! DOM Elements
//!
//! Per-element facts shared by every specialised collection.

use oaa_dom::{ElementData, NodeId};

use crate::accname::AccessibleName;
use crate::aria::{ResolvedRole, input_type};
use crate::color::ColorContrast;
use crate::events::EventInfo;
use crate::visibility::VisibilityState;

/// Index into the cache's element arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementIndex(pub(crate) u32);

impl ElementIndex {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a cached item: which element, which node, which position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRef {
    pub index: ElementIndex,
    pub node: NodeId,
    pub ordinal_position: u32,
}

/// Parsed `tabindex`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabIndex {
    pub has_tabindex: bool,
    /// Parsed value; `None` when absent or malformed
    pub value: Option<i32>,
}

impl TabIndex {
    pub fn parse(elem: &ElementData) -> Self {
        match elem.get_attr("tabindex") {
            Some(v) => Self {
                has_tabindex: true,
                value: v.trim().parse::<i32>().ok(),
            },
            None => Self::default(),
        }
    }

    /// Reachable with the Tab key
    pub fn is_tab_stop(&self, natively_focusable: bool) -> bool {
        match self.value {
            Some(v) => v >= 0,
            None => natively_focusable,
        }
    }
}

/// Natively focusable element (link with href, enabled form control, ...)
pub fn is_interactive(elem: &ElementData) -> bool {
    let disabled = elem.has_attr("disabled");
    match elem.tag() {
        "a" | "area" => elem.has_attr("href"),
        "button" | "select" | "textarea" => !disabled,
        "input" => !disabled && input_type(elem) != "hidden",
        "iframe" | "embed" | "object" | "summary" => true,
        "audio" | "video" => elem.has_attr("controls"),
        _ => elem
            .get_attr_trimmed("contenteditable")
            .is_some_and(|v| v.eq_ignore_ascii_case("true")),
    }
}

/// Cached facts about one element
#[derive(Debug, Clone)]
pub struct DomElement {
    pub node: NodeId,
    pub ordinal_position: u32,
    pub parent: Option<ElementIndex>,
    pub tag_name: String,
    pub id: Option<String>,
    pub class_name: String,
    /// Effective language (own or inherited), empty if none
    pub lang: String,
    /// Element carries its own `lang`
    pub has_lang: bool,
    pub role: ResolvedRole,
    pub tab_index: TabIndex,
    pub is_interactive: bool,
    pub accessible_name: AccessibleName,
    pub accessible_description: String,
    /// `aria-labelledby` ids with no matching element
    pub unresolved_label_ids: Vec<String>,
    /// `aria-describedby` ids with no matching element
    pub unresolved_description_ids: Vec<String>,
    pub visibility: VisibilityState,
    pub color_contrast: ColorContrast,
    pub events: EventInfo,
    /// At least one non-whitespace text child
    pub has_text_content: bool,
    /// `tag[type=..][role=..]#id`
    pub elem_name: String,
}

impl DomElement {
    pub fn is_visible_to_at(&self) -> bool {
        self.visibility.is_visible_to_at()
    }

    pub fn is_visible_onscreen(&self) -> bool {
        self.visibility.is_visible_onscreen()
    }

    /// Focusable by script or keyboard
    pub fn is_focusable(&self) -> bool {
        self.tab_index.has_tabindex || self.is_interactive
    }

    pub fn is_tab_stop(&self) -> bool {
        self.tab_index.is_tab_stop(self.is_interactive)
    }

    pub fn element_ref(&self, index: ElementIndex) -> ElementRef {
        ElementRef {
            index,
            node: self.node,
            ordinal_position: self.ordinal_position,
        }
    }
}

/// Short human-readable element label, e.g. `input[type=text]#name`
pub fn elem_name(elem: &ElementData) -> String {
    let mut name = elem.tag().to_string();
    if elem.tag() == "input" {
        name.push_str(&format!("[type={}]", input_type(elem)));
    }
    if let Some(role) = elem.get_attr_trimmed("role") {
        name.push_str(&format!("[role={role}]"));
    }
    if let Some(id) = elem.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        name.push('#');
        name.push_str(id);
    }
    name
}
