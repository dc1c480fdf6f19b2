//! Accessible Name and Description
//!
//! Name computation in precedence order: `aria-labelledby`, `aria-label`,
//! the host language's native source, name from content (for roles that
//! allow it), and finally `title`. The source that supplied the name is
//! recorded alongside it.

use std::collections::HashMap;

use oaa_dom::{DomTree, ElementData, NodeData, NodeId, normalize_space};

use crate::aria::{allows_name_from_content, input_type};

/// Where an accessible name came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameSource {
    #[default]
    None,
    AriaLabelledby,
    AriaLabel,
    Label,
    Alt,
    Value,
    DefaultValue,
    Placeholder,
    Legend,
    Caption,
    Figcaption,
    SvgTitle,
    Contents,
    Title,
}

impl NameSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::AriaLabelledby => "aria-labelledby",
            Self::AriaLabel => "aria-label",
            Self::Label => "label",
            Self::Alt => "alt",
            Self::Value => "value",
            Self::DefaultValue => "default value",
            Self::Placeholder => "placeholder",
            Self::Legend => "legend",
            Self::Caption => "caption",
            Self::Figcaption => "figcaption",
            Self::SvgTitle => "title element",
            Self::Contents => "contents",
            Self::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessibleName {
    pub name: String,
    pub source: NameSource,
}

impl AccessibleName {
    fn new(name: String, source: NameSource) -> Option<Self> {
        let name = normalize_space(&name);
        if name.is_empty() {
            None
        } else {
            Some(Self { name, source })
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Lookups the name computation needs beyond the element itself
pub struct NameContext<'a> {
    pub tree: &'a DomTree,
    /// First element carrying each id
    pub ids: &'a HashMap<String, NodeId>,
    /// `label[for]` elements keyed by the id they point at
    pub labels_for: &'a HashMap<String, Vec<NodeId>>,
    /// Per node index: hidden from assistive technology
    pub hidden: &'a [bool],
}

impl NameContext<'_> {
    fn is_hidden(&self, node: NodeId) -> bool {
        self.hidden.get(node.index()).copied().unwrap_or(false)
    }

    /// Text of a subtree as assistive technology would announce it
    pub fn text_contents(&self, node: NodeId) -> String {
        self.contents(node, false)
    }

    /// Referenced subtrees contribute text even when hidden
    fn contents(&self, node: NodeId, include_hidden: bool) -> String {
        let tree = self.tree;
        let mut parts: Vec<String> = Vec::new();
        let mut stack: Vec<NodeId> = tree.children(node).map(|(id, _)| id).collect();
        stack.reverse();

        while let Some(id) = stack.pop() {
            let Some(n) = tree.get(id) else { continue };
            match &n.data {
                NodeData::Text(t) => parts.push(t.content.clone()),
                NodeData::Element(e) => {
                    if self.skip_in_contents(id, e, include_hidden) {
                        continue;
                    }
                    if let Some(label) = e.get_attr_trimmed("aria-label").filter(|l| !l.is_empty()) {
                        parts.push(label.to_string());
                        continue;
                    }
                    if matches!(e.tag(), "img" | "area") {
                        if let Some(alt) = e.get_attr("alt") {
                            parts.push(alt.to_string());
                        }
                        continue;
                    }
                    if e.tag() == "input" && input_type(e) == "image" {
                        if let Some(alt) = e.get_attr("alt") {
                            parts.push(alt.to_string());
                        }
                        continue;
                    }
                    let start = stack.len();
                    stack.extend(tree.children(id).map(|(c, _)| c));
                    stack[start..].reverse();
                }
                _ => {}
            }
        }

        normalize_space(&parts.join(" "))
    }

    fn skip_in_contents(&self, id: NodeId, e: &ElementData, include_hidden: bool) -> bool {
        if matches!(e.tag(), "script" | "style" | "template" | "noscript" | "select" | "textarea") {
            return true;
        }
        if include_hidden {
            return false;
        }
        e.has_attr("hidden")
            || e.get_attr_trimmed("aria-hidden")
                .is_some_and(|v| v.eq_ignore_ascii_case("true"))
            || self.is_hidden(id)
    }

    /// Names of the elements referenced by an id list, space separated
    fn idrefs_text(&self, idrefs: &str) -> String {
        idrefs
            .split_whitespace()
            .filter_map(|id| self.ids.get(id).copied())
            .map(|node| {
                self.tree
                    .element(node)
                    .and_then(|e| e.get_attr_trimmed("aria-label"))
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| self.contents(node, true))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Ids in an id list that match no element of the document
    pub fn unresolved_ids(&self, idrefs: &str) -> Vec<String> {
        idrefs
            .split_whitespace()
            .filter(|id| !self.ids.contains_key(*id))
            .map(str::to_string)
            .collect()
    }

    fn label_text(&self, elem: &ElementData, ancestor_label: Option<NodeId>) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(id) = elem.id.as_deref() {
            if let Some(labels) = self.labels_for.get(id) {
                parts.extend(labels.iter().map(|l| self.text_contents(*l)));
            }
        }
        if parts.is_empty() {
            if let Some(label) = ancestor_label {
                parts.push(self.text_contents(label));
            }
        }
        let text = normalize_space(&parts.join(" "));
        (!text.is_empty()).then_some(text)
    }

    fn first_child_text(&self, node: NodeId, tag: &str) -> Option<String> {
        self.tree
            .children(node)
            .find(|(_, n)| n.as_element().is_some_and(|e| e.tag() == tag))
            .map(|(id, _)| self.text_contents(id))
    }

    /// Native (host language) name source
    fn native_name(
        &self,
        node: NodeId,
        elem: &ElementData,
        ancestor_label: Option<NodeId>,
    ) -> Option<AccessibleName> {
        let attr = |name: &str| elem.get_attr(name).map(str::to_string);
        let label = || self.label_text(elem, ancestor_label);

        match elem.tag() {
            "input" => {
                let kind = input_type(elem);
                match kind.as_str() {
                    "button" => AccessibleName::new(attr("value")?, NameSource::Value),
                    "submit" | "reset" => attr("value")
                        .and_then(|v| AccessibleName::new(v, NameSource::Value))
                        .or_else(|| {
                            let default = if kind == "submit" { "Submit" } else { "Reset" };
                            AccessibleName::new(default.to_string(), NameSource::DefaultValue)
                        }),
                    "image" => attr("alt")
                        .and_then(|v| AccessibleName::new(v, NameSource::Alt))
                        .or_else(|| AccessibleName::new(attr("value")?, NameSource::Value)),
                    "text" | "email" | "password" | "search" | "tel" | "url" | "number" | "date"
                    | "datetime-local" | "month" | "time" | "week" => label()
                        .and_then(|l| AccessibleName::new(l, NameSource::Label))
                        .or_else(|| AccessibleName::new(attr("placeholder")?, NameSource::Placeholder)),
                    _ => AccessibleName::new(label()?, NameSource::Label),
                }
            }
            "textarea" => label()
                .and_then(|l| AccessibleName::new(l, NameSource::Label))
                .or_else(|| AccessibleName::new(attr("placeholder")?, NameSource::Placeholder)),
            "select" | "meter" | "output" | "progress" => {
                AccessibleName::new(label()?, NameSource::Label)
            }
            "button" | "a" => AccessibleName::new(self.text_contents(node), NameSource::Contents),
            "area" | "img" => AccessibleName::new(attr("alt")?, NameSource::Alt),
            "fieldset" => AccessibleName::new(self.first_child_text(node, "legend")?, NameSource::Legend),
            "iframe" | "frame" => AccessibleName::new(attr("title")?, NameSource::Title),
            "svg" => AccessibleName::new(self.first_child_text(node, "title")?, NameSource::SvgTitle),
            "figure" => {
                AccessibleName::new(self.first_child_text(node, "figcaption")?, NameSource::Figcaption)
            }
            "table" => AccessibleName::new(self.first_child_text(node, "caption")?, NameSource::Caption),
            _ => None,
        }
    }

    /// Compute the accessible name of an element with the given role
    pub fn accessible_name(
        &self,
        node: NodeId,
        elem: &ElementData,
        role: Option<&str>,
        ancestor_label: Option<NodeId>,
    ) -> AccessibleName {
        if let Some(ids) = elem.get_attr_trimmed("aria-labelledby").filter(|v| !v.is_empty()) {
            if let Some(name) = AccessibleName::new(self.idrefs_text(ids), NameSource::AriaLabelledby) {
                return name;
            }
        }
        if let Some(label) = elem.get_attr("aria-label") {
            if let Some(name) = AccessibleName::new(label.to_string(), NameSource::AriaLabel) {
                return name;
            }
        }
        if let Some(name) = self.native_name(node, elem, ancestor_label) {
            return name;
        }
        if role.is_some_and(allows_name_from_content) && !matches!(elem.tag(), "a" | "button") {
            if let Some(name) = AccessibleName::new(self.text_contents(node), NameSource::Contents) {
                return name;
            }
        }
        if let Some(title) = elem.get_attr("title") {
            if let Some(name) = AccessibleName::new(title.to_string(), NameSource::Title) {
                return name;
            }
        }
        AccessibleName::default()
    }

    /// Compute the accessible description; `title` only describes when it
    /// did not already name the element
    pub fn accessible_description(&self, elem: &ElementData, name_source: NameSource) -> String {
        if let Some(ids) = elem.get_attr_trimmed("aria-describedby").filter(|v| !v.is_empty()) {
            let text = normalize_space(&self.idrefs_text(ids));
            if !text.is_empty() {
                return text;
            }
        }
        if name_source != NameSource::Title {
            if let Some(title) = elem.get_attr("title") {
                return normalize_space(title);
            }
        }
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oaa_dom::Document;

    struct Fixture {
        doc: Document,
        ids: HashMap<String, NodeId>,
        labels_for: HashMap<String, Vec<NodeId>>,
        hidden: Vec<bool>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                doc: Document::new("about:blank"),
                ids: HashMap::new(),
                labels_for: HashMap::new(),
                hidden: Vec::new(),
            }
        }

        fn element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
            let mut data = ElementData::new(tag);
            for (k, v) in attrs {
                data.set_attr(k, v.to_string());
            }
            let id = data.id.clone();
            let for_id = if tag == "label" { data.get_attr("for").map(str::to_string) } else { None };
            let tree = self.doc.tree_mut();
            let node = tree.create_element_with(data);
            tree.append_child(parent, node);
            if let Some(id) = id {
                self.ids.entry(id).or_insert(node);
            }
            if let Some(f) = for_id {
                self.labels_for.entry(f).or_default().push(node);
            }
            node
        }

        fn text(&mut self, parent: NodeId, text: &str) {
            let tree = self.doc.tree_mut();
            let node = tree.create_text(text);
            tree.append_child(parent, node);
        }

        fn name(&mut self, node: NodeId, role: Option<&str>, label: Option<NodeId>) -> AccessibleName {
            self.hidden = vec![false; self.doc.tree().len()];
            let ctx = NameContext {
                tree: self.doc.tree(),
                ids: &self.ids,
                labels_for: &self.labels_for,
                hidden: &self.hidden,
            };
            let elem = self.doc.tree().element(node).cloned().unwrap_or_else(|| ElementData::new("div"));
            ctx.accessible_name(node, &elem, role, label)
        }
    }

    #[test]
    fn test_labelledby_wins() {
        let mut f = Fixture::new();
        let body = f.doc.body();
        let heading = f.element(body, "h2", &[("id", "h")]);
        f.text(heading, "Shipping");
        let nav = f.element(body, "nav", &[("aria-labelledby", "h"), ("aria-label", "ignored")]);
        let name = f.name(nav, Some("navigation"), None);
        assert_eq!(name.name, "Shipping");
        assert_eq!(name.source, NameSource::AriaLabelledby);
    }

    #[test]
    fn test_unresolved_ids() {
        let mut f = Fixture::new();
        let body = f.doc.body();
        f.element(body, "h2", &[("id", "h")]);
        let ctx = NameContext {
            tree: f.doc.tree(),
            ids: &f.ids,
            labels_for: &f.labels_for,
            hidden: &f.hidden,
        };
        assert_eq!(ctx.unresolved_ids(" h gone  also-gone "), vec!["gone", "also-gone"]);
        assert!(ctx.unresolved_ids("h").is_empty());
    }

    #[test]
    fn test_label_for_and_placeholder() {
        let mut f = Fixture::new();
        let body = f.doc.body();
        let label = f.element(body, "label", &[("for", "email")]);
        f.text(label, "E-mail");
        let input = f.element(body, "input", &[("id", "email"), ("placeholder", "you@example.com")]);
        let name = f.name(input, Some("textbox"), None);
        assert_eq!(name.name, "E-mail");
        assert_eq!(name.source, NameSource::Label);

        let bare = f.element(body, "input", &[("placeholder", "Search")]);
        assert_eq!(f.name(bare, Some("textbox"), None).source, NameSource::Placeholder);
    }

    #[test]
    fn test_submit_default() {
        let mut f = Fixture::new();
        let body = f.doc.body();
        let input = f.element(body, "input", &[("type", "submit")]);
        let name = f.name(input, Some("button"), None);
        assert_eq!(name.name, "Submit");
        assert_eq!(name.source, NameSource::DefaultValue);
    }

    #[test]
    fn test_link_contents_skip_hidden() {
        let mut f = Fixture::new();
        let body = f.doc.body();
        let a = f.element(body, "a", &[("href", "/x")]);
        f.text(a, "Read");
        let hidden = f.element(a, "span", &[("aria-hidden", "true")]);
        f.text(hidden, "icon");
        f.element(a, "img", &[("alt", "more")]);
        let name = f.name(a, Some("link"), None);
        assert_eq!(name.name, "Read more");
        assert_eq!(name.source, NameSource::Contents);
    }

    #[test]
    fn test_title_last_resort() {
        let mut f = Fixture::new();
        let body = f.doc.body();
        let div = f.element(body, "div", &[("title", "Tip")]);
        let name = f.name(div, None, None);
        assert_eq!(name.source, NameSource::Title);
        assert_eq!(name.name, "Tip");

        let empty = f.element(body, "div", &[]);
        assert!(!f.name(empty, None, None).has_name());
    }
}
