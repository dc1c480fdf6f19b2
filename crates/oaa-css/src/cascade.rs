//! Style Cascade & Resolver
//!
//! Computes the specified styles for DOM elements by:
//! 1. Matching selectors against elements
//! 2. Sorting by importance, origin, specificity and source order
//! 3. Applying the winning declarations

use std::collections::BTreeMap;

use oaa_dom::{Document, DomTree, NodeId};

use crate::{CssParser, Declaration, PropertyId, Selector, Specificity, Stylesheet};

/// User agent defaults that affect text size and weight
const UA_STYLES: &str = "
    h1 { font-size: 2em; font-weight: bold }
    h2 { font-size: 1.5em; font-weight: bold }
    h3 { font-size: 1.17em; font-weight: bold }
    h4 { font-weight: bold }
    h5 { font-size: 0.83em; font-weight: bold }
    h6 { font-size: 0.67em; font-weight: bold }
    th, b, strong { font-weight: bold }
    small { font-size: smaller }
    big { font-size: larger }
";

/// Cascade origin, lowest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Origin {
    UserAgent,
    Author,
    Inline,
}

#[derive(Debug, Clone)]
struct IndexedRule {
    selector: Selector,
    declarations: Vec<Declaration>,
    origin: Origin,
    order: usize,
}

/// Specified (cascaded, not inherited) values for one element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecifiedStyle {
    values: BTreeMap<PropertyId, String>,
}

impl SpecifiedStyle {
    /// Specified value of a property, if any declaration applied
    pub fn get(&self, property: PropertyId) -> Option<&str> {
        self.values.get(&property).map(String::as_str)
    }

    /// Whether no tracked property was specified
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Set a value directly
    pub fn set(&mut self, property: PropertyId, value: impl Into<String>) {
        self.values.insert(property, value.into());
    }
}

/// Style resolver - computes specified styles for DOM elements
#[derive(Debug, Clone)]
pub struct StyleResolver {
    rules: Vec<IndexedRule>,
    parser: CssParser,
}

impl StyleResolver {
    /// Resolver with only the user agent defaults
    pub fn new() -> Self {
        let mut resolver = Self {
            rules: Vec::new(),
            parser: CssParser::new(),
        };
        match resolver.parser.parse(UA_STYLES) {
            Ok(sheet) => resolver.push_sheet(sheet, Origin::UserAgent),
            Err(e) => tracing::warn!("user agent styles failed to parse: {}", e),
        }
        resolver
    }

    /// Resolver seeded with every screen `<style>` element of a document
    pub fn from_document(document: &Document) -> Self {
        let mut resolver = Self::new();
        let tree = document.tree();

        for (id, node) in tree.descendants(tree.root()) {
            let Some(elem) = node.as_element() else {
                continue;
            };
            if elem.tag() != "style" {
                continue;
            }
            let media = elem.get_attr("media").unwrap_or("").to_ascii_lowercase();
            if !(media.trim().is_empty() || media.contains("screen") || media.contains("all")) {
                continue;
            }

            match resolver.parser.parse(&tree.text_content(id)) {
                Ok(sheet) => resolver.add_stylesheet(sheet),
                Err(e) => tracing::warn!("ignoring unparseable stylesheet: {}", e),
            }
        }

        tracing::debug!(rules = resolver.rules.len(), "style resolver ready");
        resolver
    }

    /// Add an author stylesheet after those already present
    pub fn add_stylesheet(&mut self, stylesheet: Stylesheet) {
        self.push_sheet(stylesheet, Origin::Author);
    }

    fn push_sheet(&mut self, stylesheet: Stylesheet, origin: Origin) {
        for rule in stylesheet.rules {
            for selector in rule.selectors {
                let order = self.rules.len();
                self.rules.push(IndexedRule {
                    selector,
                    declarations: rule.declarations.clone(),
                    origin,
                    order,
                });
            }
        }
    }

    /// Compute the specified style of an element
    pub fn specified_style(&self, tree: &DomTree, node: NodeId) -> SpecifiedStyle {
        let mut style = SpecifiedStyle::default();
        let Some(elem) = tree.element(node) else {
            return style;
        };

        let mut matches: Vec<(bool, Origin, Specificity, usize, &Declaration)> = Vec::new();
        for rule in &self.rules {
            if rule.selector.matches(tree, node) {
                for decl in &rule.declarations {
                    matches.push((decl.important, rule.origin, rule.selector.specificity, rule.order, decl));
                }
            }
        }

        let inline = match elem.get_attr("style") {
            Some(text) if !text.trim().is_empty() => match self.parser.parse_inline(text) {
                Ok(decls) => decls,
                Err(e) => {
                    tracing::warn!("ignoring unparseable style attribute: {}", e);
                    Vec::new()
                }
            },
            _ => Vec::new(),
        };
        for (i, decl) in inline.iter().enumerate() {
            matches.push((decl.important, Origin::Inline, Specificity::default(), i, decl));
        }

        matches.sort_by(|a, b| (a.0, a.1, a.2, a.3).cmp(&(b.0, b.1, b.2, b.3)));
        for (_, _, _, _, decl) in matches {
            style.values.insert(decl.property, decl.value.clone());
        }
        style
    }
}

impl Default for StyleResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oaa_dom::ElementData;

    fn element(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut data = ElementData::new(tag);
        for (k, v) in attrs {
            data.set_attr(k, v.to_string());
        }
        let id = tree.create_element_with(data);
        tree.append_child(parent, id);
        id
    }

    #[test]
    fn test_specificity_and_inline_order() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let p = element(&mut tree, root, "p", &[("id", "x"), ("class", "c"), ("style", "color: red")]);

        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(
            CssParser::new()
                .parse("#x { color: blue; font-size: 20px } .c { color: green } p { background-color: white }")
                .unwrap(),
        );

        let style = resolver.specified_style(&tree, p);
        // inline wins over #id, #id wins over class
        assert_eq!(style.get(PropertyId::FontSize), Some("20px"));
        assert!(style.get(PropertyId::BackgroundColor).is_some());
        let color = style.get(PropertyId::Color).unwrap();
        assert!(color == "red" || color == "#f00", "unexpected {color}");
    }

    #[test]
    fn test_important_beats_inline() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = element(&mut tree, root, "div", &[("style", "display: block")]);

        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(CssParser::new().parse("div { display: none !important }").unwrap());
        assert_eq!(resolver.specified_style(&tree, div).get(PropertyId::Display), Some("none"));
    }

    #[test]
    fn test_user_agent_heading_defaults() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let h1 = element(&mut tree, root, "h1", &[]);
        let style = StyleResolver::new().specified_style(&tree, h1);
        assert_eq!(style.get(PropertyId::FontSize), Some("2em"));
        assert!(style.get(PropertyId::FontWeight).is_some());
    }
}
