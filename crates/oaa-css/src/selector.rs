//! Selector subset
//!
//! Type, universal, `#id`, `.class`, `[attr]`, `[attr=value]` compounds joined
//! by descendant or child combinators. Selectors using anything else parse
//! into an unmatchable selector so they never apply styles by accident.

use oaa_dom::{DomTree, ElementData, NodeId};

/// Selector specificity (ids, classes/attributes, types)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity(pub u32, pub u32, pub u32);

#[derive(Debug, Clone, PartialEq)]
enum Simple {
    Type(String),
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    parts: Vec<Simple>,
}

impl Compound {
    fn matches(&self, elem: &ElementData) -> bool {
        self.parts.iter().all(|part| match part {
            Simple::Type(tag) => elem.tag() == tag,
            Simple::Id(id) => elem.id.as_deref() == Some(id.as_str()),
            Simple::Class(class) => elem.has_class(class),
            Simple::Attr { name, value } => match (elem.get_attr(name), value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            },
        })
    }
}

/// Parsed complex selector
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub text: String,
    pub specificity: Specificity,
    /// Compounds right-to-left, each with the combinator to its left
    compounds: Vec<(Compound, Option<Combinator>)>,
    supported: bool,
}

impl Selector {
    /// Parse a single complex selector
    pub fn parse(text: &str) -> Self {
        let text = text.trim().to_string();
        match parse_compounds(&text) {
            Some(mut compounds) => {
                let specificity = specificity_of(&compounds);
                compounds.reverse();
                Self { text, specificity, compounds, supported: true }
            }
            None => Self {
                text,
                specificity: Specificity::default(),
                compounds: Vec::new(),
                supported: false,
            },
        }
    }

    /// Parse a comma separated selector list
    pub fn parse_list(text: &str) -> Vec<Self> {
        text.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Whether the selector uses only the supported subset
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Check if the selector matches an element
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.supported && !self.compounds.is_empty() && self.matches_from(tree, node, 0)
    }

    fn matches_from(&self, tree: &DomTree, node: NodeId, index: usize) -> bool {
        let Some((compound, combinator)) = self.compounds.get(index) else {
            return true;
        };
        let Some(elem) = tree.element(node) else {
            return false;
        };
        if !compound.matches(elem) {
            return false;
        }

        match combinator {
            None => true,
            Some(Combinator::Child) => tree
                .parent(node)
                .is_some_and(|parent| self.matches_from(tree, parent, index + 1)),
            Some(Combinator::Descendant) => tree
                .ancestors(node)
                .any(|ancestor| self.matches_from(tree, ancestor, index + 1)),
        }
    }
}

/// Left-to-right compounds, each paired with the combinator preceding it
fn parse_compounds(text: &str) -> Option<Vec<(Compound, Option<Combinator>)>> {
    let mut result = Vec::new();
    let mut pending: Option<Combinator> = None;

    let spaced = text.replace('>', " > ");
    for token in spaced.split_whitespace() {
        if token == ">" {
            if result.is_empty() || pending == Some(Combinator::Child) {
                return None;
            }
            pending = Some(Combinator::Child);
            continue;
        }
        let compound = parse_compound(token)?;
        let combinator = if result.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        result.push((compound, combinator));
    }

    if result.is_empty() || pending.is_some() {
        return None;
    }
    Some(result)
}

fn parse_compound(token: &str) -> Option<Compound> {
    let mut parts = Vec::new();
    let mut rest = token;

    let ident_len = |s: &str| {
        s.find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(s.len())
    };

    // Leading type or universal selector
    if let Some(after) = rest.strip_prefix('*') {
        rest = after;
    } else {
        let len = ident_len(rest);
        if len > 0 {
            parts.push(Simple::Type(rest[..len].to_ascii_lowercase()));
            rest = &rest[len..];
        }
    }

    while !rest.is_empty() {
        let mut chars = rest.chars();
        let Some(marker) = chars.next() else {
            break;
        };
        let body = chars.as_str();
        match marker {
            '#' | '.' => {
                let len = ident_len(body);
                if len == 0 {
                    return None;
                }
                let name = body[..len].to_string();
                parts.push(if marker == '#' { Simple::Id(name) } else { Simple::Class(name) });
                rest = &body[len..];
            }
            '[' => {
                let end = body.find(']')?;
                let inner = &body[..end];
                let attr = match inner.split_once('=') {
                    Some((name, value)) => {
                        // Only exact matching; ~=, |=, ^= etc. are unsupported
                        if name.ends_with(['~', '|', '^', '$', '*']) {
                            return None;
                        }
                        Simple::Attr {
                            name: name.trim().to_ascii_lowercase(),
                            value: Some(value.trim().trim_matches(['"', '\'']).to_string()),
                        }
                    }
                    None => Simple::Attr { name: inner.trim().to_ascii_lowercase(), value: None },
                };
                parts.push(attr);
                rest = &body[end + 1..];
            }
            _ => return None,
        }
    }

    Some(Compound { parts })
}

fn specificity_of(compounds: &[(Compound, Option<Combinator>)]) -> Specificity {
    let mut spec = Specificity::default();
    for (compound, _) in compounds {
        for part in &compound.parts {
            match part {
                Simple::Id(_) => spec.0 += 1,
                Simple::Class(_) | Simple::Attr { .. } => spec.1 += 1,
                Simple::Type(_) => spec.2 += 1,
            }
        }
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let mut nav = ElementData::new("nav");
        nav.set_attr("id", "menu".into());
        let nav = tree.create_element_with(nav);
        let ul = tree.create_element("ul");
        let mut a = ElementData::new("a");
        a.set_attr("class", "skip current".into());
        a.set_attr("href", "#main".into());
        let a = tree.create_element_with(a);
        tree.append_child(tree.root(), nav);
        tree.append_child(nav, ul);
        tree.append_child(ul, a);
        (tree, nav, ul, a)
    }

    #[test]
    fn test_simple_selectors() {
        let (tree, nav, _, a) = tree();
        assert!(Selector::parse("a").matches(&tree, a));
        assert!(Selector::parse("*").matches(&tree, nav));
        assert!(Selector::parse("#menu").matches(&tree, nav));
        assert!(Selector::parse("a.skip.current").matches(&tree, a));
        assert!(Selector::parse("a[href]").matches(&tree, a));
        assert!(Selector::parse("a[href=\"#main\"]").matches(&tree, a));
        assert!(!Selector::parse("a[href=\"#other\"]").matches(&tree, a));
        assert!(!Selector::parse("p").matches(&tree, a));
    }

    #[test]
    fn test_combinators() {
        let (tree, _, ul, a) = tree();
        assert!(Selector::parse("nav a").matches(&tree, a));
        assert!(Selector::parse("#menu ul > a").matches(&tree, a));
        assert!(Selector::parse("ul>a").matches(&tree, a));
        assert!(!Selector::parse("nav > a").matches(&tree, a));
        assert!(!Selector::parse("a ul").matches(&tree, ul));
    }

    #[test]
    fn test_unsupported_never_matches() {
        let (tree, _, _, a) = tree();
        let sel = Selector::parse("a:hover");
        assert!(!sel.is_supported());
        assert!(!sel.matches(&tree, a));
        assert!(!Selector::parse("ul + a").matches(&tree, a));
        assert!(!Selector::parse("a[href^=\"#\"]").matches(&tree, a));
    }

    #[test]
    fn test_specificity() {
        assert_eq!(Selector::parse("#menu ul > a.skip").specificity, Specificity(1, 1, 2));
        assert!(Selector::parse("#x").specificity > Selector::parse(".a.b.c").specificity);
        assert_eq!(Selector::parse_list("a, .b , ").len(), 2);
    }
}
