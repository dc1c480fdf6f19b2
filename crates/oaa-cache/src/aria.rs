//! ARIA Support
//!
//! Role taxonomy, implicit (native) roles and the per-element allowed-role
//! table used to resolve an element's effective role.

use oaa_dom::{DomTree, ElementData, NodeId};

/// Category of an ARIA role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleType {
    Landmark,
    Widget,
    Composite,
    Structure,
    Live,
    Window,
    Abstract,
}

impl RoleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landmark => "landmark",
            Self::Widget => "widget",
            Self::Composite => "composite",
            Self::Structure => "structure",
            Self::Live => "live",
            Self::Window => "window",
            Self::Abstract => "abstract",
        }
    }
}

const ROLES: &[(&str, RoleType)] = &[
    // Landmarks
    ("banner", RoleType::Landmark),
    ("complementary", RoleType::Landmark),
    ("contentinfo", RoleType::Landmark),
    ("form", RoleType::Landmark),
    ("main", RoleType::Landmark),
    ("navigation", RoleType::Landmark),
    ("region", RoleType::Landmark),
    ("search", RoleType::Landmark),
    // Widgets
    ("button", RoleType::Widget),
    ("checkbox", RoleType::Widget),
    ("gridcell", RoleType::Widget),
    ("link", RoleType::Widget),
    ("menuitem", RoleType::Widget),
    ("menuitemcheckbox", RoleType::Widget),
    ("menuitemradio", RoleType::Widget),
    ("option", RoleType::Widget),
    ("progressbar", RoleType::Widget),
    ("radio", RoleType::Widget),
    ("scrollbar", RoleType::Widget),
    ("searchbox", RoleType::Widget),
    ("slider", RoleType::Widget),
    ("spinbutton", RoleType::Widget),
    ("switch", RoleType::Widget),
    ("tab", RoleType::Widget),
    ("tabpanel", RoleType::Widget),
    ("textbox", RoleType::Widget),
    ("treeitem", RoleType::Widget),
    // Composite widgets
    ("combobox", RoleType::Composite),
    ("grid", RoleType::Composite),
    ("listbox", RoleType::Composite),
    ("menu", RoleType::Composite),
    ("menubar", RoleType::Composite),
    ("radiogroup", RoleType::Composite),
    ("tablist", RoleType::Composite),
    ("tree", RoleType::Composite),
    ("treegrid", RoleType::Composite),
    // Document structure
    ("application", RoleType::Structure),
    ("article", RoleType::Structure),
    ("cell", RoleType::Structure),
    ("columnheader", RoleType::Structure),
    ("definition", RoleType::Structure),
    ("directory", RoleType::Structure),
    ("document", RoleType::Structure),
    ("feed", RoleType::Structure),
    ("figure", RoleType::Structure),
    ("group", RoleType::Structure),
    ("heading", RoleType::Structure),
    ("img", RoleType::Structure),
    ("list", RoleType::Structure),
    ("listitem", RoleType::Structure),
    ("math", RoleType::Structure),
    ("none", RoleType::Structure),
    ("note", RoleType::Structure),
    ("presentation", RoleType::Structure),
    ("row", RoleType::Structure),
    ("rowgroup", RoleType::Structure),
    ("rowheader", RoleType::Structure),
    ("separator", RoleType::Structure),
    ("table", RoleType::Structure),
    ("term", RoleType::Structure),
    ("toolbar", RoleType::Structure),
    ("tooltip", RoleType::Structure),
    // Live regions
    ("alert", RoleType::Live),
    ("log", RoleType::Live),
    ("marquee", RoleType::Live),
    ("status", RoleType::Live),
    ("timer", RoleType::Live),
    // Windows
    ("alertdialog", RoleType::Window),
    ("dialog", RoleType::Window),
    // Abstract roles must never be authored
    ("command", RoleType::Abstract),
    ("composite", RoleType::Abstract),
    ("input", RoleType::Abstract),
    ("landmark", RoleType::Abstract),
    ("range", RoleType::Abstract),
    ("roletype", RoleType::Abstract),
    ("section", RoleType::Abstract),
    ("sectionhead", RoleType::Abstract),
    ("select", RoleType::Abstract),
    ("structure", RoleType::Abstract),
    ("widget", RoleType::Abstract),
    ("window", RoleType::Abstract),
];

/// Roles whose accessible name may be computed from content
const NAME_FROM_CONTENT: &[&str] = &[
    "button",
    "cell",
    "checkbox",
    "columnheader",
    "gridcell",
    "heading",
    "link",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "option",
    "radio",
    "row",
    "rowheader",
    "switch",
    "tab",
    "tooltip",
    "treeitem",
];

/// Look up a role name (case-insensitive), returning the canonical
/// static name and its category
pub fn lookup_role(name: &str) -> Option<(&'static str, RoleType)> {
    let name = name.trim().to_ascii_lowercase();
    ROLES.iter().find(|(n, _)| *n == name).copied()
}

/// Category of a known role name
pub fn role_type(role: &str) -> Option<RoleType> {
    lookup_role(role).map(|(_, t)| t)
}

pub fn is_landmark_role(role: &str) -> bool {
    role_type(role) == Some(RoleType::Landmark)
}

/// Widget or composite widget
pub fn is_widget_role(role: &str) -> bool {
    matches!(role_type(role), Some(RoleType::Widget | RoleType::Composite))
}

pub fn is_live_role(role: &str) -> bool {
    role_type(role) == Some(RoleType::Live)
}

pub fn allows_name_from_content(role: &str) -> bool {
    NAME_FROM_CONTENT.contains(&role)
}

/// Where the effective role came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleSource {
    Explicit,
    Implicit,
    #[default]
    None,
}

/// Effective role of an element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRole {
    pub role: Option<&'static str>,
    pub source: RoleSource,
    /// Authored `role` value (trimmed), if any
    pub authored: Option<String>,
    /// Authored value is unknown or abstract
    pub invalid_role: bool,
    /// Authored value is a real role the host element may not take
    pub disallowed_role: bool,
}

impl ResolvedRole {
    pub fn name(&self) -> &'static str {
        self.role.unwrap_or("")
    }

    pub fn role_type(&self) -> Option<RoleType> {
        self.role.and_then(role_type)
    }

    pub fn is_widget(&self) -> bool {
        self.role.is_some_and(is_widget_role)
    }

    pub fn is_landmark(&self) -> bool {
        self.role.is_some_and(is_landmark_role)
    }

    pub fn is_presentational(&self) -> bool {
        matches!(self.role, Some("none" | "presentation"))
    }
}

/// Roles permitted on a host element
enum Allowed {
    Any,
    NoRole,
    Only(&'static [&'static str]),
}

const PRESENTATIONAL: &[&str] = &["none", "presentation"];

fn allowed_roles(elem: &ElementData) -> Allowed {
    let tag = elem.tag();
    match tag {
        "div" | "span" | "b" | "i" | "u" | "em" | "strong" | "small" | "code" | "pre" | "p"
        | "blockquote" | "abbr" | "cite" | "q" | "sub" | "sup" | "mark" | "s" | "samp"
        | "kbd" | "var" | "time" | "bdi" | "bdo" | "del" | "ins" | "dfn" | "figure"
        | "figcaption" | "caption" | "dl" | "dt" | "dd" | "center" | "font" => Allowed::Any,
        "main" | "select" | "textarea" | "option" | "progress" | "meter" | "label"
        | "legend" | "html" | "body" | "head" | "title" | "optgroup" | "datalist"
        | "audio" | "map" | "track" | "source" | "param" => Allowed::NoRole,
        "a" | "area" => {
            if elem.has_attr("href") {
                Allowed::Only(&[
                    "button",
                    "checkbox",
                    "menuitem",
                    "menuitemcheckbox",
                    "menuitemradio",
                    "option",
                    "radio",
                    "switch",
                    "tab",
                    "treeitem",
                ])
            } else {
                Allowed::Any
            }
        }
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Allowed::Only(&["none", "presentation", "tab"]),
        "nav" => Allowed::Only(&["menu", "menubar", "tablist", "none", "presentation"]),
        "ul" | "ol" => Allowed::Only(&[
            "directory",
            "group",
            "listbox",
            "menu",
            "menubar",
            "none",
            "presentation",
            "radiogroup",
            "tablist",
            "toolbar",
            "tree",
        ]),
        "li" => Allowed::Only(&[
            "menuitem",
            "menuitemcheckbox",
            "menuitemradio",
            "option",
            "none",
            "presentation",
            "radio",
            "separator",
            "tab",
            "treeitem",
        ]),
        "button" => Allowed::Only(&[
            "checkbox",
            "link",
            "menuitem",
            "menuitemcheckbox",
            "menuitemradio",
            "option",
            "radio",
            "switch",
            "tab",
        ]),
        "img" => {
            if elem.get_attr("alt") == Some("") {
                Allowed::Only(PRESENTATIONAL)
            } else {
                Allowed::Any
            }
        }
        "input" => match input_type(elem).as_str() {
            "button" => Allowed::Only(&[
                "link",
                "menuitem",
                "menuitemcheckbox",
                "menuitemradio",
                "option",
                "radio",
                "switch",
                "tab",
            ]),
            "checkbox" => Allowed::Only(&["button", "menuitemcheckbox", "option", "switch"]),
            "image" => Allowed::Only(&[
                "link",
                "menuitem",
                "menuitemcheckbox",
                "menuitemradio",
                "radio",
                "switch",
            ]),
            "radio" => Allowed::Only(&["menuitemradio"]),
            "text" | "tel" | "url" | "search" => Allowed::Only(&["combobox", "searchbox", "spinbutton"]),
            _ => Allowed::NoRole,
        },
        "header" | "footer" => Allowed::Only(&["group", "none", "presentation"]),
        "section" => Allowed::Only(&[
            "alert",
            "alertdialog",
            "application",
            "banner",
            "complementary",
            "contentinfo",
            "dialog",
            "document",
            "feed",
            "log",
            "main",
            "marquee",
            "navigation",
            "none",
            "note",
            "presentation",
            "search",
            "status",
            "tabpanel",
        ]),
        "article" => Allowed::Only(&[
            "application",
            "document",
            "feed",
            "main",
            "none",
            "presentation",
            "region",
        ]),
        "aside" => Allowed::Only(&["feed", "none", "note", "presentation", "region", "search"]),
        _ => Allowed::Any,
    }
}

/// Lowercased `type` of an input element, defaulting to `text`
pub fn input_type(elem: &ElementData) -> String {
    elem.get_attr_trimmed("type")
        .map(|t| t.to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "text".to_string())
}

fn has_ancestor(tree: &DomTree, node: NodeId, tags: &[&str]) -> bool {
    tree.ancestors(node)
        .filter_map(|a| tree.tag_name(a))
        .any(|t| tags.contains(&t))
}

/// Native role of an element as mapped by ARIA in HTML
pub fn implicit_role(tree: &DomTree, node: NodeId, elem: &ElementData) -> Option<&'static str> {
    let role = match elem.tag() {
        "a" | "area" => {
            if elem.has_attr("href") {
                "link"
            } else {
                return None;
            }
        }
        "article" => "article",
        "aside" => "complementary",
        "body" => "document",
        "button" => "button",
        "datalist" => "listbox",
        "dd" => "definition",
        "details" => "group",
        "dialog" => "dialog",
        "dl" | "ol" | "ul" | "menu" => "list",
        "dt" => "term",
        "fieldset" => "group",
        "figure" => "figure",
        "footer" => {
            if has_ancestor(tree, node, &["article", "aside", "main", "nav", "section"]) {
                return None;
            }
            "contentinfo"
        }
        "form" => "form",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        "header" => {
            if has_ancestor(tree, node, &["article", "aside", "main", "nav", "section"]) {
                return None;
            }
            "banner"
        }
        "hr" => "separator",
        "img" => {
            if elem.get_attr("alt") == Some("") {
                "presentation"
            } else {
                "img"
            }
        }
        "input" => match input_type(elem).as_str() {
            "button" | "image" | "reset" | "submit" => "button",
            "checkbox" => "checkbox",
            "email" | "tel" | "text" | "url" => {
                if elem.has_attr("list") {
                    "combobox"
                } else {
                    "textbox"
                }
            }
            "number" => "spinbutton",
            "radio" => "radio",
            "range" => "slider",
            "search" => {
                if elem.has_attr("list") {
                    "combobox"
                } else {
                    "searchbox"
                }
            }
            _ => return None,
        },
        "li" => "listitem",
        "main" => "main",
        "math" => "math",
        "nav" => "navigation",
        "option" => "option",
        "output" => "status",
        "progress" => "progressbar",
        "section" => {
            let named = elem.get_attr_trimmed("aria-label").is_some_and(|v| !v.is_empty())
                || elem.get_attr_trimmed("aria-labelledby").is_some_and(|v| !v.is_empty())
                || elem.get_attr_trimmed("title").is_some_and(|v| !v.is_empty());
            if named {
                "region"
            } else {
                return None;
            }
        }
        "select" => {
            let size = elem
                .get_attr_trimmed("size")
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(0);
            if elem.has_attr("multiple") || size > 1 {
                "listbox"
            } else {
                "combobox"
            }
        }
        "table" => "table",
        "tbody" | "thead" | "tfoot" => "rowgroup",
        "td" => "cell",
        "textarea" => "textbox",
        "th" => match elem.get_attr_trimmed("scope").map(|s| s.to_ascii_lowercase()) {
            Some(s) if s == "row" || s == "rowgroup" => "rowheader",
            _ => "columnheader",
        },
        "tr" => "row",
        _ => return None,
    };
    Some(role)
}

/// Resolve the effective role: a valid, allowed explicit role wins,
/// otherwise the implicit role applies
pub fn resolve_role(tree: &DomTree, node: NodeId, elem: &ElementData) -> ResolvedRole {
    let implicit = implicit_role(tree, node, elem);
    let fallback = |authored: Option<String>, invalid_role: bool, disallowed_role: bool| {
        ResolvedRole {
            role: implicit,
            source: if implicit.is_some() {
                RoleSource::Implicit
            } else {
                RoleSource::None
            },
            authored,
            invalid_role,
            disallowed_role,
        }
    };

    let Some(authored) = elem.get_attr_trimmed("role").filter(|r| !r.is_empty()) else {
        return fallback(None, false, false);
    };

    // The first recognised token of a space separated list applies
    let first = authored.split_whitespace().next().unwrap_or("");
    let Some((name, kind)) = lookup_role(first) else {
        return fallback(Some(authored.to_string()), true, false);
    };
    if kind == RoleType::Abstract {
        return fallback(Some(authored.to_string()), true, false);
    }

    let allowed = match allowed_roles(elem) {
        Allowed::Any => true,
        Allowed::NoRole => false,
        Allowed::Only(list) => list.contains(&name),
    };
    if !allowed {
        return fallback(Some(authored.to_string()), false, true);
    }

    ResolvedRole {
        role: Some(name),
        source: RoleSource::Explicit,
        authored: Some(authored.to_string()),
        invalid_role: false,
        disallowed_role: false,
    }
}
