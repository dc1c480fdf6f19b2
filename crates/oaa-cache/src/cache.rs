//! Classification Cache
//!
//! One pass over the document body derives every per-element fact the
//! rules consume. The walk uses an explicit stack carrying the inherited
//! context (visibility, colour, language, enclosing table/landmark/form),
//! so arbitrarily deep documents are handled without recursion.

use std::collections::HashMap;

use oaa_css::StyleResolver;
use oaa_dom::{Document, DomTree, ElementData, NodeData, NodeId, normalize_space};
use url::Url;

use crate::accname::{AccessibleName, NameContext};
use crate::aria::{RoleSource, input_type, resolve_role};
use crate::color::ColorState;
use crate::element::{DomElement, ElementIndex, ElementRef, TabIndex, elem_name, is_interactive};
use crate::entries::{
    CacheEntry, ControlElement, ControlType, ElementEntry, FrameElement, HeadingElement,
    ImageElement, Inspectable, LandmarkElement, LanguageEntry, LinkElement, MediaElement,
    MediaType, TextEntry, TimingElement, TimingKind, TrackInfo,
};
use crate::events::{EventFlags, EventInfo, EventProcessing};
use crate::language::is_valid_language;
use crate::table::TableElement;
use crate::visibility::VisibilityState;

/// Ordinal position reserved for the page pseudo-element
pub const PAGE_ORDINAL: u32 = 1;
/// Ordinal position reserved for the website pseudo-element
pub const WEBSITE_ORDINAL: u32 = 0;

/// Elements that never render content of their own
const SKIPPED_TAGS: &[&str] = &[
    "base", "content", "link", "meta", "noscript", "script", "style", "template", "title",
];

/// Document-level facts
#[derive(Debug, Clone, Default)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
    pub has_title_element: bool,
    pub has_body_element: bool,
    /// `lang` of the root element, trimmed
    pub lang: String,
    pub has_lang: bool,
    pub lang_valid: bool,
    /// First element whose class marks it as a skip-to control
    pub skipto: Option<ElementIndex>,
    /// Content of `meta[http-equiv=refresh]`, if present
    pub meta_refresh: Option<String>,
}

/// Context inherited from the nearest ancestors
#[derive(Debug, Clone, Copy, Default)]
struct ParentInfo {
    parent: Option<ElementIndex>,
    visibility: VisibilityState,
    color: ColorState,
    lang_node: Option<NodeId>,
    landmark: Option<usize>,
    table: Option<usize>,
    in_thead: bool,
    form: Option<ElementIndex>,
    label: Option<NodeId>,
    media: Option<usize>,
    events: EventFlags,
}

/// Per-document classification of every element the rules inspect
#[derive(Debug)]
pub struct ClassificationCache<'a> {
    document: &'a Document,
    event_processing: EventProcessing,
    page: PageInfo,
    elements: Vec<DomElement>,
    node_elements: HashMap<NodeId, ElementIndex>,
    ids: HashMap<String, NodeId>,
    texts: Vec<TextEntry>,
    links: Vec<LinkElement>,
    controls: Vec<ControlElement>,
    widgets: Vec<ControlElement>,
    headings: Vec<HeadingElement>,
    landmarks: Vec<LandmarkElement>,
    tables: Vec<TableElement>,
    frames: Vec<FrameElement>,
    media: Vec<MediaElement>,
    languages: Vec<LanguageEntry>,
    timing: Vec<TimingElement>,
    images: Vec<ImageElement>,
}

impl<'a> ClassificationCache<'a> {
    /// Build the cache for a parsed document
    pub fn build(document: &'a Document, event_processing: EventProcessing) -> Self {
        let tree = document.tree();
        let (ids, labels_for) = index_ids_and_labels(tree);

        let mut cache = Self {
            document,
            event_processing,
            page: page_info(document),
            elements: Vec::new(),
            node_elements: HashMap::new(),
            ids,
            texts: Vec::new(),
            links: Vec::new(),
            controls: Vec::new(),
            widgets: Vec::new(),
            headings: Vec::new(),
            landmarks: Vec::new(),
            tables: Vec::new(),
            frames: Vec::new(),
            media: Vec::new(),
            languages: Vec::new(),
            timing: Vec::new(),
            images: Vec::new(),
        };

        if !cache.page.has_body_element {
            tracing::debug!(url = document.url(), "document has no body; cache left empty");
            return cache;
        }

        let resolver = StyleResolver::from_document(document);
        let mut hidden = vec![false; tree.len()];
        let mut labels = Vec::new();
        cache.walk(&resolver, &mut hidden, &mut labels);
        cache.compute_names(&labels_for, &hidden, &labels);
        cache.finalize_tables(&labels_for, &hidden);

        tracing::debug!(
            elements = cache.elements.len(),
            texts = cache.texts.len(),
            links = cache.links.len(),
            tables = cache.tables.len(),
            "classification cache built"
        );
        cache
    }

    fn walk(&mut self, resolver: &StyleResolver, hidden: &mut [bool], labels: &mut Vec<Option<NodeId>>) {
        let document = self.document;
        let tree = document.tree();
        let base_url = Url::parse(document.url()).ok();

        // The root element seeds colour, visibility and language
        let html = document.document_element();
        let mut root = ParentInfo::default();
        if let Some(elem) = tree.element(html) {
            let style = resolver.specified_style(tree, html);
            root.color = root.color.compute(&style);
            root.visibility = VisibilityState::compute(&root.visibility, elem, &style, root.color.font_size);
            if elem.has_attr("lang") {
                root.lang_node = Some(html);
            }
        }

        let mut ordinal = PAGE_ORDINAL + 1;
        // Set while the last node visited was text; comments leave it untouched
        let mut in_text_run = false;
        let mut stack: Vec<(NodeId, ParentInfo)> = vec![(document.body(), root)];

        while let Some((node, info)) = stack.pop() {
            let Some(n) = tree.get(node) else { continue };
            let elem = match &n.data {
                NodeData::Element(e) => e,
                NodeData::Text(t) => {
                    self.add_text(node, &t.content, info.parent, in_text_run, &mut ordinal);
                    in_text_run = true;
                    continue;
                }
                _ => continue,
            };
            in_text_run = false;

            let tag = elem.tag();
            if SKIPPED_TAGS.contains(&tag) || (tag == "input" && input_type(elem) == "hidden") {
                continue;
            }

            let style = resolver.specified_style(tree, node);
            let color = info.color.compute(&style);
            let visibility = VisibilityState::compute(&info.visibility, elem, &style, color.font_size);
            let role = resolve_role(tree, node, elem);
            let lang_node = if elem.has_attr("lang") { Some(node) } else { info.lang_node };
            let lang = lang_node
                .and_then(|l| tree.element(l))
                .and_then(|e| e.get_attr("lang"))
                .map(|l| l.trim().to_string())
                .unwrap_or_default();
            let own_events = EventFlags::detect(elem, self.event_processing);

            let index = ElementIndex(self.elements.len() as u32);
            let element_ref = ElementRef {
                index,
                node,
                ordinal_position: ordinal,
            };
            ordinal += 1;

            hidden[node.index()] = !visibility.is_visible_to_at();
            labels.push(info.label);

            self.elements.push(DomElement {
                node,
                ordinal_position: element_ref.ordinal_position,
                parent: info.parent,
                tag_name: tag.to_string(),
                id: elem.id.clone(),
                class_name: elem.classes.join(" "),
                lang,
                has_lang: elem.has_attr("lang"),
                role: role.clone(),
                tab_index: TabIndex::parse(elem),
                is_interactive: is_interactive(elem),
                accessible_name: AccessibleName::default(),
                accessible_description: String::new(),
                unresolved_label_ids: Vec::new(),
                unresolved_description_ids: Vec::new(),
                visibility,
                color_contrast: color.contrast(),
                events: EventInfo {
                    own: own_events,
                    ancestor: info.events,
                },
                has_text_content: false,
                elem_name: elem_name(elem),
            });
            self.node_elements.insert(node, index);

            let mut child = ParentInfo {
                parent: Some(index),
                visibility,
                color,
                lang_node,
                events: info.events.union(own_events),
                ..info
            };

            if self.page.skipto.is_none()
                && elem.classes.iter().any(|c| c.to_ascii_lowercase().contains("skipto"))
            {
                self.page.skipto = Some(index);
            }

            self.classify(elem, element_ref, &info, &mut child, base_url.as_ref());

            let start = stack.len();
            stack.extend(tree.children(node).map(|(c, _)| (c, child)));
            stack[start..].reverse();
        }
    }

    fn add_text(
        &mut self,
        node: NodeId,
        content: &str,
        parent: Option<ElementIndex>,
        in_text_run: bool,
        ordinal: &mut u32,
    ) {
        let Some(parent) = parent else { return };
        let text = normalize_space(content);
        if text.is_empty() {
            return;
        }
        if let Some(e) = self.elements.get_mut(parent.index()) {
            e.has_text_content = true;
        }

        // Adjacent text (split only by comments) merges into one entry
        if in_text_run {
            if let Some(last) = self.texts.last_mut().filter(|t| t.parent == parent) {
                last.text.push(' ');
                last.text.push_str(&text);
                return;
            }
        }

        self.texts.push(TextEntry {
            node,
            ordinal_position: *ordinal,
            parent,
            text,
        });
        *ordinal += 1;
    }

    /// Sort an element into the specialised collections and adjust the
    /// context its children inherit
    fn classify(
        &mut self,
        elem: &ElementData,
        element: ElementRef,
        info: &ParentInfo,
        child: &mut ParentInfo,
        base_url: Option<&Url>,
    ) {
        let tag = elem.tag();
        let role = self.elements[element.index.index()].role.clone();

        if (matches!(tag, "a" | "area") && elem.has_attr("href")) || role.role == Some("link") {
            let href = elem.get_attr("href").map(|h| h.trim().to_string());
            let fragment = href
                .as_deref()
                .and_then(|h| h.split_once('#'))
                .map(|(_, f)| f.to_string())
                .filter(|f| !f.is_empty());
            self.links.push(LinkElement { element, href, fragment });
        }

        let control_type = match tag {
            "input" => Some(match input_type(elem).as_str() {
                "button" | "submit" | "reset" => ControlType::Button,
                "checkbox" => ControlType::Checkbox,
                "radio" => ControlType::Radio,
                "range" => ControlType::Range,
                "file" => ControlType::File,
                "image" => ControlType::Image,
                "color" => ControlType::Other,
                _ => ControlType::Text,
            }),
            "button" => Some(ControlType::Button),
            "select" => Some(ControlType::Select),
            "textarea" => Some(ControlType::Textarea),
            "output" => Some(ControlType::Output),
            "meter" => Some(ControlType::Meter),
            "progress" => Some(ControlType::Progress),
            _ => None,
        };
        if control_type.is_some() {
            self.controls.push(ControlElement {
                element,
                control_type,
                is_widget: false,
                form: info.form,
            });
        }
        if role.authored.is_some() {
            self.widgets.push(ControlElement {
                element,
                control_type,
                is_widget: true,
                form: info.form,
            });
        }

        let heading_level = match tag {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ if role.role == Some("heading") => Some(
                elem.get_attr_trimmed("aria-level")
                    .and_then(|l| l.parse::<u8>().ok())
                    .filter(|l| (1..=9).contains(l))
                    .unwrap_or(2),
            ),
            _ => None,
        };
        if let Some(level) = heading_level {
            if role.role == Some("heading") {
                self.headings.push(HeadingElement { element, level });
            }
        }

        if let Some(landmark) = role.role.filter(|_| role.is_landmark()) {
            let unnamed_form = landmark == "form"
                && role.source == RoleSource::Implicit
                && !["aria-label", "aria-labelledby", "title"]
                    .iter()
                    .any(|a| elem.get_attr_trimmed(a).is_some());
            if !unnamed_form {
                child.landmark = Some(self.landmarks.len());
                self.landmarks.push(LandmarkElement {
                    element,
                    landmark,
                    parent_landmark: info.landmark,
                });
            }
        }

        match tag {
            "table" => {
                let explicit = if role.source == RoleSource::Explicit { role.role } else { None };
                child.table = Some(self.tables.len());
                child.in_thead = false;
                self.tables.push(TableElement::new(element, elem, explicit, info.table));
            }
            "thead" => child.in_thead = true,
            "tbody" | "tfoot" => child.in_thead = false,
            "tr" => {
                if let Some(t) = info.table.and_then(|t| self.tables.get_mut(t)) {
                    t.start_row();
                }
            }
            "td" | "th" => {
                if let Some(t) = info.table.and_then(|t| self.tables.get_mut(t)) {
                    t.add_cell(element, elem, role.role, info.in_thead);
                }
            }
            "caption" => {
                if let Some(t) = info.table.and_then(|t| self.tables.get_mut(t)) {
                    t.set_caption(element.index);
                }
            }
            "form" => child.form = Some(element.index),
            "label" => child.label = Some(element.node),
            "iframe" | "frame" => {
                let src = elem.get_attr("src").map(|s| s.trim().to_string()).unwrap_or_default();
                let is_cross_domain = is_cross_domain(base_url, &src);
                self.frames.push(FrameElement {
                    element,
                    src,
                    is_cross_domain,
                });
            }
            "audio" | "video" | "object" | "embed" => {
                let media_type = match tag {
                    "audio" => MediaType::Audio,
                    "video" => MediaType::Video,
                    "object" => MediaType::Object,
                    _ => MediaType::Embed,
                };
                child.media = Some(self.media.len());
                self.media.push(MediaElement {
                    element,
                    media_type,
                    autoplay: elem.has_attr("autoplay"),
                    controls: elem.has_attr("controls"),
                    tracks: Vec::new(),
                });
                if matches!(media_type, MediaType::Object | MediaType::Embed) {
                    self.timing.push(TimingElement {
                        element,
                        kind: TimingKind::Embedded,
                    });
                }
            }
            "track" => {
                if let Some(m) = info.media.and_then(|m| self.media.get_mut(m)) {
                    let attr = |n: &str| elem.get_attr_trimmed(n).unwrap_or("").to_string();
                    m.tracks.push(TrackInfo {
                        kind: elem
                            .get_attr_trimmed("kind")
                            .map(str::to_ascii_lowercase)
                            .unwrap_or_else(|| "subtitles".to_string()),
                        srclang: attr("srclang"),
                        label: attr("label"),
                    });
                }
            }
            "param" => {
                // <param name="autoplay" value="true"> on plugin media
                let is_autoplay = elem
                    .get_attr_trimmed("name")
                    .is_some_and(|n| n.eq_ignore_ascii_case("autoplay") || n.eq_ignore_ascii_case("autostart"));
                let on = elem
                    .get_attr_trimmed("value")
                    .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1");
                if is_autoplay && on {
                    if let Some(m) = info.media.and_then(|m| self.media.get_mut(m)) {
                        m.autoplay = true;
                    }
                }
            }
            "marquee" => self.timing.push(TimingElement {
                element,
                kind: TimingKind::Marquee,
            }),
            "blink" => self.timing.push(TimingElement {
                element,
                kind: TimingKind::Blink,
            }),
            "canvas" => self.timing.push(TimingElement {
                element,
                kind: TimingKind::Canvas,
            }),
            _ => {}
        }

        let is_image = match tag {
            "img" | "area" => true,
            "input" => input_type(elem) == "image",
            _ => role.role == Some("img"),
        };
        if is_image {
            let src = elem.get_attr("src").map(|s| s.trim().to_string()).unwrap_or_default();
            if tag == "img" && src.to_ascii_lowercase().ends_with(".gif") {
                self.timing.push(TimingElement {
                    element,
                    kind: TimingKind::Animation,
                });
            }
            self.images.push(ImageElement {
                element,
                src,
                has_alt: elem.has_attr("alt"),
            });
        }

        if let Some(lang) = elem.get_attr_trimmed("lang") {
            let lang = lang.to_string();
            let is_valid = is_valid_language(&lang);
            self.languages.push(LanguageEntry {
                element,
                lang,
                is_valid,
            });
        }
    }

    fn compute_names(
        &mut self,
        labels_for: &HashMap<String, Vec<NodeId>>,
        hidden: &[bool],
        labels: &[Option<NodeId>],
    ) {
        let tree = self.document.tree();
        let ctx = NameContext {
            tree,
            ids: &self.ids,
            labels_for,
            hidden,
        };
        for (i, element) in self.elements.iter_mut().enumerate() {
            let Some(elem) = tree.element(element.node) else { continue };
            let label = labels.get(i).copied().flatten();
            element.accessible_name = ctx.accessible_name(element.node, elem, element.role.role, label);
            element.accessible_description =
                ctx.accessible_description(elem, element.accessible_name.source);
            let unresolved = |attr: &str| {
                elem.get_attr(attr)
                    .map(|ids| ctx.unresolved_ids(ids))
                    .unwrap_or_default()
            };
            element.unresolved_label_ids = unresolved("aria-labelledby");
            element.unresolved_description_ids = unresolved("aria-describedby");
        }
    }

    fn finalize_tables(&mut self, labels_for: &HashMap<String, Vec<NodeId>>, hidden: &[bool]) {
        let ctx = NameContext {
            tree: self.document.tree(),
            ids: &self.ids,
            labels_for,
            hidden,
        };
        let text_of = |node: NodeId| ctx.text_contents(node);
        let text_of_id = |id: &str| ctx.ids.get(id).map(|n| ctx.text_contents(*n));
        for table in &mut self.tables {
            table.finalize(&text_of, &text_of_id);
        }

        // Only multi-column layout ancestors disturb linearisation
        let parents: Vec<(Option<usize>, bool)> = self
            .tables
            .iter()
            .map(|t| (t.parent_table, !t.table_type.is_data() && t.is_multi_column()))
            .collect();
        for (i, table) in self.tables.iter_mut().enumerate() {
            let mut level = 0;
            let mut steps = 0;
            let mut current = parents[i].0;
            while let Some(p) = current {
                steps += 1;
                if steps > parents.len() {
                    break;
                }
                let Some(&(grandparent, counts)) = parents.get(p) else { break };
                if counts {
                    level += 1;
                }
                current = grandparent;
            }
            table.nesting_level = level;
        }
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn event_processing(&self) -> EventProcessing {
        self.event_processing
    }

    pub fn page(&self) -> &PageInfo {
        &self.page
    }

    pub fn elements(&self) -> &[DomElement] {
        &self.elements
    }

    /// Cached element by arena index
    pub fn element(&self, index: ElementIndex) -> Option<&DomElement> {
        self.elements.get(index.index())
    }

    /// The element an inspectable item belongs to
    pub fn dom_element(&self, item: &impl Inspectable) -> Option<&DomElement> {
        self.element(item.element_index())
    }

    /// Elements paired with their indices, in document order
    pub fn element_entries(&self) -> impl Iterator<Item = ElementEntry<'_>> {
        self.elements.iter().enumerate().map(|(i, element)| ElementEntry {
            index: ElementIndex(i as u32),
            element,
        })
    }

    pub fn element_entry(&self, index: ElementIndex) -> Option<ElementEntry<'_>> {
        self.element(index).map(|element| ElementEntry { index, element })
    }

    pub fn element_for_node(&self, node: NodeId) -> Option<ElementIndex> {
        self.node_elements.get(&node).copied()
    }

    /// First cached element with the given id
    pub fn element_by_id(&self, id: &str) -> Option<ElementIndex> {
        self.ids.get(id).and_then(|n| self.element_for_node(*n))
    }

    /// Attribute of a cached element, read from the document
    pub fn attr(&self, index: ElementIndex, name: &str) -> Option<&'a str> {
        let node = self.element(index)?.node;
        self.document.tree().element(node)?.get_attr(name)
    }

    /// Element data of a cached element
    pub fn element_data(&self, index: ElementIndex) -> Option<&'a ElementData> {
        let node = self.element(index)?.node;
        self.document.tree().element(node)
    }

    pub fn texts(&self) -> &[TextEntry] {
        &self.texts
    }

    pub fn links(&self) -> &[LinkElement] {
        &self.links
    }

    pub fn controls(&self) -> &[ControlElement] {
        &self.controls
    }

    /// Elements carrying an authored `role`
    pub fn widgets(&self) -> &[ControlElement] {
        &self.widgets
    }

    pub fn headings(&self) -> &[HeadingElement] {
        &self.headings
    }

    pub fn landmarks(&self) -> &[LandmarkElement] {
        &self.landmarks
    }

    pub fn tables(&self) -> &[TableElement] {
        &self.tables
    }

    pub fn frames(&self) -> &[FrameElement] {
        &self.frames
    }

    pub fn media(&self) -> &[MediaElement] {
        &self.media
    }

    pub fn languages(&self) -> &[LanguageEntry] {
        &self.languages
    }

    pub fn timing(&self) -> &[TimingElement] {
        &self.timing
    }

    pub fn images(&self) -> &[ImageElement] {
        &self.images
    }

    /// Every cached item, collection by collection
    pub fn entries(&self) -> impl Iterator<Item = CacheEntry<'_>> {
        self.element_entries()
            .map(CacheEntry::Element)
            .chain(self.texts.iter().map(CacheEntry::Text))
            .chain(self.links.iter().map(CacheEntry::Link))
            .chain(self.controls.iter().map(CacheEntry::Control))
            .chain(self.widgets.iter().map(CacheEntry::Control))
            .chain(self.headings.iter().map(CacheEntry::Heading))
            .chain(self.landmarks.iter().map(CacheEntry::Landmark))
            .chain(self.tables.iter().map(CacheEntry::Table))
            .chain(self.frames.iter().map(CacheEntry::Frame))
            .chain(self.media.iter().map(CacheEntry::Media))
            .chain(self.languages.iter().map(CacheEntry::Language))
            .chain(self.timing.iter().map(CacheEntry::Timing))
            .chain(self.images.iter().map(CacheEntry::Image))
    }
}

/// First element per id, and `label[for]` elements per target id
fn index_ids_and_labels(tree: &DomTree) -> (HashMap<String, NodeId>, HashMap<String, Vec<NodeId>>) {
    let mut ids = HashMap::new();
    let mut labels_for: HashMap<String, Vec<NodeId>> = HashMap::new();
    for (node, n) in tree.descendants(tree.root()) {
        let Some(elem) = n.as_element() else { continue };
        if let Some(id) = elem.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            ids.entry(id.to_string()).or_insert(node);
        }
        if elem.tag() == "label" {
            if let Some(target) = elem.get_attr_trimmed("for") {
                labels_for.entry(target.to_string()).or_default().push(node);
            }
        }
    }
    (ids, labels_for)
}

fn page_info(document: &Document) -> PageInfo {
    let tree = document.tree();
    let lang = tree
        .element(document.document_element())
        .and_then(|e| e.get_attr("lang"))
        .map(|l| l.trim().to_string());

    let meta_refresh = tree
        .descendants(document.head())
        .filter_map(|(_, n)| n.as_element())
        .find(|e| {
            e.tag() == "meta"
                && e.get_attr_trimmed("http-equiv")
                    .is_some_and(|h| h.eq_ignore_ascii_case("refresh"))
        })
        .map(|e| e.get_attr("content").unwrap_or("").trim().to_string());

    PageInfo {
        url: document.url().to_string(),
        title: document.title(),
        has_title_element: document.has_title_element(),
        has_body_element: document.has_body(),
        has_lang: lang.as_deref().is_some_and(|l| !l.is_empty()),
        lang_valid: lang.as_deref().is_some_and(is_valid_language),
        lang: lang.unwrap_or_default(),
        skipto: None,
        meta_refresh,
    }
}

/// Whether a frame source resolves to another host than the page
fn is_cross_domain(base: Option<&Url>, src: &str) -> bool {
    if src.is_empty() {
        return false;
    }
    let target = match base {
        Some(base) => base.join(src),
        None => Url::parse(src),
    };
    let Ok(target) = target else { return false };
    if !matches!(target.scheme(), "http" | "https") {
        return false;
    }
    match base {
        Some(base) => {
            target.host_str() != base.host_str()
                || target.port_or_known_default() != base.port_or_known_default()
        }
        None => true,
    }
}
