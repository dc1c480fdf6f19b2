//! Cache Entries
//!
//! Specialised collections built on top of [`DomElement`]. Every entry can
//! be inspected uniformly through [`Inspectable`], which is what rule
//! results point at.

use oaa_dom::NodeId;

use crate::element::{DomElement, ElementIndex, ElementRef};
use crate::table::TableElement;

/// Uniform view of anything a rule can report on
pub trait Inspectable {
    fn element_ref(&self) -> ElementRef;

    /// Short type name of the cached item
    fn kind(&self) -> EntryKind;

    /// Cached properties as display pairs
    fn cache_properties(&self) -> Vec<(&'static str, String)>;

    fn ordinal_position(&self) -> u32 {
        self.element_ref().ordinal_position
    }

    fn node(&self) -> NodeId {
        self.element_ref().node
    }

    fn element_index(&self) -> ElementIndex {
        self.element_ref().index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Element,
    Text,
    Link,
    Control,
    Widget,
    Heading,
    Landmark,
    Table,
    Frame,
    Media,
    Language,
    Timing,
    Image,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Text => "text",
            Self::Link => "link",
            Self::Control => "control",
            Self::Widget => "widget",
            Self::Heading => "heading",
            Self::Landmark => "landmark",
            Self::Table => "table",
            Self::Frame => "frame",
            Self::Media => "media",
            Self::Language => "language",
            Self::Timing => "timing",
            Self::Image => "image",
        }
    }
}

/// A text node, reported against its own ordinal position
#[derive(Debug, Clone)]
pub struct TextEntry {
    pub node: NodeId,
    pub ordinal_position: u32,
    /// Element the text belongs to
    pub parent: ElementIndex,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct LinkElement {
    pub element: ElementRef,
    pub href: Option<String>,
    /// Fragment identifier (`#id`), when present and non-empty
    pub fragment: Option<String>,
}

/// Native form control type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlType {
    Button,
    Checkbox,
    Radio,
    Text,
    Select,
    Textarea,
    Range,
    File,
    Image,
    Output,
    Meter,
    Progress,
    Other,
}

impl ControlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Text => "text",
            Self::Select => "select",
            Self::Textarea => "textarea",
            Self::Range => "range",
            Self::File => "file",
            Self::Image => "image",
            Self::Output => "output",
            Self::Meter => "meter",
            Self::Progress => "progress",
            Self::Other => "other",
        }
    }
}

/// Native control or element with an authored ARIA role
#[derive(Debug, Clone)]
pub struct ControlElement {
    pub element: ElementRef,
    /// `None` for role-only widgets
    pub control_type: Option<ControlType>,
    pub is_widget: bool,
    /// Enclosing form element
    pub form: Option<ElementIndex>,
}

#[derive(Debug, Clone)]
pub struct HeadingElement {
    pub element: ElementRef,
    pub level: u8,
}

#[derive(Debug, Clone)]
pub struct LandmarkElement {
    pub element: ElementRef,
    pub landmark: &'static str,
    /// Enclosing landmark, as an index into the landmark collection
    pub parent_landmark: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct FrameElement {
    pub element: ElementRef,
    pub src: String,
    pub is_cross_domain: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Audio,
    Video,
    Object,
    Embed,
}

#[derive(Debug, Clone, Default)]
pub struct TrackInfo {
    pub kind: String,
    pub srclang: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct MediaElement {
    pub element: ElementRef,
    pub media_type: MediaType,
    pub autoplay: bool,
    pub controls: bool,
    pub tracks: Vec<TrackInfo>,
}

impl MediaElement {
    /// Captions or subtitles track present
    pub fn has_captions(&self) -> bool {
        self.tracks.iter().any(|t| t.kind == "captions" || t.kind == "subtitles")
    }

    pub fn has_descriptions(&self) -> bool {
        self.tracks.iter().any(|t| t.kind == "descriptions")
    }
}

/// Element that changes the page language
#[derive(Debug, Clone)]
pub struct LanguageEntry {
    pub element: ElementRef,
    pub lang: String,
    pub is_valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingKind {
    Animation,
    Marquee,
    Blink,
    Canvas,
    Embedded,
}

/// Element whose content may move, blink or update automatically
#[derive(Debug, Clone)]
pub struct TimingElement {
    pub element: ElementRef,
    pub kind: TimingKind,
}

#[derive(Debug, Clone)]
pub struct ImageElement {
    pub element: ElementRef,
    pub src: String,
    pub has_alt: bool,
}

macro_rules! inspectable {
    ($ty:ty, $kind:expr, |$s:ident| $props:expr) => {
        impl Inspectable for $ty {
            fn element_ref(&self) -> ElementRef {
                self.element
            }

            fn kind(&self) -> EntryKind {
                $kind
            }

            fn cache_properties(&self) -> Vec<(&'static str, String)> {
                let $s = self;
                $props
            }
        }
    };
}

inspectable!(LinkElement, EntryKind::Link, |s| vec![
    ("href", s.href.clone().unwrap_or_default()),
    ("fragment", s.fragment.clone().unwrap_or_default()),
]);
inspectable!(HeadingElement, EntryKind::Heading, |s| vec![("level", s.level.to_string())]);
inspectable!(LandmarkElement, EntryKind::Landmark, |s| vec![("landmark", s.landmark.to_string())]);
inspectable!(FrameElement, EntryKind::Frame, |s| vec![
    ("src", s.src.clone()),
    ("is_cross_domain", s.is_cross_domain.to_string()),
]);
inspectable!(MediaElement, EntryKind::Media, |s| vec![
    ("autoplay", s.autoplay.to_string()),
    ("controls", s.controls.to_string()),
    ("tracks", s.tracks.len().to_string()),
]);
inspectable!(LanguageEntry, EntryKind::Language, |s| vec![
    ("lang", s.lang.clone()),
    ("is_valid", s.is_valid.to_string()),
]);
inspectable!(TimingElement, EntryKind::Timing, |s| vec![("kind", format!("{:?}", s.kind))]);
inspectable!(ImageElement, EntryKind::Image, |s| vec![
    ("src", s.src.clone()),
    ("has_alt", s.has_alt.to_string()),
]);
inspectable!(TableElement, EntryKind::Table, |s| vec![
    ("table_type", s.table_type.as_str().to_string()),
    ("rows", s.row_count.to_string()),
    ("columns", s.column_count.to_string()),
    ("nesting_level", s.nesting_level.to_string()),
]);

impl Inspectable for ControlElement {
    fn element_ref(&self) -> ElementRef {
        self.element
    }

    fn kind(&self) -> EntryKind {
        if self.is_widget {
            EntryKind::Widget
        } else {
            EntryKind::Control
        }
    }

    fn cache_properties(&self) -> Vec<(&'static str, String)> {
        vec![
            ("control_type", self.control_type.map(|c| c.as_str()).unwrap_or("").to_string()),
            ("is_widget", self.is_widget.to_string()),
        ]
    }
}

impl Inspectable for TextEntry {
    fn element_ref(&self) -> ElementRef {
        ElementRef {
            index: self.parent,
            node: self.node,
            ordinal_position: self.ordinal_position,
        }
    }

    fn kind(&self) -> EntryKind {
        EntryKind::Text
    }

    fn cache_properties(&self) -> Vec<(&'static str, String)> {
        vec![("text", self.text.clone())]
    }
}

/// A [`DomElement`] paired with its arena index
#[derive(Debug, Clone, Copy)]
pub struct ElementEntry<'c> {
    pub index: ElementIndex,
    pub element: &'c DomElement,
}

impl Inspectable for ElementEntry<'_> {
    fn element_ref(&self) -> ElementRef {
        self.element.element_ref(self.index)
    }

    fn kind(&self) -> EntryKind {
        EntryKind::Element
    }

    fn cache_properties(&self) -> Vec<(&'static str, String)> {
        let e = self.element;
        vec![
            ("tag_name", e.tag_name.clone()),
            ("role", e.role.name().to_string()),
            ("accessible_name", e.accessible_name.name.clone()),
            ("name_source", e.accessible_name.source.as_str().to_string()),
            ("lang", e.lang.clone()),
            ("visible_to_at", e.is_visible_to_at().to_string()),
            ("visible_onscreen", e.is_visible_onscreen().to_string()),
            ("color_contrast_ratio", e.color_contrast.ccr.to_string()),
        ]
    }
}

/// Any cached item, by reference
#[derive(Debug, Clone, Copy)]
pub enum CacheEntry<'c> {
    Element(ElementEntry<'c>),
    Text(&'c TextEntry),
    Link(&'c LinkElement),
    Control(&'c ControlElement),
    Heading(&'c HeadingElement),
    Landmark(&'c LandmarkElement),
    Table(&'c TableElement),
    Frame(&'c FrameElement),
    Media(&'c MediaElement),
    Language(&'c LanguageEntry),
    Timing(&'c TimingElement),
    Image(&'c ImageElement),
}

impl CacheEntry<'_> {
    fn inner(&self) -> &dyn Inspectable {
        match self {
            Self::Element(e) => e,
            Self::Text(e) => *e,
            Self::Link(e) => *e,
            Self::Control(e) => *e,
            Self::Heading(e) => *e,
            Self::Landmark(e) => *e,
            Self::Table(e) => *e,
            Self::Frame(e) => *e,
            Self::Media(e) => *e,
            Self::Language(e) => *e,
            Self::Timing(e) => *e,
            Self::Image(e) => *e,
        }
    }
}

impl Inspectable for CacheEntry<'_> {
    fn element_ref(&self) -> ElementRef {
        self.inner().element_ref()
    }

    fn kind(&self) -> EntryKind {
        self.inner().kind()
    }

    fn cache_properties(&self) -> Vec<(&'static str, String)> {
        self.inner().cache_properties()
    }
}
