//! OAA Cache - Classification Cache
//!
//! Derives, once per evaluation, the accessibility facts every rule reads:
//! effective roles, accessible names, visibility, colour contrast, event
//! handlers, language, and the specialised collections (links, controls,
//! headings, landmarks, tables, frames, media, timing, images).

pub mod accname;
pub mod aria;
mod cache;
pub mod color;
mod element;
mod entries;
pub mod events;
pub mod language;
mod table;
pub mod visibility;

pub use accname::{AccessibleName, NameSource};
pub use aria::{ResolvedRole, RoleSource, RoleType};
pub use cache::{ClassificationCache, PAGE_ORDINAL, PageInfo, WEBSITE_ORDINAL};
pub use color::{ColorContrast, MIN_RATIO_LARGE, MIN_RATIO_NORMAL};
pub use element::{DomElement, ElementIndex, ElementRef, TabIndex};
pub use entries::{
    CacheEntry, ControlElement, ControlType, ElementEntry, EntryKind, FrameElement,
    HeadingElement, ImageElement, Inspectable, LandmarkElement, LanguageEntry, LinkElement,
    MediaElement, MediaType, TextEntry, TimingElement, TimingKind, TrackInfo,
};
pub use events::{EventFlags, EventInfo, EventProcessing};
pub use table::{HeaderAxis, HeadersSource, TableCell, TableElement, TableType};
pub use visibility::VisibilityState;
