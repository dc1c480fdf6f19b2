//! Event Handlers
//!
//! Which UI events an element is known to handle. A static snapshot has no
//! listener registry, so handlers are read from inline `on*` attributes and,
//! for pages prepared by the fae-util crawler, from its `oaa-has-*` markers.

use std::fmt;
use std::str::FromStr;

use oaa_dom::ElementData;

/// How event handler information is gathered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventProcessing {
    /// Markers written by the fae-util crawler plus inline handlers
    FaeUtil,
    /// Browser listener service; inline handlers in a static snapshot
    Firefox,
    #[default]
    None,
}

impl EventProcessing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FaeUtil => "fae-util",
            Self::Firefox => "firefox",
            Self::None => "none",
        }
    }
}

impl fmt::Display for EventProcessing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventProcessing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fae-util" => Ok(Self::FaeUtil),
            "firefox" => Ok(Self::Firefox),
            "none" => Ok(Self::None),
            other => Err(other.to_string()),
        }
    }
}

/// Handled events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFlags {
    pub click: bool,
    pub change: bool,
    pub focus: bool,
    pub blur: bool,
    pub key_down: bool,
    pub key_press: bool,
    pub key_up: bool,
    pub mouse_down: bool,
    pub mouse_up: bool,
    pub mouse_over: bool,
    pub mouse_out: bool,
}

/// (inline attribute, crawler marker suffix)
const EVENTS: &[(&str, &str)] = &[
    ("onclick", "click"),
    ("onchange", "change"),
    ("onfocus", "focus"),
    ("onblur", "blur"),
    ("onkeydown", "key_down"),
    ("onkeypress", "key_press"),
    ("onkeyup", "key_up"),
    ("onmousedown", "mouse_down"),
    ("onmouseup", "mouse_up"),
    ("onmouseover", "mouse_over"),
    ("onmouseout", "mouse_out"),
];

impl EventFlags {
    /// Read an element's handlers under the given processing mode
    pub fn detect(elem: &ElementData, mode: EventProcessing) -> Self {
        let mut flags = Self::default();
        for (inline, marker) in EVENTS {
            let mut present = elem.has_attr(inline);
            if mode == EventProcessing::FaeUtil && !present {
                present = elem
                    .get_attr_trimmed(&format!("oaa-has-{marker}"))
                    .is_some_and(|v| v.is_empty() || v.eq_ignore_ascii_case("true"));
            }
            if present {
                flags.set(marker);
            }
        }
        flags
    }

    fn set(&mut self, marker: &str) {
        match marker {
            "click" => self.click = true,
            "change" => self.change = true,
            "focus" => self.focus = true,
            "blur" => self.blur = true,
            "key_down" => self.key_down = true,
            "key_press" => self.key_press = true,
            "key_up" => self.key_up = true,
            "mouse_down" => self.mouse_down = true,
            "mouse_up" => self.mouse_up = true,
            "mouse_over" => self.mouse_over = true,
            "mouse_out" => self.mouse_out = true,
            _ => {}
        }
    }

    pub fn has_key_events(&self) -> bool {
        self.key_down || self.key_press || self.key_up
    }

    pub fn has_mouse_events(&self) -> bool {
        self.click || self.mouse_down || self.mouse_up || self.mouse_over || self.mouse_out
    }

    pub fn has_any(&self) -> bool {
        self.has_key_events() || self.has_mouse_events() || self.change || self.focus || self.blur
    }

    pub fn union(self, other: EventFlags) -> EventFlags {
        EventFlags {
            click: self.click || other.click,
            change: self.change || other.change,
            focus: self.focus || other.focus,
            blur: self.blur || other.blur,
            key_down: self.key_down || other.key_down,
            key_press: self.key_press || other.key_press,
            key_up: self.key_up || other.key_up,
            mouse_down: self.mouse_down || other.mouse_down,
            mouse_up: self.mouse_up || other.mouse_up,
            mouse_over: self.mouse_over || other.mouse_over,
            mouse_out: self.mouse_out || other.mouse_out,
        }
    }
}

/// Own handlers plus those inherited through event bubbling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventInfo {
    pub own: EventFlags,
    pub ancestor: EventFlags,
}
