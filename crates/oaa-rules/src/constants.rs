//! Rule Constants
//!
//! Scope, category bitmask and rule group bitmask shared by rules,
//! rulesets and the aggregation layer.

use std::fmt;

use serde::{Serialize, Serializer};

/// Granularity at which a rule reports its verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleScope {
    Element,
    Page,
    Website,
}

impl RuleScope {
    pub const ALL: [RuleScope; 3] = [Self::Element, Self::Page, Self::Website];

    pub fn code(self) -> u8 {
        match self {
            Self::Element => 1,
            Self::Page => 2,
            Self::Website => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Page => "page",
            Self::Website => "website",
        }
    }
}

impl fmt::Display for RuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RuleScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Rule category bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RuleCategory(u32);

impl RuleCategory {
    pub const UNDEFINED: Self = Self(0x0000);
    pub const LANDMARKS: Self = Self(0x0001);
    pub const HEADINGS: Self = Self(0x0002);
    pub const STYLES_READABILITY: Self = Self(0x0004);
    pub const IMAGES: Self = Self(0x0008);
    pub const LINKS: Self = Self(0x0010);
    pub const TABLES: Self = Self(0x0020);
    pub const FORMS: Self = Self(0x0040);
    pub const WIDGETS_SCRIPTS: Self = Self(0x0080);
    pub const AUDIO_VIDEO: Self = Self(0x0100);
    pub const KEYBOARD_SUPPORT: Self = Self(0x0200);
    pub const TIMING: Self = Self(0x0400);
    pub const SITE_NAVIGATION: Self = Self(0x0800);
    pub const ALL: Self = Self(0x0FFF);

    /// Single categories in bit order, with their names
    pub const NAMED: [(RuleCategory, &'static str); 12] = [
        (Self::LANDMARKS, "Landmarks"),
        (Self::HEADINGS, "Headings"),
        (Self::STYLES_READABILITY, "Styles/Content"),
        (Self::IMAGES, "Images"),
        (Self::LINKS, "Links"),
        (Self::TABLES, "Tables"),
        (Self::FORMS, "Forms"),
        (Self::WIDGETS_SCRIPTS, "Widgets/Scripts"),
        (Self::AUDIO_VIDEO, "Audio/Video"),
        (Self::KEYBOARD_SUPPORT, "Keyboard"),
        (Self::TIMING, "Timing"),
        (Self::SITE_NAVIGATION, "Site Navigation"),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Display name of a single category
    pub fn name(self) -> &'static str {
        Self::NAMED
            .iter()
            .find(|(c, _)| *c == self)
            .map(|(_, n)| *n)
            .unwrap_or("Undefined")
    }
}

impl std::ops::BitOr for RuleCategory {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Serialize for RuleCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

/// Rule group bitmask: GROUP1 (core), GROUP2, GROUP3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleGroup(u8);

impl RuleGroup {
    pub const GROUP1: Self = Self(1);
    pub const GROUP2: Self = Self(2);
    pub const GROUP3: Self = Self(4);
    pub const GROUP12: Self = Self(3);
    pub const GROUP123: Self = Self(7);

    /// Group filter from its numeric form, 1..=7
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits >= 1 && bits <= 7 { Some(Self(bits)) } else { None }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for RuleGroup {
    fn default() -> Self {
        Self::GROUP123
    }
}

impl Serialize for RuleGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}
