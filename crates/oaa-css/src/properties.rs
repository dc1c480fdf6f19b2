//! CSS Property Definitions
//!
//! The properties the accessibility snapshot reads. Everything else is
//! dropped at parse time.

/// Property identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyId {
    Display,
    Visibility,
    Position,
    Left,
    Top,
    Clip,
    Height,
    Overflow,
    Color,
    BackgroundColor,
    BackgroundImage,
    Background,
    Opacity,
    FontSize,
    FontWeight,
}

impl PropertyId {
    /// Parse a property name into a PropertyId
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.trim().to_ascii_lowercase().as_str() {
            "display" => Self::Display,
            "visibility" => Self::Visibility,
            "position" => Self::Position,
            "left" => Self::Left,
            "top" => Self::Top,
            "clip" => Self::Clip,
            "height" => Self::Height,
            "overflow" => Self::Overflow,
            "color" => Self::Color,
            "background-color" => Self::BackgroundColor,
            "background-image" => Self::BackgroundImage,
            "background" => Self::Background,
            "opacity" => Self::Opacity,
            "font-size" => Self::FontSize,
            "font-weight" => Self::FontWeight,
            _ => return None,
        })
    }

    /// CSS name of the property
    pub fn name(self) -> &'static str {
        match self {
            Self::Display => "display",
            Self::Visibility => "visibility",
            Self::Position => "position",
            Self::Left => "left",
            Self::Top => "top",
            Self::Clip => "clip",
            Self::Height => "height",
            Self::Overflow => "overflow",
            Self::Color => "color",
            Self::BackgroundColor => "background-color",
            Self::BackgroundImage => "background-image",
            Self::Background => "background",
            Self::Opacity => "opacity",
            Self::FontSize => "font-size",
            Self::FontWeight => "font-weight",
        }
    }
}
