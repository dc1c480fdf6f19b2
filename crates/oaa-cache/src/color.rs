//! Colour Contrast
//!
//! Effective text/background colours, font metrics and the WCAG contrast
//! ratio of each element, computed top-down from the root defaults
//! (black text on white, 16px, weight 400).

use oaa_css::{
    Color, DEFAULT_FONT_SIZE, PropertyId, SpecifiedStyle, background_has_image,
    parse_background_color, parse_color, parse_font_size, parse_font_weight,
};

/// Minimum ratio for normal text
pub const MIN_RATIO_NORMAL: f32 = 4.5;
/// Minimum ratio for large text
pub const MIN_RATIO_LARGE: f32 = 3.1;

/// Inherited colour context passed from parent to child
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorState {
    /// Specified text colour (may carry alpha)
    pub color: Color,
    /// Opaque effective background
    pub background: Color,
    /// Accumulated opacity
    pub opacity: f32,
    pub background_image: bool,
    pub font_size: f32,
    pub font_weight: u16,
}

impl Default for ColorState {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            background: Color::WHITE,
            opacity: 1.0,
            background_image: false,
            font_size: DEFAULT_FONT_SIZE,
            font_weight: 400,
        }
    }
}

/// Contrast facts of one element
#[derive(Debug, Clone, PartialEq)]
pub struct ColorContrast {
    pub color_hex: String,
    pub background_hex: String,
    /// Contrast ratio rounded to one decimal
    pub ccr: f32,
    pub font_size: f32,
    pub font_weight: u16,
    pub is_large_font: bool,
    pub has_background_image: bool,
    pub opacity: f32,
}

impl ColorContrast {
    /// Ratio required for this element's text size
    pub fn required_ratio(&self) -> f32 {
        if self.is_large_font {
            MIN_RATIO_LARGE
        } else {
            MIN_RATIO_NORMAL
        }
    }

    pub fn passes(&self) -> bool {
        self.ccr >= self.required_ratio()
    }
}

impl ColorState {
    /// Child state from this (parent) state and the child's specified style
    pub fn compute(&self, style: &SpecifiedStyle) -> ColorState {
        let mut state = *self;

        if let Some(c) = style.get(PropertyId::Color).and_then(parse_color) {
            state.color = c;
        }

        let own_background = style
            .get(PropertyId::BackgroundColor)
            .and_then(parse_color)
            .or_else(|| style.get(PropertyId::Background).and_then(parse_background_color));
        if let Some(bg) = own_background.filter(|c| !c.is_transparent()) {
            state.background = blend(bg, self.background, bg.a);
        }

        let image = style
            .get(PropertyId::BackgroundImage)
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty() && v != "none" && v != "inherit");
        if let Some(image) = image {
            state.background_image = background_has_image(&image);
        } else if let Some(bg) = style.get(PropertyId::Background) {
            if background_has_image(bg) {
                state.background_image = true;
            }
        }

        if let Some(o) = style
            .get(PropertyId::Opacity)
            .and_then(|v| v.trim().parse::<f32>().ok())
        {
            state.opacity = (self.opacity * o).clamp(0.0, 1.0);
        }

        if let Some(size) = style
            .get(PropertyId::FontSize)
            .and_then(|v| parse_font_size(v, self.font_size))
        {
            state.font_size = size;
        }
        if let Some(weight) = style
            .get(PropertyId::FontWeight)
            .and_then(|v| parse_font_weight(v, self.font_weight))
        {
            state.font_weight = weight;
        }

        state
    }

    /// Text colour as painted over the background
    pub fn effective_color(&self) -> Color {
        let with_alpha = blend(self.color, self.background, self.color.a);
        blend(with_alpha, self.background, self.opacity)
    }

    pub fn contrast(&self) -> ColorContrast {
        let fg = self.effective_color();
        ColorContrast {
            color_hex: fg.to_hex(),
            background_hex: self.background.to_hex(),
            ccr: contrast_ratio(fg, self.background),
            font_size: self.font_size,
            font_weight: self.font_weight,
            is_large_font: is_large_font(self.font_size, self.font_weight),
            has_background_image: self.background_image,
            opacity: self.opacity,
        }
    }
}

/// Composite `fg` over an opaque `bg` with the given alpha
pub fn blend(fg: Color, bg: Color, alpha: f32) -> Color {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (f as f32 * a + b as f32 * (1.0 - a)).round() as u8;
    Color::rgb(mix(fg.r, bg.r), mix(fg.g, bg.g), mix(fg.b, bg.b))
}

/// WCAG relative luminance
pub fn relative_luminance(c: Color) -> f64 {
    let channel = |v: u8| {
        let s = v as f64 / 255.0;
        if s <= 0.03928 {
            s / 12.92
        } else {
            ((s + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(c.r) + 0.7152 * channel(c.g) + 0.0722 * channel(c.b)
}

/// Contrast ratio rounded to one decimal place
pub fn contrast_ratio(a: Color, b: Color) -> f32 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (hi, lo) = if la > lb { (la, lb) } else { (lb, la) };
    let ratio = (hi + 0.05) / (lo + 0.05);
    ((ratio * 10.0).round() / 10.0) as f32
}

/// Large text threshold for normal weight: 18pt in CSS pixels
pub const LARGE_FONT_SIZE: f32 = 24.0;
/// Large text threshold for bold weight: 14pt in CSS pixels
pub const LARGE_BOLD_FONT_SIZE: f32 = 18.66;
/// Lowest weight counted as bold
pub const BOLD_WEIGHT: u16 = 700;

/// WCAG large scale text: at least 18pt, or 14pt bold
pub fn is_large_font(size: f32, weight: u16) -> bool {
    size >= LARGE_FONT_SIZE || (size >= LARGE_BOLD_FONT_SIZE && weight >= BOLD_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(pairs: &[(PropertyId, &str)]) -> SpecifiedStyle {
        let mut s = SpecifiedStyle::default();
        for (p, v) in pairs {
            s.set(*p, *v);
        }
        s
    }

    #[test]
    fn test_contrast_ratio_extremes() {
        assert_eq!(contrast_ratio(Color::BLACK, Color::WHITE), 21.0);
        assert_eq!(contrast_ratio(Color::WHITE, Color::WHITE), 1.0);
    }

    #[test]
    fn test_contrast_ratio_grays() {
        assert_eq!(contrast_ratio(Color::rgb(0x57, 0x57, 0x57), Color::WHITE), 7.2);
        assert_eq!(contrast_ratio(Color::rgb(0x94, 0x94, 0x94), Color::WHITE), 3.0);
        assert_eq!(contrast_ratio(Color::rgb(0x76, 0x76, 0x76), Color::WHITE), 4.5);
    }

    #[test]
    fn test_background_inherits_when_transparent() {
        let root = ColorState::default();
        let dark = root.compute(&style(&[(PropertyId::BackgroundColor, "#000")]));
        let child = dark.compute(&style(&[(PropertyId::BackgroundColor, "transparent")]));
        assert_eq!(child.background, Color::BLACK);
    }

    #[test]
    fn test_opacity_multiplies() {
        let root = ColorState::default();
        let half = root.compute(&style(&[(PropertyId::Opacity, "0.5")]));
        let quarter = half.compute(&style(&[(PropertyId::Opacity, "0.5")]));
        assert!((quarter.opacity - 0.25).abs() < f32::EPSILON);
        // Black at half opacity over white is mid grey
        assert_eq!(half.effective_color().to_hex(), "808080");
    }

    #[test]
    fn test_background_image_inherits() {
        let root = ColorState::default();
        let with_image = root.compute(&style(&[(PropertyId::BackgroundImage, "url(bg.png)")]));
        assert!(with_image.background_image);
        let child = with_image.compute(&style(&[(PropertyId::BackgroundImage, "none")]));
        assert!(child.background_image);
    }

    #[test]
    fn test_large_font() {
        assert!(is_large_font(24.0, 400));
        assert!(is_large_font(18.66, 700));
        assert!(is_large_font(20.0, 800));
        assert!(!is_large_font(18.0, 400));
        assert!(!is_large_font(23.9, 600));
        assert!(!is_large_font(16.0, 700));
        assert!(!is_large_font(14.0, 400));
    }

    #[test]
    fn test_contrast_passes() {
        let root = ColorState::default();
        let grey = root.compute(&style(&[(PropertyId::Color, "#949494")]));
        let c = grey.contrast();
        assert_eq!(c.ccr, 3.0);
        assert!(!c.passes());

        let big = grey.compute(&style(&[(PropertyId::FontSize, "32px")]));
        assert!(big.contrast().is_large_font);
    }
}
