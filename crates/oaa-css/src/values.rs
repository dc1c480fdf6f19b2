//! CSS value interpretation
//!
//! Colours, lengths and font metrics as the contrast and visibility
//! computations need them. Unknown input yields `None`; callers pick the
//! conservative default.

/// Default font size in CSS pixels
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// RGBA colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in 0.0..=1.0
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0.0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a: a.clamp(0.0, 1.0) }
    }

    /// Fully transparent colours are treated as "no background"
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Six digit lower-case hex, without `#`
    pub fn to_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Font size in CSS pixels
pub type FontSize = f32;

/// Numeric font weight (100..=900)
pub type FontWeight = u16;

/// Split a CSS value on top-level whitespace and commas, keeping
/// parenthesized groups such as `rgb(0 0 0 / 50%)` intact
pub fn split_tokens(value: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (i, ch) in value.char_indices() {
        match ch {
            '(' => {
                depth += 1;
                start.get_or_insert(i);
            }
            ')' => {
                depth = depth.saturating_sub(1);
            }
            c if depth == 0 && (c.is_whitespace() || c == ',') => {
                if let Some(s) = start.take() {
                    tokens.push(&value[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        tokens.push(&value[s..]);
    }
    tokens
}

/// Parse a CSS colour value
///
/// Supports hex (3, 4, 6, 8 digits), `rgb()`/`rgba()` in comma and space
/// syntax, `transparent` and the common named colours.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim().to_ascii_lowercase();

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args);
    }
    if value == "transparent" {
        return Some(Color::TRANSPARENT);
    }
    named_color(&value)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::rgba(
            nibble(0)?,
            nibble(1)?,
            nibble(2)?,
            f32::from(nibble(3)?) / 255.0,
        )),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgba(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            f32::from(byte(6)?) / 255.0,
        )),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 3 || parts.len() > 4 {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        let v = match s.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? * 2.55,
            None => s.parse::<f32>().ok()?,
        };
        Some(v.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = match parts.get(3) {
        Some(s) => match s.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? / 100.0,
            None => s.parse::<f32>().ok()?,
        },
        None => 1.0,
    };

    Some(Color::rgba(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

fn named_color(name: &str) -> Option<Color> {
    let (r, g, b) = match name {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "lime" => (0, 255, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "aqua" | "cyan" => (0, 255, 255),
        "fuchsia" | "magenta" => (255, 0, 255),
        "silver" => (192, 192, 192),
        "gray" | "grey" => (128, 128, 128),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "purple" => (128, 0, 128),
        "teal" => (0, 128, 128),
        "navy" => (0, 0, 128),
        "orange" => (255, 165, 0),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "dimgray" | "dimgrey" => (105, 105, 105),
        "gainsboro" => (220, 220, 220),
        "whitesmoke" => (245, 245, 245),
        "darkblue" => (0, 0, 139),
        "darkred" => (139, 0, 0),
        "darkgreen" => (0, 100, 0),
        "brown" => (165, 42, 42),
        "pink" => (255, 192, 203),
        "gold" => (255, 215, 0),
        "beige" => (245, 245, 220),
        "ivory" => (255, 255, 240),
        "khaki" => (240, 230, 140),
        "indigo" => (75, 0, 130),
        "violet" => (238, 130, 238),
        "crimson" => (220, 20, 60),
        "coral" => (255, 127, 80),
        "salmon" => (250, 128, 114),
        "tomato" => (255, 99, 71),
        "orangered" => (255, 69, 0),
        "steelblue" => (70, 130, 180),
        "royalblue" => (65, 105, 225),
        "skyblue" => (135, 206, 235),
        "lightblue" => (173, 216, 230),
        "slategray" | "slategrey" => (112, 128, 144),
        "darkslategray" | "darkslategrey" => (47, 79, 79),
        "rebeccapurple" => (102, 51, 153),
        _ => return None,
    };
    Some(Color::rgb(r, g, b))
}

/// Background colour carried by a `background` shorthand, if any
pub fn parse_background_color(value: &str) -> Option<Color> {
    split_tokens(value).into_iter().rev().find_map(parse_color)
}

/// Whether a `background`/`background-image` value paints an image
pub fn background_has_image(value: &str) -> bool {
    let value = value.to_ascii_lowercase();
    value.contains("url(") || value.contains("gradient(") || value.contains("image-set(")
}

/// Resolve a length to CSS pixels
///
/// `reference` is the value percentages and `em` resolve against.
pub fn parse_length_px(value: &str, reference: f32) -> Option<f32> {
    let value = value.trim().to_ascii_lowercase();
    if value == "0" {
        return Some(0.0);
    }

    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let number: f32 = number.parse().ok()?;

    let px = match unit {
        "px" | "" => number,
        "pt" => number * 4.0 / 3.0,
        "pc" => number * 16.0,
        "in" => number * 96.0,
        "cm" => number * 96.0 / 2.54,
        "mm" => number * 96.0 / 25.4,
        "em" => number * reference,
        "rem" => number * DEFAULT_FONT_SIZE,
        "%" => number * reference / 100.0,
        _ => return None,
    };
    Some(px)
}

/// Resolve a `font-size` value against the parent's size
pub fn parse_font_size(value: &str, parent: FontSize) -> Option<FontSize> {
    let size = match value.trim().to_ascii_lowercase().as_str() {
        "xx-small" => 9.0,
        "x-small" => 10.0,
        "small" => 13.0,
        "medium" => DEFAULT_FONT_SIZE,
        "large" => 18.0,
        "x-large" => 24.0,
        "xx-large" => 32.0,
        "xxx-large" => 48.0,
        "larger" => parent * 1.2,
        "smaller" => parent / 1.2,
        other => return parse_length_px(other, parent),
    };
    Some(size)
}

/// Resolve a `font-weight` value against the parent's weight
pub fn parse_font_weight(value: &str, parent: FontWeight) -> Option<FontWeight> {
    let weight = match value.trim().to_ascii_lowercase().as_str() {
        "normal" => 400,
        "bold" => 700,
        "bolder" => {
            if parent < 400 {
                400
            } else if parent < 600 {
                700
            } else {
                900
            }
        }
        "lighter" => {
            if parent < 600 {
                100
            } else if parent < 800 {
                400
            } else {
                700
            }
        }
        other => {
            let w: f32 = other.parse().ok()?;
            w.clamp(1.0, 1000.0) as FontWeight
        }
    };
    Some(weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_color("#fff"), Some(Color::WHITE));
        assert_eq!(parse_color("#000000"), Some(Color::BLACK));
        assert_eq!(parse_color("#767676").map(|c| c.to_hex()), Some("767676".into()));
        let half = parse_color("#00000080").unwrap();
        assert!((half.a - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(parse_color("#ggg"), None);
        assert_eq!(parse_color("#12345"), None);
    }

    #[test]
    fn test_functional_colors() {
        assert_eq!(parse_color("rgb(255, 0, 0)"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(parse_color("RGB(100%, 0%, 0%)"), Some(Color::rgb(255, 0, 0)));
        let c = parse_color("rgba(0, 0, 255, 0.5)").unwrap();
        assert_eq!((c.r, c.g, c.b), (0, 0, 255));
        assert!((c.a - 0.5).abs() < 1e-6);
        let c = parse_color("rgb(0 128 0 / 25%)").unwrap();
        assert_eq!(c.g, 128);
        assert!((c.a - 0.25).abs() < 1e-6);
        assert_eq!(parse_color("rgb(1, 2)"), None);
    }

    #[test]
    fn test_named_and_transparent() {
        assert_eq!(parse_color("Navy"), Some(Color::rgb(0, 0, 128)));
        assert!(parse_color("transparent").unwrap().is_transparent());
        assert_eq!(parse_color("not-a-color"), None);
    }

    #[test]
    fn test_split_tokens_keeps_groups() {
        assert_eq!(
            split_tokens("url(\"a b.png\") rgb(0 0 0 / 50%) no-repeat"),
            vec!["url(\"a b.png\")", "rgb(0 0 0 / 50%)", "no-repeat"]
        );
    }

    #[test]
    fn test_background_shorthand() {
        assert_eq!(parse_background_color("#fff url(x.png) no-repeat"), Some(Color::WHITE));
        assert!(background_has_image("url(x.png) white"));
        assert!(background_has_image("linear-gradient(red, blue)"));
        assert!(!background_has_image("none"));
    }

    #[test]
    fn test_lengths_and_fonts() {
        assert_eq!(parse_length_px("12px", 16.0), Some(12.0));
        assert_eq!(parse_length_px("0", 16.0), Some(0.0));
        assert_eq!(parse_length_px("1.5em", 10.0), Some(15.0));
        assert_eq!(parse_length_px("50%", 20.0), Some(10.0));
        assert_eq!(parse_length_px("18pt", 16.0), Some(24.0));
        assert_eq!(parse_length_px("auto", 16.0), None);

        assert_eq!(parse_font_size("large", 16.0), Some(18.0));
        assert_eq!(parse_font_size("2em", 12.0), Some(24.0));
        assert_eq!(parse_font_weight("bold", 400), Some(700));
        assert_eq!(parse_font_weight("bolder", 400), Some(700));
        assert_eq!(parse_font_weight("300", 400), Some(300));
        assert_eq!(parse_font_weight("heavy", 400), None);
    }
}
