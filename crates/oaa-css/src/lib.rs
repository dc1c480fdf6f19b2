//! OAA CSS Parser & Style System
//!
//! Reads author styles (`<style>` elements and `style` attributes), matches
//! a practical selector subset against the DOM and produces a per-element
//! specified-style snapshot. Inheritance and computed values are left to
//! the classification cache, which walks the tree top-down anyway.

mod cascade;
mod parser;
mod properties;
mod selector;
mod values;

pub use cascade::{SpecifiedStyle, StyleResolver};
pub use parser::CssParser;
pub use properties::PropertyId;
pub use selector::{Selector, Specificity};
pub use values::{
    Color, DEFAULT_FONT_SIZE, FontSize, FontWeight, background_has_image, parse_background_color,
    parse_color, parse_font_size, parse_font_weight, parse_length_px, split_tokens,
};

/// Parse a CSS stylesheet
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet, CssError> {
    CssParser::new().parse(css)
}

/// Parsed stylesheet
#[derive(Debug, Default, Clone)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }
}

/// CSS style rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
}

/// CSS declaration (property: value)
///
/// Values are kept as serialized CSS text and interpreted on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: PropertyId,
    pub value: String,
    pub important: bool,
}

/// CSS parsing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },
}
