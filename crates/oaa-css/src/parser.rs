//! CSS Parser using lightningcss
//!
//! Parses stylesheets and `style` attributes into [`Stylesheet`] /
//! [`Declaration`] lists holding only the properties in [`PropertyId`].

use lightningcss::declaration::DeclarationBlock;
use lightningcss::printer::PrinterOptions;
use lightningcss::properties::Property;
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::stylesheet::{ParserOptions, StyleAttribute, StyleSheet};
use lightningcss::traits::ToCss;

use crate::{CssError, Declaration, PropertyId, Rule, Selector, Stylesheet};

/// CSS Parser
#[derive(Debug, Clone, Copy, Default)]
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    fn options<'i>() -> ParserOptions<'i> {
        ParserOptions {
            error_recovery: true,
            ..ParserOptions::default()
        }
    }

    /// Parse a CSS stylesheet
    pub fn parse(&self, css: &str) -> Result<Stylesheet, CssError> {
        let stylesheet = StyleSheet::parse(css, Self::options()).map_err(|e| CssError::ParseError {
            line: e.loc.as_ref().map(|l| l.line + 1).unwrap_or(0),
            message: e.kind.to_string(),
        })?;

        let mut result = Stylesheet::new();
        self.convert_rules(&stylesheet.rules, &mut result);
        tracing::trace!(rules = result.rules.len(), "stylesheet parsed");
        Ok(result)
    }

    /// Parse the contents of a `style` attribute
    pub fn parse_inline(&self, style: &str) -> Result<Vec<Declaration>, CssError> {
        let attr = StyleAttribute::parse(style, Self::options()).map_err(|e| {
            CssError::ParseError {
                line: 0,
                message: e.kind.to_string(),
            }
        })?;
        Ok(self.convert_declarations(&attr.declarations))
    }

    fn convert_rules(&self, rules: &CssRuleList<'_>, out: &mut Stylesheet) {
        for rule in rules.0.iter() {
            match rule {
                CssRule::Style(style_rule) => {
                    let declarations = self.convert_declarations(&style_rule.declarations);
                    if declarations.is_empty() {
                        continue;
                    }
                    let selectors = match style_rule.selectors.to_css_string(PrinterOptions::default()) {
                        Ok(text) => Selector::parse_list(&text),
                        Err(_) => continue,
                    };
                    out.rules.push(Rule { selectors, declarations });
                }
                CssRule::Media(media) => {
                    // Screen styles are what the page shows; print and other media are ignored
                    let query = media
                        .query
                        .to_css_string(PrinterOptions::default())
                        .unwrap_or_default()
                        .to_ascii_lowercase();
                    if query.is_empty() || query.contains("screen") || query.contains("all") {
                        self.convert_rules(&media.rules, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn convert_declarations(&self, block: &DeclarationBlock<'_>) -> Vec<Declaration> {
        let normal = block.declarations.iter().map(|d| (d, false));
        let important = block.important_declarations.iter().map(|d| (d, true));
        normal
            .chain(important)
            .filter_map(|(decl, important)| self.convert_declaration(decl, important))
            .collect()
    }

    fn convert_declaration(&self, decl: &Property<'_>, important: bool) -> Option<Declaration> {
        let property_id = decl.property_id();
        let property = PropertyId::from_name(property_id.name())?;
        let value = decl.value_to_css_string(PrinterOptions::default()).ok()?;
        Some(Declaration { property, value, important })
    }
}
