//! OAA HTML Parser
//!
//! HTML5 parsing built on html5ever, producing an [`oaa_dom::Document`].

mod parser;

pub use oaa_dom::Document;
pub use parser::HtmlParser;

/// Parse an HTML string into a document at `about:blank`
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),
}
