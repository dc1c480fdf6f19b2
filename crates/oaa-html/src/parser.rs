//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the arena DOM.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use oaa_dom::{Document, DomTree, ElementData, NodeId};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::empty(url);
        Self::convert(&dom.document, document.tree_mut());
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Convert the RcDom into arena nodes
    ///
    /// Uses an explicit stack; children are pushed in reverse so arena ids
    /// come out in document order.
    fn convert(root: &Handle, tree: &mut DomTree) {
        let mut stack: Vec<(Handle, NodeId)> = root
            .children
            .borrow()
            .iter()
            .rev()
            .map(|child| (child.clone(), tree.root()))
            .collect();

        while let Some((handle, parent)) = stack.pop() {
            let id = match &handle.data {
                RcNodeData::Element { name, attrs, .. } => {
                    let mut elem = ElementData::new(&name.local);
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, attr.value.to_string());
                    }
                    tree.create_element_with(elem)
                }
                RcNodeData::Text { contents } => {
                    let text = contents.borrow();
                    if text.trim().is_empty() {
                        continue;
                    }
                    tree.create_text(&text)
                }
                RcNodeData::Comment { contents } => tree.create_comment(contents),
                RcNodeData::Document
                | RcNodeData::Doctype { .. }
                | RcNodeData::ProcessingInstruction { .. } => continue,
            };
            tree.append_child(parent, id);

            for child in handle.children.borrow().iter().rev() {
                stack.push((child.clone(), id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert!(doc.has_body());
        assert_eq!(doc.title(), "Test");
    }

    #[test]
    fn test_parse_fragment() {
        let html = "<div><span>Text</span></div>";
        let doc = HtmlParser::new().parse(html).unwrap();

        // Fragments get wrapped in html/head/body by html5ever
        assert!(doc.has_body());
        assert!(doc.head().is_valid());
    }

    #[test]
    fn test_document_order_ids() {
        let html = "<body><div id='a'><span id='b'></span></div><p id='c'></p></body>";
        let doc = HtmlParser::new().parse(html).unwrap();
        let a = doc.get_element_by_id("a").unwrap();
        let b = doc.get_element_by_id("b").unwrap();
        let c = doc.get_element_by_id("c").unwrap();
        assert!(a < b && b < c);
    }
}
