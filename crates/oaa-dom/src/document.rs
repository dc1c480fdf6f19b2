//! Document - High-level document API

use crate::{DomTree, NodeId};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a document with an empty html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate html, head and body after the tree has been built
    pub fn finalize(&mut self) {
        self.html_element = NodeId::NONE;
        self.head_element = NodeId::NONE;
        self.body_element = NodeId::NONE;

        let html = self
            .tree
            .children(self.tree.root())
            .find(|(_, node)| node.as_element().is_some_and(|e| e.tag() == "html"))
            .map(|(id, _)| id);
        let Some(html) = html else {
            return;
        };
        self.html_element = html;

        for (id, node) in self.tree.children(html) {
            match node.as_element().map(|e| e.tag()) {
                Some("head") if !self.head_element.is_valid() => self.head_element = id,
                Some("body") | Some("frameset") if !self.body_element.is_valid() => {
                    self.body_element = id
                }
                _ => {}
            }
        }

        tracing::trace!(
            html = html.index(),
            has_body = self.body_element.is_valid(),
            "document structure located"
        );
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Document title, whitespace normalized; empty when absent
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }

        self.tree
            .descendants(self.head_element)
            .find(|(_, node)| node.as_element().is_some_and(|e| e.tag() == "title"))
            .map(|(id, _)| normalize_space(&self.tree.text_content(id)))
            .unwrap_or_default()
    }

    /// Whether a `title` element exists in the head
    pub fn has_title_element(&self) -> bool {
        self.head_element.is_valid()
            && self
                .tree
                .descendants(self.head_element)
                .any(|(_, node)| node.as_element().is_some_and(|e| e.tag() == "title"))
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Whether the document has a body (or frameset) element
    pub fn has_body(&self) -> bool {
        self.body_element.is_valid()
    }

    /// First element carrying the given id, in document order
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|(_, node)| node.as_element().and_then(|e| e.id.as_deref()) == Some(id))
            .map(|(node_id, _)| node_id)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

/// Collapse runs of whitespace to single spaces and trim
pub fn normalize_space(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_document() {
        let doc = Document::new("http://example.com/");
        assert!(doc.has_body());
        assert_eq!(doc.title(), "");
        assert!(!doc.has_title_element());
        assert_eq!(doc.url(), "http://example.com/");
    }

    #[test]
    fn test_title_and_lookup() {
        let mut doc = Document::new("about:blank");
        let head = doc.head();
        let body = doc.body();
        let tree = doc.tree_mut();
        let title = tree.create_element("title");
        let text = tree.create_text("  My \n Page ");
        tree.append_child(head, title);
        tree.append_child(title, text);

        let mut main = crate::ElementData::new("main");
        main.set_attr("id", "content".into());
        let main = tree.create_element_with(main);
        tree.append_child(body, main);

        assert_eq!(doc.title(), "My Page");
        assert_eq!(doc.get_element_by_id("content"), Some(main));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_finalize_without_body() {
        let mut doc = Document::empty("about:blank");
        doc.finalize();
        assert!(!doc.has_body());
        assert!(!doc.document_element().is_valid());
    }
}
