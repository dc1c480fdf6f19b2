//! DOM Tree (arena-based allocation)

use crate::{ElementData, Node, NodeData, NodeId, TextData};

/// Arena-based DOM tree
///
/// Node 0 is always the document node.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Element data of a node, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Lower-cased tag name of an element node
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(ElementData::tag)
    }

    /// Parent of a node, if any
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree has nothing but the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(Node::new(NodeData::Element(ElementData::new(name))))
    }

    /// Create a detached element from prepared element data
    pub fn create_element_with(&mut self, data: ElementData) -> NodeId {
        self.push(Node::new(NodeData::Element(data)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::new(NodeData::Text(TextData {
            content: content.to_string(),
        })))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::new(NodeData::Comment(content.to_string())))
    }

    /// Append `child` as the last child of `parent`
    ///
    /// Ignored when either id is out of range or the child is already attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() {
            return;
        }
        match self.get(child) {
            Some(node) if !node.parent.is_valid() => {}
            _ => return,
        }

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
    }

    /// Iterate the direct children of a node
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    /// Iterate all descendants of a node in document (pre-)order
    ///
    /// Walks sibling and parent links, so deep documents never grow the call
    /// stack.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            start: id,
            next: self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    /// Iterate ancestors from the parent up to the document node
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            out.push_str(text);
        }
        for (_, node) in self.descendants(id) {
            if let Some(text) = node.as_text() {
                out.push_str(text);
            }
        }
        out
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order iterator over the descendants of a node
pub struct Descendants<'a> {
    tree: &'a DomTree,
    start: NodeId,
    next: NodeId,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut cursor = id;
            loop {
                if cursor == self.start {
                    break NodeId::NONE;
                }
                let Some(current) = self.tree.get(cursor) else {
                    break NodeId::NONE;
                };
                if current.next_sibling.is_valid() {
                    break current.next_sibling;
                }
                cursor = current.parent;
                if !cursor.is_valid() || cursor == self.start {
                    break NodeId::NONE;
                }
            }
        };

        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        let p = tree.create_element("p");
        let text = tree.create_text("Hello");
        tree.append_child(tree.root(), html);
        tree.append_child(html, body);
        tree.append_child(body, p);
        tree.append_child(p, text);
        (tree, html, body, p, text)
    }

    #[test]
    fn test_append_and_children() {
        let (tree, html, body, _, _) = sample();
        let children: Vec<NodeId> = tree.children(html).map(|(id, _)| id).collect();
        assert_eq!(children, vec![body]);
        assert_eq!(tree.parent(body), Some(html));
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn test_descendants_pre_order() {
        let (mut tree, html, body, p, text) = sample();
        let footer = tree.create_element("footer");
        tree.append_child(body, footer);

        let order: Vec<NodeId> = tree.descendants(tree.root()).map(|(id, _)| id).collect();
        assert_eq!(order, vec![html, body, p, text, footer]);

        // Subtree walk stops at the subtree boundary
        let sub: Vec<NodeId> = tree.descendants(p).map(|(id, _)| id).collect();
        assert_eq!(sub, vec![text]);
    }

    #[test]
    fn test_reattach_is_ignored() {
        let (mut tree, html, body, p, _) = sample();
        tree.append_child(html, p);
        assert_eq!(tree.parent(p), Some(body));
    }

    #[test]
    fn test_ancestors_and_text() {
        let (tree, html, body, p, text) = sample();
        let chain: Vec<NodeId> = tree.ancestors(text).collect();
        assert_eq!(chain, vec![p, body, html, tree.root()]);
        assert_eq!(tree.text_content(body), "Hello");
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        let mut tree = DomTree::new();
        let mut parent = tree.root();
        for _ in 0..100_000 {
            let div = tree.create_element("div");
            tree.append_child(parent, div);
            parent = div;
        }
        assert_eq!(tree.descendants(tree.root()).count(), 100_000);
    }
}
