//! OAA DOM - Document Object Model
//!
//! Arena-allocated DOM tree. Nodes are stored in creation order, which for
//! parsed documents is document order, and referenced by [`NodeId`].

mod document;
mod node;
mod tree;

pub use document::{Document, normalize_space};
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use tree::{Children, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for a missing link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this id refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index of the node
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
