//! HTML Node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references. A node never
//! owns its neighbours: parent, children and siblings are arena indices.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of HTML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root (holds the root element and top-level comments)
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// Comment (kept only with `ParseOptions::keep_comments`)
    Comment,
}

/// An HTML node in the arena
#[derive(Debug, Clone)]
pub struct HtmlNode {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for the document node)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Index into string pool for the upper-cased tag (elements) or the content (text, comments)
    pub name_id: u32,
    /// Start of attributes in attribute arena (for elements)
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u16,
    /// Depth in document tree (document node is 0)
    pub depth: u16,
}

impl HtmlNode {
    fn with_kind(kind: NodeKind, name_id: u32, parent: Option<NodeId>, depth: u16) -> Self {
        HtmlNode {
            kind,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id,
            attr_start: 0,
            attr_count: 0,
            depth,
        }
    }

    /// Create a new document root node
    pub fn document() -> Self {
        Self::with_kind(NodeKind::Document, 0, None, 0)
    }

    /// Create a new element node
    pub fn element(name_id: u32, parent: NodeId, depth: u16) -> Self {
        Self::with_kind(NodeKind::Element, name_id, Some(parent), depth)
    }

    /// Create a new text node
    pub fn text(content_id: u32, parent: NodeId, depth: u16) -> Self {
        Self::with_kind(NodeKind::Text, content_id, Some(parent), depth)
    }

    /// Create a new comment node
    pub fn comment(content_id: u32, parent: NodeId, depth: u16) -> Self {
        Self::with_kind(NodeKind::Comment, content_id, Some(parent), depth)
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Check if this is a text node
    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Check if this node has children
    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

/// Stored attribute
#[derive(Debug, Clone, Copy)]
pub struct HtmlAttribute {
    /// Index into string pool for the lower-cased attribute name
    pub name_id: u32,
    /// Index into string pool for attribute value
    pub value_id: u32,
}

impl HtmlAttribute {
    pub fn new(name_id: u32, value_id: u32) -> Self {
        HtmlAttribute { name_id, value_id }
    }
}
