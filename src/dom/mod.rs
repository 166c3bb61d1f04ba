//! DOM Module - Arena-based HTML Document
//!
//! Implements the read-only document tree the extraction engine navigates:
//! - Arena allocation for nodes, parent links as indices (no ownership cycles)
//! - NodeId (u32) handles for cache-friendly traversal
//! - String interning for tag names, attributes and text
//! - A lenient HTML tree builder (`builder`)
//! - Structural navigation: resolve, path_of, child_at, find_ancestor (`navigate`)

pub mod builder;
pub mod document;
pub mod navigate;
pub mod node;
pub mod strings;

pub use builder::{ParseOptions, TreeBuilder};
pub use document::HtmlDocument;
pub use navigate::{
    child_at, child_position, find_ancestor, find_ancestor_until, path_of, resolve, root_of,
    TreeError,
};
pub use node::{HtmlAttribute, HtmlNode, NodeId, NodeKind};
pub use strings::StringPool;

/// Elements whose text never contributes to inner text
const NON_TEXT_ELEMENTS: [&str; 2] = ["SCRIPT", "STYLE"];

/// Trait for document access - the navigation surface every query works against.
///
/// Implementors provide arena access; everything else is derived. Implementations
/// must be immutable views: no method may change the tree.
pub trait DocumentAccess {
    /// Get root element ID (the topmost element, e.g. `HTML`)
    fn root_element_id(&self) -> Option<NodeId>;

    /// Get a node by ID
    fn get_node(&self, id: NodeId) -> Option<&HtmlNode>;

    /// Get the string pool for direct access
    fn strings(&self) -> &StringPool;

    /// Get attributes for an element
    fn attributes(&self, id: NodeId) -> &[HtmlAttribute];

    /// ID of the document node holding the root element
    fn document_node_id(&self) -> NodeId {
        0
    }

    /// Parent of a node, if any
    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|n| n.parent)
    }

    /// Check whether a node is an element
    fn is_element(&self, id: NodeId) -> bool {
        self.get_node(id).is_some_and(HtmlNode::is_element)
    }

    /// Upper-cased tag name of an element
    fn tag_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_element() {
            self.strings().get_str(node.name_id)
        } else {
            None
        }
    }

    /// Check an element's tag, ASCII case-insensitively
    fn has_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Get text content of a text node
    fn text_content(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_text() {
            self.strings().get_str(node.name_id)
        } else {
            None
        }
    }

    /// Get attribute value by name (ASCII case-insensitive)
    fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id).iter().find_map(|attr| {
            let attr_name = self.strings().get_str(attr.name_id)?;
            if attr_name.eq_ignore_ascii_case(name) {
                self.strings().get_str(attr.value_id)
            } else {
                None
            }
        })
    }

    /// All children (elements, text, comments) in document order
    fn children_vec(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut child = self.get_node(id).and_then(|n| n.first_child);
        while let Some(cid) = child {
            result.push(cid);
            child = self.get_node(cid).and_then(|n| n.next_sibling);
        }
        result
    }

    /// Element children in document order
    fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = self.children_vec(id);
        result.retain(|&c| self.is_element(c));
        result
    }

    /// All descendants in document order (depth-first, pre-order)
    fn descendants_vec(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children_vec(id).into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children_vec(current).into_iter().rev());
        }
        result
    }

    /// Trimmed inner text with whitespace runs collapsed to single spaces.
    ///
    /// `BR` counts as whitespace; `SCRIPT`/`STYLE` content is ignored.
    fn inner_text(&self, id: NodeId) -> String {
        if let Some(text) = self.text_content(id) {
            return collapse_whitespace(text);
        }

        let mut raw = String::new();
        let mut stack: Vec<NodeId> = self.children_vec(id).into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            if let Some(text) = self.text_content(current) {
                raw.push_str(text);
                continue;
            }
            match self.tag_name(current) {
                Some("BR") => raw.push(' '),
                Some(tag) if NON_TEXT_ELEMENTS.contains(&tag) => {}
                Some(_) => stack.extend(self.children_vec(current).into_iter().rev()),
                None => {}
            }
        }
        collapse_whitespace(&raw)
    }
}

/// Collapse sequences of Unicode whitespace (including U+00A0) into a single space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
