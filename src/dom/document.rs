//! HTML Document - Arena-based DOM representation
//!
//! Efficient DOM storage with:
//! - Arena allocation for nodes
//! - NodeId indices for traversal
//! - String interning for names and text
//!
//! A document is immutable once built. Node 0 is the document node; the root
//! element (usually `HTML`) is its first element child.

use super::builder::{ParseOptions, TreeBuilder};
use super::node::{HtmlAttribute, HtmlNode, NodeId};
use super::strings::StringPool;
use super::DocumentAccess;

/// An HTML document stored in arena format
#[derive(Debug)]
pub struct HtmlDocument {
    /// Arena of nodes
    nodes: Vec<HtmlNode>,
    /// Arena of attributes
    attributes: Vec<HtmlAttribute>,
    /// Interned strings
    strings: StringPool,
    /// Root element node ID (not document node)
    root_element: Option<NodeId>,
}

impl HtmlDocument {
    /// Parse an HTML document with default options.
    ///
    /// Parsing never fails: malformed markup is repaired the way browsers do.
    pub fn parse(html: &str) -> Self {
        Self::parse_with_options(html, ParseOptions::default())
    }

    /// Parse an HTML document with explicit options
    pub fn parse_with_options(html: &str, options: ParseOptions) -> Self {
        Self::parse_bytes(html.as_bytes(), options)
    }

    /// Parse raw bytes; invalid UTF-8 in text and attributes is replaced
    pub fn parse_bytes(input: &[u8], options: ParseOptions) -> Self {
        let doc = TreeBuilder::build(input, options);
        log::debug!(
            "parsed {} bytes into {} nodes ({} distinct strings)",
            input.len(),
            doc.nodes.len(),
            doc.strings.len()
        );
        doc
    }

    /// Start an empty document for loaders that already hold a parsed tree
    pub fn builder() -> TreeBuilder {
        TreeBuilder::new()
    }

    pub(crate) fn from_parts(
        nodes: Vec<HtmlNode>,
        attributes: Vec<HtmlAttribute>,
        strings: StringPool,
        root_element: Option<NodeId>,
    ) -> Self {
        HtmlDocument {
            nodes,
            attributes,
            strings,
            root_element,
        }
    }

    /// Get node count (including the document node)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the document node (index 0)
    pub fn document_node(&self) -> &HtmlNode {
        &self.nodes[0]
    }

    /// Get the root element
    pub fn root_element(&self) -> Option<&HtmlNode> {
        self.root_element.and_then(|id| self.nodes.get(id as usize))
    }

    /// Get root element tag name
    pub fn root_name(&self) -> Option<&str> {
        self.root_element.and_then(|id| self.tag_name(id))
    }

    /// Attribute value by name (case-insensitive)
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get_attribute(id, name)
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter {
            doc: self,
            next: first,
        }
    }

    /// Iterate over ancestors of a node, nearest first (excluding the node itself)
    pub fn ancestors(&self, id: NodeId) -> AncestorIter<'_> {
        AncestorIter {
            doc: self,
            next: self.parent_of(id),
        }
    }

    /// All element IDs with the given tag, in document order
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        (0..self.nodes.len() as NodeId)
            .filter(|&id| self.has_tag(id, tag))
            .collect()
    }
}

impl DocumentAccess for HtmlDocument {
    fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    fn get_node(&self, id: NodeId) -> Option<&HtmlNode> {
        self.nodes.get(id as usize)
    }

    fn strings(&self) -> &StringPool {
        &self.strings
    }

    fn attributes(&self, id: NodeId) -> &[HtmlAttribute] {
        self.get_node(id)
            .and_then(|node| {
                let start = node.attr_start as usize;
                let end = start + node.attr_count as usize;
                self.attributes.get(start..end)
            })
            .unwrap_or(&[])
    }
}

/// Iterator over child nodes
pub struct ChildIter<'a> {
    doc: &'a HtmlDocument,
    next: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over ancestors, nearest first
pub struct AncestorIter<'a> {
    doc: &'a HtmlDocument,
    next: Option<NodeId>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.parent_of(current);
        Some(current)
    }
}
