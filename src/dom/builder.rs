//! Tree Builder - lenient HTML tree construction
//!
//! Builds the arena from reader events, repairing the structure the way
//! browsers do for the markup found on scraped pages:
//! - Void elements (`BR`, `IMG`, ...) never take children
//! - `TD`/`TH` close an open cell, `TR` closes an open row, row groups close
//!   an open row group, `P`/`LI`/`OPTION`/`DT`/`DD` close a same-kind sibling
//! - A row directly inside `TABLE` gets a synthesized `TBODY`
//! - An end tag closes everything above its match; unmatched end tags are ignored
//!
//! Tag names are stored upper-cased and attribute names lower-cased.
//! The rule-free methods (`open_element`, `close_element`, `text`, ...) let
//! loaders that already have a tree feed it in verbatim.

use super::document::HtmlDocument;
use super::node::{HtmlAttribute, HtmlNode, NodeId};
use super::strings::StringPool;
use crate::reader::events::{HtmlEvent, StartElement};
use crate::reader::slice::SliceReader;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Elements that never have content
const VOID_ELEMENTS: [&str; 14] = [
    "AREA", "BASE", "BR", "COL", "EMBED", "HR", "IMG", "INPUT", "LINK", "META", "PARAM",
    "SOURCE", "TRACK", "WBR",
];

const ROW_GROUPS: [&str; 3] = ["TBODY", "THEAD", "TFOOT"];

/// Elements whose start closes an open `P`
const CLOSES_PARAGRAPH: [&str; 16] = [
    "P", "DIV", "UL", "OL", "DL", "PRE", "BLOCKQUOTE", "FORM", "HR", "H1", "H2", "H3", "H4",
    "H5", "H6", "ADDRESS",
];

/// Text directly inside these is dropped when it is whitespace only
const TABLE_STRUCTURE: [&str; 5] = ["TABLE", "TBODY", "THEAD", "TFOOT", "TR"];

/// Options controlling tree construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Wrap rows that appear directly inside `TABLE` in a synthesized `TBODY`
    pub implicit_tbody: bool,
    /// Keep comment nodes in the tree
    pub keep_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            implicit_tbody: true,
            keep_comments: false,
        }
    }
}

/// Incremental builder for an [`HtmlDocument`]
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<HtmlNode>,
    attributes: Vec<HtmlAttribute>,
    strings: StringPool,
    root_element: Option<NodeId>,
    /// Open elements, innermost last; index 0 is always the document node
    stack: Vec<NodeId>,
    options: ParseOptions,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Create a builder with default options
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    /// Create a builder with the given options
    pub fn with_options(options: ParseOptions) -> Self {
        let mut nodes = Vec::with_capacity(256);
        nodes.push(HtmlNode::document());
        TreeBuilder {
            nodes,
            attributes: Vec::new(),
            strings: StringPool::new(),
            root_element: None,
            stack: vec![0],
            options,
        }
    }

    /// Build a document from raw HTML bytes
    pub fn build(input: &[u8], options: ParseOptions) -> HtmlDocument {
        let mut builder = TreeBuilder::with_options(options);
        for event in SliceReader::new(input) {
            match event {
                // Browsers ignore the self-closing flag on non-void elements
                HtmlEvent::StartElement(elem) | HtmlEvent::EmptyElement(elem) => {
                    if let Some(name) = elem.name_str() {
                        let attrs = event_attributes(&elem);
                        builder.start_tag(name, attrs.iter().map(|(n, v)| (&**n, &**v)));
                    }
                }
                HtmlEvent::EndElement(elem) => {
                    if let Some(name) = elem.name_str() {
                        builder.end_tag(name);
                    }
                }
                HtmlEvent::Text(text) => {
                    builder.text(&String::from_utf8_lossy(&text));
                }
                HtmlEvent::Comment(content) => {
                    if builder.options.keep_comments {
                        builder.comment(&String::from_utf8_lossy(&content));
                    }
                }
                HtmlEvent::DocType(_) | HtmlEvent::EndDocument => {}
            }
        }
        builder.finish()
    }

    /// Options this builder was created with
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// The innermost open node (the document node when nothing is open)
    pub fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(0)
    }

    /// Number of nodes created so far, including the document node
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ------------------------------------------------------------------
    // Rule-free construction
    // ------------------------------------------------------------------

    /// Append an element to the current node and make it current
    pub fn open_element<'a, I>(&mut self, tag: &str, attributes: I) -> NodeId
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let id = self.insert_element(tag, attributes);
        self.stack.push(id);
        id
    }

    /// Append an element to the current node without opening it
    pub fn leaf_element<'a, I>(&mut self, tag: &str, attributes: I) -> NodeId
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.insert_element(tag, attributes)
    }

    /// Close the current element, returning it. The document node is never closed.
    pub fn close_element(&mut self) -> Option<NodeId> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Append text to the current node, merging with a preceding text sibling
    pub fn text(&mut self, content: &str) -> Option<NodeId> {
        if content.is_empty() {
            return None;
        }
        let parent = self.current();
        if content.trim().is_empty() && self.current_tag_in(&TABLE_STRUCTURE) {
            return None;
        }

        if let Some(last) = self.nodes[parent as usize].last_child {
            if self.nodes[last as usize].is_text() {
                let merged = {
                    let existing = self.strings.get_str(self.nodes[last as usize].name_id);
                    format!("{}{}", existing.unwrap_or_default(), content)
                };
                self.nodes[last as usize].name_id = self.strings.intern(&merged);
                return Some(last);
            }
        }

        let content_id = self.strings.intern(content);
        let node = HtmlNode::text(content_id, parent, self.depth());
        Some(self.push_node(parent, node))
    }

    /// Append a comment to the current node
    pub fn comment(&mut self, content: &str) -> NodeId {
        let parent = self.current();
        let content_id = self.strings.intern(content);
        let node = HtmlNode::comment(content_id, parent, self.depth());
        self.push_node(parent, node)
    }

    /// Finish building and return the immutable document
    pub fn finish(self) -> HtmlDocument {
        HtmlDocument::from_parts(self.nodes, self.attributes, self.strings, self.root_element)
    }

    // ------------------------------------------------------------------
    // HTML rules
    // ------------------------------------------------------------------

    /// Handle a start tag, applying implicit closes and void elements
    pub fn start_tag<'a, I>(&mut self, tag: &str, attributes: I) -> NodeId
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let tag = tag.to_ascii_uppercase();
        match tag.as_str() {
            "TD" | "TH" => {
                self.close_open(&["TD", "TH"], &["TR", "TABLE"]);
                self.ensure_row();
            }
            "TR" => {
                self.close_open(&["TR"], &["TABLE"]);
                self.ensure_row_group();
            }
            "TBODY" | "THEAD" | "TFOOT" => {
                if let Some(table) = self.open_index(&["TABLE"], &[]) {
                    self.pop_to(table + 1);
                }
            }
            "LI" => self.close_open(&["LI"], &["UL", "OL", "TD", "TH"]),
            "DT" | "DD" => self.close_open(&["DT", "DD"], &["DL", "TD", "TH"]),
            "OPTION" => self.close_open(&["OPTION"], &["SELECT"]),
            _ => {}
        }
        if CLOSES_PARAGRAPH.contains(&tag.as_str()) {
            self.close_open(&["P"], &["TD", "TH", "TABLE", "BUTTON"]);
        }

        if VOID_ELEMENTS.contains(&tag.as_str()) {
            self.leaf_element(&tag, attributes)
        } else if tag == "HTML" && self.current() == 0 {
            let html = self.open_element(&tag, attributes);
            self.adopt_strays(html);
            html
        } else {
            self.open_element(&tag, attributes)
        }
    }

    /// Handle an end tag. Returns false when it matched no open element.
    pub fn end_tag(&mut self, tag: &str) -> bool {
        let tag = tag.to_ascii_uppercase();
        // Content after </body> or </html> still belongs inside them
        if VOID_ELEMENTS.contains(&tag.as_str()) || tag == "HTML" || tag == "BODY" {
            return false;
        }

        let boundary: &[&str] = match tag.as_str() {
            "TABLE" => &[],
            "TD" | "TH" | "TR" | "TBODY" | "THEAD" | "TFOOT" => &["TABLE"],
            _ => &["TD", "TH", "TABLE"],
        };
        match self.open_index(&[tag.as_str()], boundary) {
            Some(index) => {
                self.pop_to(index);
                true
            }
            None => {
                log::trace!("ignoring unmatched end tag </{}>", tag);
                false
            }
        }
    }

    /// Move elements that appeared before `<html>` into it, ahead of its own content
    fn adopt_strays(&mut self, html: NodeId) {
        let mut kept = Vec::new();
        let mut strays = Vec::new();
        let mut child = self.nodes[0].first_child;
        while let Some(id) = child {
            child = self.nodes[id as usize].next_sibling;
            if id != html && self.nodes[id as usize].is_element() {
                strays.push(id);
            } else {
                kept.push(id);
            }
        }
        if strays.is_empty() {
            return;
        }
        log::trace!("moving {} element(s) before <HTML> into it", strays.len());

        self.nodes[0].first_child = None;
        self.nodes[0].last_child = None;
        for id in kept {
            self.unlink(id);
            self.link_child(0, id);
        }
        for id in strays {
            self.unlink(id);
            self.nodes[id as usize].parent = Some(html);
            self.link_child(html, id);
            self.shift_depth(id);
        }
        self.root_element = Some(html);
    }

    fn unlink(&mut self, id: NodeId) {
        let node = &mut self.nodes[id as usize];
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    fn shift_depth(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let node = &mut self.nodes[id as usize];
            node.depth = node.depth.saturating_add(1);
            let mut child = node.first_child;
            while let Some(c) = child {
                pending.push(c);
                child = self.nodes[c as usize].next_sibling;
            }
        }
    }

    /// Synthesize the row (and row group) a cell needs
    fn ensure_row(&mut self) {
        if self.current_tag_in(&["TABLE"]) {
            self.ensure_row_group();
        }
        if self.current_tag_in(&ROW_GROUPS) || self.current_tag_in(&["TABLE"]) {
            log::trace!("synthesizing TR for cell");
            self.open_element("TR", std::iter::empty());
        }
    }

    /// Synthesize a `TBODY` when a row starts directly inside `TABLE`
    fn ensure_row_group(&mut self) {
        if self.options.implicit_tbody && self.current_tag_in(&["TABLE"]) {
            log::trace!("synthesizing TBODY for row");
            self.open_element("TBODY", std::iter::empty());
        }
    }

    /// Close the innermost open element in `targets`, unless a `boundary` element is hit first
    fn close_open(&mut self, targets: &[&str], boundary: &[&str]) {
        if let Some(index) = self.open_index(targets, boundary) {
            self.pop_to(index);
        }
    }

    /// Stack index of the innermost open element in `targets`
    fn open_index(&self, targets: &[&str], boundary: &[&str]) -> Option<usize> {
        for (index, &id) in self.stack.iter().enumerate().skip(1).rev() {
            let tag = self.tag_of(id);
            if targets.contains(&tag) {
                return Some(index);
            }
            if boundary.contains(&tag) {
                return None;
            }
        }
        None
    }

    /// Close the element at stack `index` and everything above it
    fn pop_to(&mut self, index: usize) {
        let index = index.max(1);
        if index < self.stack.len() {
            if self.stack.len() - index > 1 {
                log::trace!(
                    "implicitly closing {} element(s) above <{}>",
                    self.stack.len() - index - 1,
                    self.tag_of(self.stack[index])
                );
            }
            self.stack.truncate(index);
        }
    }

    fn current_tag_in(&self, tags: &[&str]) -> bool {
        let current = self.current();
        current != 0 && tags.contains(&self.tag_of(current))
    }

    fn tag_of(&self, id: NodeId) -> &str {
        self.nodes
            .get(id as usize)
            .and_then(|n| self.strings.get_str(n.name_id))
            .unwrap_or_default()
    }

    fn depth(&self) -> u16 {
        u16::try_from(self.stack.len()).unwrap_or(u16::MAX)
    }

    fn insert_element<'a, I>(&mut self, tag: &str, attributes: I) -> NodeId
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let parent = self.current();
        let name_id = self.strings.intern(&tag.to_ascii_uppercase());
        let mut node = HtmlNode::element(name_id, parent, self.depth());

        let attr_start = self.attributes.len();
        for (name, value) in attributes {
            let name_id = self.strings.intern(&name.to_ascii_lowercase());
            // First occurrence wins
            if self.attributes[attr_start..].iter().any(|a| a.name_id == name_id) {
                continue;
            }
            let value_id = self.strings.intern(value);
            self.attributes.push(HtmlAttribute::new(name_id, value_id));
        }
        node.attr_start = attr_start as u32;
        node.attr_count = u16::try_from(self.attributes.len() - attr_start).unwrap_or(u16::MAX);

        let id = self.push_node(parent, node);
        if parent == 0 && self.root_element.is_none() {
            self.root_element = Some(id);
        }
        id
    }

    fn push_node(&mut self, parent: NodeId, node: HtmlNode) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        self.link_child(parent, id);
        id
    }

    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let last_child_opt = self.nodes[parent_id as usize].last_child;

        if let Some(last_child_id) = last_child_opt {
            self.nodes[child_id as usize].prev_sibling = Some(last_child_id);
            self.nodes[last_child_id as usize].next_sibling = Some(child_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
    }
}

fn event_attributes<'e>(elem: &'e StartElement<'_>) -> Vec<(Cow<'e, str>, Cow<'e, str>)> {
    elem.attributes
        .iter()
        .map(|a| {
            (
                String::from_utf8_lossy(a.name.as_ref()),
                String::from_utf8_lossy(a.value.as_ref()),
            )
        })
        .collect()
}
