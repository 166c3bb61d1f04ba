//! Structural navigation
//!
//! Moves between nodes and structural paths. A path is always relative to the
//! topmost element of the tree (usually `HTML`): its first segment selects a
//! child of that element, so `resolve(root_of(n), path_of(n)) == n`.
//!
//! Sibling indices count element children with the same tag only; text and
//! comment nodes never shift a position.

use super::node::NodeId;
use super::DocumentAccess;
use crate::path::{PathSegment, StructuralPath};
use thiserror::Error;

/// Navigation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("no element at `{path}`: segment {depth} (`{segment}`) does not exist")]
    PathNotFound {
        path: String,
        depth: usize,
        segment: String,
    },

    #[error("no `{tag}` child at index {index}")]
    ChildNotFound { tag: String, index: usize },
}

/// Follow `path` down from `root`
pub fn resolve<D: DocumentAccess + ?Sized>(
    doc: &D,
    root: NodeId,
    path: &StructuralPath,
) -> Result<NodeId, TreeError> {
    let mut current = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        current = child_at(doc, current, segment.tag(), segment.index()).map_err(|_| {
            log::debug!("resolving {} stopped at segment {} ({})", path, depth, segment);
            TreeError::PathNotFound {
                path: path.to_string(),
                depth,
                segment: segment.to_string(),
            }
        })?;
    }
    Ok(current)
}

/// Path from the topmost element down to `node`.
///
/// None for the topmost element itself, for the document node and for
/// non-element nodes.
pub fn path_of<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> Option<StructuralPath> {
    if !doc.is_element(node) {
        return None;
    }

    let mut segments = Vec::new();
    let mut current = node;
    while let Some(parent) = doc.parent_of(current) {
        if !doc.is_element(parent) {
            break;
        }
        let tag = doc.tag_name(current)?;
        segments.push(PathSegment::new(tag, child_position(doc, current)).ok()?);
        current = parent;
    }
    segments.reverse();
    StructuralPath::from_segments(segments)
}

/// Topmost element above (or at) `node`
pub fn root_of<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> Option<NodeId> {
    doc.get_node(node)?;
    let mut current = node;
    while let Some(parent) = doc.parent_of(current) {
        if !doc.is_element(parent) {
            break;
        }
        current = parent;
    }
    doc.is_element(current).then_some(current)
}

/// Index of `node` among its parent's element children with the same tag.
///
/// 0 for a node without parent.
pub fn child_position<D: DocumentAccess + ?Sized>(doc: &D, node: NodeId) -> usize {
    let Some(tag) = doc.tag_name(node) else {
        return 0;
    };
    let mut position = 0;
    let mut sibling = doc.get_node(node).and_then(|n| n.prev_sibling);
    while let Some(id) = sibling {
        if doc.tag_name(id) == Some(tag) {
            position += 1;
        }
        sibling = doc.get_node(id).and_then(|n| n.prev_sibling);
    }
    position
}

/// The `index`-th direct element child of `parent` with tag `tag` (case-insensitive)
pub fn child_at<D: DocumentAccess + ?Sized>(
    doc: &D,
    parent: NodeId,
    tag: &str,
    index: usize,
) -> Result<NodeId, TreeError> {
    doc.element_children(parent)
        .into_iter()
        .filter(|&child| doc.has_tag(child, tag))
        .nth(index)
        .ok_or_else(|| TreeError::ChildNotFound {
            tag: tag.to_ascii_uppercase(),
            index,
        })
}

/// Nearest element ancestor (excluding `node`) satisfying `matches`
pub fn find_ancestor<D, P>(doc: &D, node: NodeId, matches: P) -> Option<NodeId>
where
    D: DocumentAccess + ?Sized,
    P: FnMut(NodeId) -> bool,
{
    find_ancestor_until(doc, node, matches, |_| false)
}

/// Like [`find_ancestor`], but gives up at the first ancestor satisfying `abort`.
///
/// An ancestor satisfying both predicates is a match.
pub fn find_ancestor_until<D, P, A>(
    doc: &D,
    node: NodeId,
    mut matches: P,
    mut abort: A,
) -> Option<NodeId>
where
    D: DocumentAccess + ?Sized,
    P: FnMut(NodeId) -> bool,
    A: FnMut(NodeId) -> bool,
{
    let mut current = doc.parent_of(node);
    while let Some(id) = current {
        if !doc.is_element(id) {
            return None;
        }
        if matches(id) {
            return Some(id);
        }
        if abort(id) {
            return None;
        }
        current = doc.parent_of(id);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlDocument;
    use proptest::prelude::*;

    const PAGE: &str = "<html><body>\
        <div id=a>x</div>\
        <p>text</p>\
        <div id=b><span>1</span>text<span>2</span>\
        <center><table><tr><td id=c>z</td></tr></table></center></div>\
        </body></html>";

    fn by_id(doc: &HtmlDocument, id: &str) -> NodeId {
        doc.descendants_vec(doc.document_node_id())
            .into_iter()
            .find(|&n| doc.get_attribute(n, "id") == Some(id))
            .expect("element with id")
    }

    #[test]
    fn test_resolve() {
        let doc = HtmlDocument::parse(PAGE);
        let root = doc.root_element_id().expect("root");
        let path = StructuralPath::parse("/BODY[0]/DIV[1]").expect("path");
        assert_eq!(resolve(&doc, root, &path), Ok(by_id(&doc, "b")));
    }

    #[test]
    fn test_resolve_not_found() {
        let doc = HtmlDocument::parse(PAGE);
        let root = doc.root_element_id().expect("root");
        let path = StructuralPath::parse("/BODY[0]/DIV[2]/SPAN[0]").expect("path");
        assert_eq!(
            resolve(&doc, root, &path),
            Err(TreeError::PathNotFound {
                path: "/BODY[0]/DIV[2]/SPAN[0]".to_string(),
                depth: 1,
                segment: "DIV[2]".to_string(),
            })
        );
    }

    #[test]
    fn test_path_of() {
        let doc = HtmlDocument::parse(PAGE);
        let td = by_id(&doc, "c");
        let path = path_of(&doc, td).expect("path");
        assert_eq!(
            path.to_string(),
            "/BODY[0]/DIV[1]/CENTER[0]/TABLE[0]/TBODY[0]/TR[0]/TD[0]"
        );
        assert_eq!(root_of(&doc, td), doc.root_element_id());
    }

    #[test]
    fn test_path_of_root_and_non_elements() {
        let doc = HtmlDocument::parse(PAGE);
        let root = doc.root_element_id().expect("root");
        assert_eq!(path_of(&doc, root), None);
        assert_eq!(path_of(&doc, doc.document_node_id()), None);
        let text = doc.children_vec(by_id(&doc, "a"))[0];
        assert_eq!(path_of(&doc, text), None);
        assert_eq!(root_of(&doc, text), Some(root));
        assert_eq!(root_of(&doc, doc.document_node_id()), None);
    }

    #[test]
    fn test_child_position_ignores_text_and_other_tags() {
        let doc = HtmlDocument::parse(PAGE);
        let div_b = by_id(&doc, "b");
        let spans: Vec<_> = doc
            .element_children(div_b)
            .into_iter()
            .filter(|&n| doc.has_tag(n, "SPAN"))
            .collect();
        assert_eq!(child_position(&doc, spans[0]), 0);
        assert_eq!(child_position(&doc, spans[1]), 1);
        assert_eq!(child_position(&doc, div_b), 1);
        assert_eq!(child_position(&doc, doc.root_element_id().expect("root")), 0);
        assert_eq!(child_position(&doc, doc.document_node_id()), 0);
    }

    #[test]
    fn test_child_at() {
        let doc = HtmlDocument::parse(PAGE);
        let div_b = by_id(&doc, "b");
        let second = child_at(&doc, div_b, "span", 1).expect("second span");
        assert_eq!(doc.inner_text(second), "2");
        assert_eq!(
            child_at(&doc, div_b, "span", 2),
            Err(TreeError::ChildNotFound {
                tag: "SPAN".to_string(),
                index: 2
            })
        );
        // Direct children only
        assert!(child_at(&doc, div_b, "TD", 0).is_err());
    }

    #[test]
    fn test_find_ancestor() {
        let doc = HtmlDocument::parse(PAGE);
        let td = by_id(&doc, "c");
        let div = find_ancestor(&doc, td, |n| doc.has_tag(n, "DIV"));
        assert_eq!(div, Some(by_id(&doc, "b")));
        assert_eq!(find_ancestor(&doc, td, |n| doc.has_tag(n, "TD")), None);
        assert_eq!(find_ancestor(&doc, td, |n| doc.has_tag(n, "FORM")), None);
    }

    #[test]
    fn test_find_ancestor_until_aborts() {
        let doc = HtmlDocument::parse(PAGE);
        let td = by_id(&doc, "c");
        let center = find_ancestor_until(
            &doc,
            td,
            |n| doc.has_tag(n, "CENTER"),
            |n| doc.has_tag(n, "TABLE"),
        );
        assert_eq!(center, None);

        let center = find_ancestor_until(
            &doc,
            td,
            |n| doc.has_tag(n, "CENTER"),
            |n| doc.has_tag(n, "BODY"),
        );
        assert!(center.is_some_and(|n| doc.has_tag(n, "CENTER")));
    }

    #[test]
    fn test_match_wins_over_abort_on_same_ancestor() {
        let doc = HtmlDocument::parse(PAGE);
        let td = by_id(&doc, "c");
        let is_row = |n| doc.has_tag(n, "TR");
        let found = find_ancestor_until(&doc, td, is_row, is_row);
        assert!(found.is_some());
    }

    fn fragment_strategy() -> impl Strategy<Value = String> {
        let leaf = "[a-z ]{0,4}".prop_map(|text| text);
        leaf.prop_recursive(4, 48, 4, |inner| {
            (
                prop::sample::select(vec!["div", "span", "b", "em", "section"]),
                prop::collection::vec(inner, 0..4),
            )
                .prop_map(|(tag, children)| format!("<{tag}>{}</{tag}>", children.concat()))
        })
    }

    proptest! {
        #[test]
        fn test_resolve_path_of_round_trip(body in fragment_strategy()) {
            let doc = HtmlDocument::parse(&format!("<html><body>{}</body></html>", body));
            let root = doc.root_element_id();
            prop_assert!(root.is_some());
            let root = root.unwrap_or_default();

            for node in doc.descendants_vec(root) {
                if !doc.is_element(node) {
                    continue;
                }
                let path = path_of(&doc, node);
                prop_assert!(path.is_some());
                if let Some(path) = path {
                    prop_assert_eq!(root_of(&doc, node), Some(root));
                    prop_assert_eq!(resolve(&doc, root, &path), Ok(node));
                }
            }
        }
    }
}
