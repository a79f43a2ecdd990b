//! DOM operations adapter.
//!
//! Thin wrappers over the `dom_query` crate plus the tree primitives the
//! extraction passes are built from: element-order traversal, manual
//! element-sibling walks, phrasing-content and visibility tests, and node
//! moves. Keeping every `dom_query` call behind this module keeps the
//! algorithm code free of selection plumbing.

pub use dom_query::{Document, NodeId, NodeRef, Selection};
pub use tendril::StrTendril;

use crate::patterns::{
    DIV_TO_P_ELEMS, HAS_CONTENT, PHRASING_ELEMS, STYLE_DISPLAY_NONE, STYLE_VISIBILITY_HIDDEN,
};

// === Parsing ===

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Total number of elements in the document.
#[must_use]
pub fn element_count(doc: &Document) -> usize {
    doc.select("*").length()
}

// === Attribute Operations ===

/// Get an attribute value from a node.
#[inline]
#[must_use]
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.attr(name).map(|s| s.to_string())
}

/// Set an attribute value on a node.
#[inline]
pub fn set_attribute(node: &NodeRef, name: &str, value: &str) {
    node.set_attr(name, value);
}

/// Remove an attribute from a node.
#[inline]
pub fn remove_attribute(node: &NodeRef, name: &str) {
    node.remove_attr(name);
}

/// Check whether a node carries an attribute.
#[inline]
#[must_use]
pub fn has_attribute(node: &NodeRef, name: &str) -> bool {
    node.has_attr(name)
}

/// Get all attributes of a node as ordered key-value pairs.
#[must_use]
pub fn get_all_attributes(node: &NodeRef) -> Vec<(String, String)> {
    node.attrs()
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect()
}

/// The `class` attribute, or empty.
#[inline]
#[must_use]
pub fn class_name(node: &NodeRef) -> String {
    get_attribute(node, "class").unwrap_or_default()
}

/// The `id` attribute, or empty.
#[inline]
#[must_use]
pub fn element_id(node: &NodeRef) -> String {
    get_attribute(node, "id").unwrap_or_default()
}

/// Class and id joined with a space; the match string for the class-based
/// heuristics.
#[must_use]
pub fn class_and_id(node: &NodeRef) -> String {
    format!("{} {}", class_name(node), element_id(node))
}

// === Tag/Node Information ===

/// Lowercased tag name of an element node.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.node_name().map(|t| t.to_lowercase())
}

/// Check whether an element has the given (lowercase) tag name.
#[must_use]
pub fn is_tag(node: &NodeRef, tag: &str) -> bool {
    tag_name(node).is_some_and(|t| t == tag)
}

// === Text and HTML Content ===

/// All text content of a node and its descendants.
#[inline]
#[must_use]
pub fn text_content(node: &NodeRef) -> StrTendril {
    node.text()
}

/// Inner HTML of a node.
#[inline]
#[must_use]
pub fn inner_html(node: &NodeRef) -> StrTendril {
    Selection::from(node.clone()).inner_html()
}

/// Outer HTML of a node.
#[inline]
#[must_use]
pub fn outer_html(node: &NodeRef) -> StrTendril {
    Selection::from(node.clone()).html()
}

// === Tree Navigation ===

/// All child nodes, including text and comment nodes.
#[must_use]
pub fn child_nodes<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut children = Vec::new();
    let mut child = node.first_child();
    while let Some(c) = child {
        child = c.next_sibling();
        children.push(c);
    }
    children
}

/// Direct element children only.
#[must_use]
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    child_nodes(node).into_iter().filter(NodeRef::is_element).collect()
}

/// First element child, skipping text nodes.
#[must_use]
pub fn first_element_child<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut child = node.first_child();
    while let Some(c) = child {
        if c.is_element() {
            return Some(c);
        }
        child = c.next_sibling();
    }
    None
}

/// Next element sibling, skipping text nodes.
#[must_use]
pub fn next_element_sibling<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.next_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            return Some(s);
        }
        sibling = s.next_sibling();
    }
    None
}

/// Previous element sibling, skipping text nodes.
#[must_use]
pub fn previous_element_sibling<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let mut sibling = node.prev_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            return Some(s);
        }
        sibling = s.prev_sibling();
    }
    None
}

/// Ancestors of a node, nearest first. `max_depth` of 0 walks to the root.
#[must_use]
pub fn node_ancestors<'a>(node: &NodeRef<'a>, max_depth: usize) -> Vec<NodeRef<'a>> {
    let mut ancestors = Vec::new();
    let mut current = node.parent();
    while let Some(parent) = current {
        if !parent.is_element() {
            break;
        }
        ancestors.push(parent.clone());
        if max_depth > 0 && ancestors.len() == max_depth {
            break;
        }
        current = parent.parent();
    }
    ancestors
}

/// Check whether a node has an ancestor with the given tag, optionally
/// filtered. A positive `max_depth` bounds the walk (ancestors at depth
/// `0..=max_depth` are examined); zero or negative walks to the root.
#[must_use]
pub fn has_ancestor_tag(
    node: &NodeRef,
    tag: &str,
    max_depth: i32,
    filter: Option<&dyn Fn(&NodeRef) -> bool>,
) -> bool {
    let mut depth = 0i32;
    let mut current = node.parent();
    while let Some(parent) = current {
        if max_depth > 0 && depth > max_depth {
            return false;
        }
        if is_tag(&parent, tag) && filter.is_none_or(|f| f(&parent)) {
            return true;
        }
        current = parent.parent();
        depth += 1;
    }
    false
}

/// First node at or after `node` in the sibling list that is an element or
/// a text node with visible content.
#[must_use]
pub fn next_meaningful_node<'a>(mut node: Option<NodeRef<'a>>) -> Option<NodeRef<'a>> {
    while let Some(n) = node {
        if n.is_element() || !n.text().trim().is_empty() {
            return Some(n);
        }
        node = n.next_sibling();
    }
    None
}

// === Element-Order Traversal ===

/// Next element in document order. With `ignore_self_and_kids` the walk
/// skips the node's own subtree, moving to its sibling or an ancestor's.
#[must_use]
pub fn next_element<'a>(node: &NodeRef<'a>, ignore_self_and_kids: bool) -> Option<NodeRef<'a>> {
    if !ignore_self_and_kids {
        if let Some(first) = first_element_child(node) {
            return Some(first);
        }
    }
    if let Some(sibling) = next_element_sibling(node) {
        return Some(sibling);
    }
    let mut current = node.parent();
    while let Some(parent) = current {
        if let Some(sibling) = next_element_sibling(&parent) {
            return Some(sibling);
        }
        current = parent.parent();
    }
    None
}

/// Remove a node and return the next element in document order, skipping
/// the removed subtree.
pub fn remove_and_get_next<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    let next = next_element(node, true);
    node.remove_from_parent();
    next
}

/// All element descendants of a node in document order, excluding the node.
#[must_use]
pub fn descendant_elements<'a>(root: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeRef<'a>> = element_children(root);
    stack.reverse();
    while let Some(node) = stack.pop() {
        out.push(node.clone());
        let mut kids = element_children(&node);
        kids.reverse();
        stack.extend(kids);
    }
    out
}

/// Element descendants with one of the given tag names, in document order.
///
/// Implemented as a fresh tree walk so results stay correct right after
/// subtree mutation.
#[must_use]
pub fn get_elements_by_tags<'a>(root: &NodeRef<'a>, tags: &[&str]) -> Vec<NodeRef<'a>> {
    descendant_elements(root)
        .into_iter()
        .filter(|n| tag_name(n).is_some_and(|t| tags.contains(&t.as_str())))
        .collect()
}

// === Tree Manipulation ===

/// Create a detached element in the document's arena.
#[inline]
#[must_use]
pub fn create_element<'a>(doc: &'a Document, tag: &str) -> NodeRef<'a> {
    doc.tree.new_element(tag)
}

/// Move `child` to the end of `parent`'s child list.
#[inline]
pub fn append_child(parent: &NodeRef, child: &NodeRef) {
    parent.append_child(child);
}

/// Insert `new_node` immediately before `reference`.
#[inline]
pub fn insert_before(reference: &NodeRef, new_node: &NodeRef) {
    reference.insert_before(new_node);
}

/// Replace `old` with `new_node`, detaching `old` from the tree.
pub fn replace_node(old: &NodeRef, new_node: &NodeRef) {
    old.insert_before(new_node);
    old.remove_from_parent();
}

/// Rename an element in place, keeping identity, attributes, and children.
#[inline]
pub fn set_node_tag(node: &NodeRef, tag: &str) {
    Selection::from(node.clone()).rename(tag);
}

// === Structural Tests ===

/// Whitespace node: an empty-text text node or a `<br>` element.
#[must_use]
pub fn is_whitespace(node: &NodeRef) -> bool {
    if node.is_text() {
        return node.text().trim().is_empty();
    }
    node.is_element() && is_tag(node, "br")
}

/// Phrasing content: text, an inline-whitelist element, or an
/// `a`/`del`/`ins` element all of whose children are phrasing.
#[must_use]
pub fn is_phrasing_content(node: &NodeRef) -> bool {
    if node.is_text() {
        return true;
    }
    let Some(tag) = tag_name(node) else {
        return false;
    };
    if PHRASING_ELEMS.contains(&tag.as_str()) {
        return true;
    }
    matches!(tag.as_str(), "a" | "del" | "ins")
        && child_nodes(node).iter().all(is_phrasing_content)
}

/// An element with no visible text and no children besides `<br>`/`<hr>`.
#[must_use]
pub fn is_element_without_content(node: &NodeRef) -> bool {
    if !node.is_element() {
        return false;
    }
    if !node.text().trim().is_empty() {
        return false;
    }
    let children = element_children(node);
    children.is_empty()
        || children.len() == get_elements_by_tags(node, &["br", "hr"]).len()
}

/// Whether an element has exactly one element child with the given tag and
/// no significant text nodes of its own.
#[must_use]
pub fn has_single_tag_inside_element(node: &NodeRef, tag: &str) -> bool {
    let children = element_children(node);
    if children.len() != 1 || !is_tag(&children[0], tag) {
        return false;
    }
    !child_nodes(node)
        .iter()
        .any(|child| child.is_text() && HAS_CONTENT.is_match(&child.text()))
}

/// Whether an element (or any descendant) contains a block-level child.
#[must_use]
pub fn has_child_block_element(node: &NodeRef) -> bool {
    child_nodes(node).iter().any(|child| {
        child.is_element()
            && (tag_name(child).is_some_and(|t| DIV_TO_P_ELEMS.contains(&t.as_str()))
                || has_child_block_element(child))
    })
}

/// Whether a node is an `<img>`, or wraps exactly one via single-child
/// elements with no meaningful text anywhere on the path.
#[must_use]
pub fn is_single_image(node: &NodeRef) -> bool {
    let mut current = node.clone();
    loop {
        if is_tag(&current, "img") {
            return true;
        }
        let children = element_children(&current);
        if children.len() != 1 || !current.text().trim().is_empty() {
            return false;
        }
        current = children[0].clone();
    }
}

/// Visibility heuristic: inline styles, the `hidden` attribute, and
/// `aria-hidden` (with a carve-out for fallback images).
#[must_use]
pub fn is_probably_visible(node: &NodeRef) -> bool {
    if let Some(style) = get_attribute(node, "style") {
        if STYLE_DISPLAY_NONE.is_match(&style) || STYLE_VISIBILITY_HIDDEN.is_match(&style) {
            return false;
        }
    }
    if has_attribute(node, "hidden") {
        return false;
    }
    if get_attribute(node, "aria-hidden").is_some_and(|v| v == "true")
        && !class_name(node).contains("fallback-image")
    {
        return false;
    }
    true
}
