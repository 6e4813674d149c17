//! Shared DOM helpers for the mutable host-page tree.
//!
//! The host page is parsed once into a kuchiki tree, mutated in place by the
//! merger, and serialized once. Storefront pages never come through here —
//! they are read-only and parsed with `scraper` instead.

use anyhow::{Context, Result};
use kuchiki::traits::TendrilSink;
use kuchiki::NodeRef;

/// Parse a full HTML document into a mutable tree.
#[must_use]
pub fn parse_document(html: &str) -> NodeRef {
    kuchiki::parse_html().one(html.to_string())
}

/// Serialize a document (or any subtree) back to HTML.
///
/// # Errors
///
/// Returns an error when serialization fails or produces invalid UTF-8.
pub fn serialize(node: &NodeRef) -> Result<String> {
    let mut output = Vec::new();
    node.serialize(&mut output)
        .context("Failed to serialize HTML tree")?;
    String::from_utf8(output).context("Serialized HTML is not valid UTF-8")
}

/// Serialize only the children of a node, concatenated — the node's "inner
/// HTML".
///
/// # Errors
///
/// Returns an error when serialization fails or produces invalid UTF-8.
pub fn serialize_children(node: &NodeRef) -> Result<String> {
    let mut output = Vec::new();
    for child in node.children() {
        child
            .serialize(&mut output)
            .context("Failed to serialize HTML subtree")?;
    }
    String::from_utf8(output).context("Serialized HTML is not valid UTF-8")
}

/// Parse an HTML snippet into detached nodes, ready for splicing.
///
/// The snippet is parsed inside a wrapper `<div>` so that html5ever's
/// implicit `<html>`/`<head>`/`<body>` skeleton never leaks into the spliced
/// content, and so that `<style>`/`<script>` fragments come back as ordinary
/// nodes.
#[must_use]
pub fn parse_fragment(html: &str) -> Vec<NodeRef> {
    let document = kuchiki::parse_html().one(format!("<div>{html}</div>"));
    let Ok(wrapper) = document.select_first("body > div") else {
        return Vec::new();
    };

    // Collect before detaching: detaching while iterating breaks the
    // sibling links the iterator follows.
    let children: Vec<NodeRef> = wrapper.as_node().children().collect();
    for child in &children {
        child.detach();
    }
    children
}

/// Parse an HTML snippet expected to be a single element.
///
/// Returns the first element node of the fragment, skipping stray
/// whitespace-only text nodes. `None` when the snippet holds no element.
#[must_use]
pub fn parse_single_element(html: &str) -> Option<NodeRef> {
    parse_fragment(html)
        .into_iter()
        .find(|node| node.as_element().is_some())
}

/// Lowercase local name of an element node, or `None` for non-elements.
#[must_use]
pub fn element_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|e| e.name.local.to_string())
}

/// Find the first text node under `root`, in document order, whose content
/// satisfies the predicate.
///
/// This is the generic primitive behind every "locate the line that says X"
/// heuristic; the predicates themselves stay at the call sites as plain
/// string constants.
pub fn find_text_node<P>(root: &NodeRef, predicate: P) -> Option<NodeRef>
where
    P: Fn(&str) -> bool,
{
    root.descendants().find(|node| {
        node.as_text()
            .is_some_and(|text| predicate(&text.borrow()))
    })
}

/// Find the first element under `root`, in document order, matching any of
/// `names` and whose text content satisfies the predicate.
pub fn find_element_with_text<P>(root: &NodeRef, names: &[&str], predicate: P) -> Option<NodeRef>
where
    P: Fn(&str) -> bool,
{
    root.descendants().find(|node| {
        element_name(node)
            .is_some_and(|name| names.contains(&name.as_str()))
            && predicate(&node.text_contents())
    })
}

/// Next sibling that is an element node.
#[must_use]
pub fn next_element_sibling(node: &NodeRef) -> Option<NodeRef> {
    let mut current = node.next_sibling();
    while let Some(sibling) = current {
        if sibling.as_element().is_some() {
            return Some(sibling);
        }
        current = sibling.next_sibling();
    }
    None
}

/// Nearest ancestor (excluding `node` itself) with the given element name.
#[must_use]
pub fn closest(node: &NodeRef, name: &str) -> Option<NodeRef> {
    node.ancestors()
        .find(|ancestor| element_name(ancestor).as_deref() == Some(name))
}

/// Append every node of an HTML snippet to `parent`.
pub fn append_fragment(parent: &NodeRef, html: &str) {
    for node in parse_fragment(html) {
        parent.append(node);
    }
}

/// Insert every node of an HTML snippet immediately after `anchor`,
/// preserving snippet order.
pub fn insert_fragment_after(anchor: &NodeRef, html: &str) {
    let mut last = anchor.clone();
    for node in parse_fragment(html) {
        last.insert_after(node.clone());
        last = node;
    }
}
