//! Article serialization.
//!
//! The default output dialect is HTML, straight from the DOM. The XML
//! dialect self-closes void elements and spells boolean attributes as
//! `name="name"`. HTML parsing collapses `name="name"` to an empty value,
//! so the explicit spellings are recovered from the original source text:
//! elements are matched back by their identifying attributes and only the
//! attributes that were explicit in the source are promoted. Without
//! source text every empty-valued boolean on the whitelist is promoted.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{self, NodeRef};
use crate::patterns::BOOLEAN_ATTRIBUTES;

/// Void elements, emitted self-closing in the XML dialect.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Attributes that identify an element across the parse boundary.
const IDENTITY_ATTRIBUTES: &[&str] = &[
    "id", "itemid", "src", "data-media-id", "data-media-uuid", "data-media-type", "data-media-aop",
];

/// A start tag in the raw source.
#[allow(clippy::expect_used)]
static SOURCE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z][^>]*>").expect("SOURCE_TAG regex"));

/// One quoted attribute inside a start tag.
#[allow(clippy::expect_used)]
static SOURCE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z][a-zA-Z0-9:._-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("SOURCE_ATTR regex")
});

/// Explicit `name="name"` boolean spellings recovered from source text.
#[derive(Debug, Default)]
pub struct ExplicitBooleans {
    elements: Vec<SourceElement>,
}

#[derive(Debug)]
struct SourceElement {
    identity: HashMap<String, String>,
    explicit: HashSet<String>,
}

impl ExplicitBooleans {
    /// Scan raw HTML for elements spelling whitelist booleans explicitly.
    #[must_use]
    pub fn from_source(html: &str) -> Self {
        let mut elements = Vec::new();

        for tag in SOURCE_TAG.find_iter(html) {
            let mut identity = HashMap::new();
            let mut explicit = HashSet::new();

            for caps in SOURCE_ATTR.captures_iter(tag.as_str()) {
                let name = caps[1].to_ascii_lowercase();
                let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());

                if BOOLEAN_ATTRIBUTES.contains(&name.as_str()) && value == name {
                    explicit.insert(name.clone());
                }
                if IDENTITY_ATTRIBUTES.contains(&name.as_str())
                    || name == "itemtype"
                    || name == "itemprop"
                {
                    identity.insert(name, value.to_string());
                }
            }

            if !explicit.is_empty() {
                elements.push(SourceElement { identity, explicit });
            }
        }

        Self { elements }
    }

    /// Whether `attribute` was spelled `name="name"` on the source element
    /// matching `node`.
    fn is_explicit(&self, node: &NodeRef, attribute: &str) -> bool {
        self.elements
            .iter()
            .any(|element| element.explicit.contains(attribute) && element.matches(node))
    }
}

impl SourceElement {
    fn matches(&self, node: &NodeRef) -> bool {
        for key in IDENTITY_ATTRIBUTES {
            if let (Some(source_value), Some(dom_value)) =
                (self.identity.get(*key), dom::get_attribute(node, key))
            {
                if *source_value == dom_value {
                    return true;
                }
            }
        }

        // itemtype and itemprop only identify jointly.
        if let (Some(itemtype), Some(itemprop)) =
            (self.identity.get("itemtype"), self.identity.get("itemprop"))
        {
            if dom::get_attribute(node, "itemtype").as_deref() == Some(itemtype.as_str())
                && dom::get_attribute(node, "itemprop").as_deref() == Some(itemprop.as_str())
            {
                return true;
            }
        }
        false
    }
}

/// Serialize a node's children as HTML.
#[must_use]
pub fn serialize_html_children(node: &NodeRef) -> String {
    dom::inner_html(node).to_string()
}

/// Serialize a node's children as XML: self-closing void elements and
/// explicit boolean attributes.
#[must_use]
pub fn serialize_xml_children(node: &NodeRef, booleans: Option<&ExplicitBooleans>) -> String {
    let mut out = String::new();
    for child in dom::child_nodes(node) {
        write_xml_node(&child, booleans, &mut out);
    }
    out
}

fn write_xml_node(node: &NodeRef, booleans: Option<&ExplicitBooleans>, out: &mut String) {
    if node.is_comment() {
        return;
    }
    if !node.is_element() {
        out.push_str(&escape_text(&node.text()));
        return;
    }
    let Some(tag) = dom::tag_name(node) else {
        return;
    };

    out.push('<');
    out.push_str(&tag);

    for (name, value) in dom::get_all_attributes(node) {
        let promoted = value.is_empty()
            && BOOLEAN_ATTRIBUTES.contains(&name.as_str())
            && booleans.map_or(true, |b| b.is_explicit(node, &name));
        let value = if promoted { name.clone() } else { value };
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(&value));
        out.push('"');
    }

    let children = dom::child_nodes(node);
    if children.is_empty() && VOID_ELEMENTS.contains(&tag.as_str()) {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in children {
        write_xml_node(&child, booleans, out);
    }
    out.push_str("</");
    out.push_str(&tag);
    out.push('>');
}

fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attribute(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_self_closes_void_elements() {
        let doc = dom::parse("<div id='root'><p>a<br>b</p><img src='x.jpg'></div>");
        let root = doc.select("#root").nodes().first().copied().unwrap();
        let xml = serialize_xml_children(&root, None);
        assert!(xml.contains("<br/>"));
        assert!(xml.contains(r#"<img src="x.jpg"/>"#));
        assert!(xml.contains("<p>a<br/>b</p>"));
    }

    #[test]
    fn xml_promotes_booleans_without_source() {
        let doc = dom::parse("<div id='root'><video controls loop src='v.mp4'></video></div>");
        let root = doc.select("#root").nodes().first().copied().unwrap();
        let xml = serialize_xml_children(&root, None);
        assert!(xml.contains(r#"controls="controls""#));
        assert!(xml.contains(r#"loop="loop""#));
    }

    #[test]
    fn source_analysis_limits_promotion_to_explicit_spellings() {
        let source = r#"<article itemscope="itemscope" id="story"><video id="clip" controls></video></article>"#;
        let booleans = ExplicitBooleans::from_source(source);

        let doc = dom::parse(source);
        let article = doc.select("#story").nodes().first().copied().unwrap();
        let video = doc.select("#clip").nodes().first().copied().unwrap();

        assert!(booleans.is_explicit(&article, "itemscope"));
        assert!(!booleans.is_explicit(&video, "controls"));
    }

    #[test]
    fn itemtype_itemprop_identify_jointly() {
        let source = concat!(
            r#"<div itemtype="https://schema.org/Article" itemprop="mainEntity" itemscope="itemscope"></div>"#,
        );
        let booleans = ExplicitBooleans::from_source(source);
        let doc = dom::parse(source);
        let div = doc.select("div[itemprop]").nodes().first().copied().unwrap();
        assert!(booleans.is_explicit(&div, "itemscope"));

        let other = dom::parse(r#"<div itemtype="https://schema.org/Article" itemprop="other"></div>"#);
        let other_div = other.select("div[itemprop]").nodes().first().copied().unwrap();
        assert!(!booleans.is_explicit(&other_div, "itemscope"));
    }

    #[test]
    fn xml_escapes_text_and_attributes() {
        let doc = dom::parse(r#"<div id="root"><p title="a&quot;b">x &amp; y &lt; z</p></div>"#);
        let root = doc.select("#root").nodes().first().copied().unwrap();
        let xml = serialize_xml_children(&root, None);
        assert!(xml.contains(r#"title="a&quot;b""#));
        assert!(xml.contains("x &amp; y &lt; z"));
    }

    #[test]
    fn html_serialization_round_trips_structure() {
        let doc = dom::parse("<div id='root'><p>text</p></div>");
        let root = doc.select("#root").nodes().first().copied().unwrap();
        assert_eq!(serialize_html_children(&root), "<p>text</p>");
    }
}
