//! Article post-processing.
//!
//! Runs on the final article container: rewrites relative URIs against the
//! document's effective base, unwraps pointless nested wrappers, and strips
//! class attributes down to the preserved set.

use std::collections::HashSet;

use url::Url;

use crate::dom::{self, Document, NodeRef};
use crate::options::Options;
use crate::patterns::{CLASSES_TO_PRESERVE, SRCSET_URL};

/// Run all post-processing passes over the article container.
pub fn post_process_content(
    doc: &Document,
    article: &NodeRef,
    document_uri: &Url,
    opts: &Options,
) {
    let base_uri = resolve_base_uri(doc, document_uri);
    fix_relative_uris(doc, article, document_uri, &base_uri);
    simplify_nested_elements(article);

    if !opts.keep_classes {
        let preserved: HashSet<String> = CLASSES_TO_PRESERVE
            .iter()
            .map(|c| (*c).to_string())
            .chain(opts.classes_to_preserve.iter().cloned())
            .collect();
        clean_classes(article, &preserved);
    }
}

/// Effective base: the first `<base href>` resolved against the document
/// URI, or the document URI itself.
fn resolve_base_uri(doc: &Document, document_uri: &Url) -> Url {
    for base in doc.select("base").nodes() {
        if let Some(href) = dom::get_attribute(base, "href") {
            if let Ok(resolved) = document_uri.join(href.trim()) {
                return resolved;
            }
        }
    }
    document_uri.clone()
}

fn to_absolute_uri(uri: &str, base: &Url, base_equals_document: bool) -> String {
    // Pure fragments stay relative when no <base> redirects them.
    if base_equals_document && uri.starts_with('#') {
        return uri.to_string();
    }
    match base.join(uri) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => uri.to_string(),
    }
}

/// Rewrite `href`, `src`, `poster`, and `srcset` attributes to absolute
/// URIs. `javascript:` links are unwrapped rather than rewritten.
fn fix_relative_uris(doc: &Document, article: &NodeRef, document_uri: &Url, base_uri: &Url) {
    let base_equals_document = base_uri == document_uri;

    for link in dom::get_elements_by_tags(article, &["a"]) {
        let Some(href) = dom::get_attribute(&link, "href") else {
            continue;
        };
        if href.is_empty() {
            continue;
        }

        if href.starts_with("javascript:") {
            let children = dom::child_nodes(&link);
            if children.len() == 1 && children[0].is_text() {
                // A plain text link: keep just the text.
                let text = dom::text_content(&link);
                dom::Selection::from(link).replace_with_html(escape_html(&text));
            } else {
                // Keep the children, lose the link.
                let container = dom::create_element(doc, "span");
                for child in children {
                    dom::append_child(&container, &child);
                }
                dom::replace_node(&link, &container);
            }
        } else {
            dom::set_attribute(
                &link,
                "href",
                &to_absolute_uri(&href, base_uri, base_equals_document),
            );
        }
    }

    for media in
        dom::get_elements_by_tags(article, &["img", "picture", "figure", "video", "audio", "source"])
    {
        if let Some(src) = dom::get_attribute(&media, "src") {
            dom::set_attribute(&media, "src", &to_absolute_uri(&src, base_uri, base_equals_document));
        }
        if let Some(poster) = dom::get_attribute(&media, "poster") {
            dom::set_attribute(
                &media,
                "poster",
                &to_absolute_uri(&poster, base_uri, base_equals_document),
            );
        }
        if let Some(srcset) = dom::get_attribute(&media, "srcset") {
            let new_srcset = SRCSET_URL.replace_all(&srcset, |caps: &regex::Captures| {
                format!(
                    "{}{}{}",
                    to_absolute_uri(&caps[1], base_uri, base_equals_document),
                    caps.get(2).map_or("", |m| m.as_str()),
                    &caps[3],
                )
            });
            dom::set_attribute(&media, "srcset", &new_srcset);
        }
    }
}

/// Collapse `<div>`/`<section>` chains: drop empty ones and merge wrappers
/// whose only child is another wrapper, keeping the parent's attributes.
fn simplify_nested_elements(article: &NodeRef) {
    let mut node_opt = Some(article.clone());
    while let Some(node) = node_opt {
        let is_wrapper = dom::is_tag(&node, "div") || dom::is_tag(&node, "section");
        if node.parent().is_some()
            && is_wrapper
            && !dom::element_id(&node).starts_with("readability")
        {
            if dom::is_element_without_content(&node) {
                node_opt = dom::remove_and_get_next(&node);
                continue;
            }
            if dom::has_single_tag_inside_element(&node, "div")
                || dom::has_single_tag_inside_element(&node, "section")
            {
                let child = dom::element_children(&node)[0].clone();
                for (name, value) in dom::get_all_attributes(&node) {
                    dom::set_attribute(&child, &name, &value);
                }
                dom::replace_node(&node, &child);
                node_opt = Some(child);
                continue;
            }
        }
        node_opt = dom::next_element(&node, false);
    }
}

/// Strip `class` attributes, keeping only preserved names.
fn clean_classes(node: &NodeRef, preserved: &HashSet<String>) {
    if let Some(class) = dom::get_attribute(node, "class") {
        let kept: Vec<&str> =
            class.split_whitespace().filter(|name| preserved.contains(*name)).collect();
        if kept.is_empty() {
            dom::remove_attribute(node, "class");
        } else {
            dom::set_attribute(node, "class", &kept.join(" "));
        }
    }
    for child in dom::element_children(node) {
        clean_classes(&child, preserved);
    }
}

/// Minimal text escaping for re-serialized link text.
fn escape_html(input: &str) -> String {
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
