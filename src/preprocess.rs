//! Document preprocessing.
//!
//! Runs after metadata harvesting and before the article grabber: strips
//! scripts, styles, and comments, rescues images hidden behind
//! `<noscript>` fallbacks, collapses `<br>` runs into paragraphs, and
//! renames `<font>` to `<span>`. Every pass mutates the document in place.

use crate::dom::{self, Document, NodeRef};
use crate::patterns::IMG_EXTENSION;

/// Run all preprocessing passes over the document.
pub fn prep_document(doc: &Document) {
    // Script elements go first so the noscript unwrap sees the page the way
    // a scriptless client would.
    doc.select("script").remove();
    unwrap_noscript_images(doc);
    doc.select("noscript").remove();
    doc.select("style").remove();
    remove_comments(doc);

    if let Some(body) = doc.select("body").nodes().first() {
        replace_brs(doc, body);
    }

    for font in doc.select("font").nodes() {
        dom::set_node_tag(font, "span");
    }
}

/// Remove every comment node in the document.
fn remove_comments(doc: &Document) {
    let Some(root) = doc.select("html").nodes().first().cloned() else {
        return;
    };
    let mut comments = Vec::new();
    collect_comments(&root, &mut comments);
    for comment in comments {
        comment.remove_from_parent();
    }
}

fn collect_comments<'a>(node: &NodeRef<'a>, out: &mut Vec<NodeRef<'a>>) {
    for child in dom::child_nodes(node) {
        if child.is_comment() {
            out.push(child);
        } else {
            collect_comments(&child, out);
        }
    }
}

/// Replace lazy-loading `<noscript>` image fallbacks with their real image.
///
/// First drops placeholder images that carry no source-like attribute at
/// all, then replaces each single-image element preceding a single-image
/// `<noscript>` with the noscript's image, merging attributes.
fn unwrap_noscript_images(doc: &Document) {
    // Placeholder images: no src/srcset-like attribute and nothing that
    // looks like an image URL.
    for img in doc.select("img").nodes() {
        let has_source = dom::get_all_attributes(img).iter().any(|(name, value)| {
            matches!(name.as_str(), "src" | "srcset" | "data-src" | "data-srcset")
                || IMG_EXTENSION.is_match(value)
        });
        if !has_source {
            img.remove_from_parent();
        }
    }

    for noscript in doc.select("noscript").nodes() {
        // Re-parse the noscript body the way a scriptless client sees it.
        let tmp = dom::parse(&format!("<div>{}</div>", dom::inner_html(noscript)));
        let Some(tmp_div) = tmp.select("body > div").nodes().first().cloned() else {
            continue;
        };
        if !dom::is_single_image(&tmp_div) {
            continue;
        }

        let Some(prev) = dom::previous_element_sibling(noscript) else {
            continue;
        };
        if !dom::is_single_image(&prev) {
            continue;
        }

        let Some(prev_img) = find_img(&prev) else { continue };
        let Some(new_img) = find_img(&tmp_div) else { continue };

        // Carry source-like attributes of the placeholder over to the real
        // image, renaming on conflicts.
        for (name, value) in dom::get_all_attributes(&prev_img) {
            if value.is_empty() {
                continue;
            }
            if name != "src" && name != "srcset" && !IMG_EXTENSION.is_match(&value) {
                continue;
            }
            if dom::get_attribute(&new_img, &name).as_deref() == Some(value.as_str()) {
                continue;
            }
            let attr_name = if dom::has_attribute(&new_img, &name) {
                format!("data-old-{name}")
            } else {
                name
            };
            dom::set_attribute(&new_img, &attr_name, &value);
        }

        if let Some(replacement) = dom::first_element_child(&tmp_div) {
            dom::Selection::from(prev).replace_with_html(dom::outer_html(&replacement));
        }
    }
}

fn find_img<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    if dom::is_tag(node, "img") {
        return Some(*node);
    }
    dom::get_elements_by_tags(node, &["img"]).first().cloned()
}

/// Collapse runs of two or more `<br>` elements into paragraph breaks.
///
/// The first `<br>` of each run becomes a `<p>` that absorbs the phrasing
/// content that follows, up to the next block element or paragraph break.
fn replace_brs(doc: &Document, body: &NodeRef) {
    for br in dom::get_elements_by_tags(body, &["br"]) {
        // Consume the whitespace-separated chain of additional <br>s.
        let mut next = br.next_sibling();
        let mut replaced = false;
        while let Some(n) = dom::next_meaningful_node(next) {
            if !dom::is_tag(&n, "br") {
                break;
            }
            replaced = true;
            next = n.next_sibling();
            n.remove_from_parent();
        }
        if !replaced {
            continue;
        }

        let p = dom::create_element(doc, "p");
        dom::replace_node(&br, &p);

        // Absorb phrasing siblings into the new paragraph.
        let mut sibling = p.next_sibling();
        while let Some(current) = sibling {
            if dom::is_tag(&current, "br") {
                if let Some(after) = dom::next_meaningful_node(current.next_sibling()) {
                    if dom::is_tag(&after, "br") {
                        break;
                    }
                }
            }
            if !dom::is_phrasing_content(&current) {
                break;
            }
            sibling = current.next_sibling();
            dom::append_child(&p, &current);
        }

        while let Some(last) = p.last_child() {
            if dom::is_whitespace(&last) {
                last.remove_from_parent();
            } else {
                break;
            }
        }

        if let Some(parent) = p.parent() {
            if dom::is_tag(&parent, "p") {
                dom::set_node_tag(&parent, "div");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_scripts_styles_and_comments() {
        let doc = dom::parse(
            "<body><!-- top --><script>var x;</script><style>p{}</style><p>keep<!-- inner --></p></body>",
        );
        prep_document(&doc);
        let html = doc.html().to_string();
        assert!(!html.contains("script"));
        assert!(!html.contains("style"));
        assert!(!html.contains("top"));
        assert!(!html.contains("inner"));
        assert!(doc.select("p").exists());
    }

    #[test]
    fn renames_font_to_span() {
        let doc = dom::parse("<body><font color='red'>styled</font></body>");
        prep_document(&doc);
        assert!(doc.select("span").exists());
        assert!(doc.select("font").is_empty());
    }

    #[test]
    fn collapses_br_runs_into_paragraphs() {
        let doc = dom::parse("<body><div>first<br><br>second half<br><br>third</div></body>");
        prep_document(&doc);
        let paragraphs = doc.select("p");
        assert_eq!(paragraphs.length(), 2);
        let html = doc.select("div").html().to_string();
        assert!(html.contains("second half"));
        // No double <br> survives
        assert_eq!(doc.select("br").length(), 0);
    }

    #[test]
    fn single_br_is_preserved() {
        let doc = dom::parse("<body><div>line one<br>line two</div></body>");
        prep_document(&doc);
        assert_eq!(doc.select("br").length(), 1);
        assert_eq!(doc.select("p").length(), 0);
    }

    #[test]
    fn paragraph_parent_of_new_paragraph_becomes_div() {
        let doc = dom::parse("<body><p>a<br><br>b</p></body>");
        prep_document(&doc);
        assert!(doc.select("div > p").exists());
    }

    #[test]
    fn noscript_image_replaces_placeholder() {
        let doc = dom::parse(concat!(
            "<body><div>",
            "<img src=\"placeholder.gif\" data-src=\"real.jpg\">",
            "<noscript><img src=\"real.jpg\" class=\"real\"></noscript>",
            "</div></body>",
        ));
        prep_document(&doc);
        let img = doc.select("img");
        assert_eq!(img.length(), 1);
        assert_eq!(img.attr("class").map(|c| c.to_string()), Some("real".to_string()));
        // The placeholder's conflicting src is preserved under data-old-.
        assert!(img.attr("data-old-src").is_some() || img.attr("src").is_some());
        assert!(doc.select("noscript").is_empty());
    }

    #[test]
    fn sourceless_placeholder_images_are_dropped() {
        let doc = dom::parse("<body><img id='tracking'><p><img src='real.png'></p></body>");
        prep_document(&doc);
        assert!(doc.select("#tracking").is_empty());
        assert_eq!(doc.select("img").length(), 1);
    }
}
