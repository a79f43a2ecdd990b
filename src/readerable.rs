//! Readerable probability probe.
//!
//! A cheap predicate answering "is it worth running extraction on this
//! page?". Looks at paragraph-like nodes, skips hidden and unlikely ones,
//! and accumulates a score from their text lengths. Never mutates the
//! document; independent of the extraction pipeline.

use std::collections::HashSet;

use crate::dom::{self, Document, NodeRef};
use crate::patterns::{MAYBE_CANDIDATE, UNLIKELY_CANDIDATES};
use crate::text::char_count;

/// Options for [`is_probably_readerable`].
#[derive(Debug, Clone)]
pub struct ReaderableOptions {
    /// Minimum trimmed text length for a node to count at all.
    ///
    /// Default: `140`
    pub min_content_length: usize,

    /// Accumulated score needed before the probe answers `true`.
    ///
    /// Default: `20.0`
    pub min_score: f64,

    /// Overrides the built-in visibility heuristic when set.
    pub visibility_checker: Option<fn(&NodeRef) -> bool>,
}

impl Default for ReaderableOptions {
    fn default() -> Self {
        Self { min_content_length: 140, min_score: 20.0, visibility_checker: None }
    }
}

/// Decide whether a document probably contains a readable article.
///
/// Candidate nodes are `<p>`, `<pre>`, and `<article>` elements plus the
/// parents of `<div> > <br>`. Each visible, likely candidate with enough
/// text adds `sqrt(len - min_content_length)` to a running score; the
/// probe answers `true` as soon as the score exceeds `min_score`.
#[must_use]
pub fn is_probably_readerable(doc: &Document, options: &ReaderableOptions) -> bool {
    let mut nodes: Vec<NodeRef> = Vec::new();
    let mut seen: HashSet<dom::NodeId> = HashSet::new();

    for node in doc.select("p, pre, article").nodes() {
        if seen.insert(node.id) {
            nodes.push(node.clone());
        }
    }
    for br in doc.select("div > br").nodes() {
        if let Some(parent) = br.parent() {
            if seen.insert(parent.id) {
                nodes.push(parent);
            }
        }
    }

    let is_visible = options.visibility_checker.unwrap_or(default_visibility);

    let mut score = 0.0;
    for node in nodes {
        if !is_visible(&node) {
            continue;
        }

        let match_string = dom::class_and_id(&node);
        if UNLIKELY_CANDIDATES.is_match(&match_string) && !MAYBE_CANDIDATE.is_match(&match_string)
        {
            continue;
        }

        // List items repeat short paragraphs; they say nothing about prose.
        if dom::is_tag(&node, "p") && dom::has_ancestor_tag(&node, "li", -1, None) {
            continue;
        }

        let text_length = char_count(dom::text_content(&node).trim());
        if text_length < options.min_content_length {
            continue;
        }

        #[allow(clippy::cast_precision_loss)]
        {
            score += ((text_length - options.min_content_length) as f64).sqrt();
        }
        if score > options.min_score {
            return true;
        }
    }
    false
}

fn default_visibility(node: &NodeRef) -> bool {
    dom::is_probably_visible(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_paragraph(repeats: usize) -> Document {
        dom::parse(&format!("<body><p>{}</p></body>", "hello there ".repeat(repeats)))
    }

    #[test]
    fn short_documents_are_not_readerable() {
        assert!(!is_probably_readerable(&doc_with_paragraph(12), &ReaderableOptions::default()));
    }

    #[test]
    fn long_documents_are_readerable() {
        assert!(is_probably_readerable(&doc_with_paragraph(50), &ReaderableOptions::default()));
    }

    #[test]
    fn min_content_length_is_tunable() {
        let options = ReaderableOptions {
            min_content_length: 120,
            min_score: 0.0,
            ..ReaderableOptions::default()
        };
        assert!(is_probably_readerable(&doc_with_paragraph(11), &options));
        let defaults = ReaderableOptions::default();
        assert!(!is_probably_readerable(&doc_with_paragraph(11), &defaults));
    }

    #[test]
    fn min_score_is_tunable() {
        let options = ReaderableOptions {
            min_content_length: 0,
            min_score: 11.5,
            ..ReaderableOptions::default()
        };
        assert!(is_probably_readerable(&doc_with_paragraph(12), &options));
        assert!(!is_probably_readerable(&doc_with_paragraph(11), &options));
    }

    #[test]
    fn hidden_paragraphs_do_not_count() {
        let doc = dom::parse(&format!(
            "<body><p style=\"display:none\">{}</p></body>",
            "hello there ".repeat(50)
        ));
        assert!(!is_probably_readerable(&doc, &ReaderableOptions::default()));
    }

    #[test]
    fn unlikely_containers_do_not_count() {
        let doc = dom::parse(&format!(
            "<body><p class=\"sidebar\" id=\"comments\">{}</p></body>",
            "hello there ".repeat(50)
        ));
        assert!(!is_probably_readerable(&doc, &ReaderableOptions::default()));
    }

    #[test]
    fn list_paragraphs_do_not_count() {
        let doc = dom::parse(&format!(
            "<body><ul><li><p>{}</p></li></ul></body>",
            "hello there ".repeat(50)
        ));
        assert!(!is_probably_readerable(&doc, &ReaderableOptions::default()));
    }

    #[test]
    fn div_br_parents_are_candidates() {
        let doc = dom::parse(&format!(
            "<body><div>{}<br>{}</div></body>",
            "hello there ".repeat(30),
            "hello there ".repeat(30)
        ));
        assert!(is_probably_readerable(&doc, &ReaderableOptions::default()));
    }

    #[test]
    fn custom_visibility_checker_wins() {
        let doc = doc_with_paragraph(50);
        let options = ReaderableOptions {
            visibility_checker: Some(|_| false),
            ..ReaderableOptions::default()
        };
        assert!(!is_probably_readerable(&doc, &options));
    }
}
