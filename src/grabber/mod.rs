//! The article grabber.
//!
//! The core selection algorithm: walk the body, drop nodes that cannot be
//! article content, score paragraph-like elements into their ancestors,
//! pick the best candidate subtree, pull in qualifying siblings, and clean
//! the assembled article. When the result is shorter than the configured
//! threshold the body snapshot is restored and the pass retries with one
//! heuristic flag relaxed, up to three relaxations; the longest non-empty
//! attempt wins if none reaches the threshold.

mod clean;
mod score;

use score::ScoreState;

use crate::dom::{self, Document, NodeId, NodeRef};
use crate::options::Options;
use crate::patterns::{
    ALTER_TO_DIV_EXCEPTIONS, BYLINE, DEFAULT_TAGS_TO_SCORE, MAYBE_CANDIDATE, SENTENCE_END,
    UNLIKELY_CANDIDATES, UNLIKELY_ROLES,
};
use crate::text::{char_count, comma_count, inner_text, text_similarity};

/// Heuristic gates for one attempt; relaxed one at a time between retries.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Flags {
    pub strip_unlikely: bool,
    pub weight_classes: bool,
    pub clean_conditionally: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self { strip_unlikely: true, weight_classes: true, clean_conditionally: true }
    }
}

/// A finished (possibly under-length) extraction attempt.
struct Attempt<'a> {
    content: NodeRef<'a>,
    text_length: usize,
}

/// Output of a successful grab.
pub(crate) struct GrabbedArticle<'a> {
    /// The article container; its only child is the page wrapper div.
    pub content: NodeRef<'a>,
    /// Byline found while walking the page, if metadata had none.
    pub byline: Option<String>,
    /// Nearest `dir` attribute over the chosen candidate's ancestry.
    pub dir: Option<String>,
}

pub(crate) struct Grabber<'a> {
    doc: &'a Document,
    opts: &'a Options,
    article_title: String,
    metadata_has_byline: bool,
    flags: Flags,
    state: ScoreState,
    attempts: Vec<Attempt<'a>>,
    article_byline: Option<String>,
}

impl<'a> Grabber<'a> {
    pub fn new(
        doc: &'a Document,
        opts: &'a Options,
        article_title: String,
        metadata_has_byline: bool,
    ) -> Self {
        Self {
            doc,
            opts,
            article_title,
            metadata_has_byline,
            flags: Flags::default(),
            state: ScoreState::default(),
            attempts: Vec::new(),
            article_byline: None,
        }
    }

    fn log(&self, message: &str) {
        if self.opts.debug {
            eprintln!("DEBUG: {message}");
        }
    }

    /// Run the attempt loop and return the winning article subtree.
    pub fn grab(mut self) -> Option<GrabbedArticle<'a>> {
        let body = self.doc.select("body").nodes().first().cloned()?;
        let page_cache_html = dom::inner_html(&body);

        loop {
            self.log("starting grab attempt");
            self.state.clear();

            let mut elements_to_score: Vec<NodeRef<'a>> = Vec::new();
            self.prepare_nodes(&mut elements_to_score);

            let candidates = self.score_elements(&elements_to_score);
            let (top_candidate, needed_to_create) = self.select_top_candidate(&candidates, &body);
            let (article_content, parent_of_top) = self.assemble_article(&top_candidate);

            clean::prep_article(self.doc, &article_content, &mut self.state, self.flags, self.opts);

            if needed_to_create {
                // The synthesized candidate doubles as the page wrapper.
                dom::set_attribute(&top_candidate, "id", "readability-page-1");
                dom::set_attribute(&top_candidate, "class", "page");
            } else {
                let page = dom::create_element(self.doc, "div");
                dom::set_attribute(&page, "id", "readability-page-1");
                dom::set_attribute(&page, "class", "page");
                for child in dom::child_nodes(&article_content) {
                    dom::append_child(&page, &child);
                }
                dom::append_child(&article_content, &page);
            }
            self.state.bump_epoch();

            let text_length = char_count(&inner_text(&article_content, true));
            if text_length >= self.opts.char_threshold {
                return Some(self.finish(article_content, top_candidate, parent_of_top));
            }

            self.log(&format!("attempt too short ({text_length} chars), relaxing flags"));
            dom::Selection::from(body).set_html(page_cache_html.clone());
            self.state.clear();
            self.attempts.push(Attempt { content: article_content, text_length });

            if self.flags.strip_unlikely {
                self.flags.strip_unlikely = false;
            } else if self.flags.weight_classes {
                self.flags.weight_classes = false;
            } else if self.flags.clean_conditionally {
                self.flags.clean_conditionally = false;
            } else {
                // No flags left: take the longest attempt, or give up.
                self.attempts.sort_by(|a, b| b.text_length.cmp(&a.text_length));
                let best = self.attempts.first()?;
                if best.text_length == 0 {
                    return None;
                }
                let content = best.content;
                return Some(self.finish(content, top_candidate, parent_of_top));
            }
        }
    }

    fn finish(
        &self,
        content: NodeRef<'a>,
        top_candidate: NodeRef<'a>,
        parent_of_top: Option<NodeRef<'a>>,
    ) -> GrabbedArticle<'a> {
        // Text direction comes from the first ancestor of the chosen
        // candidate that declares one.
        let mut chain: Vec<NodeRef<'a>> = Vec::new();
        if let Some(ref parent) = parent_of_top {
            chain.push(parent.clone());
        }
        chain.push(top_candidate);
        if let Some(parent) = parent_of_top {
            chain.extend(dom::node_ancestors(&parent, 0));
        }

        let mut dir = None;
        for ancestor in chain {
            if !ancestor.is_element() {
                continue;
            }
            if let Some(value) = dom::get_attribute(&ancestor, "dir") {
                if !value.is_empty() {
                    dir = Some(value);
                    break;
                }
            }
        }

        GrabbedArticle { content, byline: self.article_byline.clone(), dir }
    }

    // === Preparation walk ===

    /// Walk the document in order, dropping hidden, modal, byline,
    /// duplicate-title, and unlikely nodes, queueing scorable elements, and
    /// normalizing `<div>` soup into paragraphs.
    fn prepare_nodes(&mut self, elements_to_score: &mut Vec<NodeRef<'a>>) {
        let strip_unlikely = self.flags.strip_unlikely;
        let mut should_remove_title_header = true;
        let mut node_opt = self.doc.select("html").nodes().first().cloned();

        while let Some(node) = node_opt {
            let Some(tag) = dom::tag_name(&node) else {
                node_opt = dom::next_element(&node, false);
                continue;
            };
            let match_string = dom::class_and_id(&node);

            if !dom::is_probably_visible(&node) {
                self.log(&format!("removing hidden node - {match_string}"));
                node_opt = dom::remove_and_get_next(&node);
                self.state.bump_epoch();
                continue;
            }

            if dom::get_attribute(&node, "aria-modal").as_deref() == Some("true")
                && dom::get_attribute(&node, "role").as_deref() == Some("dialog")
            {
                node_opt = dom::remove_and_get_next(&node);
                self.state.bump_epoch();
                continue;
            }

            if self.check_byline(&node, &match_string) {
                node_opt = dom::remove_and_get_next(&node);
                self.state.bump_epoch();
                continue;
            }

            if should_remove_title_header && self.header_duplicates_title(&node) {
                self.log(&format!("removing header duplicating title: {}", inner_text(&node, true)));
                should_remove_title_header = false;
                node_opt = dom::remove_and_get_next(&node);
                self.state.bump_epoch();
                continue;
            }

            if strip_unlikely {
                if UNLIKELY_CANDIDATES.is_match(&match_string)
                    && !MAYBE_CANDIDATE.is_match(&match_string)
                    && !dom::has_ancestor_tag(&node, "table", 3, None)
                    && !dom::has_ancestor_tag(&node, "code", 3, None)
                    && tag != "body"
                    && tag != "a"
                {
                    self.log(&format!("removing unlikely candidate - {match_string}"));
                    node_opt = dom::remove_and_get_next(&node);
                    self.state.bump_epoch();
                    continue;
                }

                if dom::get_attribute(&node, "role")
                    .is_some_and(|role| UNLIKELY_ROLES.contains(&role.as_str()))
                {
                    node_opt = dom::remove_and_get_next(&node);
                    self.state.bump_epoch();
                    continue;
                }
            }

            // Wrapper elements with nothing inside contribute nothing.
            if matches!(
                tag.as_str(),
                "div" | "section" | "header" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
            ) && dom::is_element_without_content(&node)
            {
                node_opt = dom::remove_and_get_next(&node);
                self.state.bump_epoch();
                continue;
            }

            if DEFAULT_TAGS_TO_SCORE.contains(&tag.as_str()) {
                elements_to_score.push(node.clone());
            }

            if tag == "div" {
                self.wrap_phrasing_runs(&node);

                if dom::has_single_tag_inside_element(&node, "p")
                    && self.state.link_density(&node) < 0.25
                {
                    // A div wrapping a single paragraph is that paragraph.
                    let paragraph = dom::element_children(&node)[0].clone();
                    dom::replace_node(&node, &paragraph);
                    self.state.bump_epoch();
                    elements_to_score.push(paragraph.clone());
                    node_opt = dom::next_element(&paragraph, false);
                    continue;
                } else if !dom::has_child_block_element(&node) {
                    dom::set_node_tag(&node, "p");
                    elements_to_score.push(node.clone());
                }
            }

            node_opt = dom::next_element(&node, false);
        }
    }

    /// Group runs of phrasing-content children of a `<div>` into `<p>`s.
    fn wrap_phrasing_runs(&mut self, node: &NodeRef<'a>) {
        let mut paragraph: Option<NodeRef<'a>> = None;
        let mut child_opt = node.first_child();

        while let Some(child) = child_opt {
            let next_sibling = child.next_sibling();
            if self.state.is_phrasing(&child) {
                if let Some(ref p) = paragraph {
                    dom::append_child(p, &child);
                } else if !dom::is_whitespace(&child) {
                    let p = dom::create_element(self.doc, "p");
                    dom::insert_before(&child, &p);
                    dom::append_child(&p, &child);
                    paragraph = Some(p);
                }
            } else if let Some(p) = paragraph.take() {
                while let Some(last) = p.last_child() {
                    if dom::is_whitespace(&last) {
                        last.remove_from_parent();
                    } else {
                        break;
                    }
                }
            }
            child_opt = next_sibling;
        }
        self.state.bump_epoch();
    }

    fn check_byline(&mut self, node: &NodeRef, match_string: &str) -> bool {
        if self.article_byline.is_some() || self.metadata_has_byline {
            return false;
        }

        let rel_author = dom::get_attribute(node, "rel").as_deref() == Some("author");
        let itemprop_author =
            dom::get_attribute(node, "itemprop").is_some_and(|v| v.contains("author"));

        if rel_author || itemprop_author || BYLINE.is_match(match_string) {
            let text = dom::text_content(node);
            if is_valid_byline(&text) {
                self.article_byline = Some(text.trim().to_string());
                return true;
            }
        }
        false
    }

    fn header_duplicates_title(&self, node: &NodeRef) -> bool {
        if !dom::is_tag(node, "h1") && !dom::is_tag(node, "h2") {
            return false;
        }
        let heading = inner_text(node, false);
        text_similarity(&self.article_title, &heading) > 0.75
    }

    // === Scoring ===

    /// Score each queued element into up to five ancestors, at decaying
    /// weight per level. Returns the ancestors that became candidates.
    fn score_elements(&mut self, elements_to_score: &[NodeRef<'a>]) -> Vec<NodeRef<'a>> {
        let mut candidates: Vec<NodeRef<'a>> = Vec::new();

        for element in elements_to_score {
            // Skip nodes the preparation walk detached.
            let Some(parent) = element.parent() else { continue };
            if !parent.is_element() {
                continue;
            }

            let inner = inner_text(element, true);
            if char_count(&inner) < 25 {
                continue;
            }

            let ancestors = dom::node_ancestors(element, 5);
            if ancestors.is_empty() {
                continue;
            }

            #[allow(clippy::cast_precision_loss)]
            let content_score =
                1.0 + (comma_count(&inner) + 1) as f64 + (char_count(&inner) / 100).min(3) as f64;

            for (level, ancestor) in ancestors.iter().enumerate() {
                if ancestor.parent().is_none_or(|p| !p.is_element()) {
                    continue;
                }
                if !self.state.has_score(ancestor.id) {
                    self.state.initialize_node(ancestor, self.flags.weight_classes);
                    candidates.push(ancestor.clone());
                }
                #[allow(clippy::cast_precision_loss)]
                let divider = match level {
                    0 => 1.0,
                    1 => 2.0,
                    l => (l * 3) as f64,
                };
                self.state.add_score(ancestor.id, content_score / divider);
            }
        }

        candidates
    }

    // === Candidate selection ===

    /// Scale candidate scores by link density, keep the top few, and settle
    /// on the best subtree, promoting shared ancestors and single-child
    /// wrappers. Returns the candidate and whether it had to be synthesized
    /// from the whole body.
    fn select_top_candidate(
        &mut self,
        candidates: &[NodeRef<'a>],
        body: &NodeRef<'a>,
    ) -> (NodeRef<'a>, bool) {
        let mut top_candidates: Vec<NodeRef<'a>> = Vec::new();

        for candidate in candidates {
            let density = self.state.link_density(candidate);
            let adjusted = self.state.score(candidate.id) * (1.0 - density);
            self.state.set_score(candidate.id, adjusted);
            self.log(&format!(
                "candidate {} with score {adjusted}",
                dom::class_and_id(candidate)
            ));

            for slot in 0..self.opts.nb_top_candidates {
                let insert = match top_candidates.get(slot) {
                    None => true,
                    Some(existing) => adjusted > self.state.score(existing.id),
                };
                if insert {
                    top_candidates.insert(slot, candidate.clone());
                    if top_candidates.len() > self.opts.nb_top_candidates {
                        top_candidates.pop();
                    }
                    break;
                }
            }
        }

        let best = top_candidates.first().cloned();
        if best.is_none() || best.is_some_and(|t| dom::is_tag(&t, "body")) {
            // Nothing scored: treat the entire body as the article.
            let synthesized = dom::create_element(self.doc, "div");
            for child in dom::child_nodes(body) {
                dom::append_child(&synthesized, &child);
            }
            dom::append_child(body, &synthesized);
            self.state.bump_epoch();
            self.state.initialize_node(&synthesized, self.flags.weight_classes);
            return (synthesized, true);
        }

        let mut top = best.unwrap_or(*body);

        // If several strong alternates share an ancestor with the best
        // candidate, that ancestor is probably the real article container.
        const MINIMUM_TOP_CANDIDATES: usize = 3;
        let top_score = self.state.score(top.id);
        let mut alternative_ancestors: Vec<Vec<NodeId>> = Vec::new();
        for other in top_candidates.iter().skip(1) {
            if self.state.score(other.id) / top_score >= 0.75 {
                alternative_ancestors
                    .push(dom::node_ancestors(other, 0).iter().map(|a| a.id).collect());
            }
        }
        if alternative_ancestors.len() >= MINIMUM_TOP_CANDIDATES {
            let mut parent = top.parent();
            while let Some(p) = parent {
                if dom::is_tag(&p, "body") {
                    break;
                }
                let mut lists_containing = 0usize;
                for ancestors in &alternative_ancestors {
                    if lists_containing >= MINIMUM_TOP_CANDIDATES {
                        break;
                    }
                    if ancestors.contains(&p.id) {
                        lists_containing += 1;
                    }
                }
                if lists_containing >= MINIMUM_TOP_CANDIDATES {
                    top = p;
                    break;
                }
                parent = p.parent();
            }
        }
        if !self.state.has_score(top.id) {
            self.state.initialize_node(&top, self.flags.weight_classes);
        }

        // Walk up while parents score better; content tends to bleed into
        // wrapper elements one level up.
        let mut parent = top.parent();
        let mut last_score = self.state.score(top.id);
        let score_threshold = last_score / 3.0;
        while let Some(p) = parent {
            if !p.is_element() || dom::is_tag(&p, "body") {
                break;
            }
            if !self.state.has_score(p.id) {
                parent = p.parent();
                continue;
            }
            let parent_score = self.state.score(p.id);
            if parent_score < score_threshold {
                break;
            }
            if parent_score > last_score {
                top = p;
                break;
            }
            last_score = parent_score;
            parent = p.parent();
        }

        // Hoist out of lone-child wrappers.
        let mut parent = top.parent();
        while let Some(p) = parent {
            if !p.is_element() || dom::is_tag(&p, "body") {
                break;
            }
            if dom::element_children(&p).len() != 1 {
                break;
            }
            top = p;
            parent = top.parent();
        }
        if !self.state.has_score(top.id) {
            self.state.initialize_node(&top, self.flags.weight_classes);
        }

        (top, false)
    }

    // === Assembly ===

    /// Move the top candidate and qualifying siblings into a fresh article
    /// container. Returns the container and the candidate's parent.
    fn assemble_article(&mut self, top: &NodeRef<'a>) -> (NodeRef<'a>, Option<NodeRef<'a>>) {
        let article_content = dom::create_element(self.doc, "div");
        let top_score = self.state.score(top.id);
        let sibling_score_threshold = 10.0_f64.max(top_score * 0.2);
        let parent_of_top = top.parent().filter(dom::NodeRef::is_element);

        let siblings = parent_of_top
            .clone()
            .map_or_else(|| vec![top.clone()], |p| dom::element_children(&p));

        for sibling in siblings {
            let sibling_tag = dom::tag_name(&sibling).unwrap_or_default();
            let mut append = false;

            if sibling.id == top.id {
                append = true;
            } else {
                let mut content_bonus = 0.0;
                let top_class = dom::class_name(top);
                if !top_class.is_empty() && dom::class_name(&sibling) == top_class {
                    content_bonus += top_score * 0.2;
                }

                if self.state.has_score(sibling.id)
                    && self.state.score(sibling.id) + content_bonus >= sibling_score_threshold
                {
                    append = true;
                } else if sibling_tag == "p" {
                    let link_density = self.state.link_density(&sibling);
                    let node_content = inner_text(&sibling, true);
                    let node_length = char_count(&node_content);

                    if node_length > 80 && link_density < 0.25 {
                        append = true;
                    } else if node_length < 80
                        && node_length > 0
                        && link_density == 0.0
                        && SENTENCE_END.is_match(&node_content)
                    {
                        append = true;
                    }
                }
            }

            if append {
                self.log(&format!("appending sibling <{sibling_tag}>"));
                if !ALTER_TO_DIV_EXCEPTIONS.contains(&sibling_tag.as_str()) {
                    dom::set_node_tag(&sibling, "div");
                }
                dom::append_child(&article_content, &sibling);
            }
        }
        self.state.bump_epoch();

        (article_content, parent_of_top)
    }
}

fn is_valid_byline(text: &str) -> bool {
    let length = char_count(text.trim());
    length > 0 && length < 100
}
