//! Per-attempt scoring state.
//!
//! Content scores and the supporting caches are keyed by `NodeId`. They are
//! valid for a single grabber attempt only: restoring the body snapshot
//! rebuilds the subtree with fresh node ids, so the whole state is cleared
//! rather than reindexed. The text-derived caches additionally carry a
//! mutation token (`epoch`) and are invalidated whenever the grabber
//! mutates the tree.

use std::collections::{HashMap, HashSet};

use crate::dom::{self, NodeId, NodeRef};
use crate::patterns::{HASH_URL, NEGATIVE_CLASS, POSITIVE_CLASS};
use crate::text::{char_count, inner_text};

/// Mutable state for one grabber attempt.
#[derive(Debug, Default)]
pub(crate) struct ScoreState {
    /// Content score per candidate element.
    scores: HashMap<NodeId, f64>,

    /// Tables judged to carry data rather than layout.
    data_tables: HashSet<NodeId>,

    /// Cached link density, tagged with the epoch it was computed in.
    link_density: HashMap<NodeId, (u64, f64)>,

    /// Cached normalized text length, tagged with the epoch.
    text_lengths: HashMap<NodeId, (u64, usize)>,

    /// Cached phrasing-content verdicts, tagged with the epoch.
    phrasing: HashMap<NodeId, (u64, bool)>,

    /// Text-mutation token; bumped on every tree mutation the grabber makes.
    epoch: u64,
}

impl ScoreState {
    /// Drop all annotations and caches. Called between attempts.
    pub fn clear(&mut self) {
        self.scores.clear();
        self.data_tables.clear();
        self.link_density.clear();
        self.text_lengths.clear();
        self.phrasing.clear();
        self.epoch = 0;
    }

    /// Invalidate the text-derived caches after a tree mutation.
    pub fn bump_epoch(&mut self) {
        self.epoch += 1;
    }

    pub fn has_score(&self, id: NodeId) -> bool {
        self.scores.contains_key(&id)
    }

    pub fn score(&self, id: NodeId) -> f64 {
        self.scores.get(&id).copied().unwrap_or(0.0)
    }

    pub fn set_score(&mut self, id: NodeId, score: f64) {
        self.scores.insert(id, score);
    }

    pub fn add_score(&mut self, id: NodeId, delta: f64) {
        *self.scores.entry(id).or_insert(0.0) += delta;
    }

    pub fn mark_data_table(&mut self, id: NodeId) {
        self.data_tables.insert(id);
    }

    pub fn is_data_table(&self, id: NodeId) -> bool {
        self.data_tables.contains(&id)
    }

    /// Normalized text length of a node, cached per epoch.
    pub fn text_length(&mut self, node: &NodeRef) -> usize {
        if let Some(&(epoch, len)) = self.text_lengths.get(&node.id) {
            if epoch == self.epoch {
                return len;
            }
        }
        let len = char_count(&inner_text(node, true));
        self.text_lengths.insert(node.id, (self.epoch, len));
        len
    }

    /// Ratio of link text to total text, cached per epoch. Fragment-only
    /// links count at a reduced coefficient.
    pub fn link_density(&mut self, node: &NodeRef) -> f64 {
        if let Some(&(epoch, density)) = self.link_density.get(&node.id) {
            if epoch == self.epoch {
                return density;
            }
        }

        let text_length = self.text_length(node);
        let density = if text_length == 0 {
            0.0
        } else {
            let mut link_length = 0.0;
            for link in dom::get_elements_by_tags(node, &["a"]) {
                let coefficient = dom::get_attribute(&link, "href")
                    .filter(|href| HASH_URL.is_match(href))
                    .map_or(1.0, |_| 0.3);
                #[allow(clippy::cast_precision_loss)]
                {
                    link_length += char_count(&inner_text(&link, true)) as f64 * coefficient;
                }
            }
            #[allow(clippy::cast_precision_loss)]
            {
                link_length / text_length as f64
            }
        };

        self.link_density.insert(node.id, (self.epoch, density));
        density
    }

    /// Phrasing-content verdict for a node, cached per epoch for elements.
    pub fn is_phrasing(&mut self, node: &NodeRef) -> bool {
        if !node.is_element() {
            return dom::is_phrasing_content(node);
        }
        if let Some(&(epoch, verdict)) = self.phrasing.get(&node.id) {
            if epoch == self.epoch {
                return verdict;
            }
        }
        let verdict = dom::is_phrasing_content(node);
        self.phrasing.insert(node.id, (self.epoch, verdict));
        verdict
    }

    /// Give a candidate its base score: a tag-dependent prior plus the
    /// class weight.
    pub fn initialize_node(&mut self, node: &NodeRef, weight_classes: bool) {
        let base = match dom::tag_name(node).as_deref() {
            Some("div") => 5.0,
            Some("pre" | "td" | "blockquote") => 3.0,
            Some("address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form") => -3.0,
            Some("h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th") => -5.0,
            _ => 0.0,
        };
        self.set_score(node.id, base + class_weight(node, weight_classes));
    }
}

/// Class/id weight of an element: ±25 per positive/negative match against
/// the class attribute and the id, independently. Zero when class
/// weighting is disabled for the attempt.
pub(crate) fn class_weight(node: &NodeRef, weight_classes: bool) -> f64 {
    if !weight_classes {
        return 0.0;
    }

    let mut weight = 0.0;

    let class = dom::class_name(node);
    if !class.is_empty() {
        if NEGATIVE_CLASS.is_match(&class) {
            weight -= 25.0;
        }
        if POSITIVE_CLASS.is_match(&class) {
            weight += 25.0;
        }
    }

    let id = dom::element_id(node);
    if !id.is_empty() {
        if NEGATIVE_CLASS.is_match(&id) {
            weight -= 25.0;
        }
        if POSITIVE_CLASS.is_match(&id) {
            weight += 25.0;
        }
    }

    weight
}
