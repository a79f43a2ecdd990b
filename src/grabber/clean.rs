//! Article cleanup passes.
//!
//! Runs over the freshly assembled article container, in a fixed order:
//! presentational attributes, data-table marking, lazy image repair,
//! unconditional tag removal, share widgets, conditional cleaning of
//! link-heavy or list-shaped containers, heading demotion, and final
//! structural fixes. The pass order is load-bearing; conditional cleaning
//! must see data-table marks and repaired images.

use crate::dom::{self, Document, NodeRef};
use crate::grabber::score::{class_weight, ScoreState};
use crate::grabber::Flags;
use crate::options::Options;
use crate::patterns::{
    AD_WORDS, ALLOWED_VIDEOS, B64_DATA_URL, B64_MARKER, DEPRECATED_SIZE_ATTRIBUTE_ELEMS,
    IMG_EXTENSION, LOADING_WORDS, PRESENTATIONAL_ATTRIBUTES, SHARE_ELEMENTS, SINGLE_IMAGE_URL,
    SRCSET_SHAPED,
};
use crate::text::{char_count, inner_text};

/// Share widgets below this many characters of text are dropped.
const SHARE_ELEMENT_THRESHOLD: usize = 500;

/// Clean the assembled article in place.
pub(crate) fn prep_article(
    doc: &Document,
    article: &NodeRef,
    state: &mut ScoreState,
    flags: Flags,
    opts: &Options,
) {
    clean_styles(article);
    state.bump_epoch();

    mark_data_tables(state, article);
    fix_lazy_images(doc, article);

    clean_conditionally(article, "form", state, flags, opts);
    clean_conditionally(article, "fieldset", state, flags, opts);
    clean(article, "object", opts);
    clean(article, "embed", opts);
    clean(article, "footer", opts);
    clean(article, "link", opts);
    clean(article, "aside", opts);
    state.bump_epoch();

    // Share widgets anywhere below the top-level children.
    for child in dom::element_children(article) {
        clean_matched_nodes(&child, |node, match_string| {
            SHARE_ELEMENTS.is_match(match_string)
                && char_count(&dom::text_content(node)) < SHARE_ELEMENT_THRESHOLD
        });
    }
    state.bump_epoch();

    clean(article, "iframe", opts);
    clean(article, "input", opts);
    clean(article, "textarea", opts);
    clean(article, "select", opts);
    clean(article, "button", opts);
    state.bump_epoch();

    clean_headers(article, flags);

    clean_conditionally(article, "table", state, flags, opts);
    clean_conditionally(article, "ul", state, flags, opts);
    clean_conditionally(article, "div", state, flags, opts);
    state.bump_epoch();

    // Articles get a single top heading from the title; demote the rest.
    for h1 in dom::get_elements_by_tags(article, &["h1"]) {
        dom::set_node_tag(&h1, "h2");
    }

    // Paragraphs with no text and no media are leftovers of the cleaning.
    for paragraph in dom::get_elements_by_tags(article, &["p"]) {
        let media_count =
            dom::get_elements_by_tags(&paragraph, &["img", "embed", "object", "iframe"]).len();
        if media_count == 0 && inner_text(&paragraph, false).is_empty() {
            paragraph.remove_from_parent();
        }
    }

    for br in dom::get_elements_by_tags(article, &["br"]) {
        if let Some(next) = dom::next_meaningful_node(br.next_sibling()) {
            if dom::is_tag(&next, "p") {
                br.remove_from_parent();
            }
        }
    }

    collapse_single_cell_tables(article);
    state.bump_epoch();
}

/// Strip presentational attributes recursively, skipping `<svg>` subtrees.
fn clean_styles(node: &NodeRef) {
    if !node.is_element() || dom::is_tag(node, "svg") {
        return;
    }

    for attribute in PRESENTATIONAL_ATTRIBUTES {
        dom::remove_attribute(node, attribute);
    }
    if dom::tag_name(node).is_some_and(|t| DEPRECATED_SIZE_ATTRIBUTE_ELEMS.contains(&t.as_str())) {
        dom::remove_attribute(node, "width");
        dom::remove_attribute(node, "height");
    }

    for child in dom::element_children(node) {
        clean_styles(&child);
    }
}

/// Integer prefix of an attribute value, tolerating trailing garbage.
fn parse_span(value: Option<String>) -> Option<usize> {
    let value = value?;
    let digits: String = value.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Row and column counts of a table, honoring rowspan/colspan.
fn get_row_and_column_count(table: &NodeRef) -> (usize, usize) {
    let mut rows = 0;
    let mut columns = 0;
    for tr in dom::get_elements_by_tags(table, &["tr"]) {
        rows += parse_span(dom::get_attribute(&tr, "rowspan")).unwrap_or(1);
        let mut columns_in_row = 0;
        for cell in dom::get_elements_by_tags(&tr, &["td"]) {
            columns_in_row += parse_span(dom::get_attribute(&cell, "colspan")).unwrap_or(1);
        }
        columns = columns.max(columns_in_row);
    }
    (rows, columns)
}

/// Decide which tables carry data rather than layout, and record them so
/// the conditional cleaner leaves them (and their contents) alone.
fn mark_data_tables(state: &mut ScoreState, article: &NodeRef) {
    for table in dom::get_elements_by_tags(article, &["table"]) {
        if dom::get_attribute(&table, "role").as_deref() == Some("presentation") {
            continue;
        }
        if dom::get_attribute(&table, "datatable").as_deref() == Some("0") {
            continue;
        }
        if dom::has_attribute(&table, "summary") {
            state.mark_data_table(table.id);
            continue;
        }

        if let Some(caption) = dom::get_elements_by_tags(&table, &["caption"]).first() {
            if !dom::child_nodes(caption).is_empty() {
                state.mark_data_table(table.id);
                continue;
            }
        }

        // Structural markers that only data tables use.
        if ["col", "colgroup", "tfoot", "thead", "th"]
            .iter()
            .any(|tag| !dom::get_elements_by_tags(&table, &[tag]).is_empty())
        {
            state.mark_data_table(table.id);
            continue;
        }

        // Nested tables indicate layout.
        if !dom::get_elements_by_tags(&table, &["table"]).is_empty() {
            continue;
        }

        let (rows, columns) = get_row_and_column_count(&table);
        if rows == 1 || columns == 1 {
            continue;
        }
        if rows >= 10 || columns > 4 || rows * columns > 10 {
            state.mark_data_table(table.id);
        }
    }
}

/// Repair lazy-loaded images: drop tiny base64 placeholders that shadow a
/// real URL, and copy image URLs out of data attributes into
/// `src`/`srcset`.
fn fix_lazy_images(doc: &Document, article: &NodeRef) {
    for elem in dom::get_elements_by_tags(article, &["img", "picture", "figure"]) {
        if let Some(src) = dom::get_attribute(&elem, "src") {
            if let Some(caps) = B64_DATA_URL.captures(&src) {
                if &caps[1] != "image/svg+xml" {
                    let src_could_be_removed = dom::get_all_attributes(&elem)
                        .iter()
                        .any(|(name, value)| name != "src" && IMG_EXTENSION.is_match(value));

                    if src_could_be_removed {
                        if let Some(marker) = B64_MARKER.find(&src) {
                            let b64_start = marker.start() + 7;
                            if src.len().saturating_sub(b64_start) < 133 {
                                dom::remove_attribute(&elem, "src");
                            }
                        }
                    }
                }
            }
        }

        let has_src = dom::get_attribute(&elem, "src").is_some();
        let has_srcset =
            dom::get_attribute(&elem, "srcset").is_some_and(|s| s != "null");
        if (has_src || has_srcset) && !dom::class_name(&elem).to_lowercase().contains("lazy") {
            continue;
        }

        for (name, value) in dom::get_all_attributes(&elem) {
            if name == "src" || name == "srcset" || name == "alt" {
                continue;
            }
            let copy_to = if SRCSET_SHAPED.is_match(&value) {
                Some("srcset")
            } else if SINGLE_IMAGE_URL.is_match(&value) {
                Some("src")
            } else {
                None
            };
            let Some(copy_to) = copy_to else { continue };

            if dom::is_tag(&elem, "img") || dom::is_tag(&elem, "picture") {
                dom::set_attribute(&elem, copy_to, &value);
            } else if dom::is_tag(&elem, "figure")
                && dom::get_elements_by_tags(&elem, &["img", "picture"]).is_empty()
            {
                let img = dom::create_element(doc, "img");
                dom::set_attribute(&img, copy_to, &value);
                dom::append_child(&elem, &img);
            }
        }
    }
}

/// Remove every element with the given tag, keeping allowlisted video
/// embeds.
fn clean(article: &NodeRef, tag: &str, opts: &Options) {
    let is_embed = matches!(tag, "object" | "embed" | "iframe");
    let video_regex = opts.allowed_video_regex.as_ref().unwrap_or(&ALLOWED_VIDEOS);

    for node in dom::get_elements_by_tags(article, &[tag]) {
        if is_embed {
            if dom::get_all_attributes(&node).iter().any(|(_, value)| video_regex.is_match(value))
            {
                continue;
            }
            if dom::is_tag(&node, "object") && video_regex.is_match(&dom::inner_html(&node)) {
                continue;
            }
        }
        node.remove_from_parent();
    }
}

/// Walk the subtree below `node` removing elements the filter flags.
fn clean_matched_nodes(node: &NodeRef, filter: impl Fn(&NodeRef, &str) -> bool) {
    let end_of_search = dom::next_element(node, true).map(|n| n.id);
    let mut next = dom::next_element(node, false);
    while let Some(current) = next {
        if Some(current.id) == end_of_search {
            break;
        }
        if filter(&current, &dom::class_and_id(&current)) {
            next = dom::remove_and_get_next(&current);
        } else {
            next = dom::next_element(&current, false);
        }
    }
}

/// Drop `<h1>`/`<h2>` headings with a negative class weight.
fn clean_headers(article: &NodeRef, flags: Flags) {
    for heading in dom::get_elements_by_tags(article, &["h1", "h2"]) {
        if class_weight(&heading, flags.weight_classes) < 0.0 {
            heading.remove_from_parent();
        }
    }
}

/// Replace `<table><tbody><tr><td>` chains holding a single cell with that
/// cell, as a paragraph or div depending on its contents.
fn collapse_single_cell_tables(article: &NodeRef) {
    for table in dom::get_elements_by_tags(article, &["table"]) {
        let tbody = if dom::has_single_tag_inside_element(&table, "tbody") {
            match dom::first_element_child(&table) {
                Some(t) => t,
                None => continue,
            }
        } else {
            table.clone()
        };
        if !dom::has_single_tag_inside_element(&tbody, "tr") {
            continue;
        }
        let Some(row) = dom::first_element_child(&tbody) else { continue };
        if !dom::has_single_tag_inside_element(&row, "td") {
            continue;
        }
        let Some(cell) = dom::first_element_child(&row) else { continue };

        let all_phrasing = dom::child_nodes(&cell).iter().all(dom::is_phrasing_content);
        dom::set_node_tag(&cell, if all_phrasing { "p" } else { "div" });
        dom::replace_node(&table, &cell);
    }
}

/// Sum of the text of matching descendants over the node's own text.
fn get_text_density(node: &NodeRef, tags: &[&str]) -> f64 {
    let text_length = char_count(&inner_text(node, true));
    if text_length == 0 {
        return 0.0;
    }
    let children_length: usize = dom::get_elements_by_tags(node, tags)
        .iter()
        .map(|child| char_count(&inner_text(child, true)))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    {
        children_length as f64 / text_length as f64
    }
}

/// Remove containers that look like boilerplate by their shape: too many
/// links, lists of images, input clusters, or no text at all. Data tables,
/// code samples, and allowlisted embeds are kept.
#[allow(clippy::too_many_lines)]
fn clean_conditionally(
    article: &NodeRef,
    tag: &str,
    state: &mut ScoreState,
    flags: Flags,
    opts: &Options,
) {
    if !flags.clean_conditionally {
        return;
    }

    let video_regex = opts.allowed_video_regex.as_ref().unwrap_or(&ALLOWED_VIDEOS);

    for node in dom::get_elements_by_tags(article, &[tag]) {
        let is_list_tag = tag == "ul" || tag == "ol";
        let is_list = is_list_tag || {
            let node_text_length = char_count(&inner_text(&node, true));
            let list_length: usize = dom::get_elements_by_tags(&node, &["ul", "ol"])
                .iter()
                .map(|list| char_count(&inner_text(list, true)))
                .sum();
            #[allow(clippy::cast_precision_loss)]
            {
                node_text_length > 0 && list_length as f64 / node_text_length as f64 > 0.9
            }
        };

        if tag == "table" && state.is_data_table(node.id) {
            continue;
        }

        // Anything living inside a data table or code sample is content.
        let data_table_filter = |t: &NodeRef| state.is_data_table(t.id);
        if dom::has_ancestor_tag(&node, "table", -1, Some(&data_table_filter)) {
            continue;
        }
        if dom::has_ancestor_tag(&node, "code", 3, None) {
            continue;
        }
        if dom::get_elements_by_tags(&node, &["table"])
            .iter()
            .any(|t| state.is_data_table(t.id))
        {
            continue;
        }

        let weight = class_weight(&node, flags.weight_classes);
        if weight < 0.0 {
            node.remove_from_parent();
            continue;
        }

        // Plain comma count here; the Unicode comma class only feeds the
        // scoring pass.
        let inner = inner_text(&node, true);
        if inner.matches(',').count() >= 10 {
            continue;
        }

        // Few commas: judge the container by its composition.
        #[allow(clippy::cast_precision_loss)]
        let p_count = dom::get_elements_by_tags(&node, &["p"]).len() as f64;
        #[allow(clippy::cast_precision_loss)]
        let img_count = dom::get_elements_by_tags(&node, &["img"]).len() as f64;
        #[allow(clippy::cast_precision_loss)]
        let li_count = dom::get_elements_by_tags(&node, &["li"]).len() as f64 - 100.0;
        #[allow(clippy::cast_precision_loss)]
        let input_count = dom::get_elements_by_tags(&node, &["input"]).len() as f64;
        let heading_density = get_text_density(&node, &["h1", "h2", "h3", "h4", "h5", "h6"]);

        let mut embed_count = 0usize;
        let mut allowed_embed = false;
        for embed in dom::get_elements_by_tags(&node, &["object", "embed", "iframe"]) {
            if dom::get_all_attributes(&embed).iter().any(|(_, value)| video_regex.is_match(value))
            {
                allowed_embed = true;
                break;
            }
            if dom::is_tag(&embed, "object") && video_regex.is_match(&dom::inner_html(&embed)) {
                allowed_embed = true;
                break;
            }
            embed_count += 1;
        }
        if allowed_embed {
            continue;
        }

        if AD_WORDS.is_match(&inner) || LOADING_WORDS.is_match(&inner) {
            node.remove_from_parent();
            continue;
        }

        let content_length = char_count(&inner);
        let link_density = state.link_density(&node);
        let text_density = get_text_density(
            &node,
            &["span", "li", "td", "blockquote", "dl", "div", "img", "ol", "p", "pre", "table", "ul"],
        );
        let is_figure_child = dom::has_ancestor_tag(&node, "figure", 3, None);

        let have_to_remove = (!is_figure_child && img_count > 1.0 && p_count / img_count < 0.5)
            || (!is_list && li_count > p_count)
            || (input_count > (p_count / 3.0).floor())
            || (!is_list
                && !is_figure_child
                && heading_density < 0.9
                && content_length < 25
                && (img_count == 0.0 || img_count > 2.0)
                && link_density > 0.0)
            || (!is_list && weight < 25.0 && link_density > 0.2 + opts.link_density_modifier)
            || (weight >= 25.0 && link_density > 0.5 + opts.link_density_modifier)
            || ((embed_count == 1 && content_length < 75) || embed_count > 1)
            || (img_count == 0.0 && text_density == 0.0);

        let mut remove = have_to_remove;
        if is_list && have_to_remove {
            // Image galleries marked up as lists are kept: one image per
            // item and no nested structure.
            let has_complex_child = dom::element_children(&node)
                .iter()
                .any(|child| dom::element_children(child).len() > 1);
            if !has_complex_child {
                #[allow(clippy::cast_precision_loss)]
                let li_total = dom::get_elements_by_tags(&node, &["li"]).len() as f64;
                if (img_count - li_total).abs() < f64::EPSILON {
                    remove = false;
                }
            }
        }

        if remove {
            node.remove_from_parent();
        }
    }
}
