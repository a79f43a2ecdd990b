//! Metadata extraction.
//!
//! Combines JSON-LD records and `<meta>` tag values into a single
//! [`Metadata`] record, falling back to the refined `<title>` text when no
//! explicit title is declared. JSON-LD wins over `<meta>` for every field.

pub mod json_ld;
pub mod meta_tags;

use url::Url;

use crate::dom::{self, Document};
use crate::options::Options;
use crate::patterns::{
    NORMALIZE, TITLE_AFTER_FIRST_SEPARATOR, TITLE_ANY_SEPARATOR, TITLE_BEFORE_LAST_SEPARATOR,
    TITLE_HIERARCHY_SEPARATOR, TITLE_SEPARATOR,
};
use crate::result::Metadata;
use crate::text::{self, unescape_html_entities, word_count};

pub use json_ld::extract_json_ld;
pub use meta_tags::collect_meta_values;

/// Extract all metadata from a document.
///
/// Runs the JSON-LD path (unless disabled), then fills remaining fields
/// from `<meta>` tags by fixed priority, then falls back to the refined
/// document title. Named and numeric HTML entities in every field are
/// unescaped at the end.
#[must_use]
pub fn get_article_metadata(doc: &Document, opts: &Options) -> Metadata {
    let json_ld = if opts.disable_json_ld {
        Metadata::default()
    } else {
        json_ld::extract_json_ld(doc, &get_article_title(doc))
    };

    let values = meta_tags::collect_meta_values(doc);
    let pick = |keys: &[&str]| -> Option<String> {
        keys.iter().find_map(|k| values.get(*k).cloned())
    };

    let mut metadata = Metadata::default();

    metadata.title = json_ld.title.or_else(|| {
        pick(&[
            "dc:title",
            "dcterm:title",
            "og:title",
            "weibo:article:title",
            "weibo:webpage:title",
            "title",
            "twitter:title",
            "parsely-title",
        ])
    });
    if metadata.title.as_deref().is_none_or(str::is_empty) {
        metadata.title = Some(get_article_title(doc));
    }

    // An `article:author` value that is a URL points at a profile page, not
    // a name.
    let article_author = values
        .get("article:author")
        .filter(|v| Url::parse(v).is_err())
        .cloned();
    metadata.byline = json_ld
        .byline
        .or_else(|| pick(&["dc:creator", "dcterm:creator", "author", "parsely-author"]))
        .or(article_author);

    metadata.excerpt = json_ld.excerpt.or_else(|| {
        pick(&[
            "dc:description",
            "dcterm:description",
            "og:description",
            "weibo:article:description",
            "weibo:webpage:description",
            "description",
            "twitter:description",
        ])
    });

    metadata.site_name = json_ld.site_name.or_else(|| pick(&["og:site_name"]));

    metadata.published_time = json_ld
        .published_time
        .or_else(|| pick(&["article:published_time", "parsely-pub-date"]));

    metadata.title = metadata.title.map(|v| unescape_html_entities(&v));
    metadata.byline = metadata.byline.map(|v| unescape_html_entities(&v));
    metadata.excerpt = metadata.excerpt.map(|v| unescape_html_entities(&v));
    metadata.site_name = metadata.site_name.map(|v| unescape_html_entities(&v));
    metadata.published_time = metadata.published_time.map(|v| unescape_html_entities(&v));

    metadata
}

/// Derive the article title from the document `<title>`.
///
/// Detects hierarchical separators and site-name suffixes, falls back to a
/// lone `<h1>` for degenerate lengths, and reverts to the original when the
/// refined result looks over-trimmed.
#[must_use]
pub fn get_article_title(doc: &Document) -> String {
    let orig_title = doc
        .select("title")
        .nodes()
        .first()
        .map_or_else(String::new, |n| dom::text_content(n).trim().to_string());
    let mut cur_title = orig_title.clone();
    let mut had_hierarchical_separators = false;

    if TITLE_SEPARATOR.is_match(&cur_title) {
        had_hierarchical_separators = TITLE_HIERARCHY_SEPARATOR.is_match(&cur_title);
        cur_title = TITLE_BEFORE_LAST_SEPARATOR.replace(&orig_title, "$1").to_string();

        if word_count(&cur_title) < 3 {
            cur_title = TITLE_AFTER_FIRST_SEPARATOR.replace(&orig_title, "$1").to_string();
        }
    } else if cur_title.contains(": ") {
        // Only trim at a colon when no heading carries the full title.
        let trimmed_title = cur_title.trim().to_string();
        let heading_matches = doc.select("html").nodes().first().is_some_and(|root| {
            dom::get_elements_by_tags(root, &["h1", "h2"])
                .iter()
                .any(|h| dom::text_content(h).trim() == trimmed_title)
        });

        if !heading_matches {
            if let Some(last_colon) = orig_title.rfind(':') {
                cur_title = orig_title[last_colon + 1..].to_string();
                if word_count(&cur_title) < 3 {
                    if let Some(first_colon) = orig_title.find(':') {
                        cur_title = orig_title[first_colon + 1..].to_string();
                    }
                } else if orig_title
                    .find(':')
                    .is_some_and(|first| word_count(&orig_title[..first]) > 5)
                {
                    cur_title = orig_title.clone();
                }
            }
        }
    } else if !(15..=150).contains(&text::char_count(&cur_title)) {
        let h_ones = doc.select("h1").nodes().to_vec();
        if h_ones.len() == 1 {
            cur_title = text::inner_text(&h_ones[0], true);
        }
    }

    cur_title = NORMALIZE.replace_all(cur_title.trim(), " ").to_string();

    // A short refined title is usually over-trimmed; keep the original
    // unless the only thing removed was a hierarchical separator.
    let cur_count = word_count(&cur_title);
    if cur_count <= 4
        && (!had_hierarchical_separators
            || cur_count != word_count(&TITLE_ANY_SEPARATOR.replace_all(&orig_title, "")) - 1)
    {
        cur_title = orig_title;
    }

    cur_title
}
