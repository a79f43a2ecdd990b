//! Result types for extraction output.
//!
//! This module defines the structured output of article extraction: the
//! final [`Article`] handed to callers and the intermediate [`Metadata`]
//! record harvested from JSON-LD and `<meta>` tags.

use serde::Serialize;

/// The extracted article.
///
/// String fields are trimmed. `length` counts Unicode scalars of
/// `text_content`, not bytes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Article {
    /// Article title.
    pub title: Option<String>,

    /// Author byline, from metadata or detected in the page body.
    pub byline: Option<String>,

    /// Text direction (`ltr`/`rtl`), from the nearest `dir` attribute on the
    /// chosen content or its ancestors.
    pub dir: Option<String>,

    /// Content language, from `<html lang>`.
    pub lang: Option<String>,

    /// Short description, from metadata or the first paragraph of the
    /// extracted content.
    pub excerpt: Option<String>,

    /// Name of the publishing site.
    pub site_name: Option<String>,

    /// Publication time as found in the document, untouched apart from
    /// trimming.
    pub published_time: Option<String>,

    /// The cleaned article fragment, serialized as HTML (or XML when
    /// configured).
    pub content: String,

    /// Plain text of the article fragment.
    pub text_content: String,

    /// Character count of `text_content`.
    pub length: usize,

    /// Result of the readerable probe on the source document.
    pub readerable: bool,
}

/// Metadata harvested from a document before content extraction.
///
/// All fields are optional; `byline` and `excerpt` may be filled later from
/// the article body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Page title.
    pub title: Option<String>,

    /// Author name(s).
    pub byline: Option<String>,

    /// Page description.
    pub excerpt: Option<String>,

    /// Site name (e.g. "The Example Times").
    pub site_name: Option<String>,

    /// Publication time string, e.g. an ISO 8601 date.
    pub published_time: Option<String>,
}
