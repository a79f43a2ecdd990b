//! # rs-readability
//!
//! Article extraction for web pages: finds the primary readable content of
//! an HTML document and returns it as a cleaned fragment together with the
//! page's metadata (title, byline, excerpt, site name, publication time,
//! language, and text direction).
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_readability::parse;
//!
//! let html = r#"<html><head><title>My Article</title></head>
//! <body><article>
//!   <p>Readable prose, long enough for the scorer to pick it out from the
//!      page chrome, with commas, clauses, and complete sentences.</p>
//! </article></body></html>"#;
//!
//! if let Some(article) = parse(html, "https://example.com/post")? {
//!     println!("Title: {:?}", article.title);
//!     println!("Text: {}", article.text_content);
//! }
//! # Ok::<(), rs_readability::Error>(())
//! ```
//!
//! ## How it works
//!
//! The pipeline mirrors the reader modes shipped in browsers: harvest
//! metadata from JSON-LD and `<meta>` tags, strip scripts and hidden
//! chrome, score paragraph-like elements into their ancestors, pick the
//! best candidate subtree plus qualifying siblings, and clean the result.
//! When the output is too short the scorer retries with progressively
//! relaxed heuristics before giving up.

mod error;
mod extract;
mod grabber;
mod options;
mod patterns;
mod postprocess;
mod preprocess;
mod result;
mod serialize;
mod text;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Metadata extraction (JSON-LD, HTML meta tags).
pub mod metadata;

/// Readerable probability probe.
pub mod readerable;

// Public API - re-exports
pub use error::{Error, Result};
pub use extract::{Readability, Serializer};
pub use options::Options;
pub use readerable::{is_probably_readerable, ReaderableOptions};
pub use result::{Article, Metadata};
pub use serialize::ExplicitBooleans;

/// Extract the main article from an HTML document using default options.
///
/// # Arguments
///
/// * `html` - The HTML document as a string slice
/// * `document_uri` - The document's URI, used to resolve relative links
///
/// # Returns
///
/// `Ok(Some(Article))` when an article was found, `Ok(None)` when the page
/// has no extractable content, and an error only when the configured
/// element cap is exceeded.
#[allow(clippy::missing_errors_doc)]
pub fn parse(html: &str, document_uri: &str) -> Result<Option<Article>> {
    Readability::new(html, document_uri, None).parse()
}

/// Extract the main article from an HTML document with custom options.
///
/// # Example
///
/// ```rust
/// use rs_readability::{parse_with_options, Options};
///
/// let html = "<html><body><article><p>Short.</p></article></body></html>";
/// let options = Options {
///     char_threshold: 10,
///     keep_classes: true,
///     ..Options::default()
/// };
/// let result = parse_with_options(html, "https://example.com/", options)?;
/// # Ok::<(), rs_readability::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn parse_with_options(
    html: &str,
    document_uri: &str,
    options: Options,
) -> Result<Option<Article>> {
    Readability::new(html, document_uri, Some(options)).parse()
}

/// Extract the main article from raw HTML bytes.
///
/// Detects the character encoding from meta tags and converts to UTF-8
/// before parsing; undecodable bytes become U+FFFD rather than errors.
#[allow(clippy::missing_errors_doc)]
pub fn parse_bytes(html: &[u8], document_uri: &str) -> Result<Option<Article>> {
    Readability::from_bytes(html, document_uri, None).parse()
}
