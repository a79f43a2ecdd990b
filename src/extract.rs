//! The extraction pipeline facade.
//!
//! [`Readability`] owns one document and drives the stages in order: the
//! element-count gate, the readerable probe, metadata harvesting,
//! preprocessing, the grabber, post-processing, and serialization. A
//! `parse` call mutates the document in place; construct from an HTML
//! string to keep the caller's document untouched.

use url::Url;

use crate::dom::{self, Document, Selection};
use crate::error::{Error, Result};
use crate::grabber::Grabber;
use crate::metadata;
use crate::options::Options;
use crate::postprocess;
use crate::preprocess;
use crate::readerable::{self, ReaderableOptions};
use crate::result::Article;
use crate::serialize::{self, ExplicitBooleans};
use crate::text::char_count;

/// Custom serializer for the final article element.
pub type Serializer = Box<dyn Fn(&Selection) -> String>;

/// The article extraction driver.
///
/// # Example
///
/// ```rust
/// use rs_readability::Readability;
///
/// let html = r#"<html><head><title>A Quiet Place</title></head>
/// <body><article>
///   <p>Enough prose to make extraction worthwhile, sentence by sentence,
///      clause by clause, until the scorer is satisfied it found content.</p>
/// </article></body></html>"#;
///
/// let article = Readability::new(html, "https://example.com/post", None).parse()?;
/// if let Some(article) = article {
///     println!("{}: {} chars", article.title.as_deref().unwrap_or("untitled"), article.length);
/// }
/// # Ok::<(), rs_readability::Error>(())
/// ```
pub struct Readability {
    doc: Document,
    document_uri: Url,
    options: Options,
    /// Raw source, kept for explicit-boolean recovery. Absent when
    /// constructed from a pre-parsed document.
    source_html: Option<String>,
    serializer: Option<Serializer>,
}

impl Readability {
    /// Parse an HTML string against a document URI.
    ///
    /// An unparseable URI falls back to `about:blank`, which disables
    /// relative URI resolution but never blocks extraction.
    #[must_use]
    pub fn new(html: &str, document_uri: &str, options: Option<Options>) -> Self {
        Self {
            doc: dom::parse(html),
            document_uri: parse_document_uri(document_uri),
            options: options.unwrap_or_default(),
            source_html: Some(html.to_string()),
            serializer: None,
        }
    }

    /// Parse raw bytes, detecting the character encoding from meta tags.
    #[must_use]
    pub fn from_bytes(html: &[u8], document_uri: &str, options: Option<Options>) -> Self {
        let html = crate::encoding::transcode_to_utf8(html);
        Self::new(&html, document_uri, options)
    }

    /// Wrap an already-parsed document. The document is mutated in place by
    /// `parse`, and explicit boolean spellings cannot be recovered (XML
    /// output promotes every empty-valued whitelist attribute).
    #[must_use]
    pub fn from_document(doc: Document, document_uri: &str, options: Option<Options>) -> Self {
        Self {
            doc,
            document_uri: parse_document_uri(document_uri),
            options: options.unwrap_or_default(),
            source_html: None,
            serializer: None,
        }
    }

    /// Replace the built-in serializer for the final article element.
    #[must_use]
    pub fn with_serializer(mut self, serializer: Serializer) -> Self {
        self.serializer = Some(serializer);
        self
    }

    /// Run the pipeline.
    ///
    /// Returns `Ok(None)` when no article could be isolated. The only
    /// error is the element-cap breach.
    pub fn parse(self) -> Result<Option<Article>> {
        let Self { doc, document_uri, options, source_html, serializer } = self;

        if options.max_elems_to_parse > 0 {
            let num_elements = dom::element_count(&doc);
            if num_elements > options.max_elems_to_parse {
                return Err(Error::TooManyElements(num_elements));
            }
        }

        let readerable = readerable::is_probably_readerable(&doc, &ReaderableOptions::default());

        let mut meta = metadata::get_article_metadata(&doc, &options);
        let article_title = meta.title.clone().unwrap_or_default();

        preprocess::prep_document(&doc);

        let grabber = Grabber::new(&doc, &options, article_title, meta.byline.is_some());
        let Some(grabbed) = grabber.grab() else {
            if options.debug {
                eprintln!("DEBUG: no article content found after all attempts");
            }
            return Ok(None);
        };

        postprocess::post_process_content(&doc, &grabbed.content, &document_uri, &options);

        // The article body supplies the excerpt when metadata did not.
        if meta.excerpt.as_deref().is_none_or(str::is_empty) {
            meta.excerpt = dom::get_elements_by_tags(&grabbed.content, &["p"])
                .first()
                .map(|p| dom::text_content(p).trim().to_string());
        }

        let text_content = dom::text_content(&grabbed.content).trim().to_string();
        let length = char_count(&text_content);

        let content = if let Some(serializer) = &serializer {
            serializer(&Selection::from(grabbed.content))
        } else if options.use_xml_serializer {
            let booleans = source_html.as_deref().map(ExplicitBooleans::from_source);
            serialize::serialize_xml_children(&grabbed.content, booleans.as_ref())
        } else {
            serialize::serialize_html_children(&grabbed.content)
        };

        let lang = doc
            .select("html")
            .nodes()
            .first()
            .and_then(|html| dom::get_attribute(html, "lang"))
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        Ok(Some(Article {
            title: clean_field(meta.title),
            byline: clean_field(meta.byline.or(grabbed.byline)),
            dir: grabbed.dir,
            lang,
            excerpt: clean_field(meta.excerpt),
            site_name: clean_field(meta.site_name),
            published_time: clean_field(meta.published_time),
            content,
            text_content,
            length,
            readerable,
        }))
    }
}

#[allow(clippy::expect_used)]
fn parse_document_uri(document_uri: &str) -> Url {
    Url::parse(document_uri)
        .or_else(|_| Url::parse("about:blank"))
        .expect("about:blank URL")
}

fn clean_field(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html lang="en"><head>
        <title>Harbor Lights: A Season On The Water | Example Times</title>
        <meta property="og:description" content="A season on the water.">
        <meta property="og:site_name" content="Example Times">
    </head>
    <body>
        <div class="article-body">
            <p>The harbor opens before dawn, and the first boats slip out in the dark,
               one after another, with the patience of people who have done this for
               decades and expect to do it for decades more.</p>
            <p>By noon the water is crowded, loud, and bright, and the stories that
               come back with the catch are half true at best, which bothers no one,
               least of all the people telling them.</p>
        </div>
    </body></html>"#;

    #[test]
    fn parses_a_simple_article() {
        let article = Readability::new(PAGE, "https://example.com/harbor", None)
            .parse()
            .unwrap()
            .expect("article");

        assert_eq!(article.title.as_deref(), Some("Harbor Lights: A Season On The Water"));
        assert_eq!(article.site_name.as_deref(), Some("Example Times"));
        assert_eq!(article.excerpt.as_deref(), Some("A season on the water."));
        assert_eq!(article.lang.as_deref(), Some("en"));
        assert!(article.content.contains("readability-page-1"));
        assert!(article.text_content.contains("harbor opens before dawn"));
        assert_eq!(article.length, char_count(&article.text_content));
    }

    #[test]
    fn element_cap_aborts_with_exact_message() {
        let options = Options { max_elems_to_parse: 1, ..Options::default() };
        let err = Readability::new(PAGE, "https://example.com/", Some(options))
            .parse()
            .unwrap_err();
        assert!(err.to_string().starts_with("Aborting parsing document; "));
        assert!(err.to_string().ends_with(" elements found"));
    }

    #[test]
    fn empty_page_yields_none() {
        let article = Readability::new(
            "<html><body></body></html>",
            "https://example.com/",
            None,
        )
        .parse()
        .unwrap();
        assert!(article.is_none());
    }

    #[test]
    fn custom_serializer_receives_final_element() {
        let article = Readability::new(PAGE, "https://example.com/harbor", None)
            .with_serializer(Box::new(|sel| format!("#{}#", sel.nodes().len())))
            .parse()
            .unwrap()
            .expect("article");
        assert_eq!(article.content, "#1#");
    }

    #[test]
    fn from_bytes_transcodes_before_parsing() {
        let html = PAGE.replace("harbor opens", "harbor caf\u{E9} opens");
        // Valid UTF-8 input passes straight through.
        let article = Readability::from_bytes(html.as_bytes(), "https://example.com/", None)
            .parse()
            .unwrap()
            .expect("article");
        assert!(article.text_content.contains("caf\u{E9}"));
    }
}
