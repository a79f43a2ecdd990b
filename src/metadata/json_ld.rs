//! JSON-LD metadata parsing.
//!
//! Extracts article metadata from schema.org JSON-LD embedded in
//! `<script type="application/ld+json">` blocks. The first script that
//! carries a schema.org context and an article type wins; malformed JSON or
//! foreign vocabularies simply contribute nothing.

use serde_json::Value;

use crate::dom::{self, Document};
use crate::patterns::{CDATA_WRAPPER, JSON_LD_ARTICLE_TYPES, SCHEMA_ORG_CONTEXT};
use crate::result::Metadata;
use crate::text::text_similarity;

/// Extract metadata from the document's JSON-LD scripts.
///
/// `page_title` is the refined `<title>` text, used to arbitrate between a
/// record's `name` and `headline` when both are present and differ.
#[must_use]
pub fn extract_json_ld(doc: &Document, page_title: &str) -> Metadata {
    let mut metadata = Metadata::default();

    for node in doc.select(r#"script[type="application/ld+json"]"#).nodes() {
        let raw = dom::text_content(node);
        let content = CDATA_WRAPPER.replace_all(&raw, "");

        let Ok(parsed) = serde_json::from_str::<Value>(&content) else {
            continue;
        };

        let Some(record) = select_article_record(parsed) else {
            continue;
        };

        harvest_record(&record, page_title, &mut metadata);
        break;
    }

    metadata
}

/// Pick the article object out of a parsed JSON-LD value, applying the
/// context check and descending into `@graph` when needed.
fn select_article_record(parsed: Value) -> Option<Value> {
    // A top-level array: take the first entry with an article type.
    let parsed = if let Value::Array(items) = parsed {
        items.into_iter().find(|it| has_article_type(it))?
    } else {
        parsed
    };

    // The record must live in the schema.org vocabulary, either directly
    // or through @vocab.
    let context_matches = match parsed.get("@context") {
        Some(Value::String(ctx)) => SCHEMA_ORG_CONTEXT.is_match(ctx),
        Some(Value::Object(ctx)) => ctx
            .get("@vocab")
            .and_then(Value::as_str)
            .is_some_and(|v| SCHEMA_ORG_CONTEXT.is_match(v)),
        _ => false,
    };
    if !context_matches {
        return None;
    }

    let parsed = if parsed.get("@type").is_none() {
        match parsed.get("@graph") {
            Some(Value::Array(graph)) => graph.iter().find(|it| has_article_type(it)).cloned()?,
            _ => parsed,
        }
    } else {
        parsed
    };

    has_article_type(&parsed).then_some(parsed)
}

fn has_article_type(value: &Value) -> bool {
    value
        .get("@type")
        .and_then(Value::as_str)
        .is_some_and(|t| JSON_LD_ARTICLE_TYPES.is_match(t))
}

/// Copy the record's fields into the metadata record.
fn harvest_record(record: &Value, page_title: &str, metadata: &mut Metadata) {
    let name = record.get("name").and_then(Value::as_str);
    let headline = record.get("headline").and_then(Value::as_str);

    match (name, headline) {
        (Some(name), Some(headline)) if name != headline => {
            // Both present and different: prefer whichever resembles the
            // page title, defaulting to name.
            let name_matches = text_similarity(name, page_title) > 0.75;
            let headline_matches = text_similarity(headline, page_title) > 0.75;
            let chosen = if headline_matches && !name_matches { headline } else { name };
            metadata.title = Some(chosen.trim().to_string());
        }
        (Some(name), _) => metadata.title = Some(name.trim().to_string()),
        (None, Some(headline)) => metadata.title = Some(headline.trim().to_string()),
        (None, None) => {}
    }

    if let Some(author) = record.get("author") {
        if let Some(single) = author.get("name").and_then(Value::as_str) {
            metadata.byline = Some(single.trim().to_string());
        } else if let Value::Array(authors) = author {
            let joined: Vec<&str> = authors
                .iter()
                .filter_map(|a| a.get("name").and_then(Value::as_str))
                .map(str::trim)
                .collect();
            if authors.first().and_then(|a| a.get("name")).and_then(Value::as_str).is_some() {
                metadata.byline = Some(joined.join(", "));
            }
        }
    }

    if let Some(description) = record.get("description").and_then(Value::as_str) {
        metadata.excerpt = Some(description.trim().to_string());
    }
    if let Some(publisher) = record.get("publisher").and_then(|p| p.get("name")).and_then(Value::as_str) {
        metadata.site_name = Some(publisher.trim().to_string());
    }
    if let Some(date) = record.get("datePublished").and_then(Value::as_str) {
        metadata.published_time = Some(date.trim().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    fn extract(html: &str) -> Metadata {
        let doc = dom::parse(html);
        extract_json_ld(&doc, "")
    }

    #[test]
    fn simple_article_record() {
        let metadata = extract(
            r#"<html><head><script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "NewsArticle",
                "name": "Quiet Launch",
                "description": "A short description.",
                "datePublished": "2021-04-01T09:00:00Z",
                "author": {"@type": "Person", "name": "Ada Writer"},
                "publisher": {"@type": "Organization", "name": "Example Daily"}
            }
            </script></head><body></body></html>"#,
        );

        assert_eq!(metadata.title.as_deref(), Some("Quiet Launch"));
        assert_eq!(metadata.byline.as_deref(), Some("Ada Writer"));
        assert_eq!(metadata.excerpt.as_deref(), Some("A short description."));
        assert_eq!(metadata.site_name.as_deref(), Some("Example Daily"));
        assert_eq!(metadata.published_time.as_deref(), Some("2021-04-01T09:00:00Z"));
    }

    #[test]
    fn rejects_foreign_context() {
        let metadata = extract(
            r#"<script type="application/ld+json">
            {"@context": "https://example.org", "@type": "Article", "name": "Nope"}
            </script>"#,
        );
        assert_eq!(metadata.title, None);
    }

    #[test]
    fn accepts_vocab_context() {
        let metadata = extract(
            r#"<script type="application/ld+json">
            {"@context": {"@vocab": "http://schema.org/"}, "@type": "BlogPosting", "name": "Via Vocab"}
            </script>"#,
        );
        assert_eq!(metadata.title.as_deref(), Some("Via Vocab"));
    }

    #[test]
    fn descends_into_graph() {
        let metadata = extract(
            r#"<script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@graph": [
                    {"@type": "WebSite", "name": "Example Site"},
                    {"@type": "Article", "name": "Graph Article"}
                ]
            }
            </script>"#,
        );
        assert_eq!(metadata.title.as_deref(), Some("Graph Article"));
    }

    #[test]
    fn joins_author_array() {
        let metadata = extract(
            r#"<script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "Article",
                "name": "Team Effort",
                "author": [
                    {"@type": "Person", "name": "First Author"},
                    {"@type": "Person", "name": "Second Author"}
                ]
            }
            </script>"#,
        );
        assert_eq!(metadata.byline.as_deref(), Some("First Author, Second Author"));
    }

    #[test]
    fn headline_wins_when_it_matches_page_title() {
        let doc = dom::parse(
            r#"<script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "Article",
                "name": "SEO stub",
                "headline": "The Real Story Of The Harbor"
            }
            </script>"#,
        );
        let metadata = extract_json_ld(&doc, "The Real Story Of The Harbor");
        assert_eq!(metadata.title.as_deref(), Some("The Real Story Of The Harbor"));
    }

    #[test]
    fn name_wins_by_default() {
        let doc = dom::parse(
            r#"<script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "Article",
                "name": "Chosen Name",
                "headline": "Unrelated Headline"
            }
            </script>"#,
        );
        let metadata = extract_json_ld(&doc, "Something Else Entirely");
        assert_eq!(metadata.title.as_deref(), Some("Chosen Name"));
    }

    #[test]
    fn invalid_json_is_skipped() {
        let metadata = extract(
            r#"<script type="application/ld+json">{ not json }</script>
            <script type="application/ld+json">
            {"@context": "https://schema.org", "@type": "Article", "name": "Valid"}
            </script>"#,
        );
        assert_eq!(metadata.title.as_deref(), Some("Valid"));
    }

    #[test]
    fn array_root_picks_first_article() {
        let metadata = extract(
            r#"<script type="application/ld+json">
            [
                {"@context": "https://schema.org", "@type": "BreadcrumbList", "name": "Crumbs"},
                {"@context": "https://schema.org", "@type": "Article", "name": "Array Article"}
            ]
            </script>"#,
        );
        assert_eq!(metadata.title.as_deref(), Some("Array Article"));
    }

    #[test]
    fn cdata_wrapper_is_stripped() {
        let metadata = extract(
            r#"<script type="application/ld+json">
            <![CDATA[{"@context": "https://schema.org", "@type": "Article", "name": "Wrapped"}]]>
            </script>"#,
        );
        assert_eq!(metadata.title.as_deref(), Some("Wrapped"));
    }
}
