//! Metadata precedence across JSON-LD and meta tags.

use rs_readability::{parse_with_options, Options};

const BODY: &str = r#"
    <div class="article-body">
        <p>Body prose long enough for extraction to succeed on its own, with
           commas, full sentences, and a second line to round things out.</p>
        <p>More body prose so the candidate container scores comfortably above
           its competition and the sibling rules keep both paragraphs.</p>
    </div>
"#;

fn page(head: &str) -> String {
    format!("<html><head>{head}</head><body>{BODY}</body></html>")
}

fn extract(head: &str, options: Options) -> rs_readability::Article {
    parse_with_options(&page(head), "https://example.com/a", options)
        .unwrap()
        .expect("article expected")
}

#[test]
fn json_ld_wins_over_meta_tags() {
    let head = r#"
        <script type="application/ld+json">
        {"@context": "https://schema.org", "@type": "Article",
         "name": "JSON-LD Title", "author": {"name": "JSON-LD Author"}}
        </script>
        <meta property="og:title" content="OG Title">
        <meta name="author" content="Meta Author">
    "#;
    let options = Options { char_threshold: 50, ..Options::default() };
    let article = extract(head, options);
    assert_eq!(article.title.as_deref(), Some("JSON-LD Title"));
    assert_eq!(article.byline.as_deref(), Some("JSON-LD Author"));
}

#[test]
fn disabling_json_ld_falls_back_to_meta() {
    let head = r#"
        <script type="application/ld+json">
        {"@context": "https://schema.org", "@type": "Article", "name": "JSON-LD Title"}
        </script>
        <meta property="og:title" content="OG Title">
    "#;
    let options =
        Options { char_threshold: 50, disable_json_ld: true, ..Options::default() };
    let article = extract(head, options);
    assert_eq!(article.title.as_deref(), Some("OG Title"));
}

#[test]
fn og_title_alone_becomes_the_title() {
    let head = r#"<meta property="og:title" content="Only OG Title Present Here">"#;
    let options = Options { char_threshold: 50, ..Options::default() };
    let article = extract(head, options);
    assert_eq!(article.title.as_deref(), Some("Only OG Title Present Here"));
}

#[test]
fn published_time_and_site_name_are_carried() {
    let head = r#"
        <meta property="article:published_time" content="2023-06-01T08:00:00Z">
        <meta property="og:site_name" content="Example Times">
    "#;
    let options = Options { char_threshold: 50, ..Options::default() };
    let article = extract(head, options);
    assert_eq!(article.published_time.as_deref(), Some("2023-06-01T08:00:00Z"));
    assert_eq!(article.site_name.as_deref(), Some("Example Times"));
}

#[test]
fn entities_in_meta_content_are_unescaped() {
    let head = r#"<meta property="og:title" content="Law &amp; Order &#8211; Recap">"#;
    let options = Options { char_threshold: 50, ..Options::default() };
    let article = extract(head, options);
    assert_eq!(article.title.as_deref(), Some("Law & Order \u{2013} Recap"));
}

#[test]
fn metadata_byline_suppresses_body_byline_detection() {
    let head = r#"<meta name="author" content="Meta Author">"#;
    let html = format!(
        r#"<html><head>{head}</head><body>
            <div class="article-body">
                <p class="byline">Body Byline</p>
                <p>Body prose long enough for extraction to succeed on its own,
                   with commas, full sentences, and a second line for weight.</p>
            </div>
        </body></html>"#
    );
    let options = Options { char_threshold: 50, ..Options::default() };
    let article = parse_with_options(&html, "https://example.com/a", options)
        .unwrap()
        .expect("article expected");
    assert_eq!(article.byline.as_deref(), Some("Meta Author"));
    // The body byline stays in the content since detection was off.
    assert!(article.text_content.contains("Body Byline"));
}
