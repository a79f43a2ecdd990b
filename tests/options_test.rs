//! Option handling: element cap, class preservation, thresholds, XML output.

use rs_readability::{parse_with_options, Options, Readability};

const SIMPLE_PAGE: &str = r#"<html><body>
    <div class="content">
        <p class="keep drop">First paragraph with sufficient text to pass through the
           scoring stage, including a comma or two, and a full stop at the end.</p>
        <p>Second paragraph that adds more length so the container is selected even
           at mild thresholds, without any heroics from the fallback logic.</p>
    </div>
</body></html>"#;

#[test]
fn element_cap_raises_the_documented_error() {
    let options = Options { max_elems_to_parse: 1, ..Options::default() };
    let err = parse_with_options(SIMPLE_PAGE, "https://example.com/", options).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Aborting parsing document; "), "got: {message}");
    assert!(message.ends_with(" elements found"), "got: {message}");
}

#[test]
fn zero_cap_means_unlimited() {
    let options = Options { max_elems_to_parse: 0, char_threshold: 50, ..Options::default() };
    assert!(parse_with_options(SIMPLE_PAGE, "https://example.com/", options).is_ok());
}

#[test]
fn classes_to_preserve_keeps_only_listed_names() {
    let options = Options {
        char_threshold: 50,
        classes_to_preserve: vec!["keep".to_string()],
        ..Options::default()
    };
    let article = parse_with_options(SIMPLE_PAGE, "https://example.com/", options)
        .unwrap()
        .expect("article expected");
    assert!(article.content.contains("keep"));
    assert!(!article.content.contains("drop"));
}

#[test]
fn keep_classes_preserves_everything() {
    let options = Options { char_threshold: 50, keep_classes: true, ..Options::default() };
    let article = parse_with_options(SIMPLE_PAGE, "https://example.com/", options)
        .unwrap()
        .expect("article expected");
    assert!(article.content.contains("keep drop"));
}

#[test]
fn raising_char_threshold_still_returns_longest_attempt() {
    let low = Options { char_threshold: 50, ..Options::default() };
    let high = Options { char_threshold: 100_000, ..Options::default() };

    let with_low = parse_with_options(SIMPLE_PAGE, "https://example.com/", low)
        .unwrap()
        .expect("low-threshold article");
    let with_high = parse_with_options(SIMPLE_PAGE, "https://example.com/", high)
        .unwrap()
        .expect("high-threshold article");

    // The fallback chain never yields less text than a successful run.
    assert!(with_high.length >= with_low.length);
    assert!(with_high.text_content.contains("First paragraph"));
}

#[test]
fn xml_serializer_promotes_explicit_booleans() {
    let html = r#"<html><body>
        <article itemscope="itemscope" id="story">
            <p>Paragraph one of the story, long enough to score, with commas, and
               clauses in the usual proportions for written prose.</p>
            <p>Paragraph two of the story, adding further length so the article
               element wins candidate selection without fallback help.</p>
        </article>
    </body></html>"#;

    let options =
        Options { char_threshold: 50, use_xml_serializer: true, ..Options::default() };
    let article = parse_with_options(html, "https://example.com/", options)
        .unwrap()
        .expect("article expected");
    assert!(article.content.contains(r#"itemscope="itemscope""#), "got: {}", article.content);

    let options = Options { char_threshold: 50, ..Options::default() };
    let article = parse_with_options(html, "https://example.com/", options)
        .unwrap()
        .expect("article expected");
    assert!(article.content.contains("itemscope"));
}

#[test]
fn xml_serializer_self_closes_void_elements() {
    let html = r#"<html><body>
        <div class="content">
            <p>Text above the image, long enough to keep extraction honest, with
               commas, and a sentence that ends the way sentences do.</p>
            <p><img src="https://example.com/photo.jpg" alt="photo"> And a caption
               sentence following the image inside the same paragraph.</p>
        </div>
    </body></html>"#;

    let options =
        Options { char_threshold: 50, use_xml_serializer: true, ..Options::default() };
    let article = parse_with_options(html, "https://example.com/", options)
        .unwrap()
        .expect("article expected");
    assert!(article.content.contains("/>"), "got: {}", article.content);
}

#[test]
fn custom_allowed_video_regex_protects_matching_embeds() {
    let html = r#"<html><body>
        <div class="content">
            <p>Prose around the embedded player, long enough to score well, with
               commas, and the usual sentence shapes of article text.</p>
            <iframe src="https://videos.internal.example/embed/9"></iframe>
            <p>More prose after the player so the container keeps its standing in
               candidate selection, comfortably above the threshold.</p>
        </div>
    </body></html>"#;

    let options = Options {
        char_threshold: 50,
        allowed_video_regex: Some(regex::Regex::new(r"//videos\.internal\.example/").unwrap()),
        ..Options::default()
    };
    let article = parse_with_options(html, "https://example.com/", options)
        .unwrap()
        .expect("article expected");
    assert!(article.content.contains("videos.internal.example"));

    let options = Options { char_threshold: 50, ..Options::default() };
    let article = parse_with_options(html, "https://example.com/", options)
        .unwrap()
        .expect("article expected");
    assert!(!article.content.contains("videos.internal.example"));
}

#[test]
fn from_document_accepts_preparsed_input() {
    let doc = rs_readability::dom::parse(SIMPLE_PAGE);
    let options = Options { char_threshold: 50, ..Options::default() };
    let article = Readability::from_document(doc, "https://example.com/", Some(options))
        .parse()
        .unwrap()
        .expect("article expected");
    assert!(article.text_content.contains("First paragraph"));
}
