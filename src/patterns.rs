//! Compiled regex patterns and tag tables for article extraction.
//!
//! All patterns are compiled once at startup using `LazyLock`. Several
//! heuristics depend on the exact character classes below (the Unicode comma
//! set, the hierarchical title separators); treat them as load-bearing.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Candidate Classification Patterns
// =============================================================================

/// Class/id fragments that mark an element as unlikely article content.
pub static UNLIKELY_CANDIDATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote",
    )
    .expect("UNLIKELY_CANDIDATES regex")
});

/// Class/id fragments that rescue an otherwise unlikely element.
pub static MAYBE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)and|article|body|column|content|main|mathjax|shadow")
        .expect("MAYBE_CANDIDATE regex")
});

/// Class/id fragments that raise the class weight of a scoring candidate.
pub static POSITIVE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story")
        .expect("POSITIVE_CLASS regex")
});

/// Class/id fragments that lower the class weight of a scoring candidate.
pub static NEGATIVE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|footer|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|widget",
    )
    .expect("NEGATIVE_CLASS regex")
});

/// Class/id/rel fragments identifying an author byline.
pub static BYLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)byline|author|dateline|writtenby|p-author").expect("BYLINE regex"));

/// `role` attribute values never kept during candidate preparation.
pub const UNLIKELY_ROLES: &[&str] =
    &["menu", "menubar", "complementary", "navigation", "alert", "alertdialog", "dialog"];

// =============================================================================
// Cleaning Patterns
// =============================================================================

/// Embeds whose attributes or inner HTML match this survive the cleaners.
pub static ALLOWED_VIDEOS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)//(www\.)?((dailymotion|youtube|youtube-nocookie|player\.vimeo|v\.qq)\.com|(archive|upload\.wikimedia)\.org|player\.twitch\.tv|bilibili\.com)",
    )
    .expect("ALLOWED_VIDEOS regex")
});

/// Share-widget class/id marker, matched with word or underscore boundaries.
pub static SHARE_ELEMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\b|_)(share|sharedaddy)(\b|_)").expect("SHARE_ELEMENTS regex")
});

/// Whole-text advertisement markers, multi-language.
pub static AD_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(ad(vertising|vertisement)?|pub(licité)?|werb(ung)?|广告|Реклама|Anuncio)$")
        .expect("AD_WORDS regex")
});

/// Whole-text loading-placeholder markers, multi-language.
pub static LOADING_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^((loading|正在加载|Загрузка|chargement|cargando)(…|\.\.\.)?)$")
        .expect("LOADING_WORDS regex")
});

// =============================================================================
// Text Heuristics
// =============================================================================

/// Runs of two or more whitespace characters, collapsed during text reads.
pub static NORMALIZE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").expect("NORMALIZE regex"));

/// A run of whitespace; the split delimiter for word counting.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN regex"));

/// Comma characters across scripts; drives the comma-count content score.
pub static COMMAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[\u{002C}\u{060C}\u{FE50}\u{FE10}\u{FE11}\u{2E41}\u{2E34}\u{2E32}\u{FF0C}]")
        .expect("COMMAS regex")
});

/// Word tokenizer used by the token-similarity measure.
pub static TOKENIZE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").expect("TOKENIZE regex"));

/// Text that ends a sentence: a period followed by a space or end of input.
pub static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.( |$)").expect("SENTENCE_END regex"));

/// Non-whitespace at end of text; marks a text node as significant.
pub static HAS_CONTENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S$").expect("HAS_CONTENT regex"));

// =============================================================================
// Title Refinement Patterns
// =============================================================================

/// A hierarchical separator with surrounding spaces: `| - – — \ / > »`.
pub static TITLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" [\|\-–—\\/>»] ").expect("TITLE_SEPARATOR regex"));

/// The separator subset that marks a title as genuinely hierarchical.
pub static TITLE_HIERARCHY_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" [\\/>»] ").expect("TITLE_HIERARCHY_SEPARATOR regex"));

/// Captures everything before the last separator.
pub static TITLE_BEFORE_LAST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(.*)[\|\-–—\\/>»] .*").expect("TITLE_BEFORE_LAST_SEPARATOR regex"));

/// Captures everything after the first separator.
pub static TITLE_AFTER_FIRST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)[^\|\-–—\\/>»]*[\|\-–—\\/>»](.*)").expect("TITLE_AFTER_FIRST_SEPARATOR regex")
});

/// All separator characters, for the word-count comparison after refinement.
pub static TITLE_ANY_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\|\-–—\\/>»]+").expect("TITLE_ANY_SEPARATOR regex"));

// =============================================================================
// Metadata Patterns
// =============================================================================

/// `<meta property>` names harvested into the metadata map.
pub static META_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(article|dc|dcterm|og|twitter)\s*:\s*(author|creator|description|published_time|title|site_name)\s*")
        .expect("META_PROPERTY regex")
});

/// `<meta name>` names harvested into the metadata map.
pub static META_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(dc|dcterm|og|twitter|parsely|weibo:(article|webpage))\s*[-\.:]\s*)?(author|creator|pub-date|description|title|site_name)\s*$",
    )
    .expect("META_NAME regex")
});

/// Schema.org `@context` values accepted for JSON-LD records.
pub static SCHEMA_ORG_CONTEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://schema\.org/?$").expect("SCHEMA_ORG_CONTEXT regex"));

/// JSON-LD `@type` values treated as articles.
pub static JSON_LD_ARTICLE_TYPES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^Article|AdvertiserContentArticle|NewsArticle|AnalysisNewsArticle|AskPublicNewsArticle|BackgroundNewsArticle|OpinionNewsArticle|ReportageNewsArticle|ReviewNewsArticle|Report|SatiricalArticle|ScholarlyArticle|MedicalScholarlyArticle|SocialMediaPosting|BlogPosting|LiveBlogPosting|DiscussionForumPosting|TechArticle|APIReference$",
    )
    .expect("JSON_LD_ARTICLE_TYPES regex")
});

/// Surrounding CDATA markers stripped from JSON-LD script bodies.
pub static CDATA_WRAPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<!\[CDATA\[|\]\]>\s*$").expect("CDATA_WRAPPER regex"));

// =============================================================================
// Image and URL Patterns
// =============================================================================

/// An image file extension anywhere in an attribute value.
pub static IMG_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|webp)").expect("IMG_EXTENSION regex"));

/// An image URL followed by a density/width descriptor (srcset shaped).
pub static SRCSET_SHAPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|webp)\s+\d").expect("SRCSET_SHAPED regex"));

/// A lone image URL and nothing else.
pub static SINGLE_IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\S+\.(jpg|jpeg|png|webp)\S*\s*$").expect("SINGLE_IMAGE_URL regex")
});

/// A base64 data URL prefix, capturing the MIME type.
pub static B64_DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^data:\s*([^\s;,]+)\s*;\s*base64\s*,").expect("B64_DATA_URL regex")
});

/// Position of the base64 payload inside a data URL.
pub static B64_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)base64\s*").expect("B64_MARKER regex"));

/// Fragment-only URL (`#...`); such links count at reduced link-density weight.
pub static HASH_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#.+").expect("HASH_URL regex"));

/// One srcset entry: URL, optional descriptor, trailing comma or end.
pub static SRCSET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\S+)(\s+[\d.]+[xw])?(\s*(?:,|$))").expect("SRCSET_URL regex")
});

// =============================================================================
// Visibility Patterns
// =============================================================================

/// Inline style hiding an element.
pub static STYLE_DISPLAY_NONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)display\s*:\s*none").expect("STYLE_DISPLAY_NONE regex"));

/// Inline style making an element invisible.
pub static STYLE_VISIBILITY_HIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)visibility\s*:\s*hidden").expect("STYLE_VISIBILITY_HIDDEN regex"));

// =============================================================================
// Tag Tables
// =============================================================================

/// Tags queued for scoring during the preparation walk.
pub const DEFAULT_TAGS_TO_SCORE: &[&str] = &["section", "h2", "h3", "h4", "h5", "h6", "p", "td", "pre"];

/// Block-level tags that stop a `<div>` from being treated as a paragraph.
pub const DIV_TO_P_ELEMS: &[&str] = &["blockquote", "dl", "div", "img", "ol", "p", "pre", "table", "ul"];

/// Tags allowed to keep their name when appended to the article; everything
/// else is renamed to `<div>`.
pub const ALTER_TO_DIV_EXCEPTIONS: &[&str] = &["div", "article", "section", "p", "ol", "ul"];

/// Presentational attributes stripped from the article.
pub const PRESENTATIONAL_ATTRIBUTES: &[&str] = &[
    "align", "background", "bgcolor", "border", "cellpadding", "cellspacing", "frame", "hspace",
    "rules", "style", "valign", "vspace",
];

/// Elements that additionally lose their `width`/`height` attributes.
pub const DEPRECATED_SIZE_ATTRIBUTE_ELEMS: &[&str] = &["table", "th", "td", "hr", "pre"];

/// Tags that are phrasing content unconditionally. `a`, `del`, and `ins`
/// are phrasing iff all of their children are.
pub const PHRASING_ELEMS: &[&str] = &[
    "abbr", "audio", "b", "bdo", "br", "button", "cite", "code", "data", "datalist", "dfn", "em",
    "embed", "i", "img", "input", "kbd", "label", "mark", "math", "meter", "noscript", "object",
    "output", "progress", "q", "ruby", "samp", "script", "select", "small", "span", "strong",
    "sub", "sup", "textarea", "time", "var", "wbr",
];

/// Class names that always survive class stripping.
pub const CLASSES_TO_PRESERVE: &[&str] = &["page"];

/// Boolean attributes eligible for explicit `name="name"` promotion during
/// serialization.
pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen", "async", "autofocus", "autoplay", "checked", "controls", "default", "defer",
    "disabled", "formnovalidate", "hidden", "ismap", "itemscope", "loop", "multiple", "muted",
    "novalidate", "open", "playsinline", "readonly", "required", "reversed", "selected",
    "typemustmatch",
];
