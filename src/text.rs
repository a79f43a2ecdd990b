//! Text utilities shared across the extraction passes.
//!
//! Inner-text reads, whitespace normalization, word counting, the
//! token-similarity measure used to match headings against titles, and
//! HTML entity unescaping for metadata fields.

use crate::dom::{self, NodeRef};
use crate::patterns::{COMMAS, NORMALIZE, TOKENIZE, WHITESPACE_RUN};

/// Trimmed text content of a node; runs of whitespace collapse to a single
/// space when `normalize_spaces` is set.
#[must_use]
pub fn inner_text(node: &NodeRef, normalize_spaces: bool) -> String {
    let text = dom::text_content(node);
    let trimmed = text.trim();
    if normalize_spaces {
        NORMALIZE.replace_all(trimmed, " ").to_string()
    } else {
        trimmed.to_string()
    }
}

/// Unicode scalar count, the length measure for all text heuristics.
#[inline]
#[must_use]
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Number of comma characters (across scripts) in a text.
#[inline]
#[must_use]
pub fn comma_count(text: &str) -> usize {
    COMMAS.find_iter(text).count()
}

/// Word count as the number of pieces produced by splitting on whitespace
/// runs. Leading whitespace contributes an empty piece and empty input
/// counts one; the title refinement depends on these exact semantics.
#[must_use]
pub fn word_count(text: &str) -> usize {
    WHITESPACE_RUN.split(text).count()
}

/// Compare two texts by word tokens: `1 - distance`, where distance is the
/// joined length of tokens unique to `b` over the joined length of all of
/// `b`'s tokens. Returns 0 when either text has no tokens.
#[must_use]
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let tokens_a: Vec<String> = TOKENIZE
        .split(&a.to_lowercase())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    let tokens_b: Vec<String> = TOKENIZE
        .split(&b.to_lowercase())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    let unique_b: Vec<&str> = tokens_b
        .iter()
        .filter(|t| !tokens_a.contains(t))
        .map(String::as_str)
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let distance = unique_b.join(" ").chars().count() as f64
        / tokens_b.join(" ").chars().count() as f64;
    1.0 - distance
}

/// Unescape the named entities `quot amp apos lt gt` and numeric character
/// references (decimal and hex). Invalid code points (zero, out of range,
/// surrogates) become U+FFFD.
#[must_use]
pub fn unescape_html_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match parse_entity(tail) {
            Some((replacement, consumed)) => {
                out.push(replacement);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parse one entity at the start of `text` (which begins with `&`).
/// Returns the replacement char and the byte length consumed.
fn parse_entity(text: &str) -> Option<(char, usize)> {
    let semi = text.find(';')?;
    let body = &text[1..semi];
    let named = match body {
        "quot" => Some('"'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "lt" => Some('<'),
        "gt" => Some('>'),
        _ => None,
    };
    if let Some(ch) = named {
        return Some((ch, semi + 1));
    }
    let digits = body.strip_prefix('#')?;
    let value = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).unwrap_or(u32::MAX)
    } else {
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().unwrap_or(u32::MAX)
    };
    let ch = match value {
        0 => '\u{FFFD}',
        0xD800..=0xDFFF => '\u{FFFD}',
        v => char::from_u32(v).unwrap_or('\u{FFFD}'),
    };
    Some((ch, semi + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    #[test]
    fn inner_text_normalizes_whitespace() {
        let doc = dom::parse("<p>  hello \n\n  world  </p>");
        let p = doc.select("p").nodes().first().copied().unwrap();
        assert_eq!(inner_text(&p, true), "hello world");
        assert_eq!(inner_text(&p, false), "hello \n\n  world");
    }

    #[test]
    fn comma_count_spans_scripts() {
        assert_eq!(comma_count("a,b、c،d﹐e"), 3);
        assert_eq!(comma_count("no commas here"), 0);
    }

    #[test]
    fn similarity_of_identical_texts_is_one() {
        assert!((text_similarity("Breaking News Today", "breaking news today") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn similarity_of_disjoint_texts_is_zero() {
        assert!(text_similarity("alpha beta", "gamma delta").abs() < 1e-9);
    }

    #[test]
    fn similarity_is_asymmetric_over_b_tokens() {
        let sim = text_similarity("the quick brown fox jumps", "quick brown fox");
        assert!(sim > 0.99);
        let sim = text_similarity("quick brown fox", "the quick brown fox jumps and runs far");
        assert!(sim < 0.75);
    }

    #[test]
    fn unescape_named_and_numeric_entities() {
        assert_eq!(unescape_html_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(unescape_html_entities("&quot;x&apos;"), "\"x'");
        assert_eq!(unescape_html_entities("&#65;&#x42;"), "AB");
        assert_eq!(unescape_html_entities("&#xg;"), "&#xg;");
        assert_eq!(unescape_html_entities("no entities"), "no entities");
    }

    #[test]
    fn unescape_replaces_invalid_code_points() {
        assert_eq!(unescape_html_entities("&#0;"), "\u{FFFD}");
        assert_eq!(unescape_html_entities("&#xD800;"), "\u{FFFD}");
        assert_eq!(unescape_html_entities("&#1114112;"), "\u{FFFD}");
    }
}
