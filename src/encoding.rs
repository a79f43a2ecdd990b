//! Character encoding detection for byte input.
//!
//! The `parse_bytes` entry point accepts raw HTML bytes; this module sniffs
//! the declared charset and converts to UTF-8 before parsing. Only the first
//! kilobyte is examined, which is where real pages declare their charset.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// `<meta charset="...">` declaration.
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("META_CHARSET regex")
});

/// `<meta http-equiv="Content-Type" content="...; charset=...">` declaration.
#[allow(clippy::expect_used)]
static META_CONTENT_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#,
    )
    .expect("META_CONTENT_TYPE regex")
});

/// Detect the declared character encoding of an HTML byte stream.
///
/// Falls back to UTF-8 when no recognizable declaration is present.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    for pattern in [&*META_CHARSET, &*META_CONTENT_TYPE] {
        if let Some(label) = pattern.captures(&head_str).and_then(|c| c.get(1)) {
            if let Some(encoding) = Encoding::for_label(label.as_str().as_bytes()) {
                return encoding;
            }
        }
    }
    UTF_8
}

/// Convert HTML bytes to a UTF-8 string using the detected encoding.
///
/// Undecodable sequences become U+FFFD rather than failing; a page with a
/// few broken bytes is still worth extracting.
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }
    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}
