//! HTML `<meta>` tag harvesting.
//!
//! Collects the article-relevant `<meta>` values into a keyed map. A
//! `property` match takes precedence over a `name` match on the same
//! element; matched keys are normalized (lowercased, whitespace stripped,
//! `.` folded to `:`) so the combining step can use a fixed priority list.

use std::collections::HashMap;

use crate::dom::{self, Document};
use crate::patterns::{META_NAME, META_PROPERTY};

/// Harvest `<meta>` values into a normalized key → trimmed content map.
#[must_use]
pub fn collect_meta_values(doc: &Document) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for node in doc.select("meta").nodes() {
        let Some(content) = dom::get_attribute(node, "content") else {
            continue;
        };
        if content.is_empty() {
            continue;
        }

        let mut property_matched = false;
        if let Some(property) = dom::get_attribute(node, "property") {
            if let Some(found) = META_PROPERTY.find(&property) {
                property_matched = true;
                let key: String = found
                    .as_str()
                    .to_lowercase()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                values.insert(key, content.trim().to_string());
            }
        }

        if !property_matched {
            if let Some(name) = dom::get_attribute(node, "name") {
                if META_NAME.is_match(&name) {
                    let key: String = name
                        .to_lowercase()
                        .chars()
                        .filter(|c| !c.is_whitespace())
                        .map(|c| if c == '.' { ':' } else { c })
                        .collect();
                    values.insert(key, content.trim().to_string());
                }
            }
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    fn collect(html: &str) -> HashMap<String, String> {
        collect_meta_values(&dom::parse(html))
    }

    #[test]
    fn collects_property_keys() {
        let values = collect(
            r#"<head>
                <meta property="og:title" content="OG Title">
                <meta property="article:published_time" content="2020-01-01">
            </head>"#,
        );
        assert_eq!(values.get("og:title").map(String::as_str), Some("OG Title"));
        assert_eq!(values.get("article:published_time").map(String::as_str), Some("2020-01-01"));
    }

    #[test]
    fn collects_name_keys_with_dot_normalization() {
        let values = collect(r#"<meta name="DC.title" content="Dublin Core Title">"#);
        assert_eq!(values.get("dc:title").map(String::as_str), Some("Dublin Core Title"));
    }

    #[test]
    fn property_wins_over_name_on_same_element() {
        let values = collect(
            r#"<meta name="twitter:title" property="og:title" content="Shared Content">"#,
        );
        assert_eq!(values.get("og:title").map(String::as_str), Some("Shared Content"));
        assert!(!values.contains_key("twitter:title"));
    }

    #[test]
    fn skips_empty_content() {
        let values = collect(r#"<meta property="og:title" content="">"#);
        assert!(values.is_empty());
    }

    #[test]
    fn ignores_unrelated_names() {
        let values = collect(r#"<meta name="viewport" content="width=device-width">"#);
        assert!(values.is_empty());
    }

    #[test]
    fn collects_parsely_and_weibo_keys() {
        let values = collect(
            r#"<head>
                <meta name="parsely-title" content="Parsely Title">
                <meta name="weibo:article:title" content="Weibo Title">
            </head>"#,
        );
        assert_eq!(values.get("parsely-title").map(String::as_str), Some("Parsely Title"));
        assert_eq!(values.get("weibo:article:title").map(String::as_str), Some("Weibo Title"));
    }

    #[test]
    fn trims_content_values() {
        let values = collect(r#"<meta name="description" content="  padded  ">"#);
        assert_eq!(values.get("description").map(String::as_str), Some("padded"));
    }
}
