//! Configuration options for article extraction.
//!
//! The `Options` struct controls parsing behavior. All fields are public for
//! easy configuration; use `Default::default()` for standard settings.

use regex::Regex;

/// Configuration options for article extraction.
///
/// # Example
///
/// ```rust
/// use rs_readability::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     char_threshold: 250,
///     keep_classes: true,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Print debug information to stderr during extraction.
    ///
    /// Default: `false`
    pub debug: bool,

    /// Maximum number of elements to parse; `0` means no limit.
    ///
    /// Documents with more elements fail fast with
    /// [`Error::TooManyElements`](crate::Error::TooManyElements).
    ///
    /// Default: `0`
    pub max_elems_to_parse: usize,

    /// Number of top-scored candidates to keep when looking for the best
    /// shared ancestor of the article content.
    ///
    /// Default: `5`
    pub nb_top_candidates: usize,

    /// Minimum extracted text length (characters). Below this, the grabber
    /// relaxes one heuristic flag and retries, up to three times.
    ///
    /// Default: `500`
    pub char_threshold: usize,

    /// Class names preserved by the class-stripping post-process pass,
    /// in addition to the always-kept `page`.
    ///
    /// Default: empty
    pub classes_to_preserve: Vec<String>,

    /// Keep all `class` attributes instead of stripping them.
    ///
    /// Default: `false`
    pub keep_classes: bool,

    /// Serialize the article as XML (self-closing void elements, explicit
    /// `name="name"` boolean attributes) instead of HTML.
    ///
    /// Default: `false`
    pub use_xml_serializer: bool,

    /// Skip JSON-LD metadata extraction entirely.
    ///
    /// Default: `false`
    pub disable_json_ld: bool,

    /// Embeds whose attribute values or inner HTML match this pattern
    /// survive the cleaning passes. `None` uses the built-in allowlist
    /// covering the major video hosts.
    ///
    /// Default: `None`
    pub allowed_video_regex: Option<Regex>,

    /// Added to the link-density thresholds of the conditional cleaner.
    /// Positive values tolerate more links, negative values fewer.
    ///
    /// Default: `0.0`
    pub link_density_modifier: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            debug: false,
            max_elems_to_parse: 0,
            nb_top_candidates: 5,
            char_threshold: 500,
            classes_to_preserve: Vec::new(),
            keep_classes: false,
            use_xml_serializer: false,
            disable_json_ld: false,
            allowed_video_regex: None,
            link_density_modifier: 0.0,
        }
    }
}
