//! Error types for rs-readability.
//!
//! Extraction is heuristic: per-element failures (bad JSON-LD, malformed
//! attribute values, failed selectors) are swallowed where they occur and the
//! affected heuristic simply contributes nothing. Only structural
//! preconditions surface here.

/// Error type for parsing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document exceeds the configured element ceiling.
    ///
    /// The message format is part of the public contract.
    #[error("Aborting parsing document; {0} elements found")]
    TooManyElements(usize),
}

/// Result type alias for parsing operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_elements_message_is_exact() {
        let err = Error::TooManyElements(4012);
        assert_eq!(err.to_string(), "Aborting parsing document; 4012 elements found");
    }
}
