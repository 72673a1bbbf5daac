// ABOUTME: Error types for rule loading and document-path derivation.
// ABOUTME: The pipeline itself never fails; only the repo edges are fallible.

use thiserror::Error;

/// Errors from the fallible edges of the crate.
///
/// The transformation pipeline proper degrades instead of failing: invalid
/// selectors are dropped, missing matches produce omitted cells, and a host
/// refusing to build a block simply yields no block. What remains fallible
/// is parsing the source URL for path derivation and moving the rule
/// document in and out of JSON.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The source URL could not be parsed.
    #[error("invalid document url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The rule document could not be serialized.
    #[error("failed to encode import rules: {0}")]
    RulesEncode(#[source] serde_json::Error),

    /// The rule document could not be deserialized.
    #[error("failed to decode import rules: {0}")]
    RulesDecode(#[source] serde_json::Error),
}

impl TransformError {
    /// Creates an InvalidUrl error.
    pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        TransformError::InvalidUrl {
            url: url.into(),
            source,
        }
    }
}
