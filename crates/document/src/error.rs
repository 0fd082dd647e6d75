use thiserror::Error;

/// Errors raised while deserializing a JSON:API document.
///
/// Both variants are client input errors: deserialization is fail-fast and
/// never partially succeeds.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The input text is not valid JSON.
    #[error("input is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The input is valid JSON but violates the document shape contract.
    /// The message names the offending field and the observed shape.
    #[error("bad JSON:API format: {message}")]
    BadFormat { message: String },
}

impl DocumentError {
    pub(crate) fn bad_format(message: impl Into<String>) -> Self {
        DocumentError::BadFormat {
            message: message.into(),
        }
    }
}
