//! Render-path error taxonomy.
//!
//! Every failure that reaches the renderer is classified into one of three
//! shapes so the renderer can always produce a valid error document:
//! field-level validation failures (HTTP 422), domain errors with a known
//! status, and an unclassified fallback (HTTP 500).

use std::backtrace::Backtrace;

use prism_document::DocumentError;
use thiserror::Error;

/// One field-level failure inside a validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted field path, e.g. `"address.city"`.
    pub field: String,
    pub message: String,
}

/// Classified error values the renderer knows how to format.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Structured validation failure: one wire entry per field.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Application-level failure with a known HTTP status.
    #[error("{title}: {detail}")]
    Domain {
        status: u16,
        title: String,
        detail: String,
    },

    /// Fallback for unrecognized failures.
    #[error("{title}: {detail}")]
    Unclassified {
        title: String,
        detail: String,
        backtrace: Option<String>,
    },
}

impl ApiError {
    pub fn validation<I, F, M>(fields: I) -> Self
    where
        I: IntoIterator<Item = (F, M)>,
        F: Into<String>,
        M: Into<String>,
    {
        ApiError::Validation(
            fields
                .into_iter()
                .map(|(field, message)| FieldError {
                    field: field.into(),
                    message: message.into(),
                })
                .collect(),
        )
    }

    pub fn domain(status: u16, title: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::Domain {
            status,
            title: title.into(),
            detail: detail.into(),
        }
    }

    /// Classify an arbitrary error, capturing its concrete type name as the
    /// wire `title` and a backtrace for debug rendering.
    pub fn unclassified<E: std::error::Error>(err: &E) -> Self {
        ApiError::Unclassified {
            title: short_type_name::<E>(),
            detail: err.to_string(),
            backtrace: Some(Backtrace::force_capture().to_string()),
        }
    }

    /// HTTP status this error renders with.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 422,
            ApiError::Domain { status, .. } => *status,
            ApiError::Unclassified { .. } => 500,
        }
    }

    pub fn backtrace(&self) -> Option<&str> {
        match self {
            ApiError::Unclassified { backtrace, .. } => backtrace.as_deref(),
            _ => None,
        }
    }
}

/// Deserialization failures are client input errors.
impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        ApiError::domain(400, "bad_request", err.to_string())
    }
}

fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    if full.contains('<') {
        return full.to_owned();
    }
    full.rsplit("::").next().unwrap_or(full).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct BrokenPipe;

    impl fmt::Display for BrokenPipe {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "pipe closed unexpectedly")
        }
    }

    impl std::error::Error for BrokenPipe {}

    #[test]
    fn test_statuses() {
        assert_eq!(ApiError::validation([("email", "is required")]).status(), 422);
        assert_eq!(ApiError::domain(404, "not_found", "no such user").status(), 404);
        assert_eq!(ApiError::unclassified(&BrokenPipe).status(), 500);
    }

    #[test]
    fn test_unclassified_uses_concrete_type_name() {
        match ApiError::unclassified(&BrokenPipe) {
            ApiError::Unclassified {
                title,
                detail,
                backtrace,
            } => {
                assert_eq!(title, "BrokenPipe");
                assert_eq!(detail, "pipe closed unexpectedly");
                assert!(backtrace.is_some());
            }
            other => panic!("expected Unclassified, got {:?}", other),
        }
    }

    #[test]
    fn test_document_error_classifies_as_client_error() {
        let err = prism_document::deserialize("{not json").unwrap_err();
        let api: ApiError = err.into();
        assert_eq!(api.status(), 400);
        match api {
            ApiError::Domain { title, .. } => assert_eq!(title, "bad_request"),
            other => panic!("expected Domain, got {:?}", other),
        }
    }
}
