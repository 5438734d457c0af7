//! Error types for pizza-compare.
//!
//! Two families of failures exist:
//! - [`LlmError`]: transport and API failures while talking to the model
//!   endpoint. These never escape [`Comparator::compare`](crate::compare::Comparator::compare);
//!   they are captured in [`ComparisonResult::Failed`](crate::compare::ComparisonResult::Failed).
//! - [`Error`]: environment and input failures (unreadable image, empty
//!   criteria) that halt a comparison before a request is
//!   ever built.

use std::path::PathBuf;

/// Result type alias for pizza-compare operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// LLM provider error.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// The criteria checklist cannot be used for a comparison.
    #[error("Criteria error: {0}")]
    Criteria(#[from] CriteriaError),

    /// An image file could not be read.
    #[error("failed to read image {}: {source}", path.display())]
    Image {
        /// Path of the image that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an image load error for the given path.
    #[must_use]
    pub fn image(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}

/// Validation failures for a criteria checklist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CriteriaError {
    /// No criterion with a non-empty description was supplied.
    #[error("at least one criterion with descriptions is required")]
    Empty,

    /// More entries were supplied than the form allows.
    #[error("too many criteria: {given} given, at most {max} allowed")]
    TooMany {
        /// Number of entries supplied.
        given: usize,
        /// Maximum number of entries accepted.
        max: usize,
    },

    /// A `Name=desc;desc` specification could not be parsed.
    #[error("invalid criterion '{0}', expected NAME=DESCRIPTION[;DESCRIPTION...]")]
    Malformed(String),
}

/// Error type for LLM provider operations.
///
/// Each variant represents a distinct failure mode so callers can match on
/// specific cases instead of inspecting strings.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum LlmError {
    /// Authentication or authorization failure.
    #[error("[{provider}] {message}")]
    Auth {
        /// Provider name (e.g., "openai").
        provider: String,
        /// Error description.
        message: String,
    },

    /// Rate limit or quota exceeded.
    #[error("[{provider}] Rate limit exceeded. Please retry after some time.")]
    RateLimited {
        /// Provider name.
        provider: String,
    },

    /// Response format error.
    #[error("Expected {expected}, got {got}")]
    ResponseFormat {
        /// Expected format description.
        expected: String,
        /// Actual format received.
        got: String,
    },

    /// Network or connection error.
    #[error("{0}")]
    Network(String),

    /// HTTP status error.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Provider-specific error.
    #[error("[{provider}] {message}")]
    Provider {
        /// Provider name.
        provider: String,
        /// Error description.
        message: String,
        /// Optional error code from the provider.
        code: Option<String>,
    },

    /// Internal error.
    #[error("{0}")]
    Internal(String),
}

impl LlmError {
    /// Create an authentication error.
    #[must_use]
    pub fn auth(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a rate limit error.
    #[must_use]
    pub fn rate_limited(provider: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
        }
    }

    /// Create a response format error.
    #[must_use]
    pub fn response_format(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::ResponseFormat {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a provider error with an error code.
    #[must_use]
    pub fn provider_code(
        provider: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else {
            Self::network(err.to_string())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    mod error {
        use super::*;

        #[test]
        fn from_llm_error() {
            let err: Error = LlmError::network("timeout").into();
            assert!(matches!(err, Error::Llm(_)));
            assert!(err.to_string().contains("timeout"));
        }

        #[test]
        fn from_criteria_error() {
            let err: Error = CriteriaError::Empty.into();
            assert!(matches!(err, Error::Criteria(CriteriaError::Empty)));
        }

        #[test]
        fn image_error_names_path() {
            let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
            let err = Error::image("pizza_imgs/ref.jpg", io);
            let text = err.to_string();
            assert!(text.contains("pizza_imgs/ref.jpg"));
            assert!(text.contains("no such file"));
        }
    }

    mod criteria_error {
        use super::*;

        #[test]
        fn too_many_reports_counts() {
            let err = CriteriaError::TooMany { given: 7, max: 5 };
            assert_eq!(err.to_string(), "too many criteria: 7 given, at most 5 allowed");
        }
    }

    mod llm_error {
        use super::*;

        #[test]
        fn auth_display_includes_provider() {
            let err = LlmError::auth("openai", "Invalid API key");
            assert_eq!(err.to_string(), "[openai] Invalid API key");
        }

        #[test]
        fn http_status_display() {
            let err = LlmError::http_status(502, "bad gateway");
            assert_eq!(err.to_string(), "HTTP 502: bad gateway");
        }

        #[test]
        fn provider_code_keeps_code() {
            let err = LlmError::provider_code("openai", "insufficient_quota", "quota exceeded");
            match err {
                LlmError::Provider { code, message, .. } => {
                    assert_eq!(code.as_deref(), Some("insufficient_quota"));
                    assert_eq!(message, "quota exceeded");
                }
                other => panic!("unexpected variant: {other:?}"),
            }
        }
    }
}
