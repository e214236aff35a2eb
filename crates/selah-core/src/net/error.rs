//! Fetch error taxonomy
//!
//! Every failure a request can produce, with its retry classification.
//! Timeouts, transport failures, HTTP 5xx, and 429 are transient and worth
//! retrying; everything else stops the attempt loop immediately.

use std::time::Duration;
use thiserror::Error;

/// Errors produced by the fetch client
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response arrived within the per-attempt window
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The connection itself failed (DNS, refused, reset, TLS)
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx HTTP response
    #[error("HTTP status {0}")]
    Status(u16),

    /// 2xx response whose JSON body carries an application error field
    #[error("API error: {0}")]
    Api(String),

    /// 2xx response whose body could not be decoded as the expected JSON
    #[error("invalid response payload: {0}")]
    Payload(String),

    /// Primary request exhausted its attempts and the fallback also failed
    #[error("both primary and fallback failed: {primary}; fallback: {fallback}")]
    FallbackFailed { primary: String, fallback: String },
}

impl FetchError {
    /// Whether this failure is worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout(_) | FetchError::Transport(_) => true,
            FetchError::Status(code) => *code == 429 || (500..=599).contains(code),
            FetchError::Api(_) | FetchError::Payload(_) | FetchError::FallbackFailed { .. } => {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors_are_retryable() {
        assert!(FetchError::Timeout(Duration::from_secs(10)).is_retryable());
        assert!(FetchError::Transport("connection refused".into()).is_retryable());
        assert!(FetchError::Status(500).is_retryable());
        assert!(FetchError::Status(503).is_retryable());
        assert!(FetchError::Status(429).is_retryable());
    }

    #[test]
    fn test_fatal_errors_are_not_retryable() {
        assert!(!FetchError::Status(400).is_retryable());
        assert!(!FetchError::Status(404).is_retryable());
        assert!(!FetchError::Status(401).is_retryable());
        assert!(!FetchError::Api("invalid token".into()).is_retryable());
        assert!(!FetchError::Payload("expected object".into()).is_retryable());
    }

    #[test]
    fn test_fallback_failed_message() {
        let err = FetchError::FallbackFailed {
            primary: "HTTP status 500".into(),
            fallback: "no cached verse".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("both primary and fallback failed"));
        assert!(msg.contains("HTTP status 500"));
        assert!(msg.contains("no cached verse"));
    }
}
