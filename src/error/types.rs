//! Core error types.

use serde::Deserialize;
use thiserror::Error;

/// Errors produced by the Coze client.
///
/// Every call resolves to either a fully decoded result or exactly one of
/// these variants. The SDK never retries; `is_retryable` is an advisory hint
/// for callers that implement their own policy.
#[derive(Debug, Clone, Error)]
pub enum CozeError {
    /// The transport failed before a response was received.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Reading the caller's audio source or writing to the caller's sink
    /// failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The call exceeded its deadline.
    #[error("Timeout error: {0}")]
    TimeoutError(String),

    /// The caller cancelled the call while it was in flight.
    #[error("Request cancelled: {0}")]
    Cancelled(String),

    /// The service rejected the request.
    ///
    /// `status` is the HTTP status, `code` the service's business code
    /// (0 when the body carried none).
    #[error("API error {status} (code {code}): {message}")]
    ApiError {
        status: u16,
        code: i64,
        message: String,
        log_id: Option<String>,
    },

    /// The service answered successfully but the body could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A request body could not be serialized.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// A required request field was missing or empty.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The client was configured with unusable values.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An audio stream was read after it had been closed.
    #[error("Audio stream already closed")]
    StreamClosed,
}

/// Coarse classification of a `CozeError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Timeout,
    Cancelled,
    Authentication,
    RateLimit,
    Client,
    Server,
    Parsing,
    Validation,
    Configuration,
}

impl CozeError {
    /// Build an `ApiError` from a status and message with no business code.
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            code: 0,
            message: message.into(),
            log_id: None,
        }
    }

    /// HTTP status attached to the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Correlation id reported by the service for the failed call.
    pub fn log_id(&self) -> Option<&str> {
        match self {
            Self::ApiError { log_id, .. } => log_id.as_deref(),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) => ErrorCategory::Network,
            Self::IoError(_) => ErrorCategory::Io,
            Self::TimeoutError(_) => ErrorCategory::Timeout,
            Self::Cancelled(_) => ErrorCategory::Cancelled,
            Self::ApiError { status, .. } => match *status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                s if s >= 500 => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            Self::ParseError(_) | Self::JsonError(_) | Self::StreamClosed => {
                ErrorCategory::Parsing
            }
            Self::InvalidParameter(_) => ErrorCategory::Validation,
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::RateLimit
                | ErrorCategory::Server
        )
    }
}

/// Error envelope returned by the service.
///
/// `{"code": 4000, "msg": "...", "detail": {"logid": "..."}}`; every field is
/// optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub logid: Option<String>,
}

impl ErrorBody {
    /// Log id carried inside the body, if the service sent one.
    pub fn log_id(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .and_then(|d| d.logid.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_follows_status() {
        assert_eq!(
            CozeError::api_error(401, "nope").category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            CozeError::api_error(429, "slow down").category(),
            ErrorCategory::RateLimit
        );
        assert_eq!(
            CozeError::api_error(400, "bad").category(),
            ErrorCategory::Client
        );
        assert_eq!(
            CozeError::api_error(503, "down").category(),
            ErrorCategory::Server
        );
    }

    #[test]
    fn retryable_only_for_transient_failures() {
        assert!(CozeError::HttpError("reset".into()).is_retryable());
        assert!(CozeError::api_error(502, "bad gateway").is_retryable());
        assert!(!CozeError::api_error(400, "invalid speed").is_retryable());
        assert!(!CozeError::Cancelled("user".into()).is_retryable());
        assert!(!CozeError::ParseError("eof".into()).is_retryable());
        assert!(!CozeError::IoError("permission denied".into()).is_retryable());
        assert_eq!(
            CozeError::IoError("disk full".into()).category(),
            ErrorCategory::Io
        );
    }

    #[test]
    fn status_and_log_id_only_on_api_errors() {
        let err = CozeError::ApiError {
            status: 400,
            code: 4000,
            message: "invalid voice".into(),
            log_id: Some("log-1".into()),
        };
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.log_id(), Some("log-1"));
        assert_eq!(CozeError::StreamClosed.status_code(), None);
        assert_eq!(CozeError::StreamClosed.log_id(), None);
    }

    #[test]
    fn error_body_tolerates_missing_fields() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.code, 0);
        assert!(body.msg.is_empty());
        assert!(body.log_id().is_none());

        let body: ErrorBody =
            serde_json::from_str(r#"{"code":4000,"msg":"bad","detail":{"logid":"abc"}}"#)
                .unwrap();
        assert_eq!(body.code, 4000);
        assert_eq!(body.log_id(), Some("abc"));
    }
}
