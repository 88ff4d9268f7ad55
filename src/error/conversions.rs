//! Type Conversions for CozeError
//!
//! This module contains From trait implementations for converting
//! common error types into CozeError.

use super::types::CozeError;

impl From<reqwest::Error> for CozeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CozeError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for CozeError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
