//! HTTP error classification
//!
//! Turns a failed response into a `CozeError::ApiError`, preferring the
//! service's own error envelope and falling back to the raw text.

use crate::defaults::LOG_ID_HEADER;
use crate::error::{CozeError, ErrorBody};
use crate::execution::http::headers::header_str;
use reqwest::header::HeaderMap;

/// Classify a non-success response.
///
/// The correlation id is taken from the response header first, then from
/// the body's `detail.logid`.
pub fn classify_http_error(status: u16, headers: &HeaderMap, body: &[u8]) -> CozeError {
    let header_log_id = header_str(headers, LOG_ID_HEADER).map(str::to_string);

    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        let message = if parsed.msg.is_empty() {
            fallback_message(status, body)
        } else {
            parsed.msg.clone()
        };
        return CozeError::ApiError {
            status,
            code: parsed.code,
            message,
            log_id: header_log_id.or_else(|| parsed.log_id().map(str::to_string)),
        };
    }

    CozeError::ApiError {
        status,
        code: 0,
        message: fallback_message(status, body),
        log_id: header_log_id,
    }
}

/// Error from a success-status JSON body that carries a non-zero business code.
pub fn business_error(status: u16, headers: &HeaderMap, code: i64, msg: &str) -> CozeError {
    CozeError::ApiError {
        status,
        code,
        message: if msg.is_empty() {
            format!("request failed with code {code}")
        } else {
            msg.to_string()
        },
        log_id: header_str(headers, LOG_ID_HEADER).map(str::to_string),
    }
}

fn fallback_message(status: u16, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    // JSON bodies without a message carry nothing useful to show.
    if !text.is_empty() && !text.starts_with('{') {
        return text.to_string();
    }
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
