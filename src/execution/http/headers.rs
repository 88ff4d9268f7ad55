//! HTTP Headers Utility
//!
//! Helpers for building request headers and reading response headers.

use crate::error::CozeError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// HTTP header builder for API requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    /// Create a new header builder
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Add Bearer token authorization.
    ///
    /// The value is marked sensitive so it is redacted from `Debug` output.
    pub fn with_bearer_auth(mut self, token: &str) -> Result<Self, CozeError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| CozeError::ConfigurationError(format!("Invalid API token format: {e}")))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Add JSON content type
    pub fn with_json_content_type(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, CozeError> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            CozeError::ConfigurationError(format!("Invalid header name '{name}': {e}"))
        })?;
        self.headers.insert(
            header_name,
            HeaderValue::from_str(value).map_err(|e| {
                CozeError::ConfigurationError(format!("Invalid header value for '{name}': {e}"))
            })?,
        );
        Ok(self)
    }

    /// Add multiple custom headers from a HashMap
    pub fn with_custom_headers(
        mut self,
        custom_headers: &HashMap<String, String>,
    ) -> Result<Self, CozeError> {
        for (key, value) in custom_headers {
            self = self.with_header(key, value)?;
        }
        Ok(self)
    }

    /// Build the final HeaderMap
    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a HeaderMap to `HashMap<String, String>` with lowercased keys.
///
/// Values that are not valid UTF-8 are dropped.
pub fn headermap_to_hashmap(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(k, v)| {
            v.to_str()
                .ok()
                .map(|v_str| (k.as_str().to_string(), v_str.to_string()))
        })
        .collect()
}

/// Read a header as a non-empty string.
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
}

/// Whether the `Content-Type` header names a JSON payload.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    header_str(headers, CONTENT_TYPE.as_str())
        .map(|ct| {
            let essence = ct.split(';').next().unwrap_or_default().trim();
            essence.eq_ignore_ascii_case("application/json") || essence.ends_with("+json")
        })
        .unwrap_or(false)
}
