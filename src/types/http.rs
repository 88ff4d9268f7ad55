//! HTTP configuration types.
//!
//! This module defines `HttpConfig` and its builder, used to configure the
//! shared HTTP client, plus the per-call `RequestOptions` and the response
//! metadata (`HttpResponseInfo`) every envelope carries.

use crate::defaults;
use crate::utils::cancel::CancelHandle;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// HTTP response metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResponseInfo {
    /// HTTP status code.
    pub status: u16,
    /// Timestamp when the response was received.
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Response headers (lowercased keys).
    pub headers: HashMap<String, String>,
}

impl HttpResponseInfo {
    pub(crate) fn from_parts(status: u16, headers: &HeaderMap) -> Self {
        Self {
            status,
            timestamp: chrono::Utc::now(),
            headers: crate::execution::http::headers::headermap_to_hashmap(headers),
        }
    }

    /// Correlation id assigned by the service (`X-Tt-Logid`).
    ///
    /// Empty when the service did not send one.
    pub fn log_id(&self) -> &str {
        self.header(defaults::LOG_ID_HEADER).unwrap_or_default()
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout
    #[serde(with = "duration_option_serde")]
    pub timeout: Option<Duration>,
    /// Connection timeout
    #[serde(with = "duration_option_serde")]
    pub connect_timeout: Option<Duration>,
    /// Custom headers sent with every request
    pub headers: HashMap<String, String>,
    /// Proxy settings
    pub proxy: Option<String>,
    /// User agent
    pub user_agent: Option<String>,
}

/// Builder for `HttpConfig`
#[derive(Debug, Clone, Default)]
pub struct HttpConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    headers: HashMap<String, String>,
    proxy: Option<String>,
    user_agent: Option<String>,
}

impl HttpConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
    pub fn connect_timeout(mut self, connect_timeout: Option<Duration>) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
    pub fn user_agent<S: Into<String>>(mut self, user_agent: Option<S>) -> Self {
        self.user_agent = user_agent.map(|s| s.into());
        self
    }
    pub fn proxy<S: Into<String>>(mut self, proxy: Option<S>) -> Self {
        self.proxy = proxy.map(|s| s.into());
        self
    }
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Build the configuration. Unset timeouts and user agent fall back to
    /// the SDK defaults.
    pub fn build(self) -> HttpConfig {
        let defaults = HttpConfig::default();
        HttpConfig {
            timeout: self.timeout.or(defaults.timeout),
            connect_timeout: self.connect_timeout.or(defaults.connect_timeout),
            headers: self.headers,
            proxy: self.proxy,
            user_agent: self.user_agent.or(defaults.user_agent),
        }
    }
}

impl HttpConfig {
    /// Returns a builder for constructing `HttpConfig`
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::new()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(defaults::http::REQUEST_TIMEOUT),
            connect_timeout: Some(defaults::http::CONNECT_TIMEOUT),
            headers: HashMap::new(),
            proxy: None,
            user_agent: Some(defaults::http::USER_AGENT.to_string()),
        }
    }
}

// Helper module for Duration serialization
mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

/// Per-call options: extra headers, a deadline and a cancel handle.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Headers merged over the client headers for this call only.
    pub headers: HashMap<String, String>,
    /// Deadline for the whole call, measured from dispatch.
    pub timeout: Option<Duration>,
    /// Caller-owned cancellation signal.
    pub cancel: Option<CancelHandle>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelHandle) -> Self {
        self.cancel = Some(cancel);
        self
    }
}
