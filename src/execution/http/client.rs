//! HTTP client builder utilities

use crate::error::CozeError;
use crate::types::HttpConfig;

/// Build a `reqwest::Client` from the connection settings of `HttpConfig`.
///
/// Only timeouts and the proxy are applied here. Config headers and the user
/// agent are attached per request by the core, so every transport sees them.
/// An invalid proxy URL is reported as `CozeError::ConfigurationError`.
pub fn build_http_client_from_config(config: &HttpConfig) -> Result<reqwest::Client, CozeError> {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }

    if let Some(proxy_url) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| CozeError::ConfigurationError(format!("Invalid proxy URL: {e}")))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| CozeError::ConfigurationError(format!("Failed to create HTTP client: {e}")))
}
