//! Client entry point and builder.

use crate::audio::Audio;
use crate::config::CozeConfig;
use crate::error::CozeError;
use crate::execution::Core;
use crate::execution::http::client::build_http_client_from_config;
use crate::execution::http::headers::HttpHeaderBuilder;
use crate::execution::http::interceptor::{HttpInterceptor, LoggingInterceptor};
use crate::execution::http::transport::{HttpTransport, ReqwestTransport};
use crate::types::HttpConfig;
use reqwest::header::{HeaderValue, USER_AGENT};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

/// Coze API client.
///
/// Cheap to clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct CozeClient {
    core: Arc<Core>,
    audio: Audio,
}

impl CozeClient {
    pub fn builder() -> CozeClientBuilder {
        CozeClientBuilder::new()
    }

    /// Build a client from `COZE_API_TOKEN` / `COZE_API_BASE`.
    pub fn from_env() -> Result<Self, CozeError> {
        CozeClientBuilder::from_config(CozeConfig::from_env()?).build()
    }

    /// Wrap an existing core.
    pub fn from_core(core: Arc<Core>) -> Self {
        Self {
            audio: Audio::new(core.clone()),
            core,
        }
    }

    pub fn audio(&self) -> &Audio {
        &self.audio
    }

    pub fn base_url(&self) -> &str {
        self.core.base_url()
    }
}

/// Builder for `CozeClient`.
#[derive(Default)]
pub struct CozeClientBuilder {
    config: CozeConfig,
    http_client: Option<reqwest::Client>,
    transport: Option<Arc<dyn HttpTransport>>,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl CozeClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: CozeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the API root (e.g. `coze::CN_BASE_URL`).
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn api_token<S: Into<String>>(mut self, token: S) -> Self {
        self.config.api_token = Some(SecretString::from(token.into()));
        self
    }

    pub fn http_config(mut self, http: HttpConfig) -> Self {
        self.config.http = http;
        self
    }

    /// Set the request timeout of the built-in HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.http.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured `reqwest::Client` instead of building one from
    /// the HTTP config.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Replace the network transport entirely.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Add an HTTP interceptor. Interceptors run in the order added.
    pub fn interceptor(mut self, interceptor: Arc<dyn HttpInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Log requests, responses and errors through `tracing`.
    pub fn with_logging(self) -> Self {
        self.interceptor(Arc::new(LoggingInterceptor))
    }

    pub fn build(self) -> Result<CozeClient, CozeError> {
        self.config.validate()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => {
                let client = match self.http_client {
                    Some(c) => c,
                    None => build_http_client_from_config(&self.config.http)?,
                };
                Arc::new(ReqwestTransport::new(client))
            }
        };

        // Sent per request only, so every transport sees the same headers.
        let mut default_headers = HttpHeaderBuilder::new()
            .with_custom_headers(&self.config.http.headers)?
            .build();
        if let Some(ua) = &self.config.http.user_agent {
            let value = HeaderValue::from_str(ua)
                .map_err(|e| CozeError::ConfigurationError(format!("Invalid user agent: {e}")))?;
            default_headers.insert(USER_AGENT, value);
        }

        let mut core = Core::new(transport, self.config.base_url)
            .with_default_headers(default_headers)
            .with_interceptors(self.interceptors);
        if let Some(token) = self.config.api_token {
            core = core.with_api_token(token);
        }

        tracing::debug!(target: "coze::client", base_url = %core.base_url(), "client built");
        Ok(CozeClient::from_core(Arc::new(core)))
    }
}
