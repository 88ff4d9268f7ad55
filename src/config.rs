//! Client configuration.

use crate::defaults;
use crate::error::CozeError;
use crate::types::HttpConfig;
use secrecy::SecretString;

/// Connection settings shared by every call made through one client.
#[derive(Debug, Clone)]
pub struct CozeConfig {
    /// API root, e.g. `https://api.coze.com`.
    pub base_url: String,
    /// Personal access token or OAuth access token, sent as a bearer token.
    pub api_token: Option<SecretString>,
    pub http: HttpConfig,
}

impl Default for CozeConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::COM_BASE_URL.to_string(),
            api_token: None,
            http: HttpConfig::default(),
        }
    }
}

impl CozeConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: Some(SecretString::from(api_token.into())),
            ..Self::default()
        }
    }

    /// Load from `COZE_API_TOKEN` (required) and `COZE_API_BASE` (optional).
    pub fn from_env() -> Result<Self, CozeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, CozeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(defaults::env::API_TOKEN)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                CozeError::ConfigurationError(format!(
                    "{} is not set",
                    defaults::env::API_TOKEN
                ))
            })?;
        let mut config = Self::new(token);
        if let Some(base) = lookup(defaults::env::API_BASE).filter(|b| !b.trim().is_empty()) {
            config.base_url = base;
        }
        Ok(config)
    }

    /// Check that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), CozeError> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            CozeError::ConfigurationError(format!("Invalid base URL '{}': {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CozeError::ConfigurationError(format!(
                "Base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(())
    }
}
