//! Default Configuration Values
//!
//! This module centralizes the default values used throughout the SDK.

use std::time::Duration;

/// Base URL of the international Coze deployment.
pub const COM_BASE_URL: &str = "https://api.coze.com";

/// Base URL of the mainland China Coze deployment.
pub const CN_BASE_URL: &str = "https://api.coze.cn";

/// Response header carrying the server-side correlation id.
pub const LOG_ID_HEADER: &str = "X-Tt-Logid";

/// Environment variables read by `CozeConfig::from_env`.
pub mod env {
    pub const API_TOKEN: &str = "COZE_API_TOKEN";
    pub const API_BASE: &str = "COZE_API_BASE";
}

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default request timeout for HTTP requests.
    ///
    /// Speech synthesis of long inputs can take tens of seconds.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Default connection timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("coze-sdk/", env!("CARGO_PKG_VERSION"));
}

/// Endpoint paths, relative to the base URL.
pub mod endpoints {
    pub const AUDIO_SPEECH: &str = "/v1/audio/speech";
    pub const AUDIO_TRANSCRIPTIONS: &str = "/v1/audio/transcriptions";
}

/// File name used for transcription uploads when the caller gives none.
pub const DEFAULT_UPLOAD_FILE_NAME: &str = "audio.mp3";
