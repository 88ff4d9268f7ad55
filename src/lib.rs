//! # coze
//!
//! Async client for the Coze audio API: text-to-speech synthesis and audio
//! transcription over HTTP/JSON.
//!
//! ```rust,no_run
//! use coze::prelude::*;
//!
//! # async fn run() -> Result<(), CozeError> {
//! let client = CozeClient::builder()
//!     .api_token("pat_...")
//!     .base_url(coze::COM_BASE_URL)
//!     .build()?;
//!
//! let mut resp = client
//!     .audio()
//!     .speech()
//!     .create(
//!         CreateSpeechRequest::new("Hello, world!", "7426720361733046281")
//!             .with_format(AudioFormat::Mp3)
//!             .with_speed(1.0),
//!     )
//!     .await?;
//! println!("log id: {}", resp.log_id());
//! let audio = resp.data.read_all().await?;
//! resp.data.close();
//! # let _ = audio;
//! # Ok(())
//! # }
//! ```
//!
//! Every response carries the service's correlation id (`log_id()`), which
//! is what Coze support asks for when debugging a call.
//!
//! The network layer is pluggable: implement
//! [`HttpTransport`](execution::http::transport::HttpTransport) and pass it to
//! [`CozeClientBuilder::transport`] to route calls elsewhere (for example a
//! test double).

pub mod audio;
pub mod client;
pub mod config;
pub mod defaults;
pub mod error;
pub mod execution;
pub mod streaming;
pub mod traits;
pub mod types;
pub mod utils;

pub use client::{CozeClient, CozeClientBuilder};
pub use config::CozeConfig;
pub use defaults::{CN_BASE_URL, COM_BASE_URL, LOG_ID_HEADER};
pub use error::{CozeError, ErrorCategory};

/// Commonly used types.
pub mod prelude {
    pub use crate::audio::{Audio, Speech};
    pub use crate::client::{CozeClient, CozeClientBuilder};
    pub use crate::config::CozeConfig;
    pub use crate::error::{CozeError, ErrorCategory};
    pub use crate::execution::http::interceptor::{HttpInterceptor, LoggingInterceptor};
    pub use crate::execution::http::transport::{
        HttpTransport, HttpTransportRequest, HttpTransportResponse, MultipartBody,
        ReqwestTransport, TransportBody,
    };
    pub use crate::streaming::AudioStream;
    pub use crate::traits::{SpeechCapability, TranscriptionCapability};
    pub use crate::types::{
        AudioFormat, AudioTranscription, CreateSpeechRequest, HttpConfig, HttpResponseInfo,
        RequestOptions, Response, TranscriptionRequest,
    };
    pub use crate::utils::cancel::CancelHandle;
}
