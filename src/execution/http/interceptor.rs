//! HTTP Interceptor interfaces
//!
//! Interceptors observe (and may amend) outgoing requests, observe responses
//! and are notified of errors. Hooks run in registration order and should
//! stay cheap.

use super::transport::HttpTransportRequest;
use crate::error::CozeError;
use reqwest::header::HeaderMap;

/// Context passed to interceptors describing the request.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    /// Client-side id of this call, unique per dispatch.
    pub request_id: String,
    pub method: reqwest::Method,
    pub url: String,
}

/// Generate a fresh request id.
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// HTTP interceptor trait
pub trait HttpInterceptor: Send + Sync {
    /// Called before the request reaches the transport. Returning an error
    /// aborts the call.
    fn on_before_send(
        &self,
        _ctx: &HttpRequestContext,
        _request: &mut HttpTransportRequest,
    ) -> Result<(), CozeError> {
        Ok(())
    }

    /// Called once the transport produced a response, before status handling.
    fn on_response(&self, _ctx: &HttpRequestContext, _status: u16, _headers: &HeaderMap) {}

    /// Called once when a started call fails: transport, status, decoding,
    /// cancellation or deadline.
    fn on_error(&self, _ctx: &HttpRequestContext, _error: &CozeError) {}
}

/// A simple logging interceptor backed by `tracing` (no sensitive data).
#[derive(Clone, Default)]
pub struct LoggingInterceptor;

impl HttpInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &HttpRequestContext,
        request: &mut HttpTransportRequest,
    ) -> Result<(), CozeError> {
        tracing::debug!(target: "coze::http", request_id=%ctx.request_id, method=%ctx.method, url=%ctx.url, body=%request.body.kind(), "sending request");
        Ok(())
    }

    fn on_response(&self, ctx: &HttpRequestContext, status: u16, headers: &HeaderMap) {
        let log_id = super::headers::header_str(headers, crate::defaults::LOG_ID_HEADER)
            .unwrap_or_default();
        tracing::debug!(target: "coze::http", request_id=%ctx.request_id, url=%ctx.url, status=%status, log_id=%log_id, "response received");
    }

    fn on_error(&self, ctx: &HttpRequestContext, error: &CozeError) {
        tracing::debug!(target: "coze::http", request_id=%ctx.request_id, url=%ctx.url, category=?error.category(), err=%error, "request error");
    }
}
