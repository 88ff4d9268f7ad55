//! Core client
//!
//! Centralizes request dispatch and response interpretation so the service
//! facades only describe *what* to send:
//! - URL joining against the base URL
//! - Header assembly (user agent, auth, config and per-call headers)
//! - Interceptor notifications
//! - Cancellation and per-call deadlines
//! - Status classification and correlation-id extraction
//! - Typed JSON decoding or binary stream hand-off

use crate::error::CozeError;
use crate::execution::errors::{business_error, classify_http_error};
use crate::execution::http::headers::{HttpHeaderBuilder, header_str, is_json_content_type};
use crate::execution::http::interceptor::{
    HttpInterceptor, HttpRequestContext, generate_request_id,
};
use crate::execution::http::transport::{
    HttpTransport, HttpTransportRequest, HttpTransportResponse, MultipartBody, TransportBody,
};
use crate::streaming::AudioStream;
use crate::types::{DataEnvelope, HttpResponseInfo, RequestOptions, Response};
use crate::utils::cancel::run_cancellable;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Shared request/response machinery behind every service.
///
/// Holds no per-call state; one `Core` is shared by all concurrent calls.
#[derive(Clone)]
pub struct Core {
    base_url: String,
    api_token: Option<SecretString>,
    default_headers: HeaderMap,
    transport: Arc<dyn HttpTransport>,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl std::fmt::Debug for Core {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Core")
            .field("base_url", &self.base_url)
            .field("has_api_token", &self.api_token.is_some())
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

impl Core {
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            default_headers: HeaderMap::new(),
            transport,
            interceptors: Vec::new(),
        }
    }

    pub fn with_api_token(mut self, token: SecretString) -> Self {
        self.api_token = Some(token);
        self
    }

    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn with_interceptors(mut self, interceptors: Vec<Arc<dyn HttpInterceptor>>) -> Self {
        self.interceptors = interceptors;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn build_headers(
        &self,
        body: &TransportBody,
        options: &RequestOptions,
    ) -> Result<HeaderMap, CozeError> {
        let mut builder = HttpHeaderBuilder::new();
        if let Some(token) = &self.api_token {
            builder = builder.with_bearer_auth(token.expose_secret())?;
        }
        if matches!(body, TransportBody::Json(_)) {
            builder = builder.with_json_content_type();
        }
        let mut headers = self.default_headers.clone();
        headers.extend(builder.with_custom_headers(&options.headers)?.build());
        Ok(headers)
    }

    fn context(&self, method: &Method, path: &str) -> HttpRequestContext {
        HttpRequestContext {
            request_id: generate_request_id(),
            method: method.clone(),
            url: self.url(path),
        }
    }

    /// Report a failed call to the log and every interceptor.
    fn notify_error(&self, ctx: &HttpRequestContext, err: &CozeError) {
        tracing::debug!(target: "coze::http", request_id=%ctx.request_id, url=%ctx.url, category=?err.category(), err=%err, "request failed");
        for it in &self.interceptors {
            it.on_error(ctx, err);
        }
    }

    /// Dispatch a request and return the successful response.
    ///
    /// Transport failures are returned as-is; non-2xx responses are read and
    /// classified into `CozeError::ApiError` without further decoding. The
    /// per-call cancel handle and deadline apply.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: TransportBody,
        options: &RequestOptions,
    ) -> Result<HttpTransportResponse, CozeError> {
        let ctx = self.context(&method, path);
        let fut = self.dispatch(&ctx, method, body, options);
        let result = run_cancellable(fut, options.cancel.as_ref(), options.timeout).await;
        if let Err(e) = &result {
            self.notify_error(&ctx, e);
        }
        result
    }

    async fn dispatch(
        &self,
        ctx: &HttpRequestContext,
        method: Method,
        body: TransportBody,
        options: &RequestOptions,
    ) -> Result<HttpTransportResponse, CozeError> {
        let mut request = HttpTransportRequest {
            ctx: ctx.clone(),
            method,
            url: ctx.url.clone(),
            headers: self.build_headers(&body, options)?,
            body,
        };
        for it in &self.interceptors {
            it.on_before_send(ctx, &mut request)?;
        }

        tracing::trace!(target: "coze::http", request_id=%ctx.request_id, method=%ctx.method, url=%ctx.url, body=%request.body.kind(), "dispatching");

        let resp = self.transport.execute(request).await?;

        let log_id = header_str(&resp.headers, crate::defaults::LOG_ID_HEADER).unwrap_or_default();
        tracing::trace!(target: "coze::http", request_id=%ctx.request_id, status=%resp.status, log_id=%log_id, "transport returned");
        for it in &self.interceptors {
            it.on_response(ctx, resp.status, &resp.headers);
        }

        if !resp.is_success() {
            let status = resp.status;
            let headers = resp.headers.clone();
            let body = match resp.collect_body().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::trace!(target: "coze::http", request_id=%ctx.request_id, status=%status, err=%e, "failed to read error body");
                    Default::default()
                }
            };
            return Err(classify_http_error(status, &headers, &body));
        }
        Ok(resp)
    }

    /// POST a JSON body and decode the `data` field of a JSON response.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<Response<T>, CozeError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = TransportBody::Json(serde_json::to_value(body)?);
        self.request_json(Method::POST, path, body, options).await
    }

    /// POST a multipart upload and decode the `data` field of a JSON response.
    pub async fn post_multipart<T>(
        &self,
        path: &str,
        form: MultipartBody,
        options: &RequestOptions,
    ) -> Result<Response<T>, CozeError>
    where
        T: DeserializeOwned,
    {
        self.request_json(Method::POST, path, TransportBody::Multipart(form), options)
            .await
    }

    /// POST a JSON body and hand the binary response back as a stream.
    ///
    /// Only the exchange up to the response headers is covered by the
    /// per-call cancel handle and deadline; the returned stream belongs to
    /// the caller.
    pub async fn post_json_for_stream<B>(
        &self,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<Response<AudioStream>, CozeError>
    where
        B: Serialize + ?Sized,
    {
        let body = TransportBody::Json(serde_json::to_value(body)?);
        let ctx = self.context(&Method::POST, path);
        let fut = async {
            let resp = self.dispatch(&ctx, Method::POST, body, options).await?;
            let status = resp.status;
            let headers = resp.headers.clone();

            // The service reports some failures as a JSON envelope with a 2xx status.
            if is_json_content_type(&headers) {
                let bytes = resp.collect_body().await?;
                let env: DataEnvelope<serde_json::Value> = serde_json::from_slice(&bytes)
                    .map_err(|e| CozeError::ParseError(format!("unexpected JSON body: {e}")))?;
                if env.code != 0 {
                    return Err(business_error(status, &headers, env.code, &env.msg));
                }
                return Err(CozeError::ParseError(
                    "expected binary audio, got a JSON body".to_string(),
                ));
            }

            let content_type = header_str(&headers, CONTENT_TYPE.as_str()).map(str::to_string);
            Ok::<_, CozeError>(Response {
                data: AudioStream::new(resp.body, content_type),
                http_response: HttpResponseInfo::from_parts(status, &headers),
            })
        };
        let result = run_cancellable(fut, options.cancel.as_ref(), options.timeout).await;
        if let Err(e) = &result {
            self.notify_error(&ctx, e);
        }
        result
    }

    async fn request_json<T>(
        &self,
        method: Method,
        path: &str,
        body: TransportBody,
        options: &RequestOptions,
    ) -> Result<Response<T>, CozeError>
    where
        T: DeserializeOwned,
    {
        let ctx = self.context(&method, path);
        let fut = async {
            let resp = self.dispatch(&ctx, method, body, options).await?;
            let status = resp.status;
            let headers = resp.headers.clone();
            let bytes = resp.collect_body().await?;
            let data = decode_data::<T>(status, &headers, &bytes)?;
            Ok::<_, CozeError>(Response {
                data,
                http_response: HttpResponseInfo::from_parts(status, &headers),
            })
        };
        let result = run_cancellable(fut, options.cancel.as_ref(), options.timeout).await;
        if let Err(e) = &result {
            self.notify_error(&ctx, e);
        }
        result
    }
}

/// Decode `{"code", "msg", "data"}` from a success response.
fn decode_data<T: DeserializeOwned>(
    status: u16,
    headers: &HeaderMap,
    bytes: &[u8],
) -> Result<T, CozeError> {
    let env: DataEnvelope<T> = serde_json::from_slice(bytes)
        .map_err(|e| CozeError::ParseError(format!("failed to decode response body: {e}")))?;
    if env.code != 0 {
        return Err(business_error(status, headers, env.code, &env.msg));
    }
    env.data
        .ok_or_else(|| CozeError::ParseError("response body has no data field".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AudioTranscription;
    use crate::utils::cancel::CancelHandle;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<HttpTransportRequest>>,
        status: u16,
        body: &'static [u8],
        content_type: Option<&'static str>,
    }

    #[async_trait]
    impl HttpTransport for Recording {
        async fn execute(
            &self,
            request: HttpTransportRequest,
        ) -> Result<HttpTransportResponse, CozeError> {
            self.calls.lock().expect("lock").push(request);
            let mut resp =
                HttpTransportResponse::from_bytes(self.status, HeaderMap::new(), self.body)
                    .with_header("X-Tt-Logid", "core-log");
            if let Some(ct) = self.content_type {
                resp = resp.with_header("content-type", ct);
            }
            Ok(resp)
        }
    }

    #[derive(Default)]
    struct CountingInterceptor {
        sent: Mutex<u32>,
        responses: Mutex<Vec<u16>>,
        errors: Mutex<u32>,
    }

    impl HttpInterceptor for CountingInterceptor {
        fn on_before_send(
            &self,
            _ctx: &HttpRequestContext,
            request: &mut HttpTransportRequest,
        ) -> Result<(), CozeError> {
            *self.sent.lock().unwrap() += 1;
            request
                .headers
                .insert("x-intercepted", "yes".parse().unwrap());
            Ok(())
        }

        fn on_response(&self, _ctx: &HttpRequestContext, status: u16, _headers: &HeaderMap) {
            self.responses.lock().unwrap().push(status);
        }

        fn on_error(&self, _ctx: &HttpRequestContext, _error: &CozeError) {
            *self.errors.lock().unwrap() += 1;
        }
    }

    fn core_with(transport: Arc<Recording>) -> Core {
        Core::new(transport, "https://api.example.test/")
            .with_api_token(SecretString::from("pat_test".to_string()))
    }

    #[tokio::test]
    #[traced_test]
    async fn json_request_carries_auth_and_decodes_data() {
        let transport = Arc::new(Recording {
            status: 200,
            body: br#"{"code":0,"msg":"","data":{"text":"hi there"}}"#,
            ..Default::default()
        });
        let core = core_with(transport.clone());

        let resp: Response<AudioTranscription> = core
            .post_json("/v1/echo", &serde_json::json!({"a": 1}), &RequestOptions::default())
            .await
            .unwrap();
        assert_eq!(resp.data.text, "hi there");
        assert_eq!(resp.log_id(), "core-log");
        assert_eq!(resp.http_response.status, 200);

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "https://api.example.test/v1/echo");
        assert_eq!(calls[0].method, Method::POST);
        assert_eq!(
            calls[0].headers.get("authorization").unwrap(),
            "Bearer pat_test"
        );
        assert_eq!(
            calls[0].headers.get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(calls[0].body.as_json().unwrap()["a"], 1);
    }

    #[tokio::test]
    async fn per_call_headers_override_defaults() {
        let transport = Arc::new(Recording {
            status: 200,
            body: br#"{"data":{"text":""}}"#,
            ..Default::default()
        });
        let mut defaults = HeaderMap::new();
        defaults.insert("x-env", "prod".parse().unwrap());
        let core = Core::new(transport.clone(), "https://api.example.test")
            .with_default_headers(defaults);

        let opts = RequestOptions::new().with_header("X-Env", "staging");
        let _: Response<AudioTranscription> =
            core.post_json("v1/echo", &(), &opts).await.unwrap();

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].headers.get("x-env").unwrap(), "staging");
        assert!(calls[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn non_zero_business_code_is_api_error() {
        let transport = Arc::new(Recording {
            status: 200,
            body: br#"{"code":4100,"msg":"token expired"}"#,
            ..Default::default()
        });
        let core = core_with(transport);
        let err = core
            .post_json::<_, AudioTranscription>("/v1/echo", &(), &RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CozeError::ApiError { status: 200, code: 4100, ref message, .. } if message == "token expired"
        ));
        assert_eq!(err.log_id(), Some("core-log"));
    }

    #[tokio::test]
    async fn malformed_success_body_is_parse_error() {
        let transport = Arc::new(Recording {
            status: 200,
            body: b"<html>gateway</html>",
            ..Default::default()
        });
        let core = core_with(transport);
        let err = core
            .post_json::<_, AudioTranscription>("/v1/echo", &(), &RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CozeError::ParseError(_)));
    }

    #[tokio::test]
    async fn missing_data_is_parse_error() {
        let transport = Arc::new(Recording {
            status: 200,
            body: br#"{"code":0,"msg":""}"#,
            ..Default::default()
        });
        let core = core_with(transport);
        let err = core
            .post_json::<_, AudioTranscription>("/v1/echo", &(), &RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CozeError::ParseError(_)));
    }

    #[tokio::test]
    async fn interceptors_see_requests_responses_and_errors() {
        let transport = Arc::new(Recording {
            status: 400,
            body: br#"{"code":4000,"msg":"bad"}"#,
            ..Default::default()
        });
        let counting = Arc::new(CountingInterceptor::default());
        let core = core_with(transport.clone())
            .with_interceptors(vec![counting.clone() as Arc<dyn HttpInterceptor>]);

        let err = core
            .send(
                Method::POST,
                "/v1/echo",
                TransportBody::Empty,
                &RequestOptions::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(400));

        assert_eq!(*counting.sent.lock().unwrap(), 1);
        assert_eq!(*counting.responses.lock().unwrap(), vec![400]);
        assert_eq!(*counting.errors.lock().unwrap(), 1);
        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].headers.get("x-intercepted").unwrap(), "yes");
    }

    #[tokio::test]
    async fn json_body_on_binary_endpoint_is_error() {
        let transport = Arc::new(Recording {
            status: 200,
            body: br#"{"code":4000,"msg":"voice not found"}"#,
            content_type: Some("application/json; charset=utf-8"),
            ..Default::default()
        });
        let core = core_with(transport);

        let err = core
            .post_json_for_stream("/v1/audio/speech", &(), &RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CozeError::ApiError { code: 4000, .. }));
    }

    #[tokio::test]
    async fn binary_response_is_streamed_untouched() {
        let transport = Arc::new(Recording {
            status: 200,
            body: b"mock audio data",
            content_type: Some("audio/mpeg"),
            ..Default::default()
        });
        let core = core_with(transport);

        let mut resp = core
            .post_json_for_stream("/v1/audio/speech", &(), &RequestOptions::default())
            .await
            .unwrap();
        assert_eq!(resp.log_id(), "core-log");
        assert_eq!(resp.data.content_type(), Some("audio/mpeg"));
        assert_eq!(&resp.data.read_all().await.unwrap()[..], b"mock audio data");
        resp.data.close();
    }

    #[tokio::test]
    async fn business_code_error_reaches_interceptors() {
        let transport = Arc::new(Recording {
            status: 200,
            body: br#"{"code":4100,"msg":"token expired"}"#,
            ..Default::default()
        });
        let counting = Arc::new(CountingInterceptor::default());
        let core = core_with(transport)
            .with_interceptors(vec![counting.clone() as Arc<dyn HttpInterceptor>]);

        let err = core
            .post_multipart::<AudioTranscription>(
                "/v1/audio/transcriptions",
                MultipartBody::new().text("prompt", "x"),
                &RequestOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CozeError::ApiError { status: 200, code: 4100, .. }));
        assert_eq!(*counting.responses.lock().unwrap(), vec![200]);
        assert_eq!(*counting.errors.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn decode_and_binary_endpoint_errors_reach_interceptors() {
        let transport = Arc::new(Recording {
            status: 200,
            body: br#"{"code":0,"msg":""}"#,
            content_type: Some("application/json"),
            ..Default::default()
        });
        let counting = Arc::new(CountingInterceptor::default());
        let core = core_with(transport)
            .with_interceptors(vec![counting.clone() as Arc<dyn HttpInterceptor>]);

        let err = core
            .post_json::<_, AudioTranscription>("/v1/echo", &(), &RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CozeError::ParseError(_)));
        let err = core
            .post_json_for_stream("/v1/audio/speech", &(), &RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CozeError::ParseError(_)));
        assert_eq!(*counting.errors.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn cancelled_call_reaches_interceptors() {
        let transport = Arc::new(Recording {
            status: 200,
            body: b"mock audio data",
            content_type: Some("audio/mpeg"),
            ..Default::default()
        });
        let counting = Arc::new(CountingInterceptor::default());
        let core = core_with(transport.clone())
            .with_interceptors(vec![counting.clone() as Arc<dyn HttpInterceptor>]);

        let cancel = CancelHandle::new();
        cancel.cancel();
        let err = core
            .post_json_for_stream(
                "/v1/audio/speech",
                &(),
                &RequestOptions::new().with_cancel(cancel),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CozeError::Cancelled(_)));
        assert_eq!(*counting.sent.lock().unwrap(), 0);
        assert_eq!(*counting.errors.lock().unwrap(), 1);
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_error_body_falls_back_to_status_reason() {
        struct BrokenBody;

        #[async_trait]
        impl HttpTransport for BrokenBody {
            async fn execute(
                &self,
                _request: HttpTransportRequest,
            ) -> Result<HttpTransportResponse, CozeError> {
                let body = futures::stream::iter(vec![Err(CozeError::HttpError(
                    "connection reset".into(),
                ))]);
                Ok(HttpTransportResponse::from_stream(
                    503,
                    HeaderMap::new(),
                    futures::StreamExt::boxed(body),
                ))
            }
        }

        let core = Core::new(Arc::new(BrokenBody), "https://api.example.test");
        let err = core
            .post_json::<_, AudioTranscription>("/v1/echo", &(), &RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CozeError::ApiError { status: 503, ref message, .. } if message == "Service Unavailable"
        ));
    }
}
