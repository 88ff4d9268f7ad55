//! HTTP transport abstraction.
//!
//! The core client never talks to `reqwest` directly: it hands a fully built
//! `HttpTransportRequest` to an injectable `HttpTransport` and gets back the
//! status, headers and a streaming body. `ReqwestTransport` is the production
//! implementation; tests swap in their own to observe the final
//! URL/headers/body and return synthetic responses.

use super::interceptor::HttpRequestContext;
use crate::error::CozeError;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

/// Streaming response body.
pub type BodyStream = BoxStream<'static, Result<Bytes, CozeError>>;

/// One part of a multipart upload.
#[derive(Debug, Clone)]
pub struct MultipartPart {
    pub name: String,
    /// Present for file parts, absent for plain text fields.
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// An inspectable multipart body.
///
/// `reqwest::multipart::Form` can be neither cloned nor read back, so the
/// upload is described here and only turned into a form by the transport.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    pub parts: Vec<MultipartPart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value: String = value.into();
        self.parts.push(MultipartPart {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: Bytes::from(value),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Bytes,
    ) -> Self {
        self.parts.push(MultipartPart {
            name: name.into(),
            file_name: Some(file_name.into()),
            content_type: Some(content_type.into()),
            data,
        });
        self
    }

    pub fn part(&self, name: &str) -> Option<&MultipartPart> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Value of a text field, if present and valid UTF-8.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.part(name)
            .filter(|p| p.file_name.is_none())
            .and_then(|p| std::str::from_utf8(&p.data).ok())
    }

    /// Convert into a `reqwest` form.
    pub fn into_form(self) -> Result<reqwest::multipart::Form, CozeError> {
        let mut form = reqwest::multipart::Form::new();
        for p in self.parts {
            match p.file_name {
                Some(file_name) => {
                    let mut part =
                        reqwest::multipart::Part::bytes(p.data.to_vec()).file_name(file_name);
                    if let Some(ct) = &p.content_type {
                        part = part.mime_str(ct).map_err(|e| {
                            CozeError::InvalidParameter(format!("Invalid content type '{ct}': {e}"))
                        })?;
                    }
                    form = form.part(p.name, part);
                }
                None => {
                    let value = String::from_utf8_lossy(&p.data).into_owned();
                    form = form.text(p.name, value);
                }
            }
        }
        Ok(form)
    }
}

/// Request body handed to the transport.
#[derive(Debug, Clone)]
pub enum TransportBody {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartBody),
}

impl TransportBody {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Json(_) => "json",
            Self::Multipart(_) => "multipart",
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&MultipartBody> {
        match self {
            Self::Multipart(m) => Some(m),
            _ => None,
        }
    }
}

/// Transport-level request data.
#[derive(Debug, Clone)]
pub struct HttpTransportRequest {
    pub ctx: HttpRequestContext,
    pub method: reqwest::Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: TransportBody,
}

/// Transport-level response data.
pub struct HttpTransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: BodyStream,
}

impl std::fmt::Debug for HttpTransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl HttpTransportResponse {
    pub fn from_stream(status: u16, headers: HeaderMap, body: BodyStream) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A response whose body is already in memory.
    pub fn from_bytes(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        Self::from_stream(status, headers, stream::once(async move { Ok(body) }).boxed())
    }

    /// A JSON response with `Content-Type: application/json`.
    pub fn json(status: u16, value: &serde_json::Value) -> Result<Self, CozeError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(Self::from_bytes(status, headers, serde_json::to_vec(value)?))
    }

    /// Add a header, ignoring names or values that are not valid HTTP.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Read the remaining body into memory.
    pub async fn collect_body(self) -> Result<Bytes, CozeError> {
        let mut buf = BytesMut::new();
        let mut body = self.body;
        while let Some(chunk) = body.try_next().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}

/// Pluggable HTTP transport.
///
/// Implementations must be safe to share across concurrent calls.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, CozeError>;
}

/// Production transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, CozeError> {
        let HttpTransportRequest {
            method,
            url,
            mut headers,
            body,
            ..
        } = request;

        let builder = match body {
            TransportBody::Empty => self.client.request(method, url).headers(headers),
            TransportBody::Json(json) => self.client.request(method, url).headers(headers).json(&json),
            TransportBody::Multipart(multipart) => {
                // The form owns its boundary-based Content-Type.
                headers.remove(CONTENT_TYPE);
                self.client
                    .request(method, url)
                    .headers(headers)
                    .multipart(multipart.into_form()?)
            }
        };

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.bytes_stream().map_err(CozeError::from).boxed();
        Ok(HttpTransportResponse::from_stream(status, headers, body))
    }
}
