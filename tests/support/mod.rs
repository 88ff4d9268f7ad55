//! Shared test doubles for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use coze::execution::Core;
use coze::prelude::*;
use std::sync::{Arc, Mutex};

type RoundTrip =
    dyn Fn(&HttpTransportRequest) -> Result<HttpTransportResponse, CozeError> + Send + Sync;

/// Transport that answers every request with a caller-supplied closure and
/// records what it was sent.
pub struct MockTransport {
    round_trip: Box<RoundTrip>,
    calls: Mutex<Vec<HttpTransportRequest>>,
}

impl MockTransport {
    pub fn new<F>(round_trip: F) -> Arc<Self>
    where
        F: Fn(&HttpTransportRequest) -> Result<HttpTransportResponse, CozeError>
            + Send
            + Sync
            + 'static,
    {
        Arc::new(Self {
            round_trip: Box::new(round_trip),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<HttpTransportRequest> {
        self.calls.lock().expect("lock").clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, CozeError> {
        let resp = (self.round_trip)(&request);
        self.calls.lock().expect("lock").push(request);
        resp
    }
}

/// JSON response with the given status and no correlation header.
pub fn mock_response(
    status: u16,
    body: &serde_json::Value,
) -> Result<HttpTransportResponse, CozeError> {
    HttpTransportResponse::json(status, body)
}

/// Path component of the request URL.
pub fn request_path(req: &HttpTransportRequest) -> String {
    reqwest::Url::parse(&req.url)
        .expect("absolute url")
        .path()
        .to_string()
}

pub fn new_speech(transport: Arc<dyn HttpTransport>) -> Speech {
    Speech::new(Arc::new(Core::new(transport, coze::COM_BASE_URL)))
}
