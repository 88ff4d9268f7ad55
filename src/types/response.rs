//! Response envelopes.

use crate::types::HttpResponseInfo;
use serde::Deserialize;

/// A decoded result plus the metadata of the response it came from.
#[derive(Debug)]
pub struct Response<T> {
    pub data: T,
    pub http_response: HttpResponseInfo,
}

impl<T> Response<T> {
    /// Correlation id of the call (`X-Tt-Logid`).
    pub fn log_id(&self) -> &str {
        self.http_response.log_id()
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            data: f(self.data),
            http_response: self.http_response,
        }
    }
}

/// JSON body shape shared by the service's JSON endpoints:
/// `{"code": 0, "msg": "", "data": {...}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}
