//! Request, response and configuration types.

pub mod audio;
pub mod http;
pub mod response;

pub use audio::*;
pub use http::*;
pub use response::Response;
pub(crate) use response::DataEnvelope;
