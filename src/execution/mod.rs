//! Request execution
//!
//! - `http`: client construction, headers, interceptors and the transport
//! - `core`: the shared request/response lifecycle
//! - `errors`: classification of failed responses

pub mod core;
pub mod errors;
pub mod http;

pub use self::core::Core;
