//! HTTP Utilities
//!
//! This module contains HTTP-related utilities:
//! - HTTP client configuration
//! - Header management
//! - HTTP interceptors
//! - The pluggable transport

pub mod client;
pub mod headers;
pub mod interceptor;
pub mod transport;

pub use client::*;
pub use headers::*;
pub use interceptor::*;
pub use transport::*;
