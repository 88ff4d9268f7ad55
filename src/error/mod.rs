//! Error Handling Module
//!
//! This module provides the error type shared by every layer of the SDK:
//! - Core error type (`CozeError`) and its coarse `ErrorCategory`
//! - Decoding of the service's error envelope
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust,ignore
//! use coze::error::{CozeError, ErrorCategory};
//!
//! let error = CozeError::api_error(404, "Not found");
//! assert_eq!(error.category(), ErrorCategory::Client);
//! assert!(!error.is_retryable());
//! ```

mod conversions;
pub mod types;

pub use types::*;
