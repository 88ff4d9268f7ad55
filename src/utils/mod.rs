//! Utility modules
//!
//! Small helpers shared across the SDK.

pub mod cancel;

pub use cancel::{CancelHandle, new_cancel_handle};
