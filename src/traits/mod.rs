//! Capability traits.

pub mod audio;

pub use audio::{SpeechCapability, TranscriptionCapability};
