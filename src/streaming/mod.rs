//! Streaming response payloads.

pub mod audio_stream;

pub use audio_stream::AudioStream;
