//! Audio APIs.

pub mod speech;

use crate::execution::Core;
use std::sync::Arc;

pub use speech::Speech;

/// Entry point for the audio endpoints (`client.audio()`).
#[derive(Debug, Clone)]
pub struct Audio {
    speech: Speech,
}

impl Audio {
    pub fn new(core: Arc<Core>) -> Self {
        Self {
            speech: Speech::new(core),
        }
    }

    /// Speech synthesis and transcription.
    pub fn speech(&self) -> &Speech {
        &self.speech
    }
}
