//! Speech and transcription capability traits
//!
//! Focused views over the speech service so call sites can depend on (and
//! mock) a single capability instead of the concrete client.

use crate::error::CozeError;
use crate::streaming::AudioStream;
use crate::types::{AudioTranscription, CreateSpeechRequest, Response, TranscriptionRequest};
use async_trait::async_trait;

#[async_trait]
pub trait SpeechCapability: Send + Sync {
    /// Synthesize `request.input` into audio.
    async fn tts(&self, request: CreateSpeechRequest) -> Result<Response<AudioStream>, CozeError>;
}

#[async_trait]
pub trait TranscriptionCapability: Send + Sync {
    /// Transcribe an uploaded audio clip.
    async fn stt(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Response<AudioTranscription>, CozeError>;
}
