//! Speech service: text-to-speech and speech-to-text.

use crate::defaults::endpoints;
use crate::error::CozeError;
use crate::execution::Core;
use crate::execution::http::transport::MultipartBody;
use crate::streaming::AudioStream;
use crate::traits::{SpeechCapability, TranscriptionCapability};
use crate::types::{
    AudioTranscription, CreateSpeechRequest, RequestOptions, Response, TranscriptionRequest,
};
use crate::utils::cancel::run_cancellable;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::AsyncRead;

/// Thin facade over `Core` for the audio endpoints.
///
/// Cloning is cheap; clones share the same core.
#[derive(Debug, Clone)]
pub struct Speech {
    core: Arc<Core>,
}

impl Speech {
    pub fn new(core: Arc<Core>) -> Self {
        Self { core }
    }

    /// Synthesize speech.
    ///
    /// On success the payload is a stream of audio in the requested format.
    /// The caller owns it and should `close` it (or drop it) once done.
    pub async fn create(
        &self,
        request: CreateSpeechRequest,
    ) -> Result<Response<AudioStream>, CozeError> {
        request.validate()?;
        tracing::debug!(
            target: "coze::audio",
            voice_id = %request.voice_id,
            format = ?request.response_format,
            chars = request.input.chars().count(),
            "creating speech"
        );
        self.core
            .post_json_for_stream(endpoints::AUDIO_SPEECH, &request, &request.options)
            .await
    }

    /// Transcribe an audio clip uploaded as multipart form data.
    pub async fn transcription(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Response<AudioTranscription>, CozeError> {
        request.validate()?;
        tracing::debug!(
            target: "coze::audio",
            file_name = %request.effective_file_name(),
            bytes = request.audio.len(),
            "uploading audio for transcription"
        );

        let mut form = MultipartBody::new().file(
            "file",
            request.effective_file_name(),
            request.content_type(),
            request.audio.clone(),
        );
        if let Some(prompt) = &request.prompt {
            form = form.text("prompt", prompt.as_str());
        }

        self.core
            .post_multipart(endpoints::AUDIO_TRANSCRIPTIONS, form, &request.options)
            .await
    }

    /// Read `reader` to the end and transcribe it.
    ///
    /// An empty `file_name` uploads under the default name. The cancel
    /// handle in `options` also covers draining the reader; the deadline is
    /// applied to the read and to the upload separately.
    pub async fn transcribe<R>(
        &self,
        reader: R,
        file_name: &str,
        options: RequestOptions,
    ) -> Result<Response<AudioTranscription>, CozeError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let request = run_cancellable(
            TranscriptionRequest::from_reader(reader),
            options.cancel.as_ref(),
            options.timeout,
        )
        .await?
        .with_file_name(file_name)
        .with_options(options);
        self.transcription(request).await
    }
}

#[async_trait]
impl SpeechCapability for Speech {
    async fn tts(&self, request: CreateSpeechRequest) -> Result<Response<AudioStream>, CozeError> {
        self.create(request).await
    }
}

#[async_trait]
impl TranscriptionCapability for Speech {
    async fn stt(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Response<AudioTranscription>, CozeError> {
        self.transcription(request).await
    }
}
