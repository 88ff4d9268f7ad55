//! Audio types for speech synthesis and transcription

use crate::defaults;
use crate::error::CozeError;
use crate::types::RequestOptions;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Output container/codec for synthesized speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    Wav,
    Pcm,
    OggOpus,
    M4a,
    Aac,
    Mp3,
}

impl AudioFormat {
    /// Wire name of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Pcm => "pcm",
            Self::OggOpus => "ogg_opus",
            Self::M4a => "m4a",
            Self::Aac => "aac",
            Self::Mp3 => "mp3",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Pcm => "audio/pcm",
            Self::OggOpus => "audio/ogg",
            Self::M4a => "audio/mp4",
            Self::Aac => "audio/aac",
            Self::Mp3 => "audio/mpeg",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::OggOpus => "ogg",
            other => other.as_str(),
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text-to-speech request
#[derive(Debug, Clone, Serialize)]
pub struct CreateSpeechRequest {
    /// Text to synthesize
    pub input: String,
    /// Voice to synthesize with
    pub voice_id: String,
    /// Output format; the service picks its default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<AudioFormat>,
    /// Speech rate multiplier. Bounds are enforced by the service only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    /// Output sample rate in Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    /// Per-call transport options (not sent on the wire)
    #[serde(skip)]
    pub options: RequestOptions,
}

impl CreateSpeechRequest {
    pub fn new(input: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            voice_id: voice_id.into(),
            response_format: None,
            speed: None,
            sample_rate: None,
            options: RequestOptions::default(),
        }
    }

    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Reject requests missing required fields.
    ///
    /// Only presence is checked here; value ranges (speed, voice existence)
    /// are the service's call.
    pub fn validate(&self) -> Result<(), CozeError> {
        if self.input.trim().is_empty() {
            return Err(CozeError::InvalidParameter(
                "speech input must not be empty".to_string(),
            ));
        }
        if self.voice_id.trim().is_empty() {
            return Err(CozeError::InvalidParameter(
                "voice_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Speech-to-text request
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Raw audio bytes
    pub audio: Bytes,
    /// Upload file name; its extension drives the part content type
    pub file_name: Option<String>,
    /// Optional context text to steer recognition
    pub prompt: Option<String>,
    /// Per-call transport options
    pub options: RequestOptions,
}

impl TranscriptionRequest {
    /// Create a request from in-memory audio.
    pub fn from_audio(audio: impl Into<Bytes>) -> Self {
        Self {
            audio: audio.into(),
            file_name: None,
            prompt: None,
            options: RequestOptions::default(),
        }
    }

    /// Read an audio stream to its end and wrap it in a request.
    pub async fn from_reader<R>(mut reader: R) -> Result<Self, CozeError>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(Self::from_audio(buf))
    }

    /// Set the upload file name. An empty name keeps the default.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        let name = file_name.into();
        self.file_name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn effective_file_name(&self) -> &str {
        self.file_name
            .as_deref()
            .unwrap_or(defaults::DEFAULT_UPLOAD_FILE_NAME)
    }

    /// Content type guessed from the file name.
    pub fn content_type(&self) -> String {
        mime_guess::from_path(self.effective_file_name())
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    pub fn validate(&self) -> Result<(), CozeError> {
        if self.audio.is_empty() {
            return Err(CozeError::InvalidParameter(
                "transcription audio must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Transcription result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioTranscription {
    /// Recognized text
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_request_omits_unset_fields() {
        let req = CreateSpeechRequest::new("Hello, world!", "voice1");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "input": "Hello, world!", "voice_id": "voice1" })
        );
    }

    #[test]
    fn speech_request_keeps_explicit_zero_speed() {
        let req = CreateSpeechRequest::new("hi", "v")
            .with_format(AudioFormat::OggOpus)
            .with_speed(0.0);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["response_format"], "ogg_opus");
        assert_eq!(json["speed"], 0.0);
    }

    #[test]
    fn speech_request_does_not_check_speed_range() {
        let req = CreateSpeechRequest::new("hi", "voice1").with_speed(-1.0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn speech_request_requires_input_and_voice() {
        assert!(matches!(
            CreateSpeechRequest::new("  ", "voice1").validate(),
            Err(CozeError::InvalidParameter(_))
        ));
        assert!(matches!(
            CreateSpeechRequest::new("hi", "").validate(),
            Err(CozeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn audio_format_names() {
        assert_eq!(AudioFormat::Mp3.to_string(), "mp3");
        assert_eq!(AudioFormat::OggOpus.file_extension(), "ogg");
        assert_eq!(AudioFormat::Wav.mime_type(), "audio/wav");
        let parsed: AudioFormat = serde_json::from_str("\"m4a\"").unwrap();
        assert_eq!(parsed, AudioFormat::M4a);
    }

    #[test]
    fn transcription_defaults_file_name() {
        let req = TranscriptionRequest::from_audio(b"testmp3".to_vec()).with_file_name("");
        assert_eq!(req.effective_file_name(), "audio.mp3");
        assert_eq!(req.content_type(), "audio/mpeg");

        let req = req.with_file_name("clip.wav");
        assert_eq!(req.effective_file_name(), "clip.wav");
        assert!(req.content_type().contains("wav"));
    }

    #[test]
    fn transcription_rejects_empty_audio() {
        let req = TranscriptionRequest::from_audio(Vec::new());
        assert!(matches!(
            req.validate(),
            Err(CozeError::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn transcription_from_reader_reads_everything() {
        let reader: &[u8] = b"testmp3";
        let req = TranscriptionRequest::from_reader(reader).await.unwrap();
        assert_eq!(&req.audio[..], b"testmp3");
    }
}
