//! Synthesize a sentence, save it, then transcribe the saved audio.
//!
//! ```sh
//! COZE_API_TOKEN=pat_... COZE_VOICE_ID=7426720361733046281 \
//!     RUST_LOG=coze=debug cargo run --example speech_roundtrip
//! ```

use coze::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = CozeClientBuilder::from_config(CozeConfig::from_env()?)
        .with_logging()
        .build()?;
    let voice_id = std::env::var("COZE_VOICE_ID")?;

    let mut speech = client
        .audio()
        .speech()
        .create(
            CreateSpeechRequest::new("Hello from the Coze Rust SDK.", voice_id)
                .with_format(AudioFormat::Mp3)
                .with_speed(1.0),
        )
        .await?;
    println!("speech log id: {}", speech.log_id());

    let path = std::env::temp_dir().join("coze_speech_roundtrip.mp3");
    let mut file = tokio::fs::File::create(&path).await?;
    let written = speech.data.write_to(&mut file).await?;
    speech.data.close();
    println!("wrote {written} bytes to {}", path.display());

    let file = tokio::fs::File::open(&path).await?;
    let transcription = client
        .audio()
        .speech()
        .transcribe(file, "coze_speech_roundtrip.mp3", RequestOptions::default())
        .await?;
    println!(
        "transcription log id: {}, text: {}",
        transcription.log_id(),
        transcription.data.text
    );
    Ok(())
}
