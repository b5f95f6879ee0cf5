use super::Transcriber;
use crate::audio::NormalizedWaveform;
use crate::config::TranscriptionConfig;
use crate::error::TranscriptionError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TranscriptionReply {
    text: String,
}

/// Speech-to-text over an OpenAI-compatible `/audio/transcriptions`
/// endpoint. The staged WAV is self-describing, so the request carries no
/// format parameters beyond the file itself.
pub struct HttpTranscriber {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl HttpTranscriber {
    pub fn new(client: reqwest::Client, config: &TranscriptionConfig) -> Self {
        Self {
            client,
            endpoint: format!(
                "{}/audio/transcriptions",
                config.api_url.trim_end_matches('/')
            ),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(
        &self,
        waveform: &NormalizedWaveform,
        language: &str,
    ) -> Result<String, TranscriptionError> {
        let bytes = tokio::fs::read(waveform.path()).await?;

        debug!(
            "Transcribing {:.2}s waveform ({} bytes) with model {}",
            waveform.duration_seconds(),
            bytes.len(),
            self.model
        );

        let file = Part::bytes(bytes)
            .file_name("unit.wav")
            .mime_str("audio/wav")?;
        let form = Form::new()
            .part("file", file)
            .text("model", self.model.clone())
            .text("language", language.to_string());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Engine {
                status: status.as_u16(),
                body,
            });
        }

        let reply: TranscriptionReply = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Malformed(e.to_string()))?;

        Ok(reply.text.trim().to_string())
    }

    fn name(&self) -> &str {
        "transcriptions-api"
    }
}
