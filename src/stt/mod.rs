//! Transcription adapter: wraps the external speech-to-text engine behind
//! a single call-and-result contract.

mod http;

pub use http::HttpTranscriber;

use crate::audio::NormalizedWaveform;
use crate::error::TranscriptionError;

/// Speech-to-text engine seam.
///
/// Implementations are stateless per call: a process-wide instance may be
/// shared across sessions, but each call is independent and must not
/// mutate shared state.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a staged canonical waveform. Empty text is a valid
    /// result (silence), not an error.
    async fn transcribe(
        &self,
        waveform: &NormalizedWaveform,
        language: &str,
    ) -> Result<String, TranscriptionError>;

    /// Engine name for logging
    fn name(&self) -> &str;
}
