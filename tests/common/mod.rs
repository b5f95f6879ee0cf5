// Shared test doubles for the external collaborators.
//
// Every seam the pipeline talks through (speech-to-text, language model,
// summary lookup, news search) has a scripted stand-in here so the tests
// exercise the real orchestration without any network.

use async_trait::async_trait;
use contextify::audio::NormalizedWaveform;
use contextify::enrich::{NewsArticle, NewsSearcher, Summarizer};
use contextify::error::{EnrichmentError, ExtractionError, TranscriptionError};
use contextify::extract::{LlmClient, LlmRequest, LlmResponse};
use contextify::stt::Transcriber;
use std::path::PathBuf;
use std::sync::Mutex;

/// Transcriber that always returns the same text
pub struct FixedTranscriber {
    pub text: String,
}

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(
        &self,
        _waveform: &NormalizedWaveform,
        _language: &str,
    ) -> Result<String, TranscriptionError> {
        Ok(self.text.trim().to_string())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Transcriber that records the staged waveform path, then fails. Used to
/// verify staging cleanup on the error path.
#[derive(Default)]
pub struct RecordingTranscriber {
    pub seen_path: Mutex<Option<PathBuf>>,
    pub fail: bool,
}

#[async_trait]
impl Transcriber for RecordingTranscriber {
    async fn transcribe(
        &self,
        waveform: &NormalizedWaveform,
        _language: &str,
    ) -> Result<String, TranscriptionError> {
        assert!(waveform.path().exists(), "staged waveform should exist during transcription");
        *self.seen_path.lock().unwrap() = Some(waveform.path().to_path_buf());

        if self.fail {
            Err(TranscriptionError::Engine {
                status: 500,
                body: "engine unavailable".to_string(),
            })
        } else {
            Ok("ok".to_string())
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// LLM client that always returns the same reply text
pub struct ScriptedLlm {
    pub reply: String,
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _request: LlmRequest) -> Result<LlmResponse, ExtractionError> {
        Ok(LlmResponse {
            content: self.reply.clone(),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// LLM client that always fails
pub struct FailingLlm;

#[async_trait]
impl LlmClient for FailingLlm {
    async fn complete(&self, _request: LlmRequest) -> Result<LlmResponse, ExtractionError> {
        Err(ExtractionError::Model {
            status: 500,
            body: "model unavailable".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Summarizer that produces a deterministic summary for any subject
pub struct EchoSummarizer;

#[async_trait]
impl Summarizer for EchoSummarizer {
    async fn summarize(&self, subject: &str) -> Result<String, EnrichmentError> {
        Ok(format!("{} is widely known.", subject))
    }
}

/// Summarizer that fails for every subject
pub struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(&self, _subject: &str) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::Service { status: 503 })
    }
}

/// Summarizer that fails only for listed subjects
pub struct SelectiveSummarizer {
    pub fail_for: Vec<String>,
}

#[async_trait]
impl Summarizer for SelectiveSummarizer {
    async fn summarize(&self, subject: &str) -> Result<String, EnrichmentError> {
        if self.fail_for.iter().any(|s| s == subject) {
            Err(EnrichmentError::NotFound(subject.to_string()))
        } else {
            Ok(format!("{} is widely known.", subject))
        }
    }
}

/// News searcher returning a fixed article list
pub struct StaticNews {
    pub articles: Vec<NewsArticle>,
}

#[async_trait]
impl NewsSearcher for StaticNews {
    async fn search(
        &self,
        _query: &str,
        count: u32,
    ) -> Result<Vec<NewsArticle>, EnrichmentError> {
        Ok(self.articles.iter().take(count as usize).cloned().collect())
    }
}

/// News searcher that always fails
pub struct FailingNews;

#[async_trait]
impl NewsSearcher for FailingNews {
    async fn search(
        &self,
        _query: &str,
        _count: u32,
    ) -> Result<Vec<NewsArticle>, EnrichmentError> {
        Err(EnrichmentError::Service { status: 500 })
    }
}
