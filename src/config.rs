use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub courses: CoursesConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Source audio layout and accumulation policy. The layout is configuration,
/// not auto-detected: the client streams headerless PCM.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Sample rate of the incoming PCM stream
    pub sample_rate: u32,
    /// Bytes per sample (2 or 4)
    pub sample_width: u16,
    /// Channel count of the incoming stream
    pub channels: u16,
    /// Whether incoming samples are big-endian
    pub big_endian: bool,
    /// Bytes accumulated before a unit is cut. Smaller means lower latency,
    /// larger means better transcription accuracy on long utterances.
    pub unit_threshold_bytes: usize,
    /// Apply spectral noise suppression to normalized audio
    pub denoise: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    /// Base URL of an OpenAI-compatible /audio/transcriptions endpoint
    pub api_url: String,
    pub api_key: String,
    /// Model selection (size/quality tradeoff)
    pub model: String,
    /// Language hint passed with every request
    pub language: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Base URL of an OpenAI-compatible /chat/completions endpoint
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentConfig {
    /// Base URL of the page-summary service (Wikipedia REST compatible)
    pub summary_api_url: String,
    /// Endpoint of the news search service (Bing News Search v7 compatible)
    pub news_api_url: String,
    pub news_api_key: String,
    /// Articles requested per company
    pub news_count: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoursesConfig {
    /// Path to the course catalog JSON. Empty means use the embedded catalog.
    pub catalog_path: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("CONTEXTIFY").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "contextify".to_string(),
            http: HttpConfig {
                bind: "0.0.0.0".to_string(),
                port: 8000,
            },
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            sample_width: 4,
            channels: 1,
            big_endian: false,
            unit_threshold_bytes: 1_700_000,
            denoise: true,
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "whisper-1".to_string(),
            language: "en".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            summary_api_url: "https://en.wikipedia.org/api/rest_v1".to_string(),
            news_api_url: "https://api.bing.microsoft.com/v7.0/news/search".to_string(),
            news_api_key: String::new(),
            news_count: 5,
            timeout_secs: 20,
        }
    }
}

impl Default for CoursesConfig {
    fn default() -> Self {
        Self {
            catalog_path: String::new(),
        }
    }
}

impl TranscriptionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ExtractionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl EnrichmentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
