pub mod audio;
pub mod config;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod http;
pub mod pipeline;
pub mod stt;

pub use audio::{AudioNormalizer, AudioUnit, ChunkAccumulator, NormalizedWaveform};
pub use config::Config;
pub use enrich::{
    BingNewsSearcher, CompanyDetails, CourseCatalog, CourseDescription, Enricher, NewsArticle,
    NewsSearcher, PersonDescription, Summarizer, TermDefinition, WikipediaSummarizer,
};
pub use error::{EnrichmentError, ExtractionError, FormatError, TranscriptionError, UnitError};
pub use extract::{ChatCompletionsClient, EntityExtractor, EntitySet, LlmClient};
pub use http::{create_router, AppState};
pub use pipeline::{Pipeline, PipelineState, Session, UnitFailure, UnitResponse};
pub use stt::{HttpTranscriber, Transcriber};
