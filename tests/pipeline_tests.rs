// End-to-end pipeline tests with scripted collaborators.
//
// These drive a Session exactly the way the WebSocket handler does:
// binary fragments in, one outcome per completed audio unit out.

mod common;

use common::{EchoSummarizer, FixedTranscriber, RecordingTranscriber, ScriptedLlm, StaticNews};
use contextify::config::Config;
use contextify::enrich::{CourseCatalog, Enricher};
use contextify::extract::EntityExtractor;
use contextify::pipeline::{Pipeline, PipelineState, Session};
use contextify::stt::Transcriber;
use std::sync::Arc;
use std::time::Duration;

const THRESHOLD: usize = 8_000;

fn test_config() -> Config {
    let mut cfg = Config::default();
    // Canonical source layout keeps normalization cheap in tests
    cfg.audio.sample_rate = 16_000;
    cfg.audio.sample_width = 2;
    cfg.audio.channels = 1;
    cfg.audio.big_endian = false;
    cfg.audio.denoise = false;
    cfg.audio.unit_threshold_bytes = THRESHOLD;
    cfg
}

fn pipeline_with(transcriber: Arc<dyn Transcriber>, llm_reply: &str) -> Arc<Pipeline> {
    let cfg = test_config();
    let extractor = EntityExtractor::new(
        Arc::new(ScriptedLlm {
            reply: llm_reply.to_string(),
        }),
        Duration::from_secs(5),
    );
    let enricher = Enricher::new(
        Arc::new(CourseCatalog::builtin()),
        Arc::new(EchoSummarizer),
        Arc::new(StaticNews { articles: vec![] }),
        5,
        Duration::from_secs(5),
    );
    Arc::new(Pipeline::new(&cfg, transcriber, extractor, enricher))
}

#[tokio::test]
async fn fragments_below_threshold_keep_accumulating() {
    let pipeline = pipeline_with(
        Arc::new(FixedTranscriber { text: String::new() }),
        "Names: []",
    );
    let mut session = Session::new(pipeline);

    assert!(session.ingest(&vec![0u8; 4000]).await.is_none());
    assert!(session.ingest(&vec![0u8; 4000]).await.is_none());
    assert_eq!(session.state(), PipelineState::Idle);
}

#[tokio::test]
async fn silent_unit_produces_an_empty_response_without_error() {
    // One oversized fragment of silence: transcribes to the empty string,
    // which is a valid result, not an error.
    let pipeline = pipeline_with(
        Arc::new(FixedTranscriber { text: String::new() }),
        "Names: [ShouldNeverAppear]",
    );
    let mut session = Session::new(pipeline);

    let outcome = session
        .ingest(&vec![0u8; THRESHOLD + 2])
        .await
        .expect("oversized fragment should complete a unit");

    let response = outcome.result.expect("silence is not an error");
    assert_eq!(response.transcription, "");
    assert!(response.course_descriptions.is_empty());
    assert!(response.person_descriptions.is_empty());
    assert!(response.technical_term_definitions.is_empty());
    assert!(response.company_details.is_empty());

    assert_eq!(session.state(), PipelineState::Idle);
    assert_eq!(session.stats().units_processed, 1);
}

#[tokio::test]
async fn transcribed_unit_is_extracted_and_enriched() {
    let pipeline = pipeline_with(
        Arc::new(FixedTranscriber {
            text: "John Doe took Computer Science one thirty at Tesla.".to_string(),
        }),
        "Names: [John Doe]\nCompanies: [Tesla]\nCourses: [Computer Science one thirty]\nTechnical terms: [transformer models]",
    );
    let mut session = Session::new(pipeline);

    let outcome = session.ingest(&vec![1u8; THRESHOLD + 2]).await.unwrap();
    let response = outcome.result.unwrap();

    assert_eq!(
        response.transcription,
        "John Doe took Computer Science one thirty at Tesla."
    );

    // Course normalized and found in the embedded catalog
    assert_eq!(response.course_descriptions.len(), 1);
    assert_eq!(response.course_descriptions[0].code, "CMPSC130");
    assert_eq!(
        response.course_descriptions[0].name,
        "Data Structures and Algorithms"
    );

    assert_eq!(response.person_descriptions.len(), 1);
    assert_eq!(
        response.person_descriptions[0].description,
        "John Doe is widely known."
    );

    assert_eq!(response.technical_term_definitions.len(), 1);
    assert_eq!(
        response.technical_term_definitions[0].term,
        "transformer models"
    );

    // No articles from the news stub, so a single placeholder is attached
    assert_eq!(response.company_details.len(), 1);
    assert_eq!(response.company_details[0].articles.len(), 1);
    assert_eq!(
        response.company_details[0].articles[0].title,
        "No recent news found"
    );
}

#[tokio::test]
async fn response_frame_matches_the_wire_shape() {
    let pipeline = pipeline_with(
        Arc::new(FixedTranscriber {
            text: "hello".to_string(),
        }),
        "Names: []",
    );
    let mut session = Session::new(pipeline);

    let outcome = session.ingest(&vec![1u8; THRESHOLD + 2]).await.unwrap();
    let frame = outcome.to_frame().unwrap();
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();

    assert_eq!(value["transcription"], "hello");
    assert!(value["course_descriptions"].is_array());
    assert!(value["person_descriptions"].is_array());
    assert!(value["technical_term_definitions"].is_array());
    assert!(value["company_details"].is_array());
}

#[tokio::test]
async fn transcription_failure_aborts_the_unit_and_notifies() {
    let transcriber = Arc::new(RecordingTranscriber {
        fail: true,
        ..Default::default()
    });
    let pipeline = pipeline_with(transcriber.clone(), "Names: []");
    let mut session = Session::new(pipeline);

    let outcome = session.ingest(&vec![1u8; THRESHOLD + 2]).await.unwrap();
    assert!(outcome.result.is_err());

    // The failure notice is an explicit frame, not a silent drop
    let frame = outcome.to_frame().unwrap();
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(value["sequence"], 0);
    assert!(value["error"].as_str().unwrap().contains("transcription"));

    // Staging released on the error path too
    let staged = transcriber.seen_path.lock().unwrap().clone().unwrap();
    assert!(!staged.exists(), "staged waveform should be cleaned up");

    // The session survives the aborted unit
    assert_eq!(session.state(), PipelineState::Idle);
    assert_eq!(session.stats().units_failed, 1);
    assert!(session.ingest(&vec![1u8; 100]).await.is_none());
}

#[tokio::test]
async fn staging_is_released_after_successful_units_too() {
    let transcriber = Arc::new(RecordingTranscriber {
        fail: false,
        ..Default::default()
    });
    let pipeline = pipeline_with(transcriber.clone(), "Names: []");
    let mut session = Session::new(pipeline);

    let outcome = session.ingest(&vec![1u8; THRESHOLD + 2]).await.unwrap();
    assert!(outcome.result.is_ok());

    let staged = transcriber.seen_path.lock().unwrap().clone().unwrap();
    assert!(!staged.exists());
}

#[tokio::test]
async fn malformed_unit_is_a_format_error() {
    // Odd byte count cannot be framed as 16-bit samples
    let pipeline = pipeline_with(
        Arc::new(FixedTranscriber { text: String::new() }),
        "Names: []",
    );
    let mut session = Session::new(pipeline);

    let outcome = session.ingest(&vec![0u8; THRESHOLD + 1]).await.unwrap();
    let err = outcome.result.unwrap_err();
    assert!(err.to_string().contains("audio format error"));
}

#[tokio::test]
async fn units_are_processed_sequentially_in_arrival_order() {
    let pipeline = pipeline_with(
        Arc::new(FixedTranscriber {
            text: "ok".to_string(),
        }),
        "Names: []",
    );
    let mut session = Session::new(pipeline);

    let first = session.ingest(&vec![0u8; THRESHOLD + 2]).await.unwrap();
    let second = session.ingest(&vec![0u8; THRESHOLD + 2]).await.unwrap();

    assert_eq!(first.sequence, 0);
    assert_eq!(second.sequence, 1);
    assert_eq!(session.stats().units_processed, 2);
    assert_eq!(session.stats().bytes_received, 2 * (THRESHOLD as u64 + 2));
}
