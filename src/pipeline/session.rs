use super::state::{PipelineState, SessionStats, UnitFailure, UnitResponse};
use crate::audio::{AudioNormalizer, AudioUnit, ChunkAccumulator, NormalizedWaveform};
use crate::config::Config;
use crate::enrich::Enricher;
use crate::error::{TranscriptionError, UnitError};
use crate::extract::EntityExtractor;
use crate::stt::Transcriber;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Process-wide pipeline: the normalizer, collaborators, and reference
/// tables shared by every session. Read-only after initialization, so
/// concurrent sessions need no locking.
pub struct Pipeline {
    normalizer: AudioNormalizer,
    transcriber: Arc<dyn Transcriber>,
    extractor: EntityExtractor,
    enricher: Enricher,
    language: String,
    transcription_timeout: Duration,
    unit_threshold: usize,
}

impl Pipeline {
    pub fn new(
        config: &Config,
        transcriber: Arc<dyn Transcriber>,
        extractor: EntityExtractor,
        enricher: Enricher,
    ) -> Self {
        Self {
            normalizer: AudioNormalizer::new(config.audio.clone()),
            transcriber,
            extractor,
            enricher,
            language: config.transcription.language.clone(),
            transcription_timeout: config.transcription.timeout(),
            unit_threshold: config.audio.unit_threshold_bytes,
        }
    }

    async fn transcribe(&self, waveform: &NormalizedWaveform) -> Result<String, TranscriptionError> {
        tokio::time::timeout(
            self.transcription_timeout,
            self.transcriber.transcribe(waveform, &self.language),
        )
        .await
        .map_err(|_| TranscriptionError::Timeout(self.transcription_timeout))?
    }
}

/// Outcome of one completed audio unit
#[derive(Debug)]
pub struct UnitOutcome {
    pub sequence: u64,
    pub result: Result<UnitResponse, UnitError>,
}

impl UnitOutcome {
    /// The JSON-serializable frame for this outcome: the aggregated
    /// response on success, an explicit failure notice on unit abort.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        match &self.result {
            Ok(response) => serde_json::to_string(response),
            Err(error) => serde_json::to_string(&UnitFailure {
                sequence: self.sequence,
                error: error.to_string(),
            }),
        }
    }
}

/// One transport connection's processing lifeline.
///
/// Owns the byte accumulator and drives the per-unit state machine:
/// accumulate → normalize → transcribe → extract → enrich → respond.
/// Units are processed one at a time in arrival order, so temporary
/// resources are bounded to one unit per session; enrichment fan-out is
/// the only intra-unit parallelism.
pub struct Session {
    id: String,
    pipeline: Arc<Pipeline>,
    accumulator: ChunkAccumulator,
    state: PipelineState,
    started_at: DateTime<Utc>,
    bytes_received: u64,
    units_processed: u64,
    units_failed: u64,
}

impl Session {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        let id = format!("session-{}", uuid::Uuid::new_v4());
        info!("Session {} created", id);

        Self {
            id,
            accumulator: ChunkAccumulator::new(pipeline.unit_threshold),
            pipeline,
            state: PipelineState::Idle,
            started_at: Utc::now(),
            bytes_received: 0,
            units_processed: 0,
            units_failed: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Feed transport bytes into the session. Returns the unit outcome
    /// when the appended fragment completes an audio unit, `None` while
    /// still accumulating.
    pub async fn ingest(&mut self, bytes: &[u8]) -> Option<UnitOutcome> {
        self.bytes_received += bytes.len() as u64;
        let unit = self.accumulator.append(bytes)?;
        Some(self.process_unit(unit).await)
    }

    async fn process_unit(&mut self, unit: AudioUnit) -> UnitOutcome {
        let sequence = unit.sequence;
        let result = self.run_unit(unit).await;

        // Staging for this unit has been released by now on every path
        self.state = PipelineState::Idle;

        match &result {
            Ok(response) => {
                self.units_processed += 1;
                info!(
                    "Session {} unit {} complete: {:?}",
                    self.id, sequence, response.transcription
                );
            }
            Err(e) => {
                self.units_failed += 1;
                warn!("Session {} unit {} aborted: {}", self.id, sequence, e);
            }
        }

        UnitOutcome { sequence, result }
    }

    async fn run_unit(&mut self, unit: AudioUnit) -> Result<UnitResponse, UnitError> {
        self.state = PipelineState::Normalizing;
        let waveform = self.pipeline.normalizer.normalize(&unit)?;

        self.state = PipelineState::Transcribing;
        let transcript = self.pipeline.transcribe(&waveform).await?;
        // The waveform exists only for the duration of transcription
        drop(waveform);

        self.state = PipelineState::Extracting;
        let entities = self.pipeline.extractor.extract(&transcript).await;

        self.state = PipelineState::Enriching;
        let enrichment = self.pipeline.enricher.enrich(&entities).await;

        self.state = PipelineState::Responding;
        Ok(UnitResponse::new(transcript, enrichment))
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            session_id: self.id.clone(),
            started_at: self.started_at,
            bytes_received: self.bytes_received,
            units_processed: self.units_processed,
            units_failed: self.units_failed,
        }
    }
}
