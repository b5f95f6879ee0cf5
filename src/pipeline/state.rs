use crate::enrich::{
    CompanyDetails, CourseDescription, PersonDescription, TermDefinition, UnitEnrichment,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-unit processing states. `Idle` is both the initial and the
/// recurring state; the machine loops per audio unit until the session
/// ends. Errors in normalization or transcription transition straight
/// back to `Idle` after a failure notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Normalizing,
    Transcribing,
    Extracting,
    Enriching,
    Responding,
}

/// Aggregated result for one audio unit: the transcript plus four ordered
/// record lists, index-aligned to the extracted entity set. Sent as one
/// message and not persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitResponse {
    pub transcription: String,
    pub course_descriptions: Vec<CourseDescription>,
    pub person_descriptions: Vec<PersonDescription>,
    pub technical_term_definitions: Vec<TermDefinition>,
    pub company_details: Vec<CompanyDetails>,
}

impl UnitResponse {
    pub fn new(transcription: String, enrichment: UnitEnrichment) -> Self {
        Self {
            transcription,
            course_descriptions: enrichment.courses,
            person_descriptions: enrichment.people,
            technical_term_definitions: enrichment.terms,
            company_details: enrichment.companies,
        }
    }
}

/// Failure notice sent for an aborted unit; the session continues
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitFailure {
    pub sequence: u64,
    pub error: String,
}

/// Counters for one session, logged at disconnect
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub bytes_received: u64,
    pub units_processed: u64,
    pub units_failed: u64,
}
