//! Entity extraction: wraps the language-model collaborator, parses its
//! semi-structured reply into four typed lists, and normalizes course
//! identifiers.
//!
//! The extractor never fails outward. Any internal error (call failure,
//! malformed reply) is logged and yields an all-empty entity set, so the
//! orchestrator sees at most "nothing extracted".

pub mod course;
mod llm;
mod parser;

pub use course::{convert_spelled_numbers, normalize_course, MAJOR_PREFIXES};
pub use llm::{ChatCompletionsClient, LlmClient, LlmRequest, LlmResponse};
pub use parser::ReplyParser;

use crate::error::ExtractionError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are an assistant that helps extract entity information from text.";

/// Four ordered entity lists extracted from one transcript, keyed by
/// category. Insertion order reflects extraction order; duplicates are
/// kept as extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    pub names: Vec<String>,
    pub companies: Vec<String>,
    pub courses: Vec<String>,
    pub terms: Vec<String>,
}

impl EntitySet {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
            && self.companies.is_empty()
            && self.courses.is_empty()
            && self.terms.is_empty()
    }

    /// Total entity count across all categories
    pub fn total(&self) -> usize {
        self.names.len() + self.companies.len() + self.courses.len() + self.terms.len()
    }
}

pub struct EntityExtractor {
    llm: Arc<dyn LlmClient>,
    parser: ReplyParser,
    timeout: Duration,
}

impl EntityExtractor {
    pub fn new(llm: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self {
            llm,
            parser: ReplyParser::new(),
            timeout,
        }
    }

    /// Extract entities from a transcript. Never fails outward: internal
    /// errors are logged and produce an empty set.
    pub async fn extract(&self, transcript: &str) -> EntitySet {
        if transcript.trim().is_empty() {
            debug!("Empty transcript, skipping extraction");
            return EntitySet::default();
        }

        match self.try_extract(transcript).await {
            Ok(set) => {
                if set.is_empty() {
                    debug!("Model reported no notable entities");
                } else {
                    debug!(
                        "Extracted {} entities ({} names, {} companies, {} courses, {} terms)",
                        set.total(),
                        set.names.len(),
                        set.companies.len(),
                        set.courses.len(),
                        set.terms.len()
                    );
                }
                set
            }
            Err(e) => {
                warn!("Entity extraction failed, returning empty set: {}", e);
                EntitySet::default()
            }
        }
    }

    async fn try_extract(&self, transcript: &str) -> Result<EntitySet, ExtractionError> {
        let request = LlmRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: build_prompt(transcript),
            temperature: 0.2,
        };

        let response = tokio::time::timeout(self.timeout, self.llm.complete(request))
            .await
            .map_err(|_| ExtractionError::Timeout(self.timeout))??;

        let mut set = self.parser.parse(&response.content);
        set.courses = set
            .courses
            .iter()
            .map(|course| normalize_course(course))
            .collect();

        Ok(set)
    }
}

/// Build the extraction prompt: transcript, category list, notability
/// instruction, output format, and the major → prefix table to bias
/// course-name normalization.
pub fn build_prompt(transcript: &str) -> String {
    let mut table = String::new();
    for (major, prefix) in MAJOR_PREFIXES {
        table.push_str(&format!("- {} -> {}\n", major, prefix));
    }

    format!(
        "The following is a transcription text:\n\
         ---\n\
         {transcript}\n\
         ---\n\
         Please extract the following information:\n\
         - Names of people\n\
         - Company names\n\
         - Course names\n\
         - Technical terms\n\
         \n\
         Only include entities that are notable or complex enough that a \
         listener would want background on them.\n\
         \n\
         Format the output as follows:\n\
         Names: [name1, name2, ...]\n\
         Companies: [company1, company2, ...]\n\
         Courses: [course1, course2, ...]\n\
         Technical terms: [term1, term2, ...]\n\
         \n\
         When a course is mentioned as a major name plus a number, write it \
         using the department code from this mapping:\n\
         {table}"
    )
}
