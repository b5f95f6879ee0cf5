use crate::error::EnrichmentError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Text-summary collaborator for people, technical terms, and companies.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Short prose summary for the subject. Implementations may retry an
    /// alternate query form when the primary lookup is ambiguous or
    /// missing.
    async fn summarize(&self, subject: &str) -> Result<String, EnrichmentError>;
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    extract: String,
}

/// Summaries from a Wikipedia-REST-compatible `/page/summary/{title}`
/// endpoint. When the primary page is missing, retries once with a
/// ` (company)` disambiguation suffix; only the first sentence of the
/// page extract is returned.
pub struct WikipediaSummarizer {
    client: reqwest::Client,
    base_url: String,
}

impl WikipediaSummarizer {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_extract(&self, title: &str) -> Result<String, EnrichmentError> {
        let url = format!("{}/page/summary/{}", self.base_url, title.replace(' ', "_"));
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Service {
                status: status.as_u16(),
            });
        }

        let summary: PageSummary = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Malformed(e.to_string()))?;

        if summary.extract.trim().is_empty() {
            return Err(EnrichmentError::NotFound(title.to_string()));
        }

        Ok(summary.extract)
    }
}

#[async_trait]
impl Summarizer for WikipediaSummarizer {
    async fn summarize(&self, subject: &str) -> Result<String, EnrichmentError> {
        let extract = match self.fetch_extract(subject).await {
            Ok(extract) => extract,
            Err(primary) => {
                debug!(
                    "Primary summary lookup failed for {:?} ({}), retrying with suffix",
                    subject, primary
                );
                self.fetch_extract(&format!("{} (company)", subject))
                    .await?
            }
        };

        Ok(first_sentence(&extract).to_string())
    }
}

/// First-sentence-only extraction from a longer summary
pub fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    match text.find(". ") {
        Some(end) => &text[..=end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sentence_stops_at_boundary() {
        assert_eq!(
            first_sentence("Tesla is a carmaker. It was founded in 2003."),
            "Tesla is a carmaker."
        );
    }

    #[test]
    fn single_sentence_is_returned_whole() {
        assert_eq!(first_sentence("  One sentence only  "), "One sentence only");
    }
}
