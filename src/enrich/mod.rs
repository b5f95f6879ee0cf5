//! Enrichment fan-out: maps every extracted entity to a category-specific
//! description record by invoking the category's lookup collaborator.
//!
//! All lookups for one unit run concurrently; within a category the output
//! sequence keeps the entity set's order. A failed lookup becomes a
//! placeholder record for that entity only and never aborts the batch.

pub mod catalog;
pub mod news;
pub mod summary;

pub use catalog::{CourseCatalog, CourseInfo};
pub use news::{BingNewsSearcher, NewsArticle, NewsSearcher};
pub use summary::{Summarizer, WikipediaSummarizer};

use crate::error::EnrichmentError;
use crate::extract::EntitySet;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Enrichment record for one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDescription {
    pub code: String,
    pub name: String,
    pub description: String,
}

/// Enrichment record for one person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDescription {
    pub name: String,
    pub description: String,
}

/// Enrichment record for one technical term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDefinition {
    pub term: String,
    pub description: String,
}

/// Enrichment record for one company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetails {
    pub name: String,
    pub description: String,
    pub articles: Vec<NewsArticle>,
}

/// All enrichment records for one audio unit, index-aligned with the
/// entity set that produced them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitEnrichment {
    pub courses: Vec<CourseDescription>,
    pub people: Vec<PersonDescription>,
    pub terms: Vec<TermDefinition>,
    pub companies: Vec<CompanyDetails>,
}

pub struct Enricher {
    catalog: Arc<CourseCatalog>,
    summarizer: Arc<dyn Summarizer>,
    news: Arc<dyn NewsSearcher>,
    news_count: u32,
    timeout: Duration,
}

impl Enricher {
    pub fn new(
        catalog: Arc<CourseCatalog>,
        summarizer: Arc<dyn Summarizer>,
        news: Arc<dyn NewsSearcher>,
        news_count: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            summarizer,
            news,
            news_count,
            timeout,
        }
    }

    /// Enrich every entity of one unit. Lookups across all categories run
    /// concurrently and are awaited jointly; the result is complete (one
    /// record per entity, placeholder or not) before it is returned.
    pub async fn enrich(&self, entities: &EntitySet) -> UnitEnrichment {
        let courses = join_all(entities.courses.iter().map(|code| self.enrich_course(code)));
        let people = join_all(entities.names.iter().map(|name| self.enrich_person(name)));
        let terms = join_all(entities.terms.iter().map(|term| self.enrich_term(term)));
        let companies = join_all(
            entities
                .companies
                .iter()
                .map(|name| self.enrich_company(name)),
        );

        let (courses, people, terms, companies) = tokio::join!(courses, people, terms, companies);

        debug!(
            "Enriched unit: {} courses, {} people, {} terms, {} companies",
            courses.len(),
            people.len(),
            terms.len(),
            companies.len()
        );

        UnitEnrichment {
            courses,
            people,
            terms,
            companies,
        }
    }

    async fn enrich_course(&self, code: &str) -> CourseDescription {
        match self.catalog.get(code) {
            Some(info) => CourseDescription {
                code: code.to_string(),
                name: info.name.clone(),
                description: info.description.clone(),
            },
            None => CourseDescription {
                code: code.to_string(),
                name: "Course not found".to_string(),
                description: format!("No entry for {} in the course catalog.", code),
            },
        }
    }

    async fn enrich_person(&self, name: &str) -> PersonDescription {
        match self.bounded(self.summarizer.summarize(name)).await {
            Ok(description) => PersonDescription {
                name: name.to_string(),
                description,
            },
            Err(e) => {
                warn!("Summary lookup failed for {:?}: {}", name, e);
                PersonDescription {
                    name: name.to_string(),
                    description: format!("Could not fetch summary for {}.", name),
                }
            }
        }
    }

    async fn enrich_term(&self, term: &str) -> TermDefinition {
        match self.bounded(self.summarizer.summarize(term)).await {
            Ok(description) => TermDefinition {
                term: term.to_string(),
                description,
            },
            Err(e) => {
                warn!("Definition lookup failed for {:?}: {}", term, e);
                TermDefinition {
                    term: term.to_string(),
                    description: format!("Could not fetch definition for {}.", term),
                }
            }
        }
    }

    async fn enrich_company(&self, name: &str) -> CompanyDetails {
        let (summary, articles) = tokio::join!(
            self.bounded(self.summarizer.summarize(name)),
            self.bounded(self.news.search(name, self.news_count)),
        );

        let description = match summary {
            Ok(description) => description,
            Err(e) => {
                warn!("Summary lookup failed for {:?}: {}", name, e);
                format!("Could not fetch summary for {}.", name)
            }
        };

        let mut articles = match articles {
            Ok(articles) => articles,
            Err(e) => {
                warn!("News search failed for {:?}: {}", name, e);
                Vec::new()
            }
        };

        // A company record always carries at least one article entry
        if articles.is_empty() {
            articles.push(NewsArticle {
                title: "No recent news found".to_string(),
                summary: String::new(),
                image_url: String::new(),
            });
        }

        CompanyDetails {
            name: name.to_string(),
            description,
            articles,
        }
    }

    async fn bounded<T>(
        &self,
        lookup: impl Future<Output = Result<T, EnrichmentError>>,
    ) -> Result<T, EnrichmentError> {
        tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| EnrichmentError::Timeout(self.timeout))?
    }
}
