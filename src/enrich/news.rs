use crate::error::EnrichmentError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One news article attached to a company record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub summary: String,
    pub image_url: String,
}

/// News-search collaborator for company enrichment.
#[async_trait]
pub trait NewsSearcher: Send + Sync {
    async fn search(&self, query: &str, count: u32) -> Result<Vec<NewsArticle>, EnrichmentError>;
}

#[derive(Debug, Deserialize)]
struct NewsReply {
    #[serde(default)]
    value: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    image: Option<NewsImage>,
}

#[derive(Debug, Deserialize)]
struct NewsImage {
    thumbnail: Option<NewsThumbnail>,
}

#[derive(Debug, Deserialize)]
struct NewsThumbnail {
    #[serde(rename = "contentUrl", default)]
    content_url: String,
}

/// Client for a Bing-News-Search-v7-compatible endpoint
pub struct BingNewsSearcher {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl BingNewsSearcher {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl NewsSearcher for BingNewsSearcher {
    async fn search(&self, query: &str, count: u32) -> Result<Vec<NewsArticle>, EnrichmentError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("count", &count.to_string()),
                ("mkt", "en-US"),
                ("safeSearch", "Moderate"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Service {
                status: status.as_u16(),
            });
        }

        let reply: NewsReply = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Malformed(e.to_string()))?;

        Ok(reply
            .value
            .into_iter()
            .map(|item| NewsArticle {
                title: item.name,
                summary: item.description,
                image_url: item
                    .image
                    .and_then(|image| image.thumbnail)
                    .map(|thumbnail| thumbnail.content_url)
                    .unwrap_or_default(),
            })
            .collect())
    }
}
