use std::collections::HashMap;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::types::{ContentsResponse, SearchRequest, SearchResponse};
use crate::api_key::ApiKey;
use crate::expert::SearchResult;

const API_BASE: &str = "https://api.metaphor.systems";

#[derive(Debug, thiserror::Error)]
pub enum MetaphorError {
    #[error("METAPHOR_API_KEY not set. Get one at https://dashboard.exa.ai/api-keys")]
    ApiKeyNotSet,

    #[error("Metaphor API rate limit exceeded. Please retry later.")]
    RateLimited,

    #[error("Metaphor API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("invalid Metaphor endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Web search that returns pages with their extracted content.
/// Implemented by `MetaphorClient` for production; mock implementations used in tests.
pub trait WebSearch {
    async fn search(
        &self,
        query: &str,
        num_results: u32,
    ) -> Result<Vec<SearchResult>, MetaphorError>;
}

#[derive(Debug, Clone)]
pub struct MetaphorClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
}

impl MetaphorClient {
    pub fn from_env(http: Client) -> Result<Self, MetaphorError> {
        let api_key = ApiKey::from_env("METAPHOR_API_KEY").ok_or(MetaphorError::ApiKeyNotSet)?;
        Ok(Self {
            http,
            api_key,
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey::new("test-key"),
            base_url: base_url.to_string(),
        }
    }

    async fn search_hits(
        &self,
        query: &str,
        num_results: u32,
    ) -> Result<SearchResponse, MetaphorError> {
        let request = SearchRequest {
            query,
            num_results,
            use_autoprompt: true,
        };
        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .header("x-api-key", self.api_key.expose())
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .send()
            .await?;

        let mut body: SearchResponse = read_body(response).await?;
        if let Some(message) = body.error.take() {
            return Err(MetaphorError::Api { code: 200, message });
        }
        Ok(body)
    }

    async fn contents(&self, ids: &[&str]) -> Result<ContentsResponse, MetaphorError> {
        let url = Url::parse_with_params(
            &format!("{}/contents", self.base_url),
            ids.iter().map(|id| ("ids", *id)),
        )?;
        let response = self
            .http
            .get(url)
            .header("x-api-key", self.api_key.expose())
            .header("User-Agent", crate::USER_AGENT)
            .send()
            .await?;

        let mut body: ContentsResponse = read_body(response).await?;
        if let Some(message) = body.error.take() {
            return Err(MetaphorError::Api { code: 200, message });
        }
        Ok(body)
    }
}

impl WebSearch for MetaphorClient {
    async fn search(
        &self,
        query: &str,
        num_results: u32,
    ) -> Result<Vec<SearchResult>, MetaphorError> {
        let hits = self.search_hits(query, num_results).await?;
        if let Some(prompt) = &hits.autoprompt_string {
            debug!(autoprompt = %prompt, "metaphor rewrote the query");
        }
        if hits.results.is_empty() {
            debug!(query, "metaphor returned no results");
            return Ok(Vec::new());
        }

        let ids: Vec<&str> = hits.results.iter().map(|h| h.id.as_str()).collect();
        let extracts: HashMap<String, String> = self
            .contents(&ids)
            .await?
            .contents
            .into_iter()
            .map(|c| (c.id, c.extract.unwrap_or_default()))
            .collect();

        let results = hits
            .results
            .iter()
            .map(|hit| {
                let content = extracts.get(&hit.id).cloned().unwrap_or_else(|| {
                    warn!(url = %hit.url, "no extracted content for result");
                    String::new()
                });
                SearchResult {
                    url: hit.url.clone(),
                    content,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            requested = num_results,
            returned = results.len(),
            "metaphor search complete"
        );
        Ok(results)
    }
}

async fn read_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, MetaphorError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        warn!("Metaphor API rate limited");
        return Err(MetaphorError::RateLimited);
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                let end = text.floor_char_boundary(200);
                format!("HTTP {status}: {}", &text[..end])
            });
        warn!(status = %status, "Metaphor API error");
        return Err(MetaphorError::Api {
            code: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}
