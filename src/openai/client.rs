use std::env;

use reqwest::Client;
use tracing::{debug, warn};

use super::extraction::{extract_profile, extract_text};
use super::schema::expert_function;
use super::types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, Message};
use crate::api_key::ApiKey;
use crate::expert::ExpertProfile;

const API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const REWRITE_INSTRUCTION: &str = "You are a helpful assistant that generates search queries based on user questions. \
Only generate one search query. The query should help to find experts on the topic of the user question. \
It should be INDIVIDUAL people, so no organisation as a whole or something in that direction. \
A personal website is preferable over LinkedIn. \
Expand abbreviations into full words to make it more specific. I.e. RL to Reinforcement Learning. \
Or LLM to Large Language Model. \
Ideally their website and optionally within a certain location or close to it.";

const EXTRACT_INSTRUCTION: &str = "You are reading extracted HTML data from a website. \
Try to find information about the expert on that page, about their name, affiliation, location, summary and socials. \
If you can't find their name directly, try to extract it from the text or email or possible links";

#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("OPENAI_API_KEY not set. Get one at https://platform.openai.com/api-keys")]
    ApiKeyNotSet,

    #[error("OpenAI API rate limit exceeded. Please retry later.")]
    RateLimited,

    #[error("OpenAI API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("OpenAI returned no message content")]
    EmptyCompletion,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Turns a free-text question into one search string.
pub trait QueryRewriter {
    async fn rewrite(&self, question: &str) -> Result<String, OpenAiError>;
}

/// Fills the expert schema from a page's extracted content.
/// `Ok(None)` means no expert information was found on the page.
pub trait ProfileExtractor {
    async fn extract(&self, content: &str) -> Result<Option<ExpertProfile>, OpenAiError>;
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn from_env(http: Client) -> Result<Self, OpenAiError> {
        let api_key = ApiKey::from_env("OPENAI_API_KEY").ok_or(OpenAiError::ApiKeyNotSet)?;
        let model = env::var("OPENAI_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self {
            http,
            api_key,
            model,
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey::new("test-key"),
            model: DEFAULT_MODEL.to_string(),
            base_url: base_url.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiError> {
        let url = format!("{}/chat/completions", self.base_url);

        debug_assert!(
            url.starts_with("https://") || cfg!(test),
            "API key must only be sent over HTTPS"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .header("User-Agent", crate::USER_AGENT)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("OpenAI API rate limited");
            return Err(OpenAiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if let Ok(body) = serde_json::from_str::<ChatCompletionResponse>(&text)
                && let Some(err) = &body.error
            {
                let classified = classify_api_error(status.as_u16(), err);
                warn!(error = %classified, "OpenAI API error");
                return Err(classified);
            }
            let end = text.floor_char_boundary(200);
            warn!(status = %status, "OpenAI API error (no structured body)");
            return Err(OpenAiError::Api {
                code: status.as_u16(),
                message: format!("HTTP {status}: {}", &text[..end]),
            });
        }

        let body: ChatCompletionResponse = response.json().await?;
        debug!(model = %self.model, "chat completion complete");

        if let Some(err) = &body.error {
            let classified = classify_api_error(status.as_u16(), err);
            warn!(error = %classified, "OpenAI API error in 200 response");
            return Err(classified);
        }

        Ok(body)
    }
}

impl QueryRewriter for OpenAiClient {
    async fn rewrite(&self, question: &str) -> Result<String, OpenAiError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(REWRITE_INSTRUCTION),
                Message::user(question),
            ],
            functions: Vec::new(),
            function_call: None,
        };

        let response = self.chat(&request).await?;
        extract_text(&response).ok_or(OpenAiError::EmptyCompletion)
    }
}

impl ProfileExtractor for OpenAiClient {
    async fn extract(&self, content: &str) -> Result<Option<ExpertProfile>, OpenAiError> {
        if content.trim().is_empty() {
            debug!("empty page content, skipping extraction");
            return Ok(None);
        }
        debug!(content, "extracting expert from page content");

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::system(EXTRACT_INSTRUCTION), Message::user(content)],
            functions: vec![expert_function()],
            function_call: Some("auto".to_string()),
        };

        let response = self.chat(&request).await?;
        Ok(extract_profile(&response))
    }
}

fn classify_api_error(status: u16, err: &ApiError) -> OpenAiError {
    let message = err
        .message
        .clone()
        .unwrap_or_else(|| "Unknown error".to_string());

    match (status, err.kind.as_deref()) {
        (429, _) | (_, Some("rate_limit_exceeded")) => OpenAiError::RateLimited,
        (code, _) => OpenAiError::Api { code, message },
    }
}
