use std::time::Duration;

use reqwest::Client;
use tracing::info;

use crate::expert::ExpertSearch;
use crate::metaphor::{MetaphorClient, MetaphorError};
use crate::openai::{OpenAiClient, OpenAiError};
use crate::pipeline::{PipelineError, find_experts};

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Global HTTP client timeout covering connect + response body. Chat completions can be slow.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("{0}")]
    OpenAi(#[from] OpenAiError),

    #[error("{0}")]
    Metaphor(#[from] MetaphorError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Both API clients, built once per process and shared by the console and web shells.
///
/// Configuration via environment variables:
/// - `OPENAI_API_KEY`: required
/// - `METAPHOR_API_KEY`: required
/// - `OPENAI_MODEL`: optional, defaults to `gpt-3.5-turbo`
#[derive(Debug, Clone)]
pub struct Finder {
    openai: OpenAiClient,
    metaphor: MetaphorClient,
}

impl Finder {
    pub fn from_env() -> Result<Self, SetupError> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        let openai = OpenAiClient::from_env(http.clone())?;
        let metaphor = MetaphorClient::from_env(http)?;
        info!(model = openai.model(), "API clients configured");
        Ok(Self { openai, metaphor })
    }

    #[cfg(test)]
    pub(crate) fn with_clients(openai: OpenAiClient, metaphor: MetaphorClient) -> Self {
        Self { openai, metaphor }
    }

    pub async fn run(
        &self,
        question: &str,
        num_results: u32,
    ) -> Result<ExpertSearch, PipelineError> {
        info!(question, num_results, "expert search");
        find_experts(&self.openai, &self.metaphor, &self.openai, question, num_results).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use reqwest::Client;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// Mounts OpenAI and Metaphor endpoints for a two-page search where the
    /// first page holds an expert and the second does not.
    pub(crate) async fn mock_apis(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"id": "ada", "url": "https://ada.example"},
                    {"id": "cookies", "url": "https://cookies.example"}
                ]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/contents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "contents": [
                    {"id": "ada", "extract": "<h1>Ada Lovelace</h1><p>RL researcher, UvA</p>"},
                    {"id": "cookies", "extract": "<p>We use cookies.</p>"}
                ]
            })))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("Ada Lovelace"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {
                    "content": null,
                    "function_call": {
                        "name": "get_expert_information",
                        "arguments": "{\"name\":\"Ada Lovelace\",\"affiliation\":\"University of Amsterdam\",\"socials\":{\"github\":\"ada\"}}"
                    }
                }}]
            })))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("We use cookies."))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "No expert here."}}]
            })))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("generates search queries"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "Reinforcement Learning researcher Amsterdam"}}]
            })))
            .mount(server)
            .await;
    }

    pub(crate) fn finder(server: &MockServer) -> Finder {
        let http = Client::new();
        Finder::with_clients(
            OpenAiClient::with_base_url(http.clone(), &server.uri()),
            MetaphorClient::with_base_url(http, &server.uri()),
        )
    }
}
