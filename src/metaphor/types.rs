use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub num_results: u32,
    pub use_autoprompt: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
    pub autoprompt_string: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentsResponse {
    #[serde(default)]
    pub contents: Vec<DocumentContent>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentContent {
    pub id: String,
    pub extract: Option<String>,
}
