//! The expert search pipeline: rewrite the question, search, extract a profile per page.

use tracing::{debug, info};

use crate::expert::{ExpertSearch, Finding};
use crate::metaphor::{MetaphorError, WebSearch};
use crate::openai::{OpenAiError, ProfileExtractor, QueryRewriter};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    Model(#[from] OpenAiError),

    #[error("{0}")]
    Search(#[from] MetaphorError),
}

/// Runs one pass of `rewrite -> search -> extract*`.
///
/// Pages are processed one at a time in provider order. Pages for which the
/// extractor finds nothing are dropped; everything else is kept as-is, with
/// no deduplication.
pub async fn find_experts(
    rewriter: &impl QueryRewriter,
    search: &impl WebSearch,
    extractor: &impl ProfileExtractor,
    question: &str,
    num_results: u32,
) -> Result<ExpertSearch, PipelineError> {
    let query = rewriter.rewrite(question).await?;
    info!(%query, "generated search query");

    let results = search.search(&query, num_results).await?;
    info!(results = results.len(), "search returned");

    let mut findings = Vec::new();
    for result in results {
        match extractor.extract(&result.content).await? {
            Some(profile) => findings.push(Finding {
                url: result.url,
                profile,
            }),
            None => debug!(url = %result.url, "no expert found on page"),
        }
    }

    info!(experts = findings.len(), "extraction complete");
    Ok(ExpertSearch { query, findings })
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::expert::{ExpertProfile, SearchResult};
    use crate::metaphor::{MetaphorError, WebSearch};
    use crate::openai::{OpenAiError, ProfileExtractor, QueryRewriter};

    pub(crate) struct MockRewriter {
        pub query: String,
        pub questions: Mutex<Vec<String>>,
    }

    impl MockRewriter {
        pub(crate) fn returning(query: &str) -> Self {
            Self {
                query: query.to_string(),
                questions: Mutex::new(Vec::new()),
            }
        }
    }

    impl QueryRewriter for MockRewriter {
        async fn rewrite(&self, question: &str) -> Result<String, OpenAiError> {
            self.questions.lock().unwrap().push(question.to_string());
            Ok(self.query.clone())
        }
    }

    pub(crate) struct MockSearch {
        pub results: Vec<SearchResult>,
        pub calls: Mutex<Vec<(String, u32)>>,
    }

    impl MockSearch {
        pub(crate) fn with_pages(pages: &[(&str, &str)]) -> Self {
            Self {
                results: pages
                    .iter()
                    .map(|(url, content)| SearchResult {
                        url: url.to_string(),
                        content: content.to_string(),
                    })
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl WebSearch for MockSearch {
        async fn search(
            &self,
            query: &str,
            num_results: u32,
        ) -> Result<Vec<SearchResult>, MetaphorError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), num_results));
            Ok(self
                .results
                .iter()
                .take(num_results as usize)
                .cloned()
                .collect())
        }
    }

    /// Returns the profile registered for a page's content; unknown content is declined.
    pub(crate) struct MockExtractor {
        pub profiles: HashMap<String, ExpertProfile>,
        pub contents: Mutex<Vec<String>>,
    }

    impl MockExtractor {
        pub(crate) fn with_profiles(profiles: &[(&str, ExpertProfile)]) -> Self {
            Self {
                profiles: profiles
                    .iter()
                    .map(|(content, profile)| (content.to_string(), profile.clone()))
                    .collect(),
                contents: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.contents.lock().unwrap().len()
        }
    }

    impl ProfileExtractor for MockExtractor {
        async fn extract(&self, content: &str) -> Result<Option<ExpertProfile>, OpenAiError> {
            self.contents.lock().unwrap().push(content.to_string());
            Ok(self.profiles.get(content).cloned())
        }
    }

    pub(crate) fn named(name: &str) -> ExpertProfile {
        ExpertProfile {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }
}
