//! OpenAI chat completions: query rewriting and function-calling profile extraction.

pub mod client;
mod extraction;
pub mod schema;
pub mod types;

pub use client::{OpenAiClient, OpenAiError, ProfileExtractor, QueryRewriter};
