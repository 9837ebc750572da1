//! Metaphor neural web search: search hits plus extracted page contents.

pub mod client;
pub mod types;

pub use client::{MetaphorClient, MetaphorError, WebSearch};
