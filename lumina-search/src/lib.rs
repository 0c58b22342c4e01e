//! Web search with an in-process LRU cache in front of the provider.

pub mod cache;
pub mod tavily;

use async_trait::async_trait;
use lumina_common::Result;
use serde::{Deserialize, Serialize};

pub use cache::{CacheStats, SearchCache};
pub use tavily::TavilyClient;

/// A single search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    /// Provider-supplied content snippet.
    pub content: String,
}

/// Search provider seam. Concrete providers and test stubs both implement
/// this; callers go through [`SearchCache`] rather than the provider
/// directly.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}

/// Render results the way analysis prompts expect sources listed.
pub fn format_sources(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format!("- {} ({})", r.title, r.url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Concatenate result snippets for inclusion in a prompt context block.
pub fn format_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format!("{}: {}", r.title, r.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
