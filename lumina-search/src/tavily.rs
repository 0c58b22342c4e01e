use crate::{SearchProvider, SearchResult};
use async_trait::async_trait;
use lumina_common::{LuminaError, Result};
use lumina_http::{Auth, HttpClient, RequestOpts};
use serde::{Deserialize, Serialize};

const TAVILY_API_BASE: &str = "https://api.tavily.com/";

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

/// Tavily web search client.
pub struct TavilyClient {
    client: HttpClient,
    api_key: String,
}

impl TavilyClient {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base(api_key, TAVILY_API_BASE)
    }

    /// Point the client at an alternate endpoint (tests, gateways).
    pub fn with_base(api_key: String, base: &str) -> Result<Self> {
        let client = HttpClient::new(base)
            .map_err(|e| LuminaError::Provider(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let request = TavilyRequest {
            query,
            search_depth: "basic",
            max_results,
        };

        tracing::debug!(
            target: "search.tavily",
            query_len = query.len(),
            max_results,
            "tavily.search.start"
        );

        let response: TavilyResponse = self
            .client
            .post_json(
                "search",
                &request,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.api_key)),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| LuminaError::Provider(format!("Tavily search failed: {}", e)))?;

        Ok(response
            .results
            .into_iter()
            .map(|r| SearchResult {
                title: r.title,
                url: r.url,
                content: r.content,
            })
            .collect())
    }
}
