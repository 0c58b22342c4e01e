//! Site safety assessment for a user-supplied URL.

use crate::verdicts::{source_refs, UrlSafetyReport};
use crate::{prompts, Analyzer, SEARCH_RESULT_COUNT};
use lumina_common::{LuminaError, Result};
use lumina_search::format_sources;
use lumina_web::truncate_chars;

/// Page preview length for the safety prompt.
const CONTENT_PREVIEW_CHARS: usize = 5000;

/// Prepend https:// when the caller omitted a scheme.
pub(crate) fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

impl Analyzer {
    /// Safety check: fetch a content preview, search for safety reviews,
    /// then ask the model for an assessment. Fetch failures flow into the
    /// prompt as sentinel text; only an empty URL is an error.
    pub async fn url_safety(&self, url: &str) -> Result<UrlSafetyReport> {
        let url = url.trim();
        if url.is_empty() {
            return Err(LuminaError::Validation("URL cannot be empty".to_string()));
        }
        let url = normalize_url(url);

        tracing::info!(target: "analysis.url_safety", url = %url, "url_safety.start");

        let fetched = self.fetcher.fetch_text(&url).await;
        let content = truncate_chars(&fetched, CONTENT_PREVIEW_CHARS);

        let query = format!(
            "is {} safe to visit? site safety review malware phishing",
            url
        );
        let results = self.search.search(&query, SEARCH_RESULT_COUNT).await;
        let sources_text = format_sources(&results);

        let prompt = prompts::url_safety(&url, &sources_text, content);
        match self.llm.generate(&prompt, None, None, Some(0.2)).await {
            Ok(response) => Ok(UrlSafetyReport {
                analysis: response.text,
                sources: source_refs(&results),
            }),
            Err(err) => {
                tracing::warn!(target: "analysis.url_safety", error = %err, "url_safety.llm_failed");
                Ok(UrlSafetyReport {
                    analysis: format!("URL safety check error: {}", err),
                    sources: Vec::new(),
                })
            }
        }
    }
}
