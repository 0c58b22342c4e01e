//! Domain handlers: each analysis kind composes the provider seams the same
//! way. Gather evidence (search and/or fetched content), format a fixed
//! prompt, invoke the model, parse, normalize language, and return a fully
//! populated report. Provider failures degrade the report in place; only
//! input validation surfaces as an error.

pub mod bias;
pub mod fact_check;
pub mod media;
pub mod prompts;
pub mod social;
pub mod url_safety;
pub mod verdicts;

#[cfg(test)]
pub(crate) mod testutil;

use lumina_llm::traits::{LlmClient, OcrClient, VisionClient};
use lumina_search::SearchCache;
use lumina_web::ContentFetcher;
use std::sync::Arc;

/// Results requested from the search provider per analysis.
pub(crate) const SEARCH_RESULT_COUNT: usize = 5;

/// Boundary checks applied before a provider is ever called.
#[derive(Debug, Clone)]
pub struct AnalyzerLimits {
    /// Claims beyond this in a batch are silently dropped.
    pub batch_claim_cap: usize,
    /// Video uploads over this many bytes are rejected.
    pub video_max_bytes: usize,
}

impl Default for AnalyzerLimits {
    fn default() -> Self {
        Self {
            batch_claim_cap: 10,
            video_max_bytes: 15 * 1024 * 1024,
        }
    }
}

/// Service object owning the provider handles and the search cache.
/// One instance is shared by every request.
pub struct Analyzer {
    pub(crate) llm: Arc<dyn LlmClient>,
    pub(crate) vision: Arc<dyn VisionClient>,
    pub(crate) ocr: Arc<dyn OcrClient>,
    pub(crate) search: Arc<SearchCache>,
    pub(crate) fetcher: ContentFetcher,
    pub(crate) limits: AnalyzerLimits,
}

impl Analyzer {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        vision: Arc<dyn VisionClient>,
        ocr: Arc<dyn OcrClient>,
        search: Arc<SearchCache>,
        fetcher: ContentFetcher,
        limits: AnalyzerLimits,
    ) -> Self {
        Self {
            llm,
            vision,
            ocr,
            search,
            fetcher,
            limits,
        }
    }

    pub fn search_cache(&self) -> &Arc<SearchCache> {
        &self.search
    }

    pub fn limits(&self) -> &AnalyzerLimits {
        &self.limits
    }
}
