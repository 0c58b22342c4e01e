//! Stub providers for handler tests. The LLM stub routes on prompt
//! substrings so one analyzer can serve several model calls per request.

use crate::{Analyzer, AnalyzerLimits};
use async_trait::async_trait;
use lumina_common::{LuminaError, Result};
use lumina_llm::traits::{LlmClient, LlmResponse, OcrClient, VisionClient};
use lumina_search::{SearchCache, SearchProvider, SearchResult};
use lumina_web::ContentFetcher;
use std::sync::Arc;

pub struct ScriptedLlm {
    /// `(prompt substring, canned reply)` pairs, first match wins.
    pub rules: Vec<(&'static str, std::result::Result<&'static str, &'static str>)>,
    pub fallback: &'static str,
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn generate(
        &self,
        prompt: &str,
        _system_prompt: Option<&str>,
        _max_tokens: Option<u32>,
        _temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        for (needle, reply) in &self.rules {
            if prompt.contains(needle) {
                return match reply {
                    Ok(text) => Ok(LlmResponse {
                        text: (*text).to_string(),
                        model: None,
                        tokens_used: None,
                    }),
                    Err(msg) => Err(LuminaError::Provider((*msg).to_string())),
                };
            }
        }
        Ok(LlmResponse {
            text: self.fallback.to_string(),
            model: None,
            tokens_used: None,
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

pub struct CannedVision {
    pub reply: std::result::Result<&'static str, &'static str>,
}

#[async_trait]
impl VisionClient for CannedVision {
    async fn analyze_image(
        &self,
        _prompt: &str,
        _mime_type: &str,
        _image_bytes: &[u8],
    ) -> Result<LlmResponse> {
        self.respond()
    }

    async fn analyze_video(
        &self,
        _prompt: &str,
        _mime_type: &str,
        _video_bytes: &[u8],
    ) -> Result<LlmResponse> {
        self.respond()
    }
}

impl CannedVision {
    fn respond(&self) -> Result<LlmResponse> {
        match self.reply {
            Ok(text) => Ok(LlmResponse {
                text: text.to_string(),
                model: None,
                tokens_used: None,
            }),
            Err(msg) => Err(LuminaError::Provider(msg.to_string())),
        }
    }
}

pub struct CannedOcr {
    pub text: &'static str,
}

#[async_trait]
impl OcrClient for CannedOcr {
    async fn extract_text(&self, _mime_type: &str, _image_bytes: &[u8]) -> Result<String> {
        Ok(self.text.to_string())
    }
}

pub struct FixedSearch {
    pub results: Vec<SearchResult>,
}

#[async_trait]
impl SearchProvider for FixedSearch {
    async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchResult>> {
        Ok(self.results.clone())
    }
}

pub fn one_result() -> Vec<SearchResult> {
    vec![SearchResult {
        title: "Evidence".to_string(),
        url: "https://evidence.example".to_string(),
        content: "snippet".to_string(),
    }]
}

pub fn analyzer(llm: ScriptedLlm, vision: CannedVision, results: Vec<SearchResult>) -> Analyzer {
    Analyzer::new(
        Arc::new(llm),
        Arc::new(vision),
        Arc::new(CannedOcr { text: "" }),
        Arc::new(SearchCache::new(Arc::new(FixedSearch { results }), 50)),
        ContentFetcher::new().unwrap(),
        AnalyzerLimits::default(),
    )
}

/// English-only scripted LLM: language detection answers "en" so handlers
/// skip translation.
pub fn english(mut rules: Vec<(&'static str, std::result::Result<&'static str, &'static str>)>) -> ScriptedLlm {
    rules.insert(0, ("Identify the language", Ok("en")));
    ScriptedLlm {
        rules,
        fallback: "unused",
    }
}
