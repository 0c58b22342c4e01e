//! Request and response shells. Domain payloads live in
//! `lumina_analysis::verdicts`; this module only wraps them in the
//! `status` envelope every endpoint carries.

use axum::Json;
use lumina_analysis::verdicts::ClaimResult;
use lumina_search::{CacheStats, SearchResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct UrlSafetyRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct UrlSafetyForm {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct MediaAnalysisRequest {
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct SocialContextRequest {
    pub post_url: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchFactCheckRequest {
    pub claims: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub max_results: Option<usize>,
}

/// Success envelope: the report fields flattened next to `status`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    #[serde(flatten)]
    pub body: T,
    pub status: &'static str,
}

pub fn success<T: Serialize>(body: T) -> Json<Envelope<T>> {
    Json(Envelope {
        body,
        status: "success",
    })
}

#[derive(Debug, Serialize)]
pub struct FactCheckBody {
    pub results: Vec<ClaimResult>,
}

#[derive(Debug, Serialize)]
pub struct SearchBody {
    pub query: String,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
pub struct StatsBody {
    #[serde(flatten)]
    pub cache: CacheStats,
}

#[derive(Debug, Serialize)]
pub struct ClearCacheBody {
    pub cleared: usize,
}
