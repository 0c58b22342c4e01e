//! Response payload types. Every field defaults so a handler can always
//! return a fully populated structure, whatever the providers did.

use lumina_search::SearchResult;
use serde::{Deserialize, Serialize};

/// A cited source echoed back to the caller: title and URL only, the
/// content snippet stays in the prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceRef {
    pub title: String,
    pub url: String,
}

impl From<&SearchResult> for SourceRef {
    fn from(r: &SearchResult) -> Self {
        Self {
            title: r.title.clone(),
            url: r.url.clone(),
        }
    }
}

pub fn source_refs(results: &[SearchResult]) -> Vec<SourceRef> {
    results.iter().map(SourceRef::from).collect()
}

/// Verdict for a single fact-checked claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClaimResult {
    pub claim: String,
    pub verdict: String,
    pub analysis: String,
    pub sources: Vec<SourceRef>,
    pub confidence_score: u8,
    pub confidence_explanation: String,
}

/// Image or video authenticity report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MediaReport {
    pub verdict: String,
    pub analysis: String,
    pub confidence_score: u8,
    pub confidence_explanation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UrlSafetyReport {
    pub analysis: String,
    pub sources: Vec<SourceRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BiasReport {
    pub analysis: String,
    pub balance_score: String,
    pub tips: String,
    pub sources: Vec<SourceRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NeutralNewsReport {
    pub neutral_analysis: String,
    pub alternative_sources: Vec<SourceRef>,
}

/// Output of the media-analysis dispatch: URLs get a neutral-news
/// summary, bare source names get a bias rating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MediaAnalysisReport {
    Bias(BiasReport),
    NeutralNews(NeutralNewsReport),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SocialContextReport {
    pub context_analysis: String,
    pub fact_check_result: Option<ClaimResult>,
}
