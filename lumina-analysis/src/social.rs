//! Social media post context analysis.

use crate::url_safety::normalize_url;
use crate::verdicts::{source_refs, ClaimResult, SocialContextReport};
use crate::{prompts, Analyzer};
use lumina_common::{LuminaError, Result};
use lumina_web::truncate_chars;

/// Post preview length for claim extraction and the context prompt.
const POST_PREVIEW_CHARS: usize = 2000;

const NO_CLAIM: &str = "No clear claim identified.";

/// Platform guess from the domain text. URL-substring heuristic only; no
/// structured metadata is retrieved (known limitation).
pub(crate) fn platform_for(post_url: &str) -> &'static str {
    let lower = post_url.to_lowercase();
    if lower.contains("x.com") || lower.contains("twitter.com") {
        "X"
    } else if lower.contains("reddit.com") {
        "Reddit"
    } else {
        "Unknown"
    }
}

impl Analyzer {
    /// Context analysis for a social media post: fetch the post, extract an
    /// embedded claim, fact-check it when one exists, then narrate the
    /// context around both.
    pub async fn social_context(&self, post_url: &str) -> Result<SocialContextReport> {
        let post_url = post_url.trim();
        if post_url.is_empty() {
            return Err(LuminaError::Validation("Post URL cannot be empty".to_string()));
        }
        let post_url = normalize_url(post_url);
        let platform = platform_for(&post_url);

        tracing::info!(target: "analysis.social", platform, "social_context.start");

        let fetched = self.fetcher.fetch_text(&post_url).await;
        let content = truncate_chars(&fetched, POST_PREVIEW_CHARS);

        let claim = match self
            .llm
            .generate(&prompts::extract_claim(content), None, None, Some(0.2))
            .await
        {
            Ok(response) => response.text.trim().to_string(),
            Err(err) => {
                tracing::warn!(target: "analysis.social", error = %err, "social.claim_extraction_failed");
                String::new()
            }
        };

        let fact_check_result = if !claim.is_empty() && claim != NO_CLAIM {
            let (fields, results) = self.fact_check_core(&claim, "en").await;
            ClaimResult {
                claim: claim.clone(),
                verdict: fields.verdict,
                analysis: fields.analysis,
                sources: source_refs(&results),
                confidence_score: fields.confidence,
                confidence_explanation: fields.confidence_explanation,
            }
        } else {
            ClaimResult {
                claim: String::new(),
                verdict: lumina_llm::parse::DEFAULT_VERDICT.to_string(),
                analysis: "No claim extracted".to_string(),
                sources: Vec::new(),
                confidence_score: 0,
                confidence_explanation: "No claim to analyze".to_string(),
            }
        };

        let metadata = format!(
            "platform: {}\nposter: Unknown\nengagement: Unknown",
            platform
        );
        let prompt = prompts::social_context(
            &post_url,
            &metadata,
            &claim,
            &fact_check_result.analysis,
        );
        let context_analysis = match self.llm.generate(&prompt, None, None, Some(0.3)).await {
            Ok(response) => response.text,
            Err(err) => {
                tracing::warn!(target: "analysis.social", error = %err, "social.context_failed");
                format!("Error analyzing social media post: {}", err)
            }
        };

        Ok(SocialContextReport {
            context_analysis,
            fact_check_result: Some(fact_check_result),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{analyzer, english, one_result, CannedVision};

    const VERDICT_JSON: &str = r#"{"verdict": "misleading", "analysis": "Lacks context.", "confidence_score": 64, "confidence_explanation": "Partial sourcing."}"#;

    fn vision_unused() -> CannedVision {
        CannedVision { reply: Err("unused") }
    }

    #[test]
    fn platform_heuristic_from_domain_substrings() {
        assert_eq!(platform_for("https://x.com/user/status/1"), "X");
        assert_eq!(platform_for("https://TWITTER.com/user"), "X");
        assert_eq!(platform_for("https://old.reddit.com/r/news"), "Reddit");
        assert_eq!(platform_for("https://example.com/post"), "Unknown");
    }

    #[tokio::test]
    async fn empty_post_url_is_a_validation_error() {
        let analyzer = analyzer(english(vec![]), vision_unused(), one_result());
        assert!(matches!(
            analyzer.social_context(" ").await.unwrap_err(),
            LuminaError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn extracted_claim_gets_nested_fact_check() {
        let llm = english(vec![
            ("main claim or statement", Ok("The mayor resigned yesterday.")),
            ("fact-checking expert", Ok(VERDICT_JSON)),
            ("social media misinformation analyst", Ok("Context Analysis: low credibility.")),
        ]);
        let analyzer = analyzer(llm, vision_unused(), one_result());

        // Unreachable host: the fetch sentinel feeds claim extraction,
        // which the scripted model answers anyway.
        let report = analyzer
            .social_context("127.0.0.1:9/status/1")
            .await
            .unwrap();

        assert!(report.context_analysis.contains("Context Analysis"));
        let nested = report.fact_check_result.unwrap();
        assert_eq!(nested.claim, "The mayor resigned yesterday.");
        assert_eq!(nested.verdict, "misleading");
        assert_eq!(nested.confidence_score, 64);
        assert_eq!(nested.sources.len(), 1);
    }

    #[tokio::test]
    async fn no_claim_yields_placeholder_fact_check() {
        let llm = english(vec![
            ("main claim or statement", Ok("No clear claim identified.")),
            ("social media misinformation analyst", Ok("Context Analysis: nothing to verify.")),
        ]);
        let analyzer = analyzer(llm, vision_unused(), one_result());

        let report = analyzer
            .social_context("http://127.0.0.1:9/post")
            .await
            .unwrap();

        let nested = report.fact_check_result.unwrap();
        assert_eq!(nested.claim, "");
        assert_eq!(nested.analysis, "No claim extracted");
        assert_eq!(nested.confidence_score, 0);
    }
}
