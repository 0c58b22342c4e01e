//! Claim fact-checking: single, multi-claim text, and batch.

use crate::verdicts::{source_refs, ClaimResult};
use crate::{prompts, Analyzer, SEARCH_RESULT_COUNT};
use futures::future::join_all;
use lumina_common::{LuminaError, Result};
use lumina_llm::language::{detect_language, translate_text};
use lumina_llm::parse::{parse_verdict, ParsedVerdict, VerdictFields};
use lumina_search::{format_sources, SearchResult};

/// Split a claim field into individual claims on newlines and semicolons.
pub fn split_claims(text: &str) -> Vec<String> {
    text.split(['\n', ';'])
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

impl Analyzer {
    /// Evidence-gathering and model call for one claim, already trimmed.
    ///
    /// The search query is translated to English when the claim is not;
    /// the prompt itself carries the original claim. A provider failure
    /// degrades to error-shaped fields with whatever sources were found.
    pub(crate) async fn fact_check_core(
        &self,
        claim: &str,
        lang: &str,
    ) -> (VerdictFields, Vec<SearchResult>) {
        let search_claim = if lang != "en" {
            translate_text(self.llm.as_ref(), claim, "en").await
        } else {
            claim.to_string()
        };
        let results = self.search.search(&search_claim, SEARCH_RESULT_COUNT).await;
        let sources_text = format_sources(&results);

        let prompt = prompts::fact_check(claim, &sources_text);
        match self.llm.generate(&prompt, None, None, Some(0.2)).await {
            Ok(response) => match parse_verdict(&response.text) {
                ParsedVerdict::Parsed(fields) => (fields, results),
                failure @ ParsedVerdict::ParseFailure { .. } => {
                    tracing::warn!(target: "analysis.fact_check", "fact_check.unparseable_output");
                    (failure.into_fields(), results)
                }
            },
            Err(err) => {
                tracing::warn!(target: "analysis.fact_check", error = %err, "fact_check.llm_failed");
                (
                    VerdictFields::provider_failure(format!("Fact-check error: {}", err)),
                    results,
                )
            }
        }
    }

    /// Fact-check one claim end to end: language detection, translation for
    /// search, verdict, then translation of the outputs into the preferred
    /// language.
    pub async fn fact_check(
        &self,
        claim: &str,
        preferred_language: Option<&str>,
    ) -> Result<ClaimResult> {
        let claim = claim.trim();
        if claim.is_empty() {
            return Err(LuminaError::Validation("No valid claim provided".to_string()));
        }

        let input_lang = detect_language(self.llm.as_ref(), claim).await;
        let output_lang = preferred_language.unwrap_or(&input_lang).to_string();

        let (mut fields, results) = self.fact_check_core(claim, &input_lang).await;

        if output_lang != "en" {
            fields.analysis =
                translate_text(self.llm.as_ref(), &fields.analysis, &output_lang).await;
            fields.confidence_explanation =
                translate_text(self.llm.as_ref(), &fields.confidence_explanation, &output_lang)
                    .await;
        }

        Ok(ClaimResult {
            claim: claim.to_string(),
            verdict: fields.verdict,
            analysis: fields.analysis,
            sources: source_refs(&results),
            confidence_score: fields.confidence,
            confidence_explanation: fields.confidence_explanation,
        })
    }

    /// The fact-check endpoint operation: optional OCR image overrides the
    /// typed claim, the claim field may carry several claims, and all of
    /// them run concurrently.
    pub async fn fact_check_submission(
        &self,
        claim_text: &str,
        image: Option<(&str, &[u8])>,
        preferred_language: Option<&str>,
    ) -> Result<Vec<ClaimResult>> {
        let mut full_claim = claim_text.trim().to_string();

        if let Some((mime, bytes)) = image {
            if !bytes.is_empty() {
                let extracted = self.claim_from_image(mime, bytes).await;
                if !extracted.is_empty() {
                    tracing::info!(
                        target: "analysis.fact_check",
                        chars = extracted.len(),
                        "fact_check.ocr_claim"
                    );
                    full_claim = extracted;
                }
            }
        }

        let claims = split_claims(&full_claim);
        if claims.is_empty() {
            return Err(LuminaError::Validation("No valid claim provided".to_string()));
        }

        let futures = claims
            .iter()
            .map(|c| self.fact_check(c, preferred_language));
        join_all(futures)
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()
    }

    /// Batch fact-check. Claims beyond the cap are silently dropped; empty
    /// entries come back as skipped results; one claim failing never aborts
    /// the rest.
    pub async fn batch_fact_check(&self, claims: &[String]) -> Result<Vec<ClaimResult>> {
        if claims.is_empty() {
            return Err(LuminaError::Validation("No claims provided".to_string()));
        }

        let cap = self.limits.batch_claim_cap;
        let capped = if claims.len() > cap {
            tracing::warn!(
                target: "analysis.fact_check",
                submitted = claims.len(),
                cap,
                "batch.truncated"
            );
            &claims[..cap]
        } else {
            claims
        };

        let futures = capped.iter().map(|claim| async move {
            let trimmed = claim.trim();
            if trimmed.is_empty() {
                return ClaimResult {
                    claim: claim.clone(),
                    verdict: lumina_llm::parse::DEFAULT_VERDICT.to_string(),
                    analysis: "Empty claim - skipped analysis".to_string(),
                    sources: Vec::new(),
                    confidence_score: 0,
                    confidence_explanation: "No analysis performed".to_string(),
                };
            }
            match self.fact_check(trimmed, None).await {
                Ok(result) => result,
                Err(err) => ClaimResult {
                    claim: trimmed.to_string(),
                    verdict: lumina_llm::parse::ERROR_VERDICT.to_string(),
                    analysis: format!("Fact-check error: {}", err),
                    sources: Vec::new(),
                    confidence_score: 0,
                    confidence_explanation: format!("Error: {}", err),
                },
            }
        });

        Ok(join_all(futures).await)
    }

    /// OCR a claim out of an uploaded image. Failures come back empty so
    /// the typed claim still stands.
    pub(crate) async fn claim_from_image(&self, mime: &str, bytes: &[u8]) -> String {
        match self.ocr.extract_text(mime, bytes).await {
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                tracing::warn!(target: "analysis.fact_check", error = %err, "fact_check.ocr_failed");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{analyzer, english, one_result, CannedVision};

    const VERDICT_JSON: &str = r#"{"verdict": "false", "analysis": "Debunked repeatedly.", "confidence_score": 95, "confidence_explanation": "Strong source agreement."}"#;

    fn vision_unused() -> CannedVision {
        CannedVision { reply: Err("unused") }
    }

    #[test]
    fn claims_split_on_newlines_and_semicolons() {
        let claims = split_claims("first claim; second claim\nthird claim\n\n;");
        assert_eq!(claims, vec!["first claim", "second claim", "third claim"]);
    }

    #[tokio::test]
    async fn fact_check_returns_parsed_verdict_and_sources() {
        let llm = english(vec![("fact-checking expert", Ok(VERDICT_JSON))]);
        let analyzer = analyzer(llm, vision_unused(), one_result());

        let result = analyzer
            .fact_check("The moon landing was faked", Some("en"))
            .await
            .unwrap();

        assert_eq!(result.verdict, "false");
        assert_eq!(result.confidence_score, 95);
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].url, "https://evidence.example");
        assert!(!result.analysis.is_empty());
    }

    #[tokio::test]
    async fn empty_claim_is_a_validation_error() {
        let llm = english(vec![]);
        let analyzer = analyzer(llm, vision_unused(), one_result());
        let err = analyzer.fact_check("   ", None).await.unwrap_err();
        assert!(matches!(err, lumina_common::LuminaError::Validation(_)));
    }

    #[tokio::test]
    async fn llm_failure_degrades_to_zero_confidence() {
        let llm = english(vec![("fact-checking expert", Err("model down"))]);
        let analyzer = analyzer(llm, vision_unused(), one_result());

        let result = analyzer.fact_check("some claim", Some("en")).await.unwrap();
        assert_eq!(result.confidence_score, 0);
        assert_eq!(result.verdict, "error");
        assert!(result.analysis.contains("model down"));
        // Sources gathered before the failure are still reported.
        assert_eq!(result.sources.len(), 1);
    }

    #[tokio::test]
    async fn batch_caps_at_configured_limit() {
        let llm = english(vec![("fact-checking expert", Ok(VERDICT_JSON))]);
        let analyzer = analyzer(llm, vision_unused(), one_result());

        let claims: Vec<String> = (0..12).map(|i| format!("claim number {}", i)).collect();
        let results = analyzer.batch_fact_check(&claims).await.unwrap();
        assert_eq!(results.len(), 10);
    }

    #[tokio::test]
    async fn batch_skips_empty_claims_without_aborting() {
        let llm = english(vec![("fact-checking expert", Ok(VERDICT_JSON))]);
        let analyzer = analyzer(llm, vision_unused(), one_result());

        let claims = vec!["real claim".to_string(), "  ".to_string()];
        let results = analyzer.batch_fact_check(&claims).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].verdict, "false");
        assert_eq!(results[1].analysis, "Empty claim - skipped analysis");
        assert_eq!(results[1].confidence_score, 0);
    }

    #[tokio::test]
    async fn submission_splits_multi_claim_field() {
        let llm = english(vec![("fact-checking expert", Ok(VERDICT_JSON))]);
        let analyzer = analyzer(llm, vision_unused(), one_result());

        let results = analyzer
            .fact_check_submission("claim one; claim two", None, None)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].claim, "claim one");
        assert_eq!(results[1].claim, "claim two");
    }
}
