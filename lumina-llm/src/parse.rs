//! Verdict parsing for model output.
//!
//! Handlers prompt for a strict JSON object (`verdict`, `analysis`,
//! `confidence_score`, `confidence_explanation`). Models drift, so parsing
//! is layered: strip code fences, try JSON, then fall back to
//! `- Label: value` line scanning. Output that fits neither shape comes
//! back as an explicit [`ParsedVerdict::ParseFailure`] carrying a truncated
//! copy of the raw text, and every caller renders that arm as a degraded
//! verdict instead of crashing.

use regex::Regex;
use std::sync::OnceLock;

use serde_json::Value;

pub const DEFAULT_VERDICT: &str = "unclear";
pub const ERROR_VERDICT: &str = "error";

/// Confidence when a score field was present but unreadable or absent
/// within otherwise parseable output.
pub const PARSE_MISS_CONFIDENCE: u8 = 50;

/// Confidence when the output was unparseable or the provider failed.
pub const FAILURE_CONFIDENCE: u8 = 0;

pub const DEFAULT_CONFIDENCE_EXPLANATION: &str =
    "Default confidence due to lack of explicit scoring.";

/// How much of the raw text is kept when parsing fails outright.
const RAW_SNIPPET_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct VerdictFields {
    pub verdict: String,
    pub analysis: String,
    pub confidence: u8,
    pub confidence_explanation: String,
}

impl VerdictFields {
    /// Fields reported when an upstream provider call failed outright.
    pub fn provider_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            verdict: ERROR_VERDICT.to_string(),
            confidence: FAILURE_CONFIDENCE,
            confidence_explanation: format!("Error: {}", message),
            analysis: message,
        }
    }
}

/// Outcome of coercing raw model text. Callers must handle both arms:
/// there is no implicit conversion from failure to fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedVerdict {
    Parsed(VerdictFields),
    ParseFailure { raw: String },
}

impl ParsedVerdict {
    /// Render the failure arm as the degraded verdict the API promises:
    /// `unclear` at confidence 0 with the raw text as the analysis.
    pub fn into_fields(self) -> VerdictFields {
        match self {
            ParsedVerdict::Parsed(fields) => fields,
            ParsedVerdict::ParseFailure { raw } => VerdictFields {
                verdict: DEFAULT_VERDICT.to_string(),
                analysis: raw,
                confidence: FAILURE_CONFIDENCE,
                confidence_explanation: "Model output could not be parsed.".to_string(),
            },
        }
    }
}

fn fence_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").ok())
        .as_ref()
}

/// Parse model output into a tagged verdict result.
pub fn parse_verdict(raw: &str) -> ParsedVerdict {
    let stripped = strip_code_fence(raw);

    if let Some(fields) = parse_json_object(&stripped) {
        return ParsedVerdict::Parsed(fields);
    }
    if let Some(fields) = parse_line_prefixes(&stripped) {
        return ParsedVerdict::Parsed(fields);
    }

    tracing::debug!(target: "llm.parse", raw_len = raw.len(), "verdict.parse.failure");
    ParsedVerdict::ParseFailure {
        raw: truncate_raw(stripped.trim()),
    }
}

fn truncate_raw(text: &str) -> String {
    match text.char_indices().nth(RAW_SNIPPET_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn strip_code_fence(raw: &str) -> String {
    if let Some(caps) = fence_re().and_then(|re| re.captures(raw)) {
        if let Some(inner) = caps.get(1) {
            return inner.as_str().to_string();
        }
    }
    raw.to_string()
}

fn parse_json_object(text: &str) -> Option<VerdictFields> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;
    let obj = value.as_object()?;

    let verdict = obj
        .get("verdict")
        .map(value_to_text)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_VERDICT.to_string());
    let analysis = obj
        .get("analysis")
        .map(value_to_text)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| text.trim().to_string());
    let confidence = obj
        .get("confidence_score")
        .or_else(|| obj.get("confidence"))
        .and_then(value_to_confidence)
        .unwrap_or(PARSE_MISS_CONFIDENCE);
    let confidence_explanation = obj
        .get("confidence_explanation")
        .map(value_to_text)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIDENCE_EXPLANATION.to_string());

    Some(VerdictFields {
        verdict,
        analysis,
        confidence,
        confidence_explanation,
    })
}

/// Legacy bullet format: `- Verdict: ...`, `- Confidence Score: ...`.
///
/// The whole raw text stays as the analysis, matching how earlier model
/// output was consumed: labels are only mined for the score fields.
fn parse_line_prefixes(text: &str) -> Option<VerdictFields> {
    let mut verdict = None;
    let mut confidence = None;
    let mut confidence_explanation = None;

    for line in text.lines() {
        let line = line.trim().trim_start_matches('-').trim();
        let lower = line.to_lowercase();
        if let Some(rest) = lower.strip_prefix("verdict:") {
            let start = line.len() - rest.len();
            verdict.get_or_insert_with(|| line[start..].trim().to_string());
        } else if let Some(rest) = lower.strip_prefix("confidence explanation:") {
            let start = line.len() - rest.len();
            confidence_explanation.get_or_insert_with(|| line[start..].trim().to_string());
        } else if let Some(rest) = lower
            .strip_prefix("confidence score:")
            .or_else(|| lower.strip_prefix("confidence:"))
        {
            let start = line.len() - rest.len();
            confidence = confidence.or_else(|| lenient_confidence(line[start..].trim()));
        }
    }

    if verdict.is_none() && confidence.is_none() && confidence_explanation.is_none() {
        return None;
    }

    Some(VerdictFields {
        verdict: verdict.unwrap_or_else(|| DEFAULT_VERDICT.to_string()),
        analysis: text.trim().to_string(),
        confidence: confidence.unwrap_or(PARSE_MISS_CONFIDENCE),
        confidence_explanation: confidence_explanation
            .unwrap_or_else(|| DEFAULT_CONFIDENCE_EXPLANATION.to_string()),
    })
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn value_to_confidence(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) => n.as_f64().map(clamp_confidence),
        Value::String(s) => lenient_confidence(s),
        _ => None,
    }
}

/// Read a score out of free text like `85`, `85%`, or `85 out of 100`.
fn lenient_confidence(text: &str) -> Option<u8> {
    let token = text.split_whitespace().next()?;
    let token = token.trim_end_matches(|c: char| !c.is_ascii_digit() && c != '.');
    token.parse::<f64>().ok().map(clamp_confidence)
}

fn clamp_confidence(n: f64) -> u8 {
    n.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(raw: &str) -> VerdictFields {
        match parse_verdict(raw) {
            ParsedVerdict::Parsed(f) => f,
            ParsedVerdict::ParseFailure { raw } => panic!("unexpected parse failure: {raw}"),
        }
    }

    #[test]
    fn parses_strict_json() {
        let raw = r#"{"verdict": "false", "analysis": "Contradicted by sources.", "confidence_score": 92, "confidence_explanation": "Consistent sources."}"#;
        let f = fields(raw);
        assert_eq!(f.verdict, "false");
        assert_eq!(f.analysis, "Contradicted by sources.");
        assert_eq!(f.confidence, 92);
        assert_eq!(f.confidence_explanation, "Consistent sources.");
    }

    #[test]
    fn strips_json_code_fence() {
        let raw = "```json\n{\"verdict\": \"true\", \"analysis\": \"ok\", \"confidence_score\": 80}\n```";
        let f = fields(raw);
        assert_eq!(f.verdict, "true");
        assert_eq!(f.confidence, 80);
        assert_eq!(f.confidence_explanation, DEFAULT_CONFIDENCE_EXPLANATION);
    }

    #[test]
    fn joins_array_valued_analysis() {
        let raw = r#"{"verdict": "misleading", "analysis": ["point one.", "point two."], "confidence_score": 60}"#;
        assert_eq!(fields(raw).analysis, "point one. point two.");
    }

    #[test]
    fn confidence_as_string_with_percent_sign() {
        let raw = r#"{"verdict": "true", "analysis": "x", "confidence_score": "85%"}"#;
        assert_eq!(fields(raw).confidence, 85);
    }

    #[test]
    fn confidence_is_clamped() {
        let raw = r#"{"verdict": "true", "analysis": "x", "confidence_score": 140}"#;
        assert_eq!(fields(raw).confidence, 100);
    }

    #[test]
    fn falls_back_to_line_prefixes() {
        let raw = "- Verdict: misleading\n- Analysis: Partially true at best.\n\
                   - Confidence Score: 70\n- Confidence Explanation: Mixed sources.";
        let f = fields(raw);
        assert_eq!(f.verdict, "misleading");
        assert_eq!(f.confidence, 70);
        assert_eq!(f.confidence_explanation, "Mixed sources.");
        // Labeled-lines output keeps the full text as the analysis.
        assert!(f.analysis.contains("Partially true at best."));
    }

    #[test]
    fn line_prefix_missing_confidence_defaults_to_fifty() {
        let f = fields("- Verdict: true");
        assert_eq!(f.confidence, PARSE_MISS_CONFIDENCE);
    }

    #[test]
    fn unlabeled_prose_is_an_explicit_parse_failure() {
        let raw = "The claim seems plausible but I cannot verify it.";
        match parse_verdict(raw) {
            ParsedVerdict::ParseFailure { raw: kept } => assert_eq!(kept, raw),
            ParsedVerdict::Parsed(f) => panic!("expected failure, got {f:?}"),
        }
    }

    #[test]
    fn parse_failure_truncates_long_raw_text() {
        let raw = "z".repeat(2000);
        match parse_verdict(&raw) {
            ParsedVerdict::ParseFailure { raw: kept } => {
                assert!(kept.len() < 600);
                assert!(kept.ends_with("..."));
            }
            ParsedVerdict::Parsed(f) => panic!("expected failure, got {f:?}"),
        }
    }

    #[test]
    fn failure_arm_renders_zero_confidence_fields() {
        let f = parse_verdict("free-form reply").into_fields();
        assert_eq!(f.verdict, DEFAULT_VERDICT);
        assert_eq!(f.confidence, FAILURE_CONFIDENCE);
        assert_eq!(f.analysis, "free-form reply");
    }

    #[test]
    fn provider_failure_fields() {
        let f = VerdictFields::provider_failure("model unavailable");
        assert_eq!(f.verdict, ERROR_VERDICT);
        assert_eq!(f.confidence, FAILURE_CONFIDENCE);
        assert_eq!(f.analysis, "model unavailable");
        assert_eq!(f.confidence_explanation, "Error: model unavailable");
    }
}
