//! Image and video authenticity checks.

use crate::verdicts::MediaReport;
use crate::{prompts, Analyzer};
use lumina_common::{LuminaError, Result};
use lumina_llm::parse::{parse_verdict, ParsedVerdict, VerdictFields};

fn report(fields: VerdictFields) -> MediaReport {
    MediaReport {
        verdict: fields.verdict,
        analysis: fields.analysis,
        confidence_score: fields.confidence,
        confidence_explanation: fields.confidence_explanation,
    }
}

impl Analyzer {
    /// Vision analysis of an uploaded image. Content type and emptiness are
    /// rejected before the provider is called; a provider failure degrades
    /// into an error-shaped report.
    pub async fn image_authenticity(
        &self,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<MediaReport> {
        let mime = content_type
            .filter(|ct| ct.starts_with("image/"))
            .ok_or_else(|| {
                LuminaError::Validation("File must be an image (jpg, png, etc.)".to_string())
            })?;
        if bytes.is_empty() {
            return Err(LuminaError::Validation("Empty image file".to_string()));
        }

        let prompt = prompts::image_authenticity();
        let fields = match self.vision.analyze_image(&prompt, mime, bytes).await {
            Ok(response) => match parse_verdict(&response.text) {
                ParsedVerdict::Parsed(fields) => fields,
                failure @ ParsedVerdict::ParseFailure { .. } => failure.into_fields(),
            },
            Err(err) => {
                tracing::warn!(target: "analysis.media", error = %err, "image.vision_failed");
                VerdictFields::provider_failure(format!("Error analyzing image: {}", err))
            }
        };
        Ok(report(fields))
    }

    /// Video authenticity: staged upload plus poll happens inside the
    /// vision client; here we only guard the boundary. The size ceiling is
    /// enforced before a single byte goes to the provider.
    pub async fn video_authenticity(
        &self,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<MediaReport> {
        let mime = content_type
            .filter(|ct| ct.starts_with("video/"))
            .ok_or_else(|| {
                LuminaError::Validation("File must be a video (mp4, etc.)".to_string())
            })?;
        if bytes.is_empty() {
            return Err(LuminaError::Validation("Empty video file".to_string()));
        }
        if bytes.len() > self.limits.video_max_bytes {
            return Err(LuminaError::Validation(
                "Video too large; limit to short clips".to_string(),
            ));
        }

        let prompt = prompts::video_authenticity();
        let fields = match self.vision.analyze_video(&prompt, mime, bytes).await {
            Ok(response) => match parse_verdict(&response.text) {
                ParsedVerdict::Parsed(fields) => fields,
                failure @ ParsedVerdict::ParseFailure { .. } => failure.into_fields(),
            },
            Err(err) => {
                tracing::warn!(target: "analysis.media", error = %err, "video.vision_failed");
                VerdictFields::provider_failure(format!("Error analyzing video: {}", err))
            }
        };
        Ok(report(fields))
    }
}
