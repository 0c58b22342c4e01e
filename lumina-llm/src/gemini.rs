use crate::traits::{LlmResponse, VisionClient};
use async_trait::async_trait;
use base64::Engine;
use lumina_common::{LuminaError, Result};
use lumina_http::{Auth, HttpClient, HttpError, RequestOpts};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Write;
use std::time::Duration;
use tokio_util::codec::{BytesCodec, FramedRead};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Video analysis spans an upload plus server-side processing.
const GEMINI_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Poll cadence and ceiling for server-side video processing.
const VIDEO_POLL_INTERVAL: Duration = Duration::from_secs(2);
const VIDEO_POLL_CEILING: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    safety_settings: Option<Vec<GeminiSafetySetting>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<GeminiInlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data: Option<GeminiFileData>,
}

impl GeminiPart {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
            file_data: None,
        }
    }

    fn inline(mime_type: String, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(GeminiInlineData { mime_type, data }),
            file_data: None,
        }
    }

    fn file(mime_type: String, file_uri: String) -> Self {
        Self {
            text: None,
            inline_data: None,
            file_data: Some(GeminiFileData {
                mime_type,
                file_uri,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GeminiFileData {
    mime_type: String,
    file_uri: String,
}

#[derive(Debug, Serialize)]
struct GeminiSafetySetting {
    category: String,
    threshold: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiUsageMetadata {
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FileUploadResponse {
    file: UploadedFile,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    /// Resource name, e.g. "files/abc-123".
    name: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    state: String,
}

/// Google Gemini client used for image and video authenticity analysis.
///
/// Images are sent inline (base64). Videos are staged on disk, streamed to
/// the provider's Files API, then polled every 2s until the provider leaves
/// the `PROCESSING` state, bounded by a 60s ceiling. The on-disk staging
/// file is a `NamedTempFile`, so it is removed on every exit path.
pub struct GeminiClient {
    client: HttpClient,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client using the provided API key and model.
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base(api_key, model, GEMINI_BASE_URL)
    }

    /// Point the client at an alternate endpoint (tests, gateways).
    pub fn with_base(api_key: String, model: String, base: &str) -> Result<Self> {
        let client = HttpClient::new(base)
            .map_err(|e| LuminaError::Provider(format!("HttpClient init failed: {e}")))?
            .with_timeout(GEMINI_REQUEST_TIMEOUT);

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    fn key_auth(&self) -> Auth<'_> {
        Auth::Query {
            name: "key",
            value: Cow::Borrowed(self.api_key.as_str()),
        }
    }

    fn create_safety_settings() -> Vec<GeminiSafetySetting> {
        vec![
            GeminiSafetySetting {
                category: "HARM_CATEGORY_HARASSMENT".to_string(),
                threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
            },
            GeminiSafetySetting {
                category: "HARM_CATEGORY_HATE_SPEECH".to_string(),
                threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
            },
            GeminiSafetySetting {
                category: "HARM_CATEGORY_SEXUALLY_EXPLICIT".to_string(),
                threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
            },
            GeminiSafetySetting {
                category: "HARM_CATEGORY_DANGEROUS_CONTENT".to_string(),
                threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
            },
        ]
    }

    async fn generate_content(&self, parts: Vec<GeminiPart>) -> Result<LlmResponse> {
        let path = format!("v1beta/models/{}:generateContent", self.model);

        let request = GeminiRequest {
            contents: vec![GeminiContent { parts }],
            safety_settings: Some(Self::create_safety_settings()),
        };

        tracing::debug!(target: "llm.gemini", model = %self.model, "gemini.generate.start");

        let gemini_response: GeminiResponse = self
            .client
            .post_json(
                &path,
                &request,
                RequestOpts {
                    auth: Some(self.key_auth()),
                    ..Default::default()
                },
            )
            .await
            .map_err(gemini_error)?;

        let candidate = gemini_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| {
                LuminaError::Provider("No candidates returned from Gemini".to_string())
            })?;

        if let Some(finish_reason) = &candidate.finish_reason {
            if finish_reason == "SAFETY" {
                return Err(LuminaError::Provider(
                    "Content blocked by Gemini safety filters".to_string(),
                ));
            }
        }

        let text = candidate
            .content
            .parts
            .into_iter()
            .next()
            .map(|p| p.text)
            .ok_or_else(|| {
                LuminaError::Provider("No content parts in Gemini response".to_string())
            })?;

        Ok(LlmResponse {
            text,
            model: Some(self.model.clone()),
            tokens_used: gemini_response
                .usage_metadata
                .and_then(|u| u.total_token_count),
        })
    }

    /// Stage the video on disk and stream it to the Files API.
    ///
    /// The `NamedTempFile` handle stays in scope for the whole upload so the
    /// scratch file is unlinked whether we return success, an error, or a
    /// poll timeout.
    async fn upload_video(&self, mime_type: &str, video_bytes: &[u8]) -> Result<UploadedFile> {
        let mut staged = tempfile::NamedTempFile::new()
            .map_err(|e| LuminaError::Provider(format!("Failed to stage video: {}", e)))?;
        staged
            .write_all(video_bytes)
            .and_then(|_| staged.flush())
            .map_err(|e| LuminaError::Provider(format!("Failed to stage video: {}", e)))?;

        let file = tokio::fs::File::open(staged.path())
            .await
            .map_err(|e| LuminaError::Provider(format!("Failed to reopen staged video: {}", e)))?;
        let stream = FramedRead::new(file, BytesCodec::new());

        let mut headers = HeaderMap::new();
        headers.insert("x-goog-upload-protocol", HeaderValue::from_static("raw"));

        let uploaded: FileUploadResponse = self
            .client
            .post_bytes(
                "upload/v1beta/files",
                mime_type,
                reqwest::Body::wrap_stream(stream),
                RequestOpts {
                    auth: Some(self.key_auth()),
                    headers: Some(headers),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| LuminaError::Provider(format!("Video upload failed: {}", e)))?;

        tracing::info!(
            target: "llm.gemini",
            file = %uploaded.file.name,
            state = %uploaded.file.state,
            "gemini.upload.done"
        );

        // `staged` dropped here; the temp file is gone regardless of outcome.
        Ok(uploaded.file)
    }

    async fn poll_file(&self, name: &str) -> Result<UploadedFile> {
        let path = format!("v1beta/{}", name);
        self.client
            .get_json(
                &path,
                RequestOpts {
                    auth: Some(self.key_auth()),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| LuminaError::Provider(format!("File state poll failed: {}", e)))
    }

    /// Wait until the uploaded video leaves `PROCESSING`.
    ///
    /// Any terminal state other than `ACTIVE` is a hard failure; exceeding
    /// the ceiling is a timeout.
    async fn await_active(&self, mut file: UploadedFile) -> Result<UploadedFile> {
        let started = tokio::time::Instant::now();
        while file.state == "PROCESSING" {
            if started.elapsed() > VIDEO_POLL_CEILING {
                tracing::warn!(target: "llm.gemini", file = %file.name, "gemini.video.poll_timeout");
                return Err(LuminaError::Timeout);
            }
            tokio::time::sleep(VIDEO_POLL_INTERVAL).await;
            file = self.poll_file(&file.name).await?;
        }

        if file.state != "ACTIVE" {
            return Err(LuminaError::Provider(format!(
                "Video processing failed (state: {})",
                file.state
            )));
        }
        Ok(file)
    }
}

fn gemini_error(e: HttpError) -> LuminaError {
    match e {
        HttpError::Api { status, message } => match status.as_u16() {
            429 => LuminaError::Provider("Rate limit exceeded".to_string()),
            401 => LuminaError::Provider("Invalid API key".to_string()),
            403 => LuminaError::Provider("API access forbidden".to_string()),
            _ => LuminaError::Provider(format!("Gemini API error ({}): {}", status, message)),
        },
        other => LuminaError::Provider(format!("Gemini request failed: {}", other)),
    }
}

#[async_trait]
impl VisionClient for GeminiClient {
    async fn analyze_image(
        &self,
        prompt: &str,
        mime_type: &str,
        image_bytes: &[u8],
    ) -> Result<LlmResponse> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image_bytes);
        self.generate_content(vec![
            GeminiPart::text(prompt.to_string()),
            GeminiPart::inline(mime_type.to_string(), encoded),
        ])
        .await
    }

    async fn analyze_video(
        &self,
        prompt: &str,
        mime_type: &str,
        video_bytes: &[u8],
    ) -> Result<LlmResponse> {
        let uploaded = self.upload_video(mime_type, video_bytes).await?;
        let ready = self.await_active(uploaded).await?;

        self.generate_content(vec![
            GeminiPart::text(prompt.to_string()),
            GeminiPart::file(mime_type.to_string(), ready.uri),
        ])
        .await
    }
}
