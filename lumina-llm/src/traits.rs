use async_trait::async_trait;
use lumina_common::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Text-completion seam. Every analysis handler talks to the chat model
/// through this trait so tests can substitute canned clients.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response to the given prompt with optional system prompt
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse>;

    /// Check if the LLM service is available
    async fn health_check(&self) -> Result<bool>;

    /// Get the model name being used
    fn model_name(&self) -> &str;
}

/// Vision-model seam: prompt plus media bytes.
///
/// Image analysis sends bytes inline; video analysis stages an upload with
/// the provider and waits for server-side processing before prompting, so
/// the two paths are separate operations rather than one with a flag.
#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn analyze_image(
        &self,
        prompt: &str,
        mime_type: &str,
        image_bytes: &[u8],
    ) -> Result<LlmResponse>;

    async fn analyze_video(
        &self,
        prompt: &str,
        mime_type: &str,
        video_bytes: &[u8],
    ) -> Result<LlmResponse>;
}

/// OCR seam: extract whatever text the provider can read from an image.
/// An unreadable image yields an empty string, not an error.
#[async_trait]
pub trait OcrClient: Send + Sync {
    async fn extract_text(&self, mime_type: &str, image_bytes: &[u8]) -> Result<String>;
}
