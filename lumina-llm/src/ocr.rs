use crate::traits::OcrClient;
use async_trait::async_trait;
use base64::Engine;
use lumina_common::{LuminaError, Result};
use lumina_http::{Auth, HttpClient, RequestOpts};
use serde::{Deserialize, Serialize};

const MISTRAL_API_BASE: &str = "https://api.mistral.ai/v1/";

#[derive(Debug, Serialize)]
struct OcrRequest {
    model: String,
    document: OcrDocument,
}

#[derive(Debug, Serialize)]
struct OcrDocument {
    #[serde(rename = "type")]
    kind: String,
    image_url: String,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(default)]
    pages: Vec<OcrPage>,
}

#[derive(Debug, Deserialize)]
struct OcrPage {
    #[serde(default)]
    markdown: String,
}

/// Mistral OCR client. Extracts visible text from images so the text can be
/// fact-checked alongside the visual analysis.
pub struct MistralOcrClient {
    client: HttpClient,
    api_key: String,
    model: String,
}

impl MistralOcrClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base(api_key, model, MISTRAL_API_BASE)
    }

    /// Point the client at an alternate endpoint (tests, gateways).
    pub fn with_base(api_key: String, model: String, base: &str) -> Result<Self> {
        let client = HttpClient::new(base)
            .map_err(|e| LuminaError::Provider(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl OcrClient for MistralOcrClient {
    /// Returns the extracted text, page markdown joined by blank lines.
    ///
    /// An image with no readable text yields an empty string, not an error.
    async fn extract_text(&self, mime_type: &str, image_bytes: &[u8]) -> Result<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image_bytes);
        let request = OcrRequest {
            model: self.model.clone(),
            document: OcrDocument {
                kind: "image_url".to_string(),
                image_url: format!("data:{};base64,{}", mime_type, encoded),
            },
        };

        tracing::debug!(target: "llm.ocr", model = %self.model, "ocr.extract.start");

        let opts = RequestOpts {
            auth: Some(Auth::Bearer(&self.api_key)),
            ..Default::default()
        };
        let response: OcrResponse = self
            .client
            .post_json("ocr", &request, opts)
            .await
            .map_err(|e| LuminaError::Provider(format!("Mistral OCR request failed: {}", e)))?;

        let text = response
            .pages
            .into_iter()
            .map(|p| p.markdown)
            .filter(|m| !m.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(text)
    }
}
