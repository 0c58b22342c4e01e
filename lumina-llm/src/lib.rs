//! Provider clients for the language, vision, and OCR models.
//!
//! Each provider sits behind a trait seam ([`LlmClient`], [`VisionClient`],
//! [`OcrClient`]) so analysis code and tests never depend on a concrete
//! vendor. Model output that should carry a verdict goes through
//! [`parse::parse_verdict`], which returns a tagged result: parsed fields
//! or an explicit parse failure the caller renders as a degraded verdict.

pub mod gemini;
pub mod groq;
pub mod language;
pub mod ocr;
pub mod parse;
pub mod traits;

pub use gemini::GeminiClient;
pub use groq::GroqClient;
pub use ocr::MistralOcrClient;
pub use traits::{LlmClient, LlmError, LlmResponse, OcrClient, VisionClient};

/// Default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gemma2-9b-it";

/// Default vision model for image and video analysis.
pub const DEFAULT_VISION_MODEL: &str = "gemini-2.5-flash";

/// Default OCR model.
pub const DEFAULT_OCR_MODEL: &str = "mistral-ocr-latest";
