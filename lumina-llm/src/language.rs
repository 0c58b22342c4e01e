use crate::traits::LlmClient;

/// Detect the ISO 639-1 language code of `text`.
///
/// Falls back to "en" whenever the model is unavailable or answers with
/// anything that is not a bare two-letter code.
pub async fn detect_language(client: &dyn LlmClient, text: &str) -> String {
    let prompt = format!(
        "Identify the language of the following text. Respond with only the \
         two-letter ISO 639-1 language code (for example: en, es, fr, hi).\n\n\
         Text: {}",
        text
    );

    match client.generate(&prompt, None, Some(10), Some(0.0)).await {
        Ok(response) => {
            let code = response.text.trim().to_lowercase();
            if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
                code
            } else {
                tracing::debug!(target: "llm.language", raw = %code, "language.detect.unparseable");
                "en".to_string()
            }
        }
        Err(err) => {
            tracing::warn!(target: "llm.language", error = %err, "language.detect.failed");
            "en".to_string()
        }
    }
}

/// Translate `text` into `target_lang`.
///
/// Targeting "en" is a no-op on the assumption that analysis already runs
/// in English, and any provider failure returns the original text so the
/// pipeline never blocks on translation.
pub async fn translate_text(client: &dyn LlmClient, text: &str, target_lang: &str) -> String {
    if target_lang == "en" {
        return text.to_string();
    }

    let prompt = format!(
        "Translate the following text to the language with ISO 639-1 code \
         '{}'. Respond with only the translation, no commentary.\n\n{}",
        target_lang, text
    );

    match client.generate(&prompt, None, None, Some(0.1)).await {
        Ok(response) => {
            let translated = response.text.trim().to_string();
            if translated.is_empty() {
                text.to_string()
            } else {
                translated
            }
        }
        Err(err) => {
            tracing::warn!(
                target: "llm.language",
                target_lang,
                error = %err,
                "language.translate.failed"
            );
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{LlmError, LlmResponse};
    use async_trait::async_trait;
    use lumina_common::{LuminaError, Result};

    struct CannedLlm {
        reply: std::result::Result<String, ()>,
    }

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn generate(
            &self,
            _prompt: &str,
            _system_prompt: Option<&str>,
            _max_tokens: Option<u32>,
            _temperature: Option<f32>,
        ) -> Result<LlmResponse> {
            match &self.reply {
                Ok(text) => Ok(LlmResponse {
                    text: text.clone(),
                    model: None,
                    tokens_used: None,
                }),
                Err(()) => Err(LuminaError::Provider(
                    LlmError::Api("down".to_string()).to_string(),
                )),
            }
        }

        fn model_name(&self) -> &str {
            "canned"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn detect_accepts_bare_two_letter_code() {
        let llm = CannedLlm {
            reply: Ok(" ES\n".to_string()),
        };
        assert_eq!(detect_language(&llm, "hola mundo").await, "es");
    }

    #[tokio::test]
    async fn detect_falls_back_on_chatty_answer() {
        let llm = CannedLlm {
            reply: Ok("The language is Spanish (es).".to_string()),
        };
        assert_eq!(detect_language(&llm, "hola mundo").await, "en");
    }

    #[tokio::test]
    async fn detect_falls_back_on_provider_error() {
        let llm = CannedLlm { reply: Err(()) };
        assert_eq!(detect_language(&llm, "bonjour").await, "en");
    }

    #[tokio::test]
    async fn translate_is_noop_for_english() {
        let llm = CannedLlm { reply: Err(()) };
        assert_eq!(translate_text(&llm, "already english", "en").await, "already english");
    }

    #[tokio::test]
    async fn translate_returns_input_on_failure() {
        let llm = CannedLlm { reply: Err(()) };
        assert_eq!(translate_text(&llm, "hola mundo", "es").await, "hola mundo");
    }

    #[tokio::test]
    async fn translate_returns_model_output() {
        let llm = CannedLlm {
            reply: Ok("hello world".to_string()),
        };
        assert_eq!(translate_text(&llm, "hola mundo", "es").await, "hello world");
    }
}
