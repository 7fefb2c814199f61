use super::openai_provider::OpenAiCompatibleProvider;
use super::types::{CompletionProvider, LlmError, Prompt};
use crate::shared::config::AiConfig;
use contracts::shared::product_analysis::ProductSuggestion;
use std::sync::Arc;

const SYSTEM_PROMPT: &str =
    "You are an e-commerce catalog assistant for Brazilian marketplaces. Reply with JSON only.";

/// Автозаполнение карточки товара через LLM
pub struct ProductAnalyzer {
    provider: Arc<dyn CompletionProvider>,
}

impl ProductAnalyzer {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Анализатор поверх OpenAI-совместимого API из настроек.
    /// Пустой ключ даёт ошибку авторизации.
    pub fn from_config(config: &AiConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Auth("AI API key is not configured".into()));
        }
        let provider =
            OpenAiCompatibleProvider::new(&config.api_base, &config.api_key, &config.model);
        Ok(Self::new(Arc::new(provider)))
    }

    pub fn build_prompt(name: &str, image_url: &str) -> String {
        format!(
            "Analyze this product for a marketplace listing.\n\
             Product name: {name}\n\
             Product image: {image_url}\n\n\
             Return a JSON object with exactly these fields:\n\
             - \"description\": a persuasive product description in Portuguese, at most 500 characters\n\
             - \"category\": the most fitting marketplace category\n\
             - \"suggested_price\": a suggested price in BRL as a number\n"
        )
    }

    /// Ответ модели может быть обёрнут в ```json ... ```
    pub fn parse_suggestion(text: &str) -> Result<ProductSuggestion, LlmError> {
        let cleaned = text.replace("```json", "").replace("```", "");
        serde_json::from_str(cleaned.trim()).map_err(|e| {
            tracing::error!("Failed to parse AI suggestion: {}. Text: {}", e, text);
            LlmError::InvalidResponse(e.to_string())
        })
    }

    pub async fn analyze(
        &self,
        name: &str,
        image_url: &str,
    ) -> Result<ProductSuggestion, LlmError> {
        tracing::info!(
            "Analyzing product '{}' with {}",
            name,
            self.provider.provider_name()
        );
        let prompt = Prompt {
            system: SYSTEM_PROMPT.to_string(),
            user: Self::build_prompt(name, image_url),
        };
        let completion = self.provider.complete(&prompt).await?;
        if let Some(tokens) = completion.total_tokens {
            tracing::debug!("AI analysis used {} tokens ({})", tokens, completion.model);
        }
        Self::parse_suggestion(&completion.text)
    }
}
