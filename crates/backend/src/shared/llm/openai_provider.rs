use super::types::{Completion, CompletionProvider, LlmError, Prompt};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

/// Провайдер для OpenAI-совместимых chat completions (Gemini через /v1beta/openai)
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base.trim_end_matches('/'));
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }

    fn messages(prompt: &Prompt) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(prompt.system.as_str())
            .build()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.user.as_str())
            .build()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?;
        Ok(vec![system.into(), user.into()])
    }
}

fn map_api_error(e: OpenAIError) -> LlmError {
    let text = e.to_string();
    if text.contains("401") || text.contains("403") || text.contains("API key") {
        LlmError::Auth(text)
    } else if text.contains("429") || text.to_lowercase().contains("rate limit") {
        LlmError::RateLimited
    } else {
        LlmError::Api(text)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, LlmError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(Self::messages(prompt)?)
            .build()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_api_error)?;

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::InvalidResponse("empty completion".into()))?;

        Ok(Completion {
            text,
            model: response.model,
            total_tokens: response.usage.map(|u| u.total_tokens),
        })
    }

    fn provider_name(&self) -> &str {
        "openai-compatible"
    }
}
