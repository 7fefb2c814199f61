use async_trait::async_trait;
use thiserror::Error;

/// Ошибки LLM провайдера
#[derive(Debug, Error)]
pub enum LlmError {
    /// Ключ не задан или отклонён провайдером
    #[error("AI authentication failed: {0}")]
    Auth(String),

    #[error("AI rate limit exceeded")]
    RateLimited,

    #[error("AI request failed: {0}")]
    Api(String),

    #[error("Invalid AI request: {0}")]
    InvalidRequest(String),

    /// Модель ответила, но не тем JSON, который ожидался
    #[error("Invalid AI response: {0}")]
    InvalidResponse(String),
}

/// Однократный запрос к модели: системная инструкция и текст пользователя
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Текст ответа модели
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub model: String,
    pub total_tokens: Option<u32>,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, LlmError>;

    fn provider_name(&self) -> &str;
}
