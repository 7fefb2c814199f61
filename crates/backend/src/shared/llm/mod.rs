pub mod openai_provider;
pub mod product_analyzer;
pub mod types;

pub use types::{Completion, CompletionProvider, LlmError, Prompt};
