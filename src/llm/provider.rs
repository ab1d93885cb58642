use async_trait::async_trait;

use crate::config::GenerationConfig;
use crate::types::AppResult;

/// Narrow seam in front of the generative-text service. The dispatcher only
/// ever needs "prompt in, text out", which keeps tests on a deterministic
/// fake and off the network.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> AppResult<GeneratedText>;
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GeneratedText {
    pub content: String,
    pub finish_reason: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
