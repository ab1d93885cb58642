//! Query dispatch
//!
//! Validates the question, derives the prompt context, and issues exactly one
//! request through the [`TextGenerator`] seam. Stateless: nothing is cached,
//! nothing is retried, and no conversation survives between calls.

use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::llm::TextGenerator;
use crate::normalize::NormalizedContent;
use crate::prompt::{context, templates};
use crate::types::{AppError, AppResult};

/// Informational reply for image uploads; no query is dispatched for them.
pub const IMAGE_ANALYSIS_UNAVAILABLE: &str =
    "Image uploads can be previewed, but asking questions about images is not supported yet.";

pub struct QueryDispatcher {
    generator: Arc<dyn TextGenerator>,
}

impl QueryDispatcher {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Answer `question` about previously normalized content. Returns the
    /// service's text verbatim.
    pub async fn answer(
        &self,
        content: &NormalizedContent,
        question: &str,
        config: &GenerationConfig,
    ) -> AppResult<String> {
        let question = validated_question(question)?;

        let context = match content {
            NormalizedContent::Table(table) => context::table_context(table),
            NormalizedContent::Text(text) => context::text_context(text),
            NormalizedContent::Image(_) => return Ok(IMAGE_ANALYSIS_UNAVAILABLE.to_string()),
            NormalizedContent::Unsupported => {
                return Err(AppError::Validation(
                    "upload has no queryable content".to_string(),
                ))
            }
        };

        let prompt = templates::assemble(Some(&context), question);
        let response = self.generator.generate(&prompt, config).await?;
        Ok(response.content)
    }

    /// Context-free dispatch for the direct search box.
    pub async fn search(&self, question: &str, config: &GenerationConfig) -> AppResult<String> {
        let question = validated_question(question)?;
        let prompt = templates::assemble(None, question);
        let response = self.generator.generate(&prompt, config).await?;
        Ok(response.content)
    }
}

fn validated_question(question: &str) -> AppResult<&str> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "Please enter a valid question.".to_string(),
        ));
    }
    Ok(trimmed)
}
