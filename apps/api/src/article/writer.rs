//! Article Writer — pluggable, trait-based source of article text and narration.
//!
//! Default: `LlmClient` (chat completion for the Markdown, speech for the MP3).
//! Tests swap in a canned writer.
//!
//! `AppState` holds an `Arc<dyn ArticleWriter>`.

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppError;
use crate::llm_client::prompts::{article_prompt, ARTICLE_SYSTEM};
use crate::llm_client::LlmClient;

/// Implement this to swap the text / speech backend without touching the
/// pipeline, handlers, or scheduler.
#[async_trait]
pub trait ArticleWriter: Send + Sync {
    /// Writes a Markdown article about `topic`.
    async fn write_article(&self, topic: &str) -> Result<String, AppError>;

    /// Reads `text` aloud, returning MP3 bytes.
    async fn narrate(&self, text: &str) -> Result<Bytes, AppError>;
}

#[async_trait]
impl ArticleWriter for LlmClient {
    async fn write_article(&self, topic: &str) -> Result<String, AppError> {
        self.call_text(&article_prompt(topic), ARTICLE_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(e.to_string()))
    }

    async fn narrate(&self, text: &str) -> Result<Bytes, AppError> {
        self.speak(text)
            .await
            .map_err(|e| AppError::Llm(e.to_string()))
    }
}
