//! Optional per-bookmark summaries from a generative text model.

mod gemini;
mod prompt;

pub use gemini::GeminiSummarizer;
pub use prompt::build_prompt;

use crate::error::SummarizationError;
use crate::model::Bookmark;

/// Turns a bookmark into a short natural-language summary.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, bookmark: &Bookmark) -> Result<String, SummarizationError>;
}
