//! Gemini `generateContent` client.

use super::prompt::build_prompt;
use super::Summarizer;
use crate::config::SummarizerConfig;
use crate::constants::GEMINI_API_BASE_URL;
use crate::error::{AppError, SummarizationError};
use crate::model::Bookmark;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Summarizes bookmarks through Google's generative language API.
pub struct GeminiSummarizer {
    client: Client,
    config: SummarizerConfig,
}

impl GeminiSummarizer {
    pub fn new(config: &SummarizerConfig) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            header::HeaderValue::from_str(config.api_key.as_str()).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid GEMINI_API_KEY format: {}", e))
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder().default_headers(headers).build()?;
        log::info!(
            "Summarizing bookmarks with {} ({})",
            config.model,
            config.language
        );

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            GEMINI_API_BASE_URL, self.config.model
        )
    }
}

#[async_trait::async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, bookmark: &Bookmark) -> Result<String, SummarizationError> {
        let prompt = build_prompt(bookmark, self.config.language);
        let body = json!({ "contents": [ { "parts": [ { "text": prompt } ] } ] });

        let response = self.client.post(self.endpoint()).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        parse_generate_response(status, &text)
    }
}

/// Extracts the summary text from a `generateContent` response.
fn parse_generate_response(status: StatusCode, body: &str) -> Result<String, SummarizationError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SummarizationError::RateLimited);
    }

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| format!("HTTP {}", status));
        return Err(SummarizationError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| SummarizationError::MalformedResponse(e.to_string()))?;

    let summary: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    let summary = summary.trim();
    if summary.is_empty() {
        return Err(SummarizationError::EmptyResponse);
    }
    Ok(summary.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_candidate_parts() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "A house "}, {"text": "of endless halls.\n"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        assert_eq!(
            parse_generate_response(StatusCode::OK, body).unwrap(),
            "A house of endless halls."
        );
    }

    #[test]
    fn rate_limit_is_distinguished() {
        let result = parse_generate_response(StatusCode::TOO_MANY_REQUESTS, "{}");
        assert!(matches!(result, Err(SummarizationError::RateLimited)));
    }

    #[test]
    fn api_error_message_is_extracted() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        match parse_generate_response(StatusCode::BAD_REQUEST, body) {
            Err(SummarizationError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert!(matches!(
            parse_generate_response(StatusCode::OK, body),
            Err(SummarizationError::EmptyResponse)
        ));
    }

    #[test]
    fn garbage_body_is_malformed() {
        assert!(matches!(
            parse_generate_response(StatusCode::OK, "<html>"),
            Err(SummarizationError::MalformedResponse(_))
        ));
    }
}
