//! Response parsing for the Notion endpoints this tool calls.
//!
//! Error bodies are decoded with notion-client's `Error` type; success
//! bodies are decoded into the narrow shapes in `types.rs`.

use super::client::ApiResponse;
use super::properties::page_from_json;
use super::types::{CreatedPage, PaginatedResponse};
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionApiError, NotionErrorCode};
use crate::model::NotionPage;
use crate::types::PageId;
use notion_client::objects::error::Error as NotionError;
use reqwest::StatusCode;
use serde_json::Value;

/// Parse any Notion API response, turning non-2xx statuses into `NotionApiError`.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success(&result.data, &result.url)
    } else {
        Err(parse_error(&result.data, result.status, &result.url).into())
    }
}

fn parse_success<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse(format!("{} (body: {})", e, preview(body)))
    })
}

/// Builds the error for a non-2xx response.
pub fn parse_error(body: &str, status: StatusCode, url: &str) -> NotionApiError {
    if let Ok(notion_error) = serde_json::from_str::<NotionError>(body) {
        return NotionApiError {
            status: status.as_u16(),
            code: NotionErrorCode::from_api_response(&notion_error.code),
            message: notion_error.message,
            request_id: notion_error.request_id,
        };
    }

    NotionApiError {
        status: status.as_u16(),
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}: {}", status, url, preview(body)),
        request_id: None,
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

/// One page of a database query, with undecodable rows logged and dropped.
pub fn parse_query_response(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<NotionPage>, AppError> {
    let response: PaginatedResponse<Value> = parse_api_response(result)?;

    let pages = response
        .results
        .iter()
        .filter_map(|value| match page_from_json(value) {
            Ok(page) => Some(page),
            Err(e) => {
                log::warn!("Skipping undecodable page in query result: {}", e);
                None
            }
        })
        .collect();

    Ok(PaginatedResponse {
        object: response.object,
        results: pages,
        next_cursor: response.next_cursor,
        has_more: response.has_more,
    })
}

/// Extracts the id of a freshly created page.
pub fn parse_created_page(result: ApiResponse<String>) -> Result<PageId, AppError> {
    let created: CreatedPage = parse_api_response(result)?;
    Ok(PageId::parse(&created.id)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: StatusCode, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status,
            url: "https://api.notion.com/v1/pages".to_string(),
        }
    }

    #[test]
    fn test_error_parsing_with_notion_client() {
        let error_json = r#"{
            "object": "error",
            "status": 404,
            "code": "object_not_found",
            "message": "Could not find database with ID: abc123",
            "request_id": "req_123"
        }"#;

        let result = parse_created_page(response(StatusCode::NOT_FOUND, error_json));
        match result {
            Err(AppError::NotionApi(err)) => {
                assert_eq!(err.status, 404);
                assert_eq!(err.code, NotionErrorCode::ObjectNotFound);
                assert_eq!(err.request_id.as_deref(), Some("req_123"));
            }
            other => panic!("Expected NotionApi error, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_error_body_falls_back_to_status() {
        let result = parse_created_page(response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "<html>upstream exploded</html>",
        ));
        match result {
            Err(AppError::NotionApi(err)) => {
                assert_eq!(err.status, 500);
                assert_eq!(err.code, NotionErrorCode::InternalError);
                assert!(err.message.contains("upstream exploded"));
                assert!(err.is_retryable());
            }
            other => panic!("Expected NotionApi error, got {:?}", other),
        }
    }

    #[test]
    fn created_page_id_is_normalized() {
        let body = r#"{"object":"page","id":"550e8400-e29b-41d4-a716-446655440000"}"#;
        let id = parse_created_page(response(StatusCode::OK, body)).unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");
    }

    #[test]
    fn query_response_skips_bad_rows() {
        let body = r#"{
            "object": "list",
            "results": [
                {"object": "page", "id": "550e8400-e29b-41d4-a716-446655440000", "properties": {}},
                {"object": "page", "properties": {}}
            ],
            "next_cursor": "cursor-2",
            "has_more": true
        }"#;

        let page = parse_query_response(response(StatusCode::OK, body)).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.next_cursor.as_deref(), Some("cursor-2"));
        assert!(page.has_more);
    }

    #[test]
    fn malformed_success_body_is_reported() {
        let result = parse_created_page(response(StatusCode::OK, "not json"));
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }
}
