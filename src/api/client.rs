//! Pure HTTP client wrapper for Notion API.
//!
//! This module provides a thin wrapper around reqwest for making
//! HTTP requests to the Notion API. It handles authentication and
//! basic request/response operations without parsing or business logic.

use super::parser::{parse_api_response, parse_created_page, parse_query_response};
use super::properties::{create_page_body, update_page_body};
use crate::error::AppError;
use crate::model::{NotionPage, PageDraft};
use crate::types::{ApiKey, DatabaseId, PageId};
use reqwest::{header, Client, Response};
use serde::Serialize;

const NOTION_VERSION: &str = "2022-06-28";
const API_BASE_URL: &str = "https://api.notion.com/v1";

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self { client })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The API endpoint path (without base URL)
    /// * `body` - The request body to serialize as JSON
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = format!("{}/{}", API_BASE_URL, endpoint);
        log::debug!("POST {}", url);

        let response = self.client.post(url).json(body).send().await?;
        log::debug!("POST {} -> {}", endpoint, response.status());
        Ok(response)
    }

    /// Makes a PATCH request with JSON body to the specified endpoint.
    pub async fn patch<T: Serialize>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Response, AppError> {
        let url = format!("{}/{}", API_BASE_URL, endpoint);
        log::debug!("PATCH {}", url);

        let response = self.client.patch(url).json(body).send().await?;
        log::debug!("PATCH {} -> {}", endpoint, response.status());
        Ok(response)
    }
}

#[async_trait::async_trait]
impl super::NotionRepository for NotionHttpClient {
    async fn query_database(&self, database: &DatabaseId) -> Result<Vec<NotionPage>, AppError> {
        let endpoint = format!("databases/{}/query", database.to_dashed());
        let pagination_result = super::simple_pagination::fetch_all_pages_simple(
            |page_size, cursor| {
                let client = self.clone();
                let endpoint = endpoint.clone();
                async move {
                    let mut query = serde_json::json!({ "page_size": page_size });
                    if let Some(cursor) = cursor {
                        query["start_cursor"] = serde_json::json!(cursor);
                    }
                    let response = client.post(&endpoint, &query).await?;
                    let result = extract_response_text(response).await?;
                    parse_query_response(result)
                }
            },
            None,
        )
        .await?;

        log::debug!(
            "Fetched {} pages from database {}",
            pagination_result.total_fetched,
            database
        );
        Ok(pagination_result.items)
    }

    async fn create_page(
        &self,
        database: &DatabaseId,
        draft: &PageDraft,
    ) -> Result<PageId, AppError> {
        let body = create_page_body(database, draft);
        let response = self.post("pages", &body).await?;
        let result = extract_response_text(response).await?;
        parse_created_page(result)
    }

    async fn update_page(&self, page: &PageId, draft: &PageDraft) -> Result<(), AppError> {
        let endpoint = format!("pages/{}", page.to_dashed());
        let body = update_page_body(draft);
        let response = self.patch(&endpoint, &body).await?;
        let result = extract_response_text(response).await?;
        parse_api_response::<serde_json::Value>(result)?;
        Ok(())
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
///
/// # Arguments
///
/// * `response` - The HTTP response to extract text from
///
/// # Returns
///
/// An `ApiResponse<String>` containing the response text along with status and URL metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
