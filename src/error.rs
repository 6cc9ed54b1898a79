//! Application error types with structured error handling.
//!
//! Setup failures (configuration, the local Kobo database) abort the run.
//! Notion and cover lookup failures are caught per bookmark by the sync
//! engine and recorded in the run report. Summarizer failures never leave
//! the engine; they only leave the summary empty.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// Each variant names exactly what the Notion API reported, so recovery
/// can match on the type instead of on strings like `"rate_limited"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded; back off and retry
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            500 => Self::InternalError,
            503 => Self::ServiceUnavailable,
            other => Self::HttpStatus(other),
        }
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError => true,
            Self::HttpStatus(status) => matches!(status, 502 | 504),
            _ => false,
        }
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// A non-2xx response from the Notion API.
#[derive(Error, Debug, Clone)]
#[error("Notion API error ({status}): {code} - {message}")]
pub struct NotionApiError {
    pub status: u16,
    pub code: NotionErrorCode,
    pub message: String,
    pub request_id: Option<String>,
}

impl NotionApiError {
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable() || matches!(self.status, 429 | 500 | 502 | 503 | 504)
    }
}

/// Failures reading the Kobo database. Always fatal for the run.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Kobo database not found at {}", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to open Kobo database {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to snapshot Kobo database: {reason}")]
    Snapshot { reason: String },

    #[error("Unexpected Kobo database schema: {reason}")]
    Schema { reason: String },

    #[error("Failed to query Kobo database: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Failures summarizing a bookmark. Never fatal: the summary is left out.
#[derive(Error, Debug)]
pub enum SummarizationError {
    #[error("Summarization rate limited by the provider")]
    RateLimited,

    #[error("Summarization request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Summarization API returned an error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed summarization response: {0}")]
    MalformedResponse(String),

    #[error("Summarization response contained no text")]
    EmptyResponse,
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),

    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error(transparent)]
    NotionApi(#[from] NotionApiError),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl AppError {
    /// Whether the failed operation may succeed if simply tried again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NotionApi(err) => err.is_retryable(),
            Self::NetworkFailure(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}
