//! kobo2notion library: syncs Kobo highlights into a Notion database.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `DataSourceError`, `NotionApiError`, `SummarizationError`
//! - **Configuration**: `SyncConfig`, `CommandLineInput`
//! - **Domain model**: `Bookmark`, `NotionPage`, `PageDraft`
//! - **Sources and sinks**: `KoboReader`, `NotionHttpClient`, `GeminiSummarizer`, `GoogleBooksCovers`
//! - **Sync**: `SyncEngine`, `SyncReport`

pub mod api;
pub mod config;
pub mod constants;
pub mod covers;
pub mod error;
pub mod error_recovery;
pub mod kobo;
pub mod model;
pub mod pipeline;
pub mod summarize;
pub mod sync;
pub mod types;

// --- Error Handling ---
pub use crate::error::{
    AppError, DataSourceError, NotionApiError, NotionErrorCode, SummarizationError,
};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, SummarizerConfig, SyncConfig};
pub use crate::error_recovery::RetryPolicy;

// --- Domain Model ---
pub use crate::model::{Bookmark, BookmarkKind, NotionPage, PageDraft};
pub use crate::types::{
    ApiKey, BookmarkId, DatabaseId, GeminiApiKey, PageId, SummaryLanguage, ValidatedUrl,
};

// --- Sources and Sinks ---
pub use crate::api::{NotionHttpClient, NotionRepository};
pub use crate::covers::GoogleBooksCovers;
pub use crate::kobo::KoboReader;
pub use crate::summarize::{GeminiSummarizer, Summarizer};

// --- Pipeline Traits ---
pub use crate::pipeline::{BookmarkSource, CoverLookup};

// --- Sync ---
pub use crate::sync::{SyncEngine, SyncFailure, SyncOutcome, SyncReport};
