//! Notion API interaction: list, create and update pages of one database.
//!
//! This module keeps I/O, parsing and property mapping apart so the sync
//! engine only ever sees domain types.

pub mod client;
pub mod parser;
pub mod properties;
mod simple_pagination;
pub mod types;

use crate::error::AppError;
use crate::model::{NotionPage, PageDraft};
use crate::types::{DatabaseId, PageId};

/// The ability to read and write bookmark pages in a Notion database.
///
/// The sync engine depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// Every page in the database, following pagination to the end.
    async fn query_database(&self, database: &DatabaseId) -> Result<Vec<NotionPage>, AppError>;

    /// Creates a page and returns the id Notion assigned to it.
    async fn create_page(&self, database: &DatabaseId, draft: &PageDraft)
        -> Result<PageId, AppError>;

    async fn update_page(&self, page: &PageId, draft: &PageDraft) -> Result<(), AppError>;
}

pub use client::NotionHttpClient;
