//! Pipeline capability traits: abstract the stages around the sync engine.
//!
//! Each trait describes a single capability, so every stage can be tested
//! in isolation with an in-memory stand-in.

use crate::error::{AppError, DataSourceError};
use crate::model::Bookmark;
use crate::types::ValidatedUrl;

/// Produces the bookmarks to be synced.
pub trait BookmarkSource {
    fn bookmarks(&self) -> Result<Vec<Bookmark>, DataSourceError>;
}

impl BookmarkSource for Vec<Bookmark> {
    fn bookmarks(&self) -> Result<Vec<Bookmark>, DataSourceError> {
        Ok(self.clone())
    }
}

/// Finds a cover image for a book.
#[async_trait::async_trait]
pub trait CoverLookup: Send + Sync {
    async fn find_cover(
        &self,
        title: &str,
        isbn: Option<&str>,
    ) -> Result<Option<ValidatedUrl>, AppError>;
}
