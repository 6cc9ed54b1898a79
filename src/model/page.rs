use super::{Bookmark, BookmarkKind};
use crate::types::{BookmarkId, PageId, ValidatedUrl};
use chrono::{DateTime, Utc};

/// A page already stored in the target Notion database, reduced to the
/// properties this tool writes.
#[derive(Debug, Clone, PartialEq)]
pub struct NotionPage {
    pub page_id: PageId,
    /// `None` for pages that were not created by this tool.
    pub bookmark_id: Option<BookmarkId>,
    pub title: String,
    pub author: String,
    pub text: String,
    pub annotation: String,
    pub summary: String,
    pub chapter: String,
    pub last_edited_time: Option<DateTime<Utc>>,
}

/// The fields whose difference triggers an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFields<'a> {
    pub text: &'a str,
    pub annotation: &'a str,
    /// `None` when the summary is not being managed for this run.
    pub summary: Option<&'a str>,
}

impl NotionPage {
    pub fn tracked(&self, with_summary: bool) -> TrackedFields<'_> {
        TrackedFields {
            text: &self.text,
            annotation: &self.annotation,
            summary: with_summary.then_some(self.summary.as_str()),
        }
    }
}

/// Properties to write when creating or updating a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDraft {
    pub bookmark_id: BookmarkId,
    pub title: String,
    pub author: String,
    pub text: String,
    pub annotation: String,
    pub chapter: String,
    pub isbn: String,
    pub publisher: String,
    pub kind: BookmarkKind,
    pub created_at: Option<DateTime<Utc>>,
    /// `None` leaves the remote Summary property untouched.
    pub summary: Option<String>,
    /// Only applied on create.
    pub cover: Option<ValidatedUrl>,
}

impl PageDraft {
    pub fn from_bookmark(bookmark: &Bookmark, summary: Option<String>) -> Self {
        Self {
            bookmark_id: bookmark.id.clone(),
            title: bookmark.book_title.clone(),
            author: bookmark.author.clone(),
            text: bookmark.text.clone(),
            annotation: bookmark.annotation_str().to_string(),
            chapter: bookmark.chapter.clone(),
            isbn: bookmark.isbn.clone().unwrap_or_default(),
            publisher: bookmark.publisher.clone().unwrap_or_default(),
            kind: bookmark.kind.clone(),
            created_at: bookmark.created_at,
            summary,
            cover: None,
        }
    }

    pub fn with_cover(mut self, cover: Option<ValidatedUrl>) -> Self {
        self.cover = cover;
        self
    }

    pub fn tracked(&self) -> TrackedFields<'_> {
        TrackedFields {
            text: &self.text,
            annotation: &self.annotation,
            summary: self.summary.as_deref(),
        }
    }
}
