//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Longest string Notion accepts inside a single rich text object.
pub const NOTION_RICH_TEXT_MAX_CHARS: usize = 2000;

// ---------------------------------------------------------------------------
// Notion database layout
// ---------------------------------------------------------------------------

/// Title property, holding the book title.
pub const PROP_TITLE: &str = "Title";
pub const PROP_AUTHOR: &str = "Author";
pub const PROP_TEXT: &str = "Text";
pub const PROP_ANNOTATION: &str = "Annotation";
pub const PROP_SUMMARY: &str = "Summary";
pub const PROP_CHAPTER: &str = "Chapter";
pub const PROP_DATE: &str = "Date";
pub const PROP_ISBN: &str = "ISBN";
pub const PROP_PUBLISHER: &str = "Publisher";

/// Select property holding the Kobo bookmark type (highlight, note, dogear).
pub const PROP_TYPE: &str = "Type";

/// Rich text property carrying Kobo's `BookmarkID`, the sync key.
pub const PROP_BOOKMARK_ID: &str = "Bookmark ID";

// ---------------------------------------------------------------------------
// Retry boundaries
// ---------------------------------------------------------------------------

/// Attempts per Notion call, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubled after each failure.
pub const RETRY_INITIAL_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on the delay between two attempts.
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(8);

// ---------------------------------------------------------------------------
// Summarization
// ---------------------------------------------------------------------------

/// Gemini model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// ---------------------------------------------------------------------------
// Book covers
// ---------------------------------------------------------------------------

pub const GOOGLE_BOOKS_API_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Front cover image for a Google Books volume id.
pub const GOOGLE_BOOKS_COVER_URL: &str =
    "https://books.google.com/books/publisher/content/images/frontcover";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
