use crate::types::BookmarkId;
use chrono::{DateTime, Utc};
use std::fmt;

/// What the reader did on the device to create the bookmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkKind {
    Highlight,
    /// A highlight with a typed annotation.
    Note,
    /// A dog-eared page; carries no text.
    Dogear,
    Other(String),
}

impl BookmarkKind {
    /// Maps Kobo's `Bookmark.Type` column.
    pub fn from_kobo(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("highlight") => Self::Highlight,
            Some("note") => Self::Note,
            Some("dogear") => Self::Dogear,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Other(String::new()),
        }
    }
}

impl fmt::Display for BookmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Highlight => f.write_str("highlight"),
            Self::Note => f.write_str("note"),
            Self::Dogear => f.write_str("dogear"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

/// A highlight or note read from the Kobo database.
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub volume_id: String,
    pub book_title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    /// Normalized highlighted text; empty for dog-ears.
    pub text: String,
    pub annotation: Option<String>,
    pub chapter: String,
    pub kind: BookmarkKind,
    pub created_at: Option<DateTime<Utc>>,
}

impl Bookmark {
    pub fn annotation_str(&self) -> &str {
        self.annotation.as_deref().unwrap_or("")
    }
}

/// Trims the highlight and folds line breaks into single spaces.
pub fn normalize_text(raw: Option<&str>) -> String {
    raw.map(|text| {
        text.split(&['\r', '\n'][..])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    })
    .unwrap_or_default()
}

/// Trims the annotation; blank annotations count as absent.
pub fn normalize_annotation(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|annotation| !annotation.is_empty())
        .map(str::to_string)
}
