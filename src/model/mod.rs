mod bookmark;
mod page;

pub use bookmark::{normalize_annotation, normalize_text, Bookmark, BookmarkKind};
pub use page::{NotionPage, PageDraft, TrackedFields};
