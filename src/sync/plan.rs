//! Pure reconciliation decisions: no I/O happens here.

use crate::model::{Bookmark, NotionPage, PageDraft};
use crate::types::{BookmarkId, PageId};
use indexmap::IndexMap;
use std::collections::HashMap;

/// The write, if any, needed to bring Notion in line with a bookmark.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncAction {
    Create(PageDraft),
    Update { page_id: PageId, draft: PageDraft },
    Skip,
}

/// Chooses between create, update and skip.
///
/// An existing page is only updated when a tracked field differs. The
/// summary is compared only when the draft manages it.
pub fn plan_action(existing: Option<&NotionPage>, draft: PageDraft) -> SyncAction {
    match existing {
        None => SyncAction::Create(draft),
        Some(page) if page.tracked(draft.summary.is_some()) == draft.tracked() => SyncAction::Skip,
        Some(page) => SyncAction::Update {
            page_id: page.page_id.clone(),
            draft,
        },
    }
}

/// Collapses rows sharing a bookmark id, keeping the most recently created.
///
/// On equal timestamps the later row wins. Survivors keep the position of
/// the first row with their id.
pub fn dedupe_bookmarks(bookmarks: Vec<Bookmark>) -> Vec<Bookmark> {
    let mut unique: IndexMap<BookmarkId, Bookmark> = IndexMap::with_capacity(bookmarks.len());

    for bookmark in bookmarks {
        match unique.get_mut(&bookmark.id) {
            Some(current) => {
                log::warn!("Duplicate bookmark id {} in Kobo database", bookmark.id);
                // None sorts before any timestamp
                if bookmark.created_at >= current.created_at {
                    *current = bookmark;
                }
            }
            None => {
                unique.insert(bookmark.id.clone(), bookmark);
            }
        }
    }

    unique.into_values().collect()
}

/// Maps bookmark ids to the pages that carry them.
///
/// Pages without a bookmark id are ignored. If Notion already holds two
/// pages for one id, the first returned is kept.
pub fn index_pages(pages: Vec<NotionPage>) -> HashMap<BookmarkId, NotionPage> {
    let mut index = HashMap::with_capacity(pages.len());

    for page in pages {
        let Some(bookmark_id) = page.bookmark_id.clone() else {
            continue;
        };
        if index.contains_key(&bookmark_id) {
            log::warn!(
                "Notion page {} duplicates bookmark {}; keeping the first page",
                page.page_id,
                bookmark_id
            );
            continue;
        }
        index.insert(bookmark_id, page);
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookmarkKind;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn bookmark(id: &str, text: &str, day: Option<u32>) -> Bookmark {
        Bookmark {
            id: BookmarkId::new(id).unwrap(),
            volume_id: "vol".to_string(),
            book_title: "Book".to_string(),
            author: "Author".to_string(),
            isbn: None,
            publisher: None,
            text: text.to_string(),
            annotation: None,
            chapter: String::new(),
            kind: BookmarkKind::Highlight,
            created_at: day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()),
        }
    }

    fn page(id: &str, bookmark_id: Option<&str>, text: &str, summary: &str) -> NotionPage {
        NotionPage {
            page_id: PageId::parse(id).unwrap(),
            bookmark_id: bookmark_id.map(|b| BookmarkId::new(b).unwrap()),
            title: "Book".to_string(),
            author: "Author".to_string(),
            text: text.to_string(),
            annotation: String::new(),
            summary: summary.to_string(),
            chapter: String::new(),
            last_edited_time: None,
        }
    }

    const PAGE_A: &str = "550e8400e29b41d4a716446655440000";
    const PAGE_B: &str = "650e8400e29b41d4a716446655440000";

    #[test]
    fn absent_page_is_created() {
        let draft = PageDraft::from_bookmark(&bookmark("a", "text", None), None);
        assert!(matches!(plan_action(None, draft), SyncAction::Create(_)));
    }

    #[test]
    fn identical_page_is_skipped() {
        let existing = page(PAGE_A, Some("a"), "text", "");
        let draft = PageDraft::from_bookmark(&bookmark("a", "text", None), None);
        assert_eq!(plan_action(Some(&existing), draft), SyncAction::Skip);
    }

    #[test]
    fn changed_text_is_updated() {
        let existing = page(PAGE_A, Some("a"), "old text", "");
        let draft = PageDraft::from_bookmark(&bookmark("a", "new text", None), None);
        match plan_action(Some(&existing), draft) {
            SyncAction::Update { page_id, draft } => {
                assert_eq!(page_id.as_str(), PAGE_A);
                assert_eq!(draft.text, "new text");
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn changed_annotation_is_updated() {
        let existing = page(PAGE_A, Some("a"), "text", "");
        let mut local = bookmark("a", "text", None);
        local.annotation = Some("new thought".to_string());
        let draft = PageDraft::from_bookmark(&local, None);
        assert!(matches!(
            plan_action(Some(&existing), draft),
            SyncAction::Update { .. }
        ));
    }

    #[test]
    fn unmanaged_summary_is_not_compared() {
        let existing = page(PAGE_A, Some("a"), "text", "an older summary");
        let draft = PageDraft::from_bookmark(&bookmark("a", "text", None), None);
        assert_eq!(plan_action(Some(&existing), draft), SyncAction::Skip);
    }

    #[test]
    fn managed_summary_difference_is_updated() {
        let existing = page(PAGE_A, Some("a"), "text", "");
        let draft = PageDraft::from_bookmark(
            &bookmark("a", "text", None),
            Some("a fresh summary".to_string()),
        );
        assert!(matches!(
            plan_action(Some(&existing), draft),
            SyncAction::Update { .. }
        ));
    }

    #[test]
    fn dedupe_keeps_most_recent_in_first_position() {
        let rows = vec![
            bookmark("a", "first", Some(1)),
            bookmark("b", "other", Some(2)),
            bookmark("a", "newest", Some(5)),
            bookmark("a", "older", Some(3)),
        ];
        let unique = dedupe_bookmarks(rows);
        let texts: Vec<&str> = unique.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["newest", "other"]);
    }

    #[test]
    fn dedupe_tie_goes_to_later_row() {
        let rows = vec![bookmark("a", "earlier row", Some(2)), bookmark("a", "later row", Some(2))];
        assert_eq!(dedupe_bookmarks(rows)[0].text, "later row");
    }

    #[test]
    fn dedupe_prefers_timestamped_rows() {
        let rows = vec![bookmark("a", "dated", Some(2)), bookmark("a", "undated", None)];
        assert_eq!(dedupe_bookmarks(rows)[0].text, "dated");
    }

    #[test]
    fn index_ignores_foreign_pages_and_keeps_first_duplicate() {
        let pages = vec![
            page(PAGE_A, Some("a"), "first", ""),
            page(PAGE_B, Some("a"), "second", ""),
            page(PAGE_B, None, "not ours", ""),
        ];
        let index = index_pages(pages);
        assert_eq!(index.len(), 1);
        assert_eq!(index["a"].page_id.as_str(), PAGE_A);
    }
}
