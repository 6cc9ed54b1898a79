//! Reconciles Kobo bookmarks with the pages of one Notion database.
//!
//! A run lists the database once, then walks the bookmarks in order and
//! creates, updates or skips one page per bookmark. A failing bookmark is
//! recorded in the report and the run moves on; only a failure to list
//! the database aborts it.

mod plan;
mod report;

pub use plan::{dedupe_bookmarks, index_pages, plan_action, SyncAction};
pub use report::{SyncFailure, SyncOutcome, SyncReport};

use crate::api::NotionRepository;
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::{Bookmark, NotionPage, PageDraft};
use crate::pipeline::{BookmarkSource, CoverLookup};
use crate::summarize::Summarizer;
use crate::types::{DatabaseId, ValidatedUrl};
use std::collections::HashMap;
use std::sync::Arc;

/// Cover lookups already made this run, keyed by volume id.
type CoverCache = HashMap<String, Option<ValidatedUrl>>;

pub struct SyncEngine {
    notion: Arc<dyn NotionRepository>,
    database: DatabaseId,
    summarizer: Option<Arc<dyn Summarizer>>,
    covers: Option<Arc<dyn CoverLookup>>,
    retry: RetryPolicy,
}

impl SyncEngine {
    pub fn new(notion: Arc<dyn NotionRepository>, database: DatabaseId) -> Self {
        Self {
            notion,
            database,
            summarizer: None,
            covers: None,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_covers(mut self, covers: Arc<dyn CoverLookup>) -> Self {
        self.covers = Some(covers);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Reads every bookmark from `source` and syncs them.
    pub async fn sync_from<S>(&self, source: &S) -> Result<SyncReport, AppError>
    where
        S: BookmarkSource + ?Sized,
    {
        let bookmarks = source.bookmarks()?;
        self.run(bookmarks).await
    }

    /// Syncs `bookmarks` into the database.
    ///
    /// Returns an error only when the existing pages cannot be listed.
    pub async fn run(&self, bookmarks: Vec<Bookmark>) -> Result<SyncReport, AppError> {
        let existing = retry_with_backoff(
            || self.notion.query_database(&self.database),
            self.retry,
        )
        .await?;
        log::info!("Found {} existing pages in Notion", existing.len());

        let index = index_pages(existing);
        let bookmarks = dedupe_bookmarks(bookmarks);

        let mut covers = CoverCache::new();
        let mut report = SyncReport::default();

        for bookmark in &bookmarks {
            let existing = index.get(&bookmark.id);
            match self
                .sync_bookmark(bookmark, existing, &mut covers, &mut report)
                .await
            {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    log::error!(
                        "{} | Failed to sync bookmark {}: {}",
                        bookmark.book_title,
                        bookmark.id,
                        e
                    );
                    report.record_failure(bookmark, &e);
                }
            }
        }

        log::info!("{}", report);
        Ok(report)
    }

    async fn sync_bookmark(
        &self,
        bookmark: &Bookmark,
        existing: Option<&NotionPage>,
        covers: &mut CoverCache,
        report: &mut SyncReport,
    ) -> Result<SyncOutcome, AppError> {
        let summary = self.resolve_summary(bookmark, existing, report).await;
        let draft = PageDraft::from_bookmark(bookmark, summary);

        match plan_action(existing, draft) {
            SyncAction::Skip => {
                log::debug!(
                    "{} | Bookmark {} is up to date",
                    bookmark.book_title,
                    bookmark.id
                );
                Ok(SyncOutcome::Skipped)
            }
            SyncAction::Create(draft) => {
                let draft = draft.with_cover(self.cover_for(bookmark, covers).await);
                let page_id = retry_with_backoff(
                    || self.notion.create_page(&self.database, &draft),
                    self.retry,
                )
                .await?;
                log::info!(
                    "{} | Created page {} for bookmark {}",
                    bookmark.book_title,
                    page_id,
                    bookmark.id
                );
                Ok(SyncOutcome::Created)
            }
            SyncAction::Update { page_id, draft } => {
                retry_with_backoff(|| self.notion.update_page(&page_id, &draft), self.retry)
                    .await?;
                log::info!(
                    "{} | Updated page {} for bookmark {}",
                    bookmark.book_title,
                    page_id,
                    bookmark.id
                );
                Ok(SyncOutcome::Updated)
            }
        }
    }

    /// The summary to write, or `None` to leave the remote one alone.
    ///
    /// With summarizing off, new pages get an empty summary and existing
    /// pages keep theirs. With it on, a stored summary is reused while the
    /// text it describes is unchanged. Otherwise it is regenerated, and left
    /// empty when that fails so a later run fills it in.
    async fn resolve_summary(
        &self,
        bookmark: &Bookmark,
        existing: Option<&NotionPage>,
        report: &mut SyncReport,
    ) -> Option<String> {
        let Some(summarizer) = &self.summarizer else {
            return existing.is_none().then(String::new);
        };

        if let Some(page) = existing {
            if page.text == bookmark.text && !page.summary.is_empty() {
                return Some(page.summary.clone());
            }
        }

        if bookmark.text.is_empty() {
            return Some(String::new());
        }

        match summarizer.summarize(bookmark).await {
            Ok(summary) => {
                log::debug!("{} | Summarized bookmark {}", bookmark.book_title, bookmark.id);
                Some(summary)
            }
            Err(e) => {
                log::warn!(
                    "{} | Could not summarize bookmark {}: {}",
                    bookmark.book_title,
                    bookmark.id,
                    e
                );
                report.summaries_failed += 1;
                Some(String::new())
            }
        }
    }

    /// Looks up a cover once per book; failures leave the page without one.
    async fn cover_for(&self, bookmark: &Bookmark, cache: &mut CoverCache) -> Option<ValidatedUrl> {
        let covers = self.covers.as_ref()?;

        if let Some(cached) = cache.get(&bookmark.volume_id) {
            return cached.clone();
        }

        let cover = match covers
            .find_cover(&bookmark.book_title, bookmark.isbn.as_deref())
            .await
        {
            Ok(cover) => cover,
            Err(e) => {
                log::warn!("{} | Cover lookup failed: {}", bookmark.book_title, e);
                None
            }
        };

        cache.insert(bookmark.volume_id.clone(), cover.clone());
        cover
    }
}
