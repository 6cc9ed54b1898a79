use crate::error::AppError;
use crate::model::Bookmark;
use crate::types::BookmarkId;
use std::fmt;

/// What happened to a single bookmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    Updated,
    Skipped,
}

/// A bookmark that could not be written to Notion.
#[derive(Debug, Clone)]
pub struct SyncFailure {
    pub bookmark_id: BookmarkId,
    pub book_title: String,
    pub reason: String,
}

/// Tally of one sync run.
#[derive(Debug, Default, Clone)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Summaries that could not be generated; those items were still synced.
    pub summaries_failed: usize,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn record(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Created => self.created += 1,
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn record_failure(&mut self, bookmark: &Bookmark, error: &AppError) {
        self.failed += 1;
        self.failures.push(SyncFailure {
            bookmark_id: bookmark.id.clone(),
            book_title: bookmark.book_title.clone(),
            reason: error.to_string(),
        });
    }

    pub fn processed(&self) -> usize {
        self.created + self.updated + self.skipped + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Synced {} bookmarks: {} created, {} updated, {} skipped, {} failed",
            self.processed(),
            self.created,
            self.updated,
            self.skipped,
            self.failed
        )?;
        if self.summaries_failed > 0 {
            write!(f, " ({} without summary)", self.summaries_failed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_summarizes_counts() {
        let mut report = SyncReport::default();
        report.record(SyncOutcome::Created);
        report.record(SyncOutcome::Created);
        report.record(SyncOutcome::Skipped);
        assert_eq!(
            report.to_string(),
            "Synced 3 bookmarks: 2 created, 0 updated, 1 skipped, 0 failed"
        );
        assert!(!report.has_failures());

        report.summaries_failed = 1;
        assert!(report.to_string().ends_with("(1 without summary)"));
    }
}
