//! Read-only access to a Kobo `KoboReader.sqlite` database.
//!
//! The device file is never queried directly: it is first copied into a
//! temporary snapshot through SQLite's online backup API, and all reads run
//! against that copy.

mod dates;

pub use dates::parse_kobo_timestamp;

use crate::error::DataSourceError;
use crate::model::{normalize_annotation, normalize_text, Bookmark, BookmarkKind};
use crate::pipeline::BookmarkSource;
use crate::types::BookmarkId;
use rusqlite::{backup::Backup, Connection, OpenFlags};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

const BOOKMARK_COLUMNS: &[&str] = &[
    "BookmarkID",
    "VolumeID",
    "ContentID",
    "Text",
    "Annotation",
    "DateCreated",
    "Type",
];

const CONTENT_COLUMNS: &[&str] = &["ContentID", "Title", "Attribution", "ISBN", "Publisher"];

const BOOKMARKS_QUERY: &str = "
    SELECT
        b.BookmarkID,
        b.VolumeID,
        b.Text,
        b.Annotation,
        b.DateCreated,
        b.Type,
        book.Title,
        book.Attribution,
        book.ISBN,
        book.Publisher,
        (
            SELECT chapter.Title
            FROM content AS chapter
            WHERE chapter.ContentID IN (b.ContentID, b.ContentID || '-1')
            LIMIT 1
        ) AS Chapter
    FROM Bookmark AS b
    LEFT JOIN content AS book ON book.ContentID = b.VolumeID
    ORDER BY b.VolumeID, b.DateCreated
";

/// Row as stored, before normalization.
struct RawBookmark {
    bookmark_id: Option<String>,
    volume_id: Option<String>,
    text: Option<String>,
    annotation: Option<String>,
    date_created: Option<String>,
    kind: Option<String>,
    title: Option<String>,
    author: Option<String>,
    isbn: Option<String>,
    publisher: Option<String>,
    chapter: Option<String>,
}

/// A snapshot of a Kobo database, validated against the expected schema.
pub struct KoboReader {
    source: PathBuf,
    conn: Connection,
    // Keeps the snapshot file alive as long as the connection
    _snapshot: NamedTempFile,
}

impl KoboReader {
    /// Snapshots the database at `path` and checks its schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DataSourceError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DataSourceError::Missing {
                path: path.to_path_buf(),
            });
        }

        let snapshot = snapshot_database(path)?;
        let conn = Connection::open_with_flags(
            snapshot.path(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| DataSourceError::Open {
            path: snapshot.path().to_path_buf(),
            source,
        })?;

        verify_schema(&conn)?;
        log::debug!(
            "Opened snapshot of {} at {}",
            path.display(),
            snapshot.path().display()
        );

        Ok(Self {
            source: path.to_path_buf(),
            conn,
            _snapshot: snapshot,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Reads every bookmark, ordered by book and creation time.
    pub fn read_bookmarks(&self) -> Result<Vec<Bookmark>, DataSourceError> {
        let mut stmt = self.conn.prepare(BOOKMARKS_QUERY)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RawBookmark {
                    bookmark_id: row.get(0)?,
                    volume_id: row.get(1)?,
                    text: row.get(2)?,
                    annotation: row.get(3)?,
                    date_created: row.get(4)?,
                    kind: row.get(5)?,
                    title: row.get(6)?,
                    author: row.get(7)?,
                    isbn: row.get(8)?,
                    publisher: row.get(9)?,
                    chapter: row.get(10)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut bookmarks = Vec::with_capacity(rows.len());
        for raw in rows {
            match into_bookmark(raw) {
                Some(bookmark) => bookmarks.push(bookmark),
                None => log::warn!("Skipping Kobo bookmark row without a BookmarkID"),
            }
        }

        log::info!(
            "Read {} bookmarks from {}",
            bookmarks.len(),
            self.source.display()
        );
        Ok(bookmarks)
    }
}

impl BookmarkSource for KoboReader {
    fn bookmarks(&self) -> Result<Vec<Bookmark>, DataSourceError> {
        self.read_bookmarks()
    }
}

fn into_bookmark(raw: RawBookmark) -> Option<Bookmark> {
    let id = BookmarkId::new(raw.bookmark_id.unwrap_or_default()).ok()?;
    let volume_id = raw.volume_id.unwrap_or_default();

    let book_title = raw
        .title
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| volume_id.clone());

    let created_at = raw.date_created.as_deref().and_then(|value| {
        let parsed = parse_kobo_timestamp(value);
        if parsed.is_none() {
            log::debug!("Unparseable DateCreated '{}' on bookmark {}", value, id);
        }
        parsed
    });

    Some(Bookmark {
        id,
        volume_id,
        book_title,
        author: raw.author.unwrap_or_default().trim().to_string(),
        isbn: non_blank(raw.isbn),
        publisher: non_blank(raw.publisher),
        text: normalize_text(raw.text.as_deref()),
        annotation: normalize_annotation(raw.annotation.as_deref()),
        chapter: raw.chapter.unwrap_or_default().trim().to_string(),
        kind: BookmarkKind::from_kobo(raw.kind.as_deref()),
        created_at,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Copies the device database into a temporary file.
fn snapshot_database(path: &Path) -> Result<NamedTempFile, DataSourceError> {
    let src = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| DataSourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = NamedTempFile::new().map_err(|e| DataSourceError::Snapshot {
        reason: format!("failed to create temporary file: {}", e),
    })?;
    let mut dst = Connection::open(tmp.path()).map_err(|e| DataSourceError::Snapshot {
        reason: format!("failed to open snapshot connection: {}", e),
    })?;

    {
        let backup = Backup::new(&src, &mut dst).map_err(|e| DataSourceError::Snapshot {
            reason: format!("failed to initialize backup: {}", e),
        })?;
        backup
            .run_to_completion(1000, Duration::from_millis(5), None)
            .map_err(|e| DataSourceError::Snapshot {
                reason: format!("backup did not complete: {}", e),
            })?;
    }

    drop(dst);
    drop(src);
    Ok(tmp)
}

fn verify_schema(conn: &Connection) -> Result<(), DataSourceError> {
    check_table(conn, "Bookmark", BOOKMARK_COLUMNS)?;
    check_table(conn, "content", CONTENT_COLUMNS)
}

fn check_table(conn: &Connection, table: &str, required: &[&str]) -> Result<(), DataSourceError> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;

    if columns.is_empty() {
        return Err(DataSourceError::Schema {
            reason: format!("table '{}' not found", table),
        });
    }

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !columns.contains(*column))
        .collect();

    if !missing.is_empty() {
        return Err(DataSourceError::Schema {
            reason: format!(
                "table '{}' is missing column(s): {}",
                table,
                missing.join(", ")
            ),
        });
    }

    Ok(())
}
