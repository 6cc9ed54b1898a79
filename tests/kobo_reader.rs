//! Reading bookmarks from Kobo databases built on the fly.

use kobo2notion::{BookmarkKind, BookmarkSource, DataSourceError, KoboReader};
use pretty_assertions::assert_eq;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const KOBO_SCHEMA: &str = "
    CREATE TABLE content (
        ContentID TEXT NOT NULL PRIMARY KEY,
        ContentType TEXT,
        Title TEXT,
        Attribution TEXT,
        ISBN TEXT,
        Publisher TEXT
    );
    CREATE TABLE Bookmark (
        BookmarkID TEXT NOT NULL PRIMARY KEY,
        VolumeID TEXT NOT NULL,
        ContentID TEXT NOT NULL,
        Text TEXT,
        Annotation TEXT,
        DateCreated TEXT,
        Type TEXT
    );
";

const VOLUME: &str = "file:///mnt/onboard/Le Guin/The Dispossessed.kepub.epub";

fn kobo_database(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("KoboReader.sqlite");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(KOBO_SCHEMA).unwrap();

    conn.execute(
        "INSERT INTO content (ContentID, ContentType, Title, Attribution, ISBN, Publisher)
         VALUES (?1, '6', 'The Dispossessed', 'Ursula K. Le Guin', '9780060512750', 'Harper Voyager')",
        params![VOLUME],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO content (ContentID, ContentType, Title)
         VALUES (?1, '9', 'Chapter One')",
        params![format!("{}!OEBPS!ch01.xhtml-1", VOLUME)],
    )
    .unwrap();

    let rows: &[(&str, Option<&str>, Option<&str>, &str, &str)] = &[
        (
            "bm-2",
            Some("You cannot buy the revolution."),
            Some("  "),
            "2024-03-02T10:00:00.000",
            "highlight",
        ),
        (
            "bm-1",
            Some("There was a wall.\nIt did not look important."),
            Some("Opening line"),
            "2024-03-01T09:30:00Z",
            "note",
        ),
        ("bm-3", None, None, "not a date", "dogear"),
    ];
    for (id, text, annotation, created, kind) in rows {
        conn.execute(
            "INSERT INTO Bookmark (BookmarkID, VolumeID, ContentID, Text, Annotation, DateCreated, Type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id,
                VOLUME,
                format!("{}!OEBPS!ch01.xhtml", VOLUME),
                text,
                annotation,
                created,
                kind
            ],
        )
        .unwrap();
    }

    path
}

fn open_error(path: &Path) -> DataSourceError {
    match KoboReader::open(path) {
        Ok(_) => panic!("expected {} to be rejected", path.display()),
        Err(e) => e,
    }
}

#[test]
fn reads_bookmarks_with_book_and_chapter() {
    let dir = TempDir::new().unwrap();
    let path = kobo_database(&dir);

    let reader = KoboReader::open(&path).unwrap();
    let bookmarks = reader.read_bookmarks().unwrap();

    let ids: Vec<&str> = bookmarks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["bm-1", "bm-2", "bm-3"]);

    let first = &bookmarks[0];
    assert_eq!(first.book_title, "The Dispossessed");
    assert_eq!(first.author, "Ursula K. Le Guin");
    assert_eq!(first.isbn.as_deref(), Some("9780060512750"));
    assert_eq!(first.publisher.as_deref(), Some("Harper Voyager"));
    assert_eq!(first.chapter, "Chapter One");
    assert_eq!(first.text, "There was a wall. It did not look important.");
    assert_eq!(first.annotation.as_deref(), Some("Opening line"));
    assert_eq!(first.kind, BookmarkKind::Note);
    assert!(first.created_at.is_some());

    let blank_annotation = &bookmarks[1];
    assert_eq!(blank_annotation.annotation, None);
    assert_eq!(blank_annotation.kind, BookmarkKind::Highlight);
}

#[test]
fn null_text_and_bad_dates_are_kept() {
    let dir = TempDir::new().unwrap();
    let reader = KoboReader::open(kobo_database(&dir)).unwrap();

    let bookmarks = reader.bookmarks().unwrap();
    let dogear = bookmarks.iter().find(|b| b.id.as_str() == "bm-3").unwrap();

    assert_eq!(dogear.text, "");
    assert_eq!(dogear.created_at, None);
    assert_eq!(dogear.kind, BookmarkKind::Dogear);
}

#[test]
fn reading_twice_gives_the_same_bookmarks() {
    let dir = TempDir::new().unwrap();
    let reader = KoboReader::open(kobo_database(&dir)).unwrap();

    assert_eq!(reader.read_bookmarks().unwrap(), reader.read_bookmarks().unwrap());
}

#[test]
fn source_file_is_not_modified() {
    let dir = TempDir::new().unwrap();
    let path = kobo_database(&dir);
    let before = std::fs::read(&path).unwrap();

    let reader = KoboReader::open(&path).unwrap();
    reader.read_bookmarks().unwrap();
    drop(reader);

    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.sqlite");

    assert!(matches!(
        open_error(&path),
        DataSourceError::Missing { .. }
    ));
}

#[test]
fn database_without_bookmark_table_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("other.sqlite");
    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT);")
        .unwrap();

    match open_error(&path) {
        DataSourceError::Schema { reason } => assert!(reason.contains("Bookmark")),
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[test]
fn missing_column_is_named() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("old.sqlite");
    Connection::open(&path)
        .unwrap()
        .execute_batch(
            "CREATE TABLE content (ContentID TEXT, Title TEXT, Attribution TEXT, ISBN TEXT,
                                   Publisher TEXT);
             CREATE TABLE Bookmark (BookmarkID TEXT, VolumeID TEXT, ContentID TEXT, Text TEXT,
                                    DateCreated TEXT, Type TEXT);",
        )
        .unwrap();

    match open_error(&path) {
        DataSourceError::Schema { reason } => assert!(reason.contains("Annotation")),
        other => panic!("expected schema error, got {:?}", other),
    }
}
