//! Translation between bookmark pages and Notion property JSON.
//!
//! Writing goes through `serde_json::json!`; reading works on the raw JSON
//! of a page so that unknown property types elsewhere in the user's
//! database never prevent a page from being matched.

use crate::constants::{
    NOTION_RICH_TEXT_MAX_CHARS, PROP_ANNOTATION, PROP_AUTHOR, PROP_BOOKMARK_ID, PROP_CHAPTER,
    PROP_DATE, PROP_ISBN, PROP_PUBLISHER, PROP_SUMMARY, PROP_TEXT, PROP_TITLE, PROP_TYPE,
};
use crate::error::AppError;
use crate::model::{BookmarkKind, NotionPage, PageDraft};
use crate::types::{BookmarkId, DatabaseId, PageId};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

/// Splits `content` into rich text objects within Notion's length limit.
///
/// Empty content becomes an empty array, which Notion stores as an empty
/// property.
pub fn rich_text(content: &str) -> Value {
    let chars: Vec<char> = content.chars().collect();
    let segments: Vec<Value> = chars
        .chunks(NOTION_RICH_TEXT_MAX_CHARS)
        .map(|chunk| {
            let segment: String = chunk.iter().collect();
            json!({ "type": "text", "text": { "content": segment } })
        })
        .collect();
    Value::Array(segments)
}

/// Select value for the bookmark type; cleared when Kobo recorded none.
fn kind_select(kind: &BookmarkKind) -> Value {
    let name = kind.to_string();
    if name.is_empty() {
        json!({ "select": null })
    } else {
        json!({ "select": { "name": name } })
    }
}

/// Property map for a create or update request.
pub fn draft_properties(draft: &PageDraft) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(PROP_TITLE.into(), json!({ "title": rich_text(&draft.title) }));
    properties.insert(
        PROP_AUTHOR.into(),
        json!({ "rich_text": rich_text(&draft.author) }),
    );
    properties.insert(PROP_TEXT.into(), json!({ "rich_text": rich_text(&draft.text) }));
    properties.insert(
        PROP_ANNOTATION.into(),
        json!({ "rich_text": rich_text(&draft.annotation) }),
    );
    properties.insert(
        PROP_CHAPTER.into(),
        json!({ "rich_text": rich_text(&draft.chapter) }),
    );
    properties.insert(PROP_ISBN.into(), json!({ "rich_text": rich_text(&draft.isbn) }));
    properties.insert(
        PROP_PUBLISHER.into(),
        json!({ "rich_text": rich_text(&draft.publisher) }),
    );
    properties.insert(PROP_TYPE.into(), kind_select(&draft.kind));
    properties.insert(
        PROP_BOOKMARK_ID.into(),
        json!({ "rich_text": rich_text(draft.bookmark_id.as_str()) }),
    );

    if let Some(summary) = &draft.summary {
        properties.insert(
            PROP_SUMMARY.into(),
            json!({ "rich_text": rich_text(summary) }),
        );
    }

    if let Some(created_at) = draft.created_at {
        properties.insert(
            PROP_DATE.into(),
            json!({ "date": { "start": created_at.to_rfc3339_opts(SecondsFormat::Secs, true) } }),
        );
    }

    properties
}

/// Request body for `POST /pages`.
pub fn create_page_body(database: &DatabaseId, draft: &PageDraft) -> Value {
    let mut body = json!({
        "parent": { "database_id": database.to_dashed() },
        "properties": draft_properties(draft),
    });

    if let Some(cover) = &draft.cover {
        let file = json!({ "type": "external", "external": { "url": cover.as_str() } });
        body["cover"] = file.clone();
        body["icon"] = file;
    }

    body
}

/// Request body for `PATCH /pages/{id}`.
pub fn update_page_body(draft: &PageDraft) -> Value {
    json!({ "properties": draft_properties(draft) })
}

/// Concatenated plain text of a title or rich text property.
fn property_plain_text(properties: &Map<String, Value>, name: &str) -> String {
    let Some(property) = properties.get(name) else {
        return String::new();
    };

    let items = property
        .get("rich_text")
        .or_else(|| property.get("title"))
        .and_then(Value::as_array);

    items
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    item.get("plain_text")
                        .and_then(Value::as_str)
                        .or_else(|| item.pointer("/text/content").and_then(Value::as_str))
                })
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Reads one page object from a database query result.
pub fn page_from_json(value: &Value) -> Result<NotionPage, AppError> {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::MalformedResponse("page without 'id'".to_string()))?;
    let page_id = PageId::parse(id)?;

    let empty = Map::new();
    let properties = value
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let bookmark_id = BookmarkId::new(property_plain_text(properties, PROP_BOOKMARK_ID)).ok();

    let last_edited_time = value
        .get("last_edited_time")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|time| time.with_timezone(&Utc));

    Ok(NotionPage {
        page_id,
        bookmark_id,
        title: property_plain_text(properties, PROP_TITLE),
        author: property_plain_text(properties, PROP_AUTHOR),
        text: property_plain_text(properties, PROP_TEXT),
        annotation: property_plain_text(properties, PROP_ANNOTATION),
        summary: property_plain_text(properties, PROP_SUMMARY),
        chapter: property_plain_text(properties, PROP_CHAPTER),
        last_edited_time,
    })
}
