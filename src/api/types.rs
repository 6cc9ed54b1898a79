//! Wire-level shapes shared by the Notion client and its parsers.

use serde::Deserialize;

/// One page of a cursor-paginated Notion listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub object: String,
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Everything collected by following a cursor to its end.
#[derive(Debug)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub total_fetched: usize,
}

/// The part of a create-page response this tool needs.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPage {
    pub id: String,
}
