use super::ValidationError;
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A Notion object id, typed by the kind of object it names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    uuid: Uuid,
    simple: String,
    _kind: PhantomData<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatabaseMarker;

pub type PageId = Id<PageMarker>;
pub type DatabaseId = Id<DatabaseMarker>;

impl<T> Id<T> {
    /// Accepts a bare id, with or without dashes, or a Notion share link.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_end_matches('/');
        let candidate = if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
            id_from_url(cleaned)
        } else {
            cleaned
        };

        let uuid = Uuid::parse_str(candidate).map_err(|e| {
            ValidationError::InvalidId(format!("Could not parse Notion ID from {}: {}", input, e))
        })?;

        Ok(Self {
            uuid,
            simple: uuid.as_simple().to_string(),
            _kind: PhantomData,
        })
    }

    /// The 32-character lowercase form.
    pub fn as_str(&self) -> &str {
        &self.simple
    }

    /// The hyphenated form used in API paths and request bodies.
    pub fn to_dashed(&self) -> String {
        self.uuid.as_hyphenated().to_string()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.simple)
    }
}

/// Last path segment of a share link, minus the `?v=` view query and any
/// `Title-` slug in front of the id.
fn id_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.trim_end_matches('/').rsplit('/').next().unwrap_or(path);
    match segment.rsplit_once('-') {
        Some((_, tail)) if tail.len() == 32 => tail,
        _ => segment,
    }
}
