//! Book cover lookup through the Google Books volumes API.

use crate::constants::{GOOGLE_BOOKS_API_URL, GOOGLE_BOOKS_COVER_URL};
use crate::error::AppError;
use crate::pipeline::CoverLookup;
use crate::types::ValidatedUrl;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    id: String,
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeInfo {
    #[serde(rename = "industryIdentifiers", default)]
    industry_identifiers: Vec<IndustryIdentifier>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

pub struct GoogleBooksCovers {
    client: Client,
}

impl GoogleBooksCovers {
    pub fn new() -> Result<Self, AppError> {
        Ok(Self {
            client: Client::builder().build()?,
        })
    }
}

#[async_trait::async_trait]
impl CoverLookup for GoogleBooksCovers {
    async fn find_cover(
        &self,
        title: &str,
        isbn: Option<&str>,
    ) -> Result<Option<ValidatedUrl>, AppError> {
        let response = self
            .client
            .get(GOOGLE_BOOKS_API_URL)
            .query(&[("q", title)])
            .send()
            .await?
            .error_for_status()?;
        let volumes: VolumesResponse = response.json().await?;

        let Some(volume_id) = pick_volume(&volumes, isbn) else {
            log::warn!("Could not find book data for '{}'", title);
            return Ok(None);
        };

        let url = format!("{}/{}?fife=w1200-h1200", GOOGLE_BOOKS_COVER_URL, volume_id);
        let cover = ValidatedUrl::parse(&url)?;
        let status = self.client.get(cover.as_str()).send().await?.status();
        Ok(served_cover(cover, status))
    }
}

/// Keeps the cover only if Google actually serves an image for it.
fn served_cover(cover: ValidatedUrl, status: StatusCode) -> Option<ValidatedUrl> {
    if status == StatusCode::OK {
        Some(cover)
    } else {
        log::debug!("Cover {} answered {}, leaving page without one", cover, status);
        None
    }
}

/// The volume whose ISBN-13 matches, else the first search hit.
fn pick_volume<'a>(volumes: &'a VolumesResponse, isbn: Option<&str>) -> Option<&'a str> {
    let by_isbn = isbn.and_then(|isbn| {
        volumes.items.iter().find(|volume| {
            volume
                .volume_info
                .industry_identifiers
                .iter()
                .any(|id| id.kind == "ISBN_13" && id.identifier == isbn)
        })
    });

    by_isbn
        .or_else(|| volumes.items.first())
        .map(|volume| volume.id.as_str())
}
