//! Reqwest-backed catalogue adapter for the public volumes API.
//!
//! Owns transport details only: query encoding, the request timeout, status
//! mapping and JSON decoding into domain volumes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{VolumeDto, VolumeListDto};
use crate::domain::VolumeId;
use crate::domain::ports::{CatalogPage, CatalogQuery, CatalogSource, CatalogSourceError, Volume};

/// Base URL of the hosted volumes API.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://www.googleapis.com/books/v1";

/// Catalogue source performing GET requests against the volumes API.
pub struct GoogleBooksCatalogSource {
    client: Client,
    base: Url,
    api_key: Option<String>,
}

impl GoogleBooksCatalogSource {
    /// Build an adapter using a reqwest client with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        timeout: Duration,
        api_key: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogSourceError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogSourceError::unavailable("catalogue base URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<(StatusCode, Vec<u8>), CatalogSourceError> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl CatalogSource for GoogleBooksCatalogSource {
    async fn search(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogSourceError> {
        let url = self.endpoint(&["volumes"])?;
        let params = [
            ("q", query.text().to_owned()),
            ("startIndex", query.start_index().to_string()),
            ("maxResults", query.max_results().to_string()),
        ];
        let (status, body) = self.fetch(url, &params).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_page(&body)
    }

    async fn volume(&self, id: &VolumeId) -> Result<Option<Volume>, CatalogSourceError> {
        let url = self.endpoint(&["volumes", id.as_str()])?;
        let (status, body) = self.fetch(url, &[]).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_volume(&body).map(Some)
    }
}

fn parse_page(body: &[u8]) -> Result<CatalogPage, CatalogSourceError> {
    let decoded: VolumeListDto = serde_json::from_slice(body).map_err(|error| {
        CatalogSourceError::decode(format!("invalid volume list payload: {error}"))
    })?;
    decoded.into_domain_page().map_err(CatalogSourceError::decode)
}

fn parse_volume(body: &[u8]) -> Result<Volume, CatalogSourceError> {
    let decoded: VolumeDto = serde_json::from_slice(body)
        .map_err(|error| CatalogSourceError::decode(format!("invalid volume payload: {error}")))?;
    decoded
        .into_domain_volume()
        .map_err(CatalogSourceError::decode)
}

fn map_transport_error(error: reqwest::Error) -> CatalogSourceError {
    if error.is_timeout() {
        CatalogSourceError::unavailable(format!("timed out: {error}"))
    } else {
        CatalogSourceError::unavailable(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CatalogSourceError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        status.canonical_reason().unwrap_or("no reason").to_owned()
    } else {
        preview
    };
    CatalogSourceError::upstream(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
