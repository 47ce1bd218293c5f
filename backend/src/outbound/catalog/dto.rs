//! DTOs for decoding volumes API responses.
//!
//! Responses decode into these transport shapes first and are mapped into
//! domain [`Volume`]s in one pass.

use serde::Deserialize;

use crate::domain::VolumeId;
use crate::domain::ports::{CatalogPage, Volume};

const UNTITLED: &str = "Untitled";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VolumeListDto {
    #[serde(default)]
    pub(super) total_items: u32,
    #[serde(default)]
    pub(super) items: Vec<VolumeDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VolumeDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) volume_info: VolumeInfoDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VolumeInfoDto {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    description: Option<String>,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifierDto>,
    page_count: Option<u32>,
    #[serde(default)]
    categories: Vec<String>,
    image_links: Option<ImageLinksDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct IndustryIdentifierDto {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ImageLinksDto {
    small_thumbnail: Option<String>,
    thumbnail: Option<String>,
}

impl VolumeListDto {
    pub(super) fn into_domain_page(self) -> Result<CatalogPage, String> {
        let items = self
            .items
            .into_iter()
            .map(VolumeDto::into_domain_volume)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CatalogPage {
            total_items: self.total_items,
            items,
        })
    }
}

impl VolumeDto {
    pub(super) fn into_domain_volume(self) -> Result<Volume, String> {
        let id = VolumeId::new(self.id.as_str())
            .map_err(|err| format!("volume id {:?} rejected: {err}", self.id))?;
        let info = self.volume_info;
        let isbn = |kind: &str| {
            info.industry_identifiers
                .iter()
                .find(|identifier| identifier.kind == kind)
                .map(|identifier| identifier.identifier.clone())
        };
        let isbn10 = isbn("ISBN_10");
        let isbn13 = isbn("ISBN_13");
        let thumbnail = info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail))
            .map(|uri| secure_uri(&uri));

        Ok(Volume {
            id,
            title: info
                .title
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| UNTITLED.to_owned()),
            authors: info.authors,
            publisher: info.publisher,
            published_date: info.published_date,
            description: info.description,
            categories: info.categories,
            page_count: info.page_count.filter(|pages| *pages > 0),
            thumbnail,
            isbn10,
            isbn13,
        })
    }
}

/// The volumes API still hands out `http://` thumbnail links.
fn secure_uri(uri: &str) -> String {
    uri.strip_prefix("http://")
        .map_or_else(|| uri.to_owned(), |rest| format!("https://{rest}"))
}
