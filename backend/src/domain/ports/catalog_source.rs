//! Driven port for the public book catalogue.
//!
//! The domain owns the query and volume shapes so the HTTP adapter for the
//! volumes API stays replaceable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{BookPayload, VolumeId};

use super::define_port_error;

/// Default page size for catalogue searches.
pub const CATALOG_DEFAULT_RESULTS: u32 = 20;
/// Largest page size the catalogue accepts.
pub const CATALOG_MAX_RESULTS: u32 = 40;

/// Validation errors for [`CatalogQuery`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogQueryValidationError {
    /// The search text was blank.
    #[error("search text must not be empty")]
    EmptyText,
    /// The page size is outside `1..=CATALOG_MAX_RESULTS`.
    #[error("maxResults must be between 1 and {max}")]
    MaxResults {
        /// Largest accepted page size.
        max: u32,
    },
}

/// A catalogue search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    text: String,
    start_index: u32,
    max_results: u32,
}

impl CatalogQuery {
    /// Validate and build a query. `max_results` defaults to
    /// [`CATALOG_DEFAULT_RESULTS`].
    ///
    /// # Examples
    /// ```
    /// use readtrack::domain::ports::CatalogQuery;
    ///
    /// let query = CatalogQuery::new(" dune ", 0, None).unwrap();
    /// assert_eq!(query.text(), "dune");
    /// assert_eq!(query.max_results(), 20);
    /// assert!(CatalogQuery::new("dune", 0, Some(41)).is_err());
    /// ```
    pub fn new(
        text: &str,
        start_index: u32,
        max_results: Option<u32>,
    ) -> Result<Self, CatalogQueryValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CatalogQueryValidationError::EmptyText);
        }
        let max_results = max_results.unwrap_or(CATALOG_DEFAULT_RESULTS);
        if !(1..=CATALOG_MAX_RESULTS).contains(&max_results) {
            return Err(CatalogQueryValidationError::MaxResults {
                max: CATALOG_MAX_RESULTS,
            });
        }
        Ok(Self {
            text: text.to_owned(),
            start_index,
            max_results,
        })
    }

    /// Trimmed search text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Zero-based offset of the first result.
    pub fn start_index(&self) -> u32 {
        self.start_index
    }

    /// Page size.
    pub fn max_results(&self) -> u32 {
        self.max_results
    }
}

/// One catalogue volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Catalogue identifier.
    pub id: VolumeId,
    /// Title.
    pub title: String,
    /// Authors in catalogue order.
    pub authors: Vec<String>,
    /// Publisher.
    pub publisher: Option<String>,
    /// Publication date as reported by the catalogue.
    pub published_date: Option<String>,
    /// Blurb.
    pub description: Option<String>,
    /// Categories.
    pub categories: Vec<String>,
    /// Total pages.
    pub page_count: Option<u32>,
    /// Cover thumbnail over https.
    pub thumbnail: Option<String>,
    /// ISBN-10 identifier.
    pub isbn10: Option<String>,
    /// ISBN-13 identifier.
    pub isbn13: Option<String>,
}

impl From<&Volume> for BookPayload {
    fn from(volume: &Volume) -> Self {
        Self {
            title: volume.title.clone(),
            authors: volume.authors.clone(),
            thumbnail: volume.thumbnail.clone(),
            categories: volume.categories.clone(),
            page_count: volume.page_count,
            isbn10: volume.isbn10.clone(),
            isbn13: volume.isbn13.clone(),
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    /// Total matches reported by the catalogue.
    pub total_items: u32,
    /// Volumes on this page.
    pub items: Vec<Volume>,
}

define_port_error! {
    /// Errors surfaced while calling the catalogue.
    pub enum CatalogSourceError {
        /// Transport failed before a response arrived.
        Unavailable { message: String } =>
            "catalogue unavailable: {message}",
        /// The catalogue answered with a non-success status.
        Upstream { status: u16, message: String } =>
            "catalogue returned status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "catalogue response decode failed: {message}",
    }
}

/// Port for catalogue search and lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Run a search.
    async fn search(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogSourceError>;

    /// Look up one volume; `None` when the catalogue does not know it.
    async fn volume(&self, id: &VolumeId) -> Result<Option<Volume>, CatalogSourceError>;
}

/// Fixture catalogue with no volumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureCatalogSource;

#[async_trait]
impl CatalogSource for FixtureCatalogSource {
    async fn search(&self, _query: &CatalogQuery) -> Result<CatalogPage, CatalogSourceError> {
        Ok(CatalogPage::default())
    }

    async fn volume(&self, _id: &VolumeId) -> Result<Option<Volume>, CatalogSourceError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("   ", None, CatalogQueryValidationError::EmptyText)]
    #[case("dune", Some(0), CatalogQueryValidationError::MaxResults { max: CATALOG_MAX_RESULTS })]
    #[case("dune", Some(41), CatalogQueryValidationError::MaxResults { max: CATALOG_MAX_RESULTS })]
    fn query_rejects_invalid_input(
        #[case] text: &str,
        #[case] max_results: Option<u32>,
        #[case] expected: CatalogQueryValidationError,
    ) {
        assert_eq!(CatalogQuery::new(text, 0, max_results), Err(expected));
    }

    #[rstest]
    fn payload_copies_descriptive_fields() {
        let volume = Volume {
            id: VolumeId::new("zyTCAlFPjgYC").expect("volume id"),
            title: "The Google Story".to_owned(),
            authors: vec!["David A. Vise".to_owned()],
            publisher: None,
            published_date: Some("2005-11-15".to_owned()),
            description: None,
            categories: vec!["Business".to_owned()],
            page_count: Some(207),
            thumbnail: None,
            isbn10: Some("055380457X".to_owned()),
            isbn13: Some("9780553804577".to_owned()),
        };
        let payload = BookPayload::from(&volume);
        assert_eq!(payload.title, "The Google Story");
        assert_eq!(payload.page_count, Some(207));
        assert_eq!(payload.isbn13.as_deref(), Some("9780553804577"));
    }

    #[tokio::test]
    async fn fixture_source_is_empty() {
        let source = FixtureCatalogSource;
        let query = CatalogQuery::new("anything", 0, None).expect("query");
        let page = source.search(&query).await.expect("search");
        assert!(page.items.is_empty());
    }
}
