//! Catalogue browsing service over a [`CatalogSource`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    CatalogLookup, CatalogPage, CatalogQuery, CatalogSource, CatalogSourceError, Volume,
};
use crate::domain::{Error, VolumeId};

fn map_source_error(error: CatalogSourceError) -> Error {
    match error {
        CatalogSourceError::Unavailable { message } => {
            Error::backend_unavailable(format!("catalogue unavailable: {message}"))
        }
        CatalogSourceError::Upstream { status, message } if status == 429 || status >= 500 => {
            Error::backend_unavailable(format!("catalogue returned {status}: {message}"))
        }
        CatalogSourceError::Upstream { status, message } => {
            Error::internal(format!("catalogue rejected request with {status}: {message}"))
        }
        CatalogSourceError::Decode { message } => {
            Error::internal(format!("catalogue response malformed: {message}"))
        }
    }
}

/// Catalogue service implementing [`CatalogLookup`].
#[derive(Clone)]
pub struct CatalogService<S> {
    source: Arc<S>,
}

impl<S> CatalogService<S> {
    /// Create a service over a catalogue source.
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S> CatalogLookup for CatalogService<S>
where
    S: CatalogSource,
{
    async fn search(&self, query: &CatalogQuery) -> Result<CatalogPage, Error> {
        self.source.search(query).await.map_err(map_source_error)
    }

    async fn volume(&self, id: &VolumeId) -> Result<Volume, Error> {
        self.source
            .volume(id)
            .await
            .map_err(map_source_error)?
            .ok_or_else(|| Error::record_not_found(format!("volume {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockCatalogSource;
    use crate::test_support::volume;
    use rstest::rstest;

    #[rstest]
    #[case(CatalogSourceError::unavailable("dns"), ErrorCode::BackendUnavailable)]
    #[case(CatalogSourceError::upstream(503_u16, "busy"), ErrorCode::BackendUnavailable)]
    #[case(CatalogSourceError::upstream(429_u16, "slow down"), ErrorCode::BackendUnavailable)]
    #[case(CatalogSourceError::upstream(400_u16, "bad query"), ErrorCode::InternalError)]
    #[case(CatalogSourceError::decode("eof"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn source_failures_are_mapped(
        #[case] failure: CatalogSourceError,
        #[case] expected: ErrorCode,
    ) {
        let mut source = MockCatalogSource::new();
        source.expect_search().return_once(move |_| Err(failure));
        let query = CatalogQuery::new("dune", 0, None).expect("query");

        let err = CatalogService::new(Arc::new(source))
            .search(&query)
            .await
            .expect_err("failure");

        assert_eq!(err.code(), expected);
    }

    #[tokio::test]
    async fn unknown_volume_is_not_found() {
        let mut source = MockCatalogSource::new();
        source.expect_volume().return_once(|_| Ok(None));

        let err = CatalogService::new(Arc::new(source))
            .volume(&volume("missing"))
            .await
            .expect_err("missing");

        assert_eq!(err.code(), ErrorCode::RecordNotFound);
    }
}
