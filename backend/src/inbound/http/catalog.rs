//! Catalogue HTTP handlers.
//!
//! ```text
//! GET /api/v1/catalog/volumes?q=dune&startIndex=0&maxResults=20
//! GET /api/v1/catalog/volumes/{volumeId}
//! ```
//!
//! The catalogue is public: these handlers do not read the session.

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::Error;
use crate::domain::ports::{CatalogQuery, CatalogQueryValidationError, Volume};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{CatalogPageSchema, ErrorSchema, VolumeSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_volume_id};

/// Query for `GET /catalog/volumes`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VolumeSearchParams {
    /// Search text.
    pub q: Option<String>,
    /// Zero-based offset of the first result.
    pub start_index: Option<u32>,
    /// Page size, 1 to 40; defaults to 20.
    pub max_results: Option<u32>,
}

fn map_query_error(err: CatalogQueryValidationError) -> Error {
    let field = match err {
        CatalogQueryValidationError::EmptyText => "q",
        CatalogQueryValidationError::MaxResults { .. } => "maxResults",
    };
    Error::invalid_input(err.to_string())
        .with_details(json!({ "field": field, "code": "invalid_value" }))
}

/// Search the public catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/catalog/volumes",
    params(VolumeSearchParams),
    responses(
        (status = 200, description = "Search results", body = CatalogPageSchema),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 503, description = "Catalogue unavailable", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "searchVolumes",
    security([])
)]
#[get("/catalog/volumes")]
pub async fn search_volumes(
    state: web::Data<HttpState>,
    query: web::Query<VolumeSearchParams>,
) -> ApiResult<HttpResponse> {
    let VolumeSearchParams {
        q,
        start_index,
        max_results,
    } = query.into_inner();
    let query = CatalogQuery::new(
        q.as_deref().unwrap_or_default(),
        start_index.unwrap_or_default(),
        max_results,
    )
    .map_err(map_query_error)?;
    let page = state.catalog.search(&query).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "public, max-age=300"))
        .json(page))
}

/// Look up one volume.
#[utoipa::path(
    get,
    path = "/api/v1/catalog/volumes/{volumeId}",
    params(("volumeId" = String, Path, description = "Catalogue volume id")),
    responses(
        (status = 200, description = "Volume", body = VolumeSchema),
        (status = 400, description = "Invalid volume id", body = ErrorSchema),
        (status = 404, description = "Unknown volume", body = ErrorSchema),
        (status = 503, description = "Catalogue unavailable", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "getVolume",
    security([])
)]
#[get("/catalog/volumes/{volume_id}")]
pub async fn get_volume(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Volume>> {
    let id = parse_volume_id(&path.into_inner(), FieldName::new("volumeId"))?;
    Ok(web::Json(state.catalog.volume(&id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::ports::{CatalogPage, MockCatalogLookup};
    use crate::inbound::http::test_utils::api_app;
    use crate::test_support::{InMemoryBackend, volume};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    fn dune() -> Volume {
        Volume {
            id: volume("abc123"),
            title: "Dune".to_owned(),
            authors: vec!["Frank Herbert".to_owned()],
            publisher: None,
            published_date: Some("1965".to_owned()),
            description: None,
            categories: vec!["Fiction".to_owned()],
            page_count: Some(412),
            thumbnail: None,
            isbn10: None,
            isbn13: Some("9780441013593".to_owned()),
        }
    }

    #[actix_web::test]
    async fn search_passes_paging_to_catalogue() {
        let mut lookup = MockCatalogLookup::new();
        lookup
            .expect_search()
            .withf(|query| {
                query.text() == "dune" && query.start_index() == 10 && query.max_results() == 5
            })
            .times(1)
            .return_once(|_| {
                Ok(CatalogPage {
                    total_items: 1,
                    items: vec![dune()],
                })
            });
        let mut state = InMemoryBackend::new().http_state();
        state.catalog = Arc::new(lookup);
        let app = actix_test::init_service(api_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/catalog/volumes?q=dune&startIndex=10&maxResults=5")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("totalItems").and_then(Value::as_u64), Some(1));
        assert_eq!(
            body.pointer("/items/0/pageCount").and_then(Value::as_u64),
            Some(412)
        );
    }

    #[rstest]
    #[case("/api/v1/catalog/volumes", "q")]
    #[case("/api/v1/catalog/volumes?q=dune&maxResults=41", "maxResults")]
    #[actix_web::test]
    async fn invalid_search_names_field(#[case] uri: &str, #[case] field: &str) {
        let app = actix_test::init_service(api_app(InMemoryBackend::new().http_state())).await;

        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.pointer("/details/field").and_then(Value::as_str), Some(field));
    }

    #[actix_web::test]
    async fn unknown_volume_is_not_found() {
        let app = actix_test::init_service(api_app(InMemoryBackend::new().http_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/catalog/volumes/abc123")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
