//! Shelf HTTP handlers.
//!
//! ```text
//! GET    /api/v1/shelf?status=READING
//! GET    /api/v1/shelf/{volumeId}
//! PUT    /api/v1/shelf/{volumeId}/status      {"status":"READ","book":{…}}
//! PATCH  /api/v1/shelf/{volumeId}             {"status":"READING","pageInReading":40}
//! POST   /api/v1/shelf/{volumeId}/reading-time {"seconds":600}
//! DELETE /api/v1/shelf/{volumeId}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{SetStatusRequest, ShelfOutcome, UpsertBookRequest};
use crate::domain::{BookPayload, ReadingStatus, ShelfChanges, UserBook, VolumeId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, StatusChangeSchema, UserBookSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_status, parse_volume_id,
};

const VOLUME_ID: FieldName = FieldName::new("volumeId");
const STATUS: FieldName = FieldName::new("status");

/// Book details sent when a volume is shelved for the first time.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDetails {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub page_count: Option<u32>,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
}

impl From<BookDetails> for BookPayload {
    fn from(value: BookDetails) -> Self {
        Self {
            title: value.title,
            authors: value.authors,
            thumbnail: value.thumbnail,
            categories: value.categories,
            page_count: value.page_count,
            isbn10: value.isbn10,
            isbn13: value.isbn13,
        }
    }
}

/// Body for `PUT /shelf/{volumeId}/status`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    /// `TO_READ`, `READING` or `READ`.
    pub status: Option<String>,
    /// Required when the volume is not on a shelf yet.
    pub book: Option<BookDetails>,
    /// Known page total; required to complete a book without one.
    pub page_count: Option<u32>,
}

/// Body for `PATCH /shelf/{volumeId}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShelfUpdateRequest {
    pub status: Option<String>,
    pub page_count: Option<u32>,
    /// Pages read; clamped to `0..=pageCount`.
    pub page_in_reading: Option<i64>,
    pub book: Option<BookDetails>,
}

/// Body for `POST /shelf/{volumeId}/reading-time`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadingTimeRequest {
    /// Seconds to add to the reading timer.
    pub seconds: Option<u64>,
}

/// Query for `GET /shelf`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShelfListParams {
    /// Shelf to list.
    pub status: Option<String>,
}

/// Response for a status toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    /// Status after the toggle.
    pub status: Option<ReadingStatus>,
    /// Stored record; absent when the book left the shelf.
    pub book: Option<UserBook>,
}

impl From<ShelfOutcome> for StatusChange {
    fn from(value: ShelfOutcome) -> Self {
        let status = value.status();
        let book = match value {
            ShelfOutcome::Removed => None,
            ShelfOutcome::Saved(book) => Some(book),
        };
        Self { status, book }
    }
}

fn volume_from_path(path: web::Path<String>) -> ApiResult<VolumeId> {
    parse_volume_id(&path.into_inner(), VOLUME_ID)
}

fn parse_optional_status(raw: Option<String>) -> ApiResult<Option<ReadingStatus>> {
    raw.map(|value| parse_status(&value, STATUS)).transpose()
}

fn parse_status_change(volume: VolumeId, body: StatusChangeRequest) -> ApiResult<SetStatusRequest> {
    let raw = body.status.ok_or_else(|| missing_field_error(STATUS))?;
    Ok(SetStatusRequest {
        volume,
        status: parse_status(&raw, STATUS)?,
        payload: body.book.map(BookPayload::from),
        page_count: body.page_count,
    })
}

fn parse_shelf_update(volume: VolumeId, body: ShelfUpdateRequest) -> ApiResult<UpsertBookRequest> {
    Ok(UpsertBookRequest {
        volume,
        changes: ShelfChanges {
            status: parse_optional_status(body.status)?,
            page_count: body.page_count,
            page_in_reading: body.page_in_reading,
            payload: body.book.map(BookPayload::from),
        },
    })
}

/// List one shelf, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/v1/shelf",
    params(ShelfListParams),
    responses(
        (status = 200, description = "Shelf contents", body = [UserBookSchema]),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["shelf"],
    operation_id = "listShelf"
)]
#[get("/shelf")]
pub async fn list_shelf(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ShelfListParams>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let raw = query.into_inner().status.ok_or_else(|| missing_field_error(STATUS))?;
    let status = parse_status(&raw, STATUS)?;
    let books = state.shelf_query.list_shelf(&caller, status).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, no-cache"))
        .json(books))
}

/// Fetch one shelved volume.
#[utoipa::path(
    get,
    path = "/api/v1/shelf/{volumeId}",
    params(("volumeId" = String, Path, description = "Catalogue volume id")),
    responses(
        (status = 200, description = "Shelf record", body = UserBookSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not on any shelf", body = ErrorSchema)
    ),
    tags = ["shelf"],
    operation_id = "getUserBook"
)]
#[get("/shelf/{volume_id}")]
pub async fn get_user_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserBook>> {
    let caller = session.caller()?;
    let volume = volume_from_path(path)?;
    Ok(web::Json(state.shelf_query.user_book(&caller, &volume).await?))
}

/// Toggle a status button.
///
/// Selecting the active status removes the book from the shelf; any other
/// status moves it there, creating the record from `book` when needed.
#[utoipa::path(
    put,
    path = "/api/v1/shelf/{volumeId}/status",
    params(("volumeId" = String, Path, description = "Catalogue volume id")),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Status after the toggle", body = StatusChangeSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 422, description = "Completing a book without a page count", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["shelf"],
    operation_id = "setShelfStatus"
)]
#[put("/shelf/{volume_id}/status")]
pub async fn set_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusChangeRequest>,
) -> ApiResult<web::Json<StatusChange>> {
    let caller = session.caller()?;
    let request = parse_status_change(volume_from_path(path)?, payload.into_inner())?;
    let outcome = state.shelf.set_exclusive_status(&caller, request).await?;
    Ok(web::Json(StatusChange::from(outcome)))
}

/// Update status and progress together.
#[utoipa::path(
    patch,
    path = "/api/v1/shelf/{volumeId}",
    params(("volumeId" = String, Path, description = "Catalogue volume id")),
    request_body = ShelfUpdateRequest,
    responses(
        (status = 200, description = "Stored record", body = UserBookSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 422, description = "Completing a book without a page count", body = ErrorSchema)
    ),
    tags = ["shelf"],
    operation_id = "updateUserBook"
)]
#[patch("/shelf/{volume_id}")]
pub async fn update_user_book(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ShelfUpdateRequest>,
) -> ApiResult<web::Json<UserBook>> {
    let caller = session.caller()?;
    let request = parse_shelf_update(volume_from_path(path)?, payload.into_inner())?;
    Ok(web::Json(state.shelf.upsert_status_book(&caller, request).await?))
}

/// Add time spent reading.
#[utoipa::path(
    post,
    path = "/api/v1/shelf/{volumeId}/reading-time",
    params(("volumeId" = String, Path, description = "Catalogue volume id")),
    request_body = ReadingTimeRequest,
    responses(
        (status = 200, description = "Stored record", body = UserBookSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not on any shelf", body = ErrorSchema)
    ),
    tags = ["shelf"],
    operation_id = "recordReadingTime"
)]
#[post("/shelf/{volume_id}/reading-time")]
pub async fn record_reading_time(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReadingTimeRequest>,
) -> ApiResult<web::Json<UserBook>> {
    let caller = session.caller()?;
    let volume = volume_from_path(path)?;
    let seconds = payload
        .into_inner()
        .seconds
        .ok_or_else(|| missing_field_error(FieldName::new("seconds")))?;
    Ok(web::Json(
        state
            .shelf
            .record_reading_time(&caller, &volume, seconds)
            .await?,
    ))
}

/// Remove a volume from every shelf. Succeeds when it was not shelved.
#[utoipa::path(
    delete,
    path = "/api/v1/shelf/{volumeId}",
    params(("volumeId" = String, Path, description = "Catalogue volume id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["shelf"],
    operation_id = "removeFromShelf"
)]
#[delete("/shelf/{volume_id}")]
pub async fn remove_from_shelf(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let volume = volume_from_path(path)?;
    state.shelf.remove_from_shelf(&caller, &volume).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "shelf_tests.rs"]
mod tests;
