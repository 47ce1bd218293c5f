//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their wire shape (camelCase JSON) and are registered
//! with utoipa under the domain type's path.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// No session, or the session expired.
    #[schema(rename = "not_authenticated")]
    NotAuthenticated,
    /// Acting on another user's resource.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The record does not exist.
    #[schema(rename = "record_not_found")]
    RecordNotFound,
    /// Malformed identifier, blank field or out-of-range value.
    #[schema(rename = "invalid_input")]
    InvalidInput,
    /// A book was completed without a known page total.
    #[schema(rename = "missing_page_count")]
    MissingPageCount,
    /// Duplicate, taken or already resolved.
    #[schema(rename = "conflict")]
    Conflict,
    /// One side of a friendship write failed; `details.failedUid` names it.
    #[schema(rename = "partial_reciprocal_failure")]
    PartialReciprocalFailure,
    /// A store or the catalogue is unreachable.
    #[schema(rename = "backend_unavailable")]
    BackendUnavailable,
    /// Unexpected server failure.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_input")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "volumeId is not a valid volume id")]
    message: String,
    /// Correlation identifier, also sent as the `Trace-Id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as `field` or `failedUid`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ReadingStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ReadingStatus)]
pub enum ReadingStatusSchema {
    /// Wish list.
    #[schema(rename = "TO_READ")]
    ToRead,
    /// Currently reading.
    #[schema(rename = "READING")]
    Reading,
    /// Finished.
    #[schema(rename = "READ")]
    Read,
}

/// OpenAPI schema for [`crate::domain::UserBook`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserBook, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserBookSchema {
    /// Catalogue volume identifier.
    #[schema(example = "abc123")]
    id: String,
    title: String,
    authors: Vec<String>,
    thumbnail: Option<String>,
    categories: Vec<String>,
    /// Total pages.
    #[schema(example = 250)]
    page_count: Option<u32>,
    /// Pages read; never above `pageCount`.
    page_in_reading: Option<u32>,
    status: ReadingStatusSchema,
    total_read_seconds: Option<u64>,
    isbn10: Option<String>,
    isbn13: Option<String>,
    #[schema(format = DateTime)]
    updated_at: String,
}

/// Result of a status toggle.
#[derive(ToSchema)]
#[schema(as = crate::inbound::http::shelf::StatusChange, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct StatusChangeSchema {
    /// Status after the toggle; absent once the book left the shelf.
    status: Option<ReadingStatusSchema>,
    /// Stored record, absent once the book left the shelf.
    book: Option<UserBookSchema>,
}

/// OpenAPI schema for [`crate::domain::Profile`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Profile, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ProfileSchema {
    #[schema(example = "u1")]
    uid: String,
    name: String,
    surname: String,
    /// Lowercase handle, once registered.
    #[schema(example = "bookworm")]
    username: Option<String>,
    email: String,
    /// Uids of accepted friends.
    friends: Vec<String>,
}

/// OpenAPI schema for [`crate::domain::Friend`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Friend, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct FriendSchema {
    uid: String,
    name: String,
    surname: String,
    username: Option<String>,
    email: String,
}

/// OpenAPI schema for [`crate::domain::RelationshipStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RelationshipStatus)]
pub enum RelationshipStatusSchema {
    /// Already friends.
    #[schema(rename = "IS_FRIEND")]
    IsFriend,
    /// The caller has a pending request to them.
    #[schema(rename = "PENDING")]
    Pending,
    /// Neither.
    #[schema(rename = "NOT_FRIEND")]
    NotFriend,
}

/// OpenAPI schema for [`crate::domain::ports::UserSearchHit`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::UserSearchHit, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserSearchHitSchema {
    uid: String,
    name: String,
    surname: String,
    username: Option<String>,
    email: String,
    relationship: RelationshipStatusSchema,
}

/// OpenAPI schema for [`crate::domain::FriendRequestStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FriendRequestStatus)]
pub enum FriendRequestStatusSchema {
    #[schema(rename = "pending")]
    Pending,
    #[schema(rename = "accepted")]
    Accepted,
    #[schema(rename = "rejected")]
    Rejected,
}

/// OpenAPI schema for [`crate::domain::FriendRequest`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FriendRequest, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct FriendRequestSchema {
    #[schema(format = Uuid)]
    id: String,
    from_uid: String,
    to_uid: String,
    status: FriendRequestStatusSchema,
    #[schema(format = DateTime)]
    created_at: String,
    message: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ports::Volume`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::Volume, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct VolumeSchema {
    id: String,
    title: String,
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    description: Option<String>,
    categories: Vec<String>,
    page_count: Option<u32>,
    /// Cover thumbnail, always https.
    thumbnail: Option<String>,
    isbn10: Option<String>,
    isbn13: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ports::CatalogPage`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::CatalogPage, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct CatalogPageSchema {
    total_items: u32,
    items: Vec<VolumeSchema>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn error_schema_uses_wire_names() {
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let json = schema_to_json::<ErrorSchema>();
        assert!(json.contains("traceId"), "camelCase field expected: {json}");
    }

    #[rstest]
    #[case("not_authenticated")]
    #[case("missing_page_count")]
    #[case("partial_reciprocal_failure")]
    #[case("backend_unavailable")]
    fn error_code_schema_lists_variant(#[case] code: &str) {
        assert!(schema_to_json::<ErrorCodeSchema>().contains(code), "missing {code}");
    }

    #[rstest]
    fn user_book_schema_matches_serialised_record() {
        let json = schema_to_json::<UserBookSchema>();
        for field in ["pageCount", "pageInReading", "totalReadSeconds", "updatedAt"] {
            assert!(json.contains(field), "missing {field}");
        }
    }

    #[rstest]
    fn reading_status_schema_uses_screaming_case() {
        let json = schema_to_json::<ReadingStatusSchema>();
        assert!(json.contains("TO_READ") && json.contains("READING"));
    }
}
