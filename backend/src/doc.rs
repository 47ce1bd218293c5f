//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the schema wrappers from [`crate::inbound::http::schemas`], so domain
//! types stay free of utoipa derives. The session cookie is declared as the
//! default security scheme; public endpoints opt out per path.
//!
//! The document is served by Swagger UI in debug builds and exported via
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::auth::CredentialsRequest;
use crate::inbound::http::friends::{FriendRequestBody, RelationshipResponse};
use crate::inbound::http::profile::{ProfileUpdateBody, UsernameBody};
use crate::inbound::http::schemas::{
    CatalogPageSchema, ErrorCodeSchema, ErrorSchema, FriendRequestSchema,
    FriendRequestStatusSchema, FriendSchema, ProfileSchema, ReadingStatusSchema,
    RelationshipStatusSchema, StatusChangeSchema, UserBookSchema, UserSearchHitSchema,
    VolumeSchema,
};
use crate::inbound::http::shelf::{
    BookDetails, ReadingTimeRequest, ShelfUpdateRequest, StatusChangeRequest,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/signup or POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Readtrack backend API",
        description = "Shelves with reading progress, friends, profiles and the public catalogue.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::shelf::list_shelf,
        crate::inbound::http::shelf::get_user_book,
        crate::inbound::http::shelf::set_status,
        crate::inbound::http::shelf::update_user_book,
        crate::inbound::http::shelf::record_reading_time,
        crate::inbound::http::shelf::remove_from_shelf,
        crate::inbound::http::friends::list_friends,
        crate::inbound::http::friends::remove_friend,
        crate::inbound::http::friends::list_requests,
        crate::inbound::http::friends::send_request,
        crate::inbound::http::friends::accept_request,
        crate::inbound::http::friends::reject_request,
        crate::inbound::http::friends::relationship,
        crate::inbound::http::profile::current_profile,
        crate::inbound::http::profile::update_profile,
        crate::inbound::http::profile::register_username,
        crate::inbound::http::profile::search_users,
        crate::inbound::http::catalog::search_volumes,
        crate::inbound::http::catalog::get_volume,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ReadingStatusSchema,
        UserBookSchema,
        StatusChangeSchema,
        ProfileSchema,
        FriendSchema,
        RelationshipStatusSchema,
        UserSearchHitSchema,
        FriendRequestStatusSchema,
        FriendRequestSchema,
        VolumeSchema,
        CatalogPageSchema,
        CredentialsRequest,
        BookDetails,
        StatusChangeRequest,
        ShelfUpdateRequest,
        ReadingTimeRequest,
        FriendRequestBody,
        RelationshipResponse,
        ProfileUpdateBody,
        UsernameBody,
    )),
    tags(
        (name = "auth", description = "Sign-up, login and logout"),
        (name = "shelf", description = "Books on the caller's shelf"),
        (name = "friends", description = "Friend requests and friendships"),
        (name = "users", description = "Profiles and username search"),
        (name = "catalog", description = "Public book catalogue"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
