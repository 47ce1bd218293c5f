//! HTTP inbound adapter exposing REST endpoints under `/api/v1`.

pub mod auth;
pub mod catalog;
pub mod error;
pub mod friends;
pub mod health;
pub mod profile;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod shelf;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::{HttpRequest, error::JsonPayloadError, web};

use crate::domain::Error;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// The caller mounts this inside a scope wrapped with the session middleware
/// and provides `web::Data<HttpState>`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(auth::sign_up)
        .service(auth::login)
        .service(auth::logout)
        .service(shelf::list_shelf)
        .service(shelf::get_user_book)
        .service(shelf::set_status)
        .service(shelf::update_user_book)
        .service(shelf::record_reading_time)
        .service(shelf::remove_from_shelf)
        .service(friends::list_friends)
        .service(friends::remove_friend)
        .service(friends::list_requests)
        .service(friends::send_request)
        .service(friends::accept_request)
        .service(friends::reject_request)
        .service(friends::relationship)
        .service(profile::search_users)
        .service(profile::current_profile)
        .service(profile::update_profile)
        .service(profile::register_username)
        .service(catalog::search_volumes)
        .service(catalog::get_volume);
}

/// JSON extractor settings: malformed bodies become `invalid_input` errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(json_error)
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_input(format!("malformed JSON body: {err}")).into()
}
