//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_states;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use readtrack::Trace;
#[cfg(debug_assertions)]
use readtrack::doc::ApiDoc;
use readtrack::inbound::http::configure_api;
use readtrack::inbound::http::health::{HealthState, live, ready};
use readtrack::inbound::http::state::HttpState;
use readtrack::inbound::ws;
use readtrack::inbound::ws::state::WsState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Cookie settings cloned into every worker.
#[derive(Clone)]
struct CookiePolicy {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

impl CookiePolicy {
    /// Private (encrypted) cookie sessions holding only the caller's uid.
    fn middleware(self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key)
            .cookie_name(SESSION_COOKIE.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

/// Shared state handed to each worker's `App`.
#[derive(Clone)]
struct AppData {
    health: web::Data<HealthState>,
    http: web::Data<HttpState>,
    ws: web::Data<WsState>,
}

fn build_app(
    data: AppData,
    cookies: CookiePolicy,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // The feed upgrade reads the same session as the API, so the session
    // layer wraps the whole app rather than the `/api/v1` scope.
    let app = App::new()
        .app_data(data.health)
        .app_data(data.http)
        .app_data(data.ws)
        .wrap(cookies.middleware())
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
        .service(ws::shelf_feed)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// The stores and services are built once and shared by every worker, so a
/// status written over HTTP is visible to live feeds opened on any worker.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let (http_state, ws_state) = build_states(&config);
    let data = AppData {
        health: health_state.clone(),
        http: web::Data::new(http_state),
        ws: web::Data::new(ws_state),
    };
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;
    let cookies = CookiePolicy {
        key,
        secure: cookie_secure,
        same_site,
    };

    let server = HttpServer::new(move || build_app(data.clone(), cookies.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
