//! Backend entry-point: loads settings, wires the stores and serves the API.

use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use readtrack::domain::CatalogService;
use readtrack::inbound::http::health::HealthState;
use readtrack::inbound::http::session_config::fingerprint::key_fingerprint;
use readtrack::inbound::http::session_config::{BuildMode, session_settings};
use readtrack::outbound::catalog::GoogleBooksCatalogSource;
use readtrack::settings::ServerSettings;

mod server;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load server settings")?;
    let config = build_config(&settings)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(addr = ?settings.bind_addr(), "listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server stopped with an error")
}

fn build_config(settings: &ServerSettings) -> Result<ServerConfig> {
    let session = session_settings(settings, BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(fingerprint = %key_fingerprint(&session.key), "session key loaded");

    let catalog = GoogleBooksCatalogSource::new(
        settings.catalog_base_url()?,
        settings.catalog_timeout(),
        settings.catalog_api_key.clone(),
    )
    .wrap_err("failed to build catalogue client")?;

    Ok(ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        resolve_bind_addr(settings)?,
    )
    .with_page_count_policy(settings.page_count_policy()?)
    .with_duplicate_policy(settings.duplicate_requests()?)
    .with_catalog(Arc::new(CatalogService::new(Arc::new(catalog)))))
}

fn resolve_bind_addr(settings: &ServerSettings) -> Result<SocketAddr> {
    let (host, port) = settings.bind_addr();
    (host.as_str(), port)
        .to_socket_addrs()
        .wrap_err_with(|| format!("cannot resolve bind address {host}:{port}"))?
        .next()
        .ok_or_else(|| eyre!("bind address {host}:{port} resolved to nothing"))
}
