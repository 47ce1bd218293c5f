//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `READTRACK_*` environment variables and an
//! optional configuration file. Unset values fall back to the defaults
//! exposed by the accessors.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{DuplicateRequestPolicy, PageCountPolicy};
use crate::outbound::catalog::DEFAULT_CATALOG_BASE_URL;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;

/// Errors raised when a configured value cannot be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The value is present but malformed.
    #[error("invalid value for {name}='{value}': {reason}")]
    InvalidValue {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Parser message.
        reason: String,
    },
}

impl SettingsError {
    fn invalid(name: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::InvalidValue {
            name,
            value: value.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Configuration for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "READTRACK")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark session cookies `Secure`.
    pub session_cookie_secure: Option<bool>,
    /// `SameSite` policy for session cookies.
    pub session_same_site: Option<String>,
    /// Base URL of the volumes API.
    pub catalog_base_url: Option<String>,
    /// Catalogue request timeout in seconds.
    pub catalog_timeout_secs: Option<u64>,
    /// Optional API key sent to the catalogue.
    pub catalog_api_key: Option<String>,
    /// `preserve` or `override` a stored total page count.
    pub page_count_policy: Option<String>,
    /// `reject` or `allow` duplicate pending friend requests.
    pub duplicate_requests: Option<String>,
}

impl ServerSettings {
    /// Address tuple passed to the listener.
    pub fn bind_addr(&self) -> (String, u16) {
        (
            self.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Session key path, falling back to the mounted secret location.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether session cookies are marked `Secure`; on unless disabled.
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure.unwrap_or(true)
    }

    /// Catalogue base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] when the URL does not parse.
    pub fn catalog_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .catalog_base_url
            .as_deref()
            .unwrap_or(DEFAULT_CATALOG_BASE_URL);
        Url::parse(raw).map_err(|err| SettingsError::invalid("catalog_base_url", raw, err))
    }

    /// Catalogue request timeout.
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(
            self.catalog_timeout_secs
                .unwrap_or(DEFAULT_CATALOG_TIMEOUT_SECS)
                .max(1),
        )
    }

    /// Page count policy, defaulting to [`PageCountPolicy::Preserve`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] for unknown policy names.
    pub fn page_count_policy(&self) -> Result<PageCountPolicy, SettingsError> {
        self.page_count_policy.as_deref().map_or_else(
            || Ok(PageCountPolicy::default()),
            |raw| {
                raw.parse()
                    .map_err(|err| SettingsError::invalid("page_count_policy", raw, err))
            },
        )
    }

    /// Duplicate request policy, defaulting to [`DuplicateRequestPolicy::Reject`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] for unknown policy names.
    pub fn duplicate_requests(&self) -> Result<DuplicateRequestPolicy, SettingsError> {
        self.duplicate_requests.as_deref().map_or_else(
            || Ok(DuplicateRequestPolicy::default()),
            |raw| {
                raw.parse()
                    .map_err(|err| SettingsError::invalid("duplicate_requests", raw, err))
            },
        )
    }
}
