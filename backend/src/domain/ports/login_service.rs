//! Driving port for account authentication.
//!
//! Inbound adapters authenticate credentials through this port without
//! knowing which identity provider backs it, so handler tests can substitute
//! [`FixtureLoginService`].

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the account's uid.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;

    /// Create an account and return its new uid.
    ///
    /// Fails with `conflict` when the email is already registered.
    async fn register(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Fixture authenticator with a single known account.
///
/// `reader@example.com` / `password` authenticates as [`FIXTURE_UID`];
/// registration always fails with `conflict`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

/// Uid returned by [`FixtureLoginService`].
pub const FIXTURE_UID: &str = "fixture-reader";

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.email() == "reader@example.com" && credentials.password() == "password" {
            UserId::new(FIXTURE_UID)
                .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
        } else {
            Err(Error::not_authenticated("invalid credentials"))
        }
    }

    async fn register(&self, _credentials: &LoginCredentials) -> Result<UserId, Error> {
        Err(Error::conflict("registration is closed"))
    }
}
