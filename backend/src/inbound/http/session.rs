//! Session helpers that resolve the request's [`Caller`].
//!
//! Handlers never read cookies directly: they ask the [`SessionContext`] for
//! a caller and hand it to the driving ports.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Caller, Error, UserId};

pub(crate) const USER_ID_KEY: &str = "uid";

/// Newtype wrapper exposing caller-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in uid in the session cookie.
    pub fn persist_user(&self, uid: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, uid.as_str())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Forget the signed-in user.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// The caller identified by the session cookie.
    ///
    /// A tampered or malformed uid is treated as anonymous.
    pub fn caller(&self) -> Result<Caller, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(match raw.map(UserId::new) {
            Some(Ok(uid)) => Caller::User(uid),
            Some(Err(error)) => {
                warn!(%error, "invalid uid in session cookie");
                Caller::Anonymous
            }
            None => Caller::Anonymous,
        })
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
