//! In-memory account store backing sign-up and sign-in.
//!
//! Passwords are kept as Argon2id PHC strings (algorithm, parameters and salt
//! embedded); the plain text never outlives the request that carried it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use super::lock;
use crate::domain::ports::LoginService;
use crate::domain::{Error, LoginCredentials, UserId};

#[derive(Clone)]
struct Account {
    uid: UserId,
    password_hash: String,
}

/// Hash `password` with Argon2id and a fresh random salt.
fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string.
///
/// A mismatch is `Ok(false)`; a malformed stored hash is an error.
fn verify_password(password: &str, stored: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Account store keyed by normalised email address.
#[derive(Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
}

impl InMemoryAccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoginService for InMemoryAccountStore {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let account = lock(&self.accounts).get(credentials.email()).cloned();
        let Some(account) = account else {
            return Err(Error::not_authenticated("invalid credentials"));
        };
        let verified = verify_password(credentials.password(), &account.password_hash)
            .map_err(|err| {
                warn!(uid = %account.uid, error = %err, "stored password hash unreadable");
                Error::internal("stored password hash unreadable")
            })?;
        if verified {
            Ok(account.uid)
        } else {
            Err(Error::not_authenticated("invalid credentials"))
        }
    }

    async fn register(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if lock(&self.accounts).contains_key(credentials.email()) {
            return Err(Error::conflict("an account already exists for this email"));
        }
        let password_hash = hash_password(credentials.password())
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;
        let uid = UserId::new(Uuid::new_v4().simple().to_string())
            .map_err(|err| Error::internal(format!("generated uid rejected: {err}")))?;

        let mut accounts = lock(&self.accounts);
        // Re-checked under the lock: hashing ran without it.
        if accounts.contains_key(credentials.email()) {
            return Err(Error::conflict("an account already exists for this email"));
        }
        accounts.insert(
            credentials.email().to_owned(),
            Account {
                uid: uid.clone(),
                password_hash,
            },
        );
        info!(%uid, "account registered");
        Ok(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    fn creds(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials::for_sign_up(email, password).expect("credentials")
    }

    #[tokio::test]
    async fn registered_account_can_sign_in() {
        let store = InMemoryAccountStore::new();
        let uid = store
            .register(&creds("ada@example.com", "secret-pass"))
            .await
            .expect("register");

        let signed_in = store
            .authenticate(&creds("ADA@example.com", "secret-pass"))
            .await
            .expect("sign in");
        assert_eq!(signed_in, uid);
    }

    #[tokio::test]
    async fn wrong_password_is_not_authenticated() {
        let store = InMemoryAccountStore::new();
        store
            .register(&creds("ada@example.com", "secret-pass"))
            .await
            .expect("register");

        let err = store
            .authenticate(&creds("ada@example.com", "other-pass"))
            .await
            .expect_err("wrong password");
        assert_eq!(err.code(), ErrorCode::NotAuthenticated);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let store = InMemoryAccountStore::new();
        store
            .register(&creds("ada@example.com", "secret-pass"))
            .await
            .expect("register");

        let err = store
            .register(&creds("ada@example.com", "another-pass"))
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn stored_password_is_an_argon2id_phc_string() {
        let store = InMemoryAccountStore::new();
        store
            .register(&creds("ada@example.com", "secret-pass"))
            .await
            .expect("register");

        let stored = lock(&store.accounts)
            .get("ada@example.com")
            .map(|account| account.password_hash.clone())
            .expect("account stored");
        assert!(stored.starts_with("$argon2id$"), "unexpected hash format: {stored}");
        assert!(!stored.contains("secret-pass"));
    }

    #[test]
    fn equal_passwords_hash_differently() {
        let first = hash_password("secret-pass").expect("hash");
        let second = hash_password("secret-pass").expect("hash");
        assert_ne!(first, second, "each hash carries its own salt");
        assert!(verify_password("secret-pass", &first).expect("verify"));
        assert!(!verify_password("other-pass", &second).expect("verify"));
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(verify_password("secret-pass", "not-a-phc-string").is_err());
    }
}
