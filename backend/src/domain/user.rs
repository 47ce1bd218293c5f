//! User identity, profile documents and the caller identity.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Error;

/// Minimum accepted length for a [`UserId`].
pub const USER_ID_MIN: usize = 2;
/// Maximum accepted length for a [`UserId`].
pub const USER_ID_MAX: usize = 128;
/// Minimum accepted length for a [`Username`].
pub const USERNAME_MIN: usize = 3;
/// Maximum accepted length for a [`Username`].
pub const USERNAME_MAX: usize = 24;

/// Validation errors for user identifiers and usernames.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier carried leading or trailing whitespace.
    #[error("user id must not contain surrounding whitespace")]
    PaddedId,
    /// The identifier length is outside the accepted range.
    #[error("user id must be between {min} and {max} characters")]
    IdLength {
        /// Minimum length.
        min: usize,
        /// Maximum length.
        max: usize,
    },
    /// The identifier contains a storage path separator.
    #[error("user id must not contain '/'")]
    IdPathSeparator,
    /// The username length is outside the accepted range.
    #[error("username must be between {min} and {max} characters")]
    UsernameLength {
        /// Minimum length.
        min: usize,
        /// Maximum length.
        max: usize,
    },
    /// The username contains characters outside `[a-z0-9._]`.
    #[error("username may only contain lowercase letters, digits, '.' or '_'")]
    UsernameCharacters,
}

/// Opaque identifier issued by the authentication service.
///
/// ## Invariants
/// - Between [`USER_ID_MIN`] and [`USER_ID_MAX`] characters.
/// - No surrounding whitespace and no `/`, which the document store uses as a
///   path separator.
///
/// # Examples
/// ```
/// use readtrack::domain::UserId;
///
/// assert!(UserId::new("Xy7pQ2").is_ok());
/// assert!(UserId::new("users/evil").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        let length = id.chars().count();
        if !(USER_ID_MIN..=USER_ID_MAX).contains(&length) {
            return Err(UserValidationError::IdLength {
                min: USER_ID_MIN,
                max: USER_ID_MAX,
            });
        }
        if id.contains('/') {
            return Err(UserValidationError::IdPathSeparator);
        }
        Ok(Self(id))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Public handle chosen by a user, unique across the service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`]. Input is trimmed and lowercased.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        let length = normalised.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(UserValidationError::UsernameLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            });
        }
        let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '_';
        if !normalised.chars().all(allowed) {
            return Err(UserValidationError::UsernameCharacters);
        }
        Ok(Self(normalised))
    }

    /// Borrow the username as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Profile document held by the profile store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Owner of the profile.
    pub uid: UserId,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Registered username, once claimed.
    pub username: Option<Username>,
    /// Contact email from the authentication service.
    pub email: String,
    /// Uids of accepted friends.
    #[serde(default)]
    pub friends: BTreeSet<UserId>,
}

impl Profile {
    /// Fresh profile with no username and no friends.
    pub fn new(uid: UserId, email: impl Into<String>) -> Self {
        Self {
            uid,
            name: String::new(),
            surname: String::new(),
            username: None,
            email: email.into(),
            friends: BTreeSet::new(),
        }
    }
}

/// Lightweight identity projection of another user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    /// User identifier.
    pub uid: UserId,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Registered username, if any.
    pub username: Option<Username>,
    /// Contact email.
    pub email: String,
}

impl From<&Profile> for Friend {
    fn from(profile: &Profile) -> Self {
        Self {
            uid: profile.uid.clone(),
            name: profile.name.clone(),
            surname: profile.surname.clone(),
            username: profile.username.clone(),
            email: profile.email.clone(),
        }
    }
}

impl From<Profile> for Friend {
    fn from(profile: Profile) -> Self {
        Self {
            uid: profile.uid,
            name: profile.name,
            surname: profile.surname,
            username: profile.username,
            email: profile.email,
        }
    }
}

/// Identity of whoever invokes a use-case.
///
/// Inbound adapters resolve the caller once per request; services call
/// [`Caller::require`] before touching any per-user data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Caller {
    /// No authenticated identity.
    #[default]
    Anonymous,
    /// Authenticated user.
    User(UserId),
}

impl Caller {
    /// The authenticated uid, or [`Error::not_authenticated`].
    ///
    /// # Examples
    /// ```
    /// use readtrack::domain::{Caller, ErrorCode, UserId};
    ///
    /// let uid = UserId::new("reader-1").unwrap();
    /// assert_eq!(Caller::User(uid.clone()).require().unwrap(), &uid);
    /// let err = Caller::Anonymous.require().unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::NotAuthenticated);
    /// ```
    pub fn require(&self) -> Result<&UserId, Error> {
        match self {
            Self::User(uid) => Ok(uid),
            Self::Anonymous => Err(Error::not_authenticated("login required")),
        }
    }
}

impl From<UserId> for Caller {
    fn from(value: UserId) -> Self {
        Self::User(value)
    }
}

impl From<Option<UserId>> for Caller {
    fn from(value: Option<UserId>) -> Self {
        value.map_or(Self::Anonymous, Self::User)
    }
}
