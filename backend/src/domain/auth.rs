//! Account credentials accepted by the authentication port.
//!
//! Handlers validate raw payloads into [`LoginCredentials`] before calling
//! [`crate::domain::ports::LoginService`].

use zeroize::Zeroizing;

/// Shortest password accepted at sign-up.
pub const PASSWORD_MIN: usize = 6;

/// Validation errors for login and sign-up payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacks a local part or domain.
    #[error("email must look like name@domain")]
    MalformedEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password is shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    ShortPassword {
        /// Minimum length.
        min: usize,
    },
}

/// Validated email and password.
///
/// ## Invariants
/// - `email` is trimmed, lowercased and has the `local@domain` shape.
/// - `password` is non-empty and keeps caller whitespace; it is zeroised on
///   drop.
///
/// # Examples
/// ```
/// use readtrack::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com ", "hunter22").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate credentials presented at login.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = normalise_email(email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Validate credentials for a new account, enforcing [`PASSWORD_MIN`].
    pub fn for_sign_up(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let credentials = Self::try_from_parts(email, password)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(LoginValidationError::ShortPassword { min: PASSWORD_MIN });
        }
        Ok(credentials)
    }

    /// Normalised email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as supplied.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

fn normalise_email(raw: &str) -> Result<String, LoginValidationError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(LoginValidationError::EmptyEmail);
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(LoginValidationError::MalformedEmail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "secret1", LoginValidationError::EmptyEmail)]
    #[case("no-at-sign", "secret1", LoginValidationError::MalformedEmail)]
    #[case("@example.com", "secret1", LoginValidationError::MalformedEmail)]
    #[case("ada@localhost", "secret1", LoginValidationError::MalformedEmail)]
    #[case("ada@example.com", "", LoginValidationError::EmptyPassword)]
    fn login_rejects_invalid_parts(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        assert_eq!(LoginCredentials::try_from_parts(email, password), Err(expected));
    }

    #[rstest]
    fn password_keeps_whitespace() {
        let creds = LoginCredentials::try_from_parts("ada@example.com", " pass ").expect("valid");
        assert_eq!(creds.password(), " pass ");
    }

    #[rstest]
    fn sign_up_enforces_minimum_length() {
        let err = LoginCredentials::for_sign_up("ada@example.com", "12345").expect_err("short");
        assert_eq!(err, LoginValidationError::ShortPassword { min: PASSWORD_MIN });
        assert!(LoginCredentials::for_sign_up("ada@example.com", "123456").is_ok());
    }
}
