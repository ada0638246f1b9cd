//! Identity-provider seam.
//!
//! The tracker never stores credentials itself. It validates the form input,
//! hands it to an [`IdentityProvider`], and records the identity that comes
//! back.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 6;

/// A problem with one field of the login form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    EmailRequired,
    EmailInvalid,
    PasswordRequired,
    PasswordTooShort,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::EmailRequired => write!(f, "Email is required"),
            CredentialError::EmailInvalid => write!(f, "Email is invalid"),
            CredentialError::PasswordRequired => write!(f, "Password is required"),
            CredentialError::PasswordTooShort => write!(
                f,
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials: {}", join_errors(.0))]
    InvalidCredentials(Vec<CredentialError>),
    #[error("no account for {0}")]
    UnknownAccount(String),
    #[error("wrong password")]
    WrongPassword,
    #[error("an account already exists for {0}")]
    AccountExists(String),
}

fn join_errors(errors: &[CredentialError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));

/// Check the login form fields, reporting every problem at once
pub fn validate_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    let mut errors = Vec::new();
    if email.is_empty() {
        errors.push(CredentialError::EmailRequired);
    } else if !EMAIL_RE.is_match(email) {
        errors.push(CredentialError::EmailInvalid);
    }
    if password.is_empty() {
        errors.push(CredentialError::PasswordRequired);
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(CredentialError::PasswordTooShort);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials(errors))
    }
}

/// Something that can authenticate users. The `Ok` value is the user identity.
pub trait IdentityProvider {
    fn login(&self, email: &str, password: &str) -> Result<String, AuthError>;
    fn create_account(&self, email: &str, password: &str) -> Result<String, AuthError>;
}

/// Accounts held in memory, keyed by email. The identity is the email itself.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    accounts: RefCell<HashMap<String, String>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.accounts
            .borrow_mut()
            .insert(email.to_string(), password.to_string());
        self
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let accounts = self.accounts.borrow();
        let stored = accounts
            .get(email)
            .ok_or_else(|| AuthError::UnknownAccount(email.to_string()))?;
        if stored != password {
            return Err(AuthError::WrongPassword);
        }
        Ok(email.to_string())
    }

    fn create_account(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let mut accounts = self.accounts.borrow_mut();
        if accounts.contains_key(email) {
            return Err(AuthError::AccountExists(email.to_string()));
        }
        accounts.insert(email.to_string(), password.to_string());
        Ok(email.to_string())
    }
}
