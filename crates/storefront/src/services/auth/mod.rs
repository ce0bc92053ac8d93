//! Session management service.
//!
//! Manages the "current user" value in the local store: login,
//! registration, and logout. Validation runs eagerly before any storage
//! I/O; all storage writes complete before an operation returns, so no
//! partial session state is observable by the caller.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;
use uuid::Uuid;

use viorra_core::Email;

use crate::db::users::UserRepository;
use crate::db::{RepositoryError, Store};
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Session management service.
///
/// Handles user registration, login, logout, and session reads.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new session service over the given store.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self {
            users: UserRepository::new(store),
        }
    }

    /// Login with email and password.
    ///
    /// On success the matched user becomes the current session value.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField`/`AuthError::InvalidEmail` before
    /// any I/O if the input is malformed, `AuthError::UserNotFound` if no
    /// user matches the email, and `AuthError::InvalidCredentials` if the
    /// password is wrong. The session is unchanged on any failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        let email = Email::parse(email)?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &user.password)?;

        self.users.set_current_user(&user).await?;
        tracing::debug!("user logged in");

        Ok(user)
    }

    /// Register a new user.
    ///
    /// On success the new user is appended to the stored collection and
    /// becomes the current session value.
    ///
    /// # Errors
    ///
    /// Returns a validation error (`MissingField`, `InvalidEmail`,
    /// `WeakPassword`, `PasswordMismatch`) before any I/O if the input is
    /// malformed, and `AuthError::UserAlreadyExists` if the email belongs
    /// to an existing user.
    #[instrument(skip(self, password, confirm_password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, AuthError> {
        if name.is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        if confirm_password.is_empty() {
            return Err(AuthError::MissingField("password confirmation"));
        }

        let email = Email::parse(email)?;
        validate_password(password)?;
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let password_hash = hash_password(password)?;
        let user = User {
            id: Some(Uuid::new_v4()),
            email,
            password: password_hash,
            name: name.to_owned(),
        };

        // The collection write lands before the session write; a failure
        // at either point surfaces to the caller with the session intact.
        let user = self.users.insert(user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;
        self.users.set_current_user(&user).await?;
        tracing::debug!("user registered");

        Ok(user)
    }

    /// Clear the current session. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.users.clear_current_user().await?;
        Ok(())
    }

    /// The current session value, or `None` when logged out.
    ///
    /// Side-effect-free.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn current_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.users.current_user().await?)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
