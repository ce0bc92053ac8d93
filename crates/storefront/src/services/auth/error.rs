//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] viorra_core::EmailError),

    /// A required field was left empty.
    #[error("{0} cannot be empty")]
    MissingField(&'static str),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// No user registered under the given email.
    #[error("no user found with this email")]
    UserNotFound,

    /// Wrong password for an existing user.
    #[error("incorrect password")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already registered with this email")]
    UserAlreadyExists,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/storage error.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}
