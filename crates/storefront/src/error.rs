//! Unified error handling.
//!
//! Provides a unified `AppError` type with a stable [`ErrorKind`] so the
//! consuming UI layer can pick a presentation (inline validation hint,
//! toast, retry banner) without matching on every source error.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::wishlist::WishlistError;

/// Coarse classification of an [`AppError`], stable across refactors of
/// the underlying error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input rejected before any I/O.
    Validation,
    /// The referenced resource does not exist.
    NotFound,
    /// The operation conflicts with existing state.
    Conflict,
    /// Authentication failed.
    Auth,
    /// The upstream catalog could not be reached or understood.
    Fetch,
    /// The local store failed.
    Storage,
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input from the caller.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflicting state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Wishlist operation failed.
    #[error("Wishlist error: {0}")]
    Wishlist(#[from] WishlistError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Local store operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl AppError {
    /// The stable classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Auth(err) => auth_kind(err),
            Self::Wishlist(err) => match err {
                WishlistError::Repository(_) => ErrorKind::Storage,
                WishlistError::Catalog(err) => catalog_kind(err),
            },
            Self::Catalog(err) => catalog_kind(err),
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// A message safe to show to the user.
    ///
    /// Infrastructure failures collapse to a generic line so storage
    /// paths and upstream bodies never reach the screen.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Storage => "Something went wrong, please try again".to_owned(),
            ErrorKind::Fetch => "Could not reach the product catalog".to_owned(),
            ErrorKind::Auth => "Invalid credentials".to_owned(),
            ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::Conflict => self.to_string(),
        }
    }
}

const fn auth_kind(err: &AuthError) -> ErrorKind {
    match err {
        AuthError::InvalidEmail(_)
        | AuthError::MissingField(_)
        | AuthError::WeakPassword(_)
        | AuthError::PasswordMismatch => ErrorKind::Validation,
        AuthError::UserNotFound => ErrorKind::NotFound,
        AuthError::InvalidCredentials | AuthError::PasswordHash => ErrorKind::Auth,
        AuthError::UserAlreadyExists => ErrorKind::Conflict,
        AuthError::Repository(_) => ErrorKind::Storage,
    }
}

const fn catalog_kind(err: &CatalogError) -> ErrorKind {
    match err {
        CatalogError::InvalidId(_) => ErrorKind::Validation,
        CatalogError::NotFound(_) => ErrorKind::NotFound,
        CatalogError::MissingId
        | CatalogError::Http(_)
        | CatalogError::Status { .. }
        | CatalogError::Parse(_) => ErrorKind::Fetch,
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::Validation("empty search".to_string());
        assert_eq!(err.to_string(), "Validation error: empty search");
    }

    #[test]
    fn test_auth_error_kinds() {
        assert_eq!(
            AppError::from(AuthError::InvalidCredentials).kind(),
            ErrorKind::Auth
        );
        assert_eq!(
            AppError::from(AuthError::UserNotFound).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AppError::from(AuthError::UserAlreadyExists).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            AppError::from(AuthError::MissingField("email")).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            AppError::from(AuthError::WeakPassword(
                "Password must be at least 6 characters".to_owned()
            ))
            .kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_catalog_error_kinds() {
        assert_eq!(
            AppError::from(CatalogError::NotFound("product 9".to_owned())).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AppError::from(CatalogError::InvalidId(-4)).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            AppError::from(CatalogError::Status {
                status: 502,
                message: "bad gateway".to_owned(),
            })
            .kind(),
            ErrorKind::Fetch
        );
    }

    #[test]
    fn test_infrastructure_messages_stay_generic() {
        let err = AppError::from(CatalogError::Status {
            status: 500,
            message: "stack trace goes here".to_owned(),
        });
        assert_eq!(err.public_message(), "Could not reach the product catalog");
        assert!(!err.public_message().contains("stack trace"));

        let err = AppError::Conflict("email already registered".to_owned());
        assert_eq!(err.public_message(), "Conflict: email already registered");
    }
}
