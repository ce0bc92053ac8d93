//! User repository over the local key-value store.
//!
//! Owns the JSON shapes under [`USERS_KEY`] (sequence of `User`) and
//! [`CURRENT_USER_KEY`] (the active session value).

use viorra_core::Email;

use super::{CURRENT_USER_KEY, RepositoryError, Store, USERS_KEY};
use crate::models::user::User;

/// Repository for user and session storage.
pub struct UserRepository<'a> {
    store: &'a Store,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// All registered users, in registration order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store fails.
    pub async fn all(&self) -> Result<Vec<User>, RepositoryError> {
        let users = self.store.get_json::<Vec<User>>(USERS_KEY).await?;
        Ok(users.unwrap_or_default())
    }

    /// Find a user by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store fails.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let users = self.all().await?;
        Ok(users.into_iter().find(|u| &u.email == email))
    }

    /// Append a new user to the stored collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Storage` if the store fails.
    pub async fn insert(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.all().await?;

        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        users.push(user.clone());
        self.store.set_json(USERS_KEY, &users).await?;
        Ok(user)
    }

    /// The active session value, or `None` when logged out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store fails.
    pub async fn current_user(&self) -> Result<Option<User>, RepositoryError> {
        Ok(self.store.get_json(CURRENT_USER_KEY).await?)
    }

    /// Persist `user` as the active session.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store fails.
    pub async fn set_current_user(&self, user: &User) -> Result<(), RepositoryError> {
        Ok(self.store.set_json(CURRENT_USER_KEY, user).await?)
    }

    /// Clear the active session. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store fails.
    pub async fn clear_current_user(&self) -> Result<(), RepositoryError> {
        Ok(self.store.remove(CURRENT_USER_KEY).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(email: &str, name: &str) -> User {
        User {
            id: None,
            email: Email::parse(email).unwrap(),
            password: "hash".to_owned(),
            name: name.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = Store::in_memory();
        let repo = UserRepository::new(&store);

        repo.insert(user("a@example.com", "Ada")).await.unwrap();
        repo.insert(user("b@example.com", "Beth")).await.unwrap();

        let found = repo
            .find_by_email(&Email::parse("b@example.com").unwrap())
            .await
            .unwrap();
        assert_eq!(found.unwrap().name, "Beth");

        let missing = repo
            .find_by_email(&Email::parse("c@example.com").unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_email_conflicts() {
        let store = Store::in_memory();
        let repo = UserRepository::new(&store);

        repo.insert(user("a@example.com", "Ada")).await.unwrap();
        let result = repo.insert(user("a@example.com", "Imposter")).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));

        // collection unchanged
        assert_eq!(repo.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = Store::in_memory();
        let repo = UserRepository::new(&store);

        assert!(repo.current_user().await.unwrap().is_none());

        let ada = user("a@example.com", "Ada");
        repo.set_current_user(&ada).await.unwrap();
        assert_eq!(repo.current_user().await.unwrap().unwrap().name, "Ada");

        repo.clear_current_user().await.unwrap();
        repo.clear_current_user().await.unwrap();
        assert!(repo.current_user().await.unwrap().is_none());
    }
}
