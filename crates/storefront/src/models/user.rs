//! User domain types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use viorra_core::Email;

/// A registered storefront user.
///
/// Stored as-is in the local user collection and as the session value.
/// The `password` field holds an Argon2 PHC hash, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Assigned at registration; older records may lack one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Unique key into the user collection.
    pub email: Email,
    /// Argon2 PHC hash of the password.
    pub password: String,
    /// Display name.
    pub name: String,
}
