//! User entity model and DTOs.

use photomarket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Carries the password hash, so it is never serialized. Use
/// [`UserResponse`] for anything that leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public profile of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub nickname: String,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
}
