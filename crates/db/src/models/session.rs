//! Refresh-token sessions.

use photomarket_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `user_sessions` table. Only the SHA-256 of the refresh
/// token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
