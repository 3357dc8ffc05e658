//! Repository for the `user_sessions` table.

use photomarket_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::session::{CreateSession, UserSession};

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, revoked_at, created_at";

pub struct SessionRepo;

impl SessionRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateSession,
    ) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(executor)
            .await
    }

    /// Find an active session by its refresh token hash.
    ///
    /// Revoked and expired sessions are never returned.
    pub async fn find_active_by_hash<'e>(
        executor: impl PgExecutor<'e>,
        hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE refresh_token_hash = $1
               AND revoked_at IS NULL
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(hash)
            .fetch_optional(executor)
            .await
    }

    /// Revoke a single session. Returns `true` only for the call that
    /// actually revoked it, so concurrent refreshes cannot both rotate.
    pub async fn revoke<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke all active sessions for a user. Returns the count revoked.
    pub async fn revoke_all_for_user<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET revoked_at = NOW()
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
